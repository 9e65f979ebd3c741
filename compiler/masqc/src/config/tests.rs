use super::*;
use pretty_assertions::assert_eq;

#[test]
fn defaults() {
    let config = AnonymizeConfig::default();
    assert_eq!(config.strategy, StrategyKind::Counter);
    assert!(!config.preview);
    assert_eq!(config.retry_ceiling, 64);
    assert_eq!(config.overlay_scope, OverlayScope::Batch);
    assert_eq!(config.warning_limit, 0);
    assert!(config.never_rename.is_empty());
}

#[test]
fn builder_methods() {
    let config = AnonymizeConfig::new()
        .with_strategy(StrategyKind::Vocabulary)
        .with_preview(true)
        .with_retry_ceiling(8)
        .with_overlay_scope(OverlayScope::File)
        .with_warning_limit(5)
        .with_never_rename(["CUST-ID"])
        .with_never_rename(vec!["ACCT-NO".to_string()]);
    assert_eq!(config.strategy, StrategyKind::Vocabulary);
    assert!(config.preview);
    assert_eq!(config.retry_ceiling, 8);
    assert_eq!(config.overlay_scope, OverlayScope::File);
    assert_eq!(config.warning_limit, 5);
    assert_eq!(config.never_rename, vec!["CUST-ID", "ACCT-NO"]);
}

// === JSON ===

#[test]
fn empty_object_gives_defaults() {
    assert_eq!(
        AnonymizeConfig::from_json("{}").unwrap(),
        AnonymizeConfig::default()
    );
}

#[test]
fn kebab_case_keys() {
    let config = AnonymizeConfig::from_json(
        r#"{
            "strategy": "vocabulary",
            "retry-ceiling": 128,
            "overlay-scope": "file",
            "warning-limit": 50,
            "never-rename": ["CUSTOMER-ID"]
        }"#,
    )
    .unwrap();
    assert_eq!(
        config,
        AnonymizeConfig::new()
            .with_strategy(StrategyKind::Vocabulary)
            .with_retry_ceiling(128)
            .with_overlay_scope(OverlayScope::File)
            .with_warning_limit(50)
            .with_never_rename(["CUSTOMER-ID"])
    );
}

#[test]
fn unknown_keys_are_rejected() {
    let err = AnonymizeConfig::from_json(r#"{"stratgy": "counter"}"#).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
    assert!(err.to_string().starts_with("invalid configuration:"));
}

#[test]
fn unknown_strategy_is_rejected() {
    assert!(AnonymizeConfig::from_json(r#"{"strategy": "random"}"#).is_err());
}

#[test]
fn load_reports_the_path() {
    let err = AnonymizeConfig::load(Path::new("/nonexistent/masq.json")).unwrap_err();
    assert!(err.to_string().contains("/nonexistent/masq.json"));
}

#[test]
fn load_reads_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("masq.json");
    std::fs::write(&path, r#"{"preview": true}"#).unwrap();
    assert!(AnonymizeConfig::load(&path).unwrap().preview);
}
