//! Persisted mapping state.

use pretty_assertions::assert_eq;

use masq_names::StrategyKind;
use masqc::{AnonymizeConfig, Anonymizer};

use crate::common::{payroll_batch, source};

#[test]
fn restore_then_persist_is_identity() {
    let mut first = Anonymizer::new(AnonymizeConfig::default());
    first.run(&payroll_batch()).unwrap();
    let bytes = first.export_mapping_state().unwrap();

    let mut restored = Anonymizer::new(AnonymizeConfig::default());
    restored.load_mapping_state(&bytes).unwrap();
    assert_eq!(restored.export_mapping_state().unwrap(), bytes);
}

#[test]
fn continued_batch_reproduces_the_output() {
    let mut first = Anonymizer::new(AnonymizeConfig::default());
    let before = first.run(&payroll_batch()).unwrap();
    let bytes = first.export_mapping_state().unwrap();

    let mut second = Anonymizer::new(AnonymizeConfig::default());
    second.load_mapping_state(&bytes).unwrap();
    let after = second.run(&payroll_batch()).unwrap();

    assert_eq!(after.files, before.files);
    let pairs = |entries: &[masq_names::MappingEntry]| -> Vec<(String, String)> {
        entries
            .iter()
            .map(|e| (e.original.clone(), e.replacement.clone()))
            .collect()
    };
    assert_eq!(pairs(&after.entries), pairs(&before.entries));
}

#[test]
fn new_files_continue_the_counters() {
    let mut first = Anonymizer::new(AnonymizeConfig::default());
    first.run(&payroll_batch()).unwrap();
    let bytes = first.export_mapping_state().unwrap();

    let mut second = Anonymizer::new(AnonymizeConfig::default());
    second.load_mapping_state(&bytes).unwrap();
    let output = second
        .run(&[source("EXTRA.cbl", &["01  EXTRA-REC PIC X."])])
        .unwrap();
    let extra = output
        .entries
        .iter()
        .find(|e| e.original == "EXTRA-REC")
        .unwrap();
    // Nine data names were issued by the first batch.
    assert_eq!(extra.replacement, "D00000010");
}

#[test]
fn restored_strategy_wins_over_configuration() {
    let config = AnonymizeConfig::new().with_strategy(StrategyKind::Vocabulary);
    let mut first = Anonymizer::new(config);
    first.run(&payroll_batch()).unwrap();
    let bytes = first.export_mapping_state().unwrap();

    let mut second = Anonymizer::new(AnonymizeConfig::default());
    second.load_mapping_state(&bytes).unwrap();
    let output = second
        .run(&[source("EXTRA.cbl", &["01  EXTRA-REC PIC X."])])
        .unwrap();
    let extra = output
        .entries
        .iter()
        .find(|e| e.original == "EXTRA-REC")
        .unwrap();
    // Vocabulary names are hyphenated word pairs; counter names are not.
    assert!(extra.replacement.contains('-'), "{}", extra.replacement);
}
