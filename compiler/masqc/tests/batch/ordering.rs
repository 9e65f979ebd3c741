//! Fragments before consumers, diamonds and cycles.

use std::path::PathBuf;

use pretty_assertions::assert_eq;

use masq_deps::DependencyError;
use masq_diagnostic::{ErrorCode, Location};
use masqc::{AnonymizeConfig, AnonymizeError, Anonymizer};

use crate::common::{payroll_batch, replacement, run, source};

fn paths(list: &[&str]) -> Vec<PathBuf> {
    list.iter().map(PathBuf::from).collect()
}

#[test]
fn fragments_are_processed_first() {
    let output = run(&payroll_batch());
    assert_eq!(
        output.order.files(),
        paths(&["copy/EMPFLDS.cpy", "src/PAYROLL.cbl", "src/REPORTER.cbl"]).as_slice()
    );
    // Rewritten files keep input order.
    let rewritten: Vec<&PathBuf> = output.files.iter().map(|f| &f.path).collect();
    assert_eq!(
        rewritten,
        vec![
            &PathBuf::from("src/PAYROLL.cbl"),
            &PathBuf::from("src/REPORTER.cbl"),
            &PathBuf::from("copy/EMPFLDS.cpy"),
        ]
    );
}

#[test]
fn fragment_declarations_get_the_first_counters() {
    let output = run(&payroll_batch());
    assert_eq!(replacement(&output, "EMPFLDS"), "CP00001");
    assert_eq!(replacement(&output, "EMP-ID"), "D00001");
    assert_eq!(replacement(&output, "EMP-WAGE"), "D0000002");
    assert_eq!(replacement(&output, "SHARED-TOTAL"), "D00000000003");
}

fn diamond() -> Vec<masqc::SourceFile> {
    vec![
        source("MAIN.cbl", &["01  MAIN-REC.", "    COPY SIDEA.", "    COPY SIDEB."]),
        source("SIDEA.cpy", &["    05 SIDEA-FLD PIC X.", "    COPY CORE."]),
        source("SIDEB.cpy", &["    05 SIDEB-FLD PIC X.", "    COPY CORE."]),
        source("CORE.cpy", &["    05 CORE-FLD PIC X."]),
    ]
}

#[test]
fn shared_fragment_is_processed_once() {
    let output = run(&diamond());
    assert_eq!(
        output.order.files(),
        paths(&["CORE.cpy", "SIDEA.cpy", "SIDEB.cpy", "MAIN.cbl"]).as_slice()
    );

    let core = output.entries.iter().find(|e| e.original == "CORE").unwrap();
    // Its own name plus one inclusion from each side.
    assert_eq!(core.occurrences, 3);
    let field = output
        .entries
        .iter()
        .find(|e| e.original == "CORE-FLD")
        .unwrap();
    assert_eq!(field.occurrences, 1);
    assert_eq!(field.replacement, "D0000001");
    assert_eq!(output.files.len(), 4);
}

#[test]
fn cycle_aborts_before_rewriting() {
    let files = vec![
        source("MAIN.cbl", &["    COPY SIDEA."]),
        source("SIDEA.cpy", &["    COPY SIDEB."]),
        source("SIDEB.cpy", &["    COPY SIDEA."]),
    ];
    let mut anonymizer = Anonymizer::new(AnonymizeConfig::default());
    let err = anonymizer.run(&files).unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::E2001));
    let diag = err.to_diagnostic().unwrap();
    assert_eq!(diag.location, Some(Location::new("SIDEB.cpy", 1, 17)));
    assert!(diag.message.contains("'SIDEA'"));
    match err {
        AnonymizeError::Dependency(DependencyError::CircularDependency {
            cycle,
            consumer,
            line,
            fragment,
            ..
        }) => {
            assert_eq!(cycle, paths(&["SIDEA.cpy", "SIDEB.cpy", "SIDEA.cpy"]));
            assert_eq!(consumer, PathBuf::from("SIDEB.cpy"));
            assert_eq!(line, 1);
            assert_eq!(fragment, "SIDEA");
        }
        other => panic!("expected a cycle, got {other:?}"),
    }
    assert!(anonymizer.table().is_empty());
}

#[test]
fn missing_fragment_names_the_consumer() {
    let mut anonymizer = Anonymizer::new(AnonymizeConfig::default());
    let err = anonymizer
        .run(&[source("MAIN.cbl", &["01  MAIN-REC.", "    COPY NOWHERE."])])
        .unwrap_err();
    let diag = err.to_diagnostic().unwrap();
    assert_eq!(diag.code, ErrorCode::E2002);
    assert!(diag.message.contains("NOWHERE"));
    assert_eq!(diag.location.map(|l| (l.file, l.line)), Some(("MAIN.cbl".to_string(), 2)));
}
