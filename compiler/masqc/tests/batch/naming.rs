//! Naming guarantees across a batch.

use pretty_assertions::assert_eq;
use rustc_hash::FxHashSet;

use masq_lexer::is_reserved;
use masq_names::{check_shape, IdentifierCategory, StrategyKind};
use masqc::AnonymizeConfig;

use crate::common::{payroll_batch, replacement, rewritten, run, run_with, source};

#[test]
fn same_input_same_output() {
    let first = run(&payroll_batch());
    let second = run(&payroll_batch());
    assert_eq!(first.entries, second.entries);
    assert_eq!(first.files, second.files);

    let vocab = AnonymizeConfig::new().with_strategy(StrategyKind::Vocabulary);
    let first = run_with(vocab.clone(), &payroll_batch());
    let second = run_with(vocab, &payroll_batch());
    assert_eq!(first.files, second.files);
}

#[test]
fn every_occurrence_gets_the_same_name() {
    let output = run(&payroll_batch());
    let total = replacement(&output, "SHARED-TOTAL");
    let para = replacement(&output, "MAIN-PARA");

    let payroll = rewritten(&output, "src/PAYROLL.cbl");
    let reporter = rewritten(&output, "src/REPORTER.cbl");
    assert_eq!(payroll.lines[5], format!("000600     05 {total} PIC 9(4)."));
    assert_eq!(payroll.lines[14], format!("001500     MOVE 0 TO {total}."));
    assert_eq!(reporter.lines[10], format!("001100     ADD 1 TO {total}."));
    assert_eq!(payroll.lines[13], format!("001400 {para}."));
    assert_eq!(reporter.lines[9], format!("001000 {para}."));
}

#[test]
fn called_program_follows_its_new_name() {
    let output = run(&payroll_batch());
    assert_eq!(replacement(&output, "REPORTER"), "PG000002");
    let payroll = rewritten(&output, "src/PAYROLL.cbl");
    assert_eq!(
        payroll.lines[15],
        format!(
            "001600     CALL 'PG000002' USING {}.",
            replacement(&output, "EMP-REC")
        )
    );
    let reporter = rewritten(&output, "src/REPORTER.cbl");
    assert_eq!(reporter.lines[1], "000200 PROGRAM-ID. PG000002.");
}

#[test]
fn names_are_valid_for_their_category() {
    for strategy in [StrategyKind::Counter, StrategyKind::Vocabulary] {
        let output = run_with(AnonymizeConfig::new().with_strategy(strategy), &payroll_batch());
        for entry in &output.entries {
            assert!(
                check_shape(&entry.replacement, entry.category).is_ok(),
                "{strategy}: '{}' is not a valid {}",
                entry.replacement,
                entry.category
            );
            assert!(!is_reserved(&entry.replacement));
            assert!(entry.replacement.len() <= entry.category.max_length());
        }
    }
}

#[test]
fn names_are_unique_and_never_reuse_an_original() {
    for strategy in [StrategyKind::Counter, StrategyKind::Vocabulary] {
        let output = run_with(AnonymizeConfig::new().with_strategy(strategy), &payroll_batch());
        let originals: FxHashSet<&str> = output.entries.iter().map(|e| e.original.as_str()).collect();
        let mut replacements = FxHashSet::default();
        for entry in &output.entries {
            assert!(
                replacements.insert(entry.replacement.as_str()),
                "{strategy}: '{}' issued twice",
                entry.replacement
            );
            assert!(!originals.contains(entry.replacement.as_str()));
        }
    }
}

#[test]
fn shared_record_is_counted_in_both_programs() {
    let output = run(&payroll_batch());
    let shared = output
        .entries
        .iter()
        .find(|e| e.original == "SHARED-AREA")
        .unwrap();
    assert_eq!(shared.category, IdentifierCategory::CrossProgramName);
    assert!(shared.external);
    assert_eq!(shared.occurrences, 2);
    assert_eq!(shared.replacement, "XP000000001");
}

const CUSTOMERS: &[&str] = &[
    "01  CUST-REC.",
    "    05 CUST-NO PIC 9(6).",
    "    05 CUST-TYPE PIC X.",
    "    05 CUST-ZONE PIC X(2).",
    "    05 CUST-SINCE PIC 9(8).",
    "    05 CUST-LIMIT PIC 9(7).",
    "    05 CUSTOMER-NAME PIC X(30).",
];

#[test]
fn seventh_data_name_with_counter_naming() {
    let output = run(&[source("CUST.cpy", CUSTOMERS)]);
    assert_eq!(replacement(&output, "CUSTOMER-NAME"), "D000000000007");
    assert_eq!(
        rewritten(&output, "CUST.cpy").lines[6],
        "000700     05 D000000000007 PIC X(30)."
    );
}

#[test]
fn seventh_data_name_with_vocabulary_naming() {
    let config = AnonymizeConfig::new().with_strategy(StrategyKind::Vocabulary);
    let output = run_with(config, &[source("CUST.cpy", CUSTOMERS)]);
    assert_eq!(replacement(&output, "CUSTOMER-NAME"), "YOUNG-SPARR-7");
    assert_eq!(
        rewritten(&output, "CUST.cpy").lines[6],
        "000700     05 YOUNG-SPARR-7 PIC X(30)."
    );
}

#[test]
fn reserved_words_and_descriptors_pass_through() {
    let output = run(&payroll_batch());
    let payroll = rewritten(&output, "src/PAYROLL.cbl");
    assert_eq!(payroll.lines[0], "000100 IDENTIFICATION DIVISION.");
    assert_eq!(payroll.lines[12], "001300 PROCEDURE DIVISION.");
    assert_eq!(payroll.lines[16], "001700     STOP RUN.");
    assert!(payroll.lines[10].ends_with(" PIC 9(4)."));
}
