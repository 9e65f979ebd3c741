use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use IdentifierCategory::{CrossProgramName, DataName, ProgramName, SystemReserved};

fn at(file: &str, line: u32) -> SourceLocation {
    SourceLocation::new(file, line)
}

// === Resolution ===

#[test]
fn counter_example_from_seventh_data_name() {
    let mut table = MappingTable::new(StrategyKind::Counter);
    for i in 1..=6 {
        table.resolve(&format!("FIELD-{i}"), DataName, &at("A.cbl", i)).unwrap();
    }
    let name = table.resolve("CUSTOMER-NAME", DataName, &at("A.cbl", 7)).unwrap();
    assert_eq!(name, "D000000000007");
}

#[test]
fn vocabulary_example_from_seventh_data_name() {
    let mut table = MappingTable::new(StrategyKind::Vocabulary);
    for i in 1..=6 {
        table.resolve(&format!("FIELD-{i}"), DataName, &at("A.cbl", i)).unwrap();
    }
    let name = table.resolve("CUSTOMER-NAME", DataName, &at("A.cbl", 7)).unwrap();
    assert_eq!(name, "YOUNG-SPARR-7");
}

#[test]
fn resolve_is_idempotent_and_case_insensitive() {
    let mut table = MappingTable::new(StrategyKind::Counter);
    let first = table.resolve("Customer-Name", DataName, &at("A.cbl", 10)).unwrap();
    let second = table.resolve("CUSTOMER-NAME", DataName, &at("B.cbl", 3)).unwrap();
    assert_eq!(first, second);
    assert_eq!(table.len(), 1);

    let entry = table.entry("customer-name").unwrap();
    assert_eq!(entry.original, "CUSTOMER-NAME");
    assert_eq!(entry.occurrences, 2);
    assert_eq!(entry.first_seen, at("A.cbl", 10));
}

#[test]
fn lookup_does_not_count() {
    let mut table = MappingTable::new(StrategyKind::Counter);
    let name = table.resolve("TOTAL", DataName, &at("A.cbl", 1)).unwrap();
    assert_eq!(table.lookup("total"), Some(name.as_str()));
    assert_eq!(table.lookup("TOTAL"), Some(name.as_str()));
    assert_eq!(table.entry("TOTAL").unwrap().occurrences, 1);
    assert_eq!(table.lookup("UNKNOWN"), None);
}

#[test]
fn shared_external_record_counts_both_programs() {
    let mut table = MappingTable::new(StrategyKind::Counter);
    let a = table.resolve("SHARED-AREA", CrossProgramName, &at("PROGA.cbl", 8)).unwrap();
    let b = table.resolve("SHARED-AREA", CrossProgramName, &at("PROGB.cbl", 12)).unwrap();
    assert_eq!(a, b);
    assert!(a.starts_with("XP"));

    let entry = table.entry("SHARED-AREA").unwrap();
    assert_eq!(entry.occurrences, 2);
    assert!(entry.external);
}

#[test]
fn frozen_identifiers_pass_through() {
    let mut table = MappingTable::new(StrategyKind::Counter);
    table.mark_never_rename("keep-me");

    assert_eq!(table.resolve("KEEP-ME", DataName, &at("A.cbl", 1)).unwrap(), "KEEP-ME");
    assert_eq!(table.resolve("SQLCODE", DataName, &at("A.cbl", 2)).unwrap(), "SQLCODE");
    assert_eq!(table.resolve("MOVE", DataName, &at("A.cbl", 3)).unwrap(), "MOVE");
    assert_eq!(
        table.resolve("RUNTIME-HOOK", SystemReserved, &at("A.cbl", 4)).unwrap(),
        "RUNTIME-HOOK"
    );
    assert!(table.is_empty());
}

#[test]
fn program_names_use_the_short_bound() {
    let mut table = MappingTable::new(StrategyKind::Counter);
    let name = table
        .resolve("PAYROLL-MONTHLY-BATCH", ProgramName, &at("PAYROLL.cbl", 2))
        .unwrap();
    assert_eq!(name, "PG000001");
}

// === Collisions ===

#[test]
fn candidate_equal_to_mapped_original_is_skipped() {
    let mut table = MappingTable::new(StrategyKind::Counter);
    assert_eq!(table.resolve("D0002", DataName, &at("A.cbl", 1)).unwrap(), "D0001");
    assert_eq!(table.resolve("ABCDE", DataName, &at("A.cbl", 2)).unwrap(), "D0003");
    assert_eq!(table.counter(DataName), 3);
}

#[test]
fn exhausted_after_retry_ceiling() {
    let mut table = MappingTable::new(StrategyKind::Counter).with_retry_ceiling(1);
    table.mark_never_rename("D0001");
    let err = table.resolve("ABCDE", DataName, &at("A.cbl", 1)).unwrap_err();
    assert_eq!(
        err,
        MappingError::Exhausted {
            identifier: "ABCDE".to_string(),
            category: DataName,
            attempts: 1,
        }
    );
    assert!(table.is_empty());
}

#[test]
fn never_rename_after_mapping_keeps_mapping() {
    let mut table = MappingTable::new(StrategyKind::Counter);
    let name = table.resolve("TOTAL", DataName, &at("A.cbl", 1)).unwrap();
    table.mark_never_rename("TOTAL");
    assert_eq!(table.resolve("TOTAL", DataName, &at("B.cbl", 1)).unwrap(), name);
}

// === Persistence ===

#[test]
fn persist_restore_continues_the_session() {
    let mut table = MappingTable::new(StrategyKind::Vocabulary);
    let total = table.resolve("TOTAL-AMOUNT", DataName, &at("A.cbl", 4)).unwrap();
    let prog = table.resolve("PAYROLL", ProgramName, &at("A.cbl", 2)).unwrap();
    table.mark_never_rename("LEGACY-HOOK");

    let bytes = table.persist().unwrap();
    let mut restored = MappingTable::restore(&bytes).unwrap();

    assert_eq!(restored.strategy(), StrategyKind::Vocabulary);
    assert_eq!(restored.entries(), table.entries());
    assert_eq!(restored.resolve("total-amount", DataName, &at("B.cbl", 9)).unwrap(), total);
    assert_eq!(restored.lookup("PAYROLL"), Some(prog.as_str()));
    assert!(restored.is_frozen("LEGACY-HOOK"));

    // Counters continue instead of restarting.
    let next = restored.resolve("OTHER-FIELD", DataName, &at("B.cbl", 10)).unwrap();
    assert_ne!(next, total);
    assert_eq!(restored.counter(DataName), 2);
}

#[test]
fn persisted_bytes_are_deterministic() {
    let build = || {
        let mut table = MappingTable::new(StrategyKind::Counter);
        for (i, name) in ["A-ONE", "B-TWO", "C-THREE"].iter().enumerate() {
            table.resolve(name, DataName, &at("X.cbl", 1 + i as u32)).unwrap();
        }
        table.mark_never_rename("Z");
        table.mark_never_rename("Y");
        table.persist().unwrap()
    };
    assert_eq!(build(), build());
}

#[test]
fn restore_rejects_duplicate_replacements() {
    let entry = |original: &str| MappingEntry {
        original: original.to_string(),
        replacement: "D0001".to_string(),
        category: DataName,
        first_seen: at("A.cbl", 1),
        occurrences: 1,
        external: false,
    };
    let state = MappingState {
        version: STATE_VERSION,
        strategy: StrategyKind::Counter,
        entries: vec![entry("ABCDE"), entry("FGHIJ")],
        counters: vec![(DataName, 1)],
        never_rename: Vec::new(),
    };
    assert!(matches!(
        MappingTable::from_state(state),
        Err(MappingError::Inconsistent(_))
    ));
}

#[test]
fn restore_rejects_other_versions_and_garbage() {
    let mut state = MappingTable::new(StrategyKind::Counter).to_state();
    state.version = STATE_VERSION + 1;
    assert_eq!(
        MappingTable::from_state(state).unwrap_err(),
        MappingError::Version {
            found: STATE_VERSION + 1,
            expected: STATE_VERSION,
        }
    );

    assert!(matches!(
        MappingTable::restore(&[0xff, 0x01]),
        Err(MappingError::Decode(_))
    ));
}

proptest! {
    #[test]
    fn replacements_are_unique_and_valid(
        names in proptest::collection::btree_set("[A-Z][A-Z0-9-]{0,14}[A-Z0-9]", 1..40),
        vocabulary in any::<bool>(),
    ) {
        let strategy = if vocabulary { StrategyKind::Vocabulary } else { StrategyKind::Counter };
        let mut table = MappingTable::new(strategy);
        let mut seen = std::collections::HashSet::new();
        for name in &names {
            if table.is_frozen(name) {
                continue;
            }
            let replacement = table.resolve(name, DataName, &at("P.cbl", 1)).unwrap();
            prop_assert!(check_shape(&replacement, DataName).is_ok());
            prop_assert!(seen.insert(replacement));
        }
    }
}
