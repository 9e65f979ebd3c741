//! Fixed-format columns survive renaming.

use std::path::PathBuf;

use pretty_assertions::assert_eq;

use masq_diagnostic::{ErrorCode, Location};
use masq_names::StrategyKind;
use masqc::AnonymizeConfig;

use crate::common::{identified_source, rewritten, run, run_with};

const BILLING: &[&str] = &[
    "IDENTIFICATION DIVISION.",
    "PROGRAM-ID. BILLING.",
    "DATA DIVISION.",
    "WORKING-STORAGE SECTION.",
    "01  AMT-REC.",
    "    05 X PIC 9(4).",
    "    05 Y PIC 9(4).",
    "    05 TOTAL-AMOUNT-DUE PIC 9(6).",
    "PROCEDURE DIVISION.",
    "CALC-PARA.",
    "    ADD X Y GIVING TOTAL-AMOUNT-DUE.",
    "    MOVE X     TO Y.",
    "    STOP RUN.",
];

#[test]
fn zones_outside_the_code_zone_are_untouched() {
    for strategy in [StrategyKind::Counter, StrategyKind::Vocabulary] {
        let mut file = identified_source("BILLING.cbl", "BILL0001", BILLING);
        file.text.push_str("001400*    X AND Y STAY AS WRITTEN\n");
        let input: Vec<String> = file.text.lines().map(str::to_string).collect();

        let output = run_with(AnonymizeConfig::new().with_strategy(strategy), &[file]);
        let lines = &rewritten(&output, "BILLING.cbl").lines;
        assert_eq!(lines.len(), input.len());

        for (before, after) in input.iter().zip(lines) {
            assert_eq!(after.len(), before.len(), "{strategy}: {after}");
            assert_eq!(after[..7], before[..7]);
            assert_eq!(after.get(72..), before.get(72..));
        }
        assert_eq!(lines[13], "001400*    X AND Y STAY AS WRITTEN");
    }
}

#[test]
fn growth_is_absorbed_by_following_blanks() {
    let output = run(&[identified_source("BILLING.cbl", "BILL0001", BILLING)]);
    let lines = &rewritten(&output, "BILLING.cbl").lines;
    // X and Y take two-character names; the run of blanks after X shrinks.
    assert_eq!(lines[11].trim_end_matches("BILL0001").trim_end(), "001200     MOVE D2    TO D3.");
    assert_eq!(&lines[11][72..], "BILL0001");
}

#[test]
fn overflow_fails_only_that_file() {
    let long = format!("    MOVE X TO {}.", "B".repeat(50));
    let wide = identified_source(
        "WIDE.cbl",
        "WIDE0001",
        &["01  X PIC X.", "PROCEDURE DIVISION.", long.as_str()],
    );
    let narrow = identified_source("BILLING.cbl", "BILL0001", BILLING);

    let output = run(&[wide, narrow]);
    assert_eq!(output.failed, vec![PathBuf::from("WIDE.cbl")]);
    assert_eq!(output.files.len(), 1);
    assert_eq!(output.files[0].path, PathBuf::from("BILLING.cbl"));

    let errors: Vec<(ErrorCode, Option<Location>)> = output
        .diagnostics
        .iter()
        .filter(|d| d.is_error())
        .map(|d| (d.code, d.location.clone()))
        .collect();
    assert_eq!(
        errors,
        vec![(ErrorCode::E3001, Some(Location::new("WIDE.cbl", 3, 17)))]
    );
}
