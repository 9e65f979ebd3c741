//! Overlays keep sharing storage with their targets after renaming.

use pretty_assertions::assert_eq;

use masq_diagnostic::{ErrorCode, Location};
use masq_rewrite::{OverlayScope, StoragePosition};
use masqc::{AnonymizeConfig, Anonymizer};

use crate::common::{payroll_batch, replacement, rewritten, run_with, source};

const DATES: &[&str] = &[
    "01  DATE-REC.",
    "    05 DATE-TEXT PIC X(8).",
    "    05 DATE-NUM REDEFINES DATE-TEXT PIC 9(8).",
    "    05 DATE-PARTS REDEFINES",
    "       DATE-TEXT.",
    "       10 DATE-YYYY PIC 9(4).",
    "       10 DATE-MMDD PIC 9(4).",
    "    05 DATE-TAIL PIC X.",
];

#[test]
fn every_overlay_of_a_target_shares_its_position() {
    let mut anonymizer = Anonymizer::new(AnonymizeConfig::default());
    let output = anonymizer.run(&[source("DATES.cpy", DATES)]).unwrap();
    let resolution = anonymizer.overlays().unwrap();

    assert_eq!(resolution.overlays.len(), 2);
    assert_eq!(resolution.degraded(), 0);
    let target = replacement(&output, "DATE-TEXT");
    for overlay in &resolution.overlays {
        assert_eq!(overlay.position, StoragePosition::new("DATE-REC", 0));
        assert_eq!(overlay.replacements.target, target);
    }

    let lines = &rewritten(&output, "DATES.cpy").lines;
    assert_eq!(
        lines[2],
        format!(
            "000300     05 {} REDEFINES {target} PIC 9(8).",
            replacement(&output, "DATE-NUM")
        )
    );
    // The target on a line of its own is rewritten too.
    assert_eq!(lines[4], format!("000500        {target}."));
}

#[test]
fn batch_scope_reaches_into_fragments() {
    let mut anonymizer = Anonymizer::new(AnonymizeConfig::default());
    anonymizer.run(&payroll_batch()).unwrap();
    let resolution = anonymizer.overlays().unwrap();

    assert_eq!(resolution.overlays.len(), 2);
    for overlay in &resolution.overlays {
        assert!(!overlay.degraded);
        assert_eq!(overlay.relationship.target, "EMP-WAGE");
        assert_eq!(overlay.position, StoragePosition::new("", 6));
        assert_eq!(overlay.replacements.target, "D0000002");
    }
    assert!(resolution.diagnostics.is_empty());
}

#[test]
fn file_scope_degrades_fragment_targets() {
    let config = AnonymizeConfig::new().with_overlay_scope(OverlayScope::File);
    let mut anonymizer = Anonymizer::new(config.clone());
    anonymizer.run(&payroll_batch()).unwrap();
    assert_eq!(anonymizer.overlays().unwrap().degraded(), 2);

    let output = run_with(config, &payroll_batch());
    assert_eq!(output.degraded_overlays, 2);
    let warnings: Vec<(ErrorCode, Option<Location>)> = output
        .diagnostics
        .iter()
        .map(|d| (d.code, d.location.clone()))
        .collect();
    assert_eq!(
        warnings,
        vec![
            (ErrorCode::W0004, Some(Location::new("src/PAYROLL.cbl", 9, 36))),
            (ErrorCode::W0004, Some(Location::new("src/PAYROLL.cbl", 10, 36))),
        ]
    );
    // Degraded overlays are still renamed consistently.
    let payroll = rewritten(&output, "src/PAYROLL.cbl");
    assert!(payroll.lines[8].contains(" REDEFINES D0000002 "));
    assert!(!output.has_errors());
}

#[test]
fn batch_scope_only_reaches_included_fragments() {
    let files = vec![
        source(
            "A.cbl",
            &["01  A-REC.", "    05 A-LEAD PIC X(10).", "    05 WS-DATE PIC X(8)."],
        ),
        source(
            "B.cbl",
            &[
                "01  B-REC.",
                "    COPY DT.",
                "    05 WS-NUM REDEFINES WS-DATE PIC 9(8).",
            ],
        ),
        source("DT.cpy", &["    05 WS-DATE PIC X(8)."]),
    ];
    let mut anonymizer = Anonymizer::new(AnonymizeConfig::default());
    anonymizer.run(&files).unwrap();
    let resolution = anonymizer.overlays().unwrap();

    let overlay = &resolution.overlays[0];
    assert_eq!(overlay.relationship.file, "B.cbl");
    assert!(!overlay.degraded);
    assert_eq!(overlay.position, StoragePosition::new("", 0));
    assert_ne!(overlay.position, StoragePosition::new("A-REC", 10));
}
