//! Shared batch fixtures.

use masqc::{AnonymizeConfig, Anonymizer, BatchOutput, RewrittenFile, SourceFile};
use std::path::Path;

/// A source file whose lines are numbered 000100, 000200, ...
pub fn source(path: &str, lines: &[&str]) -> SourceFile {
    let text: String = lines
        .iter()
        .enumerate()
        .map(|(i, code)| format!("{:06} {code}\n", (i + 1) * 100))
        .collect();
    SourceFile::new(path, text)
}

/// A source file with every line padded to column 72 and `ident` in the
/// identification zone.
pub fn identified_source(path: &str, ident: &str, lines: &[&str]) -> SourceFile {
    let text: String = lines
        .iter()
        .enumerate()
        .map(|(i, code)| format!("{:06} {code:<65}{ident}\n", (i + 1) * 100))
        .collect();
    SourceFile::new(path, text)
}

pub fn run(files: &[SourceFile]) -> BatchOutput {
    run_with(AnonymizeConfig::default(), files)
}

pub fn run_with(config: AnonymizeConfig, files: &[SourceFile]) -> BatchOutput {
    Anonymizer::new(config).run(files).unwrap()
}

pub fn replacement<'a>(output: &'a BatchOutput, original: &str) -> &'a str {
    output
        .entries
        .iter()
        .find(|e| e.original == original)
        .map(|e| e.replacement.as_str())
        .unwrap_or_else(|| panic!("'{original}' is not mapped"))
}

pub fn rewritten<'a>(output: &'a BatchOutput, path: &str) -> &'a RewrittenFile {
    output
        .file(Path::new(path))
        .unwrap_or_else(|| panic!("'{path}' was not rewritten"))
}

pub const EMPFLDS: &[&str] = &["    05 EMP-ID PIC 9(6).", "    05 EMP-WAGE PIC 9(6)."];

pub const PAYROLL: &[&str] = &[
    "IDENTIFICATION DIVISION.",
    "PROGRAM-ID. PAYROLL.",
    "DATA DIVISION.",
    "WORKING-STORAGE SECTION.",
    "01  SHARED-AREA EXTERNAL.",
    "    05 SHARED-TOTAL PIC 9(4).",
    "01  EMP-REC.",
    "    COPY EMPFLDS.",
    "    05 EMP-WAGE-X REDEFINES EMP-WAGE PIC X(6).",
    "    05 EMP-WAGE-P REDEFINES EMP-WAGE.",
    "       10 EMP-DOLLARS PIC 9(4).",
    "       10 EMP-CENTS PIC 9(2).",
    "PROCEDURE DIVISION.",
    "MAIN-PARA.",
    "    MOVE 0 TO SHARED-TOTAL.",
    "    CALL 'REPORTER' USING EMP-REC.",
    "    STOP RUN.",
];

pub const REPORTER: &[&str] = &[
    "IDENTIFICATION DIVISION.",
    "PROGRAM-ID. REPORTER.",
    "DATA DIVISION.",
    "WORKING-STORAGE SECTION.",
    "01  SHARED-AREA EXTERNAL.",
    "    05 SHARED-TOTAL PIC 9(4).",
    "LINKAGE SECTION.",
    "01  LK-REC PIC X(40).",
    "PROCEDURE DIVISION USING LK-REC.",
    "MAIN-PARA.",
    "    ADD 1 TO SHARED-TOTAL.",
    "    GOBACK.",
];

/// Two programs sharing an external record, one including a fragment.
pub fn payroll_batch() -> Vec<SourceFile> {
    vec![
        source("src/PAYROLL.cbl", PAYROLL),
        source("src/REPORTER.cbl", REPORTER),
        source("copy/EMPFLDS.cpy", EMPFLDS),
    ]
}
