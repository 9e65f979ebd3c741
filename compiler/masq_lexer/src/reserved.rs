//! Reserved-word and system-name tables.
//!
//! Reserved words are never classified as renameable. The table is sorted so
//! lookups are a binary search over upper-cased text; a unit test keeps it
//! sorted.

/// Reserved words of the source language, sorted, upper case.
static RESERVED_WORDS: &[&str] = &[
    "ACCEPT", "ACCESS", "ADD", "ADDRESS", "ADVANCING", "AFTER", "ALL", "ALPHABET", "ALPHABETIC",
    "ALPHABETIC-LOWER", "ALPHABETIC-UPPER", "ALPHANUMERIC", "ALPHANUMERIC-EDITED", "ALSO",
    "ALTER", "ALTERNATE", "AND", "ANY", "APPLY", "ARE", "AREA", "AREAS", "ASCENDING", "ASSIGN",
    "AT", "AUTHOR", "BEFORE", "BEGINNING", "BINARY", "BLANK", "BLOCK", "BOTTOM", "BY", "CALL",
    "CANCEL", "CD", "CF", "CH", "CHARACTER", "CHARACTERS", "CLASS", "CLOCK-UNITS", "CLOSE",
    "COBOL", "CODE", "CODE-SET", "COLLATING", "COLUMN", "COMMA", "COMMON", "COMMUNICATION",
    "COMP", "COMP-1", "COMP-2", "COMP-3", "COMP-4", "COMP-5", "COMPUTATIONAL", "COMPUTATIONAL-1",
    "COMPUTATIONAL-2", "COMPUTATIONAL-3", "COMPUTATIONAL-4", "COMPUTATIONAL-5", "COMPUTE",
    "CONFIGURATION", "CONTAINS", "CONTENT", "CONTINUE", "CONTROL", "CONTROLS", "CONVERTING",
    "COPY", "CORR", "CORRESPONDING", "COUNT", "CURRENCY", "CURSOR", "DATA", "DATE",
    "DATE-COMPILED", "DATE-WRITTEN", "DAY", "DAY-OF-WEEK", "DBCS", "DE", "DEBUG-CONTENTS",
    "DEBUG-ITEM", "DEBUG-LINE", "DEBUG-NAME", "DEBUG-SUB-1", "DEBUG-SUB-2", "DEBUG-SUB-3",
    "DEBUGGING", "DECIMAL-POINT", "DECLARATIVES", "DELETE", "DELIMITED", "DELIMITER", "DEPENDING",
    "DESCENDING", "DESTINATION", "DETAIL", "DISABLE", "DISPLAY", "DISPLAY-1", "DIVIDE",
    "DIVISION", "DOWN", "DUPLICATES", "DYNAMIC", "EGI", "EJECT", "ELSE", "EMI", "ENABLE", "END",
    "END-ADD", "END-CALL", "END-COMPUTE", "END-DELETE", "END-DIVIDE", "END-EVALUATE", "END-EXEC",
    "END-IF", "END-INVOKE", "END-MULTIPLY", "END-OF-PAGE", "END-PERFORM", "END-READ",
    "END-RECEIVE", "END-RETURN", "END-REWRITE", "END-SEARCH", "END-START", "END-STRING",
    "END-SUBTRACT", "END-UNSTRING", "END-WRITE", "ENDING", "ENTER", "ENTRY", "ENVIRONMENT", "EOP",
    "EQUAL", "ERROR", "ESI", "EVALUATE", "EVERY", "EXCEPTION", "EXEC", "EXIT", "EXTEND",
    "EXTERNAL", "FALSE", "FD", "FILE", "FILE-CONTROL", "FILLER", "FINAL", "FIRST", "FOOTING",
    "FOR", "FROM", "FUNCTION", "FUNCTION-POINTER", "GENERATE", "GIVING", "GLOBAL", "GO", "GOBACK",
    "GREATER", "GROUP", "HEADING", "HIGH-VALUE", "HIGH-VALUES", "I-O", "I-O-CONTROL", "ID",
    "IDENTIFICATION", "IF", "IN", "INCLUDE", "INDEX", "INDEXED", "INDICATE", "INITIAL",
    "INITIALIZE", "INITIATE", "INPUT", "INPUT-OUTPUT", "INSERT", "INSPECT", "INSTALLATION",
    "INTO", "INVALID", "IS", "JUST", "JUSTIFIED", "KANJI", "KEY", "LABEL", "LAST", "LEADING",
    "LEFT", "LENGTH", "LESS", "LIMIT", "LIMITS", "LINAGE", "LINAGE-COUNTER", "LINE",
    "LINE-COUNTER", "LINES", "LINKAGE", "LOCAL-STORAGE", "LOCK", "LOW-VALUE", "LOW-VALUES",
    "MEMORY", "MERGE", "MESSAGE", "MODE", "MODULES", "MORE-LABELS", "MOVE", "MULTIPLE",
    "MULTIPLY", "NATIONAL", "NATIONAL-EDITED", "NATIVE", "NEGATIVE", "NEXT", "NO", "NOT", "NULL",
    "NULLS", "NUMBER", "NUMERIC", "NUMERIC-EDITED", "OBJECT-COMPUTER", "OCCURS", "OF", "OFF",
    "OMITTED", "ON", "OPEN", "OPTIONAL", "OR", "ORDER", "ORGANIZATION", "OTHER", "OUTPUT",
    "OVERFLOW", "PACKED-DECIMAL", "PADDING", "PAGE", "PAGE-COUNTER", "PASSWORD", "PERFORM", "PF",
    "PH", "PIC", "PICTURE", "PLUS", "POINTER", "POSITION", "POSITIVE", "PRINTING", "PROCEDURE",
    "PROCEDURE-POINTER", "PROCEDURES", "PROCEED", "PROGRAM", "PROGRAM-ID", "PURGE", "QUEUE",
    "QUOTE", "QUOTES", "RANDOM", "RD", "READ", "READY", "RECEIVE", "RECORD", "RECORDING",
    "RECORDS", "RECURSIVE", "REDEFINES", "REEL", "REFERENCE", "REFERENCES", "RELATIVE", "RELEASE",
    "RELOAD", "REMAINDER", "REMOVAL", "RENAMES", "REPLACE", "REPLACING", "REPORT", "REPORTING",
    "REPORTS", "RERUN", "RESERVE", "RESET", "RETURN", "RETURN-CODE", "RETURNING", "REVERSED",
    "REWIND", "REWRITE", "RF", "RH", "RIGHT", "ROUNDED", "RUN", "SAME", "SD", "SEARCH", "SECTION",
    "SECURITY", "SEGMENT", "SEGMENT-LIMIT", "SELECT", "SEND", "SENTENCE", "SEPARATE", "SEQUENCE",
    "SEQUENTIAL", "SET", "SHIFT-IN", "SHIFT-OUT", "SIGN", "SIZE", "SKIP1", "SKIP2", "SKIP3",
    "SORT", "SORT-CONTROL", "SORT-CORE-SIZE", "SORT-FILE-SIZE", "SORT-MERGE", "SORT-MESSAGE",
    "SORT-MODE-SIZE", "SORT-RETURN", "SOURCE", "SOURCE-COMPUTER", "SPACE", "SPACES",
    "SPECIAL-NAMES", "STANDARD", "STANDARD-1", "STANDARD-2", "START", "STATUS", "STOP", "STRING",
    "SUB-QUEUE-1", "SUB-QUEUE-2", "SUB-QUEUE-3", "SUBTRACT", "SUM", "SUPPRESS", "SYMBOLIC",
    "SYNC", "SYNCHRONIZED", "TABLE", "TALLY", "TALLYING", "TAPE", "TERMINAL", "TERMINATE", "TEST",
    "TEXT", "THAN", "THEN", "THROUGH", "THRU", "TIME", "TIMES", "TITLE", "TO", "TOP", "TRACE",
    "TRAILING", "TRUE", "TYPE", "UNIT", "UNSTRING", "UNTIL", "UP", "UPON", "USAGE", "USE",
    "USING", "VALUE", "VALUES", "VARYING", "WHEN", "WHEN-COMPILED", "WITH", "WORDS",
    "WORKING-STORAGE", "WRITE", "WRITE-ONLY", "ZERO", "ZEROES", "ZEROS",
];

/// Name prefixes owned by the platform (SQL precompiler, transaction monitor,
/// runtime library). Identifiers carrying them are never renamed.
pub const SYSTEM_PREFIXES: &[&str] = &["SQL", "DFH", "EIB", "CEE"];

/// Storage-usage words that may follow a picture string or stand alone.
static USAGE_WORDS: &[&str] = &[
    "BINARY",
    "COMP",
    "COMP-1",
    "COMP-2",
    "COMP-3",
    "COMP-4",
    "COMP-5",
    "COMPUTATIONAL",
    "COMPUTATIONAL-1",
    "COMPUTATIONAL-2",
    "COMPUTATIONAL-3",
    "COMPUTATIONAL-4",
    "COMPUTATIONAL-5",
    "DISPLAY",
    "DISPLAY-1",
    "FUNCTION-POINTER",
    "INDEX",
    "NATIONAL",
    "PACKED-DECIMAL",
    "POINTER",
    "PROCEDURE-POINTER",
];

/// Returns `true` if `word` is a reserved word (case-insensitive).
pub fn is_reserved(word: &str) -> bool {
    if word.is_empty() || word.len() > 24 {
        return false;
    }
    let upper = word.to_ascii_uppercase();
    RESERVED_WORDS.binary_search(&upper.as_str()).is_ok()
}

/// Returns `true` if `word` starts with a platform-owned prefix.
pub fn has_system_prefix(word: &str) -> bool {
    SYSTEM_PREFIXES.iter().any(|prefix| {
        word.len() >= prefix.len() && word[..prefix.len()].eq_ignore_ascii_case(prefix)
    })
}

/// Returns `true` if `word` names a storage usage (case-insensitive).
pub fn is_usage_word(word: &str) -> bool {
    USAGE_WORDS.iter().any(|usage| usage.eq_ignore_ascii_case(word))
}

/// Returns `true` for usage words that are only ever storage modifiers.
///
/// `DISPLAY`, `NATIONAL` and `INDEX` double as verbs or clause words, so they
/// are only protected when introduced by `USAGE` or a picture string.
pub fn is_standalone_usage(word: &str) -> bool {
    is_usage_word(word)
        && !["DISPLAY", "DISPLAY-1", "NATIONAL", "INDEX"]
            .iter()
            .any(|w| w.eq_ignore_ascii_case(word))
}
