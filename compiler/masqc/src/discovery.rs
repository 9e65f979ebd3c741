//! Source file discovery.
//!
//! Finds program and fragment files in a directory tree. Hidden entries and
//! build output directories are skipped.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::trace;

/// Extensions recognized as fixed-format sources, compared ignoring case.
pub const SOURCE_EXTENSIONS: &[&str] = &["cbl", "cob", "cpy", "ccp", "copy"];

/// A batch input file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub text: String,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        SourceFile {
            path: path.into(),
            text: text.into(),
        }
    }

    /// Read a file. Bytes that are not UTF-8 are replaced.
    pub fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = fs::read(path)?;
        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => {
                trace!(path = %path.display(), "lossy decode");
                String::from_utf8_lossy(err.as_bytes()).into_owned()
            }
        };
        Ok(SourceFile::new(path, text))
    }
}

/// Returns `true` if the path has a source extension.
pub fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.iter().any(|s| s.eq_ignore_ascii_case(ext)))
}

/// Discover every source file under `root`, sorted by path.
pub fn discover_sources(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    discover_recursive(root, &mut files);
    files.sort();
    files
}

fn discover_recursive(dir: &Path, files: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();

        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if name.starts_with('.') {
                continue;
            }
        }

        if path.is_dir() {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if matches!(name, "target" | "node_modules" | "masq-out") {
                    continue;
                }
            }
            discover_recursive(&path, files);
        } else if is_source_file(&path) {
            files.push(path);
        }
    }
}

/// Discover sources in a file or directory.
///
/// A file is returned as is when it has a source extension.
pub fn discover_sources_in(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        if is_source_file(path) {
            vec![path.to_path_buf()]
        } else {
            vec![]
        }
    } else if path.is_dir() {
        discover_sources(path)
    } else {
        vec![]
    }
}
