//! The batch pipeline.
//!
//! ```text
//! SourceFile[] ──► pre-scan (parallel) ──► DependencyGraph ──► ProcessingOrder
//!                                                                   │
//!           ┌───────────────────────────────────────────────────────┘
//!           ▼
//!   per file, in order: classify ──► MappingTable::resolve ──► OverlayTracker::record
//!           │
//!           ▼
//!   OverlayTracker::resolve ──► Transformer (parallel) ──► BatchOutput
//! ```
//!
//! Ordering, classification and mapping run on one thread so the table is
//! filled in the same order on every run. Pre-scanning and rewriting only
//! read shared state and run over all files in parallel; their results are
//! collected in input order.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use rustc_hash::FxHashSet;
use tracing::{debug, trace, warn};

use masq_deps::{scan_includes, DependencyError, DependencyGraph, FileIncludes, ProcessingOrder};
use masq_diagnostic::{Diagnostic, DiagnosticQueue, ErrorCode, Location};
use masq_lexer::{LexWarning, LexedSource, ScanWarningKind};
use masq_names::{IdentifierCategory, MappingEntry, MappingError, MappingTable, SourceLocation};
use masq_rewrite::{classify, OverlayResolution, OverlayTracker, TransformError, Transformer};

use crate::config::AnonymizeConfig;
use crate::discovery::SourceFile;
use crate::error::AnonymizeError;

// ─── Output ────────────────────────────────────────────────────────────

/// A rewritten file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RewrittenFile {
    /// Input path.
    pub path: PathBuf,
    /// Where the rewritten text belongs. Fragments take their replacement
    /// name; other files keep theirs.
    pub output_path: PathBuf,
    pub lines: Vec<String>,
}

impl RewrittenFile {
    /// Lines joined with newlines, with a trailing newline.
    pub fn text(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }
}

/// Result of [`Anonymizer::run`].
#[derive(Clone, Debug, Default)]
pub struct BatchOutput {
    pub order: ProcessingOrder,
    /// Rewritten files in input order. Empty in preview mode.
    pub files: Vec<RewrittenFile>,
    /// Files whose rewrite failed, in input order.
    pub failed: Vec<PathBuf>,
    /// The mapping table after the batch, in insertion order.
    pub entries: Vec<MappingEntry>,
    /// Every diagnostic of the batch, sorted by location.
    pub diagnostics: Vec<Diagnostic>,
    /// Warnings left out of `diagnostics` by the warning limit.
    pub suppressed_warnings: usize,
    /// Overlays whose target was not found. They keep their declared
    /// position.
    pub degraded_overlays: usize,
    pub preview: bool,
}

impl BatchOutput {
    pub fn has_errors(&self) -> bool {
        !self.failed.is_empty() || self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn file(&self, path: &Path) -> Option<&RewrittenFile> {
        self.files.iter().find(|f| f.path == path)
    }
}

// ─── Anonymizer ────────────────────────────────────────────────────────

/// A pre-scanned input file.
#[derive(Debug)]
struct ScannedFile {
    path: PathBuf,
    /// `path` as shown in diagnostics and mapping locations.
    name: String,
    lexed: LexedSource,
}

/// Anonymizes batches of source files against one mapping table.
///
/// [`Anonymizer::run`] drives a whole batch. The individual phases are
/// public so callers can drive them step by step:
/// [`build_processing_order`](Anonymizer::build_processing_order), then
/// [`classify_and_map`](Anonymizer::classify_and_map) for every file in
/// order, [`resolve_overlays`](Anonymizer::resolve_overlays), and
/// [`transform`](Anonymizer::transform) per file.
#[derive(Debug)]
pub struct Anonymizer {
    config: AnonymizeConfig,
    table: MappingTable,
    tracker: OverlayTracker,
    /// Input order.
    sources: Vec<ScannedFile>,
    graph: Option<DependencyGraph>,
    order: Option<ProcessingOrder>,
    resolution: Option<OverlayResolution>,
    diagnostics: DiagnosticQueue,
}

impl Anonymizer {
    pub fn new(config: AnonymizeConfig) -> Self {
        let table = configure_table(MappingTable::new(config.strategy), &config);
        let tracker = OverlayTracker::new(config.overlay_scope);
        Anonymizer {
            table,
            tracker,
            sources: Vec::new(),
            graph: None,
            order: None,
            resolution: None,
            diagnostics: DiagnosticQueue::with_warning_limit(config.warning_limit),
            config,
        }
    }

    pub fn config(&self) -> &AnonymizeConfig {
        &self.config
    }

    pub fn table(&self) -> &MappingTable {
        &self.table
    }

    /// Overlays as last resolved.
    pub fn overlays(&self) -> Option<&OverlayResolution> {
        self.resolution.as_ref()
    }

    /// Diagnostics recorded since the last scan.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.peek()
    }

    // ─── Mapping state ─────────────────────────────────────────────────

    /// Continue from a persisted mapping table.
    ///
    /// The restored table keeps the strategy it was written with. The
    /// configured retry ceiling and never-rename identifiers apply on top.
    pub fn load_mapping_state(&mut self, bytes: &[u8]) -> Result<(), MappingError> {
        let table = MappingTable::restore(bytes)?;
        if table.strategy() != self.config.strategy {
            debug!(
                restored = %table.strategy(),
                configured = %self.config.strategy,
                "restored mapping state keeps its strategy"
            );
        }
        debug!(entries = table.len(), "mapping state loaded");
        self.table = configure_table(table, &self.config);
        Ok(())
    }

    pub fn export_mapping_state(&self) -> Result<Vec<u8>, MappingError> {
        self.table.persist()
    }

    // ─── Phases ────────────────────────────────────────────────────────

    /// Pre-scan a batch and order it so fragments come before the files
    /// that include them.
    ///
    /// Replaces any batch scanned earlier. The mapping table is kept.
    pub fn build_processing_order(
        &mut self,
        files: &[SourceFile],
    ) -> Result<ProcessingOrder, DependencyError> {
        let scanned: Vec<(ScannedFile, FileIncludes)> = files
            .par_iter()
            .map(|file| {
                let lexed = LexedSource::lex(&file.text);
                let includes = FileIncludes::new(file.path.clone(), scan_includes(&lexed));
                let scanned = ScannedFile {
                    path: file.path.clone(),
                    name: file.path.display().to_string(),
                    lexed,
                };
                (scanned, includes)
            })
            .collect();

        self.diagnostics = DiagnosticQueue::with_warning_limit(self.config.warning_limit);
        self.tracker = OverlayTracker::new(self.config.overlay_scope);
        self.resolution = None;
        self.graph = None;
        self.order = None;

        let mut batch = Vec::with_capacity(scanned.len());
        let mut sources = Vec::with_capacity(scanned.len());
        for (source, includes) in scanned {
            for warning in &source.lexed.warnings {
                if let Some(diag) = lex_diagnostic(&source.name, warning) {
                    self.report(diag);
                }
            }
            batch.push(includes);
            sources.push(source);
        }
        self.sources = sources;

        let graph = DependencyGraph::build(&batch)?;
        let order = graph.processing_order()?;
        for path in graph.files() {
            let fragments = graph
                .edges(path)
                .iter()
                .map(|edge| graph.files()[edge.target].display().to_string());
            self.tracker
                .record_includes(&path.display().to_string(), fragments);
        }
        self.graph = Some(graph);
        self.order = Some(order.clone());
        Ok(order)
    }

    /// Classify one file and resolve every name it declares.
    ///
    /// `position` is the file's index in the processing order; files must
    /// be classified in that order. A fragment's own name is resolved
    /// before its declarations. Returns the entries the file touched, in
    /// declaration order.
    pub fn classify_and_map(
        &mut self,
        file: &Path,
        position: usize,
    ) -> Result<Vec<MappingEntry>, AnonymizeError> {
        let order = self.order.as_ref().ok_or(AnonymizeError::NotScanned)?;
        let expected = order
            .position(file)
            .ok_or_else(|| AnonymizeError::UnknownFile(file.to_path_buf()))?;
        if expected != position {
            return Err(AnonymizeError::OutOfOrder {
                file: file.to_path_buf(),
                expected,
                found: position,
            });
        }
        let source = self
            .sources
            .iter()
            .find(|s| s.path == file)
            .ok_or_else(|| AnonymizeError::UnknownFile(file.to_path_buf()))?;

        let mut touched = Vec::new();
        let is_fragment = self.graph.as_ref().is_some_and(|g| g.is_fragment(file));
        if let Some(stem) = file.file_stem().and_then(|s| s.to_str()).filter(|_| is_fragment) {
            self.table
                .resolve(
                    stem,
                    IdentifierCategory::IncludedFragmentName,
                    &SourceLocation::new(source.name.clone(), 1),
                )
                .map_err(mapping_error(file, 1))?;
            touched.push(stem.to_ascii_uppercase());
        }

        let classification = classify(&source.lexed);
        for decl in &classification.declarations {
            let location = SourceLocation::new(source.name.clone(), decl.line);
            self.table
                .resolve(&decl.name, decl.category, &location)
                .map_err(mapping_error(file, decl.line))?;
            touched.push(decl.name.to_ascii_uppercase());
        }
        self.tracker.record(&source.name, &classification);
        self.resolution = None;

        let mut seen = FxHashSet::default();
        let entries: Vec<MappingEntry> = touched
            .iter()
            .filter(|key| seen.insert(key.as_str()))
            .filter_map(|key| self.table.entry(key).cloned())
            .collect();
        debug!(
            file = %source.name,
            position,
            declarations = classification.declarations.len(),
            overlays = classification.overlays.len(),
            mapped = entries.len(),
            "file classified"
        );
        Ok(entries)
    }

    /// Pair every recorded overlay with its target. Unresolved targets are
    /// reported as warnings.
    pub fn resolve_overlays(&mut self) -> &OverlayResolution {
        let resolution = self.tracker.resolve(&self.table);
        for diag in &resolution.diagnostics {
            self.report(diag.clone());
        }
        self.resolution.insert(resolution)
    }

    /// Rewrite one scanned file with the current table and overlays.
    pub fn transform(&self, file: &Path) -> Result<Vec<String>, AnonymizeError> {
        let source = self
            .sources
            .iter()
            .find(|s| s.path == file)
            .ok_or_else(|| AnonymizeError::UnknownFile(file.to_path_buf()))?;
        Ok(self.transformer().transform(&source.name, &source.lexed)?)
    }

    /// Where the rewritten text of a file belongs.
    pub fn output_path(&self, file: &Path) -> PathBuf {
        let is_fragment = self.graph.as_ref().is_some_and(|g| g.is_fragment(file));
        let renamed = file
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|_| is_fragment)
            .and_then(|stem| self.table.entry(stem))
            .filter(|e| e.category == IdentifierCategory::IncludedFragmentName);
        match renamed {
            Some(entry) => {
                let mut name = entry.replacement.clone();
                if let Some(ext) = file.extension().and_then(|e| e.to_str()) {
                    name.push('.');
                    name.push_str(ext);
                }
                file.with_file_name(name)
            }
            None => file.to_path_buf(),
        }
    }

    /// Run a whole batch.
    ///
    /// Dependency and naming errors abort the batch. A file whose rewrite
    /// overflows the code zone is reported and left out; the others are
    /// still produced.
    pub fn run(&mut self, files: &[SourceFile]) -> Result<BatchOutput, AnonymizeError> {
        let order = self.build_processing_order(files)?;
        for (position, file) in order.iter().enumerate() {
            self.classify_and_map(file, position)?;
        }
        self.resolve_overlays();

        let results: Vec<(PathBuf, Result<Vec<String>, TransformError>)> = {
            let transformer = self.transformer();
            self.sources
                .par_iter()
                .map(|s| (s.path.clone(), transformer.transform(&s.name, &s.lexed)))
                .collect()
        };

        let mut output = BatchOutput {
            order,
            preview: self.config.preview,
            ..BatchOutput::default()
        };
        for (path, result) in results {
            match result {
                Ok(lines) if self.config.preview => {
                    trace!(file = %path.display(), lines = lines.len(), "preview");
                }
                Ok(lines) => output.files.push(RewrittenFile {
                    output_path: self.output_path(&path),
                    path,
                    lines,
                }),
                Err(err) => {
                    self.report(err.to_diagnostic());
                    output.failed.push(path);
                }
            }
        }
        output.entries = self.table.entries().to_vec();
        output.degraded_overlays = self
            .resolution
            .as_ref()
            .map_or(0, OverlayResolution::degraded);
        output.suppressed_warnings = self.diagnostics.suppressed();
        output.diagnostics = self.diagnostics.flush();

        debug!(
            files = output.order.len(),
            rewritten = output.files.len(),
            failed = output.failed.len(),
            mappings = output.entries.len(),
            diagnostics = output.diagnostics.len(),
            suppressed = output.suppressed_warnings,
            preview = self.config.preview,
            "batch complete"
        );
        Ok(output)
    }

    fn transformer(&self) -> Transformer<'_> {
        let transformer = Transformer::new(&self.table);
        match &self.resolution {
            Some(resolution) => transformer.with_overlays(resolution),
            None => transformer,
        }
    }

    fn report(&mut self, diag: Diagnostic) {
        warn!(code = %diag.code, "{diag}");
        self.diagnostics.add(diag);
    }
}

fn mapping_error(file: &Path, line: u32) -> impl FnOnce(MappingError) -> AnonymizeError + '_ {
    move |source| AnonymizeError::Mapping {
        file: file.to_path_buf(),
        line,
        source,
    }
}

fn configure_table(table: MappingTable, config: &AnonymizeConfig) -> MappingTable {
    let mut table = table.with_retry_ceiling(config.retry_ceiling);
    for identifier in &config.never_rename {
        table.mark_never_rename(identifier);
    }
    table
}

/// Diagnostic for a lexing warning. Unrecognized characters are only
/// logged.
fn lex_diagnostic(file: &str, warning: &LexWarning) -> Option<Diagnostic> {
    let (code, message) = match &warning.kind {
        ScanWarningKind::UnterminatedLiteral => (
            ErrorCode::W0001,
            "literal is not closed before the end of the line".to_string(),
        ),
        ScanWarningKind::UnknownIndicator(c) => (
            ErrorCode::W0002,
            format!("unknown indicator '{c}'; line treated as code"),
        ),
        ScanWarningKind::UnknownLayoutDescriptor(err) => (
            ErrorCode::W0003,
            format!("layout descriptor not decoded: {err}"),
        ),
        ScanWarningKind::UnrecognizedCharacter(c) => {
            debug!(
                file,
                line = warning.line,
                column = warning.column,
                character = %c,
                "unrecognized character"
            );
            return None;
        }
    };
    Some(
        Diagnostic::warning(code)
            .with_message(message)
            .at(Location::new(file, warning.line, warning.column)),
    )
}
