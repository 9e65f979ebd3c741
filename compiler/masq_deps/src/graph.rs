//! Dependency graph over batch files and the processing order derived
//! from it.
//!
//! Every inclusion statement becomes an edge from the consuming file to the
//! batch file that supplies the fragment. A depth-first walk in input order
//! emits each file after everything it includes, so fragments are always
//! classified before their consumers.

use std::fmt;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use masq_diagnostic::{Diagnostic, ErrorCode, Location};

use crate::include::{IncludeStatement, Replacement};

/// A batch file and the inclusion statements found in it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileIncludes {
    pub path: PathBuf,
    pub includes: Vec<IncludeStatement>,
}

impl FileIncludes {
    pub fn new(path: impl Into<PathBuf>, includes: Vec<IncludeStatement>) -> Self {
        FileIncludes {
            path: path.into(),
            includes,
        }
    }
}

/// A resolved inclusion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IncludeEdge {
    /// Index of the consuming file.
    pub consumer: usize,
    /// Index of the file supplying the fragment.
    pub target: usize,
    pub fragment: String,
    pub library: Option<String>,
    pub replacing: Vec<Replacement>,
    pub line: u32,
    pub column: u32,
}

/// Fatal structural errors. Either one aborts the batch before any file is
/// rewritten.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DependencyError {
    /// Files include each other. The cycle starts and ends with the same
    /// file; `consumer` holds the inclusion that closes it.
    #[error(
        "{}:{line}: including '{fragment}' closes a circular dependency: {}",
        .consumer.display(),
        join_paths(.cycle)
    )]
    CircularDependency {
        cycle: Vec<PathBuf>,
        consumer: PathBuf,
        line: u32,
        column: u32,
        fragment: String,
    },
    #[error("{}:{line}: fragment '{fragment}' is not part of the batch", .consumer.display())]
    MissingFragment {
        consumer: PathBuf,
        line: u32,
        fragment: String,
    },
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

impl DependencyError {
    pub fn code(&self) -> ErrorCode {
        match self {
            DependencyError::CircularDependency { .. } => ErrorCode::E2001,
            DependencyError::MissingFragment { .. } => ErrorCode::E2002,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code()).with_message(self.to_string());
        match self {
            DependencyError::CircularDependency {
                consumer,
                line,
                column,
                ..
            } => diag.at(Location::new(
                consumer.display().to_string(),
                *line,
                *column,
            )),
            DependencyError::MissingFragment { consumer, line, .. } => {
                diag.at(Location::new(consumer.display().to_string(), *line, 1))
            }
        }
    }
}

/// Batch files in dependency order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProcessingOrder {
    files: Vec<PathBuf>,
}

impl ProcessingOrder {
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Position of a file in the order.
    pub fn position(&self, path: &Path) -> Option<usize> {
        self.files.iter().position(|p| p == path)
    }
}

impl fmt::Display for ProcessingOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join_paths(&self.files))
    }
}

/// Inclusion graph of a batch.
#[derive(Clone, Debug, Default)]
pub struct DependencyGraph {
    files: Vec<PathBuf>,
    /// Outgoing edges per file, in statement order.
    edges: Vec<Vec<IncludeEdge>>,
    /// Files included by at least one other file.
    fragments: FxHashSet<usize>,
}

impl DependencyGraph {
    /// Resolve every inclusion statement against the batch.
    ///
    /// A fragment resolves to a batch file whose stem equals the fragment
    /// name, ignoring case. When a library is named, a file whose parent
    /// directory matches it wins; otherwise the first match in input order
    /// is used.
    pub fn build(batch: &[FileIncludes]) -> Result<Self, DependencyError> {
        let files: Vec<PathBuf> = batch.iter().map(|f| f.path.clone()).collect();
        let mut edges = Vec::with_capacity(batch.len());
        let mut fragments = FxHashSet::default();

        for (consumer, file) in batch.iter().enumerate() {
            let mut out = Vec::with_capacity(file.includes.len());
            for statement in &file.includes {
                let target = resolve_fragment(&files, statement).ok_or_else(|| {
                    DependencyError::MissingFragment {
                        consumer: file.path.clone(),
                        line: statement.line,
                        fragment: statement.fragment.clone(),
                    }
                })?;
                trace!(
                    consumer = %file.path.display(),
                    fragment = %statement.fragment,
                    target = %files[target].display(),
                    "include edge"
                );
                fragments.insert(target);
                out.push(IncludeEdge {
                    consumer,
                    target,
                    fragment: statement.fragment.clone(),
                    library: statement.library.clone(),
                    replacing: statement.replacing.clone(),
                    line: statement.line,
                    column: statement.column,
                });
            }
            edges.push(out);
        }

        Ok(DependencyGraph {
            files,
            edges,
            fragments,
        })
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn index_of(&self, path: &Path) -> Option<usize> {
        self.files.iter().position(|p| p == path)
    }

    /// Resolved inclusions of a file, in statement order.
    pub fn edges(&self, path: &Path) -> &[IncludeEdge] {
        self.index_of(path)
            .and_then(|idx| self.edges.get(idx))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns `true` if another file includes this one.
    pub fn is_fragment(&self, path: &Path) -> bool {
        self.index_of(path)
            .is_some_and(|idx| self.fragments.contains(&idx))
    }

    /// Depth-first topological order. Dependencies come before the files
    /// that include them; ties keep input order.
    pub fn processing_order(&self) -> Result<ProcessingOrder, DependencyError> {
        let mut ctx = OrderContext::default();
        for idx in 0..self.files.len() {
            self.visit(idx, &mut ctx)?;
        }
        let files: Vec<PathBuf> = ctx.order.iter().map(|&i| self.files[i].clone()).collect();
        let order = ProcessingOrder { files };
        debug!(files = order.len(), order = %order, "processing order");
        Ok(order)
    }

    fn visit(&self, idx: usize, ctx: &mut OrderContext) -> Result<(), DependencyError> {
        if ctx.visited.contains(&idx) {
            return Ok(());
        }

        ctx.loading_stack.push(idx);
        for edge in &self.edges[idx] {
            if let Some(start) = ctx.loading_stack.iter().position(|&i| i == edge.target) {
                return Err(self.cycle_error(&ctx.loading_stack[start..], edge));
            }
            self.visit(edge.target, ctx)?;
        }
        ctx.loading_stack.pop();
        ctx.visited.insert(idx);
        ctx.order.push(idx);
        Ok(())
    }

    /// The cycle formed by `stack` and the back edge closing it.
    fn cycle_error(&self, stack: &[usize], back_edge: &IncludeEdge) -> DependencyError {
        let mut cycle: Vec<PathBuf> = stack.iter().map(|&i| self.files[i].clone()).collect();
        cycle.push(self.files[back_edge.target].clone());
        DependencyError::CircularDependency {
            cycle,
            consumer: self.files[back_edge.consumer].clone(),
            line: back_edge.line,
            column: back_edge.column,
            fragment: back_edge.fragment.clone(),
        }
    }
}

/// Walk state for [`DependencyGraph::processing_order`].
#[derive(Debug, Default)]
struct OrderContext {
    /// Files whose inclusions are being visited.
    loading_stack: Vec<usize>,
    /// Files already emitted.
    visited: FxHashSet<usize>,
    order: Vec<usize>,
}

fn resolve_fragment(files: &[PathBuf], statement: &IncludeStatement) -> Option<usize> {
    let stem_matches = |path: &PathBuf| {
        path.file_stem()
            .and_then(|s| s.to_str())
            .is_some_and(|s| s.eq_ignore_ascii_case(&statement.fragment))
    };

    if let Some(library) = &statement.library {
        let in_library = files.iter().position(|path| {
            stem_matches(path)
                && path
                    .parent()
                    .and_then(Path::file_name)
                    .and_then(|s| s.to_str())
                    .is_some_and(|dir| dir.eq_ignore_ascii_case(library))
        });
        if in_library.is_some() {
            return in_library;
        }
    }

    files.iter().position(stem_matches)
}
