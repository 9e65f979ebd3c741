//! Overlay tracking.
//!
//! Classification records every `REDEFINES` clause and the storage position
//! of every data item. Once the whole scope is classified, resolution pairs
//! each overlay with its target: both names get their replacements from the
//! mapping table and the overlay takes the target's position, so every
//! overlay of one target ends up at the same place.
//!
//! A target is looked up where the overlay could legally see it: earlier in
//! the declaring file, where the most recent declaration wins, and in batch
//! scope also in the fragments the file includes, directly or through other
//! fragments. A target that was never declared in scope cannot be positioned. The
//! overlay keeps the position it was declared at, is flagged degraded, and a
//! W0004 warning is produced.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

use masq_diagnostic::{Diagnostic, ErrorCode, Location};
use masq_names::MappingTable;

use crate::classify::Classification;
use crate::layout::StoragePosition;

/// Where overlay targets are looked up.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayScope {
    /// The declaring file first, then the fragments it includes in
    /// inclusion order.
    #[default]
    Batch,
    /// The declaring file only. Overlays whose target lives in an included
    /// fragment come out degraded.
    File,
}

/// An overlay as recorded during classification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverlayRelationship {
    pub file: String,
    /// Upper-cased overlay name.
    pub overlay: String,
    /// Upper-cased target name.
    pub target: String,
    pub nesting_depth: u32,
    pub declared: StoragePosition,
    /// Target position found earlier in the declaring file.
    pub local_target: Option<StoragePosition>,
    /// Line of the target token.
    pub line: u32,
    /// Source column of the target token.
    pub column: u32,
}

/// Replacement names of an overlay and its target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverlayReplacements {
    pub overlay: String,
    pub target: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedOverlay {
    pub relationship: OverlayRelationship,
    pub replacements: OverlayReplacements,
    pub position: StoragePosition,
    /// The target was not found; `position` is the declared one.
    pub degraded: bool,
}

/// Outcome of [`OverlayTracker::resolve`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OverlayResolution {
    pub overlays: Vec<ResolvedOverlay>,
    pub diagnostics: Vec<Diagnostic>,
}

impl OverlayResolution {
    /// Resolved overlays declared in one file.
    pub fn in_file<'a>(&'a self, file: &'a str) -> impl Iterator<Item = &'a ResolvedOverlay> + 'a {
        self.overlays
            .iter()
            .filter(move |o| o.relationship.file == file)
    }

    pub fn degraded(&self) -> usize {
        self.overlays.iter().filter(|o| o.degraded).count()
    }
}

/// Overlay declarations and data positions of a scope.
#[derive(Clone, Debug, Default)]
pub struct OverlayTracker {
    scope: OverlayScope,
    relationships: Vec<OverlayRelationship>,
    /// Per file, upper-cased data name to its last position.
    positions: FxHashMap<String, FxHashMap<String, StoragePosition>>,
    /// Per file, the fragment files it includes in statement order.
    includes: FxHashMap<String, Vec<String>>,
}

impl OverlayTracker {
    pub fn new(scope: OverlayScope) -> Self {
        OverlayTracker {
            scope,
            ..Self::default()
        }
    }

    pub fn scope(&self) -> OverlayScope {
        self.scope
    }

    pub fn relationships(&self) -> &[OverlayRelationship] {
        &self.relationships
    }

    /// Record the overlays and positions of a classified file. Recording the
    /// same file again replaces its earlier record.
    pub fn record(&mut self, file: &str, classification: &Classification) {
        self.relationships.retain(|r| r.file != file);
        self.relationships
            .extend(classification.overlays.iter().map(|o| OverlayRelationship {
                file: file.to_string(),
                overlay: o.overlay.clone(),
                target: o.target.clone(),
                nesting_depth: o.nesting_depth,
                declared: o.declared.clone(),
                local_target: o.target_position.clone(),
                line: o.line,
                column: o.column,
            }));

        let positions = classification
            .positions()
            .map(|(name, position)| (name.to_ascii_uppercase(), position.clone()))
            .collect();
        self.positions.insert(file.to_string(), positions);
    }

    /// Record the fragment files `file` includes, in statement order.
    pub fn record_includes<I, S>(&mut self, file: &str, fragments: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.includes.insert(
            file.to_string(),
            fragments.into_iter().map(Into::into).collect(),
        );
    }

    /// Last declared position of a data item in one file.
    pub fn position_of(&self, file: &str, name: &str) -> Option<&StoragePosition> {
        self.positions
            .get(file)
            .and_then(|p| p.get(&name.to_ascii_uppercase()))
    }

    /// Fragments reachable from `file`, depth first in inclusion order.
    pub fn included_fragments(&self, file: &str) -> Vec<&str> {
        let mut seen = FxHashSet::default();
        let mut out = Vec::new();
        let mut stack: Vec<&str> = self
            .includes
            .get(file)
            .map(|f| f.iter().rev().map(String::as_str).collect())
            .unwrap_or_default();
        seen.insert(file);
        while let Some(fragment) = stack.pop() {
            if !seen.insert(fragment) {
                continue;
            }
            out.push(fragment);
            if let Some(nested) = self.includes.get(fragment) {
                stack.extend(nested.iter().rev().map(String::as_str));
            }
        }
        out
    }

    fn target_position<'a>(
        &'a self,
        relationship: &'a OverlayRelationship,
    ) -> Option<&'a StoragePosition> {
        if let Some(local) = &relationship.local_target {
            return Some(local);
        }
        match self.scope {
            OverlayScope::File => None,
            OverlayScope::Batch => self
                .included_fragments(&relationship.file)
                .into_iter()
                .find_map(|fragment| self.position_of(fragment, &relationship.target)),
        }
    }

    /// Pair every recorded overlay with its target.
    pub fn resolve(&self, table: &MappingTable) -> OverlayResolution {
        let mut resolution = OverlayResolution::default();
        for relationship in &self.relationships {
            let replacements = OverlayReplacements {
                overlay: replacement(table, &relationship.overlay),
                target: replacement(table, &relationship.target),
            };
            let target_position = self.target_position(relationship);
            let degraded = target_position.is_none();
            if degraded {
                resolution.diagnostics.push(
                    Diagnostic::warning(ErrorCode::W0004)
                        .with_message(format!(
                            "overlay target '{}' of '{}' is not declared",
                            relationship.target, relationship.overlay
                        ))
                        .at(Location::new(
                            relationship.file.clone(),
                            relationship.line,
                            relationship.column,
                        ))
                        .with_note(format!(
                            "the overlay keeps its declared position, offset {} of '{}'",
                            relationship.declared.offset, relationship.declared.record
                        )),
                );
            }
            resolution.overlays.push(ResolvedOverlay {
                relationship: relationship.clone(),
                replacements,
                position: target_position
                    .cloned()
                    .unwrap_or_else(|| relationship.declared.clone()),
                degraded,
            });
        }
        debug!(
            overlays = resolution.overlays.len(),
            degraded = resolution.degraded(),
            scope = ?self.scope,
            "overlays resolved"
        );
        resolution
    }
}

fn replacement(table: &MappingTable, name: &str) -> String {
    table
        .lookup(name)
        .map_or_else(|| name.to_string(), str::to_string)
}
