//! Classification and rewriting for masq.
//!
//! Per file, [`classify`] extracts declarations and overlays from the lexed
//! tokens. The caller feeds declarations to the mapping table and the
//! overlays to an [`OverlayTracker`]. Once the whole scope is classified,
//! [`OverlayTracker::resolve`] pairs overlays with their targets and a
//! [`Transformer`] rewrites each file against the finished table.

mod classify;
mod layout;
mod overlay;
mod transform;

pub use classify::{classify, Classification, Declaration, OverlayDeclaration};
pub use layout::{EntryShape, StorageLayout, StoragePosition};
pub use overlay::{
    OverlayRelationship, OverlayReplacements, OverlayResolution, OverlayScope, OverlayTracker,
    ResolvedOverlay,
};
pub use transform::{TransformError, Transformer};
