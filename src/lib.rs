//! An in-memory content model for rich-text editing.
//!
//! The model is a serializable owned tree of documents, blocks, table
//! cells, and segments. Around it sit four engines that mutate the tree in
//! place while preserving its structural invariants:
//!
//! - [`selection::project`] marks the closed document-order range between
//!   two selectable addresses, including rectangular table selection.
//! - [`table::normalize_table`] repairs a table after structural edits:
//!   span collapse, placeholder synthesis, width/height floors.
//! - [`table::apply_table_format`] derives per-cell borders, shading, and
//!   header classification from a table-level descriptor.
//! - [`merge::merge`] splices a source document fragment into a target at
//!   the caret, splitting paragraphs, lists, and tables as needed.
//!
//! Everything is synchronous and single-threaded; the caller owns
//! serialization of operations and the undo history. A failed precondition
//! is a no-op (`None`), never a panic.

pub mod merge;
pub mod metadata;
pub mod model;
pub mod normalize;
pub mod selection;
pub mod snapshot;
pub mod table;

pub use merge::{InsertPoint, MergeOptions, TableContext, find_insert_point, merge};
pub use metadata::{TableBorderStyle, TableMetadataFormat};
pub use model::{
    Block, Document, ListItem, ListLevel, ListType, Paragraph, PathStep, Segment, SegmentKind,
    SelectablePath,
};
pub use normalize::normalize_document;
pub use selection::{clear_selection, project};
pub use snapshot::{SelectionDescriptor, Snapshot, apply_selection_descriptor};
pub use table::{CellCoordinates, apply_table_format, find_cell_coordinates, normalize_table};

/// Returns the crate version at compile time.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
