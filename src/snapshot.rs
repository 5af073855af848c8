//! Interface shapes shared with the undo/history collaborator.
//!
//! A snapshot is owned and persisted by the surrounding editor; this crate
//! only ever interprets the `selection` sub-shape, turning it back into
//! projected selection state when a snapshot is restored. The `html` and
//! `known_colors` payloads pass through untouched.

use serde::{Deserialize, Serialize};

use crate::model::path::{block_ref, cell_ref, segment_ref};
use crate::model::{Block, Document, PathStep, SegmentKind, SelectablePath};
use crate::selection::project;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityState {
    pub id: String,
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub html: String,
    pub known_colors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_states: Option<Vec<EntityState>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<SelectionDescriptor>,
}

/// A serialized selection: a text range, a cell rectangle, or a single
/// image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SelectionDescriptor {
    #[serde(rename_all = "camelCase")]
    Range {
        start: SelectablePath,
        end: SelectablePath,
    },
    #[serde(rename_all = "camelCase")]
    Table {
        table: SelectablePath,
        first_row: usize,
        first_column: usize,
        last_row: usize,
        last_column: usize,
    },
    #[serde(rename_all = "camelCase")]
    Image { image: SelectablePath },
}

/// Projects a restored selection descriptor onto the document.
///
/// Returns false without touching the tree when the descriptor's addresses
/// no longer resolve, which happens routinely after structural edits made
/// since the snapshot was taken.
pub fn apply_selection_descriptor(document: &mut Document, descriptor: &SelectionDescriptor) -> bool {
    match descriptor {
        SelectionDescriptor::Range { start, end } => {
            if !resolves(document, start) || !resolves(document, end) {
                return false;
            }
            project(document, Some(start), Some(end));
            true
        }
        SelectionDescriptor::Table {
            table,
            first_row,
            first_column,
            last_row,
            last_column,
        } => {
            let start = table.child_cell(*first_row, *first_column);
            let end = table.child_cell(*last_row, *last_column);
            if !resolves(document, &start) || !resolves(document, &end) {
                return false;
            }
            project(document, Some(&start), Some(&end));
            true
        }
        SelectionDescriptor::Image { image } => {
            let is_image = segment_ref(document, image.steps())
                .is_some_and(|segment| matches!(segment.kind, SegmentKind::Image { .. }));
            if !is_image {
                return false;
            }
            project(document, Some(image), None);
            true
        }
    }
}

/// Whether a selectable address still points at a selectable node.
fn resolves(document: &Document, path: &SelectablePath) -> bool {
    match path.steps().last() {
        Some(PathStep::Segment(_)) => segment_ref(document, path.steps()).is_some(),
        Some(PathStep::Cell { .. }) => cell_ref(document, path.steps()).is_some(),
        Some(PathStep::Block(_)) => matches!(
            block_ref(document, path.steps()),
            Some(Block::Divider { .. }) | Some(Block::Entity { .. })
        ),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Paragraph, Segment, Table};

    fn two_paragraph_document() -> Document {
        Document::new().with_blocks(vec![
            Block::Paragraph(Paragraph::new().with_segments(vec![
                Segment::text("alpha"),
                Segment::text("beta"),
            ])),
            Block::Paragraph(Paragraph::new().with_segments(vec![Segment::text("gamma")])),
        ])
    }

    #[test]
    fn snapshot_round_trips_as_json() {
        let snapshot = Snapshot {
            html: "<p>hi</p>".to_string(),
            known_colors: vec!["#ABABAB".to_string()],
            entity_states: None,
            selection: Some(SelectionDescriptor::Range {
                start: SelectablePath::new_block(0).child_segment(0),
                end: SelectablePath::new_block(1).child_segment(0),
            }),
        };
        let raw = serde_json::to_string(&snapshot).unwrap();
        let back: Snapshot = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn range_descriptor_projects_selection() {
        let mut document = two_paragraph_document();
        let descriptor = SelectionDescriptor::Range {
            start: SelectablePath::new_block(0).child_segment(1),
            end: SelectablePath::new_block(1).child_segment(0),
        };
        assert!(apply_selection_descriptor(&mut document, &descriptor));
        let Block::Paragraph(first) = &document.blocks[0] else {
            panic!("expected paragraph");
        };
        assert!(!first.segments[0].is_selected);
        assert!(first.segments[1].is_selected);
    }

    #[test]
    fn stale_descriptor_is_rejected_without_mutation() {
        let mut document = two_paragraph_document();
        let descriptor = SelectionDescriptor::Range {
            start: SelectablePath::new_block(5).child_segment(0),
            end: SelectablePath::new_block(6).child_segment(0),
        };
        let before = document.clone();
        assert!(!apply_selection_descriptor(&mut document, &descriptor));
        assert_eq!(document, before);
    }

    #[test]
    fn table_descriptor_marks_the_rectangle() {
        let mut table = Table::new(3, 3);
        crate::table::normalize::normalize_table(&mut table, None);
        let mut document = Document::new().with_blocks(vec![Block::Table(table)]);
        let descriptor = SelectionDescriptor::Table {
            table: SelectablePath::new_block(0),
            first_row: 0,
            first_column: 1,
            last_row: 1,
            last_column: 2,
        };
        assert!(apply_selection_descriptor(&mut document, &descriptor));
        let Block::Table(table) = &document.blocks[0] else {
            panic!("expected table");
        };
        let selected = crate::table::collect_selected_cells(table);
        assert_eq!(selected.len(), 4);
        assert!(!table.rows[0].cells[0].is_selected);
        assert!(table.rows[1].cells[2].is_selected);
    }

    #[test]
    fn image_descriptor_requires_an_image() {
        let mut document = two_paragraph_document();
        let descriptor = SelectionDescriptor::Image {
            image: SelectablePath::new_block(0).child_segment(0),
        };
        assert!(!apply_selection_descriptor(&mut document, &descriptor));
    }
}
