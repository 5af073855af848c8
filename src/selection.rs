//! Selection projection.
//!
//! A selection is described from the outside as a pair of selectable
//! addresses. Projection walks the tree in document order and rewrites
//! every node's `is_selected` flag so that exactly the closed range between
//! the two endpoints is marked. The walk threads an explicit "inside the
//! selection" boolean down and back up the recursion; a node's own flag and
//! its descendants' flags are derived from the same threaded value.

use crate::model::path::PathStep;
use crate::model::{Block, Document, Paragraph, SegmentKind, SelectablePath, Table};

/// Marks the closed document-order range between `start` and `end`.
///
/// With `end` absent the selection is collapsed: `start` alone is marked.
/// With both absent every selection flag is cleared. Stale selection
/// markers encountered along the way are pruned.
pub fn project(document: &mut Document, start: Option<&SelectablePath>, end: Option<&SelectablePath>) {
    let projection = Projection {
        start,
        end,
        collapsed: end.is_none() || start == end,
    };
    let mut steps = Vec::new();
    projection.walk_blocks(&mut document.blocks, &mut steps, false);
}

/// Clears every selection flag and prunes every selection marker.
pub fn clear_selection(document: &mut Document) {
    project(document, None, None);
}

struct Projection<'a> {
    start: Option<&'a SelectablePath>,
    end: Option<&'a SelectablePath>,
    collapsed: bool,
}

impl Projection<'_> {
    fn is_start(&self, steps: &[PathStep]) -> bool {
        self.start.is_some_and(|path| path.matches(steps))
    }

    fn is_end(&self, steps: &[PathStep]) -> bool {
        self.end.is_some_and(|path| path.matches(steps))
    }

    /// Whether the selection closes after this node. A collapsed selection
    /// closes at its own start.
    fn closes_at(&self, steps: &[PathStep]) -> bool {
        match self.end {
            Some(path) => path.matches(steps),
            None => self.is_start(steps),
        }
    }

    fn walk_blocks(&self, blocks: &mut [Block], steps: &mut Vec<PathStep>, mut in_selection: bool) -> bool {
        for (idx, block) in blocks.iter_mut().enumerate() {
            steps.push(PathStep::Block(idx));
            in_selection = self.walk_block(block, steps, in_selection);
            steps.pop();
        }
        in_selection
    }

    fn walk_block(&self, block: &mut Block, steps: &mut Vec<PathStep>, mut in_selection: bool) -> bool {
        match block {
            Block::Paragraph(paragraph) => self.walk_paragraph(paragraph, steps, in_selection),
            Block::Table(table) => self.walk_table(table, steps, in_selection),
            Block::Divider { is_selected, .. } | Block::Entity { is_selected, .. } => {
                in_selection |= self.is_start(steps);
                *is_selected = in_selection;
                if self.closes_at(steps) {
                    in_selection = false;
                }
                in_selection
            }
            Block::General { blocks, .. } | Block::FormatContainer { blocks, .. } => {
                self.walk_blocks(blocks, steps, in_selection)
            }
            Block::ListItem(item) => self.walk_blocks(&mut item.blocks, steps, in_selection),
        }
    }

    fn walk_paragraph(
        &self,
        paragraph: &mut Paragraph,
        steps: &mut Vec<PathStep>,
        mut in_selection: bool,
    ) -> bool {
        let mut stale_markers = Vec::new();
        for (idx, segment) in paragraph.segments.iter_mut().enumerate() {
            steps.push(PathStep::Segment(idx));
            let is_start = self.is_start(steps);
            let is_end = self.is_end(steps);
            in_selection |= is_start;
            segment.is_selected = in_selection;

            if let SegmentKind::Image {
                is_selected_as_image_selection,
                ..
            } = &mut segment.kind
            {
                *is_selected_as_image_selection = is_start && (self.end.is_none() || is_end);
            }

            if segment.is_marker() && !is_start && !is_end {
                let interior = in_selection && !self.collapsed;
                if !in_selection || interior {
                    stale_markers.push(idx);
                }
            }

            if self.closes_at(steps) {
                in_selection = false;
            }
            steps.pop();
        }
        // Deferred so that scanning indices stay valid; highest first.
        for idx in stale_markers.into_iter().rev() {
            paragraph.segments.remove(idx);
        }
        in_selection
    }

    fn walk_table(&self, table: &mut Table, steps: &mut Vec<PathStep>, mut in_selection: bool) -> bool {
        if let Some((row0, col0, row1, col1)) = self.rectangle(table, steps) {
            for (row_idx, row) in table.rows.iter_mut().enumerate() {
                for (col_idx, cell) in row.cells.iter_mut().enumerate() {
                    cell.is_selected = (row0..=row1).contains(&row_idx)
                        && (col0..=col1).contains(&col_idx);
                }
            }
            // Both endpoints live inside this table, so the selection is
            // closed again once the table has been handled.
            return in_selection;
        }

        for row_idx in 0..table.rows.len() {
            for col_idx in 0..table.rows[row_idx].cells.len() {
                steps.push(PathStep::Cell {
                    row: row_idx,
                    col: col_idx,
                });
                let cell = &mut table.rows[row_idx].cells[col_idx];
                in_selection |= self.is_start(steps);
                cell.is_selected = in_selection;
                in_selection = self.walk_blocks(&mut cell.blocks, steps, in_selection);
                if self.closes_at(steps) {
                    in_selection = false;
                }
                steps.pop();
            }
        }
        in_selection
    }

    /// The inclusive cell bounding box when both endpoints address cells of
    /// the table at `table_steps`. Coordinates that no longer exist in the
    /// table mean no rectangle; the caller falls back to the generic walk.
    fn rectangle(&self, table: &Table, table_steps: &[PathStep]) -> Option<(usize, usize, usize, usize)> {
        let (start_row, start_col) = self.start?.as_cell_of(table_steps)?;
        let (end_row, end_col) = self.end?.as_cell_of(table_steps)?;
        for (row, col) in [(start_row, start_col), (end_row, end_col)] {
            if table.rows.get(row)?.cells.get(col).is_none() {
                return None;
            }
        }
        Some((
            start_row.min(end_row),
            start_col.min(end_col),
            start_row.max(end_row),
            start_col.max(end_col),
        ))
    }
}

#[cfg(test)]
#[path = "selection_tests.rs"]
mod selection_tests;
