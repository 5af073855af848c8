//! Merging a source document fragment into a target document.
//!
//! The merge consumes the source block by block, advancing an insertion
//! point through the target as content lands. Paragraph content splices
//! into the paragraph holding the caret; anything block-shaped splits that
//! paragraph and takes its place between the halves; lists and tables get
//! their own treatment so that numbering and grids survive the merge.
//!
//! The insertion point is a structural address and every split invalidates
//! it; each step here returns the re-derived point rather than patching the
//! old one.

use tracing::debug;

use crate::model::path::{PathStep, block_ref, container_mut, paragraph_mut};
use crate::model::{Block, Document, ListItem, Paragraph, Segment, SelectablePath};
use crate::normalize::normalize_document;

mod table;

/// Identifies the table cell an insertion point sits in.
#[derive(Debug, Clone, PartialEq)]
pub struct TableContext {
    pub table_path: SelectablePath,
    pub row: usize,
    pub col: usize,
}

/// A transient locator for where content enters the target: the paragraph
/// holding the caret marker, the marker's segment index, and the enclosing
/// table cell when there is one.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertPoint {
    pub paragraph_path: SelectablePath,
    pub marker_index: usize,
    pub table_context: Option<TableContext>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MergeOptions {
    /// Merge a lone source table into the table under the caret instead of
    /// nesting it. Advisory: when the source is not a lone table or the
    /// caret is not inside a cell, the table is inserted as a sibling.
    pub merge_table: bool,
}

/// Merges `source` into `target` at `insert_position`, or at the caret
/// marker found in the target when no position is given.
///
/// Returns the final insertion point, carrying the single selected caret
/// marker that ends up immediately after the inserted content. Returns
/// `None` when no insertion point can be derived; the merge is then a
/// no-op and the source is dropped.
pub fn merge(
    target: &mut Document,
    source: Document,
    insert_position: Option<InsertPoint>,
    options: &MergeOptions,
) -> Option<InsertPoint> {
    let mut insert_point = match insert_position.or_else(|| find_insert_point(target)) {
        Some(insert_point) => insert_point,
        None => {
            debug!(target: "merge", "no insertion point in target, dropping source");
            return None;
        }
    };

    let lone_table = source.blocks.len() == 1 && matches!(source.blocks[0], Block::Table(_));
    debug!(target: "merge", blocks = source.blocks.len(), lone_table, "merge_start");

    let mut first = true;
    for block in source.blocks {
        match block {
            Block::Paragraph(paragraph) => {
                if !first {
                    insert_point = split_paragraph(target, &insert_point)?;
                }
                splice_segments(target, &mut insert_point, paragraph.segments)?;
            }
            Block::Table(source_table)
                if lone_table && options.merge_table && insert_point.table_context.is_some() =>
            {
                table::merge_table(target, &insert_point, source_table)?;
                normalize_document(target);
                return find_insert_point(target);
            }
            Block::ListItem(item) => {
                insert_point = merge_list(target, &insert_point, item)?;
            }
            other => {
                insert_point = insert_sibling_block(target, &insert_point, other)?;
            }
        }
        first = false;
    }

    normalize_document(target);
    find_insert_point(target)
}

/// Locates the selected caret marker in document order and derives the
/// insertion point from it.
pub fn find_insert_point(document: &Document) -> Option<InsertPoint> {
    let mut steps = Vec::new();
    find_marker_in_blocks(&document.blocks, &mut steps)
}

fn find_marker_in_blocks(blocks: &[Block], steps: &mut Vec<PathStep>) -> Option<InsertPoint> {
    for (idx, block) in blocks.iter().enumerate() {
        steps.push(PathStep::Block(idx));
        let found = find_marker_in_block(block, steps);
        steps.pop();
        if found.is_some() {
            return found;
        }
    }
    None
}

fn find_marker_in_block(block: &Block, steps: &mut Vec<PathStep>) -> Option<InsertPoint> {
    match block {
        Block::Paragraph(paragraph) => {
            let marker_index = paragraph
                .segments
                .iter()
                .position(|segment| segment.is_marker() && segment.is_selected)?;
            Some(InsertPoint {
                paragraph_path: SelectablePath::from_steps(steps.clone()),
                marker_index,
                table_context: table_context_of(steps),
            })
        }
        Block::Table(table) => {
            for (row_idx, row) in table.rows.iter().enumerate() {
                for (col_idx, cell) in row.cells.iter().enumerate() {
                    steps.push(PathStep::Cell {
                        row: row_idx,
                        col: col_idx,
                    });
                    let found = find_marker_in_blocks(&cell.blocks, steps);
                    steps.pop();
                    if found.is_some() {
                        return found;
                    }
                }
            }
            None
        }
        Block::General { blocks, .. } | Block::FormatContainer { blocks, .. } => {
            find_marker_in_blocks(blocks, steps)
        }
        Block::ListItem(item) => find_marker_in_blocks(&item.blocks, steps),
        Block::Divider { .. } | Block::Entity { .. } => None,
    }
}

/// The innermost cell an address passes through, if any.
fn table_context_of(steps: &[PathStep]) -> Option<TableContext> {
    let cell_at = steps
        .iter()
        .rposition(|step| matches!(step, PathStep::Cell { .. }))?;
    let PathStep::Cell { row, col } = steps[cell_at] else {
        return None;
    };
    Some(TableContext {
        table_path: SelectablePath::from_steps(steps[..cell_at].to_vec()),
        row,
        col,
    })
}

/// Inserts the given segments at the marker, leaving the marker after them.
fn splice_segments(
    target: &mut Document,
    insert_point: &mut InsertPoint,
    segments: Vec<Segment>,
) -> Option<()> {
    let paragraph = paragraph_mut(target, insert_point.paragraph_path.steps())?;
    let at = insert_point.marker_index.min(paragraph.segments.len());
    let count = segments.len();
    paragraph.segments.splice(at..at, segments);
    insert_point.marker_index = at + count;
    Some(())
}

/// Splits the insertion paragraph at the marker. Segments from the marker
/// on (marker included) move into a fresh paragraph inserted as the next
/// sibling; when the paragraph sits inside a list item, the item splits the
/// same way. Returns the insertion point re-derived for the new paragraph.
pub(crate) fn split_paragraph(target: &mut Document, insert_point: &InsertPoint) -> Option<InsertPoint> {
    let steps = insert_point.paragraph_path.steps().to_vec();
    let paragraph = paragraph_mut(target, &steps)?;
    let at = insert_point.marker_index.min(paragraph.segments.len());
    let right = paragraph.segments.split_off(at);
    let new_paragraph = Paragraph {
        segments: right,
        format: paragraph.format.clone(),
        segment_format: paragraph.segment_format.clone(),
        is_implicit: false,
    };

    let (last, prefix) = steps.split_last()?;
    let PathStep::Block(paragraph_idx) = last else {
        return None;
    };
    let container = container_mut(target, prefix)?;
    let new_idx = (*paragraph_idx + 1).min(container.len());
    container.insert(new_idx, Block::Paragraph(new_paragraph));

    let new_steps = match enclosing_list_item(target, &steps) {
        Some(depth) => split_list_item(target, &steps, depth, new_idx)?,
        None => {
            let mut new_steps = prefix.to_vec();
            new_steps.push(PathStep::Block(new_idx));
            new_steps
        }
    };

    Some(InsertPoint {
        paragraph_path: SelectablePath::from_steps(new_steps),
        marker_index: 0,
        table_context: insert_point.table_context.clone(),
    })
}

/// The prefix length of the nearest enclosing list item, walking outward
/// from the paragraph without crossing a format container or table cell.
fn enclosing_list_item(document: &Document, paragraph_steps: &[PathStep]) -> Option<usize> {
    for depth in (1..paragraph_steps.len()).rev() {
        let prefix = &paragraph_steps[..depth];
        if matches!(prefix.last(), Some(PathStep::Cell { .. })) {
            return None;
        }
        match block_ref(document, prefix)? {
            Block::ListItem(_) => return Some(depth),
            Block::FormatContainer { .. } => return None,
            _ => {}
        }
    }
    None
}

/// Splits the list item at `paragraph_steps[..depth]` after the block the
/// paragraph path passes through, moving the tail (which includes the
/// freshly split-off paragraph) into a new item with the same nesting
/// levels. Returns the path of the new paragraph.
fn split_list_item(
    document: &mut Document,
    paragraph_steps: &[PathStep],
    depth: usize,
    new_paragraph_idx: usize,
) -> Option<Vec<PathStep>> {
    let item_steps = &paragraph_steps[..depth];
    let PathStep::Block(child_idx) = paragraph_steps[depth] else {
        return None;
    };

    let new_item = {
        let Some(Block::ListItem(item)) = crate::model::path::block_mut(document, item_steps) else {
            return None;
        };
        let moved = if child_idx + 1 <= item.blocks.len() {
            item.blocks.split_off(child_idx + 1)
        } else {
            Vec::new()
        };
        ListItem {
            levels: item.levels.clone(),
            format_holder: item.format_holder.clone(),
            blocks: moved,
            format: item.format.clone(),
        }
    };

    let (last, item_prefix) = item_steps.split_last()?;
    let PathStep::Block(item_idx) = last else {
        return None;
    };
    let container = container_mut(document, item_prefix)?;
    container.insert(item_idx + 1, Block::ListItem(new_item));

    if depth == paragraph_steps.len() - 1 {
        // The split-off paragraph was a direct child and moved into the new
        // item, landing at the front of its block list.
        let mut steps = item_prefix.to_vec();
        steps.push(PathStep::Block(item_idx + 1));
        steps.push(PathStep::Block(new_paragraph_idx - (child_idx + 1)));
        Some(steps)
    } else {
        // The paragraph sits inside a nested group that stayed behind; only
        // its sibling index changed.
        let mut steps = paragraph_steps.to_vec();
        *steps.last_mut()? = PathStep::Block(new_paragraph_idx);
        Some(steps)
    }
}

/// Split-then-insert for content that can never live inside a paragraph:
/// the block becomes a sibling between the two halves.
fn insert_sibling_block(
    target: &mut Document,
    insert_point: &InsertPoint,
    block: Block,
) -> Option<InsertPoint> {
    let mut insert_point = split_paragraph(target, insert_point)?;
    let steps = insert_point.paragraph_path.steps().to_vec();
    let (last, prefix) = steps.split_last()?;
    let PathStep::Block(paragraph_idx) = last else {
        return None;
    };
    let container = container_mut(target, prefix)?;
    let at = (*paragraph_idx).min(container.len());
    container.insert(at, block);

    let mut new_steps = prefix.to_vec();
    new_steps.push(PathStep::Block(paragraph_idx + 1));
    insert_point.paragraph_path = SelectablePath::from_steps(new_steps);
    Some(insert_point)
}

/// Merges a source list item into the list context around the caret.
///
/// The incoming item is spliced in immediately before the block holding the
/// caret, at the level of the nearest enclosing list item when one exists.
/// Shared nesting depths inherit the target's numbering; deeper levels the
/// source brought along survive.
fn merge_list(target: &mut Document, insert_point: &InsertPoint, mut item: ListItem) -> Option<InsertPoint> {
    let mut insert_point = split_paragraph(target, insert_point)?;
    let steps = insert_point.paragraph_path.steps().to_vec();

    match enclosing_list_item(target, &steps) {
        Some(depth) => {
            let item_steps = steps[..depth].to_vec();
            let existing_levels = match block_ref(target, &item_steps)? {
                Block::ListItem(existing) => existing.levels.clone(),
                _ => return None,
            };
            for (idx, level) in existing_levels.iter().enumerate() {
                if let Some(slot) = item.levels.get_mut(idx) {
                    *slot = level.clone();
                }
            }

            let (last, item_prefix) = item_steps.split_last()?;
            let PathStep::Block(item_idx) = last else {
                return None;
            };
            let container = container_mut(target, item_prefix)?;
            container.insert(*item_idx, Block::ListItem(item));

            // The enclosing item shifted right by one; everything below it
            // in the path is unchanged.
            let mut new_steps = steps.clone();
            new_steps[depth - 1] = PathStep::Block(item_idx + 1);
            insert_point.paragraph_path = SelectablePath::from_steps(new_steps);
        }
        None => {
            let (last, prefix) = steps.split_last()?;
            let PathStep::Block(paragraph_idx) = last else {
                return None;
            };
            let container = container_mut(target, prefix)?;
            container.insert(*paragraph_idx, Block::ListItem(item));

            let mut new_steps = prefix.to_vec();
            new_steps.push(PathStep::Block(paragraph_idx + 1));
            insert_point.paragraph_path = SelectablePath::from_steps(new_steps);
        }
    }
    Some(insert_point)
}

#[cfg(test)]
#[path = "merge_tests.rs"]
mod merge_tests;
