//! Table normalization.
//!
//! After any structural edit a table may carry empty cells, missing
//! widths, orphaned span flags, or rows and columns that exist only as
//! span continuations. Normalization repairs all of that in one idempotent
//! pass so that downstream code can assume a rectangular grid.

use tracing::trace;

use crate::model::{Block, Paragraph, Segment, SegmentFormat, SegmentKind, Table, TableCell, TableRow};

/// Rows are never shorter than this.
pub const MIN_ROW_HEIGHT: f64 = 22.0;

/// Width assigned to a column that has none yet, tiered by table width.
fn synthesized_width(columns: usize) -> f64 {
    if columns <= 4 {
        120.0
    } else if columns <= 6 {
        100.0
    } else {
        70.0
    }
}

/// Repairs a table's internal structure in place.
///
/// Calling this twice in a row leaves the table unchanged the second time.
pub fn normalize_table(table: &mut Table, default_segment_format: Option<&SegmentFormat>) {
    // These two travel together; layout depends on both being set.
    if !(table.format.border_collapse && table.format.use_border_box) {
        table.format.border_collapse = true;
        table.format.use_border_box = true;
    }

    for (row_idx, row) in table.rows.iter_mut().enumerate() {
        if row.height < MIN_ROW_HEIGHT {
            row.height = MIN_ROW_HEIGHT;
        }
        for (col_idx, cell) in row.cells.iter_mut().enumerate() {
            if cell.blocks.is_empty() {
                cell.blocks
                    .push(Block::Paragraph(Paragraph::implicit_with_br(default_segment_format)));
            }
            if row_idx == 0 {
                cell.span_above = false;
            }
            if col_idx == 0 {
                cell.span_left = false;
            }
            // Headers only occupy row 0. A downgraded cell renders
            // differently, so its cache token must go too.
            if row_idx > 0 && cell.is_header {
                cell.is_header = false;
                cell.cached_block_id = None;
            }
        }
    }

    let columns = table.column_count();
    let width = synthesized_width(columns);
    while table.widths.len() < columns {
        table.widths.push(width);
    }
    for row in table.rows.iter_mut() {
        while row.cells.len() < columns {
            let mut cell = TableCell::new();
            cell.blocks
                .push(Block::Paragraph(Paragraph::implicit_with_br(default_segment_format)));
            row.cells.push(cell);
        }
    }

    collapse_spanned_columns(table, columns, default_segment_format);
    collapse_spanned_rows(table, default_segment_format);
}

fn collapse_spanned_columns(table: &mut Table, columns: usize, default_segment_format: Option<&SegmentFormat>) {
    for col in (1..columns).rev() {
        for row in table.rows.iter_mut() {
            if row.cells.get(col).is_some_and(|cell| cell.span_left) {
                move_blocks_left(row, col, default_segment_format);
            }
        }

        let fully_spanned = !table.rows.is_empty()
            && table
                .rows
                .iter()
                .all(|row| row.cells.get(col).is_some_and(|cell| cell.span_left));
        if fully_spanned {
            trace!(target: "table.normalize", col, "collapse_column");
            for row in table.rows.iter_mut() {
                row.cells.remove(col);
            }
            if col < table.widths.len() {
                let removed = table.widths.remove(col);
                if let Some(left) = table.widths.get_mut(col - 1) {
                    *left += removed;
                }
            }
        }
    }
}

fn collapse_spanned_rows(table: &mut Table, default_segment_format: Option<&SegmentFormat>) {
    for row_idx in (1..table.rows.len()).rev() {
        for col_idx in 0..table.rows[row_idx].cells.len() {
            if table.rows[row_idx].cells[col_idx].span_above {
                move_blocks_up(&mut table.rows, row_idx, col_idx, default_segment_format);
            }
        }

        let fully_spanned = !table.rows[row_idx].cells.is_empty()
            && table.rows[row_idx].cells.iter().all(|cell| cell.span_above);
        if fully_spanned {
            trace!(target: "table.normalize", row = row_idx, "collapse_row");
            let removed = table.rows.remove(row_idx);
            table.rows[row_idx - 1].height += removed.height;
        }
    }
}

fn move_blocks_left(row: &mut TableRow, col: usize, default_segment_format: Option<&SegmentFormat>) {
    let (left, right) = row.cells.split_at_mut(col);
    let (Some(target), Some(source)) = (left.last_mut(), right.first_mut()) else {
        return;
    };
    migrate_blocks(target, source, default_segment_format);
}

fn move_blocks_up(
    rows: &mut [TableRow],
    row_idx: usize,
    col_idx: usize,
    default_segment_format: Option<&SegmentFormat>,
) {
    let (above, below) = rows.split_at_mut(row_idx);
    let (Some(above_row), Some(row)) = (above.last_mut(), below.first_mut()) else {
        return;
    };
    let (Some(target), Some(source)) = (above_row.cells.get_mut(col_idx), row.cells.get_mut(col_idx))
    else {
        return;
    };
    migrate_blocks(target, source, default_segment_format);
}

/// Moves a spanned cell's content into the cell that owns the span. The
/// source keeps a placeholder so every cell stays displayable and a repeat
/// pass finds nothing left to move.
fn migrate_blocks(target: &mut TableCell, source: &mut TableCell, default_segment_format: Option<&SegmentFormat>) {
    if is_disposable(&source.blocks) {
        return;
    }
    let blocks = std::mem::take(&mut source.blocks);
    target.blocks.extend(blocks);
    source
        .blocks
        .push(Block::Paragraph(Paragraph::implicit_with_br(default_segment_format)));
}

/// Placeholder content that must not displace real content when a spanned
/// cell collapses: a single paragraph holding nothing but selection
/// markers, or exactly one line break.
fn is_disposable(blocks: &[Block]) -> bool {
    match blocks {
        [] => true,
        [Block::Paragraph(paragraph)] => {
            paragraph.segments.iter().all(Segment::is_marker)
                || (paragraph.segments.len() == 1
                    && matches!(paragraph.segments[0].kind, SegmentKind::Br))
        }
        _ => false,
    }
}
