//! Table-into-table merge.
//!
//! When a lone source table is pasted with the caret inside a target cell,
//! the source grid lands on top of the target grid at the caret's
//! coordinates. Cells it covers are overwritten outright, the grid grows
//! right and down as needed, and the caret moves into the first landed
//! cell.

use tracing::debug;

use crate::model::path::table_mut;
use crate::model::{Block, Document, Paragraph, Segment, Table, TableCell, TableRow};
use crate::table::format::apply_table_format;
use crate::table::normalize::normalize_table;

use super::InsertPoint;

pub(crate) fn merge_table(target: &mut Document, insert_point: &InsertPoint, source: Table) -> Option<()> {
    let context = insert_point.table_context.as_ref()?;
    let table = table_mut(target, context.table_path.steps())?;
    let (row0, col0) = (context.row, context.col);

    let mut grown_cols = 0usize;
    let mut grown_rows = 0usize;

    for (i, source_row) in source.rows.into_iter().enumerate() {
        for (j, mut source_cell) in source_row.cells.into_iter().enumerate() {
            if i == 0 {
                while col0 + j >= table.rows.first()?.cells.len() {
                    grow_right(table);
                    grown_cols += 1;
                }
            }
            if j == 0 {
                while row0 + i >= table.rows.len() {
                    grow_down(table);
                    grown_rows += 1;
                }
            }
            if i == 0 && j == 0 {
                // The caret's new home. The cell being replaced held the
                // old marker; it goes down with the overwrite.
                inject_marker(&mut source_cell);
            }
            let slot = table.rows.get_mut(row0 + i)?.cells.get_mut(col0 + j)?;
            *slot = source_cell;
        }
    }

    debug!(target: "merge", grown_cols, grown_rows, "table_merge");

    normalize_table(table, None);
    apply_table_format(table, None, true);
    Some(())
}

/// Appends one column: every row gets a fresh cell that looks like its
/// current rightmost neighbor.
fn grow_right(table: &mut Table) {
    for row in table.rows.iter_mut() {
        let cell = row
            .cells
            .last()
            .map(TableCell::clone_format)
            .unwrap_or_default();
        row.cells.push(cell);
    }
}

/// Appends one row cloned from the row above. New bottom cells are never
/// headers, whatever the row above says.
fn grow_down(table: &mut Table) {
    let Some(above) = table.rows.last() else {
        return;
    };
    let cells = above
        .cells
        .iter()
        .map(|cell| {
            let mut cloned = cell.clone_format();
            cloned.is_header = false;
            cloned
        })
        .collect();
    let height = above.height;
    table.rows.push(TableRow { height, cells });
}

fn inject_marker(cell: &mut TableCell) {
    let marker = Segment::marker().selected();
    match cell.blocks.first_mut() {
        Some(Block::Paragraph(paragraph)) => paragraph.segments.insert(0, marker),
        _ => cell.blocks.insert(
            0,
            Block::Paragraph(Paragraph::new().with_segments(vec![marker]).implicit()),
        ),
    }
}
