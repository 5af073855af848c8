//! Table structure maintenance: coordinate lookup, normalization, and
//! visual formatting.

use serde::{Deserialize, Serialize};

use crate::model::{Table, TableCell};

pub mod format;
pub mod normalize;

pub use format::apply_table_format;
pub use normalize::normalize_table;

/// Zero-based cell coordinates: `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellCoordinates {
    pub x: usize,
    pub y: usize,
}

/// Locates a cell within its table by reference identity.
///
/// Returns `None` when the cell is not part of the table; callers treat
/// that as "no coordinates available", never as an error.
pub fn find_cell_coordinates(table: &Table, cell: &TableCell) -> Option<CellCoordinates> {
    table.rows.iter().enumerate().find_map(|(y, row)| {
        row.cells
            .iter()
            .position(|candidate| std::ptr::eq(candidate, cell))
            .map(|x| CellCoordinates { x, y })
    })
}

pub fn cell_at(table: &Table, coordinates: CellCoordinates) -> Option<&TableCell> {
    table.rows.get(coordinates.y)?.cells.get(coordinates.x)
}

pub fn cell_at_mut(table: &mut Table, coordinates: CellCoordinates) -> Option<&mut TableCell> {
    table.rows.get_mut(coordinates.y)?.cells.get_mut(coordinates.x)
}

/// Coordinates of every cell currently flagged as selected, in document
/// order. The counterpart to rectangular selection projection: callers use
/// it to resolve a marked rectangle back out of the tree.
pub fn collect_selected_cells(table: &Table) -> Vec<CellCoordinates> {
    let mut selected = Vec::new();
    for (y, row) in table.rows.iter().enumerate() {
        for (x, cell) in row.cells.iter().enumerate() {
            if cell.is_selected {
                selected.push(CellCoordinates { x, y });
            }
        }
    }
    selected
}
