use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Block;
use super::format::{CellFormat, TableFormat};

/// A table block: rows of cells plus per-column widths.
///
/// The `dataset` is an opaque string-to-string side channel owned by the
/// surrounding editor; the only key this crate interprets is the table
/// metadata entry (see the `metadata` module).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub rows: Vec<TableRow>,
    pub widths: Vec<f64>,
    pub format: TableFormat,
    #[serde(default)]
    pub dataset: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub height: f64,
    pub cells: Vec<TableCell>,
}

/// A table cell. Cells are block groups: they own a block list of their own.
///
/// `span_left` / `span_above` mark the cell as the continuation of a merged
/// span rather than an independent cell; normalization collapses such cells
/// away once their content has been migrated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    pub blocks: Vec<Block>,
    pub span_left: bool,
    pub span_above: bool,
    pub is_header: bool,
    pub format: CellFormat,
    /// Render-cache token owned by the DOM layer. This crate only ever
    /// clears it when the cell's visual classification changes.
    #[serde(default)]
    pub cached_block_id: Option<String>,
    pub is_selected: bool,
}

impl Table {
    /// An empty table of the given dimensions. Cells start without blocks;
    /// normalization synthesizes their placeholder paragraphs.
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows: (0..rows)
                .map(|_| TableRow {
                    height: 0.0,
                    cells: (0..columns).map(|_| TableCell::new()).collect(),
                })
                .collect(),
            widths: Vec::new(),
            format: TableFormat::default(),
            dataset: BTreeMap::new(),
        }
    }

    /// The widest cell count across all rows.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(|row| row.cells.len()).max().unwrap_or(0)
    }

    pub fn is_rectangular(&self) -> bool {
        let columns = self.column_count();
        self.rows.iter().all(|row| row.cells.len() == columns)
    }
}

impl TableRow {
    pub fn with_cells(cells: Vec<TableCell>) -> Self {
        Self { height: 0.0, cells }
    }
}

impl TableCell {
    pub fn new() -> Self {
        Self {
            blocks: Vec::new(),
            span_left: false,
            span_above: false,
            is_header: false,
            format: CellFormat::default(),
            cached_block_id: None,
            is_selected: false,
        }
    }

    pub fn with_blocks(blocks: Vec<Block>) -> Self {
        Self {
            blocks,
            ..Self::new()
        }
    }

    pub fn spanned_left(mut self) -> Self {
        self.span_left = true;
        self
    }

    pub fn spanned_above(mut self) -> Self {
        self.span_above = true;
        self
    }

    pub fn header(mut self) -> Self {
        self.is_header = true;
        self
    }

    /// A fresh cell inheriting this cell's visual identity but none of its
    /// content or span state. Used when a table grows and the new cell
    /// should look like its neighbor.
    pub fn clone_format(&self) -> Self {
        Self {
            blocks: Vec::new(),
            span_left: false,
            span_above: false,
            is_header: self.is_header,
            format: self.format.clone(),
            cached_block_id: None,
            is_selected: false,
        }
    }
}

impl Default for TableCell {
    fn default() -> Self {
        Self::new()
    }
}
