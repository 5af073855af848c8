//! Table visual formatting.
//!
//! Derives per-cell borders, backgrounds, and header classification from
//! the table-level format descriptor and each cell's position in the grid.
//! Purely a function of geometry and the descriptor; structural repair is
//! the normalizer's job.

use tracing::debug;

use crate::metadata::{
    TableBorderStyle, TableMetadataFormat, read_table_metadata, write_table_metadata,
};
use crate::model::{BorderColors, Table};

pub const DEFAULT_BORDER_COLOR: &str = "#ABABAB";
pub const DEFAULT_BG_COLOR_ODD: &str = "#ABABAB20";
pub const TRANSPARENT: &str = "transparent";

/// Applies the table's stored format descriptor, overlaid with
/// `new_format`, to every cell.
///
/// The effective descriptor (defaults, then stored values, then
/// `new_format`, rightmost wins per field) is written back to the table's
/// dataset, so repeated application is drift-free. With `keep_cell_shade`
/// cells that carry an explicit background keep it; otherwise every
/// override flag is cleared and backgrounds are recomputed from scratch.
pub fn apply_table_format(table: &mut Table, new_format: Option<&TableMetadataFormat>, keep_cell_shade: bool) {
    let stored = match read_table_metadata(table) {
        Ok(stored) => stored,
        Err(err) => {
            debug!(target: "table.format", %err, "ignoring malformed table metadata");
            None
        }
    };
    let mut merged = stored.unwrap_or_default();
    if let Some(new_format) = new_format {
        merged = new_format.merged_over(&merged);
    }
    let resolved = ResolvedFormat::from_metadata(&merged);
    if write_table_metadata(table, &resolved.to_metadata()).is_err() {
        debug!(target: "table.format", "failed to store table metadata");
    }

    if !keep_cell_shade {
        for row in table.rows.iter_mut() {
            for cell in row.cells.iter_mut() {
                cell.format.bg_color_override = false;
            }
        }
    }

    format_borders(table, &resolved);
    format_backgrounds(table, &resolved);
    set_first_column(table, &resolved);
    set_header_row(table, &resolved);
}

/// The descriptor with defaults filled in.
struct ResolvedFormat {
    top_border_color: String,
    bottom_border_color: String,
    vertical_border_color: String,
    has_header_row: bool,
    has_first_column: bool,
    has_banded_rows: bool,
    has_banded_columns: bool,
    bg_color_even: Option<String>,
    bg_color_odd: Option<String>,
    header_row_color: Option<String>,
    border_style: TableBorderStyle,
}

impl ResolvedFormat {
    fn from_metadata(meta: &TableMetadataFormat) -> Self {
        Self {
            top_border_color: meta
                .top_border_color
                .clone()
                .unwrap_or_else(|| DEFAULT_BORDER_COLOR.to_string()),
            bottom_border_color: meta
                .bottom_border_color
                .clone()
                .unwrap_or_else(|| DEFAULT_BORDER_COLOR.to_string()),
            vertical_border_color: meta
                .vertical_border_color
                .clone()
                .unwrap_or_else(|| DEFAULT_BORDER_COLOR.to_string()),
            has_header_row: meta.has_header_row.unwrap_or(false),
            has_first_column: meta.has_first_column.unwrap_or(false),
            has_banded_rows: meta.has_banded_rows.unwrap_or(false),
            has_banded_columns: meta.has_banded_columns.unwrap_or(false),
            bg_color_even: meta.bg_color_even.clone(),
            bg_color_odd: meta
                .bg_color_odd
                .clone()
                .or_else(|| Some(DEFAULT_BG_COLOR_ODD.to_string())),
            header_row_color: meta
                .header_row_color
                .clone()
                .or_else(|| Some(DEFAULT_BORDER_COLOR.to_string())),
            border_style: meta.table_border_format.unwrap_or_default(),
        }
    }

    fn to_metadata(&self) -> TableMetadataFormat {
        TableMetadataFormat {
            top_border_color: Some(self.top_border_color.clone()),
            bottom_border_color: Some(self.bottom_border_color.clone()),
            vertical_border_color: Some(self.vertical_border_color.clone()),
            has_header_row: Some(self.has_header_row),
            has_first_column: Some(self.has_first_column),
            has_banded_rows: Some(self.has_banded_rows),
            has_banded_columns: Some(self.has_banded_columns),
            bg_color_even: self.bg_color_even.clone(),
            bg_color_odd: self.bg_color_odd.clone(),
            header_row_color: self.header_row_color.clone(),
            table_border_format: Some(self.border_style),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct CellPosition {
    pub first_row: bool,
    pub last_row: bool,
    pub first_column: bool,
    pub last_column: bool,
}

/// Which of the four sides draw transparent, in top/right/bottom/left
/// order, per border layout. This table is the visual contract of every
/// named layout; the grid test pins all 36 corner combinations.
pub(crate) fn transparent_sides(style: TableBorderStyle, pos: CellPosition) -> [bool; 4] {
    let CellPosition {
        first_row,
        last_row,
        first_column,
        last_column,
    } = pos;
    match style {
        TableBorderStyle::Default => [false, false, false, false],
        TableBorderStyle::ListWithSideBorders => [true, !last_column, true, !first_column],
        TableBorderStyle::NoHeaderBorders => [
            first_row,
            first_row || last_column,
            false,
            first_row || first_column,
        ],
        TableBorderStyle::NoSideBorders => [false, last_column, false, first_column],
        TableBorderStyle::FirstColumnHeaderExternal => [
            !first_row,
            !last_column,
            !(first_row || last_row),
            !first_column,
        ],
        TableBorderStyle::EspecialType1 => [
            first_column && !first_row,
            first_row,
            false,
            first_row && !first_column,
        ],
        TableBorderStyle::EspecialType2 => [
            !first_row,
            first_row || !first_column,
            false,
            first_row && !first_column,
        ],
        TableBorderStyle::EspecialType3 => [false, !first_row, true, false],
        TableBorderStyle::Clear => [true, true, true, true],
    }
}

fn format_borders(table: &mut Table, format: &ResolvedFormat) {
    let row_count = table.rows.len();
    for (row_idx, row) in table.rows.iter_mut().enumerate() {
        let col_count = row.cells.len();
        for (col_idx, cell) in row.cells.iter_mut().enumerate() {
            let position = CellPosition {
                first_row: row_idx == 0,
                last_row: row_idx == row_count - 1,
                first_column: col_idx == 0,
                last_column: col_idx == col_count - 1,
            };
            let transparent = transparent_sides(format.border_style, position);
            let colors = [
                &format.top_border_color,
                &format.vertical_border_color,
                &format.bottom_border_color,
                &format.vertical_border_color,
            ];
            let side = |idx: usize| {
                if transparent[idx] {
                    TRANSPARENT.to_string()
                } else {
                    colors[idx].clone()
                }
            };
            cell.format.border_color = Some(BorderColors {
                top: side(0),
                right: side(1),
                bottom: side(2),
                left: side(3),
            });
        }
    }
}

fn format_backgrounds(table: &mut Table, format: &ResolvedFormat) {
    for (row_idx, row) in table.rows.iter_mut().enumerate() {
        for (col_idx, cell) in row.cells.iter_mut().enumerate() {
            let color = if format.has_banded_columns {
                stripe(format, col_idx)
            } else if format.has_banded_rows {
                stripe(format, row_idx)
            } else if format.bg_color_odd == format.bg_color_even {
                format.bg_color_odd.as_deref()
            } else {
                None
            };
            if !cell.format.bg_color_override {
                cell.format.background_color = color.map(str::to_string);
            }
        }
    }
}

/// Stripe color by index parity. Index 0 takes the odd color: stripes are
/// counted one-based.
fn stripe(format: &ResolvedFormat, idx: usize) -> Option<&str> {
    if idx % 2 == 0 {
        format.bg_color_odd.as_deref()
    } else {
        format.bg_color_even.as_deref()
    }
}

fn set_first_column(table: &mut Table, format: &ResolvedFormat) {
    let row_count = table.rows.len();
    for (row_idx, row) in table.rows.iter_mut().enumerate() {
        for (col_idx, cell) in row.cells.iter_mut().enumerate() {
            if !(format.has_first_column && col_idx == 0) {
                if cell.is_header {
                    cell.is_header = false;
                    cell.cached_block_id = None;
                }
                continue;
            }
            cell.is_header = true;
            let borders = cell
                .format
                .border_color
                .get_or_insert_with(BorderColors::default);
            if row_idx != 0 {
                borders.top = TRANSPARENT.to_string();
            }
            if row_idx != 0 && row_idx != row_count - 1 {
                borders.bottom = TRANSPARENT.to_string();
            }
        }
    }
}

fn set_header_row(table: &mut Table, format: &ResolvedFormat) {
    let Some(row) = table.rows.first_mut() else {
        return;
    };
    for cell in row.cells.iter_mut() {
        if cell.is_header && !format.has_header_row {
            cell.cached_block_id = None;
        }
        cell.is_header = format.has_header_row;
        if !format.has_header_row {
            continue;
        }
        let Some(header_color) = format.header_row_color.as_deref() else {
            continue;
        };
        if !cell.format.bg_color_override {
            cell.format.background_color = Some(header_color.to_string());
        }
        let borders = cell
            .format
            .border_color
            .get_or_insert_with(BorderColors::default);
        borders.top = header_color.to_string();
        borders.right = header_color.to_string();
        borders.left = header_color.to_string();
    }
}
