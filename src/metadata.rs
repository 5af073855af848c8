//! The table metadata side channel.
//!
//! Tables carry an opaque string dataset that round-trips with the DOM
//! layer. One entry is interpreted here: the border and shading descriptor
//! stored as JSON under [`TABLE_METADATA_KEY`], camelCase field names on
//! the wire.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::Table;

/// Dataset key under which the table format descriptor is stored.
pub const TABLE_METADATA_KEY: &str = "editingInfo";

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("malformed table metadata: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Named border layouts a table can be formatted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TableBorderStyle {
    #[default]
    Default,
    ListWithSideBorders,
    NoHeaderBorders,
    NoSideBorders,
    FirstColumnHeaderExternal,
    EspecialType1,
    EspecialType2,
    EspecialType3,
    Clear,
}

/// The table-level format descriptor.
///
/// All fields are optional: a stored descriptor may carry any subset, and
/// layering (defaults, stored values, caller overrides) is a field-wise
/// right-biased merge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableMetadataFormat {
    pub top_border_color: Option<String>,
    pub bottom_border_color: Option<String>,
    pub vertical_border_color: Option<String>,
    pub has_header_row: Option<bool>,
    pub has_first_column: Option<bool>,
    pub has_banded_rows: Option<bool>,
    pub has_banded_columns: Option<bool>,
    pub bg_color_even: Option<String>,
    pub bg_color_odd: Option<String>,
    pub header_row_color: Option<String>,
    pub table_border_format: Option<TableBorderStyle>,
}

impl TableMetadataFormat {
    /// Field-wise merge with `self` winning over `base`.
    pub fn merged_over(&self, base: &TableMetadataFormat) -> TableMetadataFormat {
        TableMetadataFormat {
            top_border_color: self.top_border_color.clone().or_else(|| base.top_border_color.clone()),
            bottom_border_color: self
                .bottom_border_color
                .clone()
                .or_else(|| base.bottom_border_color.clone()),
            vertical_border_color: self
                .vertical_border_color
                .clone()
                .or_else(|| base.vertical_border_color.clone()),
            has_header_row: self.has_header_row.or(base.has_header_row),
            has_first_column: self.has_first_column.or(base.has_first_column),
            has_banded_rows: self.has_banded_rows.or(base.has_banded_rows),
            has_banded_columns: self.has_banded_columns.or(base.has_banded_columns),
            bg_color_even: self.bg_color_even.clone().or_else(|| base.bg_color_even.clone()),
            bg_color_odd: self.bg_color_odd.clone().or_else(|| base.bg_color_odd.clone()),
            header_row_color: self
                .header_row_color
                .clone()
                .or_else(|| base.header_row_color.clone()),
            table_border_format: self.table_border_format.or(base.table_border_format),
        }
    }
}

/// Reads the stored descriptor. Absence is `Ok(None)`; a dataset entry
/// that fails to parse is an error the caller may treat as absence.
pub fn read_table_metadata(table: &Table) -> Result<Option<TableMetadataFormat>, MetadataError> {
    match table.dataset.get(TABLE_METADATA_KEY) {
        None => Ok(None),
        Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
    }
}

pub fn write_table_metadata(
    table: &mut Table,
    format: &TableMetadataFormat,
) -> Result<(), MetadataError> {
    let raw = serde_json::to_string(format)?;
    table.dataset.insert(TABLE_METADATA_KEY.to_string(), raw);
    Ok(())
}
