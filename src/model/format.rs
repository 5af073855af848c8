use serde::{Deserialize, Serialize};

/// Horizontal alignment of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alignment {
    Start,
    Center,
    End,
}

/// Writing direction of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Ltr,
    Rtl,
}

/// Block-level format shared by paragraphs, dividers, and block groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockFormat {
    pub alignment: Option<Alignment>,
    pub direction: Option<Direction>,
    pub background_color: Option<String>,
}

/// Character-level format carried by every segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentFormat {
    pub font_family: Option<String>,
    pub font_size: Option<String>,
    pub text_color: Option<String>,
    pub background_color: Option<String>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

/// The four border colors of a table cell, one per side.
///
/// Right and left always carry the vertical border color of the table
/// descriptor, top and bottom their own colors. A side that must not be
/// drawn carries the literal color `"transparent"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BorderColors {
    pub top: String,
    pub right: String,
    pub bottom: String,
    pub left: String,
}

impl BorderColors {
    pub fn uniform(color: &str) -> Self {
        Self {
            top: color.to_string(),
            right: color.to_string(),
            bottom: color.to_string(),
            left: color.to_string(),
        }
    }

    /// The joined 4-part CSS border-color value (top, right, bottom, left).
    pub fn css(&self) -> String {
        format!("{} {} {} {}", self.top, self.right, self.bottom, self.left)
    }
}

/// Per-cell visual format.
///
/// `bg_color_override` marks a background that was set explicitly by the
/// user. Derived colors (banding, header shading) never replace it until a
/// caller clears the flag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellFormat {
    pub background_color: Option<String>,
    pub bg_color_override: bool,
    pub border_color: Option<BorderColors>,
    pub text_color: Option<String>,
    pub use_border_box: bool,
}

/// Table-level layout format. `border_collapse` and `use_border_box`
/// travel together and are forced on by normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableFormat {
    pub border_collapse: bool,
    pub use_border_box: bool,
    pub background_color: Option<String>,
}
