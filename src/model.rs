//! The content-model tree: documents, blocks, segments, and the structural
//! paths that address nodes inside them.
//!
//! Nodes are plain owned records with no identity beyond containment. They
//! are created by the factory constructors here, mutated in place by the
//! engines in the sibling modules, and discarded when superseded by the
//! next model snapshot. History and persistence belong to the surrounding
//! editor, not to this tree.

use serde::{Deserialize, Serialize};

pub mod format;
pub mod path;
pub mod segment;
pub mod table;

pub use format::{Alignment, BlockFormat, BorderColors, CellFormat, Direction, SegmentFormat, TableFormat};
pub use path::{PathStep, SelectablePath};
pub use segment::{Segment, SegmentKind};
pub use table::{Table, TableCell, TableRow};

/// The root block group of a model tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub blocks: Vec<Block>,
    /// Document-wide default character format, applied when synthesizing
    /// placeholder content.
    pub segment_format: Option<SegmentFormat>,
}

/// Every kind of block-level node.
///
/// `General`, `FormatContainer`, and `ListItem` are block groups: blocks
/// that own further blocks. Table cells are block groups too, but they are
/// only reachable through a [`Table`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
    Divider {
        tag: DividerTag,
        format: BlockFormat,
        is_selected: bool,
    },
    Entity {
        entity_type: String,
        id: String,
        is_readonly: bool,
        format: BlockFormat,
        is_selected: bool,
    },
    General {
        blocks: Vec<Block>,
        format: BlockFormat,
    },
    FormatContainer {
        tag: String,
        blocks: Vec<Block>,
        format: BlockFormat,
    },
    ListItem(ListItem),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DividerTag {
    Hr,
    Div,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub segments: Vec<Segment>,
    pub format: BlockFormat,
    /// Default character format for content typed into this paragraph.
    pub segment_format: Option<SegmentFormat>,
    /// Synthesized rather than user-authored. Implicit paragraphs that end
    /// up empty are collapsed away by normalization.
    pub is_implicit: bool,
}

/// A list item: one entry of a (possibly nested) list, holding the blocks
/// of the entry plus one nesting descriptor per list depth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    pub levels: Vec<ListLevel>,
    /// Format carrier for the item's marker; shared by everything the item
    /// contains.
    pub format_holder: SegmentFormat,
    pub blocks: Vec<Block>,
    pub format: BlockFormat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListLevel {
    pub list_type: ListType,
    pub style_type: Option<String>,
    pub start_number_override: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListType {
    Ordered,
    Unordered,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blocks(mut self, blocks: Vec<Block>) -> Self {
        self.blocks = blocks;
        self
    }
}

impl Block {
    /// The child block list of a block group, `None` for leaf blocks and
    /// tables (table children are cells, addressed separately).
    pub fn child_blocks(&self) -> Option<&Vec<Block>> {
        match self {
            Block::General { blocks, .. } | Block::FormatContainer { blocks, .. } => Some(blocks),
            Block::ListItem(item) => Some(&item.blocks),
            Block::Paragraph(_) | Block::Table(_) | Block::Divider { .. } | Block::Entity { .. } => {
                None
            }
        }
    }

    pub fn child_blocks_mut(&mut self) -> Option<&mut Vec<Block>> {
        match self {
            Block::General { blocks, .. } | Block::FormatContainer { blocks, .. } => Some(blocks),
            Block::ListItem(item) => Some(&mut item.blocks),
            Block::Paragraph(_) | Block::Table(_) | Block::Divider { .. } | Block::Entity { .. } => {
                None
            }
        }
    }

    pub fn divider(tag: DividerTag) -> Self {
        Block::Divider {
            tag,
            format: BlockFormat::default(),
            is_selected: false,
        }
    }

    pub fn entity(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Block::Entity {
            entity_type: entity_type.into(),
            id: id.into(),
            is_readonly: true,
            format: BlockFormat::default(),
            is_selected: false,
        }
    }
}

impl Paragraph {
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
            format: BlockFormat::default(),
            segment_format: None,
            is_implicit: false,
        }
    }

    /// A synthesized paragraph holding a single line break, the canonical
    /// placeholder for otherwise empty containers.
    pub fn implicit_with_br(segment_format: Option<&SegmentFormat>) -> Self {
        let mut br = Segment::br();
        if let Some(format) = segment_format {
            br.format = format.clone();
        }
        Self {
            segments: vec![br],
            format: BlockFormat::default(),
            segment_format: segment_format.cloned(),
            is_implicit: true,
        }
    }

    pub fn with_segments(mut self, segments: Vec<Segment>) -> Self {
        self.segments = segments;
        self
    }

    pub fn implicit(mut self) -> Self {
        self.is_implicit = true;
        self
    }

    /// Index of the first selection marker, if any.
    pub fn marker_index(&self) -> Option<usize> {
        self.segments.iter().position(Segment::is_marker)
    }

    /// True when the paragraph carries nothing a reader could see: no
    /// segments at all, or selection markers only.
    pub fn is_visually_empty(&self) -> bool {
        self.segments.iter().all(Segment::is_marker)
    }
}

impl Default for Paragraph {
    fn default() -> Self {
        Self::new()
    }
}

impl ListItem {
    pub fn new(levels: Vec<ListLevel>) -> Self {
        Self {
            levels,
            format_holder: SegmentFormat::default(),
            blocks: Vec::new(),
            format: BlockFormat::default(),
        }
    }

    pub fn with_blocks(mut self, blocks: Vec<Block>) -> Self {
        self.blocks = blocks;
        self
    }
}

impl ListLevel {
    pub fn new(list_type: ListType) -> Self {
        Self {
            list_type,
            style_type: None,
            start_number_override: None,
        }
    }
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod model_tests;
