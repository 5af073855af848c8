use serde::{Deserialize, Serialize};

use super::format::SegmentFormat;

/// The inline content of a paragraph.
///
/// Every segment carries a character format and a selection flag; the
/// payload lives in [`SegmentKind`] so that matches over segment kinds stay
/// exhaustive when a variant is added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub kind: SegmentKind,
    pub format: SegmentFormat,
    pub is_selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SegmentKind {
    Text {
        text: String,
    },
    Br,
    /// A zero-width placeholder standing in for a collapsed caret. Not real
    /// content; pruned as soon as it no longer denotes the active caret.
    SelectionMarker,
    General,
    Image {
        src: String,
        alt: Option<String>,
        /// True only when this exact image is the whole selection, as
        /// opposed to lying inside a ranged selection.
        is_selected_as_image_selection: bool,
    },
    Entity {
        entity_type: String,
        id: String,
        is_readonly: bool,
    },
}

impl Segment {
    fn with_kind(kind: SegmentKind) -> Self {
        Self {
            kind,
            format: SegmentFormat::default(),
            is_selected: false,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::with_kind(SegmentKind::Text { text: text.into() })
    }

    pub fn br() -> Self {
        Self::with_kind(SegmentKind::Br)
    }

    pub fn marker() -> Self {
        Self::with_kind(SegmentKind::SelectionMarker)
    }

    pub fn image(src: impl Into<String>) -> Self {
        Self::with_kind(SegmentKind::Image {
            src: src.into(),
            alt: None,
            is_selected_as_image_selection: false,
        })
    }

    pub fn entity(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::with_kind(SegmentKind::Entity {
            entity_type: entity_type.into(),
            id: id.into(),
            is_readonly: true,
        })
    }

    pub fn with_format(mut self, format: SegmentFormat) -> Self {
        self.format = format;
        self
    }

    pub fn selected(mut self) -> Self {
        self.is_selected = true;
        self
    }

    pub fn is_marker(&self) -> bool {
        matches!(self.kind, SegmentKind::SelectionMarker)
    }

    pub fn is_br(&self) -> bool {
        matches!(self.kind, SegmentKind::Br)
    }

    pub fn is_empty_text(&self) -> bool {
        matches!(&self.kind, SegmentKind::Text { text } if text.is_empty())
    }
}
