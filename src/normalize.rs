//! Document-level normalization.
//!
//! The cheap cleanups every mutation ends with: empty text segments go
//! away, implicit paragraphs that lost their content disappear, visible
//! paragraphs never render as nothing, each paragraph keeps at most one
//! caret marker, and every table gets its structural pass.

use crate::model::{Block, Document, Paragraph, Segment, SegmentFormat};
use crate::table::normalize::normalize_table;

pub fn normalize_document(document: &mut Document) {
    let default_format = document.segment_format.clone();
    normalize_blocks(&mut document.blocks, default_format.as_ref());
}

fn normalize_blocks(blocks: &mut Vec<Block>, default_format: Option<&SegmentFormat>) {
    let mut idx = 0;
    while idx < blocks.len() {
        let remove = match &mut blocks[idx] {
            Block::Paragraph(paragraph) => {
                normalize_paragraph(paragraph);
                paragraph.is_implicit && paragraph.segments.is_empty()
            }
            Block::Table(table) => {
                for row in table.rows.iter_mut() {
                    for cell in row.cells.iter_mut() {
                        normalize_blocks(&mut cell.blocks, default_format);
                    }
                }
                normalize_table(table, default_format);
                false
            }
            Block::General { blocks, .. } | Block::FormatContainer { blocks, .. } => {
                normalize_blocks(blocks, default_format);
                false
            }
            Block::ListItem(item) => {
                normalize_blocks(&mut item.blocks, default_format);
                false
            }
            Block::Divider { .. } | Block::Entity { .. } => false,
        };
        if remove {
            blocks.remove(idx);
        } else {
            idx += 1;
        }
    }
}

fn normalize_paragraph(paragraph: &mut Paragraph) {
    let mut idx = 0;
    while idx < paragraph.segments.len() {
        if paragraph.segments[idx].is_empty_text() && paragraph.segments.len() > 1 {
            paragraph.segments.remove(idx);
        } else {
            idx += 1;
        }
    }

    let mut seen_marker = false;
    let mut idx = 0;
    while idx < paragraph.segments.len() {
        if paragraph.segments[idx].is_marker() {
            if seen_marker {
                paragraph.segments.remove(idx);
                continue;
            }
            seen_marker = true;
        }
        idx += 1;
    }

    // A user-authored paragraph that lost all visible content still takes
    // up a line.
    if !paragraph.is_implicit && paragraph.is_visually_empty() {
        paragraph.segments.push(Segment::br());
    }
}
