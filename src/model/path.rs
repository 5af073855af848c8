use serde::{Deserialize, Serialize};

use super::segment::Segment;
use super::table::{Table, TableCell};
use super::{Block, Document, Paragraph};

/// One step down the document tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathStep {
    /// Index into the block list of the current block group.
    Block(usize),
    /// Row and column of a cell within the current table.
    Cell { row: usize, col: usize },
    /// Index into the segment list of the current paragraph. Only ever the
    /// final step of a path.
    Segment(usize),
}

/// A structural address of a selectable node: a segment, a table cell, or a
/// block such as a divider or entity.
///
/// Paths are plain addresses, not references. Any structural mutation of
/// the tree invalidates paths into the mutated region; callers re-derive
/// them instead of reusing stale ones.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectablePath {
    steps: Vec<PathStep>,
}

impl SelectablePath {
    pub fn new_block(idx: usize) -> Self {
        Self {
            steps: vec![PathStep::Block(idx)],
        }
    }

    pub fn from_steps(steps: Vec<PathStep>) -> Self {
        Self { steps }
    }

    pub fn push_block(&mut self, idx: usize) {
        self.steps.push(PathStep::Block(idx));
    }

    pub fn push_cell(&mut self, row: usize, col: usize) {
        self.steps.push(PathStep::Cell { row, col });
    }

    pub fn push_segment(&mut self, idx: usize) {
        self.steps.push(PathStep::Segment(idx));
    }

    pub fn child_block(&self, idx: usize) -> Self {
        let mut path = self.clone();
        path.push_block(idx);
        path
    }

    pub fn child_cell(&self, row: usize, col: usize) -> Self {
        let mut path = self.clone();
        path.push_cell(row, col);
        path
    }

    pub fn child_segment(&self, idx: usize) -> Self {
        let mut path = self.clone();
        path.push_segment(idx);
        path
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn parent(&self) -> Option<Self> {
        let (_, prefix) = self.steps.split_last()?;
        Some(Self::from_steps(prefix.to_vec()))
    }

    pub fn matches(&self, steps: &[PathStep]) -> bool {
        self.steps == steps
    }

    /// When this path addresses a cell directly under the table at
    /// `table_steps`, returns the cell's `(row, col)` coordinates.
    pub fn as_cell_of(&self, table_steps: &[PathStep]) -> Option<(usize, usize)> {
        let (last, prefix) = self.steps.split_last()?;
        if prefix != table_steps {
            return None;
        }
        match last {
            PathStep::Cell { row, col } => Some((*row, *col)),
            _ => None,
        }
    }
}

fn descend_ref<'a>(blocks: &'a [Block], steps: &[PathStep]) -> Option<&'a Block> {
    let (first, rest) = steps.split_first()?;
    let PathStep::Block(idx) = first else {
        return None;
    };
    let block = blocks.get(*idx)?;
    match rest.split_first() {
        None => Some(block),
        Some((PathStep::Cell { row, col }, deeper)) => {
            let Block::Table(table) = block else {
                return None;
            };
            let cell = table.rows.get(*row)?.cells.get(*col)?;
            descend_ref(&cell.blocks, deeper)
        }
        Some((PathStep::Block(_), _)) => descend_ref(block.child_blocks()?, rest),
        Some((PathStep::Segment(_), _)) => None,
    }
}

fn descend_mut<'a>(blocks: &'a mut Vec<Block>, steps: &[PathStep]) -> Option<&'a mut Block> {
    let (first, rest) = steps.split_first()?;
    let PathStep::Block(idx) = first else {
        return None;
    };
    let block = blocks.get_mut(*idx)?;
    match rest.split_first() {
        None => Some(block),
        Some((PathStep::Cell { row, col }, deeper)) => {
            let Block::Table(table) = block else {
                return None;
            };
            let cell = table.rows.get_mut(*row)?.cells.get_mut(*col)?;
            descend_mut(&mut cell.blocks, deeper)
        }
        Some((PathStep::Block(_), _)) => descend_mut(block.child_blocks_mut()?, rest),
        Some((PathStep::Segment(_), _)) => None,
    }
}

pub(crate) fn block_ref<'a>(document: &'a Document, steps: &[PathStep]) -> Option<&'a Block> {
    descend_ref(&document.blocks, steps)
}

pub(crate) fn block_mut<'a>(document: &'a mut Document, steps: &[PathStep]) -> Option<&'a mut Block> {
    descend_mut(&mut document.blocks, steps)
}

pub(crate) fn paragraph_ref<'a>(document: &'a Document, steps: &[PathStep]) -> Option<&'a Paragraph> {
    match block_ref(document, steps)? {
        Block::Paragraph(paragraph) => Some(paragraph),
        _ => None,
    }
}

pub(crate) fn paragraph_mut<'a>(
    document: &'a mut Document,
    steps: &[PathStep],
) -> Option<&'a mut Paragraph> {
    match block_mut(document, steps)? {
        Block::Paragraph(paragraph) => Some(paragraph),
        _ => None,
    }
}

pub(crate) fn table_ref<'a>(document: &'a Document, steps: &[PathStep]) -> Option<&'a Table> {
    match block_ref(document, steps)? {
        Block::Table(table) => Some(table),
        _ => None,
    }
}

pub(crate) fn table_mut<'a>(document: &'a mut Document, steps: &[PathStep]) -> Option<&'a mut Table> {
    match block_mut(document, steps)? {
        Block::Table(table) => Some(table),
        _ => None,
    }
}

/// Resolves a path ending in a `Cell` step to the cell itself.
pub(crate) fn cell_ref<'a>(document: &'a Document, steps: &[PathStep]) -> Option<&'a TableCell> {
    let (last, prefix) = steps.split_last()?;
    let PathStep::Cell { row, col } = last else {
        return None;
    };
    table_ref(document, prefix)?.rows.get(*row)?.cells.get(*col)
}

/// Resolves a path ending in a `Segment` step to the segment itself.
pub(crate) fn segment_ref<'a>(document: &'a Document, steps: &[PathStep]) -> Option<&'a Segment> {
    let (last, prefix) = steps.split_last()?;
    let PathStep::Segment(idx) = last else {
        return None;
    };
    paragraph_ref(document, prefix)?.segments.get(*idx)
}

/// Resolves a *container* path to its child block list. The empty path is
/// the document root; a path ending in a `Cell` step is that cell; any
/// other path must land on a block group.
pub(crate) fn container_mut<'a>(
    document: &'a mut Document,
    steps: &[PathStep],
) -> Option<&'a mut Vec<Block>> {
    if steps.is_empty() {
        return Some(&mut document.blocks);
    }
    let (last, prefix) = steps.split_last()?;
    match last {
        PathStep::Cell { row, col } => {
            let table = table_mut(document, prefix)?;
            Some(&mut table.rows.get_mut(*row)?.cells.get_mut(*col)?.blocks)
        }
        PathStep::Block(_) => block_mut(document, steps)?.child_blocks_mut(),
        PathStep::Segment(_) => None,
    }
}
