use super::*;
use crate::model::{
    Block, DividerTag, ListItem, ListLevel, ListType, Paragraph, Segment, SegmentKind, Table,
    TableCell, TableFormat, TableRow,
};

fn paragraph(segments: Vec<Segment>) -> Block {
    Block::Paragraph(Paragraph::new().with_segments(segments))
}

fn text_cell(text: &str) -> TableCell {
    TableCell::with_blocks(vec![paragraph(vec![Segment::text(text)])])
}

fn grid(rows: usize, cols: usize, prefix: &str) -> Table {
    Table {
        rows: (0..rows)
            .map(|r| {
                TableRow::with_cells(
                    (0..cols)
                        .map(|c| text_cell(&format!("{prefix}{r}{c}")))
                        .collect(),
                )
            })
            .collect(),
        widths: vec![100.0; cols],
        format: TableFormat::default(),
        dataset: Default::default(),
    }
}

fn segment_texts(paragraph: &Paragraph) -> Vec<String> {
    paragraph
        .segments
        .iter()
        .map(|segment| match &segment.kind {
            SegmentKind::Text { text } => text.clone(),
            SegmentKind::SelectionMarker => "<caret>".to_string(),
            SegmentKind::Br => "<br>".to_string(),
            _ => "<other>".to_string(),
        })
        .collect()
}

fn count_selected_markers(blocks: &[Block]) -> usize {
    let mut count = 0;
    for block in blocks {
        match block {
            Block::Paragraph(p) => {
                count += p
                    .segments
                    .iter()
                    .filter(|s| s.is_marker() && s.is_selected)
                    .count();
            }
            Block::Table(t) => {
                for row in &t.rows {
                    for cell in &row.cells {
                        count += count_selected_markers(&cell.blocks);
                    }
                }
            }
            Block::General { blocks, .. } | Block::FormatContainer { blocks, .. } => {
                count += count_selected_markers(blocks);
            }
            Block::ListItem(item) => count += count_selected_markers(&item.blocks),
            Block::Divider { .. } | Block::Entity { .. } => {}
        }
    }
    count
}

#[test]
fn single_paragraph_splices_before_the_caret() {
    let mut target =
        Document::new().with_blocks(vec![paragraph(vec![Segment::marker().selected()])]);
    let source = Document::new().with_blocks(vec![paragraph(vec![
        Segment::text("test1"),
        Segment::text("test2"),
    ])]);

    let insert_point = merge(&mut target, source, None, &MergeOptions::default())
        .expect("merge should succeed");

    assert_eq!(target.blocks.len(), 1);
    let Block::Paragraph(merged) = &target.blocks[0] else {
        panic!("expected paragraph");
    };
    assert_eq!(segment_texts(merged), vec!["test1", "test2", "<caret>"]);
    assert!(merged.segments[2].is_selected);
    assert_eq!(insert_point.marker_index, 2);
    assert_eq!(count_selected_markers(&target.blocks), 1);
}

#[test]
fn caret_in_the_middle_keeps_both_halves_around_the_insert() {
    let mut target = Document::new().with_blocks(vec![paragraph(vec![
        Segment::text("left"),
        Segment::marker().selected(),
        Segment::text("right"),
    ])]);
    let source = Document::new().with_blocks(vec![paragraph(vec![Segment::text("mid")])]);

    merge(&mut target, source, None, &MergeOptions::default()).expect("merge should succeed");

    let Block::Paragraph(merged) = &target.blocks[0] else {
        panic!("expected paragraph");
    };
    assert_eq!(
        segment_texts(merged),
        vec!["left", "mid", "<caret>", "right"]
    );
}

#[test]
fn later_source_paragraphs_split_the_target() {
    let mut target = Document::new().with_blocks(vec![paragraph(vec![
        Segment::text("A"),
        Segment::marker().selected(),
        Segment::text("B"),
    ])]);
    let source = Document::new().with_blocks(vec![
        paragraph(vec![Segment::text("x")]),
        paragraph(vec![Segment::text("y")]),
    ]);

    merge(&mut target, source, None, &MergeOptions::default()).expect("merge should succeed");

    assert_eq!(target.blocks.len(), 2);
    let Block::Paragraph(first) = &target.blocks[0] else {
        panic!("expected paragraph");
    };
    let Block::Paragraph(second) = &target.blocks[1] else {
        panic!("expected paragraph");
    };
    assert_eq!(segment_texts(first), vec!["A", "x"]);
    assert_eq!(segment_texts(second), vec!["y", "<caret>", "B"]);
}

#[test]
fn divider_is_inserted_between_the_split_halves() {
    let mut target = Document::new().with_blocks(vec![paragraph(vec![
        Segment::text("A"),
        Segment::marker().selected(),
    ])]);
    let source = Document::new().with_blocks(vec![Block::divider(DividerTag::Hr)]);

    merge(&mut target, source, None, &MergeOptions::default()).expect("merge should succeed");

    assert_eq!(target.blocks.len(), 3);
    assert!(matches!(target.blocks[0], Block::Paragraph(_)));
    assert!(matches!(target.blocks[1], Block::Divider { .. }));
    let Block::Paragraph(tail) = &target.blocks[2] else {
        panic!("expected paragraph");
    };
    assert!(tail.segments.iter().any(Segment::is_marker));
    assert_eq!(count_selected_markers(&target.blocks), 1);
}

#[test]
fn entity_blocks_take_the_sibling_path() {
    let mut target = Document::new().with_blocks(vec![paragraph(vec![
        Segment::text("A"),
        Segment::marker().selected(),
        Segment::text("B"),
    ])]);
    let source = Document::new().with_blocks(vec![Block::entity("signature", "sig-1")]);

    merge(&mut target, source, None, &MergeOptions::default()).expect("merge should succeed");

    assert_eq!(target.blocks.len(), 3);
    assert!(matches!(target.blocks[1], Block::Entity { .. }));
    let Block::Paragraph(tail) = &target.blocks[2] else {
        panic!("expected paragraph");
    };
    assert_eq!(segment_texts(tail), vec!["<caret>", "B"]);
}

#[test]
fn merge_without_any_caret_is_a_no_op() {
    let mut target = Document::new().with_blocks(vec![paragraph(vec![Segment::text("A")])]);
    let before = target.clone();
    let source = Document::new().with_blocks(vec![paragraph(vec![Segment::text("dropped")])]);

    assert!(merge(&mut target, source, None, &MergeOptions::default()).is_none());
    assert_eq!(target, before);
}

#[test]
fn explicit_insert_position_is_honored() {
    let mut target = Document::new().with_blocks(vec![paragraph(vec![
        Segment::text("A"),
        Segment::marker().selected(),
    ])]);
    let insert_point = find_insert_point(&target).expect("caret should be found");
    let source = Document::new().with_blocks(vec![paragraph(vec![Segment::text("x")])]);

    merge(&mut target, source, Some(insert_point), &MergeOptions::default())
        .expect("merge should succeed");
    let Block::Paragraph(merged) = &target.blocks[0] else {
        panic!("expected paragraph");
    };
    assert_eq!(segment_texts(merged), vec!["A", "x", "<caret>"]);
}

#[test]
fn list_item_merges_into_the_enclosing_list() {
    let target_item = ListItem::new(vec![ListLevel::new(ListType::Ordered)]).with_blocks(vec![
        paragraph(vec![
            Segment::text("A"),
            Segment::marker().selected(),
            Segment::text("B"),
        ]),
    ]);
    let mut target = Document::new().with_blocks(vec![Block::ListItem(target_item)]);

    let source_item = ListItem::new(vec![ListLevel::new(ListType::Unordered)])
        .with_blocks(vec![paragraph(vec![Segment::text("x")])]);
    let source = Document::new().with_blocks(vec![Block::ListItem(source_item)]);

    merge(&mut target, source, None, &MergeOptions::default()).expect("merge should succeed");

    assert_eq!(target.blocks.len(), 3);
    let Block::ListItem(first) = &target.blocks[0] else {
        panic!("expected list item");
    };
    let Block::ListItem(inserted) = &target.blocks[1] else {
        panic!("expected list item");
    };
    let Block::ListItem(tail) = &target.blocks[2] else {
        panic!("expected list item");
    };

    // The inserted item inherits the target's numbering at shared depths.
    assert_eq!(inserted.levels[0].list_type, ListType::Ordered);

    let Block::Paragraph(first_paragraph) = &first.blocks[0] else {
        panic!("expected paragraph");
    };
    assert_eq!(segment_texts(first_paragraph), vec!["A"]);
    let Block::Paragraph(inserted_paragraph) = &inserted.blocks[0] else {
        panic!("expected paragraph");
    };
    assert_eq!(segment_texts(inserted_paragraph), vec!["x"]);
    let Block::Paragraph(tail_paragraph) = &tail.blocks[0] else {
        panic!("expected paragraph");
    };
    assert_eq!(segment_texts(tail_paragraph), vec!["<caret>", "B"]);
}

#[test]
fn deeper_source_list_levels_survive_inheritance() {
    let target_item = ListItem::new(vec![ListLevel::new(ListType::Ordered)])
        .with_blocks(vec![paragraph(vec![Segment::marker().selected()])]);
    let mut target = Document::new().with_blocks(vec![Block::ListItem(target_item)]);

    let source_item = ListItem::new(vec![
        ListLevel::new(ListType::Unordered),
        ListLevel::new(ListType::Unordered),
    ])
    .with_blocks(vec![paragraph(vec![Segment::text("nested")])]);
    let source = Document::new().with_blocks(vec![Block::ListItem(source_item)]);

    merge(&mut target, source, None, &MergeOptions::default()).expect("merge should succeed");

    let Block::ListItem(inserted) = &target.blocks[1] else {
        panic!("expected list item");
    };
    assert_eq!(inserted.levels.len(), 2);
    assert_eq!(inserted.levels[0].list_type, ListType::Ordered);
    assert_eq!(inserted.levels[1].list_type, ListType::Unordered);
}

#[test]
fn list_item_outside_any_list_lands_at_the_root() {
    let mut target = Document::new().with_blocks(vec![paragraph(vec![
        Segment::text("A"),
        Segment::marker().selected(),
    ])]);
    let source_item = ListItem::new(vec![ListLevel::new(ListType::Unordered)])
        .with_blocks(vec![paragraph(vec![Segment::text("x")])]);
    let source = Document::new().with_blocks(vec![Block::ListItem(source_item)]);

    merge(&mut target, source, None, &MergeOptions::default()).expect("merge should succeed");

    assert_eq!(target.blocks.len(), 3);
    let Block::ListItem(inserted) = &target.blocks[1] else {
        panic!("expected list item");
    };
    assert_eq!(inserted.levels[0].list_type, ListType::Unordered);
}

#[test]
fn lone_table_merges_into_the_table_under_the_caret() {
    let mut table = grid(4, 4, "t");
    table.rows[3].cells[3] =
        TableCell::with_blocks(vec![paragraph(vec![Segment::marker().selected()])]);
    // Give the rightmost column a recognizable shade to observe cloning.
    table.rows[0].cells[3].format.background_color = Some("#EDEDED".to_string());
    table.rows[0].cells[3].format.bg_color_override = true;
    let mut target = Document::new().with_blocks(vec![Block::Table(table)]);

    let source = Document::new().with_blocks(vec![Block::Table(grid(2, 2, "s"))]);
    let options = MergeOptions { merge_table: true };

    let insert_point =
        merge(&mut target, source, None, &options).expect("merge should succeed");

    let Block::Table(table) = &target.blocks[0] else {
        panic!("expected table");
    };
    assert_eq!(table.rows.len(), 5);
    assert!(table.rows.iter().all(|row| row.cells.len() == 5));

    // The caret moved into the first landed cell.
    let context = insert_point.table_context.expect("caret should sit in a cell");
    assert_eq!((context.row, context.col), (3, 3));
    assert_eq!(count_selected_markers(&target.blocks), 1);

    // Grown cells are cloned from their neighbors, not default-built.
    assert_eq!(
        table.rows[0].cells[4].format.background_color.as_deref(),
        Some("#EDEDED")
    );
    assert!(!table.rows[4].cells[0].is_header);

    // Landed cells replaced the targets outright.
    let landed = &table.rows[3].cells[4];
    let Block::Paragraph(p) = &landed.blocks[0] else {
        panic!("expected paragraph");
    };
    assert_eq!(segment_texts(p), vec!["s01"]);
}

#[test]
fn capacity_growth_is_bounded_by_the_landing_corner() {
    let mut table = grid(2, 2, "t");
    table.rows[0].cells[0] =
        TableCell::with_blocks(vec![paragraph(vec![Segment::marker().selected()])]);
    let mut target = Document::new().with_blocks(vec![Block::Table(table)]);

    let source = Document::new().with_blocks(vec![Block::Table(grid(2, 2, "s"))]);
    merge(&mut target, source, None, &MergeOptions { merge_table: true })
        .expect("merge should succeed");

    let Block::Table(table) = &target.blocks[0] else {
        panic!("expected table");
    };
    // A 2x2 landing at (0,0) fits without growth.
    assert_eq!(table.rows.len(), 2);
    assert!(table.rows.iter().all(|row| row.cells.len() == 2));
}

#[test]
fn table_without_merge_flag_nests_as_a_sibling_block() {
    let mut table = grid(2, 2, "t");
    table.rows[0].cells[0] =
        TableCell::with_blocks(vec![paragraph(vec![Segment::marker().selected()])]);
    let mut target = Document::new().with_blocks(vec![Block::Table(table)]);

    let source = Document::new().with_blocks(vec![Block::Table(grid(1, 1, "s"))]);
    merge(&mut target, source, None, &MergeOptions::default()).expect("merge should succeed");

    let Block::Table(table) = &target.blocks[0] else {
        panic!("expected table");
    };
    assert_eq!(table.rows.len(), 2);
    let nested = table.rows[0].cells[0]
        .blocks
        .iter()
        .any(|block| matches!(block, Block::Table(_)));
    assert!(nested, "source table should be nested inside the cell");
}

#[test]
fn multi_block_source_never_takes_the_table_merge_path() {
    let mut table = grid(2, 2, "t");
    table.rows[0].cells[0] =
        TableCell::with_blocks(vec![paragraph(vec![Segment::marker().selected()])]);
    let mut target = Document::new().with_blocks(vec![Block::Table(table)]);

    let source = Document::new().with_blocks(vec![
        Block::Table(grid(1, 1, "s")),
        paragraph(vec![Segment::text("after")]),
    ]);
    merge(&mut target, source, None, &MergeOptions { merge_table: true })
        .expect("merge should succeed");

    let Block::Table(table) = &target.blocks[0] else {
        panic!("expected table");
    };
    // Still 2x2: the advisory flag fell back to sibling insertion.
    assert_eq!(table.rows.len(), 2);
    assert!(table.rows.iter().all(|row| row.cells.len() == 2));
}

#[test]
fn format_container_is_inserted_whole() {
    let mut target = Document::new().with_blocks(vec![paragraph(vec![
        Segment::text("A"),
        Segment::marker().selected(),
    ])]);
    let source = Document::new().with_blocks(vec![Block::FormatContainer {
        tag: "blockquote".to_string(),
        blocks: vec![paragraph(vec![Segment::text("quoted")])],
        format: Default::default(),
    }]);

    merge(&mut target, source, None, &MergeOptions::default()).expect("merge should succeed");

    assert_eq!(target.blocks.len(), 3);
    assert!(matches!(target.blocks[1], Block::FormatContainer { .. }));
}

#[test]
fn merge_inside_a_cell_stays_inside_the_cell() {
    let mut table = grid(1, 2, "t");
    table.rows[0].cells[0] = TableCell::with_blocks(vec![paragraph(vec![
        Segment::text("A"),
        Segment::marker().selected(),
    ])]);
    let mut target = Document::new().with_blocks(vec![Block::Table(table)]);

    let source = Document::new().with_blocks(vec![
        paragraph(vec![Segment::text("x")]),
        paragraph(vec![Segment::text("y")]),
    ]);
    merge(&mut target, source, None, &MergeOptions::default()).expect("merge should succeed");

    assert_eq!(target.blocks.len(), 1);
    let Block::Table(table) = &target.blocks[0] else {
        panic!("expected table");
    };
    let cell = &table.rows[0].cells[0];
    assert_eq!(cell.blocks.len(), 2);
    let Block::Paragraph(second) = &cell.blocks[1] else {
        panic!("expected paragraph");
    };
    assert_eq!(segment_texts(second), vec!["y", "<caret>"]);
}
