//! Integration tests for human-readable column and tree output.

use console::Style;
use trellis::{Align, Cell, Column, ColumnFlags, Table, WidthHint};

fn term_table(width: usize) -> Table {
    let mut table = Table::new();
    table
        .set_force_term(true)
        .set_term_width(width)
        .set_ascii(true);
    table
}

#[test]
fn test_name_size_tree_example() {
    let mut table = term_table(20);
    let name = table.add_column(
        Column::new("NAME")
            .hint(WidthHint::Fraction(0.5))
            .flags(ColumnFlags::TREE),
    );
    let size = table.add_column(Column::new("SIZE").hint(WidthHint::Fraction(0.5)));

    let root = table.new_line(None).unwrap();
    table.set_data(root, name, "root").unwrap();
    table.set_data(root, size, "10G").unwrap();
    let var = table.new_line(Some(root)).unwrap();
    table.set_data(var, name, "root/var").unwrap();
    table.set_data(var, size, "2G").unwrap();

    let out = table.print_to_string().unwrap();
    assert_eq!(out, "NAME       SIZE\nroot       10G\n`-root/var 2G");
}

#[test]
fn test_flat_lines_print_in_insertion_order() {
    let mut table = term_table(40);
    let col = table.add_column(Column::new("N"));
    for data in ["first", "second", "third"] {
        let line = table.new_line(None).unwrap();
        table.set_data(line, col, data).unwrap();
    }

    let out = table.print_to_string().unwrap();
    // one visit per line, no separator after the globally last one
    assert_eq!(out, "N\nfirst\nsecond\nthird");
}

#[test]
fn test_single_child_chain_draws_only_corners() {
    let mut table = term_table(40);
    let col = table.add_column(Column::new("N").flags(ColumnFlags::TREE));
    let a = table.new_line(None).unwrap();
    table.set_data(a, col, "a").unwrap();
    let b = table.new_line(Some(a)).unwrap();
    table.set_data(b, col, "b").unwrap();
    let c = table.new_line(Some(b)).unwrap();
    table.set_data(c, col, "c").unwrap();

    let out = table.print_to_string().unwrap();
    assert_eq!(out, "N\na\n`-b\n  `-c");
    assert_eq!(out.matches("`-").count(), 2);
    assert_eq!(out.matches("|-").count(), 0);
}

#[test]
fn test_siblings_draw_branch_then_corner() {
    let mut table = term_table(40);
    let col = table.add_column(Column::new("N").flags(ColumnFlags::TREE));
    let a = table.new_line(None).unwrap();
    table.set_data(a, col, "a").unwrap();
    let b = table.new_line(Some(a)).unwrap();
    table.set_data(b, col, "b").unwrap();
    let c = table.new_line(Some(a)).unwrap();
    table.set_data(c, col, "c").unwrap();

    let out = table.print_to_string().unwrap();
    assert_eq!(out, "N\na\n|-b\n`-c");
}

#[test]
fn test_ancestor_line_continues_past_open_subtrees() {
    let mut table = term_table(40);
    let col = table.add_column(Column::new("N").flags(ColumnFlags::TREE));
    let a = table.new_line(None).unwrap();
    table.set_data(a, col, "a").unwrap();
    let b = table.new_line(Some(a)).unwrap();
    table.set_data(b, col, "b").unwrap();
    let bx = table.new_line(Some(b)).unwrap();
    table.set_data(bx, col, "x").unwrap();
    let c = table.new_line(Some(a)).unwrap();
    table.set_data(c, col, "c").unwrap();

    // b has a sibling below, so b's child keeps the vertical; c closes the tree
    let out = table.print_to_string().unwrap();
    assert_eq!(out, "N\na\n|-b\n| `-x\n`-c");
}

#[test]
fn test_unicode_connectors_by_default() {
    let mut table = Table::new();
    table.set_force_term(true).set_term_width(40);
    let col = table.add_column(Column::new("N").flags(ColumnFlags::TREE));
    let a = table.new_line(None).unwrap();
    table.set_data(a, col, "a").unwrap();
    let b = table.new_line(Some(a)).unwrap();
    table.set_data(b, col, "b").unwrap();

    let out = table.print_to_string().unwrap();
    assert_eq!(out, "N\na\n└─b");
}

#[test]
fn test_right_aligned_column_pads_on_the_left() {
    let mut table = term_table(80);
    let name = table.add_column(Column::new("NAME"));
    let size = table.add_column(Column::new("SIZE").flags(ColumnFlags::RIGHT));
    let l1 = table.new_line(None).unwrap();
    table.set_data(l1, name, "a").unwrap();
    table.set_data(l1, size, "1").unwrap();
    let l2 = table.new_line(None).unwrap();
    table.set_data(l2, name, "bb").unwrap();
    table.set_data(l2, size, "22").unwrap();

    let out = table.print_to_string().unwrap();
    assert_eq!(out, "NAME SIZE\na       1\nbb     22");
}

#[test]
fn test_truncating_column_cuts_at_the_computed_width() {
    let mut table = term_table(8);
    let a = table.add_column(Column::new("AAAA").flags(ColumnFlags::TRUNC));
    let b = table.add_column(Column::new("B"));
    let line = table.new_line(None).unwrap();
    table.set_data(line, a, "aaaaaaaaaa").unwrap();
    table.set_data(line, b, "x").unwrap();

    let out = table.print_to_string().unwrap();
    for row in out.lines() {
        assert!(row.chars().count() <= 8, "row wider than terminal: {row:?}");
    }
    // the header floor holds: data is cut, never the header
    assert!(out.starts_with("AAAA"));
    assert!(!out.contains("aaaaa"));
}

#[test]
fn test_untruncatable_overflow_breaks_the_row() {
    let mut table = term_table(12);
    let a = table.add_column(Column::new("A").flags(ColumnFlags::NO_EXTREMES));
    let b = table.add_column(Column::new("B"));
    for (x, y) in [("aa", "1"), ("aa", "2"), ("aa", "3")] {
        let line = table.new_line(None).unwrap();
        table.set_data(line, a, x).unwrap();
        table.set_data(line, b, y).unwrap();
    }
    let long = table.new_line(None).unwrap();
    table.set_data(long, a, "aaaaaaaaaaaaaaaaaaaa").unwrap();
    table.set_data(long, b, "4").unwrap();

    // the outlier column shrinks toward the pack, and the row with the
    // overflowing cell continues on the next physical line
    let out = table.print_to_string().unwrap();
    assert_eq!(
        out,
        "A          B\n\
         aa         1\n\
         aa         2\n\
         aa         3\n\
         aaaaaaaaaaaaaaaaaaaa\n           4"
    );
}

#[test]
fn test_title_alignment() {
    let mut table = term_table(11);
    let col = table.add_column(Column::new("N"));
    let line = table.new_line(None).unwrap();
    table.set_data(line, col, "x").unwrap();

    table.set_title(Cell::new("Title").with_align(Align::Center));
    let out = table.print_to_string().unwrap();
    assert_eq!(out, "   Title   \nN\nx");

    table.set_title(Cell::new("Title").with_align(Align::Right));
    let out = table.print_to_string().unwrap();
    assert_eq!(out, "      Title\nN\nx");

    // left alignment keeps the line short, like the last column of a row
    table.set_title(Cell::new("Title"));
    let out = table.print_to_string().unwrap();
    assert_eq!(out, "Title\nN\nx");
}

#[test]
fn test_custom_column_separator() {
    let mut table = term_table(40);
    let a = table.add_column(Column::new("A"));
    let b = table.add_column(Column::new("B"));
    table.set_column_sep(" | ");
    let line = table.new_line(None).unwrap();
    table.set_data(line, a, "1").unwrap();
    table.set_data(line, b, "2").unwrap();

    let out = table.print_to_string().unwrap();
    assert_eq!(out, "A | B\n1 | 2");
}

#[test]
fn test_hidden_column_is_not_rendered() {
    let mut table = term_table(40);
    let a = table.add_column(Column::new("A"));
    let b = table.add_column(Column::new("SECRET").flags(ColumnFlags::HIDDEN));
    let line = table.new_line(None).unwrap();
    table.set_data(line, a, "1").unwrap();
    table.set_data(line, b, "2").unwrap();

    let out = table.print_to_string().unwrap();
    assert_eq!(out, "A\n1");
}

#[test]
fn test_no_headings_suppresses_the_header() {
    let mut table = term_table(40);
    let col = table.add_column(Column::new("N"));
    table.set_no_headings(true);
    let line = table.new_line(None).unwrap();
    table.set_data(line, col, "x").unwrap();

    assert_eq!(table.print_to_string().unwrap(), "x");
}

#[test]
fn test_styles_color_data_but_not_connectors() {
    let mut table = term_table(40);
    let col = table.add_column(Column::new("N").flags(ColumnFlags::TREE));
    table.enable_colors(true);
    let a = table.new_line(None).unwrap();
    table.set_data(a, col, "a").unwrap();
    let b = table.new_line(Some(a)).unwrap();
    table
        .set_cell(b, col, Cell::styled("b", Style::new().red()))
        .unwrap();

    let out = table.print_to_string().unwrap();
    // the escape sequence starts after the corner connector
    assert!(out.contains("`-\u{1b}[31mb\u{1b}[0m"));
}

#[test]
fn test_styles_are_inert_until_colors_are_enabled() {
    let mut table = term_table(40);
    let col = table.add_column(Column::new("N"));
    let line = table.new_line(None).unwrap();
    table
        .set_cell(line, col, Cell::styled("x", Style::new().red()))
        .unwrap();

    assert_eq!(table.print_to_string().unwrap(), "N\nx");
}

#[test]
fn test_print_terminates_with_a_single_newline() {
    let mut table = term_table(40);
    let col = table.add_column(Column::new("N"));
    let line = table.new_line(None).unwrap();
    table.set_data(line, col, "x").unwrap();

    let mut out = Vec::new();
    table.print(&mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "N\nx\n");
}

#[test]
fn test_empty_table_prints_nothing() {
    let mut table = term_table(40);
    table.add_column(Column::new("N"));
    let mut out = Vec::new();
    table.print(&mut out).unwrap();
    assert!(out.is_empty());
}
