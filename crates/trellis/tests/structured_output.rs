//! Integration tests for the raw, export, and JSON output formats.

use serde_json::Value;
use trellis::{Column, ColumnFlags, Format, JsonType, Table};

#[test]
fn test_export_quotes_shell_metacharacters() {
    let mut table = Table::new();
    table.set_format(Format::Export);
    let name = table.add_column(Column::new("NAME"));
    let note = table.add_column(Column::new("NOTE"));
    let line = table.new_line(None).unwrap();
    table.set_data(line, name, "sda").unwrap();
    table.set_data(line, note, r#"say "hi" $x `v` \z"#).unwrap();

    let out = table.print_to_string().unwrap();
    assert_eq!(out, r#"NAME="sda" NOTE="say \"hi\" \$x \`v\` \\z""#);
}

#[test]
fn test_export_sanitizes_column_names() {
    let mut table = Table::new();
    table.set_format(Format::Export);
    let a = table.add_column(Column::new("MAJ:MIN"));
    let b = table.add_column(Column::new("1ST"));
    let line = table.new_line(None).unwrap();
    table.set_data(line, a, "8:0").unwrap();
    table.set_data(line, b, "x").unwrap();

    let out = table.print_to_string().unwrap();
    assert_eq!(out, r#"MAJ_MIN="8:0" _1ST="x""#);
}

#[test]
fn test_export_escapes_control_characters() {
    let mut table = Table::new();
    table.set_format(Format::Export);
    let a = table.add_column(Column::new("A"));
    let line = table.new_line(None).unwrap();
    table.set_data(line, a, "tab\there").unwrap();

    let out = table.print_to_string().unwrap();
    assert_eq!(out, "A=\"tab\\x09here\"");
}

#[test]
fn test_raw_escapes_blanks_and_keeps_one_line_per_row() {
    let mut table = Table::new();
    table.set_format(Format::Raw);
    let name = table.add_column(Column::new("NAME"));
    let size = table.add_column(Column::new("SIZE"));
    for (n, s) in [("a b", "10G"), ("c", "2G")] {
        let line = table.new_line(None).unwrap();
        table.set_data(line, name, n).unwrap();
        table.set_data(line, size, s).unwrap();
    }

    let out = table.print_to_string().unwrap();
    assert_eq!(out, "NAME SIZE\na\\x20b 10G\nc 2G");
}

#[test]
fn test_raw_honors_no_headings() {
    let mut table = Table::new();
    table.set_format(Format::Raw).set_no_headings(true);
    let name = table.add_column(Column::new("NAME"));
    let line = table.new_line(None).unwrap();
    table.set_data(line, name, "x").unwrap();

    assert_eq!(table.print_to_string().unwrap(), "x");
}

#[test]
fn test_json_nests_one_children_array_per_ancestor() {
    let mut table = Table::new();
    table.set_format(Format::Json).set_name("chain");
    let n = table.add_column(Column::new("N").flags(ColumnFlags::TREE));
    let a = table.new_line(None).unwrap();
    table.set_data(a, n, "a").unwrap();
    let b = table.new_line(Some(a)).unwrap();
    table.set_data(b, n, "b").unwrap();
    let c = table.new_line(Some(b)).unwrap();
    table.set_data(c, n, "c").unwrap();

    let out = table.print_to_string().unwrap();
    let v: Value = serde_json::from_str(&out).unwrap();
    let roots = v["chain"].as_array().unwrap();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0]["n"], "a");
    let b_obj = &roots[0]["children"].as_array().unwrap()[0];
    assert_eq!(b_obj["n"], "b");
    let c_obj = &b_obj["children"].as_array().unwrap()[0];
    assert_eq!(c_obj["n"], "c");
    // the leaf has no children key at all
    assert!(c_obj.get("children").is_none());
    assert_eq!(out.matches("\"children\"").count(), 2);
}

#[test]
fn test_json_column_types() {
    let mut table = Table::new();
    table.set_format(Format::Json).set_name("disks");
    let name = table.add_column(Column::new("NAME"));
    let size = table.add_column(Column::new("SIZE").json_type(JsonType::Number));
    let rm = table.add_column(Column::new("RM").json_type(JsonType::Boolean));

    let l1 = table.new_line(None).unwrap();
    table.set_data(l1, name, "sda").unwrap();
    table.set_data(l1, size, "42").unwrap();
    table.set_data(l1, rm, "0").unwrap();
    let l2 = table.new_line(None).unwrap();
    table.set_data(l2, name, "sdb").unwrap();
    table.set_data(l2, rm, "yes").unwrap();

    let out = table.print_to_string().unwrap();
    let v: Value = serde_json::from_str(&out).unwrap();
    let rows = v["disks"].as_array().unwrap();
    assert_eq!(rows[0]["size"], 42);
    assert_eq!(rows[0]["rm"], false);
    // empty number cell degrades to null
    assert_eq!(rows[1]["size"], Value::Null);
    assert_eq!(rows[1]["rm"], true);
}

#[test]
fn test_json_unparsable_number_stays_a_string() {
    let mut table = Table::new();
    table.set_format(Format::Json);
    let size = table.add_column(Column::new("SIZE").json_type(JsonType::Number));
    let line = table.new_line(None).unwrap();
    table.set_data(line, size, "10G").unwrap();

    let out = table.print_to_string().unwrap();
    let v: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(v["table"][0]["size"], "10G");
}

#[test]
fn test_json_escapes_control_characters() {
    let mut table = Table::new();
    table.set_format(Format::Json);
    let a = table.add_column(Column::new("A"));
    let line = table.new_line(None).unwrap();
    table.set_data(line, a, "a\tb\"c").unwrap();

    let out = table.print_to_string().unwrap();
    let v: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(v["table"][0]["a"], "a\tb\"c");
    assert!(out.contains(r"a\tb\"));
}

#[test]
fn test_json_uses_three_space_indentation() {
    let mut table = Table::new();
    table.set_format(Format::Json).set_name("t");
    let a = table.add_column(Column::new("A"));
    let line = table.new_line(None).unwrap();
    table.set_data(line, a, "x").unwrap();

    let out = table.print_to_string().unwrap();
    assert!(out.starts_with("{\n   \"t\": [\n      {\n         \"a\": \"x\""));
}

#[test]
fn test_json_empty_table_emits_the_wrapper() {
    let mut table = Table::new();
    table.set_format(Format::Json).set_name("empty");
    table.add_column(Column::new("A"));

    let out = table.print_to_string().unwrap();
    let v: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(v["empty"].as_array().unwrap().len(), 0);
}
