//! JSON output.
//!
//! The whole table becomes one object keyed by the table name; each line is
//! an object of lowercased column names, and tree children nest under a
//! `"children"` array so the structure mirrors the parent/child links.
//! Values follow the column's JSON type: strings are escaped by the
//! serializer, numbers and booleans emit literals with `null` for empty
//! cells. The group chart is never drawn here; group children appear at the
//! top level in traversal order.

use std::io::{self, Write};

use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Serializer, Value};

use crate::cell::Cell;
use crate::column::JsonType;
use crate::error::Result;
use crate::line::LineHandle;

use super::Session;

pub(crate) fn print(session: &mut Session<'_>, sink: &mut dyn Write) -> Result<()> {
    let table = session.table;

    let mut rows = Vec::new();
    if session.tree_mode {
        for &line in &session.walk.order {
            // lines with a tree parent appear nested in their parent's
            // "children"; group children surface here in walk order
            if table.lines[line].parent.is_none() {
                rows.push(line_value(session, line));
            }
        }
    } else {
        for &line in &session.walk.order {
            rows.push(line_value(session, line));
        }
    }

    let mut root = Map::new();
    root.insert(table.name().to_string(), Value::Array(rows));

    let formatter = PrettyFormatter::with_indent(b"   ");
    let mut serializer = Serializer::with_formatter(&mut *sink, formatter);
    serde::Serialize::serialize(&Value::Object(root), &mut serializer)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    Ok(())
}

fn line_value(session: &Session<'_>, line: LineHandle) -> Value {
    let table = session.table;
    let mut object = Map::new();

    for ci in session.visible_columns() {
        let col = &table.columns[table.column_order[ci]];
        let data = table.lines[line]
            .cell(col.seqnum)
            .map(Cell::data)
            .unwrap_or("");
        object.insert(col.name().to_lowercase(), typed_value(col.json_type, data));
    }

    if session.tree_mode && table.lines[line].has_children() {
        let children = table.lines[line]
            .children
            .iter()
            .map(|&child| line_value(session, child))
            .collect();
        object.insert("children".to_string(), Value::Array(children));
    }

    Value::Object(object)
}

fn typed_value(json_type: JsonType, data: &str) -> Value {
    match json_type {
        JsonType::String => Value::String(data.to_string()),
        JsonType::Number => {
            if data.is_empty() {
                Value::Null
            } else if let Ok(n) = data.parse::<i64>() {
                Value::from(n)
            } else if let Some(n) = data.parse::<f64>().ok().and_then(serde_json::Number::from_f64)
            {
                Value::Number(n)
            } else {
                // an unparsable "number" degrades to a quoted string rather
                // than producing invalid JSON
                Value::String(data.to_string())
            }
        }
        JsonType::Boolean => {
            if data.is_empty() {
                Value::Null
            } else {
                Value::Bool(data != "0" && !data.starts_with(['n', 'N']))
            }
        }
    }
}
