//! Raw and export output.
//!
//! Both forms skip width balancing entirely: raw emits safe-encoded cell
//! data (blanks escaped so the output splits on whitespace) joined by the
//! column separator, export emits `NAME="value"` pairs with shell quoting.
//! Tree and group decoration is not drawn; these formats carry data, not
//! layout.

use std::io::Write;

use crate::cell::Cell;
use crate::error::Result;
use crate::line::LineHandle;
use crate::table::Format;
use crate::text;

use super::Session;

pub(crate) fn print(session: &mut Session<'_>, sink: &mut dyn Write) -> Result<()> {
    if session.table.format == Format::Raw {
        print_header(session, sink)?;
    }

    let order = session.walk.order.clone();
    for (i, &line) in order.iter().enumerate() {
        print_line(session, sink, line)?;
        if i + 1 < order.len() {
            sink.write_all(session.table.line_sep().as_bytes())?;
        }
    }
    Ok(())
}

/// Raw output carries a header row of column names unless headings are off.
pub(crate) fn print_header(session: &mut Session<'_>, sink: &mut dyn Write) -> Result<()> {
    let table = session.table;
    if table.no_headings || table.line_order.is_empty() {
        return Ok(());
    }
    let visible = session.visible_columns();
    for (i, &ci) in visible.iter().enumerate() {
        let name = table.columns[table.column_order[ci]].name();
        sink.write_all(text::encode_nonblank(name).as_bytes())?;
        if i + 1 < visible.len() {
            sink.write_all(table.col_sep().as_bytes())?;
        }
    }
    sink.write_all(table.line_sep().as_bytes())?;
    Ok(())
}

pub(crate) fn print_line(
    session: &mut Session<'_>,
    sink: &mut dyn Write,
    line: LineHandle,
) -> Result<()> {
    let table = session.table;
    let visible = session.visible_columns();
    for (i, &ci) in visible.iter().enumerate() {
        let col = &table.columns[table.column_order[ci]];
        let data = table.lines[line]
            .cell(col.seqnum)
            .map(Cell::data)
            .unwrap_or("");

        match table.format {
            Format::Export => {
                sink.write_all(text::shell_var_name(col.name()).as_bytes())?;
                sink.write_all(b"=")?;
                sink.write_all(text::quote_export(data).as_bytes())?;
            }
            _ => {
                sink.write_all(text::encode_nonblank(data).as_bytes())?;
            }
        }
        if i + 1 < visible.len() {
            sink.write_all(table.col_sep().as_bytes())?;
        }
    }
    Ok(())
}
