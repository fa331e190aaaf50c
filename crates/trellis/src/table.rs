//! The table: owned graph of columns, lines, and groups, plus output
//! configuration and the print entry points.

use std::io::Write;

use console::Style;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::arena::Arena;
use crate::cell::Cell;
use crate::column::{Column, ColumnFlags, ColumnHandle, WidthHint};
use crate::error::{Error, Result};
use crate::group::{Group, GroupHandle};
use crate::line::{Line, LineHandle};
use crate::render;
use crate::symbols::Symbols;

/// Output format, selected once per table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Aligned columns for people (default).
    #[default]
    Human,
    /// Space-separated values, blanks escaped.
    Raw,
    /// `NAME="value"` pairs, shell-quoted.
    Export,
    /// Nested JSON mirroring the tree.
    Json,
}

/// Column sizing mode for human output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sizing {
    /// Fit the terminal, growing only the last column (default).
    #[default]
    Fit,
    /// Grow columns until the full terminal width is used.
    MaxOut,
    /// Truncate or drop trailing columns rather than ever exceeding the
    /// terminal width.
    NoWrap,
}

/// A table of lines and columns, optionally nested into trees and groups.
///
/// Lines, columns, and groups live in arenas owned by the table and are
/// addressed through copyable handles; a handle taken before an entity was
/// removed stops resolving rather than aliasing a recycled slot. Rendering
/// borrows the table immutably: all per-pass state (column widths, pending
/// wrapped text, the group track set) lives in a session value internal to
/// one print call.
///
/// ```
/// use trellis::{Column, ColumnFlags, Table, WidthHint};
///
/// let mut table = Table::new();
/// let name = table.add_column(Column::new("NAME").flags(ColumnFlags::TREE));
/// let size = table.add_column(Column::new("SIZE"));
/// let root = table.new_line(None)?;
/// table.set_data(root, name, "root")?;
/// table.set_data(root, size, "10G")?;
/// let out = table.print_to_string()?;
/// # assert!(out.contains("root"));
/// # Ok::<(), trellis::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct Table {
    name: String,
    pub(crate) columns: Arena<Column>,
    pub(crate) column_order: Vec<ColumnHandle>,
    pub(crate) lines: Arena<Line>,
    pub(crate) line_order: Vec<LineHandle>,
    pub(crate) groups: Arena<Group>,
    pub(crate) group_order: Vec<GroupHandle>,

    pub(crate) format: Format,
    pub(crate) sizing: Sizing,
    pub(crate) term_width: Option<usize>,
    pub(crate) term_height: Option<usize>,
    pub(crate) term_reduce: usize,
    pub(crate) force_term: Option<bool>,
    pub(crate) ascii: bool,
    pub(crate) symbols: Option<Symbols>,
    pub(crate) col_sep: Option<String>,
    pub(crate) line_sep: Option<String>,
    pub(crate) title: Option<Cell>,
    pub(crate) no_headings: bool,
    pub(crate) header_repeat: bool,
    pub(crate) colors: bool,
}

impl Table {
    pub fn new() -> Self {
        Table {
            name: "table".to_string(),
            ..Table::default()
        }
    }

    // ----- configuration ---------------------------------------------------

    /// Table name, used as the root key of JSON output.
    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_format(&mut self, format: Format) -> &mut Self {
        self.format = format;
        self
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn set_sizing(&mut self, sizing: Sizing) -> &mut Self {
        self.sizing = sizing;
        self
    }

    /// Override the detected terminal width.
    pub fn set_term_width(&mut self, cells: usize) -> &mut Self {
        self.term_width = Some(cells);
        self
    }

    /// Override the detected terminal height, used by header repetition.
    pub fn set_term_height(&mut self, rows: usize) -> &mut Self {
        self.term_height = Some(rows);
        self
    }

    /// Margin subtracted from the terminal width before sizing.
    pub fn set_term_reduce(&mut self, cells: usize) -> &mut Self {
        self.term_reduce = cells;
        self
    }

    /// Force terminal (or non-terminal) layout regardless of detection.
    /// Without a forced value, human output balances column widths only when
    /// a terminal is detected.
    pub fn set_force_term(&mut self, term: bool) -> &mut Self {
        self.force_term = Some(term);
        self
    }

    /// Use the seven-bit ASCII connector set instead of box drawing.
    pub fn set_ascii(&mut self, ascii: bool) -> &mut Self {
        self.ascii = ascii;
        self
    }

    /// Replace the connector glyph table entirely.
    pub fn set_symbols(&mut self, symbols: Symbols) -> &mut Self {
        self.symbols = Some(symbols);
        self
    }

    /// Column separator for human and raw output (default one space).
    pub fn set_column_sep(&mut self, sep: impl Into<String>) -> &mut Self {
        self.col_sep = Some(sep.into());
        self
    }

    /// Row separator (default newline).
    pub fn set_line_sep(&mut self, sep: impl Into<String>) -> &mut Self {
        self.line_sep = Some(sep.into());
        self
    }

    /// Title printed above human output, aligned per the cell's alignment.
    pub fn set_title(&mut self, title: impl Into<Cell>) -> &mut Self {
        self.title = Some(title.into());
        self
    }

    pub fn set_no_headings(&mut self, no_headings: bool) -> &mut Self {
        self.no_headings = no_headings;
        self
    }

    /// Re-print the header every terminal-height rows (human list output on
    /// a terminal only).
    pub fn enable_header_repeat(&mut self, repeat: bool) -> &mut Self {
        self.header_repeat = repeat;
        self
    }

    pub fn enable_colors(&mut self, colors: bool) -> &mut Self {
        self.colors = colors;
        self
    }

    // ----- columns ---------------------------------------------------------

    /// Append a column; display order is insertion order.
    pub fn add_column(&mut self, mut column: Column) -> ColumnHandle {
        column.seqnum = self.column_order.len();
        let handle = self.columns.insert(column);
        self.column_order.push(handle);
        handle
    }

    /// Shorthand for the common name/hint/flags case.
    pub fn add_column_named(
        &mut self,
        name: impl Into<String>,
        hint: WidthHint,
        flags: ColumnFlags,
    ) -> ColumnHandle {
        self.add_column(Column::new(name).hint(hint).flags(flags))
    }

    pub fn column(&self, handle: ColumnHandle) -> Result<&Column> {
        self.columns.get(handle).ok_or(Error::StaleHandle("column"))
    }

    pub fn column_handles(&self) -> &[ColumnHandle] {
        &self.column_order
    }

    pub fn column_count(&self) -> usize {
        self.column_order.len()
    }

    /// Remove a column and every line's cell in it. Remaining columns are
    /// renumbered to keep seqnums dense.
    pub fn remove_column(&mut self, handle: ColumnHandle) -> Result<()> {
        let seqnum = self.column(handle)?.seqnum;
        self.column_order.remove(seqnum);
        self.columns.remove(handle);
        for &lh in &self.line_order {
            let line = &mut self.lines[lh];
            if seqnum < line.cells.len() {
                line.cells.remove(seqnum);
            }
        }
        self.renumber_columns();
        debug!("removed column at seqnum {seqnum}");
        Ok(())
    }

    /// Move a column to display position `index`, carrying cell data along.
    pub fn move_column(&mut self, handle: ColumnHandle, index: usize) -> Result<()> {
        let seqnum = self.column(handle)?.seqnum;
        if index >= self.column_order.len() {
            return Err(Error::InvalidArgument("column index out of range"));
        }
        if index == seqnum {
            return Ok(());
        }
        self.column_order.remove(seqnum);
        self.column_order.insert(index, handle);
        let ncols = self.column_order.len();
        for &lh in &self.line_order {
            let line = &mut self.lines[lh];
            if line.cells.len() < ncols {
                line.cells.resize_with(ncols, Cell::default);
            }
            let cell = line.cells.remove(seqnum);
            line.cells.insert(index, cell);
        }
        self.renumber_columns();
        Ok(())
    }

    fn renumber_columns(&mut self) {
        for (i, &ch) in self.column_order.iter().enumerate() {
            self.columns[ch].seqnum = i;
        }
    }

    // ----- lines -----------------------------------------------------------

    /// Append a line, optionally as a tree child of `parent`.
    pub fn new_line(&mut self, parent: Option<LineHandle>) -> Result<LineHandle> {
        if let Some(p) = parent {
            if !self.lines.contains(p) {
                return Err(Error::StaleHandle("parent line"));
            }
        }
        let handle = self.lines.insert(Line::new());
        self.line_order.push(handle);
        if let Some(p) = parent {
            self.lines[p].children.push(handle);
            self.lines[handle].parent = Some(p);
        }
        Ok(handle)
    }

    pub fn line_handles(&self) -> &[LineHandle] {
        &self.line_order
    }

    pub fn line_count(&self) -> usize {
        self.line_order.len()
    }

    pub fn line_parent(&self, line: LineHandle) -> Result<Option<LineHandle>> {
        Ok(self.get_line(line)?.parent)
    }

    pub fn line_children(&self, line: LineHandle) -> Result<&[LineHandle]> {
        Ok(self.get_line(line)?.children.as_slice())
    }

    /// The group a line is a member of, if any.
    pub fn line_group(&self, line: LineHandle) -> Result<Option<GroupHandle>> {
        Ok(self.get_line(line)?.group)
    }

    /// Default style for every cell of the line without its own style.
    pub fn set_line_style(&mut self, line: LineHandle, style: Option<Style>) -> Result<()> {
        self.get_line_mut(line)?.style = style;
        Ok(())
    }

    pub fn set_data(
        &mut self,
        line: LineHandle,
        column: ColumnHandle,
        data: impl Into<String>,
    ) -> Result<()> {
        let seqnum = self.column(column)?.seqnum;
        self.get_line_mut(line)?.cell_mut(seqnum).set_data(data);
        Ok(())
    }

    pub fn set_cell(&mut self, line: LineHandle, column: ColumnHandle, cell: Cell) -> Result<()> {
        let seqnum = self.column(column)?.seqnum;
        *self.get_line_mut(line)?.cell_mut(seqnum) = cell;
        Ok(())
    }

    pub fn cell_data(&self, line: LineHandle, column: ColumnHandle) -> Result<&str> {
        let seqnum = self.column(column)?.seqnum;
        Ok(self
            .get_line(line)?
            .cell(seqnum)
            .map(Cell::data)
            .unwrap_or(""))
    }

    /// Remove a line from the table.
    ///
    /// The line is detached from its tree parent or group in the same
    /// operation; its own children (and, if it was the last member of a
    /// group, the group's children) are detached and become roots rather
    /// than being deleted.
    pub fn remove_line(&mut self, line: LineHandle) -> Result<()> {
        if !self.lines.contains(line) {
            return Err(Error::StaleHandle("line"));
        }

        // back-edges from parent or owning group
        if let Some(p) = self.lines[line].parent {
            self.lines[p].children.retain(|&c| c != line);
        } else if let Some(g) = self.lines[line].parent_group {
            self.groups[g].children.retain(|&c| c != line);
        }

        if let Some(g) = self.lines[line].group {
            self.groups[g].members.retain(|&m| m != line);
            if self.groups[g].members.is_empty() {
                self.dissolve_group(g);
            }
        }

        let children = std::mem::take(&mut self.lines[line].children);
        for child in children {
            self.lines[child].parent = None;
        }

        self.line_order.retain(|&l| l != line);
        self.lines.remove(line);
        debug!("removed line; {} remain", self.line_order.len());
        Ok(())
    }

    /// A group that lost its last member cannot be drawn or walked; its
    /// children go back to being roots.
    fn dissolve_group(&mut self, group: GroupHandle) {
        let children = std::mem::take(&mut self.groups[group].children);
        for child in children {
            self.lines[child].parent_group = None;
        }
        self.group_order.retain(|&g| g != group);
        self.groups.remove(group);
        debug!("dissolved empty group");
    }

    // ----- groups ----------------------------------------------------------

    /// Add `line` to the group `member` belongs to, creating the group if
    /// `member` is not grouped yet. With `line` as `None` only the group is
    /// created. A line can be a member of at most one group.
    pub fn group_lines(
        &mut self,
        member: LineHandle,
        line: Option<LineHandle>,
    ) -> Result<GroupHandle> {
        if !self.lines.contains(member) {
            return Err(Error::StaleHandle("group member"));
        }
        if let Some(l) = line {
            if !self.lines.contains(l) {
                return Err(Error::StaleHandle("line"));
            }
            let lg = self.lines[l].group;
            let mg = self.lines[member].group;
            if lg.is_some() && mg.is_none() {
                return Err(Error::InvalidArgument(
                    "line is already a member of another group",
                ));
            }
            if let (Some(a), Some(b)) = (lg, mg) {
                if a != b {
                    return Err(Error::InvalidArgument(
                        "line and member belong to different groups",
                    ));
                }
            }
        }

        let group = match self.lines[member].group {
            Some(g) => g,
            None => {
                let g = self.groups.insert(Group::default());
                self.group_order.push(g);
                self.lines[member].group = Some(g);
                self.groups[g].members.push(member);
                debug!("created group for seed member");
                g
            }
        };

        if let Some(l) = line {
            if self.lines[l].group.is_none() {
                self.lines[l].group = Some(group);
                self.groups[group].members.push(l);
            }
        }
        Ok(group)
    }

    /// Attach `line` as a child of the group `member` belongs to.
    ///
    /// The line must not have a tree parent (tree and group parentage are
    /// mutually exclusive), must not already hang off a group, and must not
    /// have tree children of its own when linked.
    pub fn link_group_child(&mut self, line: LineHandle, member: LineHandle) -> Result<()> {
        if !self.lines.contains(line) || !self.lines.contains(member) {
            return Err(Error::StaleHandle("line"));
        }
        let group = self.lines[member].group.ok_or(Error::InvalidArgument(
            "member does not belong to any group",
        ))?;
        if self.lines[line].parent.is_some() {
            return Err(Error::InvalidArgument(
                "line already has a tree parent",
            ));
        }
        if self.lines[line].parent_group.is_some() {
            return Err(Error::InvalidArgument(
                "line is already a group child",
            ));
        }
        if !self.lines[line].children.is_empty() {
            return Err(Error::InvalidArgument(
                "line with children cannot become a group child",
            ));
        }
        self.groups[group].children.push(line);
        self.lines[line].parent_group = Some(group);
        Ok(())
    }

    pub fn group(&self, handle: GroupHandle) -> Result<&Group> {
        self.groups.get(handle).ok_or(Error::StaleHandle("group"))
    }

    // ----- printing --------------------------------------------------------

    /// Render the whole table to `sink`, terminated by a final newline.
    ///
    /// An empty table (no lines) produces no output, except in JSON format
    /// where the empty wrapper object is still emitted. A table without
    /// columns is an error.
    pub fn print(&self, sink: &mut dyn Write) -> Result<()> {
        let printed = render::print_table(self, sink)?;
        if printed {
            sink.write_all(b"\n")?;
        }
        Ok(())
    }

    /// Render the lines from `start` to `end` inclusive (list order), `None`
    /// meaning the begin/end of the table. The header is printed only when
    /// the range starts at the first line; no final newline is appended.
    ///
    /// Ranges are for flat list output: tables with a tree column and the
    /// JSON format are rejected.
    pub fn print_range(
        &self,
        sink: &mut dyn Write,
        start: Option<LineHandle>,
        end: Option<LineHandle>,
    ) -> Result<()> {
        render::print_range(self, sink, start, end)
    }

    /// Render to an owned string. Unlike [`print`](Self::print), no final
    /// newline is appended.
    pub fn print_to_string(&self) -> Result<String> {
        let mut out = Vec::new();
        render::print_table(self, &mut out)?;
        String::from_utf8(out).map_err(|_| Error::InvalidArgument("output is not valid UTF-8"))
    }

    // ----- internal helpers ------------------------------------------------

    fn get_line(&self, line: LineHandle) -> Result<&Line> {
        self.lines.get(line).ok_or(Error::StaleHandle("line"))
    }

    fn get_line_mut(&mut self, line: LineHandle) -> Result<&mut Line> {
        self.lines.get_mut(line).ok_or(Error::StaleHandle("line"))
    }

    pub(crate) fn has_groups(&self) -> bool {
        !self.group_order.is_empty()
    }

    /// Tree traversal and connectors engage as soon as any column carries
    /// the TREE flag.
    pub(crate) fn is_tree_mode(&self) -> bool {
        self.column_order
            .iter()
            .any(|&ch| self.columns[ch].is_tree())
    }

    pub(crate) fn col_sep(&self) -> &str {
        self.col_sep.as_deref().unwrap_or(" ")
    }

    pub(crate) fn line_sep(&self) -> &str {
        self.line_sep.as_deref().unwrap_or("\n")
    }

    /// Whether `line` is the last child at its own nesting level. Roots
    /// count as last (nothing below them continues an ancestor line).
    pub(crate) fn is_last_child(&self, line: LineHandle) -> bool {
        let ln = &self.lines[line];
        if let Some(p) = ln.parent {
            self.lines[p].children.last() == Some(&line)
        } else if let Some(g) = ln.parent_group {
            self.groups[g].is_last_child(line)
        } else {
            true
        }
    }
}
