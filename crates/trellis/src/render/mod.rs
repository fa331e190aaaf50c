//! Render engine.
//!
//! Each print call builds a [`Session`]: the resolved glyph table, terminal
//! geometry, traversal plan, group chart tracks, and per-column width and
//! pagination state. Nothing of this survives the call or touches the table
//! itself, so a `&Table` can be printed repeatedly without reset steps.
//!
//! The format set is closed: human-aligned columns are rendered here, the
//! raw/export forms in [`flat`], and JSON in [`json`], dispatched by one
//! match per call.

mod flat;
mod json;

use std::io::Write;

use console::Style;
use log::debug;

use crate::buffer::ScratchBuffer;
use crate::cell::{Align, Cell};
use crate::chart::GroupChart;
use crate::error::{Error, Result};
use crate::line::LineHandle;
use crate::symbols::Symbols;
use crate::table::{Format, Sizing, Table};
use crate::text;
use crate::walk::WalkPlan;
use crate::width::{self, ColState};

/// Transient state for one render pass.
pub(crate) struct Session<'a> {
    pub table: &'a Table,
    pub symbols: Symbols,
    pub is_term: bool,
    pub term_width: usize,
    pub term_height: usize,
    pub tree_mode: bool,
    pub cols: Vec<ColState>,
    pub chart: GroupChart,
    /// Column (by display index) carrying the group chart.
    pub chart_col: Option<usize>,
    pub walk: WalkPlan,
    pub buf: ScratchBuffer,
    lines_used: usize,
    header_next: usize,
    repeat_header: bool,
}

impl<'a> Session<'a> {
    pub fn new(table: &'a Table) -> Self {
        let symbols = table.symbols.clone().unwrap_or_else(|| {
            if table.ascii {
                Symbols::ascii()
            } else {
                Symbols::unicode()
            }
        });

        let detected = terminal_size::terminal_size();
        let is_term = match table.format {
            Format::Human => table.force_term.unwrap_or(detected.is_some()),
            _ => false,
        };
        let mut term_width = table
            .term_width
            .or(detected.map(|(w, _)| w.0 as usize))
            .unwrap_or(80);
        if table.term_reduce > 0 && table.term_reduce < term_width {
            term_width -= table.term_reduce;
        }
        let term_height = table
            .term_height
            .or(detected.map(|(_, h)| h.0 as usize))
            .unwrap_or(24);

        let tree_mode = table.is_tree_mode();
        let walk = if tree_mode {
            WalkPlan::tree(table)
        } else {
            WalkPlan::list(table)
        };

        let chart_col = if tree_mode && table.has_groups() && table.format == Format::Human {
            table.column_order.iter().position(|&ch| {
                let col = &table.columns[ch];
                col.is_tree() && !col.is_hidden()
            })
        } else {
            None
        };

        let mut chart = GroupChart::new();
        if chart_col.is_some() {
            // sizing replay: grow the track array exactly as printing will,
            // so the chart column can reserve its final width up front
            for &line in &walk.order {
                chart.update_for_line(table, &walk, line);
            }
            chart.reset();
            debug!("group chart reserves {} cells", chart.reserve_width());
        }

        let ncols = table.column_order.len();
        let mut cols = vec![ColState::default(); ncols];
        for (ci, st) in cols.iter_mut().enumerate() {
            st.hidden = table.columns[table.column_order[ci]].is_hidden();
        }

        let repeat_header =
            table.header_repeat && is_term && table.format == Format::Human && !tree_mode;

        Session {
            table,
            symbols,
            is_term,
            term_width,
            term_height,
            tree_mode,
            cols,
            chart,
            chart_col,
            walk,
            buf: ScratchBuffer::new(),
            lines_used: 0,
            header_next: usize::MAX,
            repeat_header,
        }
    }

    pub fn visible_columns(&self) -> Vec<usize> {
        (0..self.cols.len())
            .filter(|&ci| !self.cols[ci].hidden)
            .collect()
    }

    pub fn is_last_visible(&self, ci: usize) -> bool {
        !self
            .cols
            .iter()
            .enumerate()
            .any(|(i, st)| i > ci && !st.hidden)
    }

    fn has_pending(&self) -> bool {
        self.cols.iter().any(|st| st.pending.is_some())
    }

    /// Compose decoration plus data for one cell into the scratch buffer.
    ///
    /// Tree columns get the group chart (chart column only, and only when
    /// `with_chart`), one continuation-or-blank per ancestor, and the
    /// branch/corner connector; the art boundary is recorded so styling
    /// stays off the decoration. The width pass composes without the chart
    /// and accounts for its reserved cells numerically.
    pub fn compose_cell(&mut self, line: LineHandle, ci: usize, with_chart: bool) {
        self.buf.reset();
        let table = self.table;
        let col = &table.columns[table.column_order[ci]];
        let data = table.lines[line]
            .cell(col.seqnum)
            .map(Cell::data)
            .unwrap_or("");

        if !col.is_tree() {
            self.buf.push_str(data);
            return;
        }

        if with_chart && self.chart_col == Some(ci) {
            self.chart.render(&mut self.buf, &self.symbols, false);
        }

        let mut ancestors = Vec::new();
        let mut up = table.lines[line].parent;
        while let Some(anc) = up {
            ancestors.push(anc);
            up = table.lines[anc].parent;
        }
        for &anc in ancestors.iter().rev() {
            // roots draw nothing; there is no ancestor line to continue
            if table.lines[anc].parent.is_none() {
                continue;
            }
            if table.is_last_child(anc) {
                self.buf.push_str("  ");
            } else {
                self.buf.push_str(&self.symbols.vertical);
            }
        }
        if table.lines[line].parent.is_some() {
            if table.is_last_child(line) {
                self.buf.push_str(&self.symbols.right);
            } else {
                self.buf.push_str(&self.symbols.branch);
            }
        }
        if table.lines[line].parent.is_some() || self.chart_col == Some(ci) {
            self.buf.mark_art_end();
        }
        self.buf.push_str(data);
    }

    // ----- human format ----------------------------------------------------

    fn print_human(&mut self, sink: &mut dyn Write) -> Result<()> {
        self.print_title(sink)?;
        self.print_header(sink)?;

        let order = self.walk.order.clone();
        for (i, &line) in order.iter().enumerate() {
            if self.chart_col.is_some() {
                self.chart.update_for_line(self.table, &self.walk, line);
            }
            self.print_line(sink, line)?;
            if i + 1 < order.len() {
                sink.write_all(self.table.line_sep().as_bytes())?;
                self.lines_used += 1;
                if self.repeat_header && self.header_next <= self.lines_used {
                    self.print_header(sink)?;
                }
            }
        }
        Ok(())
    }

    fn print_line(&mut self, sink: &mut dyn Write, line: LineHandle) -> Result<()> {
        let visible = self.visible_columns();
        for &ci in &visible {
            self.compose_cell(line, ci, true);
            self.print_data(sink, Some(line), ci)?;
        }

        // extra physical lines for wrapped cells
        while self.has_pending() {
            sink.write_all(self.table.line_sep().as_bytes())?;
            self.lines_used += 1;
            for &ci in &visible {
                if self.cols[ci].pending.is_some() {
                    self.print_pending(sink, line, ci)?;
                } else {
                    self.print_empty_cell(sink, Some(line), ci)?;
                }
            }
        }
        Ok(())
    }

    /// Write one composed cell: align, truncate or stash overflow as
    /// pending data, pad, and separate.
    fn print_data(&mut self, sink: &mut dyn Write, line: Option<LineHandle>, ci: usize) -> Result<()> {
        let table = self.table;
        let col = &table.columns[table.column_order[ci]];
        let is_last = self.is_last_visible(ci);
        let maxout = table.sizing == Sizing::MaxOut;

        let (art, mut data) = {
            let (a, d) = self.buf.split_art();
            (a.to_string(), text::safe_encode(d, &col.safe_chars))
        };
        let art_width = text::display_width(&art);
        let mut len = art_width + text::display_width(&data);
        let mut width = self.cols[ci].width;

        // a short last column keeps the row short
        if is_last && len < width && !maxout && !col.is_right() {
            width = len;
        }

        // headers never spill over or wrap
        let trunc = col.is_trunc() || self.cols[ci].forced_trunc || line.is_none();
        if len > width && trunc {
            let avail = width.saturating_sub(art_width);
            let (bytes, w) = text::truncate_to_cells(&data, avail);
            data.truncate(bytes);
            len = art_width + w;
        }
        if len > width && col.is_wrap() && line.is_some() {
            let avail = width.saturating_sub(art_width);
            let (bytes, w) = text::truncate_to_cells(&data, avail);
            if bytes > 0 {
                self.cols[ci].pending = Some(data[bytes..].to_string());
                data.truncate(bytes);
                len = art_width + w;
            }
        }

        let style = self.data_style(line, ci);
        if col.is_right() && len < width {
            self.write_pad(sink, width - len)?;
            len = width;
        }
        sink.write_all(art.as_bytes())?;
        self.write_styled(sink, style.as_ref(), &data)?;

        if is_last && !maxout {
            return Ok(());
        }
        self.write_pad(sink, width.saturating_sub(len))?;

        if len > width && !trunc && self.cols[ci].pending.is_none() {
            // an overflowing column that neither truncates nor wraps pushes
            // the rest of the row onto the next physical line
            self.print_newline_padding(sink, line, ci)?;
        } else if !is_last {
            sink.write_all(table.col_sep().as_bytes())?;
        }
        Ok(())
    }

    /// Write the next chunk of a wrapped cell on an extra physical line.
    fn print_pending(&mut self, sink: &mut dyn Write, line: LineHandle, ci: usize) -> Result<()> {
        let Some(pending) = self.cols[ci].pending.take() else {
            return Ok(());
        };
        let width = self.cols[ci].width;
        let is_last = self.is_last_visible(ci);
        let maxout = self.table.sizing == Sizing::MaxOut;

        let (bytes, w) = text::truncate_to_cells(&pending, width);
        // a chunk that cannot advance would loop forever; drop it
        if bytes > 0 && bytes < pending.len() {
            self.cols[ci].pending = Some(pending[bytes..].to_string());
        }
        let chunk = &pending[..bytes];

        let style = self.data_style(Some(line), ci);
        self.write_styled(sink, style.as_ref(), chunk)?;

        if is_last && !maxout {
            return Ok(());
        }
        self.write_pad(sink, width.saturating_sub(w))?;
        if !is_last {
            sink.write_all(self.table.col_sep().as_bytes())?;
        }
        Ok(())
    }

    /// Decoration-only filler for a column with nothing left to print.
    fn print_empty_cell(
        &mut self,
        sink: &mut dyn Write,
        line: Option<LineHandle>,
        ci: usize,
    ) -> Result<()> {
        let table = self.table;
        let col = &table.columns[table.column_order[ci]];
        let width = self.cols[ci].width;
        let is_last = self.is_last_visible(ci);
        let maxout = table.sizing == Sizing::MaxOut;

        let mut len_pad = 0;
        if let Some(l) = line {
            if col.is_tree() {
                self.buf.reset();
                if self.chart_col == Some(ci) {
                    self.chart.render(&mut self.buf, &self.symbols, true);
                }
                let mut chain = vec![l];
                let mut up = table.lines[l].parent;
                while let Some(anc) = up {
                    chain.push(anc);
                    up = table.lines[anc].parent;
                }
                for &anc in chain.iter().rev() {
                    // group children and roots carry no tree art of their own
                    if table.lines[anc].parent.is_none() {
                        continue;
                    }
                    if table.is_last_child(anc) {
                        self.buf.push_str("  ");
                    } else {
                        self.buf.push_str(&self.symbols.vertical);
                    }
                }
                // keep the branch to this line's children flowing through
                // the extra lines
                if table.lines[l].has_children() && self.has_pending() {
                    self.buf.push_str(&self.symbols.vertical);
                }
                len_pad = text::display_width(self.buf.data());
                sink.write_all(self.buf.data().as_bytes())?;
            }
        }

        if is_last && !maxout {
            return Ok(());
        }
        self.write_pad(sink, width.saturating_sub(len_pad))?;
        if !is_last {
            sink.write_all(table.col_sep().as_bytes())?;
        }
        Ok(())
    }

    /// After an untruncatable overflow, break the line and fill every
    /// column up to and including `ci` with empty cells.
    fn print_newline_padding(
        &mut self,
        sink: &mut dyn Write,
        line: Option<LineHandle>,
        ci: usize,
    ) -> Result<()> {
        sink.write_all(self.table.line_sep().as_bytes())?;
        self.lines_used += 1;
        for c in self.visible_columns() {
            if c > ci {
                break;
            }
            self.print_empty_cell(sink, line, c)?;
        }
        Ok(())
    }

    fn print_header(&mut self, sink: &mut dyn Write) -> Result<()> {
        let table = self.table;
        if table.no_headings || table.line_order.is_empty() {
            return Ok(());
        }
        for ci in self.visible_columns() {
            self.buf.reset();
            if self.chart_col == Some(ci) {
                self.buf
                    .push_repeated(&self.symbols.cell_padding, self.chart.reserve_width());
            }
            let name = table.columns[table.column_order[ci]].name();
            self.buf.push_str(name);
            self.print_data(sink, None, ci)?;
        }
        sink.write_all(table.line_sep().as_bytes())?;
        self.lines_used += 1;
        self.header_next = self.lines_used + self.term_height;
        Ok(())
    }

    fn print_title(&mut self, sink: &mut dyn Write) -> Result<()> {
        let Some(title) = &self.table.title else {
            return Ok(());
        };
        if title.is_empty() {
            return Ok(());
        }

        let width = if self.is_term { self.term_width } else { 80 };
        let mut text = text::safe_encode(title.data(), "");
        let mut len = text::display_width(&text);
        if len > width {
            let (bytes, w) = text::truncate_to_cells(&text, width);
            text.truncate(bytes);
            len = w;
        }

        let pad = self.symbols.title_padding.clone();
        let blank_pad = pad.chars().next().is_some_and(|c| c == ' ' || c == '\t');
        let maxout = self.table.sizing == Sizing::MaxOut;
        let (left, right) = match title.align() {
            Align::Right => (width - len, 0),
            Align::Center => {
                let left = (width - len) / 2;
                (left, width - len - left)
            }
            // no blank tail after a left-aligned title, matching the last
            // column of the table itself
            Align::Left if !maxout && blank_pad => (0, 0),
            Align::Left => (0, width - len),
        };

        for _ in 0..left {
            sink.write_all(pad.as_bytes())?;
        }
        let style = if self.table.colors {
            title.style().cloned()
        } else {
            None
        };
        self.write_styled(sink, style.as_ref(), &text)?;
        for _ in 0..right {
            sink.write_all(pad.as_bytes())?;
        }
        sink.write_all(b"\n")?;
        Ok(())
    }

    // ----- low-level output ------------------------------------------------

    fn data_style(&self, line: Option<LineHandle>, ci: usize) -> Option<Style> {
        if !self.table.colors {
            return None;
        }
        let col = &self.table.columns[self.table.column_order[ci]];
        match line {
            Some(l) => {
                let ln = &self.table.lines[l];
                ln.cell(col.seqnum)
                    .and_then(|c| c.style().cloned())
                    .or_else(|| ln.style.clone())
                    .or_else(|| col.style.clone())
            }
            None => col.header.style().cloned().or_else(|| col.style.clone()),
        }
    }

    fn write_styled(
        &self,
        sink: &mut dyn Write,
        style: Option<&Style>,
        text: &str,
    ) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        match style {
            Some(style) => {
                let styled = style.clone().force_styling(true).apply_to(text);
                write!(sink, "{styled}")?;
            }
            None => sink.write_all(text.as_bytes())?,
        }
        Ok(())
    }

    fn write_pad(&self, sink: &mut dyn Write, cells: usize) -> Result<()> {
        for _ in 0..cells {
            sink.write_all(self.symbols.cell_padding.as_bytes())?;
        }
        Ok(())
    }
}

/// Render a whole table. Returns whether anything was written, so the
/// caller can decide about the final newline.
pub(crate) fn print_table(table: &Table, sink: &mut dyn Write) -> Result<bool> {
    if table.column_order.is_empty() {
        return Err(Error::InvalidArgument("table has no columns"));
    }
    if table.line_order.is_empty() && table.format != Format::Json {
        debug!("table has no lines, nothing to print");
        return Ok(false);
    }

    let mut session = Session::new(table);
    match table.format {
        Format::Human => {
            width::compute(&mut session);
            session.print_human(sink)?;
        }
        Format::Raw | Format::Export => flat::print(&mut session, sink)?,
        Format::Json => json::print(&mut session, sink)?,
    }
    Ok(true)
}

/// Render the line range `start..=end` in list order.
pub(crate) fn print_range(
    table: &Table,
    sink: &mut dyn Write,
    start: Option<LineHandle>,
    end: Option<LineHandle>,
) -> Result<()> {
    if table.column_order.is_empty() {
        return Err(Error::InvalidArgument("table has no columns"));
    }
    if table.is_tree_mode() {
        return Err(Error::InvalidArgument(
            "ranges are not supported for tree tables",
        ));
    }
    if table.format == Format::Json {
        return Err(Error::InvalidArgument(
            "ranges are not supported for json output",
        ));
    }

    let start_idx = match start {
        Some(h) => table
            .line_order
            .iter()
            .position(|&l| l == h)
            .ok_or(Error::StaleHandle("start line"))?,
        None => 0,
    };
    let end_idx = match end {
        Some(h) => table
            .line_order
            .iter()
            .position(|&l| l == h)
            .ok_or(Error::StaleHandle("end line"))?,
        None => table.line_order.len().saturating_sub(1),
    };
    if table.line_order.is_empty() {
        return Ok(());
    }
    if end_idx < start_idx {
        return Err(Error::InvalidArgument("end line precedes start line"));
    }

    let mut session = Session::new(table);
    if table.format == Format::Human {
        width::compute(&mut session);
    }

    if start_idx == 0 {
        match table.format {
            Format::Human => session.print_header(sink)?,
            Format::Raw => flat::print_header(&mut session, sink)?,
            _ => {}
        }
    }

    for i in start_idx..=end_idx {
        let line = table.line_order[i];
        match table.format {
            Format::Human => session.print_line(sink, line)?,
            _ => flat::print_line(&mut session, sink, line)?,
        }
        if i < end_idx {
            sink.write_all(table.line_sep().as_bytes())?;
            session.lines_used += 1;
            if session.repeat_header && session.header_next <= session.lines_used {
                session.print_header(sink)?;
            }
        }
    }
    Ok(())
}
