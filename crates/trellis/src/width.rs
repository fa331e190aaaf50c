//! Column width calculation.
//!
//! One side-effecting pass per render: gather per-column width statistics by
//! composing every cell (decoration included) through the scratch buffer,
//! derive minimum and natural widths from headers and hints, then balance
//! the total against the terminal width. Shrinking walks a ladder of stages
//! from statistics-guided (pull outliers back toward one standard deviation
//! above the mean) to blunt (one cell per pass off anything truncatable),
//! always processing the worst-deviating column first and advancing a stage
//! only when a full pass makes no progress. Growing hands space back to
//! extreme columns, then to everyone (max-out) or the last column.
//!
//! All arithmetic is in display cells, never bytes.

use log::debug;

use crate::render::Session;
use crate::text;

/// Per-column state for one render pass: width statistics, the computed
/// render width, and the pagination buffer for wrapped cells.
#[derive(Clone, Debug, Default)]
pub(crate) struct ColState {
    pub width: usize,
    pub width_min: usize,
    pub width_max: usize,
    /// Width of the widest tree/group decoration seen in this column.
    pub width_treeart: usize,
    pub mean: f64,
    pub stddev: f64,
    pub extreme: bool,
    /// Hidden for this pass: the HIDDEN flag, a collapse to zero width, or
    /// the no-wrap end-of-row reduction.
    pub hidden: bool,
    /// TRUNC forced by the no-wrap reduction.
    pub forced_trunc: bool,
    /// Unprinted remainder of a wrapped cell, replayed on extra lines.
    pub pending: Option<String>,
}

impl ColState {
    fn deviation(&self) -> f64 {
        self.width as f64 - (self.mean + self.stddev)
    }
}

/// Assign a render width to every visible column.
pub(crate) fn compute(session: &mut Session<'_>) {
    let ncols = session.table.column_order.len();
    session.cols = vec![ColState::default(); ncols];
    for ci in 0..ncols {
        session.cols[ci].hidden = session.table.columns[session.table.column_order[ci]].is_hidden();
    }

    for ci in 0..ncols {
        if !session.cols[ci].hidden {
            count_column(session, ci);
        }
    }

    let termwidth = session.term_width;
    debug!(
        "basic widths: total={} termwidth={} term={}",
        total(session),
        termwidth,
        session.is_term
    );

    if !session.is_term {
        return;
    }

    reduce_minimums(session);

    // staged shrink ladder
    let mut stage = 0;
    while total(session) > termwidth && stage <= 6 {
        let before = total(session);
        shrink_stage(session, stage);
        let after = total(session);
        if after == before {
            stage += 1;
        } else {
            debug!("shrink stage {stage}: {before} -> {after}");
        }
    }

    grow(session);

    if session.table.sizing == crate::table::Sizing::NoWrap && total(session) > termwidth {
        reduce_tail(session);
    }

    debug!("final width: {} (wanted {})", total(session), termwidth);
}

/// Sum of visible column widths plus inter-column separators.
pub(crate) fn total(session: &Session<'_>) -> usize {
    let sepsz = text::display_width(session.table.col_sep());
    let mut width = 0;
    let mut visible = 0;
    for st in &session.cols {
        if st.hidden {
            continue;
        }
        width += st.width;
        visible += 1;
    }
    if visible > 0 {
        width += sepsz * (visible - 1);
    }
    width
}

/// Gather statistics and set the natural width for column `ci`.
fn count_column(session: &mut Session<'_>, ci: usize) {
    let table = session.table;
    let col = &table.columns[table.column_order[ci]];
    let maxout = table.sizing == crate::table::Sizing::MaxOut;
    let is_last = session.is_last_visible(ci);
    let chart_extra = if session.chart_col == Some(ci) {
        session.chart.reserve_width()
    } else {
        0
    };

    let mut st = ColState::default();

    // minimum width: fractional-hint floor (max-out terminal mode only),
    // raised to the header width
    let mut no_header = false;
    if let Some(f) = col.hint.fraction() {
        if maxout && session.is_term {
            st.width_min = (f * session.term_width as f64) as usize;
            if st.width_min > 0 && !is_last {
                st.width_min -= 1;
            }
        }
    }
    if col.header.is_empty() {
        no_header = true;
    } else {
        let header_width = text::display_width(&text::safe_encode(col.header.data(), ""));
        st.width_min = st.width_min.max(header_width);
    }
    if st.width_min == 0 {
        st.width_min = 1;
    }

    // data pass: true rendered widths, decoration included
    let mut sum = 0.0;
    let mut sumsq = 0.0;
    let mut count = 0usize;
    for i in 0..session.walk.order.len() {
        let line = session.walk.order[i];
        session.compose_cell(line, ci, false);
        let mut len = text::display_width(&text::safe_encode(
            session.buf.data(),
            &session.table.columns[session.table.column_order[ci]].safe_chars,
        ));
        len += chart_extra;
        st.width_max = st.width_max.max(len);
        st.width = st.width.max(len);
        if session.table.columns[session.table.column_order[ci]].is_tree() {
            st.width_treeart = st.width_treeart.max(session.buf.art_width() + chart_extra);
        }
        sum += len as f64;
        sumsq += (len * len) as f64;
        count += 1;
    }

    if count > 0 {
        st.mean = sum / count as f64;
        st.stddev = (sumsq / count as f64 - st.mean * st.mean).max(0.0).sqrt();
    }

    let col = &table.columns[table.column_order[ci]];
    if col.is_noextremes() && count > 0 && (st.width_max as f64) > st.mean + st.stddev {
        st.extreme = true;
    }

    // enlarge to the minimum, or honor an absolute hint
    if st.width < st.width_min && !col.is_strict() {
        st.width = st.width_min;
    } else if let Some(cells) = col.hint.absolute() {
        if st.width < cells && st.width_min < cells {
            st.width = cells;
        }
    }

    // neither header nor data: collapse and hide
    if st.width_max == 0 && no_header && st.width_min == 1 && st.width <= 1 {
        st.width = 0;
        st.width_min = 0;
        st.hidden = true;
    }

    debug!(
        "column {:?}: width={} min={} max={} treeart={} mean={:.1} sd={:.1}{}",
        col.name(),
        st.width,
        st.width_min,
        st.width_max,
        st.width_treeart,
        st.mean,
        st.stddev,
        if st.extreme { " extreme" } else { "" },
    );
    session.cols[ci] = st;
}

/// Minimums wider than the terminal stall the shrink ladder; in max-out
/// mode give each column's floor one cell back so the budget can close.
fn reduce_minimums(session: &mut Session<'_>) {
    if session.table.sizing != crate::table::Sizing::MaxOut {
        return;
    }
    let sepsz = text::display_width(session.table.col_sep());
    let visible: Vec<usize> = session.visible_columns();
    let mut min_total: usize = visible.iter().map(|&ci| session.cols[ci].width_min).sum();
    if !visible.is_empty() {
        min_total += sepsz * (visible.len() - 1);
    }
    for &ci in &visible {
        if min_total <= session.term_width {
            break;
        }
        if session.cols[ci].width_min > 0 {
            session.cols[ci].width_min -= 1;
            min_total -= 1;
        }
    }
}

/// The floor a column can be shrunk to in this pass.
fn min_allowed(session: &Session<'_>, ci: usize) -> usize {
    let col = &session.table.columns[session.table.column_order[ci]];
    let st = &session.cols[ci];
    if col.is_tree() {
        st.width_min.max(st.width_treeart)
    } else {
        st.width_min
    }
}

/// One pass of one shrink stage over the eligible columns, worst deviation
/// first.
fn shrink_stage(session: &mut Session<'_>, stage: u8) {
    let termwidth = session.term_width;

    let mut candidates: Vec<usize> = session
        .visible_columns()
        .into_iter()
        .filter(|&ci| session.cols[ci].width > min_allowed(session, ci))
        .collect();
    candidates.sort_by(|&a, &b| {
        session.cols[b]
            .deviation()
            .partial_cmp(&session.cols[a].deviation())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    for (rank, &ci) in candidates.iter().enumerate() {
        if total(session) <= termwidth {
            break;
        }
        let col = &session.table.columns[session.table.column_order[ci]];
        let st = &session.cols[ci];
        let eligible = col.shrink_eligible();
        let extreme = st.extreme;
        let fraction_floor = col
            .hint
            .fraction()
            .map(|f| (f * termwidth as f64) as usize);
        let floor = min_allowed(session, ci);

        let new_width = match stage {
            // the single worst outlier back toward mean + 1 sigma
            0 => {
                if rank > 0 || !(eligible || extreme) {
                    continue;
                }
                sigma_target(st, floor)
            }
            1 => {
                if !(extreme && eligible) {
                    continue;
                }
                sigma_target(st, floor)
            }
            2 => {
                if !extreme {
                    continue;
                }
                sigma_target(st, floor)
            }
            3 | 4 => {
                let Some(hint_floor) = fraction_floor else {
                    continue;
                };
                if stage == 3 && !eligible {
                    continue;
                }
                if st.width <= hint_floor {
                    continue;
                }
                st.width - 1
            }
            5 | 6 => {
                if stage == 5 && !eligible {
                    continue;
                }
                if stage == 6 && !(eligible || extreme) {
                    continue;
                }
                let step = if rank == 0 { 3 } else { 1 };
                st.width.saturating_sub(step)
            }
            _ => continue,
        };

        let new_width = new_width.max(floor);
        if new_width < session.cols[ci].width {
            session.cols[ci].width = new_width;
            if new_width == 0 {
                session.cols[ci].hidden = true;
            }
        }
    }
}

fn sigma_target(st: &ColState, floor: usize) -> usize {
    ((st.mean + st.stddev).ceil() as usize).max(floor)
}

/// Hand unused budget back: extreme columns toward their natural maximum,
/// then everyone round-robin (max-out) or the last column.
fn grow(session: &mut Session<'_>) {
    let termwidth = session.term_width;
    let mut width = total(session);
    if width >= termwidth {
        return;
    }

    let visible = session.visible_columns();

    if session.cols.iter().any(|st| !st.hidden && st.extreme) {
        debug!("growing extreme columns back");
        for &ci in &visible {
            if !session.cols[ci].extreme {
                continue;
            }
            let st = &mut session.cols[ci];
            let mut add = termwidth - width;
            if add > 0 && st.width + add > st.width_max {
                add = st.width_max.saturating_sub(st.width);
            }
            st.width += add;
            width += add;
            if width == termwidth {
                return;
            }
        }
    }

    if session.table.sizing == crate::table::Sizing::MaxOut {
        debug!("max-out: growing all columns");
        while width < termwidth {
            for &ci in &visible {
                session.cols[ci].width += 1;
                width += 1;
                if width == termwidth {
                    return;
                }
            }
        }
    } else if let Some(&last) = visible.last() {
        let col = &session.table.columns[session.table.column_order[last]];
        if !col.is_right() {
            debug!("growing last column by {}", termwidth - width);
            session.cols[last].width += termwidth - width;
        }
    }
}

/// No-wrap mode: the row must fit no matter what. Walk the columns from the
/// end (rightmost first, the documented tie-break), truncating the first one
/// that can absorb the overflow and hiding the rest.
fn reduce_tail(session: &mut Session<'_>) {
    let termwidth = session.term_width;
    for ci in session.visible_columns().into_iter().rev() {
        let width = total(session);
        if width <= termwidth {
            break;
        }
        if width - session.cols[ci].width < termwidth {
            let excess = width - termwidth;
            session.cols[ci].width -= excess;
            session.cols[ci].forced_trunc = true;
            debug!("no-wrap: truncating column {ci} by {excess}");
        } else {
            session.cols[ci].hidden = true;
            debug!("no-wrap: hiding column {ci}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{Column, ColumnFlags, WidthHint};
    use crate::table::{Sizing, Table};

    fn sized(table: &Table) -> Session<'_> {
        let mut session = Session::new(table);
        compute(&mut session);
        session
    }

    fn list_table(rows: &[&[&str]], cols: &[Column]) -> Table {
        let mut table = Table::new();
        table.set_force_term(true).set_term_width(80);
        let handles: Vec<_> = cols.iter().map(|c| table.add_column(c.clone())).collect();
        for row in rows {
            let line = table.new_line(None).unwrap();
            for (i, cell) in row.iter().enumerate() {
                table.set_data(line, handles[i], *cell).unwrap();
            }
        }
        table
    }

    #[test]
    fn natural_widths_fit_header_and_data() {
        let mut table = list_table(
            &[&["alpha", "1"], &["be", "22"]],
            &[Column::new("NAME"), Column::new("N")],
        );
        table.set_force_term(false);
        let session = sized(&table);
        assert_eq!(session.cols[0].width_min, 4); // header NAME
        assert_eq!(session.cols[0].width_max, 5); // alpha
        assert_eq!(session.cols[1].width, 2);
    }

    #[test]
    fn column_without_header_or_data_hides() {
        let mut table = list_table(&[&["x"]], &[Column::new("A")]);
        let empty = table.add_column(Column::new(""));
        let session = sized(&table);
        let idx = table.column(empty).unwrap().seqnum();
        assert!(session.cols[idx].hidden);
        assert_eq!(session.cols[idx].width, 0);
    }

    #[test]
    fn absolute_hint_widens_small_columns() {
        let mut table = list_table(
            &[&["ab"]],
            &[Column::new("A").hint(WidthHint::Cells(10))],
        );
        table.set_force_term(false);
        let session = sized(&table);
        assert_eq!(session.cols[0].width, 10);
    }

    #[test]
    fn strict_width_ignores_header_minimum() {
        let mut table = list_table(
            &[&["ab"]],
            &[Column::new("LONGHEADER").flags(ColumnFlags::STRICT_WIDTH)],
        );
        table.set_force_term(false);
        let session = sized(&table);
        assert_eq!(session.cols[0].width, 2);
    }

    #[test]
    fn over_budget_shrinks_to_terminal() {
        let mut table = list_table(
            &[&["aaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbb"]],
            &[
                Column::new("A").flags(ColumnFlags::TRUNC),
                Column::new("B").flags(ColumnFlags::TRUNC),
            ],
        );
        table.set_term_width(30);
        let session = sized(&table);
        assert!(total(&session) <= 30);
        assert!(session.cols[0].width >= session.cols[0].width_min);
        assert!(session.cols[1].width >= session.cols[1].width_min);
    }

    #[test]
    fn maxout_fills_the_terminal_exactly() {
        let mut table = list_table(
            &[&["a", "b"], &["cc", "dd"]],
            &[Column::new("A"), Column::new("B")],
        );
        table.set_sizing(Sizing::MaxOut).set_term_width(40);
        let session = sized(&table);
        assert_eq!(total(&session), 40);
    }

    #[test]
    fn default_mode_grows_only_the_last_column() {
        let mut table = list_table(
            &[&["a", "b"]],
            &[Column::new("A"), Column::new("B")],
        );
        table.set_term_width(20);
        let session = sized(&table);
        assert_eq!(session.cols[0].width, 1);
        // last column absorbed the remainder: 1 + sep + 18 == 20
        assert_eq!(session.cols[1].width, 18);
    }

    #[test]
    fn right_aligned_last_column_does_not_grow() {
        let mut table = list_table(
            &[&["a", "b"]],
            &[Column::new("A"), Column::new("B").flags(ColumnFlags::RIGHT)],
        );
        table.set_term_width(20);
        let session = sized(&table);
        assert_eq!(session.cols[1].width, 1);
    }

    #[test]
    fn nowrap_hides_trailing_columns_rightmost_first() {
        let mut table = list_table(
            &[&["aaaaaaaaaaaaaaaaaaaa", "bbbbbbbbbbbbbbbbbbbb", "cccccccccccccccccccc"]],
            &[Column::new("A"), Column::new("B"), Column::new("C")],
        );
        table.set_sizing(Sizing::NoWrap).set_term_width(25);
        let session = sized(&table);
        assert!(total(&session) <= 25);
        assert!(session.cols[2].hidden);
        assert!(!session.cols[0].hidden);
    }

    #[test]
    fn extreme_column_pulled_toward_the_mean() {
        let rows: Vec<Vec<&str>> = vec![
            vec!["aaaa", "b"],
            vec!["aaaa", "b"],
            vec!["aaaa", "b"],
            vec!["aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "b"],
        ];
        let rows_ref: Vec<&[&str]> = rows.iter().map(|r| r.as_slice()).collect();
        let mut table = list_table(
            &rows_ref,
            &[
                Column::new("A").flags(ColumnFlags::NO_EXTREMES | ColumnFlags::TRUNC),
                Column::new("B"),
            ],
        );
        table.set_term_width(30);
        let session = sized(&table);
        assert!(session.cols[0].extreme);
        assert!(session.cols[0].width < 40);
        assert!(total(&session) <= 30);
    }
}
