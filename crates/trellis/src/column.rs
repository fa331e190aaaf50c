//! Columns: header, width hint, flags, and per-column rendering options.

use bitflags::bitflags;
use console::Style;
use serde::{Deserialize, Serialize};

use crate::arena::Handle;
use crate::cell::Cell;

/// Reference to a column owned by a [`Table`](crate::Table).
pub type ColumnHandle = Handle<Column>;

bitflags! {
    /// Behavior flags for a column.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct ColumnFlags: u16 {
        /// Carries the tree/group connector decoration.
        const TREE = 1 << 0;
        /// Right-align cell data.
        const RIGHT = 1 << 1;
        /// Cut data that exceeds the column width.
        const TRUNC = 1 << 2;
        /// Wrap overflowing data onto extra physical lines.
        const WRAP = 1 << 3;
        /// Eligible for aggressive shrinking when cell widths deviate far
        /// from the column mean.
        const NO_EXTREMES = 1 << 4;
        /// Never enlarge the column beyond its data width.
        const STRICT_WIDTH = 1 << 5;
        /// Exclude the column from output.
        const HIDDEN = 1 << 6;
    }
}

/// Requested column width.
///
/// `Cells` is an absolute display-cell count; `Fraction` is a share of the
/// terminal width in the open interval (0, 1).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum WidthHint {
    /// Size from the widest cell (default).
    #[default]
    Content,
    /// Absolute width in display cells.
    Cells(usize),
    /// Fraction of the terminal width.
    Fraction(f64),
}

impl WidthHint {
    pub(crate) fn fraction(&self) -> Option<f64> {
        match *self {
            WidthHint::Fraction(f) if f > 0.0 && f < 1.0 => Some(f),
            _ => None,
        }
    }

    pub(crate) fn absolute(&self) -> Option<usize> {
        match *self {
            WidthHint::Cells(n) if n >= 1 => Some(n),
            _ => None,
        }
    }
}

/// How a cell value is typed in JSON output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    /// Quoted, JSON-escaped string (default).
    #[default]
    String,
    /// Unquoted numeric literal; unparsable values fall back to a quoted
    /// string, empty values to `null`.
    Number,
    /// `true`/`false` from the value's truthiness; empty values are `null`.
    Boolean,
}

/// A table column.
///
/// Built fluently and handed to [`Table::add_column`](crate::Table::add_column):
///
/// ```
/// use trellis::{Column, ColumnFlags, WidthHint};
///
/// let col = Column::new("NAME")
///     .hint(WidthHint::Fraction(0.3))
///     .flags(ColumnFlags::TREE);
/// ```
#[derive(Clone, Debug)]
pub struct Column {
    pub(crate) header: Cell,
    pub(crate) hint: WidthHint,
    pub(crate) flags: ColumnFlags,
    pub(crate) style: Option<Style>,
    pub(crate) json_type: JsonType,
    pub(crate) safe_chars: String,
    /// Dense display-order index, maintained by the owning table.
    pub(crate) seqnum: usize,
}

impl Column {
    /// Column with the given header name and default options.
    pub fn new(name: impl Into<String>) -> Self {
        Column {
            header: Cell::new(name),
            hint: WidthHint::Content,
            flags: ColumnFlags::empty(),
            style: None,
            json_type: JsonType::String,
            safe_chars: String::new(),
            seqnum: 0,
        }
    }

    pub fn hint(mut self, hint: WidthHint) -> Self {
        self.hint = hint;
        self
    }

    pub fn flags(mut self, flags: ColumnFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Default style for cells without their own style.
    pub fn style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }

    pub fn json_type(mut self, json_type: JsonType) -> Self {
        self.json_type = json_type;
        self
    }

    /// Control characters exempt from safe-encoding in this column's cells,
    /// e.g. a deliberate `\n` in multi-line data.
    pub fn safe_chars(mut self, chars: impl Into<String>) -> Self {
        self.safe_chars = chars.into();
        self
    }

    /// Style applied to the header cell.
    pub fn header_style(mut self, style: Style) -> Self {
        self.header.set_style(Some(style));
        self
    }

    pub fn name(&self) -> &str {
        self.header.data()
    }

    pub fn header(&self) -> &Cell {
        &self.header
    }

    pub fn get_flags(&self) -> ColumnFlags {
        self.flags
    }

    pub fn get_hint(&self) -> WidthHint {
        self.hint
    }

    pub fn get_json_type(&self) -> JsonType {
        self.json_type
    }

    /// Display-order index of the column.
    pub fn seqnum(&self) -> usize {
        self.seqnum
    }

    pub(crate) fn is_tree(&self) -> bool {
        self.flags.contains(ColumnFlags::TREE)
    }

    pub(crate) fn is_right(&self) -> bool {
        self.flags.contains(ColumnFlags::RIGHT)
    }

    pub(crate) fn is_trunc(&self) -> bool {
        self.flags.contains(ColumnFlags::TRUNC)
    }

    pub(crate) fn is_wrap(&self) -> bool {
        self.flags.contains(ColumnFlags::WRAP)
    }

    pub(crate) fn is_noextremes(&self) -> bool {
        self.flags.contains(ColumnFlags::NO_EXTREMES)
    }

    pub(crate) fn is_strict(&self) -> bool {
        self.flags.contains(ColumnFlags::STRICT_WIDTH)
    }

    pub(crate) fn is_hidden(&self) -> bool {
        self.flags.contains(ColumnFlags::HIDDEN)
    }

    /// Wrap without a custom chunker behaves as truncation for sizing.
    pub(crate) fn shrink_eligible(&self) -> bool {
        self.is_trunc() || self.is_wrap()
    }
}
