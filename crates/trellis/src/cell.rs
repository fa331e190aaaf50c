//! Cells: the text payload of one line/column intersection.

use console::Style;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Horizontal alignment, used by the table title.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    /// Align to the left edge (default).
    #[default]
    Left,
    /// Center between the edges.
    Center,
    /// Align to the right edge.
    Right,
}

/// One cell: display text, optional color/style, optional opaque payload.
///
/// Cells also serve as column headers and as the table title; the alignment
/// field is only consulted for the title.
#[derive(Clone, Debug, Default)]
pub struct Cell {
    data: String,
    style: Option<Style>,
    userdata: Option<Value>,
    align: Align,
}

impl Cell {
    /// Cell with plain text.
    pub fn new(data: impl Into<String>) -> Self {
        Cell {
            data: data.into(),
            ..Cell::default()
        }
    }

    /// Cell with text and a style applied when colors are enabled.
    pub fn styled(data: impl Into<String>, style: Style) -> Self {
        Cell {
            data: data.into(),
            style: Some(style),
            ..Cell::default()
        }
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn set_data(&mut self, data: impl Into<String>) {
        self.data = data.into();
    }

    pub fn style(&self) -> Option<&Style> {
        self.style.as_ref()
    }

    pub fn set_style(&mut self, style: Option<Style>) {
        self.style = style;
    }

    /// Opaque payload carried for the caller; never rendered.
    pub fn userdata(&self) -> Option<&Value> {
        self.userdata.as_ref()
    }

    pub fn set_userdata(&mut self, value: Option<Value>) {
        self.userdata = value;
    }

    pub fn align(&self) -> Align {
        self.align
    }

    pub fn set_align(&mut self, align: Align) {
        self.align = align;
    }

    /// Fluent alignment, for building a title cell in place.
    pub fn with_align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl From<&str> for Cell {
    fn from(data: &str) -> Self {
        Cell::new(data)
    }
}

impl From<String> for Cell {
    fn from(data: String) -> Self {
        Cell::new(data)
    }
}
