//! Lines (rows) and their tree/group links.

use console::Style;

use crate::arena::Handle;
use crate::cell::Cell;
use crate::group::GroupHandle;

/// Reference to a line owned by a [`Table`](crate::Table).
pub type LineHandle = Handle<Line>;

/// One row of the table.
///
/// A line may hang off one tree parent or one group (as a group child), never
/// both; independently it may be a member of at most one group. The cell
/// array is sized lazily, so lines created before late columns stay valid.
#[derive(Clone, Debug, Default)]
pub struct Line {
    pub(crate) cells: Vec<Cell>,
    pub(crate) parent: Option<LineHandle>,
    pub(crate) children: Vec<LineHandle>,
    pub(crate) group: Option<GroupHandle>,
    pub(crate) parent_group: Option<GroupHandle>,
    pub(crate) style: Option<Style>,
}

impl Line {
    pub(crate) fn new() -> Self {
        Line::default()
    }

    /// Cell at column index `seqnum`, if one was ever set.
    pub(crate) fn cell(&self, seqnum: usize) -> Option<&Cell> {
        self.cells.get(seqnum)
    }

    pub(crate) fn cell_mut(&mut self, seqnum: usize) -> &mut Cell {
        if self.cells.len() <= seqnum {
            self.cells.resize_with(seqnum + 1, Cell::default);
        }
        &mut self.cells[seqnum]
    }

    pub(crate) fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}
