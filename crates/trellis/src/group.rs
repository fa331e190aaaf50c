//! Groups: M:N relations between lines, rendered as a side chart.

use crate::arena::Handle;
use crate::line::LineHandle;

/// Reference to a group owned by a [`Table`](crate::Table).
pub type GroupHandle = Handle<Group>;

/// An ordered set of member lines plus lines hanging off the group as a
/// whole ("group children").
///
/// Built through [`Table::group_lines`](crate::Table::group_lines) and
/// [`Table::link_group_child`](crate::Table::link_group_child). Member order
/// is rewritten to match traversal order before a tree render.
#[derive(Clone, Debug, Default)]
pub struct Group {
    pub(crate) members: Vec<LineHandle>,
    pub(crate) children: Vec<LineHandle>,
}

impl Group {
    pub fn members(&self) -> &[LineHandle] {
        &self.members
    }

    pub fn children(&self) -> &[LineHandle] {
        &self.children
    }

    pub(crate) fn is_first_member(&self, line: LineHandle) -> bool {
        self.members.first() == Some(&line)
    }

    pub(crate) fn is_last_member(&self, line: LineHandle) -> bool {
        self.members.last() == Some(&line)
    }

    pub(crate) fn is_last_child(&self, line: LineHandle) -> bool {
        self.children.last() == Some(&line)
    }
}
