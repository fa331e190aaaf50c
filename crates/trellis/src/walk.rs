//! Canonical line-visiting order.
//!
//! Pre-order over the parent/child tree, starting from lines that have
//! neither a tree parent nor a group parent, in line-list order. A group's
//! children are spliced in right after the subtree of the group's last
//! member. The last entry of the resulting order is the globally last
//! printed line, which suppresses the trailing row separator.
//!
//! Rendering borrows the table immutably, so the plan also carries each
//! group's member list rewritten into traversal order (the printed chart's
//! first/last-member connectors must agree with print order even when the
//! caller grouped lines out of sequence). The table's own member lists are
//! left untouched.

use std::collections::HashMap;

use crate::group::GroupHandle;
use crate::line::LineHandle;
use crate::table::Table;

/// Traversal order and per-group member order for one render pass.
#[derive(Debug, Default)]
pub(crate) struct WalkPlan {
    /// Lines in visiting order; the last entry is the globally last line.
    pub order: Vec<LineHandle>,
    /// Group members in the order the walk reaches them.
    pub members: HashMap<GroupHandle, Vec<LineHandle>>,
}

impl WalkPlan {
    /// Plan for tree traversal (tree columns present). A group's children
    /// are descended into only once the group's member list is complete;
    /// members reachable only through the group's own children stay out of
    /// the rebuilt list, and the chart engine treats such linkage as a
    /// caller contract violation when it reaches them.
    pub fn tree(table: &Table) -> Self {
        let mut plan = WalkPlan {
            order: Vec::with_capacity(table.line_count()),
            members: table
                .group_order
                .iter()
                .map(|&g| (g, Vec::with_capacity(table.groups[g].members.len())))
                .collect(),
        };
        let expected: HashMap<GroupHandle, usize> = table
            .group_order
            .iter()
            .map(|&g| (g, table.groups[g].members.len()))
            .collect();

        for &line in &table.line_order {
            let ln = &table.lines[line];
            if ln.parent.is_none() && ln.parent_group.is_none() {
                plan.visit(table, line, &expected);
            }
        }
        plan
    }

    /// Plan for flat list output: line-list order, member lists as built.
    pub fn list(table: &Table) -> Self {
        WalkPlan {
            order: table.line_order.clone(),
            members: table
                .group_order
                .iter()
                .map(|&g| (g, table.groups[g].members.clone()))
                .collect(),
        }
    }

    fn visit(&mut self, table: &Table, line: LineHandle, expected: &HashMap<GroupHandle, usize>) {
        self.order.push(line);

        if let Some(g) = table.lines[line].group {
            if let Some(members) = self.members.get_mut(&g) {
                members.push(line);
            }
        }

        for &child in &table.lines[line].children {
            self.visit(table, child, expected);
        }

        if let Some(g) = table.lines[line].group {
            let complete = self
                .members
                .get(&g)
                .is_some_and(|m| Some(m.len()) == expected.get(&g).copied());
            if complete && self.is_last_member(g, line) {
                for child in table.groups[g].children.clone() {
                    self.visit(table, child, expected);
                }
            }
        }
    }

    pub fn is_first_member(&self, group: GroupHandle, line: LineHandle) -> bool {
        self.members
            .get(&group)
            .is_some_and(|m| m.first() == Some(&line))
    }

    pub fn is_last_member(&self, group: GroupHandle, line: LineHandle) -> bool {
        self.members
            .get(&group)
            .is_some_and(|m| m.last() == Some(&line))
    }
}
