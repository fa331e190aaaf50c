//! Group chart engine.
//!
//! For every rendered line the chart emits a short glyph sequence describing
//! the line's role in each active group: member connectors on the way down,
//! vertical continuation through unrelated lines, and branch glyphs for the
//! group's children. Tracks live in a flat slot array (`grpset`) organized
//! in chunks of three cells, one chunk per active group; the array grows at
//! the front so older groups keep their lane, and never shrinks within a
//! pass, so the tree column reserves `len + 1` cells for the chart.
//!
//! State transitions are driven purely by the linkage the caller built. An
//! impossible sequence (a member after the group's last child, a restarted
//! member run) is a caller contract violation and panics rather than
//! returning an error.

use std::collections::HashMap;

use log::trace;

use crate::buffer::ScratchBuffer;
use crate::group::GroupHandle;
use crate::line::LineHandle;
use crate::symbols::Symbols;
use crate::table::Table;
use crate::walk::WalkPlan;

/// Slots per track chunk; member connectors are three cells wide.
pub(crate) const TRACK_CHUNK: usize = 3;

/// Chart role of one group at the current line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum GroupState {
    #[default]
    None,
    FirstMember,
    MiddleMember,
    LastMember,
    MiddleChild,
    LastChild,
    ContMembers,
    ContChildren,
}

/// The per-pass track set. Owned by the render session, never by the table.
#[derive(Debug, Default)]
pub(crate) struct GroupChart {
    slots: Vec<Option<GroupHandle>>,
    states: HashMap<GroupHandle, GroupState>,
}

impl GroupChart {
    pub fn new() -> Self {
        GroupChart::default()
    }

    pub fn state(&self, group: GroupHandle) -> GroupState {
        self.states.get(&group).copied().unwrap_or_default()
    }

    /// Cells the chart occupies in front of the tree column.
    pub fn reserve_width(&self) -> usize {
        self.slots.len() + 1
    }

    /// Clear all tracks and states, keeping the grown slot array so a
    /// sizing replay fixes the width for the printing pass.
    pub fn reset(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
        self.states.clear();
    }

    /// Advance every active track for `line`, then open a track if the
    /// line's own group is not charted yet. Member order comes from the
    /// walk plan, which has it rewritten into traversal order.
    pub fn update_for_line(&mut self, table: &Table, plan: &WalkPlan, line: LineHandle) {
        let mut last = None;
        for i in 0..self.slots.len() {
            let Some(group) = self.slots[i] else { continue };
            if last == Some(group) {
                continue;
            }
            last = Some(group);
            self.update_group(table, plan, line, group);
        }

        if let Some(group) = table.lines[line].group {
            if self.state(group) == GroupState::None {
                self.update_group(table, plan, line, group);
            }
        }
    }

    fn update_group(
        &mut self,
        table: &Table,
        plan: &WalkPlan,
        line: LineHandle,
        group: GroupHandle,
    ) {
        let old = self.state(group);
        let new = self.state_for_line(table, plan, line, group);
        trace!("group chart: {old:?} -> {new:?}");

        // Caller contract: members form one contiguous run, children follow
        // the last member, and nothing follows the last child.
        if new == GroupState::FirstMember && old != GroupState::None {
            panic!("group chart: member sequence restarted while in {old:?}; group linkage is inconsistent");
        }
        if new != GroupState::None && old == GroupState::LastChild {
            panic!("group chart: line belongs to a group whose last child was already drawn");
        }
        if old == GroupState::LastMember
            && !matches!(
                new,
                GroupState::LastChild
                    | GroupState::ContChildren
                    | GroupState::MiddleChild
                    | GroupState::None
            )
        {
            panic!("group chart: member drawn after the group's last member");
        }

        if old == GroupState::None && new == GroupState::None {
            return;
        }

        let start = if old == GroupState::None {
            self.allocate_track()
        } else {
            self.locate_track(group)
        };
        let value = if new == GroupState::None { None } else { Some(group) };
        for slot in &mut self.slots[start..start + TRACK_CHUNK] {
            *slot = value;
        }
        self.states.insert(group, new);
    }

    fn state_for_line(
        &self,
        table: &Table,
        plan: &WalkPlan,
        line: LineHandle,
        group: GroupHandle,
    ) -> GroupState {
        let old = self.state(group);
        let ln = &table.lines[line];
        let is_member = ln.group == Some(group);
        let is_child = ln.parent_group == Some(group);

        // NONE only ever advances to FIRST_MEMBER
        if old == GroupState::None && (!is_member || !plan.is_first_member(group, line)) {
            return GroupState::None;
        }

        if !is_member && !is_child {
            return match old {
                GroupState::FirstMember | GroupState::MiddleMember | GroupState::ContMembers => {
                    GroupState::ContMembers
                }
                GroupState::LastMember | GroupState::MiddleChild | GroupState::ContChildren => {
                    GroupState::ContChildren
                }
                _ => GroupState::None,
            };
        }

        if is_member && plan.is_first_member(group, line) {
            GroupState::FirstMember
        } else if is_member && plan.is_last_member(group, line) {
            GroupState::LastMember
        } else if is_member {
            GroupState::MiddleMember
        } else if table.groups[group].is_last_child(line) {
            GroupState::LastChild
        } else {
            GroupState::MiddleChild
        }
    }

    /// Find (or create) a free run of one chunk. The rightmost existing run
    /// wins; otherwise the array grows at the front so established tracks
    /// keep their positions.
    fn allocate_track(&mut self) -> usize {
        if self.slots.is_empty() {
            self.slots.resize(TRACK_CHUNK, None);
            trace!("group chart: grpset grown to {} slots", self.slots.len());
            return 0;
        }

        let mut avail = 0;
        let mut i = self.slots.len();
        while i > 0 {
            i -= 1;
            if self.slots[i].is_none() {
                avail += 1;
                if avail == TRACK_CHUNK {
                    return i;
                }
            } else {
                avail = 0;
            }
        }

        for _ in 0..TRACK_CHUNK {
            self.slots.insert(0, None);
        }
        trace!("group chart: grpset grown to {} slots", self.slots.len());
        0
    }

    fn locate_track(&self, group: GroupHandle) -> usize {
        match self.slots.iter().position(|&s| s == Some(group)) {
            Some(i) => i,
            None => panic!("group chart: active group lost its track"),
        }
    }

    /// Number of free slots from `from` to the end, if all of them are free.
    fn trailing_free(&self, from: usize) -> Option<usize> {
        if self.slots[from..].iter().all(|s| s.is_none()) {
            Some(self.slots.len() - from)
        } else {
            None
        }
    }

    /// Emit the chart glyphs for the current line into `buf`.
    ///
    /// With `empty` set (extra physical lines of wrapped cells) only
    /// vertical continuation is drawn so the chart visibly persists without
    /// repeating connectors. Always occupies `reserve_width()` cells.
    pub fn render(&self, buf: &mut ScratchBuffer, symbols: &Symbols, empty: bool) {
        let pad = symbols.cell_padding.as_str();
        let horizontal = symbols.group_horizontal.as_str();
        let mut filler = pad;
        let mut filled = false;

        let mut i = 0;
        while i < self.slots.len() {
            let Some(group) = self.slots[i] else {
                buf.push_repeated(pad, TRACK_CHUNK);
                i += TRACK_CHUNK;
                continue;
            };
            let state = self.state(group);

            if empty {
                match state {
                    GroupState::FirstMember
                    | GroupState::MiddleMember
                    | GroupState::ContMembers => {
                        buf.push_str(&symbols.group_vertical);
                        buf.push_repeated(pad, 2);
                    }
                    GroupState::LastMember
                    | GroupState::MiddleChild
                    | GroupState::ContChildren => {
                        buf.push_str(pad);
                        buf.push_str(&symbols.group_vertical);
                        buf.push_str(pad);
                    }
                    GroupState::LastChild | GroupState::None => {
                        buf.push_repeated(pad, TRACK_CHUNK);
                    }
                }
                i += TRACK_CHUNK;
                continue;
            }

            match state {
                GroupState::FirstMember => buf.push_str(&symbols.group_first_member),
                GroupState::MiddleMember => buf.push_str(&symbols.group_middle_member),
                GroupState::LastMember => buf.push_str(&symbols.group_last_member),
                GroupState::ContMembers => {
                    buf.push_str(&symbols.group_vertical);
                    buf.push_repeated(filler, 2);
                }
                GroupState::MiddleChild | GroupState::LastChild => {
                    if state == GroupState::MiddleChild {
                        buf.push_str(filler);
                        buf.push_str(&symbols.group_middle_child);
                    } else {
                        buf.push_str(pad);
                        buf.push_str(&symbols.group_last_child);
                    }
                    if let Some(rest) = self.trailing_free(i + TRACK_CHUNK) {
                        buf.push_repeated(horizontal, rest + 1);
                        filled = true;
                    }
                    filler = horizontal;
                }
                GroupState::ContChildren => {
                    buf.push_str(filler);
                    buf.push_str(&symbols.group_vertical);
                    buf.push_str(filler);
                }
                GroupState::None => buf.push_repeated(pad, TRACK_CHUNK),
            }

            if filled {
                return;
            }
            i += TRACK_CHUNK;
        }

        buf.push_str(filler);
    }
}
