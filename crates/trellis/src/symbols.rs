//! Connector glyph tables.
//!
//! Two built-in sets: Unicode box drawing (default) and a plain ASCII
//! fallback. Tree connectors are two cells wide; group member connectors are
//! three cells wide, matching the chart's track chunk size.

/// Glyphs used for tree connectors, the group chart, and padding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Symbols {
    /// Child with further siblings below: `├─` / `|-`.
    pub branch: String,
    /// Continuing ancestor line: `│ ` / `| `.
    pub vertical: String,
    /// Last child corner: `└─` / `` `- ``.
    pub right: String,
    /// Group chart vertical continuation: `│` / `|`.
    pub group_vertical: String,
    /// Group chart horizontal join: `─` / `-`.
    pub group_horizontal: String,
    /// First group member: `┌─╼` / `,->`.
    pub group_first_member: String,
    /// Interior group member: `├─╼` / `|->`.
    pub group_middle_member: String,
    /// Last group member: `└─╼` / `\->`.
    pub group_last_member: String,
    /// Interior group child branch: `├─` / `|-`.
    pub group_middle_child: String,
    /// Last group child branch: `└─` / `` `- ``.
    pub group_last_child: String,
    /// Padding used when aligning the title.
    pub title_padding: String,
    /// Padding used to fill cells.
    pub cell_padding: String,
}

impl Symbols {
    /// Unicode box-drawing set.
    pub fn unicode() -> Self {
        Symbols {
            branch: "├─".into(),
            vertical: "│ ".into(),
            right: "└─".into(),
            group_vertical: "│".into(),
            group_horizontal: "─".into(),
            group_first_member: "┌─╼".into(),
            group_middle_member: "├─╼".into(),
            group_last_member: "└─╼".into(),
            group_middle_child: "├─".into(),
            group_last_child: "└─".into(),
            title_padding: " ".into(),
            cell_padding: " ".into(),
        }
    }

    /// Seven-bit ASCII set.
    pub fn ascii() -> Self {
        Symbols {
            branch: "|-".into(),
            vertical: "| ".into(),
            right: "`-".into(),
            group_vertical: "|".into(),
            group_horizontal: "-".into(),
            group_first_member: ",->".into(),
            group_middle_member: "|->".into(),
            group_last_member: "\\->".into(),
            group_middle_child: "|-".into(),
            group_last_child: "`-".into(),
            title_padding: " ".into(),
            cell_padding: " ".into(),
        }
    }
}

impl Default for Symbols {
    fn default() -> Self {
        Symbols::unicode()
    }
}
