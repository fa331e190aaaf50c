//! # Trellis - Column, Tree, and Group-Aware Table Rendering
//!
//! `trellis` renders tabular data as aligned terminal text: plain column
//! lists, parent/child trees with box-drawing connectors, many-to-many
//! "groups" visualized as a side chart, and structured forms (`NAME="value"`
//! export, raw space-separated, nested JSON). It is the layout engine for
//! higher-level inventory and listing tools; deciding *what* to list is the
//! caller's job.
//!
//! ## Core Concepts
//!
//! - [`Table`]: owns columns, lines, and groups; holds output configuration
//! - [`Column`]: header, width hint, and behavior flags, built fluently
//! - [`Cell`]: one value, optionally styled with a [`console::Style`]
//! - Handles ([`ColumnHandle`], [`LineHandle`], [`GroupHandle`]): copyable
//!   references into the table; they stop resolving once the entity is
//!   removed instead of dangling
//! - [`Format`]/[`Sizing`]: output format and terminal-fit strategy
//! - [`Symbols`]: the connector glyph table (Unicode default, ASCII fallback)
//!
//! ## Quick Start
//!
//! ```rust
//! use trellis::{Column, ColumnFlags, Table, WidthHint};
//!
//! let mut table = Table::new();
//! table.set_force_term(true).set_term_width(20).set_ascii(true);
//!
//! let name = table.add_column(
//!     Column::new("NAME")
//!         .hint(WidthHint::Fraction(0.5))
//!         .flags(ColumnFlags::TREE),
//! );
//! let size = table.add_column(Column::new("SIZE").hint(WidthHint::Fraction(0.5)));
//!
//! let root = table.new_line(None)?;
//! table.set_data(root, name, "root")?;
//! table.set_data(root, size, "10G")?;
//! let var = table.new_line(Some(root))?;
//! table.set_data(var, name, "root/var")?;
//! table.set_data(var, size, "2G")?;
//!
//! let out = table.print_to_string()?;
//! assert_eq!(out, "NAME       SIZE\nroot       10G\n`-root/var 2G");
//! # Ok::<(), trellis::Error>(())
//! ```
//!
//! ## Sizing
//!
//! Column widths are computed once per print call: every cell is measured
//! (decoration included), minimums come from headers and fractional hints,
//! and the total is balanced against the terminal width by a staged
//! shrink/grow pass guided by per-column width statistics. Columns flagged
//! [`ColumnFlags::TRUNC`] cut overflow; [`ColumnFlags::WRAP`] paginates it
//! across extra physical lines.
//!
//! ## Groups
//!
//! [`Table::group_lines`] relates lines across the tree; the group chart in
//! front of the tree column draws membership with connector glyphs. Lines
//! attached via [`Table::link_group_child`] hang off the group as a whole
//! and are printed after its last member. Inconsistent group linkage (for
//! example a member reachable only after the group's children) panics; it
//! is a bug in the calling program, not an input error.
//!
//! ## Threading
//!
//! Everything is synchronous and single-threaded. Rendering borrows the
//! table immutably and keeps all transient state in a per-call session, so
//! a `Table` can be printed repeatedly; sharing one table across threads
//! needs external serialization, as there is no internal locking.

mod arena;
mod buffer;
mod cell;
mod chart;
mod column;
mod error;
mod group;
mod line;
mod render;
mod symbols;
mod table;
mod text;
mod walk;
mod width;

pub use arena::Handle;
pub use cell::{Align, Cell};
pub use column::{Column, ColumnFlags, ColumnHandle, JsonType, WidthHint};
pub use error::{Error, Result};
pub use group::{Group, GroupHandle};
pub use line::{Line, LineHandle};
pub use symbols::Symbols;
pub use table::{Format, Sizing, Table};
