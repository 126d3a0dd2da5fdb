//! # Multi-Record Selection
//!
//! This module provides `MultiRecordSelect`, which maps column declarations
//! onto a `SelectQuery` and a `RecordSpec`, runs the query once, and exposes
//! the result as a tree keyed by the order-id columns.
//!
//! ## Lifecycle
//!
//! ```text
//!            add_* (declarations)
//!   Declaring ───────────────┐
//!       │ execute()          │
//!       v                    │
//!   Executed ── select_row / selection_size / data
//!       │ clear()            ^
//!       v                    │ execute()
//!   Cleared ─────────────────┘
//! ```
//!
//! Declarations are refused while executed rows are cached. After `clear()`
//! they persist and can be extended; where-clause values can be rebound
//! before the next `execute()`.
//!
//! ## Usage
//!
//! ```ignore
//! let mut op = MultiRecordSelect::new(MemoryQuery::new(&table));
//! op.add_order_id("run_id")?;
//! op.add_order_id("lumi_id")?;
//! op.add_id("run_id")?;
//! op.add_id("lumi_id")?;
//! op.add_data("value", DataType::Int4)?;
//! op.execute()?;
//!
//! for run in op.selection_keys(&[])? {
//!     for lumi in op.selection_keys(&[run])? {
//!         op.select_row(&[run, lumi])?;
//!         let value = op.data()?.get_int("value")?;
//!     }
//! }
//! ```

mod operation;
mod options;

#[cfg(test)]
mod tests;

pub use operation::{MultiRecordSelect, SelectState};
pub use options::SelectOptions;
