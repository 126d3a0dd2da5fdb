//! # Composite-Key Record Cache
//!
//! This module implements the in-memory index that lets a caller walk a query
//! result as a tree keyed by its id columns instead of as a flat row stream.
//!
//! ## Structure
//!
//! The cache is a trie whose depth equals the number of key components. Each
//! level partitions entries by one component; leaves hold a `Record`:
//!
//! ```text
//! key = (run, lumi)
//!
//! root (leaves: 3)
//! ├── 1 (leaves: 2)
//! │   ├── 1 -> Record(1, 1, 10)
//! │   └── 2 -> Record(1, 2, 20)
//! └── 2 (leaves: 1)
//!     └── 1 -> Record(2, 1, 30)
//! ```
//!
//! Every branch caches the number of leaves beneath it, so `branch_size` costs
//! one map lookup per walked level and never visits leaves.
//!
//! ## Consumption
//!
//! `lookup_and_clear` removes the leaf it finds and moves the record out.
//! Branches emptied by the removal are pruned on the way back up, which keeps
//! memory proportional to the rows not yet consumed.
//!
//! ## Duplicate Keys
//!
//! A second push of the same full key follows `DuplicateKeyPolicy`:
//!
//! | Policy | Effect |
//! |--------|--------|
//! | `Reject` | push fails with `DuplicateKey`; the cached leaf is kept |
//! | `Overwrite` | the cached leaf is replaced; `len()` is unchanged |

mod key;
mod trie;


pub use key::{CompositeKey, DuplicateKeyPolicy};
pub use trie::RecordCache;
