//! # Selection Configuration Constants
//!
//! This module centralizes the numeric limits and defaults used by the record
//! cache and the selection orchestrator. Constants that depend on each other
//! are co-located and their relationship is checked at compile time.
//!
//! ## Dependency Graph
//!
//! ```text
//! MAX_KEY_DEPTH (16)
//!       │
//!       └─> KEY_INLINE_CAPACITY (must be <=)
//!             Composite keys up to this many components are built on the
//!             stack while decoding cursor rows. A larger value than the
//!             maximum depth would only waste stack space.
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use crate::config::{KEY_INLINE_CAPACITY, MAX_KEY_DEPTH};
//! ```

use crate::cache::DuplicateKeyPolicy;

// ============================================================================
// COMPOSITE KEY LIMITS
// ============================================================================

/// Maximum number of order-id columns, and so the maximum cache depth.
pub const MAX_KEY_DEPTH: usize = 16;

/// Number of key components stored inline before a key spills to the heap.
pub const KEY_INLINE_CAPACITY: usize = 4;

const _: () = assert!(
    KEY_INLINE_CAPACITY <= MAX_KEY_DEPTH,
    "KEY_INLINE_CAPACITY must not exceed MAX_KEY_DEPTH"
);

const _: () = assert!(MAX_KEY_DEPTH > 0, "MAX_KEY_DEPTH must allow at least one key column");

// ============================================================================
// CACHE POPULATION
// ============================================================================

/// Policy applied when `execute()` sees the same full key twice.
pub const DEFAULT_DUPLICATE_KEY_POLICY: DuplicateKeyPolicy = DuplicateKeyPolicy::Reject;
