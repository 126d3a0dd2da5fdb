//! # Selection Options
//!
//! Runtime settings for a `MultiRecordSelect`, built fluently:
//!
//! ```ignore
//! let options = SelectOptions::new()
//!     .duplicate_key_policy(DuplicateKeyPolicy::Overwrite)
//!     .max_key_depth(4);
//! let op = MultiRecordSelect::with_options(query, options);
//! ```
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | duplicate_key_policy | `Reject` | What `execute()` does with a repeated full key |
//! | max_key_depth | `MAX_KEY_DEPTH` (16) | Upper bound on order-id columns |

use crate::cache::DuplicateKeyPolicy;
use crate::config::{DEFAULT_DUPLICATE_KEY_POLICY, MAX_KEY_DEPTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectOptions {
    duplicate_key_policy: DuplicateKeyPolicy,
    max_key_depth: usize,
}

impl Default for SelectOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectOptions {
    pub fn new() -> Self {
        Self {
            duplicate_key_policy: DEFAULT_DUPLICATE_KEY_POLICY,
            max_key_depth: MAX_KEY_DEPTH,
        }
    }

    pub fn duplicate_key_policy(mut self, policy: DuplicateKeyPolicy) -> Self {
        self.duplicate_key_policy = policy;
        self
    }

    /// Lowers the order-id limit. Values above `MAX_KEY_DEPTH` are clamped.
    pub fn max_key_depth(mut self, depth: usize) -> Self {
        self.max_key_depth = depth.min(MAX_KEY_DEPTH);
        self
    }

    pub fn key_policy(&self) -> DuplicateKeyPolicy {
        self.duplicate_key_policy
    }

    pub fn key_depth_limit(&self) -> usize {
        self.max_key_depth
    }
}
