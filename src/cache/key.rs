use smallvec::SmallVec;

use crate::config::KEY_INLINE_CAPACITY;

/// Ordered key components, one per order-id column.
pub type CompositeKey = SmallVec<[i32; KEY_INLINE_CAPACITY]>;

/// What the cache does when a full key is pushed a second time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateKeyPolicy {
    #[default]
    Reject,
    Overwrite,
}
