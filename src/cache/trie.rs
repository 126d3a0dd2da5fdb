use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use eyre::{bail, Result};
use tracing::{debug, trace};

use super::{CompositeKey, DuplicateKeyPolicy};
use crate::error::SelectError;
use crate::records::Record;

#[derive(Debug, Default)]
struct Branch {
    leaves: usize,
    children: BTreeMap<i32, Node>,
}

#[derive(Debug)]
enum Node {
    Branch(Branch),
    Leaf(Record),
}

enum Placement {
    Inserted,
    Replaced,
    Rejected,
}

/// Trie from composite integer keys to records.
///
/// The depth is either fixed up front with [`RecordCache::with_depth`] or
/// taken from the first pushed key. Every later key, prefix walk and lookup
/// is checked against it.
#[derive(Debug, Default)]
pub struct RecordCache {
    root: Branch,
    depth: Option<usize>,
    fixed_depth: bool,
    policy: DuplicateKeyPolicy,
}

impl RecordCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cache whose keys must have exactly `depth` components.
    pub fn with_depth(depth: usize) -> Self {
        Self {
            depth: Some(depth),
            fixed_depth: true,
            ..Self::default()
        }
    }

    pub fn with_policy(mut self, policy: DuplicateKeyPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> DuplicateKeyPolicy {
        self.policy
    }

    pub fn depth(&self) -> Option<usize> {
        self.depth
    }

    /// Number of live, unconsumed leaves.
    pub fn len(&self) -> usize {
        self.root.leaves
    }

    pub fn is_empty(&self) -> bool {
        self.root.leaves == 0
    }

    /// Inserts `record` as the leaf reachable by `key`.
    pub fn push(&mut self, key: &[i32], record: Record) -> Result<()> {
        let expected = self.depth.unwrap_or(key.len());
        if key.is_empty() || key.len() != expected {
            return Err(SelectError::KeyArityMismatch {
                expected: expected.max(1),
                actual: key.len(),
            }
            .into());
        }
        self.depth = Some(expected);

        match Self::insert(&mut self.root, key, record, self.policy)? {
            Placement::Inserted => trace!(?key, "cached record"),
            Placement::Replaced => debug!(?key, "duplicate key replaced cached record"),
            Placement::Rejected => {
                return Err(SelectError::DuplicateKey { key: key.to_vec() }.into());
            }
        }
        Ok(())
    }

    /// Counts the leaves whose first `min(prefix.len(), number_of_indexes)`
    /// components equal `prefix`.
    pub fn branch_size(&self, prefix: &[i32], number_of_indexes: usize) -> Result<usize> {
        if self.is_empty() {
            return Ok(0);
        }
        let depth = self.depth.unwrap_or(0);
        if number_of_indexes > depth {
            return Err(SelectError::KeyArityMismatch {
                expected: depth,
                actual: number_of_indexes,
            }
            .into());
        }

        let walk = number_of_indexes.min(prefix.len());
        let mut branch = &self.root;
        for component in &prefix[..walk] {
            match branch.children.get(component) {
                Some(Node::Branch(child)) => branch = child,
                Some(Node::Leaf(_)) => return Ok(1),
                None => return Ok(0),
            }
        }
        Ok(branch.leaves)
    }

    /// Returns the distinct next-level components below `prefix`, ascending.
    pub fn branch_keys(&self, prefix: &[i32]) -> Result<Vec<i32>> {
        let Some(depth) = self.depth else {
            return Ok(Vec::new());
        };
        if prefix.len() >= depth {
            return Err(SelectError::KeyArityMismatch {
                expected: depth,
                actual: prefix.len(),
            }
            .into());
        }
        Ok(self
            .branch_at(prefix)
            .map(|branch| branch.children.keys().copied().collect())
            .unwrap_or_default())
    }

    /// Returns the record for `key` without consuming it.
    pub fn get(&self, key: &[i32]) -> Result<Option<&Record>> {
        self.check_arity(key)?;
        let Some((last, path)) = key.split_last() else {
            return Ok(None);
        };
        Ok(self
            .branch_at(path)
            .and_then(|branch| match branch.children.get(last) {
                Some(Node::Leaf(record)) => Some(record),
                _ => None,
            }))
    }

    pub fn contains(&self, key: &[i32]) -> bool {
        matches!(self.get(key), Ok(Some(_)))
    }

    /// Removes the leaf for `key` and moves its record out.
    ///
    /// A second call with the same key returns `Ok(None)`.
    pub fn lookup_and_clear(&mut self, key: &[i32]) -> Result<Option<Record>> {
        self.check_arity(key)?;
        let record = Self::remove(&mut self.root, key);
        if record.is_some() {
            trace!(?key, remaining = self.root.leaves, "consumed cached record");
        }
        Ok(record)
    }

    /// Lists the keys of all live leaves in ascending order.
    pub fn keys(&self) -> Vec<CompositeKey> {
        let mut out = Vec::with_capacity(self.len());
        let mut path = CompositeKey::new();
        Self::collect_keys(&self.root, &mut path, &mut out);
        out
    }

    /// Drops every cached record. Idempotent.
    pub fn clear(&mut self) {
        self.root = Branch::default();
        if !self.fixed_depth {
            self.depth = None;
        }
    }

    fn check_arity(&self, key: &[i32]) -> Result<()> {
        match self.depth {
            Some(depth) if key.len() != depth => Err(SelectError::KeyArityMismatch {
                expected: depth,
                actual: key.len(),
            }
            .into()),
            _ => Ok(()),
        }
    }

    fn branch_at(&self, prefix: &[i32]) -> Option<&Branch> {
        let mut branch = &self.root;
        for component in prefix {
            match branch.children.get(component)? {
                Node::Branch(child) => branch = child,
                Node::Leaf(_) => return None,
            }
        }
        Some(branch)
    }

    fn insert(
        branch: &mut Branch,
        key: &[i32],
        record: Record,
        policy: DuplicateKeyPolicy,
    ) -> Result<Placement> {
        let Some((&head, rest)) = key.split_first() else {
            bail!("record cache key exhausted before reaching a leaf");
        };

        let placement = if rest.is_empty() {
            match branch.children.entry(head) {
                Entry::Vacant(slot) => {
                    slot.insert(Node::Leaf(record));
                    Placement::Inserted
                }
                Entry::Occupied(mut slot) => {
                    if !matches!(slot.get(), Node::Leaf(_)) {
                        bail!("record cache leaf level holds a branch at component {}", head);
                    }
                    match policy {
                        DuplicateKeyPolicy::Reject => Placement::Rejected,
                        DuplicateKeyPolicy::Overwrite => {
                            slot.insert(Node::Leaf(record));
                            Placement::Replaced
                        }
                    }
                }
            }
        } else {
            let child = branch
                .children
                .entry(head)
                .or_insert_with(|| Node::Branch(Branch::default()));
            match child {
                Node::Branch(child) => Self::insert(child, rest, record, policy)?,
                Node::Leaf(_) => {
                    bail!("record cache branch level holds a leaf at component {}", head)
                }
            }
        };

        if matches!(placement, Placement::Inserted) {
            branch.leaves += 1;
        }
        Ok(placement)
    }

    fn remove(branch: &mut Branch, key: &[i32]) -> Option<Record> {
        let (&head, rest) = key.split_first()?;

        let record = if rest.is_empty() {
            if !matches!(branch.children.get(&head), Some(Node::Leaf(_))) {
                return None;
            }
            match branch.children.remove(&head) {
                Some(Node::Leaf(record)) => record,
                _ => return None,
            }
        } else {
            let Some(Node::Branch(child)) = branch.children.get_mut(&head) else {
                return None;
            };
            let record = Self::remove(child, rest)?;
            if child.leaves == 0 {
                branch.children.remove(&head);
            }
            record
        };

        branch.leaves -= 1;
        Some(record)
    }

    fn collect_keys(branch: &Branch, path: &mut CompositeKey, out: &mut Vec<CompositeKey>) {
        for (component, node) in &branch.children {
            path.push(*component);
            match node {
                Node::Leaf(_) => out.push(path.clone()),
                Node::Branch(child) => Self::collect_keys(child, path, out),
            }
            path.pop();
        }
    }
}
