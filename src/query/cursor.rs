use std::collections::VecDeque;

use eyre::{eyre, Result};

use crate::records::Row;

/// Row-at-a-time cursor over a fully materialized result.
#[derive(Debug, Default)]
pub struct BufferedCursor {
    pending: VecDeque<Row>,
    current: Option<Row>,
}

impl BufferedCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the buffered result; the cursor is left before the first row.
    pub fn load(&mut self, rows: Vec<Row>) {
        self.pending = rows.into();
        self.current = None;
    }

    pub fn advance(&mut self) -> bool {
        self.current = self.pending.pop_front();
        self.current.is_some()
    }

    pub fn current(&self) -> Result<&Row> {
        self.current
            .as_ref()
            .ok_or_else(|| eyre!("cursor is not positioned on a row"))
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    pub fn reset(&mut self) {
        self.pending.clear();
        self.current = None;
    }
}
