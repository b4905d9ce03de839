//! Navigation history
//!
//! Stack of queue indices visited under a randomized strategy, used to walk
//! "previous" back through a shuffle. Unbounded unless a limit is configured.

use std::collections::VecDeque;

/// Navigation history, optionally bounded
///
/// When a bound is set and reached, the oldest entry is discarded.
#[derive(Debug, Clone, Default)]
pub struct History {
    /// Most recent = back
    indices: VecDeque<usize>,

    max_size: Option<usize>,
}

impl History {
    /// Create an unbounded history
    pub fn new() -> Self {
        Self::default()
    }

    /// Create history holding at most `max_size` indices (minimum 1)
    pub fn bounded(max_size: usize) -> Self {
        let max_size = max_size.max(1);
        Self {
            indices: VecDeque::with_capacity(max_size),
            max_size: Some(max_size),
        }
    }

    /// Unbounded for `None`, bounded otherwise
    pub fn with_limit(max_size: Option<usize>) -> Self {
        max_size.map_or_else(Self::new, Self::bounded)
    }

    /// Remember an index
    pub fn push(&mut self, index: usize) {
        if let Some(max) = self.max_size {
            if self.indices.len() >= max {
                self.indices.pop_front();
            }
        }
        self.indices.push_back(index);
    }

    /// Take the most recent index
    pub fn pop(&mut self) -> Option<usize> {
        self.indices.pop_back()
    }

    /// Most recent index without removing it
    pub fn peek(&self) -> Option<usize> {
        self.indices.back().copied()
    }

    /// All indices, oldest first
    pub fn entries(&self) -> Vec<usize> {
        self.indices.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn clear(&mut self) {
        self.indices.clear();
    }

    /// `None` when unbounded
    pub fn max_size(&self) -> Option<usize> {
        self.max_size
    }
}
