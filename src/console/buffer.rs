// SPDX-License-Identifier: MPL-2.0
//! Fixed-capacity FIFO ring buffer for captured console entries.

use std::collections::VecDeque;

use crate::domain::console::ConsoleCapacity;

/// A ring buffer that evicts its oldest element once full.
///
/// Eviction follows insertion order only; reading never refreshes an entry.
///
/// # Example
///
/// ```
/// use shakenbake::console::RingBuffer;
/// use shakenbake::domain::console::ConsoleCapacity;
///
/// let mut buffer = RingBuffer::new(ConsoleCapacity::new(2));
/// buffer.push(1);
/// buffer.push(2);
/// buffer.push(3);
///
/// assert_eq!(buffer.iter().copied().collect::<Vec<_>>(), vec![2, 3]);
/// ```
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    data: VecDeque<T>,
    capacity: usize,
}

impl<T> RingBuffer<T> {
    #[must_use]
    pub fn new(capacity: ConsoleCapacity) -> Self {
        let capacity = capacity.value();
        Self {
            data: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends `item`, evicting the oldest element when at capacity.
    pub fn push(&mut self, item: T) {
        if self.data.len() >= self.capacity {
            self.data.pop_front();
        }
        self.data.push_back(item);
    }

    /// Iterates oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }
}

impl<T: Clone> RingBuffer<T> {
    /// Copies the contents, oldest first.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.data.iter().cloned().collect()
    }
}
