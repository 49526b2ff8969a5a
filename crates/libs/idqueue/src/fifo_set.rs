use std::collections::{HashSet, VecDeque};

use crate::error::QueueError;
use crate::identifier::Identifier;

/// Insertion-ordered set of identifiers that evicts its oldest entries once
/// it holds more than `capacity` of them.
///
/// `members` and `order` always hold the same identifiers.
#[derive(Debug, Clone)]
pub struct FifoSet {
    capacity: usize,
    members: HashSet<Identifier>,
    order: VecDeque<Identifier>,
}

impl FifoSet {
    pub fn new(capacity: usize) -> Result<Self, QueueError> {
        if capacity == 0 {
            return Err(QueueError::invalid_capacity(capacity));
        }
        Ok(Self { capacity, members: HashSet::new(), order: VecDeque::new() })
    }

    /// Inserts `id` at the newest end. Returns `false` and leaves the order
    /// untouched when `id` is already present.
    pub fn insert(&mut self, id: Identifier) -> bool {
        if !self.members.insert(id) {
            return false;
        }
        self.order.push_back(id);
        self.evict_overflow();
        true
    }

    /// Appends `id` without enforcing the capacity. Used while restoring from
    /// disk; callers finish with [`FifoSet::evict_overflow`].
    pub fn restore(&mut self, id: Identifier) -> bool {
        if !self.members.insert(id) {
            return false;
        }
        self.order.push_back(id);
        true
    }

    pub fn contains(&self, id: &Identifier) -> bool {
        self.members.contains(id)
    }

    pub fn pop_oldest(&mut self) -> Option<Identifier> {
        let oldest = self.order.pop_front()?;
        self.members.remove(&oldest);
        Some(oldest)
    }

    /// Evicts from the oldest end until `len() <= capacity()`.
    pub fn evict_overflow(&mut self) -> usize {
        let mut evicted = 0;
        while self.order.len() > self.capacity {
            if self.pop_oldest().is_none() {
                break;
            }
            evicted += 1;
        }
        evicted
    }

    /// Shrinking evicts the oldest entries first. Returns the number evicted.
    pub fn set_capacity(&mut self, capacity: usize) -> Result<usize, QueueError> {
        if capacity == 0 {
            return Err(QueueError::invalid_capacity(capacity));
        }
        self.capacity = capacity;
        Ok(self.evict_overflow())
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.members.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Identifier> + '_ {
        self.order.iter()
    }
}
