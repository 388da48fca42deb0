//! Bounded window of recently seen message ids

use std::collections::{HashSet, VecDeque};

/// Remembers the last `capacity` ids; the oldest id is evicted first
#[derive(Debug)]
pub struct RecentIds {
    order: VecDeque<String>,
    seen: HashSet<String>,
    capacity: usize,
}

impl RecentIds {
    pub fn new(capacity: usize) -> Self {
        Self {
            order: VecDeque::with_capacity(capacity),
            seen: HashSet::with_capacity(capacity),
            capacity,
        }
    }

    /// Record an id. Returns `false` if it is already in the window.
    pub fn insert(&mut self, id: &str) -> bool {
        if self.capacity == 0 {
            return true;
        }
        if self.seen.contains(id) {
            return false;
        }
        if self.order.len() == self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.seen.remove(&oldest);
            }
        }
        self.order.push_back(id.to_string());
        self.seen.insert(id.to_string());
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_id_is_rejected() {
        let mut ids = RecentIds::new(4);
        assert!(ids.insert("a"));
        assert!(!ids.insert("a"));
        assert!(ids.contains("a"));
        assert!(!ids.contains("b"));
        assert_eq!(ids.len(), 1);
    }

    #[test]
    fn oldest_id_is_evicted() {
        let mut ids = RecentIds::new(2);
        assert!(ids.insert("a"));
        assert!(ids.insert("b"));
        assert!(ids.insert("c"));
        assert!(ids.insert("a"));
        assert!(!ids.insert("c"));
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn zero_capacity_disables_dedup() {
        let mut ids = RecentIds::new(0);
        assert!(ids.insert("a"));
        assert!(ids.insert("a"));
        assert!(ids.is_empty());
    }
}
