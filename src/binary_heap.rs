use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::heap::{AddressableHeap, Error, NodeId, Result};

/// Array-backed baseline comparator keyed by `(key, insertion ordinal)`.
///
/// `decrease_key` pushes a replacement entry and leaves the old one behind;
/// stale entries are discarded whenever they surface at the top of the array
/// heap, so the top is always live. Exists to cross-validate the tree heaps
/// and to serve as a performance reference.
pub struct LazyBinaryHeap {
    heap: BinaryHeap<Reverse<(i64, usize)>>,
    /// ordinal -> live key, `None` once the element is gone
    current: Vec<Option<i64>>,
    len: usize,
}

impl LazyBinaryHeap {
    pub fn new() -> Self {
        LazyBinaryHeap {
            heap: BinaryHeap::new(),
            current: Vec::new(),
            len: 0,
        }
    }

    /// Removes the minimum element and returns its key.
    pub fn pop(&mut self) -> Result<i64> {
        self.pop_min().map(|(_, key)| key)
    }

    /// Removes the element named by `id` and returns the key it held.
    pub fn remove(&mut self, id: NodeId) -> Result<i64> {
        if self.len == 0 {
            return Err(Error::Empty);
        }
        let key = self.live_key(id);
        self.current[id.0] = None;
        self.len -= 1;
        self.purge();
        Ok(key)
    }

    fn live_key(&self, id: NodeId) -> i64 {
        match self.current.get(id.0) {
            Some(&Some(key)) => key,
            _ => panic!("handle does not name a live element"),
        }
    }

    /// drop stale entries until the top of the array heap is live
    fn purge(&mut self) {
        while let Some(&Reverse((key, ordinal))) = self.heap.peek() {
            if self.current[ordinal] == Some(key) {
                break;
            }
            self.heap.pop();
        }
    }
}

impl Default for LazyBinaryHeap {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressableHeap for LazyBinaryHeap {
    fn size(&self) -> usize {
        self.len
    }

    fn peek(&self) -> Result<i64> {
        match self.heap.peek() {
            Some(&Reverse((key, _))) => Ok(key),
            None => Err(Error::Empty),
        }
    }

    fn add(&mut self, key: i64) -> NodeId {
        let ordinal = self.current.len();
        self.current.push(Some(key));
        self.heap.push(Reverse((key, ordinal)));
        self.len += 1;
        NodeId(ordinal)
    }

    fn pop_min(&mut self) -> Result<(NodeId, i64)> {
        if self.len == 0 {
            return Err(Error::Empty);
        }
        // purge keeps the top live, so this entry is current
        let Reverse((key, ordinal)) = self.heap.pop().unwrap();
        debug_assert_eq!(self.current[ordinal], Some(key));
        self.current[ordinal] = None;
        self.len -= 1;
        self.purge();
        Ok((NodeId(ordinal), key))
    }

    fn decrease_key(&mut self, id: NodeId, new_key: i64) -> Result<()> {
        let key = self.live_key(id);
        if new_key > key {
            return Err(Error::InvariantViolation);
        }
        self.current[id.0] = Some(new_key);
        self.heap.push(Reverse((new_key, id.0)));
        self.purge();
        Ok(())
    }
}
