use slab::Slab;

use crate::heap::{AddressableHeap, Error, NodeId, Result, NEG_INF};

/// A node of the pairing tree. `child` is the first child, `sibling` the next
/// node in the parent's child list. `parent` is the back link that makes the
/// O(1) cut possible: it names the true parent for a first child and the
/// previous sibling for every other node.
struct Node {
    key: i64,
    child: Option<usize>,
    sibling: Option<usize>,
    parent: Option<usize>,
}

impl Node {
    fn new(key: i64) -> Self {
        Node {
            key,
            child: None,
            sibling: None,
            parent: None,
        }
    }
}

/// A minheap implemented as a pairing heap over an arena of nodes.
///
/// Handles returned by `add` stay valid until the element is extracted.
/// User keys must be strictly greater than `i64::MIN`; that value is
/// reserved for `remove`.
pub struct PairingHeap {
    nodes: Slab<Node>,
    root: Option<usize>,
}

impl PairingHeap {
    /// an empty heap
    pub fn new() -> Self {
        PairingHeap {
            nodes: Slab::new(),
            root: None,
        }
    }

    /// Removes the minimum element and returns its key.
    pub fn pop(&mut self) -> Result<i64> {
        self.pop_min().map(|(_, key)| key)
    }

    /// Removes the element named by `id` and returns the key it held.
    pub fn remove(&mut self, id: NodeId) -> Result<i64> {
        if self.root.is_none() {
            return Err(Error::Empty);
        }
        let key = self.nodes[id.0].key;
        self.decrease_key(id, NEG_INF)?;
        self.pop()?;
        Ok(key)
    }

    /// Melds two disjoint trees and returns the root of the combined tree.
    /// The loser is spliced in front of the winner's child list; on equal
    /// keys `a` stays on top.
    fn meld(&mut self, a: usize, b: usize) -> usize {
        debug_assert!(self.nodes[a].sibling.is_none());
        debug_assert!(self.nodes[b].sibling.is_none());
        let (a, b) = if self.nodes[a].key > self.nodes[b].key {
            (b, a)
        } else {
            (a, b)
        };
        self.nodes[b].parent = Some(a);
        if let Some(c) = self.nodes[a].child {
            self.nodes[b].sibling = Some(c);
            self.nodes[c].parent = Some(b);
        }
        self.nodes[a].child = Some(b);
        a
    }

    /// Cuts a non-root node out of its parent's child list, keeping the
    /// sibling chain intact.
    fn cut(&mut self, x: usize) {
        let p = self.nodes[x].parent.unwrap();
        let sibling = self.nodes[x].sibling;
        if self.nodes[p].child == Some(x) {
            self.nodes[p].child = sibling;
        } else {
            self.nodes[p].sibling = sibling;
        }
        if let Some(s) = sibling {
            self.nodes[s].parent = Some(p);
        }
        self.nodes[x].parent = None;
        self.nodes[x].sibling = None;
    }
}

impl Default for PairingHeap {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressableHeap for PairingHeap {
    fn size(&self) -> usize {
        self.nodes.len()
    }

    fn peek(&self) -> Result<i64> {
        match self.root {
            Some(root) => Ok(self.nodes[root].key),
            None => Err(Error::Empty),
        }
    }

    fn add(&mut self, key: i64) -> NodeId {
        let id = self.nodes.insert(Node::new(key));
        self.root = Some(match self.root {
            Some(root) => self.meld(root, id),
            None => id,
        });
        NodeId(id)
    }

    fn pop_min(&mut self) -> Result<(NodeId, i64)> {
        let res = match self.root {
            Some(root) => root,
            None => return Err(Error::Empty),
        };
        let node = self.nodes.remove(res);
        let first = match node.child {
            Some(first) => first,
            None => {
                self.root = None;
                return Ok((NodeId(res), node.key));
            }
        };
        // first pass: meld pairs of subtrees left to right
        let mut pair_roots = Vec::new();
        let mut crawl = Some(first);
        while let Some(a) = crawl {
            match self.nodes[a].sibling.take() {
                Some(b) => {
                    crawl = self.nodes[b].sibling.take();
                    pair_roots.push(self.meld(a, b));
                }
                None => {
                    crawl = None;
                    pair_roots.push(a);
                }
            }
        }
        // second pass: accumulate right to left into a single tree
        let mut acc = pair_roots.pop().unwrap();
        while let Some(next) = pair_roots.pop() {
            acc = self.meld(acc, next);
        }
        self.nodes[acc].parent = None;
        self.nodes[acc].sibling = None;
        self.root = Some(acc);
        Ok((NodeId(res), node.key))
    }

    fn decrease_key(&mut self, id: NodeId, new_key: i64) -> Result<()> {
        let node = &mut self.nodes[id.0];
        if new_key > node.key {
            return Err(Error::InvariantViolation);
        }
        node.key = new_key;
        let parent = node.parent;
        match parent {
            None => Ok(()),
            Some(p) if self.nodes[p].key <= new_key => Ok(()),
            Some(_) => {
                self.cut(id.0);
                let root = self.root.unwrap();
                self.root = Some(self.meld(root, id.0));
                Ok(())
            }
        }
    }
}

#[cfg(test)]
impl PairingHeap {
    /// walks the whole tree, checking heap order, the back links and that
    /// every arena slot is reachable exactly once
    fn check_structure(&self) {
        match self.root {
            None => assert_eq!(self.nodes.len(), 0),
            Some(root) => {
                assert!(self.nodes[root].parent.is_none());
                assert!(self.nodes[root].sibling.is_none());
                let mut seen = 0;
                self.check_subtree(root, &mut seen);
                assert_eq!(seen, self.nodes.len());
            }
        }
    }

    fn check_subtree(&self, x: usize, seen: &mut usize) {
        *seen += 1;
        let mut back = x;
        let mut crawl = self.nodes[x].child;
        while let Some(c) = crawl {
            assert!(self.nodes[c].key >= self.nodes[x].key);
            assert_eq!(self.nodes[c].parent, Some(back));
            self.check_subtree(c, seen);
            back = c;
            crawl = self.nodes[c].sibling;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn empty_heap_rejects_pop_and_peek() {
        let mut heap = PairingHeap::new();
        assert_eq!(heap.pop(), Err(Error::Empty));
        assert_eq!(heap.peek(), Err(Error::Empty));
        assert_eq!(heap.size(), 0);
        assert!(heap.is_empty());
    }

    #[test]
    fn singleton() {
        let mut heap = PairingHeap::new();
        heap.add(42);
        assert_eq!(heap.peek(), Ok(42));
        assert_eq!(heap.pop(), Ok(42));
        assert!(heap.is_empty());
    }

    #[test]
    fn two_pass_pop_orders_interior_nodes() {
        let mut heap = PairingHeap::new();
        for key in [5, 3, 8, 1, 7] {
            heap.add(key);
        }
        heap.check_structure();
        for expected in [1, 3, 5, 7, 8] {
            assert_eq!(heap.pop(), Ok(expected));
            heap.check_structure();
        }
        assert!(heap.is_empty());
    }

    #[test]
    fn decrease_key_across_the_tree() {
        let mut heap = PairingHeap::new();
        heap.add(10);
        heap.add(20);
        let h = heap.add(30);
        heap.add(40);
        heap.decrease_key(h, 0).unwrap();
        heap.check_structure();
        assert_eq!(heap.pop(), Ok(0));
        assert_eq!(heap.pop(), Ok(10));
        assert_eq!(heap.pop(), Ok(20));
        assert_eq!(heap.pop(), Ok(40));
    }

    #[test]
    fn remove_a_middle_node() {
        let mut heap = PairingHeap::new();
        let mut h9 = None;
        for key in [5, 2, 9, 1, 7, 3, 8] {
            let h = heap.add(key);
            if key == 9 {
                h9 = Some(h);
            }
        }
        assert_eq!(heap.remove(h9.unwrap()), Ok(9));
        heap.check_structure();
        for expected in [1, 2, 3, 5, 7, 8] {
            assert_eq!(heap.pop(), Ok(expected));
        }
        assert!(heap.is_empty());
    }

    #[test]
    fn remove_undoes_an_add() {
        let mut heap = PairingHeap::new();
        for key in [6, 4, 9] {
            heap.add(key);
        }
        let h = heap.add(5);
        assert_eq!(heap.remove(h), Ok(5));
        assert_eq!(heap.size(), 3);
        for expected in [4, 6, 9] {
            assert_eq!(heap.pop(), Ok(expected));
        }
    }

    #[test]
    fn decrease_key_rejects_an_increase() {
        let mut heap = PairingHeap::new();
        let h = heap.add(10);
        assert_eq!(heap.decrease_key(h, 15), Err(Error::InvariantViolation));
        assert_eq!(heap.peek(), Ok(10));
    }

    #[test]
    fn decrease_key_on_the_root() {
        let mut heap = PairingHeap::new();
        let h = heap.add(3);
        heap.add(8);
        heap.decrease_key(h, 1).unwrap();
        assert_eq!(heap.peek(), Ok(1));
    }

    #[test]
    fn remove_on_empty_heap() {
        let mut heap = PairingHeap::new();
        let h = heap.add(1);
        assert_eq!(heap.pop(), Ok(1));
        assert_eq!(heap.remove(h), Err(Error::Empty));
    }

    #[test]
    fn peek_never_exceeds_a_decreased_key() {
        let mut heap = PairingHeap::new();
        for key in [50, 40, 60, 70] {
            heap.add(key);
        }
        let h = heap.add(55);
        heap.decrease_key(h, 45).unwrap();
        assert!(heap.peek().unwrap() <= 45);
    }

    #[test]
    fn randomized_operations_keep_the_structure_valid() {
        let mut rng = StdRng::seed_from_u64(0x9a17);
        let mut heap = PairingHeap::new();
        let mut handles = Vec::new();
        let mut keys = Vec::new();
        for _ in 0..2000 {
            match rng.random_range(0..10) {
                0..=4 => {
                    let key = rng.random_range(-1000..1000);
                    handles.push(Some(heap.add(key)));
                    keys.push(Some(key));
                }
                5..=7 if !heap.is_empty() => {
                    // decrease a random live element
                    let i = rng.random_range(0..handles.len());
                    if let (Some(h), Some(key)) = (handles[i], keys[i]) {
                        let new_key = key - rng.random_range(0..100);
                        heap.decrease_key(h, new_key).unwrap();
                        keys[i] = Some(new_key);
                    }
                }
                _ if !heap.is_empty() => {
                    let (id, _) = heap.pop_min().unwrap();
                    let i = handles.iter().position(|h| *h == Some(id)).unwrap();
                    handles[i] = None;
                    keys[i] = None;
                }
                _ => {}
            }
            heap.check_structure();
        }
        let mut last = i64::MIN;
        while let Ok(key) = heap.pop() {
            assert!(key >= last);
            last = key;
            heap.check_structure();
        }
    }
}
