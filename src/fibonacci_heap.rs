use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};

use slab::Slab;

use crate::heap::{AddressableHeap, Error, NodeId, Result, NEG_INF};

const PHI: f64 = 1.618033988749895;

/// A node of the Fibonacci forest. Siblings form circular doubly linked
/// lists threaded through arena indices; a solitary node is its own left and
/// right neighbor. `child` is an arbitrary entry point into the child list.
struct Node {
    key: i64,
    parent: Option<usize>,
    child: Option<usize>,
    left: usize,
    right: usize,
    degree: usize,
    marked: bool,
}

impl Node {
    /// a solitary node stored at arena slot `at`
    fn new(key: i64, at: usize) -> Self {
        Node {
            key,
            parent: None,
            child: None,
            left: at,
            right: at,
            degree: 0,
            marked: false,
        }
    }
}

/// A minheap implemented as a Fibonacci heap over an arena of nodes.
///
/// Handles returned by `add` stay valid until the element is extracted.
/// `union` relocates the absorbed heap's nodes into this heap's arena, so
/// handles handed out by the absorbed heap must not be used afterwards.
/// User keys must be strictly greater than `i64::MIN`; that value is
/// reserved for `remove`.
pub struct FibonacciHeap {
    nodes: Slab<Node>,
    minroot: Option<usize>,
}

/// general methods shared by several operations
impl FibonacciHeap {
    /// an empty heap
    pub fn new() -> Self {
        FibonacciHeap {
            nodes: Slab::new(),
            minroot: None,
        }
    }

    /// Removes the minimum element and returns its key.
    pub fn pop(&mut self) -> Result<i64> {
        self.pop_min().map(|(_, key)| key)
    }

    /// Removes the element named by `id` and returns the key it held.
    pub fn remove(&mut self, id: NodeId) -> Result<i64> {
        if self.minroot.is_none() {
            return Err(Error::Empty);
        }
        let key = self.nodes[id.0].key;
        self.decrease_key(id, NEG_INF)?;
        self.pop()?;
        Ok(key)
    }

    /// Absorbs every element of `other`, leaving it empty. The minimum of
    /// the combined heap is the smaller of the two minima.
    pub fn union(&mut self, other: &mut FibonacciHeap) {
        let other_min = match other.minroot.take() {
            Some(min) => min,
            None => return,
        };
        // move the nodes across, then rewrite their links to the new slots
        let mut remap = HashMap::with_capacity(other.nodes.len());
        let old_ids: Vec<usize> = other.nodes.iter().map(|(id, _)| id).collect();
        for old in old_ids {
            let node = other.nodes.remove(old);
            remap.insert(old, self.nodes.insert(node));
        }
        for &new in remap.values() {
            let node = &mut self.nodes[new];
            node.parent = node.parent.map(|p| remap[&p]);
            node.child = node.child.map(|c| remap[&c]);
            node.left = remap[&node.left];
            node.right = remap[&node.right];
        }
        let other_min = remap[&other_min];
        match self.minroot {
            Some(min) => {
                self.splice_left(min, other_min);
                if self.nodes[other_min].key < self.nodes[min].key {
                    self.minroot = Some(other_min);
                }
            }
            None => self.minroot = Some(other_min),
        }
    }

    /// Splices the ring containing `node` into the ring containing `anchor`,
    /// immediately to the left of `anchor`.
    fn splice_left(&mut self, anchor: usize, node: usize) {
        let node_right = self.nodes[node].right;
        let anchor_left = self.nodes[anchor].left;
        self.nodes[node_right].left = anchor_left;
        self.nodes[anchor_left].right = node_right;
        self.nodes[anchor].left = node;
        self.nodes[node].right = anchor;
    }

    /// Extracts `x` from its sibling ring, leaving it in a ring of one.
    fn detach(&mut self, x: usize) {
        let left = self.nodes[x].left;
        let right = self.nodes[x].right;
        self.nodes[left].right = right;
        self.nodes[right].left = left;
        self.nodes[x].left = x;
        self.nodes[x].right = x;
    }
}

/// consolidation after a pop
impl FibonacciHeap {
    /// Makes `x` a child of `p`.
    fn link(&mut self, x: usize, p: usize) {
        self.detach(x);
        match self.nodes[p].child {
            Some(c) => self.splice_left(c, x),
            None => self.nodes[p].child = Some(x),
        }
        self.nodes[x].parent = Some(p);
        self.nodes[x].marked = false;
        self.nodes[p].degree += 1;
    }

    /// Combines equal-degree roots until every root degree is distinct,
    /// then finds the new minimum. The scan over the degree table also
    /// clears the parent pointers and marks left behind by `pop_min`; every
    /// surviving root lands in the table exactly once, so none is missed.
    fn consolidate(&mut self) {
        let len = self.nodes.len().max(1) as f64;
        let mut table: Vec<Option<usize>> = vec![None; (len.ln() / PHI.ln()) as usize + 2];
        let mut p = self.minroot.unwrap();
        // the walk rewrites sibling links, so the terminating sibling must
        // be captured before the first link changes
        let last = self.nodes[p].right;
        let mut walking = true;
        while walking {
            if p == last {
                walking = false;
            }
            let next = self.nodes[p].left;
            loop {
                let degree = self.nodes[p].degree;
                if degree >= table.len() {
                    table.resize(degree + 1, None);
                }
                match table[degree] {
                    None => {
                        table[degree] = Some(p);
                        break;
                    }
                    Some(q) => {
                        table[degree] = None;
                        // the greater key goes underneath; on a tie the
                        // table occupant becomes the child
                        let (top, bottom) = if self.nodes[p].key > self.nodes[q].key {
                            (q, p)
                        } else {
                            (p, q)
                        };
                        self.link(bottom, top);
                        p = top;
                    }
                }
            }
            p = next;
        }
        self.minroot = None;
        for root in table.into_iter().flatten() {
            self.nodes[root].parent = None;
            self.nodes[root].marked = false;
            match self.minroot {
                Some(min) if self.nodes[root].key >= self.nodes[min].key => {}
                _ => self.minroot = Some(root),
            }
        }
    }
}

/// cutting for decrease-key
impl FibonacciHeap {
    /// Cuts `x` from its parent and adds it to the root list.
    fn cut(&mut self, x: usize) {
        let p = self.nodes[x].parent.unwrap();
        self.nodes[p].child = if self.nodes[x].left == x {
            None
        } else {
            Some(self.nodes[x].left)
        };
        self.nodes[p].degree -= 1;
        self.nodes[x].parent = None;
        self.detach(x);
        self.nodes[x].marked = false;
        let min = self.minroot.unwrap();
        self.splice_left(min, x);
    }

    /// Cuts marked ancestors until an unmarked one is reached, which is
    /// marked instead. Roots are never marked.
    fn cascading_cut(&mut self, mut x: usize) {
        while let Some(p) = self.nodes[x].parent {
            if self.nodes[x].marked {
                self.cut(x);
                x = p;
            } else {
                self.nodes[x].marked = true;
                return;
            }
        }
    }
}

impl Default for FibonacciHeap {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressableHeap for FibonacciHeap {
    fn size(&self) -> usize {
        self.nodes.len()
    }

    fn peek(&self) -> Result<i64> {
        match self.minroot {
            Some(min) => Ok(self.nodes[min].key),
            None => Err(Error::Empty),
        }
    }

    fn add(&mut self, key: i64) -> NodeId {
        let entry = self.nodes.vacant_entry();
        let id = entry.key();
        entry.insert(Node::new(key, id));
        match self.minroot {
            Some(min) => {
                self.splice_left(min, id);
                if key < self.nodes[min].key {
                    self.minroot = Some(id);
                }
            }
            None => self.minroot = Some(id),
        }
        NodeId(id)
    }

    fn pop_min(&mut self) -> Result<(NodeId, i64)> {
        let res = match self.minroot {
            Some(min) => min,
            None => return Err(Error::Empty),
        };
        // move the children into the root list; their parent pointers are
        // cleared later, by the consolidation table scan
        if let Some(child) = self.nodes[res].child {
            self.splice_left(res, child);
            self.nodes[res].child = None;
        } else if self.nodes[res].left == res {
            self.minroot = None;
            let node = self.nodes.remove(res);
            return Ok((NodeId(res), node.key));
        }
        let anchor = self.nodes[res].left;
        self.detach(res);
        self.minroot = Some(anchor);
        let node = self.nodes.remove(res);
        self.consolidate();
        Ok((NodeId(res), node.key))
    }

    fn decrease_key(&mut self, id: NodeId, new_key: i64) -> Result<()> {
        let node = &mut self.nodes[id.0];
        if new_key > node.key {
            return Err(Error::InvariantViolation);
        }
        node.key = new_key;
        if let Some(p) = node.parent {
            if new_key < self.nodes[p].key {
                self.cut(id.0);
                self.cascading_cut(p);
            }
        }
        let min = self.minroot.unwrap();
        if new_key < self.nodes[min].key {
            self.minroot = Some(id.0);
        }
        Ok(())
    }
}

impl FibonacciHeap {
    fn fmt_tree(&self, x: usize, depth: usize, f: &mut Formatter<'_>) -> fmt::Result {
        for _ in 0..depth {
            write!(f, "| ")?;
        }
        write!(f, "{}:{}", x, self.nodes[x].key)?;
        if self.nodes[x].marked {
            write!(f, "*")?;
        }
        writeln!(f)?;
        if let Some(child) = self.nodes[x].child {
            let mut c = child;
            loop {
                self.fmt_tree(c, depth + 1, f)?;
                c = self.nodes[c].right;
                if c == child {
                    break;
                }
            }
        }
        Ok(())
    }
}

impl Display for FibonacciHeap {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(min) = self.minroot {
            let mut root = min;
            loop {
                self.fmt_tree(root, 0, f)?;
                root = self.nodes[root].right;
                if root == min {
                    break;
                }
            }
        }
        write!(f, "minroot: {:?}", self.minroot)
    }
}

#[cfg(test)]
impl FibonacciHeap {
    /// walks the whole forest, checking ring wiring, heap order, degrees,
    /// marks, the minimum and the degree bound
    fn check_structure(&self) {
        let min = match self.minroot {
            Some(min) => min,
            None => {
                assert_eq!(self.nodes.len(), 0);
                return;
            }
        };
        let mut seen = 0;
        let mut max_degree = 0;
        for root in self.ring(min) {
            assert!(self.nodes[root].parent.is_none());
            assert!(!self.nodes[root].marked);
            assert!(self.nodes[min].key <= self.nodes[root].key);
            self.check_tree(root, &mut seen, &mut max_degree);
        }
        assert_eq!(seen, self.nodes.len());
        let bound = ((self.nodes.len() as f64).ln() / PHI.ln()).floor() as usize + 1;
        assert!(max_degree <= bound);
    }

    fn ring(&self, start: usize) -> Vec<usize> {
        let mut out = vec![start];
        let mut x = start;
        loop {
            assert_eq!(self.nodes[self.nodes[x].right].left, x);
            x = self.nodes[x].right;
            if x == start {
                break;
            }
            out.push(x);
        }
        out
    }

    fn check_tree(&self, x: usize, seen: &mut usize, max_degree: &mut usize) {
        *seen += 1;
        *max_degree = (*max_degree).max(self.nodes[x].degree);
        let child = match self.nodes[x].child {
            Some(child) => child,
            None => {
                assert_eq!(self.nodes[x].degree, 0);
                return;
            }
        };
        let children = self.ring(child);
        assert_eq!(self.nodes[x].degree, children.len());
        for c in children {
            assert_eq!(self.nodes[c].parent, Some(x));
            assert!(self.nodes[c].key >= self.nodes[x].key);
            self.check_tree(c, seen, max_degree);
        }
    }
}
