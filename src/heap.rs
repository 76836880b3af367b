use std::fmt::{self, Display, Formatter};

// keys are plain i64; the minimum representable value is reserved as the
// sentinel that `remove` sinks a node to, so user keys must be greater.
pub(crate) const NEG_INF: i64 = i64::MIN;

/// A stable handle to an element stored in a heap.
///
/// Returned by `add` and accepted by `decrease_key` and `remove`. The handle
/// keeps naming the same element across any internal restructuring of the
/// heap. Once the element has been extracted the handle is dangling and must
/// not be used again; the heaps do not track liveness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl From<NodeId> for usize {
    fn from(id: NodeId) -> usize {
        id.0
    }
}

/// Errors surfaced by heap operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// `pop`, `peek` or `remove` called on an empty heap.
    Empty,
    /// `decrease_key` called with a key above the element's current key.
    InvariantViolation,
}

/// Result type for heap operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::Empty => write!(f, "heap is empty"),
            Error::InvariantViolation => write!(f, "new key is greater than the current key"),
        }
    }
}

impl std::error::Error for Error {}

/// Common surface of the addressable heaps. The trace runner drives every
/// implementation through this interface; the concrete type is picked once
/// at the boundary.
pub trait AddressableHeap {
    /// number of elements currently in the heap
    fn size(&self) -> usize;

    /// true iff the heap holds no elements
    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// the minimum key, without removing it
    fn peek(&self) -> Result<i64>;

    /// insert `key` and return the handle of the new element
    fn add(&mut self, key: i64) -> NodeId;

    /// remove the minimum element and return its handle together with its key
    fn pop_min(&mut self) -> Result<(NodeId, i64)>;

    /// lower the key of the element named by `id` to `new_key`
    fn decrease_key(&mut self, id: NodeId, new_key: i64) -> Result<()>;
}
