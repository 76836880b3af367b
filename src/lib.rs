//! Addressable min-heaps with a trace benchmarking harness.
//!
//! Two handle-addressable heaps, a pairing heap and a Fibonacci heap, next
//! to a lazy binary heap baseline. A workload generator writes command
//! traces and a runner replays them against any of the three, measuring
//! wall time. The interactive shell in the binary wires it all together.

pub mod binary_heap;
pub mod config;
pub mod fibonacci_heap;
pub mod generate;
pub mod heap;
pub mod pairing_heap;
pub mod run;
pub mod shell;

pub use binary_heap::LazyBinaryHeap;
pub use fibonacci_heap::FibonacciHeap;
pub use heap::{AddressableHeap, Error, NodeId, Result};
pub use pairing_heap::PairingHeap;
