use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;
use std::time::{Duration, Instant};

use crate::binary_heap::LazyBinaryHeap;
use crate::fibonacci_heap::FibonacciHeap;
use crate::heap::{AddressableHeap, NodeId};
use crate::pairing_heap::PairingHeap;

/// One command of a recorded trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// add a key; the element's ordinal is the count of prior adds
    Add(i64),
    /// decrease the key of the element with the given ordinal
    Decrease(usize, i64),
    /// pop the minimum
    Pop,
}

/// The heap implementation a trace is replayed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapKind {
    Pairing,
    Fibonacci,
    Binary,
}

impl HeapKind {
    pub fn label(self) -> &'static str {
        match self {
            HeapKind::Pairing => "Pairing",
            HeapKind::Fibonacci => "Fibonacci",
            HeapKind::Binary => "Binary",
        }
    }
}

/// Failures while reading a trace file.
#[derive(Debug)]
pub enum TraceError {
    Io(io::Error),
    Parse { line: usize },
}

impl Display for TraceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TraceError::Io(err) => write!(f, "{}", err),
            TraceError::Parse { line } => write!(f, "malformed command on line {}", line),
        }
    }
}

impl std::error::Error for TraceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TraceError::Io(err) => Some(err),
            TraceError::Parse { .. } => None,
        }
    }
}

impl From<io::Error> for TraceError {
    fn from(err: io::Error) -> Self {
        TraceError::Io(err)
    }
}

fn field<T: FromStr>(token: Option<&str>, index: usize) -> Result<T, TraceError> {
    token
        .and_then(|t| t.parse().ok())
        .ok_or(TraceError::Parse { line: index + 1 })
}

/// Parses a trace, returning the number of `a` commands and the command
/// list. Blank lines are skipped; anything else that is not a command is a
/// parse error.
pub fn parse_trace<R: BufRead>(input: R) -> Result<(usize, Vec<Op>), TraceError> {
    let mut adds = 0;
    let mut ops = Vec::new();
    for (index, line) in input.lines().enumerate() {
        let line = line?;
        let mut tokens = line.split_whitespace();
        let op = match tokens.next() {
            None => continue,
            Some("a") => {
                adds += 1;
                Op::Add(field(tokens.next(), index)?)
            }
            Some("d") => {
                let ordinal = field(tokens.next(), index)?;
                Op::Decrease(ordinal, field(tokens.next(), index)?)
            }
            Some("p") => Op::Pop,
            Some(_) => return Err(TraceError::Parse { line: index + 1 }),
        };
        ops.push(op);
    }
    Ok((adds, ops))
}

/// Reads and parses a trace file.
pub fn read_trace(path: &Path) -> Result<(usize, Vec<Op>), TraceError> {
    let file = File::open(path)?;
    parse_trace(BufReader::new(file))
}

/// Replays a parsed trace against `heap` and reports the elapsed wall time.
///
/// Elements are tracked by insertion ordinal, retiring each ordinal when its
/// element is popped. Commands that name a dead or unknown ordinal, would
/// raise a key, or pop an empty heap are skipped.
pub fn replay<H: AddressableHeap>(mut heap: H, adds: usize, ops: &[Op]) -> Duration {
    let start = Instant::now();
    let mut handles: Vec<Option<NodeId>> = vec![None; adds];
    let mut owner: HashMap<NodeId, usize> = HashMap::with_capacity(adds);
    let mut next = 0;
    for op in ops {
        match *op {
            Op::Add(key) => {
                let id = heap.add(key);
                handles[next] = Some(id);
                owner.insert(id, next);
                next += 1;
            }
            Op::Decrease(ordinal, key) => {
                if let Some(&Some(id)) = handles.get(ordinal) {
                    let _ = heap.decrease_key(id, key);
                }
            }
            Op::Pop => {
                if let Ok((id, _)) = heap.pop_min() {
                    if let Some(ordinal) = owner.remove(&id) {
                        handles[ordinal] = None;
                    }
                }
            }
        }
    }
    start.elapsed()
}

/// Reads a trace file and times one heap implementation over it. File
/// reading is excluded from the measurement.
pub fn trace_time(kind: HeapKind, path: &Path) -> Result<Duration, TraceError> {
    let (adds, ops) = read_trace(path)?;
    let elapsed = match kind {
        HeapKind::Pairing => replay(PairingHeap::new(), adds, &ops),
        HeapKind::Fibonacci => replay(FibonacciHeap::new(), adds, &ops),
        HeapKind::Binary => replay(LazyBinaryHeap::new(), adds, &ops),
    };
    Ok(elapsed)
}
