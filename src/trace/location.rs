//! Position markers within a trace stream.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// An opaque, comparable position in a trace
///
/// The reader only understands `Offset`. Other kinds may travel through the
/// API (e.g. from an index keyed by time) and are treated as foreign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceLocation {
    /// Byte offset into the backing file
    Offset(u64),

    /// Event timestamp
    Timestamp(i64),
}

impl TraceLocation {
    /// Location at a byte offset
    pub fn offset(ordinal: u64) -> Self {
        Self::Offset(ordinal)
    }

    /// Byte offset, if this is an offset location
    pub fn as_offset(&self) -> Option<u64> {
        match self {
            Self::Offset(o) => Some(*o),
            Self::Timestamp(_) => None,
        }
    }

    /// Compare two locations of the same kind; `None` across kinds
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Offset(a), Self::Offset(b)) => Some(a.cmp(b)),
            (Self::Timestamp(a), Self::Timestamp(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl PartialOrd for TraceLocation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(other)
    }
}

impl fmt::Display for TraceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Offset(o) => write!(f, "@{}", o),
            Self::Timestamp(ts) => write!(f, "t={}", ts),
        }
    }
}
