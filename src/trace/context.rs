//! Read cursors handed between the reader and the event parser.

use super::location::TraceLocation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sequence number of an event within a trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rank {
    Known(u64),

    /// The exact sequence number cannot be determined (e.g. after a ratio seek)
    Unknown,
}

impl Rank {
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    pub fn value(&self) -> Option<u64> {
        match self {
            Self::Known(r) => Some(*r),
            Self::Unknown => None,
        }
    }

    /// Next rank along a forward read; unknown stays unknown
    pub fn increment(self) -> Self {
        match self {
            Self::Known(r) => Self::Known(r.saturating_add(1)),
            Self::Unknown => Self::Unknown,
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(r) => write!(f, "{}", r),
            Self::Unknown => f.write_str("?"),
        }
    }
}

/// A cursor into a trace: where to read next and which event that is
///
/// `Clone` is a full value copy, so a duplicate can be mutated freely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    pub location: TraceLocation,
    pub rank: Rank,
}

impl TraceContext {
    pub fn new(location: TraceLocation, rank: Rank) -> Self {
        Self { location, rank }
    }

    /// Independent copy of this cursor
    pub fn duplicate(&self) -> Self {
        self.clone()
    }

    pub fn set_location(&mut self, location: TraceLocation) {
        self.location = location;
    }

    pub fn set_rank(&mut self, rank: Rank) {
        self.rank = rank;
    }

    /// Move the rank forward by one event
    pub fn increase_rank(&mut self) {
        self.rank = self.rank.increment();
    }
}
