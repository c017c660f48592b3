//! Structured events materialized from a trace.

use super::context::Rank;
use super::location::TraceLocation;
use serde::{Deserialize, Serialize};

/// One event read from a trace
///
/// Ownership passes to the caller; the reader keeps no reference to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEvent {
    /// Event timestamp, in trace time units
    pub timestamp: i64,

    /// Producer of the event
    pub source: String,

    /// Event type name
    pub event_type: String,

    /// Reference (e.g. CPU or channel) the event belongs to
    pub reference: i32,

    /// Payload fields in record order
    pub fields: Vec<String>,

    /// Rank of the event, if the reading context knew it
    pub rank: Rank,

    /// Where the event's record starts
    pub location: TraceLocation,
}

impl TraceEvent {
    /// Fields rendered as `[a, b, c]`
    pub fn content(&self) -> String {
        format!("[{}]", self.fields.join(", "))
    }
}
