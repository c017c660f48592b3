//! Event parsers: turn the bytes at a context's location into an event.

use super::stream::TraceStream;
use crate::trace::{TraceContext, TraceEvent, TraceLocation};
use log::debug;
use std::io;

/// Materializes the next event of a trace
///
/// Implementations read forward from `context.location` and advance it past
/// the consumed bytes. The reader always passes a duplicate of the caller's
/// context, so mutating it is free.
pub trait EventParser: Send {
    /// Parse one event; `None` at end of stream or on malformed input
    fn parse_next_event(
        &mut self,
        stream: &mut TraceStream,
        context: &mut TraceContext,
    ) -> Option<TraceEvent>;
}

/// Parser for the length-prefixed binary record format (see [`super::format`])
#[derive(Debug, Default, Clone)]
pub struct RecordParser;

impl RecordParser {
    pub fn new() -> Self {
        Self
    }
}

impl EventParser for RecordParser {
    fn parse_next_event(
        &mut self,
        stream: &mut TraceStream,
        context: &mut TraceContext,
    ) -> Option<TraceEvent> {
        let start = match context.location.as_offset() {
            Some(offset) => offset,
            None => {
                debug!("Record parser cannot read from {}", context.location);
                return None;
            }
        };

        match read_record(stream, start) {
            Ok(Some((record, end))) => {
                let event = TraceEvent {
                    timestamp: record.timestamp,
                    source: record.source,
                    event_type: record.event_type,
                    reference: record.reference,
                    fields: record.fields,
                    rank: context.rank,
                    location: TraceLocation::Offset(start),
                };
                context.set_location(TraceLocation::Offset(end));
                Some(event)
            }
            Ok(None) => None,
            Err(e) => {
                debug!("Malformed record at offset {}: {}", start, e);
                None
            }
        }
    }
}

/// Decoded record fields
struct RawRecord {
    timestamp: i64,
    source: String,
    event_type: String,
    reference: i32,
    fields: Vec<String>,
}

/// Decode the record starting at `start`; `Ok(None)` at a clean end of stream
fn read_record(stream: &mut TraceStream, start: u64) -> io::Result<Option<(RawRecord, u64)>> {
    if start >= stream.length()? {
        return Ok(None);
    }

    if stream.position()? != start {
        stream.seek_to(start)?;
    }

    let timestamp = stream.read_i64()?;
    let source = stream.read_string()?;
    let event_type = stream.read_string()?;
    let reference = stream.read_i32()?;
    let count = stream.read_u16()?;
    let fields = (0..count)
        .map(|_| stream.read_string())
        .collect::<io::Result<Vec<_>>>()?;

    let end = stream.position()?;
    Ok(Some((
        RawRecord {
            timestamp,
            source,
            event_type,
            reference,
            fields,
        },
        end,
    )))
}
