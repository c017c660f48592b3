//! Checkpoint index for rank and timestamp seeks.
//!
//! Building the index streams through the whole trace once and records a
//! checkpoint every `page_size` events. A seek then jumps to the closest
//! preceding checkpoint and reads forward at most `page_size - 1` events.

use super::context::{Rank, TraceContext};
use super::location::TraceLocation;
use super::reader::TraceReader;
use crate::parser::EventParser;
use crate::utils::config::DEFAULT_INDEX_PAGE_SIZE;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Position of the first event of an index page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub rank: u64,
    pub location: TraceLocation,
    pub timestamp: i64,
}

/// Checkpoint table plus global trace statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceIndex {
    pub page_size: usize,
    pub checkpoints: Vec<Checkpoint>,
    pub event_count: u64,

    /// Timestamps of the first and last events, if any
    pub time_range: Option<(i64, i64)>,
}

impl TraceIndex {
    /// Index a trace with the default page size
    pub fn build_default<P: EventParser>(reader: &TraceReader<P>) -> Self {
        Self::build(reader, DEFAULT_INDEX_PAGE_SIZE)
    }

    /// Stream through the trace and record checkpoints
    ///
    /// **Public** - main entry point for indexing
    ///
    /// # Arguments
    /// * `reader` - Trace to index; its stream is left at the last event read
    /// * `page_size` - Events between two checkpoints
    ///
    /// A page size of 0 is treated as 1. Indexing stops at the first
    /// malformed record, as the reader does.
    pub fn build<P: EventParser>(reader: &TraceReader<P>, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let mut index = Self {
            page_size,
            checkpoints: Vec::new(),
            event_count: 0,
            time_range: None,
        };

        let Some(mut context) = reader.seek_location(None) else {
            return index;
        };

        loop {
            let location = context.location;
            let Some(event) = reader.next_event(&mut context) else {
                break;
            };

            if index.event_count % page_size as u64 == 0 {
                index.checkpoints.push(Checkpoint {
                    rank: index.event_count,
                    location,
                    timestamp: event.timestamp,
                });
            }

            index.time_range = Some(match index.time_range {
                None => (event.timestamp, event.timestamp),
                Some((start, end)) => (start.min(event.timestamp), end.max(event.timestamp)),
            });
            index.event_count += 1;
        }

        info!(
            "Indexed {} events in {} ({} checkpoints)",
            index.event_count,
            reader.path().display(),
            index.checkpoints.len()
        );
        index
    }

    /// Context of the event with the given rank; `None` past the end
    pub fn seek_rank<P: EventParser>(
        &self,
        reader: &TraceReader<P>,
        rank: u64,
    ) -> Option<TraceContext> {
        if rank >= self.event_count {
            return None;
        }

        let page = (rank / self.page_size as u64) as usize;
        let mut context = self.context_at_page(reader, page)?;

        while context.rank.value()? < rank {
            reader.next_event(&mut context)?;
        }

        debug!("Seeked to rank {} at {}", rank, context.location);
        Some(context)
    }

    /// Context of the first event whose timestamp is at or after `timestamp`
    ///
    /// Assumes timestamps are non-decreasing along the trace.
    pub fn seek_timestamp<P: EventParser>(
        &self,
        reader: &TraceReader<P>,
        timestamp: i64,
    ) -> Option<TraceContext> {
        // last checkpoint strictly before the target, so equal timestamps
        // spilling over a page boundary are not skipped
        let page = self
            .checkpoints
            .partition_point(|cp| cp.timestamp < timestamp)
            .saturating_sub(1);
        let mut context = self.context_at_page(reader, page)?;

        loop {
            let event = reader.parse_event(&context)?;
            if event.timestamp >= timestamp {
                return Some(context);
            }
            reader.next_event(&mut context)?;
        }
    }

    fn context_at_page<P: EventParser>(
        &self,
        reader: &TraceReader<P>,
        page: usize,
    ) -> Option<TraceContext> {
        let checkpoint = self.checkpoints.get(page)?;
        let mut context = reader.seek_location(Some(&checkpoint.location))?;
        context.set_rank(Rank::Known(checkpoint.rank));
        Some(context)
    }
}
