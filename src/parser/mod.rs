//! Event parsing over the binary trace format.
//!
//! This module handles:
//! - Random-access reads of the backing file
//! - Decoding records into structured events
//! - Encoding records (for producing traces)

pub mod event_parser;
pub mod format;
pub mod stream;

// Re-export main types
pub use event_parser::{EventParser, RecordParser};
pub use format::{encode_event, EventRecord};
pub use stream::TraceStream;
