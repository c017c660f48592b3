//! Trace access: locations, cursors, the seekable reader and its index.

pub mod context;
pub mod event;
pub mod index;
pub mod location;
pub mod reader;

// Re-export main types
pub use context::{Rank, TraceContext};
pub use event::TraceEvent;
pub use index::{Checkpoint, TraceIndex};
pub use location::TraceLocation;
pub use reader::TraceReader;
