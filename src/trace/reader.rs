//! Seekable, lock-serialized trace reader.
//!
//! Every public operation takes the reader-wide lock for its whole duration,
//! I/O included, so seek-then-read sequences on a shared reader are atomic.
//! Faults are logged and surface as "no result" (`None` / `0.0`).

use super::context::{Rank, TraceContext};
use super::event::TraceEvent;
use super::location::TraceLocation;
use crate::parser::{EventParser, RecordParser, TraceStream};
use crate::utils::error::TraceError;
use log::{debug, warn};
use parking_lot::Mutex;
use std::io;
use std::path::{Path, PathBuf};

/// State guarded by the reader lock
struct ReaderState<P> {
    /// `None` once disposed (or when a duplicate could not reopen the file)
    stream: Option<TraceStream>,
    parser: P,
}

/// Random-access reader over one trace file
pub struct TraceReader<P: EventParser = RecordParser> {
    path: PathBuf,
    state: Mutex<ReaderState<P>>,
}

impl TraceReader<RecordParser> {
    /// Open a trace with the default record parser
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        Self::with_parser(path, RecordParser::new())
    }
}

impl<P: EventParser> TraceReader<P> {
    /// Open a trace with a specific parser
    ///
    /// **Public** - main constructor
    ///
    /// # Arguments
    /// * `path` - Trace file in the binary record format
    /// * `parser` - Parser decoding one event per call
    ///
    /// # Errors
    /// * `TraceError::Open` - the backing file is missing or unreadable
    pub fn with_parser(path: impl AsRef<Path>, parser: P) -> Result<Self, TraceError> {
        let path = path.as_ref().to_path_buf();
        let stream = TraceStream::open(&path).map_err(|source| TraceError::Open {
            path: path.clone(),
            source,
        })?;

        debug!("Opened trace {}", path.display());

        Ok(Self {
            path,
            state: Mutex::new(ReaderState {
                stream: Some(stream),
                parser,
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Position the stream at `location`
    ///
    /// **Public** - checkpoint restore
    ///
    /// # Arguments
    /// * `location` - Offset to seek to, or `None` for the beginning
    ///
    /// # Returns
    /// A fresh context at the stream's actual position, or `None` when
    /// disposed, the location kind is foreign, or the seek fails
    ///
    /// `None` means the beginning of the trace and yields rank 0; an explicit
    /// location yields an unknown rank. The returned context carries the
    /// position re-queried from the stream.
    pub fn seek_location(&self, location: Option<&TraceLocation>) -> Option<TraceContext> {
        let mut state = self.state.lock();
        let stream = state.stream.as_mut()?;

        let (offset, rank) = match location {
            None => (0, Rank::Known(0)),
            Some(loc) => match loc.as_offset() {
                Some(offset) => (offset, Rank::Unknown),
                None => {
                    warn!("Cannot seek {} to foreign location {}", self.path.display(), loc);
                    return None;
                }
            },
        };

        match seek_stream(stream, offset) {
            Ok(position) => Some(TraceContext::new(TraceLocation::Offset(position), rank)),
            Err(e) => {
                warn!("Seek to offset {} failed in {}: {}", offset, self.path.display(), e);
                None
            }
        }
    }

    /// Position the stream at `ratio` (0.0 to 1.0) of the trace length
    ///
    /// **Public** - used for scroll-bar style navigation
    ///
    /// The resulting rank is always unknown.
    pub fn seek_ratio(&self, ratio: f64) -> Option<TraceContext> {
        let mut state = self.state.lock();
        let stream = state.stream.as_mut()?;

        let result = stream.length().and_then(|length| {
            let offset = ratio_to_offset(ratio, length);
            seek_stream(stream, offset)
        });

        match result {
            Ok(position) => Some(TraceContext::new(
                TraceLocation::Offset(position),
                Rank::Unknown,
            )),
            Err(e) => {
                warn!("Seek to ratio {} failed in {}: {}", ratio, self.path.display(), e);
                None
            }
        }
    }

    /// Fraction of the trace preceding `location`
    ///
    /// Returns 0 for foreign location kinds, empty traces and disposed readers.
    pub fn location_ratio(&self, location: &TraceLocation) -> f64 {
        let state = self.state.lock();
        let (Some(stream), Some(offset)) = (state.stream.as_ref(), location.as_offset()) else {
            return 0.0;
        };

        match stream.length() {
            Ok(0) => 0.0,
            Ok(length) => offset as f64 / length as f64,
            Err(e) => {
                warn!("Cannot read length of {}: {}", self.path.display(), e);
                0.0
            }
        }
    }

    /// Present position of the stream; `None` once disposed
    pub fn current_location(&self) -> Option<TraceLocation> {
        let mut state = self.state.lock();
        let stream = state.stream.as_mut()?;

        match stream.position() {
            Ok(position) => Some(TraceLocation::Offset(position)),
            Err(e) => {
                warn!("Cannot query position in {}: {}", self.path.display(), e);
                None
            }
        }
    }

    /// Total length of the trace in bytes; `None` once disposed
    pub fn length(&self) -> Option<u64> {
        let state = self.state.lock();
        let stream = state.stream.as_ref()?;
        stream
            .length()
            .map_err(|e| warn!("Cannot read length of {}: {}", self.path.display(), e))
            .ok()
    }

    /// Parse the event at `context` without touching `context`
    ///
    /// **Public** - the parser receives a duplicate of the context
    ///
    /// # Returns
    /// The decoded event, or `None` at end of trace, on malformed input or
    /// once disposed
    pub fn parse_event(&self, context: &TraceContext) -> Option<TraceEvent> {
        let mut state = self.state.lock();
        let ReaderState { stream, parser } = &mut *state;
        let stream = stream.as_mut()?;

        // the parser advances its own copy
        let mut cursor = context.duplicate();
        parser.parse_next_event(stream, &mut cursor)
    }

    /// Parse the event at `context` and move `context` past it
    ///
    /// On success the context points at the following event and its rank is
    /// incremented. At end of stream the context is left as is.
    pub fn next_event(&self, context: &mut TraceContext) -> Option<TraceEvent> {
        let mut state = self.state.lock();
        let ReaderState { stream, parser } = &mut *state;
        let stream = stream.as_mut()?;

        let mut cursor = context.duplicate();
        let event = parser.parse_next_event(stream, &mut cursor)?;
        context.set_location(cursor.location);
        context.increase_rank();
        Some(event)
    }

    /// Close the stream; safe to call any number of times
    pub fn dispose(&self) {
        let mut state = self.state.lock();
        if state.stream.take().is_some() {
            debug!("Disposed trace reader for {}", self.path.display());
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.state.lock().stream.is_none()
    }
}

impl<P: EventParser + Default> TraceReader<P> {
    /// Open an independent reader on the same file with a fresh parser
    ///
    /// The duplicate has its own handle and its own lock.
    ///
    /// # Errors
    /// * `TraceError::Open` - the file can no longer be opened
    pub fn try_duplicate(&self) -> Result<Self, TraceError> {
        Self::with_parser(&self.path, P::default())
    }

    /// Like [`try_duplicate`](Self::try_duplicate), but a reopen failure
    /// yields an inert reader (every operation returns no result)
    pub fn duplicate(&self) -> Self {
        match self.try_duplicate() {
            Ok(reader) => reader,
            Err(e) => {
                warn!("Duplicate of {} is inert: {}", self.path.display(), e);
                Self {
                    path: self.path.clone(),
                    state: Mutex::new(ReaderState {
                        stream: None,
                        parser: P::default(),
                    }),
                }
            }
        }
    }
}

impl<P: EventParser> std::fmt::Debug for TraceReader<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraceReader")
            .field("path", &self.path)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// Seek only when not already there, then report the actual position
fn seek_stream(stream: &mut TraceStream, offset: u64) -> io::Result<u64> {
    if stream.position()? != offset {
        stream.seek_to(offset)?;
    }
    stream.position()
}

/// `round(ratio * length)`, with the ratio clamped to `[0, 1]` and NaN as 0
fn ratio_to_offset(ratio: f64, length: u64) -> u64 {
    let ratio = if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) };
    (ratio * length as f64).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_to_offset() {
        assert_eq!(ratio_to_offset(0.0, 100), 0);
        assert_eq!(ratio_to_offset(0.5, 101), 51);
        assert_eq!(ratio_to_offset(1.0, 100), 100);
        assert_eq!(ratio_to_offset(1.5, 100), 100);
        assert_eq!(ratio_to_offset(-0.5, 100), 0);
        assert_eq!(ratio_to_offset(f64::NAN, 100), 0);
    }

    #[test]
    fn test_open_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = TraceReader::open(dir.path().join("missing.trace"));
        assert!(matches!(result, Err(TraceError::Open { .. })));
    }
}
