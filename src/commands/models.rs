use crate::utils::config::{TapsetConfig, DEFAULT_INDEX_PAGE_SIZE};
use std::path::PathBuf;

/// Where a `read` starts
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StartPosition {
    Beginning,
    Offset(u64),
    Ratio(f64),
    Rank(u64),
    Timestamp(i64),
}

/// Arguments for the read command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ReadArgs {
    /// Trace file to read
    pub trace: PathBuf,

    /// Where to start reading
    pub start: StartPosition,

    /// Maximum number of events to read
    pub count: usize,

    /// Checkpoint interval used for rank and timestamp seeks
    pub page_size: usize,

    /// Write events to this JSON file instead of stdout
    pub output: Option<PathBuf>,
}

impl Default for ReadArgs {
    fn default() -> Self {
        Self {
            trace: PathBuf::new(),
            start: StartPosition::Beginning,
            count: 10,
            page_size: DEFAULT_INDEX_PAGE_SIZE,
            output: None,
        }
    }
}

/// Arguments for the index command
#[derive(Debug, Clone)]
pub struct IndexArgs {
    pub trace: PathBuf,
    pub page_size: usize,
    pub output: Option<PathBuf>,
}

impl Default for IndexArgs {
    fn default() -> Self {
        Self {
            trace: PathBuf::new(),
            page_size: DEFAULT_INDEX_PAGE_SIZE,
            output: None,
        }
    }
}

/// Arguments for the functions command
#[derive(Debug, Clone, Default)]
pub struct FunctionsArgs {
    /// How to launch the front end
    pub config: TapsetConfig,

    /// Write the tree to this JSON file
    pub output: Option<PathBuf>,

    /// Print one line per function to stdout
    pub print_tree: bool,
}

/// Arguments for the probe command
#[derive(Debug, Clone, Default)]
pub struct ProbeArgs {
    /// A line of `stap -L` output
    pub line: String,

    /// Tapset source file to search for the probe definition
    pub search: Option<PathBuf>,
}
