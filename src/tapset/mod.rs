//! SystemTap tapset output parsing.
//!
//! This module handles:
//! - Running the front end and capturing its output
//! - Tokenizing and recognizing declaration headers
//! - Building and publishing the function tree
//! - Extracting probe names and definition search patterns

pub mod declaration;
pub mod function_parser;
pub mod lexer;
pub mod probe;
pub mod progress;
pub mod runner;
pub mod tree;

// Re-export main types
pub use declaration::{parse_declarations, Declaration};
pub use function_parser::{FunctionParser, ParserState, RunOutcome, TapsetTree};
pub use probe::ProbeNode;
pub use progress::{LogProgress, NullProgress, ProgressSink, TreeListener};
pub use runner::{ExternalTool, StapCommand};
pub use tree::{NodeKind, TreeNode};
