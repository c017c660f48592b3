//! Builds the tree of tapset functions from `stap -v -p1` output.
//!
//! A run goes Idle -> Running -> Done. The tree is built privately and
//! published as a new immutable snapshot once complete, then handed to every
//! registered listener. Readers of [`FunctionParser::functions`] therefore
//! never observe a half-built tree.

use super::declaration::{Declaration, Declarations};
use super::progress::{ProgressSink, TreeListener};
use super::runner::ExternalTool;
use super::tree::TreeNode;
use crate::utils::config::{
    DEFINITION_PREFIX, FUNCTION_PASS_ARGS, FUNCTION_PROBE_SCRIPT, TREE_SCHEMA_VERSION,
};
use crate::utils::error::TapsetError;
use chrono::Utc;
use log::{debug, info};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

const TASK_NAME: &str = "Function Parser";

/// One published tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TapsetTree {
    pub schema_version: String,

    /// Increases with every completed run; 0 is the initial empty tree
    pub version: u64,

    /// RFC 3339 time of publication, empty for the initial tree
    pub generated_at: String,

    pub root: TreeNode,
}

impl TapsetTree {
    pub fn empty() -> Self {
        Self {
            schema_version: TREE_SCHEMA_VERSION.to_string(),
            version: 0,
            generated_at: String::new(),
            root: TreeNode::group(""),
        }
    }

    pub fn function_count(&self) -> usize {
        self.root.child_count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    Idle,
    Running,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed { version: u64, functions: usize },

    /// The progress sink asked to stop; the previous tree stays published
    Cancelled,
}

/// Tapset function parser
///
/// Owned by the caller; share it with `Arc` to run it in the background.
pub struct FunctionParser {
    tool: Box<dyn ExternalTool>,
    state: Mutex<ParserState>,
    tree: RwLock<Arc<TapsetTree>>,
    listeners: Mutex<Vec<Arc<dyn TreeListener>>>,
    version: AtomicU64,
}

impl FunctionParser {
    pub fn new(tool: Box<dyn ExternalTool>) -> Self {
        Self {
            tool,
            state: Mutex::new(ParserState::Idle),
            tree: RwLock::new(Arc::new(TapsetTree::empty())),
            listeners: Mutex::new(Vec::new()),
            version: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> ParserState {
        *self.state.lock()
    }

    /// Latest published tree, functions sorted by name
    pub fn functions(&self) -> Arc<TapsetTree> {
        self.tree.read().clone()
    }

    pub fn add_listener(&self, listener: Arc<dyn TreeListener>) {
        self.listeners.lock().push(listener);
    }

    /// Run the tool and rebuild the tree from scratch
    ///
    /// **Public** - main entry point of a parse run
    ///
    /// # Arguments
    /// * `progress` - receives line-granular progress and may cancel the run
    ///
    /// # Returns
    /// The new tree version and function count, or `Cancelled` with the
    /// previous tree still published
    ///
    /// # Errors
    /// * `TapsetError::AlreadyRunning` - another run has not finished yet
    pub fn run(&self, progress: &dyn ProgressSink) -> Result<RunOutcome, TapsetError> {
        let mut guard = {
            let mut state = self.state.lock();
            if *state == ParserState::Running {
                return Err(TapsetError::AlreadyRunning);
            }
            let previous = std::mem::replace(&mut *state, ParserState::Running);
            StateGuard {
                state: &self.state,
                restore: previous,
            }
        };

        let outcome = self.scan(progress);
        if let RunOutcome::Completed { .. } = outcome {
            guard.restore = ParserState::Done;
        }

        Ok(outcome)
    }

    /// Run on a background thread
    pub fn spawn(
        parser: &Arc<Self>,
        progress: Arc<dyn ProgressSink>,
    ) -> JoinHandle<Result<RunOutcome, TapsetError>> {
        let parser = Arc::clone(parser);
        std::thread::spawn(move || parser.run(progress.as_ref()))
    }

    /// Drop the published tree and all listeners
    pub fn dispose(&self) {
        *self.tree.write() = Arc::new(TapsetTree::empty());
        self.listeners.lock().clear();
    }

    fn scan(&self, progress: &dyn ProgressSink) -> RunOutcome {
        let args: Vec<String> = FUNCTION_PASS_ARGS.iter().map(|a| a.to_string()).collect();
        let output = self.tool.run(&args, FUNCTION_PROBE_SCRIPT);

        // the first line echoes the invocation
        let body = output.split_once('\n').map_or("", |(_, rest)| rest);
        let total_lines = body.lines().count();
        progress.begin(TASK_NAME, total_lines);

        let mut root = TreeNode::group("");
        let mut scanned = 0;

        for decl in Declarations::new(body) {
            if !step_lines(progress, &mut scanned, decl.end_line) {
                return cancelled(progress, scanned);
            }

            if let Some(node) = function_node(&decl) {
                root.add(node);
            }
        }
        if !step_lines(progress, &mut scanned, total_lines) {
            return cancelled(progress, scanned);
        }

        root.sort_children();
        let functions = root.child_count();
        let version = self.version.fetch_add(1, Ordering::SeqCst) + 1;
        let tree = Arc::new(TapsetTree {
            schema_version: TREE_SCHEMA_VERSION.to_string(),
            version,
            generated_at: Utc::now().to_rfc3339(),
            root,
        });

        *self.tree.write() = Arc::clone(&tree);
        info!("Published tapset tree v{} with {} functions", version, functions);

        // callbacks run without holding the listener lock
        let listeners = self.listeners.lock().clone();
        for listener in listeners {
            listener.on_update(&tree);
        }

        progress.done();
        RunOutcome::Completed { version, functions }
    }
}

fn cancelled(progress: &dyn ProgressSink, line: usize) -> RunOutcome {
    info!("{} cancelled at line {}", TASK_NAME, line);
    progress.done();
    RunOutcome::Cancelled
}

/// Puts the parser state back when a run ends, including by unwinding
///
/// **Private** - internal helper
struct StateGuard<'a> {
    state: &'a Mutex<ParserState>,
    restore: ParserState,
}

impl Drop for StateGuard<'_> {
    fn drop(&mut self) {
        *self.state.lock() = self.restore;
    }
}

/// Report lines up to `upto` one at a time, checking for cancellation
/// before each; returns `false` once cancelled
///
/// **Private** - internal helper
fn step_lines(progress: &dyn ProgressSink, scanned: &mut usize, upto: usize) -> bool {
    while *scanned < upto {
        if progress.is_cancelled() {
            return false;
        }
        progress.worked(1);
        *scanned += 1;
    }
    !progress.is_cancelled()
}

/// Leaf for a user-facing declaration; internal ones yield `None`
fn function_node(decl: &Declaration) -> Option<TreeNode> {
    if decl.name.starts_with('_') {
        debug!("Skipping internal function {}", decl.name);
        return None;
    }
    if is_all_caps(&decl.name) {
        debug!("Skipping macro-style function {}", decl.name);
        return None;
    }

    let mut node = TreeNode::function(&decl.name);
    for param in &decl.params {
        node.add(TreeNode::parameter(
            param,
            format!("{}{}", DEFINITION_PREFIX, param),
            &decl.name,
        ));
    }
    Some(node)
}

/// Names made only of `A-Z`, `_` and `1-9` are not end-user API
fn is_all_caps(name: &str) -> bool {
    name.chars()
        .all(|c| c.is_ascii_uppercase() || c == '_' || ('1'..='9').contains(&c))
}
