//! Functions and probe command implementations.

use crate::commands::models::{FunctionsArgs, ProbeArgs};
use crate::output::write_tree;
use crate::tapset::{
    ExternalTool, FunctionParser, LogProgress, ProbeNode, RunOutcome, StapCommand, TapsetTree,
    TreeListener,
};
use anyhow::{Context, Result};
use log::{info, warn};
use std::sync::Arc;

/// Logs every published tree
struct LogListener;

impl TreeListener for LogListener {
    fn on_update(&self, tree: &TapsetTree) {
        info!(
            "Tapset tree v{} ready: {} functions",
            tree.version,
            tree.function_count()
        );
    }
}

/// Execute the functions command against `stap`
///
/// **Public** - main entry point called from main.rs
pub fn execute_functions(args: &FunctionsArgs) -> Result<Arc<TapsetTree>> {
    let tool = StapCommand::new(args.config.clone());
    execute_functions_with(args, Box::new(tool))
}

/// Execute the functions command with any tool
///
/// The parse runs on a background thread; this call waits for it.
pub fn execute_functions_with(
    args: &FunctionsArgs,
    tool: Box<dyn ExternalTool>,
) -> Result<Arc<TapsetTree>> {
    let parser = Arc::new(FunctionParser::new(tool));
    parser.add_listener(Arc::new(LogListener));

    let handle = FunctionParser::spawn(&parser, Arc::new(LogProgress::new()));
    let outcome = handle
        .join()
        .map_err(|_| anyhow::anyhow!("Tapset parser thread panicked"))?
        .context("Tapset parse failed")?;

    if outcome == RunOutcome::Cancelled {
        warn!("Tapset parse was cancelled");
    }

    let tree = parser.functions();

    if let Some(path) = &args.output {
        write_tree(&tree, path).context("Failed to write tree JSON")?;
        info!("✓ Tree written to: {}", path.display());
    }

    if args.print_tree {
        for function in &tree.root.children {
            let params: Vec<&str> = function.children.iter().map(|p| p.label.as_str()).collect();
            println!("{}({})", function.label, params.join(", "));
        }
    }

    Ok(tree)
}

/// Execute the probe command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// The probe and, when a search file was given, the matching line numbers
pub fn execute_probe(args: &ProbeArgs) -> Result<(ProbeNode, Vec<usize>)> {
    let probe = ProbeNode::from_line(&args.line);
    if probe.name().is_empty() {
        anyhow::bail!("Probe line does not contain a name");
    }

    println!("Probe:   {}", probe.name());
    println!("Pattern: {}", probe);

    let mut lines = Vec::new();
    if let Some(path) = &args.search {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        lines = probe.find_definitions(&text)?;

        if lines.is_empty() {
            println!("No definition found in {}", path.display());
        }
        for line in &lines {
            println!("{}:{}", path.display(), line);
        }
    }

    Ok((probe, lines))
}
