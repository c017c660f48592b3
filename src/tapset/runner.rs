//! Launching the SystemTap front end and capturing its output.

use crate::utils::config::TapsetConfig;
use log::{debug, warn};
use std::process::Command;

/// Process invocation collaborator
///
/// Returns the full captured text. Failures are logged and reported as
/// empty or partial output, never as an error.
pub trait ExternalTool: Send + Sync {
    fn run(&self, args: &[String], script: &str) -> String;
}

/// Runs `stap` with the configured tapset directories
#[derive(Debug, Clone, Default)]
pub struct StapCommand {
    config: TapsetConfig,
}

impl StapCommand {
    pub fn new(config: TapsetConfig) -> Self {
        Self { config }
    }

    /// Full argument vector: `-I <dir>` per tapset directory, `args`, then the script
    pub fn command_args(&self, args: &[String], script: &str) -> Vec<String> {
        let mut full = Vec::with_capacity(self.config.tapsets.len() * 2 + args.len() + 1);
        for dir in &self.config.tapsets {
            full.push("-I".to_string());
            full.push(dir.display().to_string());
        }
        full.extend(args.iter().cloned());
        full.push(script.to_string());
        full
    }
}

impl ExternalTool for StapCommand {
    /// The first output line echoes the invocation; stdout then stderr follow
    fn run(&self, args: &[String], script: &str) -> String {
        let full_args = self.command_args(args, script);
        let echo = format!("{} {}", self.config.program.display(), full_args.join(" "));
        debug!("Running: {}", echo);

        let output = match Command::new(&self.config.program).args(&full_args).output() {
            Ok(output) => output,
            Err(e) => {
                warn!("Failed to launch {}: {}", self.config.program.display(), e);
                return echo;
            }
        };

        if !output.status.success() {
            warn!(
                "{} exited with {}; using partial output",
                self.config.program.display(),
                output.status
            );
        }

        let mut text = echo;
        text.push('\n');
        text.push_str(&String::from_utf8_lossy(&output.stdout));
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        text
    }
}
