//! tracetap CLI
//!
//! Reads events from binary traces by offset, ratio, rank or timestamp,
//! and lists the functions defined in SystemTap tapsets.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use tracetap::commands::{
    display_version, execute_functions, execute_index, execute_probe, execute_read,
    validate_read_args, validate_tree_file, FunctionsArgs, IndexArgs, ProbeArgs, ReadArgs,
    StartPosition,
};
use tracetap::utils::config::{
    TapsetConfig, DEFAULT_INDEX_PAGE_SIZE, STAP_ENV, STAP_PROGRAM, TAPSETS_ENV,
};

/// tracetap - trace access and tapset parsing
#[derive(Parser, Debug)]
#[command(name = "tracetap")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Read events from a trace
    Read {
        /// Trace file
        #[arg(short, long)]
        trace: PathBuf,

        /// Start at this byte offset
        #[arg(long, conflicts_with_all = ["ratio", "rank", "timestamp"])]
        offset: Option<u64>,

        /// Start at this fraction of the trace (0.0 to 1.0)
        #[arg(long, conflicts_with_all = ["rank", "timestamp"])]
        ratio: Option<f64>,

        /// Start at the event with this rank
        #[arg(long, conflicts_with = "timestamp")]
        rank: Option<u64>,

        /// Start at the first event at or after this timestamp
        #[arg(long)]
        timestamp: Option<i64>,

        /// Number of events to read
        #[arg(short, long, default_value = "10")]
        count: usize,

        /// Events between index checkpoints
        #[arg(long, default_value_t = DEFAULT_INDEX_PAGE_SIZE)]
        page_size: usize,

        /// Write events to a JSON file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build the checkpoint index of a trace
    Index {
        /// Trace file
        #[arg(short, long)]
        trace: PathBuf,

        /// Events between index checkpoints
        #[arg(long, default_value_t = DEFAULT_INDEX_PAGE_SIZE)]
        page_size: usize,

        /// Write the index to a JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List tapset functions by running the SystemTap front end
    Functions {
        /// SystemTap executable
        #[arg(long, env = STAP_ENV, default_value = STAP_PROGRAM)]
        stap: PathBuf,

        /// Extra tapset directories, separated like PATH
        #[arg(long, env = TAPSETS_ENV)]
        tapsets: Option<String>,

        /// Write the tree to a JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Do not print the function list
        #[arg(short, long)]
        quiet: bool,
    },

    /// Extract a probe name and its definition search pattern
    Probe {
        /// A line of `stap -L` output
        line: String,

        /// Tapset source file to search for the definition
        #[arg(short, long)]
        search: Option<PathBuf>,
    },

    /// Validate a tree JSON file
    Validate {
        /// Path to tree JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Read {
            trace,
            offset,
            ratio,
            rank,
            timestamp,
            count,
            page_size,
            output,
        } => {
            let start = match (offset, ratio, rank, timestamp) {
                (Some(o), _, _, _) => StartPosition::Offset(o),
                (_, Some(r), _, _) => StartPosition::Ratio(r),
                (_, _, Some(n), _) => StartPosition::Rank(n),
                (_, _, _, Some(ts)) => StartPosition::Timestamp(ts),
                _ => StartPosition::Beginning,
            };

            let args = ReadArgs {
                trace,
                start,
                count,
                page_size,
                output,
            };

            // Validate args first
            validate_read_args(&args)?;

            execute_read(&args)?;
        }

        Commands::Index {
            trace,
            page_size,
            output,
        } => {
            execute_index(&IndexArgs {
                trace,
                page_size,
                output,
            })?;
        }

        Commands::Functions {
            stap,
            tapsets,
            output,
            quiet,
        } => {
            let args = FunctionsArgs {
                config: TapsetConfig::from_path_list(stap, tapsets.as_deref()),
                output,
                print_tree: !quiet,
            };
            execute_functions(&args)?;
        }

        Commands::Probe { line, search } => {
            execute_probe(&ProbeArgs { line, search })?;
        }

        Commands::Validate { file } => {
            validate_tree_file(file)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
