//! Read and index command implementations.
//!
//! The read command:
//! 1. Opens the trace
//! 2. Positions a context (offset, ratio, rank or timestamp)
//! 3. Reads events forward
//! 4. Writes them as JSON

use crate::commands::models::{IndexArgs, ReadArgs, StartPosition};
use crate::output::write_json;
use crate::trace::{TraceContext, TraceEvent, TraceIndex, TraceLocation, TraceReader};
use anyhow::{Context, Result};
use log::{debug, info};
use std::time::Instant;

/// Upper bound on events returned by a single read
pub const MAX_READ_COUNT: usize = 1_000_000;

/// Execute the read command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// The events read, in trace order
///
/// # Errors
/// * Missing or unreadable trace file
/// * Unseekable start position
/// * File write errors
pub fn execute_read(args: &ReadArgs) -> Result<Vec<TraceEvent>> {
    let start_time = Instant::now();

    let reader = TraceReader::open(&args.trace)
        .with_context(|| format!("Failed to open trace {}", args.trace.display()))?;

    let mut context = start_context(&reader, args)?;
    info!(
        "Reading from {} (rank {}, {:.1}% into the trace)",
        context.location,
        context.rank,
        reader.location_ratio(&context.location) * 100.0
    );

    let mut events = Vec::with_capacity(args.count.min(1024));
    while events.len() < args.count {
        match reader.next_event(&mut context) {
            Some(event) => events.push(event),
            None => break,
        }
    }
    reader.dispose();

    debug!("Read {} events", events.len());

    match &args.output {
        Some(path) => {
            write_json(&events, path).context("Failed to write events JSON")?;
            info!("✓ Events written to: {}", path.display());
        }
        None => {
            for event in &events {
                println!("{}", serde_json::to_string(event)?);
            }
        }
    }

    info!("Read completed in {:.2}s", start_time.elapsed().as_secs_f64());
    Ok(events)
}

/// Position a context according to the requested start
///
/// **Private** - internal helper for execute_read
fn start_context(reader: &TraceReader, args: &ReadArgs) -> Result<TraceContext> {
    let context = match args.start {
        StartPosition::Beginning => reader.seek_location(None),
        StartPosition::Offset(offset) => reader.seek_location(Some(&TraceLocation::offset(offset))),
        StartPosition::Ratio(ratio) => reader.seek_ratio(ratio),
        StartPosition::Rank(rank) => {
            TraceIndex::build(reader, args.page_size).seek_rank(reader, rank)
        }
        StartPosition::Timestamp(ts) => {
            TraceIndex::build(reader, args.page_size).seek_timestamp(reader, ts)
        }
    };

    context.with_context(|| format!("Cannot position trace at {:?}", args.start))
}

/// Execute the index command
///
/// **Public** - main entry point called from main.rs
pub fn execute_index(args: &IndexArgs) -> Result<TraceIndex> {
    let reader = TraceReader::open(&args.trace)
        .with_context(|| format!("Failed to open trace {}", args.trace.display()))?;

    let index = TraceIndex::build(&reader, args.page_size);
    reader.dispose();

    match &args.output {
        Some(path) => {
            write_json(&index, path).context("Failed to write index JSON")?;
            info!("✓ Index written to: {}", path.display());
        }
        None => {
            println!("Events:      {}", index.event_count);
            println!("Checkpoints: {}", index.checkpoints.len());
            if let Some((start, end)) = index.time_range {
                println!("Time range:  {} .. {}", start, end);
            }
        }
    }

    Ok(index)
}

/// Validate read arguments
///
/// **Public** - can be called before execute_read for early validation
pub fn validate_read_args(args: &ReadArgs) -> Result<()> {
    if args.trace.as_os_str().is_empty() {
        anyhow::bail!("Trace path cannot be empty");
    }

    if args.count == 0 {
        anyhow::bail!("count must be greater than 0");
    }

    if args.count > MAX_READ_COUNT {
        anyhow::bail!("count is too large (max {})", MAX_READ_COUNT);
    }

    if args.page_size == 0 {
        anyhow::bail!("page_size must be greater than 0");
    }

    if let StartPosition::Ratio(ratio) = args.start {
        if !(0.0..=1.0).contains(&ratio) {
            anyhow::bail!("ratio must be between 0.0 and 1.0");
        }
    }

    Ok(())
}
