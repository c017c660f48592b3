use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;
use tracetap::commands::{
    execute_functions_with, execute_index, execute_probe, execute_read, validate_read_args,
    FunctionsArgs, IndexArgs, ProbeArgs, ReadArgs, StartPosition,
};
use tracetap::output::read_tree;
use tracetap::parser::{encode_event, EventRecord};
use tracetap::tapset::ExternalTool;
use tracetap::trace::{Rank, TraceEvent};

fn write_trace(count: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for i in 0..count {
        let record = EventRecord::new(i as i64 * 100, "cpu1", "Type-1", 1)
            .with_field(format!("payload-{}", i));
        encode_event(&mut file, &record).unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn test_validate_read_args_valid() {
    let args = ReadArgs {
        trace: PathBuf::from("events.trace"),
        ..Default::default()
    };

    assert!(validate_read_args(&args).is_ok());
}

#[test]
fn test_validate_read_args_empty_trace() {
    let args = ReadArgs::default();
    assert!(validate_read_args(&args).is_err());
}

#[test]
fn test_validate_read_args_count_zero() {
    let args = ReadArgs {
        trace: PathBuf::from("events.trace"),
        count: 0,
        ..Default::default()
    };

    assert!(validate_read_args(&args).is_err());
}

#[test]
fn test_validate_read_args_count_too_large() {
    let args = ReadArgs {
        trace: PathBuf::from("events.trace"),
        count: 2_000_000,
        ..Default::default()
    };

    assert!(validate_read_args(&args).is_err());
}

#[test]
fn test_validate_read_args_ratio_out_of_range() {
    let args = ReadArgs {
        trace: PathBuf::from("events.trace"),
        start: StartPosition::Ratio(1.5),
        ..Default::default()
    };

    assert!(validate_read_args(&args).is_err());
}

#[test]
fn test_validate_read_args_page_size_zero() {
    let args = ReadArgs {
        trace: PathBuf::from("events.trace"),
        page_size: 0,
        ..Default::default()
    };

    assert!(validate_read_args(&args).is_err());
}

#[test]
fn test_execute_read_from_rank_to_file() {
    let trace = write_trace(12);
    let out_dir = tempfile::tempdir().unwrap();
    let output = out_dir.path().join("events.json");

    let args = ReadArgs {
        trace: trace.path().to_path_buf(),
        start: StartPosition::Rank(5),
        count: 3,
        page_size: 4,
        output: Some(output.clone()),
    };

    let events = execute_read(&args).unwrap();
    let ranks: Vec<Rank> = events.iter().map(|e| e.rank).collect();
    assert_eq!(ranks, vec![Rank::Known(5), Rank::Known(6), Rank::Known(7)]);

    let written: Vec<TraceEvent> =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written, events);
}

#[test]
fn test_execute_read_stops_at_end() {
    let trace = write_trace(3);
    let args = ReadArgs {
        trace: trace.path().to_path_buf(),
        start: StartPosition::Timestamp(150),
        count: 10,
        ..Default::default()
    };

    let events = execute_read(&args).unwrap();
    let timestamps: Vec<i64> = events.iter().map(|e| e.timestamp).collect();
    assert_eq!(timestamps, vec![200]);
}

#[test]
fn test_execute_read_missing_trace() {
    let args = ReadArgs {
        trace: PathBuf::from("/nonexistent/events.trace"),
        ..Default::default()
    };

    assert!(execute_read(&args).is_err());
}

#[test]
fn test_execute_read_past_rank_fails() {
    let trace = write_trace(2);
    let args = ReadArgs {
        trace: trace.path().to_path_buf(),
        start: StartPosition::Rank(2),
        ..Default::default()
    };

    assert!(execute_read(&args).is_err());
}

#[test]
fn test_execute_index() {
    let trace = write_trace(7);
    let args = IndexArgs {
        trace: trace.path().to_path_buf(),
        page_size: 2,
        output: None,
    };

    let index = execute_index(&args).unwrap();
    assert_eq!(index.event_count, 7);
    assert_eq!(index.checkpoints.len(), 4);
    assert_eq!(index.time_range, Some((0, 600)));
}

struct FixedTool(&'static str);

impl ExternalTool for FixedTool {
    fn run(&self, _args: &[String], _script: &str) -> String {
        self.0.to_string()
    }
}

#[test]
fn test_execute_functions_writes_tree() {
    let out_dir = tempfile::tempdir().unwrap();
    let output = out_dir.path().join("tree.json");
    let args = FunctionsArgs {
        output: Some(output.clone()),
        ..Default::default()
    };

    let tree = execute_functions_with(
        &args,
        Box::new(FixedTool("echo\nfunction b (x)\nfunction a ()\n")),
    )
    .unwrap();

    assert_eq!(tree.function_count(), 2);
    assert_eq!(read_tree(&output).unwrap(), *tree);
}

#[test]
fn test_execute_probe_searches_file() {
    let mut source = NamedTempFile::new().unwrap();
    writeln!(source, "// tapset").unwrap();
    writeln!(source, "probe vm.pagefault = kernel.function(\"handle_mm_fault\")").unwrap();
    writeln!(source, "{{").unwrap();
    writeln!(source, "}}").unwrap();
    source.flush().unwrap();

    let args = ProbeArgs {
        line: "vm.pagefault name:string address:long".to_string(),
        search: Some(source.path().to_path_buf()),
    };

    let (probe, lines) = execute_probe(&args).unwrap();
    assert_eq!(probe.name(), "vm.pagefault");
    assert_eq!(lines, vec![2]);
}

#[test]
fn test_execute_probe_empty_line() {
    let args = ProbeArgs {
        line: "   ".to_string(),
        search: None,
    };

    assert!(execute_probe(&args).is_err());
}
