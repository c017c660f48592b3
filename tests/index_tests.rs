use std::io::Write;
use tempfile::NamedTempFile;
use tracetap::parser::{encode_event, EventRecord};
use tracetap::trace::{Rank, TraceIndex, TraceLocation, TraceReader};

fn write_trace(timestamps: &[i64]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for (i, ts) in timestamps.iter().enumerate() {
        let record = EventRecord::new(*ts, "cpu0", "Type-0", 0).with_field(i.to_string());
        encode_event(&mut file, &record).unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn test_checkpoints_every_page() {
    let timestamps: Vec<i64> = (0..10).map(|i| i * 10).collect();
    let file = write_trace(&timestamps);
    let reader = TraceReader::open(file.path()).unwrap();

    let index = TraceIndex::build(&reader, 3);

    assert_eq!(index.event_count, 10);
    assert_eq!(index.time_range, Some((0, 90)));
    let ranks: Vec<u64> = index.checkpoints.iter().map(|c| c.rank).collect();
    assert_eq!(ranks, vec![0, 3, 6, 9]);
    assert_eq!(index.checkpoints[0].location, TraceLocation::offset(0));
    assert_eq!(index.checkpoints[2].timestamp, 60);
}

#[test]
fn test_seek_rank_reaches_every_event() {
    let timestamps: Vec<i64> = (0..25).map(|i| i * 10).collect();
    let file = write_trace(&timestamps);
    let reader = TraceReader::open(file.path()).unwrap();
    let index = TraceIndex::build(&reader, 4);

    for rank in 0..25u64 {
        let context = index.seek_rank(&reader, rank).unwrap();
        assert_eq!(context.rank, Rank::Known(rank));

        let event = reader.parse_event(&context).unwrap();
        assert_eq!(event.fields, vec![rank.to_string()]);
    }

    assert!(index.seek_rank(&reader, 25).is_none());
}

#[test]
fn test_seek_timestamp() {
    let file = write_trace(&[0, 10, 10, 10, 20, 35, 50]);
    let reader = TraceReader::open(file.path()).unwrap();
    let index = TraceIndex::build(&reader, 2);

    let at = |ts| {
        let context = index.seek_timestamp(&reader, ts).unwrap();
        reader.parse_event(&context).unwrap().fields[0].clone()
    };

    assert_eq!(at(-5), "0");
    assert_eq!(at(10), "1");
    assert_eq!(at(11), "4");
    assert_eq!(at(35), "5");
    assert_eq!(at(50), "6");
    assert!(index.seek_timestamp(&reader, 51).is_none());
}

#[test]
fn test_empty_trace_index() {
    let file = write_trace(&[]);
    let reader = TraceReader::open(file.path()).unwrap();

    let index = TraceIndex::build_default(&reader);

    assert_eq!(index.event_count, 0);
    assert!(index.checkpoints.is_empty());
    assert_eq!(index.time_range, None);
    assert!(index.seek_rank(&reader, 0).is_none());
    assert!(index.seek_timestamp(&reader, 0).is_none());
}

#[test]
fn test_zero_page_size_treated_as_one() {
    let file = write_trace(&[1, 2, 3]);
    let reader = TraceReader::open(file.path()).unwrap();

    let index = TraceIndex::build(&reader, 0);

    assert_eq!(index.page_size, 1);
    assert_eq!(index.checkpoints.len(), 3);
}
