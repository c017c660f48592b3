//! Binary record encoding, the inverse of [`RecordParser`](super::RecordParser).
//!
//! Record layout (all integers big-endian):
//! `timestamp:i64 | source:str | event_type:str | reference:i32 | count:u16 | fields:str*`
//! where `str` is a `u16` byte length followed by UTF-8 bytes.

use std::io::{self, Write};

/// Field values of one record to encode
#[derive(Debug, Clone, Default)]
pub struct EventRecord {
    pub timestamp: i64,
    pub source: String,
    pub event_type: String,
    pub reference: i32,
    pub fields: Vec<String>,
}

impl EventRecord {
    pub fn new(timestamp: i64, source: &str, event_type: &str, reference: i32) -> Self {
        Self {
            timestamp,
            source: source.to_string(),
            event_type: event_type.to_string(),
            reference,
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, value: impl Into<String>) -> Self {
        self.fields.push(value.into());
        self
    }
}

/// Append one encoded record to `out`, returning the number of bytes written
pub fn encode_event(out: &mut impl Write, record: &EventRecord) -> io::Result<usize> {
    let field_count = u16::try_from(record.fields.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "too many fields"))?;

    let mut written = 0;
    out.write_all(&record.timestamp.to_be_bytes())?;
    written += 8;
    written += write_string(out, &record.source)?;
    written += write_string(out, &record.event_type)?;
    out.write_all(&record.reference.to_be_bytes())?;
    written += 4;
    out.write_all(&field_count.to_be_bytes())?;
    written += 2;
    for field in &record.fields {
        written += write_string(out, field)?;
    }

    Ok(written)
}

fn write_string(out: &mut impl Write, value: &str) -> io::Result<usize> {
    let len = u16::try_from(value.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "string too long"))?;
    out.write_all(&len.to_be_bytes())?;
    out.write_all(value.as_bytes())?;
    Ok(2 + value.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoded_size() {
        let record = EventRecord::new(1, "src", "Type-1", 0).with_field("x");
        let mut buf = Vec::new();
        let n = encode_event(&mut buf, &record).unwrap();

        // 8 + (2+3) + (2+6) + 4 + 2 + (2+1)
        assert_eq!(n, 30);
        assert_eq!(buf.len(), n);
    }

    #[test]
    fn test_oversized_string_rejected() {
        let record = EventRecord::new(1, &"s".repeat(70_000), "T", 0);
        let err = encode_event(&mut Vec::new(), &record).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
