//! Random-access byte stream over a trace file.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

/// Read-only, seekable handle on a trace file
///
/// Integers are big-endian; strings are a `u16` byte length followed by UTF-8.
#[derive(Debug)]
pub struct TraceStream {
    inner: BufReader<File>,
}

impl TraceStream {
    /// Open a trace file read-only
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            inner: BufReader::new(file),
        })
    }

    /// Current byte offset
    pub fn position(&mut self) -> io::Result<u64> {
        self.inner.stream_position()
    }

    /// Move to an absolute byte offset
    pub fn seek_to(&mut self, offset: u64) -> io::Result<u64> {
        self.inner.seek(SeekFrom::Start(offset))
    }

    /// Total length of the backing file
    pub fn length(&self) -> io::Result<u64> {
        Ok(self.inner.get_ref().metadata()?.len())
    }

    pub fn read_i64(&mut self) -> io::Result<i64> {
        let mut buf = [0u8; 8];
        self.inner.read_exact(&mut buf)?;
        Ok(i64::from_be_bytes(buf))
    }

    pub fn read_i32(&mut self) -> io::Result<i32> {
        let mut buf = [0u8; 4];
        self.inner.read_exact(&mut buf)?;
        Ok(i32::from_be_bytes(buf))
    }

    pub fn read_u16(&mut self) -> io::Result<u16> {
        let mut buf = [0u8; 2];
        self.inner.read_exact(&mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Read a length-prefixed UTF-8 string
    pub fn read_string(&mut self) -> io::Result<String> {
        let len = self.read_u16()? as usize;
        let mut bytes = vec![0u8; len];
        self.inner.read_exact(&mut bytes)?;
        String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_reads_big_endian_values() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&7i64.to_be_bytes()).unwrap();
        file.write_all(&(-2i32).to_be_bytes()).unwrap();
        file.write_all(&3u16.to_be_bytes()).unwrap();
        file.write_all(b"abc").unwrap();
        file.flush().unwrap();

        let mut stream = TraceStream::open(file.path()).unwrap();
        assert_eq!(stream.read_i64().unwrap(), 7);
        assert_eq!(stream.read_i32().unwrap(), -2);
        assert_eq!(stream.read_string().unwrap(), "abc");
        assert_eq!(stream.position().unwrap(), 17);
        assert_eq!(stream.length().unwrap(), 17);
    }

    #[test]
    fn test_position_follows_seek() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0u8; 32]).unwrap();
        file.flush().unwrap();

        let mut stream = TraceStream::open(file.path()).unwrap();
        stream.read_i64().unwrap();
        assert_eq!(stream.seek_to(20).unwrap(), 20);
        assert_eq!(stream.position().unwrap(), 20);
    }

    #[test]
    fn test_invalid_utf8_is_invalid_data() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&2u16.to_be_bytes()).unwrap();
        file.write_all(&[0xff, 0xfe]).unwrap();
        file.flush().unwrap();

        let mut stream = TraceStream::open(file.path()).unwrap();
        let err = stream.read_string().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
