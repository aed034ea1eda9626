//! Input byte streams feeding the decoders.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

/// A source of bytes with explicit lifecycle hooks.
///
/// Decoders drive streams through `start`, a series of exact reads, and
/// `stop`. Reads either fill the whole slice or fail; a short read at end
/// of stream surfaces as `UnexpectedEof`, which decoders turn into their
/// own truncation errors.
pub trait InputStream {
    fn start(&mut self) -> io::Result<()>;

    fn stop(&mut self) -> io::Result<()>;

    /// Fill `buf` completely from the stream.
    fn read_exact_bytes(&mut self, buf: &mut [u8]) -> io::Result<()>;
}

/// Stream backed by a buffered file. The file opens at `start`.
pub struct FileStream {
    path: PathBuf,
    reader: Option<BufReader<File>>,
}

impl FileStream {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            reader: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl InputStream for FileStream {
    fn start(&mut self) -> io::Result<()> {
        self.reader = Some(BufReader::new(File::open(&self.path)?));
        Ok(())
    }

    fn stop(&mut self) -> io::Result<()> {
        self.reader = None;
        Ok(())
    }

    fn read_exact_bytes(&mut self, buf: &mut [u8]) -> io::Result<()> {
        match self.reader.as_mut() {
            Some(reader) => reader.read_exact(buf),
            None => Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "stream not started",
            )),
        }
    }
}

/// Stream over an in-memory byte vector.
pub struct MemoryStream {
    data: Vec<u8>,
    position: usize,
}

impl MemoryStream {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data, position: 0 }
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

impl InputStream for MemoryStream {
    fn start(&mut self) -> io::Result<()> {
        self.position = 0;
        Ok(())
    }

    fn stop(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn read_exact_bytes(&mut self, buf: &mut [u8]) -> io::Result<()> {
        let remaining = self.data.len() - self.position;
        if buf.len() > remaining {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "memory stream exhausted",
            ));
        }
        buf.copy_from_slice(&self.data[self.position..self.position + buf.len()]);
        self.position += buf.len();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_stream_reads_in_order() {
        let mut stream = MemoryStream::new(vec![1, 2, 3, 4, 5]);
        stream.start().unwrap();

        let mut first = [0u8; 2];
        let mut second = [0u8; 3];
        stream.read_exact_bytes(&mut first).unwrap();
        stream.read_exact_bytes(&mut second).unwrap();

        assert_eq!(first, [1, 2]);
        assert_eq!(second, [3, 4, 5]);
        assert_eq!(stream.position(), 5);
    }

    #[test]
    fn memory_stream_reports_exhaustion() {
        let mut stream = MemoryStream::new(vec![1, 2]);
        stream.start().unwrap();

        let mut buf = [0u8; 3];
        let err = stream.read_exact_bytes(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn restart_rewinds_a_memory_stream() {
        let mut stream = MemoryStream::new(vec![7, 8]);
        stream.start().unwrap();
        let mut buf = [0u8; 2];
        stream.read_exact_bytes(&mut buf).unwrap();

        stream.start().unwrap();
        stream.read_exact_bytes(&mut buf).unwrap();
        assert_eq!(buf, [7, 8]);
    }

    #[test]
    fn file_stream_requires_start() {
        let mut stream = FileStream::new("/nonexistent/audio.wav");
        let mut buf = [0u8; 1];
        assert!(stream.read_exact_bytes(&mut buf).is_err());
        assert!(stream.start().is_err(), "missing file must fail to open");
    }
}
