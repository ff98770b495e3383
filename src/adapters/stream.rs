// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resource adapters over plain readers, writers and files.
//!
//! These wrap any `Read` or `Write` so it can be bound to a translator. Closing drops
//! the wrapped value (flushing writers first); any use after that fails.

use crate::ports::Release;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

fn closed_error() -> io::Error {
    io::Error::new(io::ErrorKind::Other, "resource has been closed")
}

/// An input source over any reader.
///
/// # Examples
///
/// ```rust
/// use yaml_translator::adapters::ReaderSource;
/// use yaml_translator::service::YamlTranslator;
///
/// let source = ReaderSource::new("name: demo\n".as_bytes());
/// let mut translator = YamlTranslator::reader("inline", source, true);
/// let root = translator.parse().unwrap();
/// assert_eq!(root.get("name").and_then(|n| n.as_str()), Some("demo"));
/// ```
#[derive(Debug)]
pub struct ReaderSource<R> {
    inner: Option<R>,
}

impl<R: Read> ReaderSource<R> {
    /// Wraps a reader.
    pub fn new(reader: R) -> Self {
        Self {
            inner: Some(reader),
        }
    }

    /// Returns true once the source has been closed.
    pub fn is_closed(&self) -> bool {
        self.inner.is_none()
    }
}

impl ReaderSource<BufReader<File>> {
    /// Opens a file for reading.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: Read> Read for ReaderSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.inner.as_mut() {
            Some(reader) => reader.read(buf),
            None => Err(closed_error()),
        }
    }
}

impl<R: Read> Release for ReaderSource<R> {
    fn close(&mut self) -> io::Result<()> {
        self.inner.take();
        Ok(())
    }
}

/// An output sink over any writer.
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    inner: Option<W>,
}

impl<W: Write> WriterSink<W> {
    /// Wraps a writer.
    pub fn new(writer: W) -> Self {
        Self {
            inner: Some(writer),
        }
    }

    /// Returns true once the sink has been closed.
    pub fn is_closed(&self) -> bool {
        self.inner.is_none()
    }
}

impl WriterSink<BufWriter<File>> {
    /// Creates or truncates a file for writing.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> Write for WriterSink<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.inner.as_mut() {
            Some(writer) => writer.write(buf),
            None => Err(closed_error()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.inner.as_mut() {
            Some(writer) => writer.flush(),
            None => Err(closed_error()),
        }
    }
}

impl<W: Write> Release for WriterSink<W> {
    fn close(&mut self) -> io::Result<()> {
        match self.inner.take() {
            Some(mut writer) => writer.flush(),
            None => Ok(()),
        }
    }
}
