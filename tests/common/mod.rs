// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recording resources for integration tests.
//!
//! Each resource shares a close counter with the test so the test can check how
//! often the translator released it after the translator itself is gone.

use std::cell::{Cell, RefCell};
use std::io::{self, Read, Write};
use std::rc::Rc;
use yaml_translator::ports::Release;

/// An input over in-memory text that counts `close` calls.
#[allow(dead_code)]
pub struct RecordingSource {
    data: io::Cursor<Vec<u8>>,
    closes: Rc<Cell<usize>>,
    fail_read: bool,
    fail_close: bool,
}

#[allow(dead_code)]
impl RecordingSource {
    pub fn new(text: &str) -> (Self, Rc<Cell<usize>>) {
        Self::from_bytes(text.as_bytes().to_vec())
    }

    pub fn from_bytes(bytes: Vec<u8>) -> (Self, Rc<Cell<usize>>) {
        let closes = Rc::new(Cell::new(0));
        let source = Self {
            data: io::Cursor::new(bytes),
            closes: Rc::clone(&closes),
            fail_read: false,
            fail_close: false,
        };
        (source, closes)
    }

    pub fn failing_read(mut self) -> Self {
        self.fail_read = true;
        self
    }

    pub fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }
}

impl Read for RecordingSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.fail_read {
            return Err(io::Error::new(io::ErrorKind::ConnectionReset, "input went away"));
        }
        self.data.read(buf)
    }
}

impl Release for RecordingSource {
    fn close(&mut self) -> io::Result<()> {
        self.closes.set(self.closes.get() + 1);
        if self.fail_close {
            return Err(io::Error::new(io::ErrorKind::Other, "close refused"));
        }
        Ok(())
    }
}

/// An output into a shared buffer that counts `close` calls.
#[allow(dead_code)]
pub struct RecordingSink {
    written: Rc<RefCell<Vec<u8>>>,
    closes: Rc<Cell<usize>>,
    fail_write: bool,
    fail_close: bool,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> (Self, Rc<RefCell<Vec<u8>>>, Rc<Cell<usize>>) {
        let written = Rc::new(RefCell::new(Vec::new()));
        let closes = Rc::new(Cell::new(0));
        let sink = Self {
            written: Rc::clone(&written),
            closes: Rc::clone(&closes),
            fail_write: false,
            fail_close: false,
        };
        (sink, written, closes)
    }

    pub fn failing_write(mut self) -> Self {
        self.fail_write = true;
        self
    }

    pub fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }
}

impl Write for RecordingSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.fail_write {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "output went away"));
        }
        self.written.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Release for RecordingSink {
    fn close(&mut self) -> io::Result<()> {
        self.closes.set(self.closes.get() + 1);
        if self.fail_close {
            return Err(io::Error::new(io::ErrorKind::Other, "close refused"));
        }
        Ok(())
    }
}

/// The text written to a recording sink.
#[allow(dead_code)]
pub fn written_text(written: &Rc<RefCell<Vec<u8>>>) -> String {
    String::from_utf8_lossy(&written.borrow()).into_owned()
}
