// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resource trait definitions.
//!
//! A translator is bound to exactly one resource: an input it reads YAML text from,
//! or an output it writes YAML text to. Rust's `Read` and `Write` have no notion of
//! closing, so these ports add an explicit, fallible `close` that the translator calls
//! exactly once after its operation finishes.

use std::io::{self, Read, Write};

/// A resource that can be released.
///
/// # Examples
///
/// ```rust
/// use yaml_translator::ports::{InputSource, Release};
/// use std::io::{self, Read};
///
/// struct Stdin;
///
/// impl Read for Stdin {
///     fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
///         io::stdin().read(buf)
///     }
/// }
///
/// impl Release for Stdin {
///     fn close(&mut self) -> io::Result<()> {
///         Ok(())
///     }
/// }
///
/// fn accepts(_input: impl InputSource) {}
/// accepts(Stdin);
/// ```
pub trait Release {
    /// Releases the underlying resource.
    ///
    /// The translator calls this exactly once, after its operation has finished,
    /// whether the operation succeeded or not. An error here is reported as a
    /// warning and does not change the outcome of the operation.
    fn close(&mut self) -> io::Result<()>;
}

/// A readable resource a translator can parse from.
///
/// Implemented for every type that is both `Read` and `Release`.
pub trait InputSource: Read + Release {}

impl<T: Read + Release> InputSource for T {}

/// A writable resource a translator can dump to.
///
/// Implemented for every type that is both `Write` and `Release`.
pub trait OutputSink: Write + Release {}

impl<T: Write + Release> OutputSink for T {}
