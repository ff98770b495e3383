// SPDX-License-Identifier: MIT OR Apache-2.0

//! The translator façade.
//!
//! A [`YamlTranslator`] is bound to exactly one resource in one direction and runs
//! exactly one operation on it. Whatever the outcome, the resource is closed exactly
//! once before the operation returns; a translator that is dropped without being used
//! closes its resource on drop.

use crate::adapters::{error_translation, to_node, ReaderSource, WriterSink, YamlEmitter, YamlParser};
use crate::domain::{
    Direction, Mapping, Position, ResourceReleaseWarning, Result, TranslatorOptions, YamlError,
};
use crate::ports::{DocumentEmitter, DocumentParser, InputSource, OutputSink, Release};
use serde::Serialize;
use std::io::{self, Read};

enum State<'r> {
    Reading(Box<dyn InputSource + 'r>),
    Writing(Box<dyn OutputSink + 'r>),
    Released(Direction),
}

/// A single-use YAML translator bound to one input or one output.
///
/// # Examples
///
/// ```rust
/// use yaml_translator::adapters::{ReaderSource, WriterSink};
/// use yaml_translator::service::YamlTranslator;
///
/// # fn main() -> yaml_translator::domain::Result<()> {
/// let text = "topology:\n  Name: base_domain\nresources: {}\n";
/// let mut reader = YamlTranslator::reader("model.yaml", ReaderSource::new(text.as_bytes()), true);
/// let root = reader.parse()?;
///
/// let mut buffer = Vec::new();
/// YamlTranslator::writer("copy.yaml", WriterSink::new(&mut buffer)).dump(&root)?;
/// assert_eq!(String::from_utf8(buffer).unwrap(), text);
/// # Ok(())
/// # }
/// ```
pub struct YamlTranslator<'r> {
    name: String,
    options: TranslatorOptions,
    state: State<'r>,
    release_warning: Option<ResourceReleaseWarning>,
}

impl<'r> YamlTranslator<'r> {
    /// Creates a translator that parses from `input`.
    ///
    /// # Arguments
    ///
    /// * `name` - Diagnostic name used in errors and logs only
    /// * `input` - The resource to read; it is closed after `parse`
    /// * `order_preserving` - Whether parsed mappings keep source order
    pub fn reader(name: impl Into<String>, input: impl InputSource + 'r, order_preserving: bool) -> Self {
        let options = TranslatorOptions::default().with_order_preserving(order_preserving);
        Self::reader_with_options(name, input, options)
    }

    /// Creates a translator that parses from `input` with explicit options.
    pub fn reader_with_options(
        name: impl Into<String>,
        input: impl InputSource + 'r,
        options: TranslatorOptions,
    ) -> Self {
        Self {
            name: name.into(),
            options,
            state: State::Reading(Box::new(input)),
            release_warning: None,
        }
    }

    /// Creates a translator that dumps to `output`.
    pub fn writer(name: impl Into<String>, output: impl OutputSink + 'r) -> Self {
        Self::writer_with_options(name, output, TranslatorOptions::default())
    }

    /// Creates a translator that dumps to `output` with explicit options.
    pub fn writer_with_options(
        name: impl Into<String>,
        output: impl OutputSink + 'r,
        options: TranslatorOptions,
    ) -> Self {
        Self {
            name: name.into(),
            options,
            state: State::Writing(Box::new(output)),
            release_warning: None,
        }
    }

    /// Reads the whole input and returns the root mapping of the document.
    ///
    /// The input is closed before this returns, on success and on failure.
    ///
    /// # Errors
    ///
    /// * `ParseFailure` - The input could not be read, was too large, was not
    ///   well-formed, repeated a key, or did not have a mapping at its root
    /// * `WrongDirection` - The translator was constructed for writing
    /// * `AlreadyConsumed` - The translator has already run its operation
    pub fn parse(&mut self) -> Result<Mapping> {
        tracing::trace!("Parsing YAML from '{}'", self.name);
        let input = self.take_input()?;

        let mut bound = Bound::new(&self.name, Direction::Read, input);
        let outcome = self.read_document(&mut *bound.resource).and_then(|text| {
            YamlParser::with_order_preserving(self.options.order_preserving)
                .parse_document(&self.name, &text)
        });
        let warning = bound.release();
        self.release_warning = warning;

        match &outcome {
            Ok(root) => tracing::trace!("Parsed '{}' with {} top-level entries", self.name, root.len()),
            Err(e) => tracing::debug!("Failed to parse '{}': {}", self.name, e),
        }
        outcome
    }

    /// Writes `data` as a YAML document to the output.
    ///
    /// Mapping entries are written in the iteration order of `data`. The output is
    /// flushed and closed before this returns, on success and on failure.
    ///
    /// # Errors
    ///
    /// * `DumpFailure` - `data` holds an unsupported value, a key that is not string
    ///   representable, a structure that contains itself, or a non-mapping root; or
    ///   the output could not be written
    /// * `WrongDirection` - The translator was constructed for reading
    /// * `AlreadyConsumed` - The translator has already run its operation
    pub fn dump<T: Serialize + ?Sized>(&mut self, data: &T) -> Result<()> {
        tracing::trace!("Dumping YAML to '{}'", self.name);
        let output = self.take_output()?;

        let mut bound = Bound::new(&self.name, Direction::Write, output);
        let outcome = self.write_document(&mut *bound.resource, data);
        let warning = bound.release();
        self.release_warning = warning;

        match &outcome {
            Ok(()) => tracing::trace!("Dumped '{}'", self.name),
            Err(e) => tracing::debug!("Failed to dump '{}': {}", self.name, e),
        }
        outcome
    }

    /// The diagnostic name given at construction.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The options fixed at construction.
    pub fn options(&self) -> &TranslatorOptions {
        &self.options
    }

    /// The direction the translator was constructed for.
    pub fn direction(&self) -> Direction {
        match self.state {
            State::Reading(_) => Direction::Read,
            State::Writing(_) => Direction::Write,
            State::Released(direction) => direction,
        }
    }

    /// Returns true once the bound resource has been closed.
    pub fn is_released(&self) -> bool {
        matches!(self.state, State::Released(_))
    }

    /// The warning recorded if closing the resource failed.
    pub fn release_warning(&self) -> Option<&ResourceReleaseWarning> {
        self.release_warning.as_ref()
    }

    fn take_input(&mut self) -> Result<Box<dyn InputSource + 'r>> {
        match std::mem::replace(&mut self.state, State::Released(Direction::Read)) {
            State::Reading(input) => Ok(input),
            other => Err(self.refuse(other, "parse")),
        }
    }

    fn take_output(&mut self) -> Result<Box<dyn OutputSink + 'r>> {
        match std::mem::replace(&mut self.state, State::Released(Direction::Write)) {
            State::Writing(output) => Ok(output),
            other => Err(self.refuse(other, "dump")),
        }
    }

    /// Puts back a state that does not allow `operation` and explains why.
    fn refuse(&mut self, state: State<'r>, operation: &'static str) -> YamlError {
        let error = match state {
            State::Released(_) => YamlError::AlreadyConsumed {
                name: self.name.clone(),
                operation,
            },
            State::Reading(_) => YamlError::WrongDirection {
                name: self.name.clone(),
                operation,
                direction: Direction::Read,
            },
            State::Writing(_) => YamlError::WrongDirection {
                name: self.name.clone(),
                operation,
                direction: Direction::Write,
            },
        };
        self.state = state;
        tracing::debug!("{}", error);
        error
    }

    fn read_document<R: InputSource + ?Sized>(&self, input: &mut R) -> Result<String> {
        let limit = self.options.max_input_bytes;
        let mut text = String::new();
        Read::take(&mut *input, limit.saturating_add(1))
            .read_to_string(&mut text)
            .map_err(|e| error_translation::read_failure(&self.name, e))?;

        if text.len() as u64 > limit {
            return Err(error_translation::parse_failure(
                &self.name,
                Position::start(),
                format!("input exceeds the maximum size of {} bytes", limit),
            ));
        }
        Ok(text)
    }

    fn write_document<W, T>(&self, output: &mut W, data: &T) -> Result<()>
    where
        W: OutputSink + ?Sized,
        T: Serialize + ?Sized,
    {
        let node = to_node(data).map_err(|e| error_translation::dump_failure(&self.name, e))?;
        let root = node
            .into_mapping()
            .map_err(|other| error_translation::root_failure(&self.name, other.kind()))?;

        YamlEmitter::new().emit_document(&self.name, &root, output)?;
        output
            .flush()
            .map_err(|e| error_translation::write_failure(&self.name, e))
    }
}

impl Drop for YamlTranslator<'_> {
    fn drop(&mut self) {
        let direction = self.direction();
        match std::mem::replace(&mut self.state, State::Released(direction)) {
            State::Reading(mut input) => {
                close_resource(&self.name, Direction::Read, &mut *input);
            }
            State::Writing(mut output) => {
                close_resource(&self.name, Direction::Write, &mut *output);
            }
            State::Released(_) => {}
        }
    }
}

/// A resource taken out of the translator for one operation.
///
/// `release` closes it; if the operation unwinds first, drop closes it instead.
struct Bound<'n, R: Release + ?Sized> {
    name: &'n str,
    direction: Direction,
    resource: Box<R>,
    released: bool,
}

impl<'n, R: Release + ?Sized> Bound<'n, R> {
    fn new(name: &'n str, direction: Direction, resource: Box<R>) -> Self {
        Self {
            name,
            direction,
            resource,
            released: false,
        }
    }

    fn release(mut self) -> Option<ResourceReleaseWarning> {
        self.released = true;
        close_resource(self.name, self.direction, &mut *self.resource)
    }
}

impl<R: Release + ?Sized> Drop for Bound<'_, R> {
    fn drop(&mut self) {
        if !self.released {
            self.released = true;
            close_resource(self.name, self.direction, &mut *self.resource);
        }
    }
}

fn close_resource<R: Release + ?Sized>(
    name: &str,
    direction: Direction,
    resource: &mut R,
) -> Option<ResourceReleaseWarning> {
    match resource.close() {
        Ok(()) => None,
        Err(e) => {
            let warning = error_translation::release_warning(name, direction, e);
            tracing::warn!("{}", warning);
            Some(warning)
        }
    }
}

/// Parses a YAML document held in memory.
///
/// # Examples
///
/// ```rust
/// use yaml_translator::service::parse_str;
///
/// let root = parse_str("inline", "b: 1\na: 2\n", true).unwrap();
/// assert_eq!(root.keys().collect::<Vec<_>>(), vec!["b", "a"]);
/// ```
pub fn parse_str(name: &str, text: &str, order_preserving: bool) -> Result<Mapping> {
    YamlTranslator::reader(name, ReaderSource::new(text.as_bytes()), order_preserving).parse()
}

/// Dumps `data` to a YAML string.
///
/// # Examples
///
/// ```rust
/// use std::collections::BTreeMap;
/// use yaml_translator::service::dump_to_string;
///
/// let mut data = BTreeMap::new();
/// data.insert("name", "demo");
/// assert_eq!(dump_to_string("inline", &data).unwrap(), "name: demo\n");
/// ```
pub fn dump_to_string<T: Serialize + ?Sized>(name: &str, data: &T) -> Result<String> {
    let mut buffer = Vec::new();
    YamlTranslator::writer(name, WriterSink::new(&mut buffer)).dump(data)?;
    String::from_utf8(buffer).map_err(|e| {
        error_translation::write_failure(name, io::Error::new(io::ErrorKind::InvalidData, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Node;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Counted<'a> {
        data: &'a [u8],
        closes: Rc<Cell<usize>>,
    }

    impl Read for Counted<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.data.read(buf)
        }
    }

    impl Release for Counted<'_> {
        fn close(&mut self) -> io::Result<()> {
            self.closes.set(self.closes.get() + 1);
            Ok(())
        }
    }

    fn counted(text: &str) -> (Counted<'_>, Rc<Cell<usize>>) {
        let closes = Rc::new(Cell::new(0));
        (
            Counted {
                data: text.as_bytes(),
                closes: Rc::clone(&closes),
            },
            closes,
        )
    }

    #[test]
    fn test_parse_closes_once() {
        let (input, closes) = counted("a: 1\n");
        let mut translator = YamlTranslator::reader("test.yaml", input, false);
        assert_eq!(translator.direction(), Direction::Read);

        let root = translator.parse().unwrap();
        assert_eq!(root.get("a").and_then(Node::as_i64), Some(1));
        assert!(translator.is_released());
        assert_eq!(closes.get(), 1);

        drop(translator);
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn test_second_parse_is_refused() {
        let (input, closes) = counted("a: 1\n");
        let mut translator = YamlTranslator::reader("test.yaml", input, false);
        translator.parse().unwrap();

        let err = translator.parse().unwrap_err();
        assert!(matches!(err, YamlError::AlreadyConsumed { operation: "parse", .. }));
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn test_dump_on_reader_keeps_resource_bound() {
        let (input, closes) = counted("a: 1\n");
        let mut translator = YamlTranslator::reader("test.yaml", input, false);

        let err = translator.dump(&Mapping::new()).unwrap_err();
        assert!(matches!(
            err,
            YamlError::WrongDirection {
                operation: "dump",
                direction: Direction::Read,
                ..
            }
        ));
        assert!(!translator.is_released());
        assert_eq!(closes.get(), 0);

        assert!(translator.parse().is_ok());
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn test_unused_translator_closes_on_drop() {
        let (input, closes) = counted("a: 1\n");
        drop(YamlTranslator::reader("test.yaml", input, false));
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn test_oversize_input_is_rejected() {
        let (input, closes) = counted("key: a value longer than the limit\n");
        let options = TranslatorOptions::default().with_max_input_bytes(8);
        let mut translator = YamlTranslator::reader_with_options("big.yaml", input, options);

        let err = translator.parse().unwrap_err();
        assert!(err.to_string().contains("maximum size of 8 bytes"));
        assert_eq!(err.position(), Some(Position::start()));
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn test_input_at_limit_is_accepted() {
        let text = "a: 1\n";
        let (input, _) = counted(text);
        let options = TranslatorOptions::default().with_max_input_bytes(text.len() as u64);
        let mut translator = YamlTranslator::reader_with_options("exact.yaml", input, options);
        assert!(translator.parse().is_ok());
    }

    #[test]
    fn test_non_mapping_root_is_rejected() {
        let err = dump_to_string("out.yaml", &vec![1, 2, 3]).unwrap_err();
        match err {
            YamlError::DumpFailure { path, message, .. } => {
                assert_eq!(path, "$");
                assert!(message.contains("found a sequence"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_string_helpers_round_trip() {
        let root = parse_str("inline", "z: [1, two]\na: {b: ~}\n", true).unwrap();
        let text = dump_to_string("inline", &root).unwrap();
        assert_eq!(text, "z:\n- 1\n- two\na:\n  b: null\n");
        assert_eq!(parse_str("inline", &text, true).unwrap(), root);
    }
}
