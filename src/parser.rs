//! Pull parser over a stream of top-level values.
//!
//! The [`Parser`] owns the factory registry, the anchor table and a
//! [`TaggedQueue`] of values that were parsed ahead of the caller while it
//! looked for a value of a particular tag.
//!
//! ## Examples
//!
//! ```rust
//! use sigil_format::{Parser, Tag};
//!
//! let mut parser = Parser::from_str(r#"=1 "two" =3"#);
//! let text = parser.parse_next_tagged(&Tag::Text).unwrap();
//! assert_eq!(text.as_str().unwrap(), "two");
//!
//! // `=1` was buffered while searching and comes out first.
//! assert_eq!(parser.parse_next().unwrap().as_i64().unwrap(), 1);
//! assert_eq!(parser.parse_next().unwrap().as_i64().unwrap(), 3);
//! assert!(!parser.has_next().unwrap());
//! ```
//!
//! ## Failure
//!
//! The first error ends parsing: every later call that needs more input
//! returns that same error. Values parsed before the failure can still be
//! taken from the buffer.

use crate::factory::{read_identifier, Registry, ValueFactory};
use crate::grammar::ANCHOR_SIGN;
use crate::reader::{IoSource, PositionedReader, Source, StrSource};
use crate::{Data, Error, ParserOptions, Position, Result, Tag, TaggedQueue, Value};
use std::collections::HashMap;
use std::io::BufRead;
use std::mem;
use std::rc::Rc;
use tracing::{debug, trace};

/// The reader type factories are handed.
pub type DynReader<'a> = PositionedReader<Box<dyn Source + 'a>>;

/// Reads values from a character source.
pub struct Parser<'a> {
    reader: DynReader<'a>,
    registry: Registry,
    anchors: HashMap<String, Rc<Value>>,
    buffer: TaggedQueue<Tag, Rc<Value>>,
    options: ParserOptions,
    depth: usize,
    failure: Option<Error>,
}

impl<'a> Parser<'a> {
    /// Creates a parser with the built-in factories registered.
    pub fn new<S: Source + 'a>(source: S) -> Self {
        Self::with_registry(source, Registry::with_defaults())
    }

    /// Creates a parser with no factories; every sign must be registered.
    pub fn empty<S: Source + 'a>(source: S) -> Self {
        Self::with_registry(source, Registry::new())
    }

    pub fn with_registry<S: Source + 'a>(source: S, registry: Registry) -> Self {
        Parser {
            reader: PositionedReader::new(Box::new(source)),
            registry,
            anchors: HashMap::new(),
            buffer: TaggedQueue::new(),
            options: ParserOptions::default(),
            depth: 0,
            failure: None,
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &'a str) -> Self {
        Self::new(StrSource::new(input))
    }

    pub fn from_reader<R: BufRead + 'a>(reader: R) -> Self {
        Self::new(IoSource::new(reader))
    }

    #[must_use]
    pub fn with_options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    /// Installs `factory` for `sign`, replacing any earlier one.
    pub fn register_factory<F>(&mut self, sign: char, factory: F)
    where
        F: ValueFactory + 'static,
    {
        debug!(sign = %sign, "registered value factory");
        self.registry.register(sign, factory);
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The underlying reader, for use by factories.
    pub fn reader(&mut self) -> &mut DynReader<'a> {
        &mut self.reader
    }

    #[must_use]
    pub fn source_position(&self) -> Position {
        self.reader.position()
    }

    /// The value bound to `name`, if any.
    #[must_use]
    pub fn anchor(&self, name: &str) -> Option<&Rc<Value>> {
        self.anchors.get(name)
    }

    /// Number of values parsed ahead and not yet handed out.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Skips whitespace and peeks at the next character.
    pub fn skip_whitespace(&mut self) -> Result<Option<char>> {
        self.reader.skip_while(char::is_whitespace)?;
        self.reader.peek()
    }

    /// Reads one complete value, including the anchors that follow it.
    ///
    /// References are replaced by the value they name. Returns `Ok(None)` if
    /// only whitespace remains.
    pub fn parse_value(&mut self) -> Result<Option<Rc<Value>>> {
        let Some(sign) = self.skip_whitespace()? else {
            return Ok(None);
        };
        let start = self.reader.position();
        if self.depth >= self.options.max_depth {
            return Err(Error::malformed(
                start,
                start,
                format!("values nested deeper than {} levels", self.options.max_depth),
            ));
        }
        let factory = self
            .registry
            .get(sign)
            .ok_or(Error::NoFactoryForSign {
                sign,
                position: start,
            })?;
        self.reader.read()?;

        self.depth += 1;
        let produced = factory.produce(self, start);
        self.depth -= 1;

        let value = self.resolve(produced?, start)?;
        self.bind_anchors(&value)?;
        trace!(tag = %value.tag(), position = %start, "parsed value");
        Ok(Some(value))
    }

    fn resolve(&self, value: Value, start: Position) -> Result<Rc<Value>> {
        match value.data() {
            Data::Reference(name) => {
                self.anchors
                    .get(name)
                    .cloned()
                    .ok_or_else(|| Error::UndefinedReference {
                        name: name.clone(),
                        position: start,
                    })
            }
            _ => Ok(Rc::new(value)),
        }
    }

    fn bind_anchors(&mut self, value: &Rc<Value>) -> Result<()> {
        while self.skip_whitespace()? == Some(ANCHOR_SIGN) {
            let position = self.reader.position();
            self.reader.read()?;
            let name = read_identifier(&mut self.reader, position, "an anchor name")?;
            if self.anchors.contains_key(&name) {
                return Err(Error::DuplicateAnchorName { name, position });
            }
            debug!(anchor = %name, tag = %value.tag(), "bound anchor");
            value.bind_anchor(name.clone());
            self.anchors.insert(name, Rc::clone(value));
        }
        Ok(())
    }

    /// Parses one more top-level value into the buffer.
    ///
    /// Returns `false` at the end of input.
    fn pull(&mut self) -> Result<bool> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        match self.parse_value() {
            Ok(Some(value)) => {
                let tag = value.tag();
                self.buffer.enqueue(Some(tag), value);
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(err) => {
                debug!(error = %err, "parsing failed");
                self.failure = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Whether another value is buffered or can be read.
    pub fn has_next(&mut self) -> Result<bool> {
        if !self.buffer.is_empty() {
            return Ok(true);
        }
        self.pull()
    }

    /// The oldest buffered value, or else the next value read.
    pub fn parse_next(&mut self) -> Result<Rc<Value>> {
        if self.buffer.is_empty() && !self.pull()? {
            return Err(Error::EndOfInput {
                position: self.reader.position(),
            });
        }
        self.buffer.dequeue().ok_or(Error::EndOfInput {
            position: self.reader.position(),
        })
    }

    /// The oldest value tagged `tag`, reading ahead as far as necessary.
    ///
    /// Values of other tags read on the way are kept for later calls.
    pub fn parse_next_tagged(&mut self, tag: &Tag) -> Result<Rc<Value>> {
        loop {
            if let Some(value) = self.buffer.dequeue_tagged(tag) {
                return Ok(value);
            }
            if !self.pull()? {
                return Err(Error::EndOfInput {
                    position: self.reader.position(),
                });
            }
        }
    }

    /// Reads the rest of the input and hands over every pending value.
    pub fn parse_all(&mut self) -> Result<TaggedQueue<Tag, Rc<Value>>> {
        while self.pull()? {}
        Ok(mem::take(&mut self.buffer))
    }
}

impl Iterator for Parser<'_> {
    type Item = Result<Rc<Value>>;

    /// Yields values in order; after an error has been yielded once,
    /// iteration ends once the buffer is drained.
    fn next(&mut self) -> Option<Self::Item> {
        if self.failure.is_some() && self.buffer.is_empty() {
            return None;
        }
        match self.has_next() {
            Ok(true) => Some(self.parse_next()),
            Ok(false) => None,
            Err(err) => Some(Err(err)),
        }
    }
}
