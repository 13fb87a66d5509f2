//! Position-tracked character reading.
//!
//! [`PositionedReader`] wraps a [`Source`] and offers the consumption
//! primitives every factory is written against: `peek`, `read`, and the
//! predicate-driven `skip_while` / `read_while` / `read_until`, all of which
//! are special cases of [`PositionedReader::read_conditionally`].
//!
//! ## Examples
//!
//! ```rust
//! use sigil_format::reader::{PositionedReader, Scan};
//!
//! let mut reader = PositionedReader::from_str("  abc def");
//! assert_eq!(reader.skip_while(char::is_whitespace).unwrap(), Scan::StoppedAt('a'));
//! assert_eq!(reader.read_while(|c| c.is_ascii_alphabetic()).unwrap(), "abc");
//! assert_eq!(reader.position().column, 5);
//! ```

use crate::{Error, Result};
use std::fmt;
use std::io::BufRead;
use std::str::Chars;

/// A location in the source text.
///
/// All fields are 0-based; the `Display` form is 1-based for line and
/// column, which is what error messages show.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// Number of characters consumed so far.
    pub index: u64,
    pub line: u32,
    pub column: u32,
}

impl Position {
    fn advance(&mut self, ch: char) {
        self.index += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}, column {} (index {})",
            self.line + 1,
            self.column + 1,
            self.index
        )
    }
}

/// Anything that produces characters one at a time.
///
/// `Ok(None)` signals the end of input.
pub trait Source {
    fn next_char(&mut self) -> Result<Option<char>>;
}

impl<S: Source + ?Sized> Source for Box<S> {
    fn next_char(&mut self) -> Result<Option<char>> {
        (**self).next_char()
    }
}

/// A source over borrowed text.
pub struct StrSource<'a> {
    chars: Chars<'a>,
}

impl<'a> StrSource<'a> {
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        StrSource {
            chars: input.chars(),
        }
    }
}

impl Source for StrSource<'_> {
    fn next_char(&mut self) -> Result<Option<char>> {
        Ok(self.chars.next())
    }
}

/// A source over any buffered byte stream.
///
/// Input is decoded one line at a time, so only the current line is held in
/// memory and reads block only when that line is used up.
pub struct IoSource<R> {
    reader: R,
    line: String,
    offset: usize,
}

impl<R: BufRead> IoSource<R> {
    pub fn new(reader: R) -> Self {
        IoSource {
            reader,
            line: String::new(),
            offset: 0,
        }
    }
}

impl<R: BufRead> Source for IoSource<R> {
    fn next_char(&mut self) -> Result<Option<char>> {
        if self.offset >= self.line.len() {
            self.line.clear();
            self.offset = 0;
            if self.reader.read_line(&mut self.line)? == 0 {
                return Ok(None);
            }
        }
        let ch = self.line[self.offset..].chars().next();
        if let Some(ch) = ch {
            self.offset += ch.len_utf8();
        }
        Ok(ch)
    }
}

/// What [`PositionedReader::read_conditionally`] does with the next character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    /// Consume it and append it to the result.
    Accept,
    /// Consume it and drop it.
    Skip,
    /// Consume it but append the given character instead.
    Substitute(char),
    /// Leave it unconsumed and finish.
    Stop,
}

/// Why a conditional read finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scan {
    ReachedEnd,
    /// Stopped in front of this (unconsumed) character.
    StoppedAt(char),
}

/// A character reader that knows where it is.
pub struct PositionedReader<S> {
    source: S,
    lookahead: Option<char>,
    position: Position,
    line_indent: String,
    in_indent: bool,
}

impl<'a> PositionedReader<StrSource<'a>> {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &'a str) -> Self {
        Self::new(StrSource::new(input))
    }
}

impl<S: Source> PositionedReader<S> {
    pub fn new(source: S) -> Self {
        PositionedReader {
            source,
            lookahead: None,
            position: Position::default(),
            line_indent: String::new(),
            in_indent: true,
        }
    }

    /// The position of the next unconsumed character.
    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Human-readable form of [`position`](Self::position).
    #[must_use]
    pub fn position_description(&self) -> String {
        self.position.to_string()
    }

    /// Leading tabs and spaces of the line being read, as far as consumed.
    #[must_use]
    pub fn line_indent(&self) -> &str {
        &self.line_indent
    }

    pub fn peek(&mut self) -> Result<Option<char>> {
        if self.lookahead.is_none() {
            self.lookahead = self.source.next_char()?;
        }
        Ok(self.lookahead)
    }

    /// Consumes one character, failing at end of input.
    pub fn read(&mut self) -> Result<char> {
        match self.bump()? {
            Some(ch) => Ok(ch),
            None => Err(Error::unexpected_end(self.position, "a character")),
        }
    }

    /// Consumes `expected` or fails without consuming anything else.
    pub fn expect(&mut self, expected: char) -> Result<()> {
        let start = self.position;
        match self.peek()? {
            Some(ch) if ch == expected => {
                self.bump()?;
                Ok(())
            }
            Some(ch) => Err(Error::malformed(
                start,
                self.position,
                format!("expected {:?}, found {:?}", expected, ch),
            )),
            None => Err(Error::unexpected_end(start, &format!("{:?}", expected))),
        }
    }

    pub fn skip_while<P>(&mut self, mut predicate: P) -> Result<Scan>
    where
        P: FnMut(char) -> bool,
    {
        let (_, scan) = self.read_conditionally(|ch| {
            if predicate(ch) {
                Decision::Skip
            } else {
                Decision::Stop
            }
        })?;
        Ok(scan)
    }

    pub fn read_while<P>(&mut self, mut predicate: P) -> Result<String>
    where
        P: FnMut(char) -> bool,
    {
        let (text, _) = self.read_conditionally(|ch| {
            if predicate(ch) {
                Decision::Accept
            } else {
                Decision::Stop
            }
        })?;
        Ok(text)
    }

    /// Reads up to (not including) the first character matching `stop`.
    ///
    /// Running out of input before `stop` matches is an error.
    pub fn read_until<P>(&mut self, mut stop: P) -> Result<String>
    where
        P: FnMut(char) -> bool,
    {
        let (text, scan) = self.read_conditionally(|ch| {
            if stop(ch) {
                Decision::Stop
            } else {
                Decision::Accept
            }
        })?;
        match scan {
            Scan::StoppedAt(_) => Ok(text),
            Scan::ReachedEnd => Err(Error::unexpected_end(
                self.position,
                "a terminating character",
            )),
        }
    }

    /// The primitive all other multi-character reads are built on.
    ///
    /// `decide` sees each upcoming character before it is consumed.
    pub fn read_conditionally<D>(&mut self, mut decide: D) -> Result<(String, Scan)>
    where
        D: FnMut(char) -> Decision,
    {
        let mut text = String::new();
        loop {
            let Some(ch) = self.peek()? else {
                return Ok((text, Scan::ReachedEnd));
            };
            match decide(ch) {
                Decision::Accept => text.push(ch),
                Decision::Skip => {}
                Decision::Substitute(replacement) => text.push(replacement),
                Decision::Stop => return Ok((text, Scan::StoppedAt(ch))),
            }
            self.bump()?;
        }
    }

    fn bump(&mut self) -> Result<Option<char>> {
        let ch = match self.lookahead.take() {
            Some(ch) => Some(ch),
            None => self.source.next_char()?,
        };
        if let Some(ch) = ch {
            self.position.advance(ch);
            if ch == '\n' {
                self.line_indent.clear();
                self.in_indent = true;
            } else if self.in_indent && (ch == ' ' || ch == '\t') {
                self.line_indent.push(ch);
            } else {
                self.in_indent = false;
            }
        }
        Ok(ch)
    }
}
