//! Sign-dispatched value factories.
//!
//! A [`ValueFactory`] reads exactly one value once the [`Parser`] has
//! consumed its sign. Factories for nested values call back into
//! [`Parser::parse_value`], which handles dispatch, reference substitution
//! and anchor binding for the elements they contain.
//!
//! The [`Registry`] maps each sign to one factory. Registering a second
//! factory for a sign replaces the first.
//!
//! Closures can be registered directly:
//!
//! ```rust
//! use sigil_format::{Parser, Position, Result, Value};
//!
//! let mut parser = Parser::from_str("%yes %no");
//! parser.register_factory('%', |parser: &mut Parser<'_>, _start: Position| -> Result<Value> {
//!     let word = parser.reader().read_while(|c| c.is_ascii_alphabetic())?;
//!     Ok(Value::from(i64::from(word == "yes")))
//! });
//! assert_eq!(parser.parse_next().unwrap().as_i64().unwrap(), 1);
//! assert_eq!(parser.parse_next().unwrap().as_i64().unwrap(), 0);
//! ```

use crate::block::TextBlockFactory;
use crate::grammar::{
    self, ARRAY_CLOSE_SIGN, ARRAY_OPEN_SIGN, BLOCK_OPEN_SIGN, COMPOSITE_CLOSE_SIGN,
    COMPOSITE_OPEN_SIGN, INFINITY_LITERAL, NAN_LITERAL, NEG_INFINITY_LITERAL, NUMERIC_SIGN,
    REFERENCE_SIGN, TEXT_SIGN,
};
use crate::reader::{Decision, PositionedReader, Scan, Source};
use crate::{Composite, Error, Members, Number, Parser, Position, Result, Value};
use num_bigint::BigInt;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Produces one value from the parser's current position.
pub trait ValueFactory {
    /// Reads the value whose sign, found at `start`, was just consumed.
    fn produce(&self, parser: &mut Parser<'_>, start: Position) -> Result<Value>;
}

impl<F> ValueFactory for F
where
    F: Fn(&mut Parser<'_>, Position) -> Result<Value>,
{
    fn produce(&self, parser: &mut Parser<'_>, start: Position) -> Result<Value> {
        self(parser, start)
    }
}

/// Sign to factory table.
#[derive(Clone, Default)]
pub struct Registry {
    factories: HashMap<char, Rc<dyn ValueFactory>>,
}

impl Registry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in factories of the format.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Registry::new();
        registry.register(NUMERIC_SIGN, NumericFactory);
        registry.register(TEXT_SIGN, TextFactory);
        registry.register(BLOCK_OPEN_SIGN, TextBlockFactory);
        registry.register(ARRAY_OPEN_SIGN, ArrayFactory);
        registry.register(COMPOSITE_OPEN_SIGN, CompositeFactory);
        registry.register(REFERENCE_SIGN, ReferenceFactory);
        registry
    }

    /// Installs `factory` for `sign`, returning the factory it replaced.
    pub fn register<F>(&mut self, sign: char, factory: F) -> Option<Rc<dyn ValueFactory>>
    where
        F: ValueFactory + 'static,
    {
        self.factories.insert(sign, Rc::new(factory))
    }

    #[must_use]
    pub fn get(&self, sign: char) -> Option<Rc<dyn ValueFactory>> {
        self.factories.get(&sign).cloned()
    }

    #[must_use]
    pub fn contains(&self, sign: char) -> bool {
        self.factories.contains_key(&sign)
    }

    /// Registered signs, sorted.
    #[must_use]
    pub fn signs(&self) -> Vec<char> {
        let mut signs: Vec<_> = self.factories.keys().copied().collect();
        signs.sort_unstable();
        signs
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("signs", &self.signs())
            .finish()
    }
}

/// Reads a non-empty `[A-Za-z0-9_]+` identifier.
pub(crate) fn read_identifier<S: Source>(
    reader: &mut PositionedReader<S>,
    start: Position,
    what: &str,
) -> Result<String> {
    let name = reader.read_while(grammar::is_identifier_char)?;
    if !name.is_empty() {
        return Ok(name);
    }
    match reader.peek()? {
        Some(ch) => Err(Error::malformed(
            start,
            reader.position(),
            format!("expected {}, found {:?}", what, ch),
        )),
        None => Err(Error::unexpected_end(reader.position(), what)),
    }
}

/// Turns a failure to read an element into a grammar error of its container.
///
/// Errors that already describe a grammar or binding problem pass through.
fn nested_failure(parser: &Parser<'_>, start: Position, container: &str, err: Error) -> Error {
    match err {
        Error::UnexpectedEndOfInput { .. } | Error::NoFactoryForSign { .. } => {
            Error::malformed_caused_by(
                start,
                parser.source_position(),
                format!("cannot read the next element of this {}", container),
                err,
            )
        }
        other => other,
    }
}

fn unterminated(parser: &Parser<'_>, start: Position, container: &str, close: char) -> Error {
    let end = parser.source_position();
    Error::malformed_caused_by(
        start,
        end,
        format!("unterminated {}", container),
        Error::unexpected_end(end, &format!("{:?}", close)),
    )
}

/// Parses the literal that follows a numeric sign.
///
/// # Examples
///
/// ```rust
/// use sigil_format::factory::parse_number;
/// use sigil_format::Number;
///
/// assert_eq!(parse_number("42"), Some(Number::Integer(42)));
/// assert_eq!(parse_number("-1.5e3"), Some(Number::Float(-1500.0)));
/// assert_eq!(parse_number("-Inf"), Some(Number::NegativeInfinity));
/// assert_eq!(parse_number("4x"), None);
/// ```
#[must_use]
pub fn parse_number(literal: &str) -> Option<Number> {
    match literal {
        INFINITY_LITERAL => return Some(Number::Infinity),
        NEG_INFINITY_LITERAL => return Some(Number::NegativeInfinity),
        NAN_LITERAL => return Some(Number::NaN),
        _ => {}
    }
    if !literal
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
    {
        return None;
    }
    if literal.contains(|c| matches!(c, '.' | 'e' | 'E')) {
        return literal.parse::<f64>().ok().map(Number::Float);
    }
    if let Ok(i) = literal.parse::<i64>() {
        return Some(Number::Integer(i));
    }
    literal.parse::<BigInt>().ok().map(Number::Big)
}

/// `=42`, `=-0.5`, `=Inf`, `=NaN`.
#[derive(Clone, Copy, Debug, Default)]
pub struct NumericFactory;

impl ValueFactory for NumericFactory {
    fn produce(&self, parser: &mut Parser<'_>, start: Position) -> Result<Value> {
        let literal = parser.reader().read_while(grammar::is_numeric_char)?;
        match parse_number(&literal) {
            Some(number) => Ok(Value::numeric(number)),
            None => Err(Error::malformed(
                start,
                parser.source_position(),
                format!("invalid numeric literal {:?}", literal),
            )),
        }
    }
}

/// `"text"` with `\\ \" \n \r \t` escapes.
#[derive(Clone, Copy, Debug, Default)]
pub struct TextFactory;

impl ValueFactory for TextFactory {
    fn produce(&self, parser: &mut Parser<'_>, start: Position) -> Result<Value> {
        let reader = parser.reader();
        let mut escaped = false;
        let mut bad_escape = None;
        let (text, scan) = reader.read_conditionally(|ch| {
            if escaped {
                escaped = false;
                match ch {
                    '\\' => Decision::Substitute('\\'),
                    '"' => Decision::Substitute('"'),
                    'n' => Decision::Substitute('\n'),
                    'r' => Decision::Substitute('\r'),
                    't' => Decision::Substitute('\t'),
                    other => {
                        bad_escape = Some(other);
                        Decision::Stop
                    }
                }
            } else if ch == '\\' {
                escaped = true;
                Decision::Skip
            } else if ch == TEXT_SIGN {
                Decision::Stop
            } else {
                Decision::Accept
            }
        })?;

        if let Some(ch) = bad_escape {
            return Err(Error::malformed(
                start,
                reader.position(),
                format!("unknown escape sequence \\{}", ch),
            ));
        }
        match scan {
            Scan::StoppedAt(_) => {
                reader.read()?;
                Ok(Value::text(text))
            }
            Scan::ReachedEnd => Err(Error::unexpected_end(reader.position(), "closing quote")),
        }
    }
}

/// `[` value* `]`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ArrayFactory;

impl ValueFactory for ArrayFactory {
    fn produce(&self, parser: &mut Parser<'_>, start: Position) -> Result<Value> {
        let mut items = Vec::new();
        loop {
            match parser.skip_whitespace()? {
                Some(ARRAY_CLOSE_SIGN) => {
                    parser.reader().read()?;
                    return Ok(Value::array(items));
                }
                Some(_) => {}
                None => return Err(unterminated(parser, start, "array", ARRAY_CLOSE_SIGN)),
            }
            match parser.parse_value() {
                Ok(Some(item)) => items.push(item),
                Ok(None) => return Err(unterminated(parser, start, "array", ARRAY_CLOSE_SIGN)),
                Err(err) => return Err(nested_failure(parser, start, "array", err)),
            }
        }
    }
}

/// `{` tag (member value)* `}`.
#[derive(Clone, Copy, Debug, Default)]
pub struct CompositeFactory;

impl ValueFactory for CompositeFactory {
    fn produce(&self, parser: &mut Parser<'_>, start: Position) -> Result<Value> {
        if parser.skip_whitespace()?.is_none() {
            return Err(unterminated(parser, start, "composite", COMPOSITE_CLOSE_SIGN));
        }
        let tag = read_identifier(parser.reader(), start, "a composite tag")?;
        let mut members = Members::new();
        loop {
            match parser.skip_whitespace()? {
                Some(COMPOSITE_CLOSE_SIGN) => {
                    parser.reader().read()?;
                    return Ok(Value::composite(Composite::with_members(tag, members)));
                }
                Some(_) => {}
                None => {
                    return Err(unterminated(parser, start, "composite", COMPOSITE_CLOSE_SIGN))
                }
            }

            let name = match read_identifier(parser.reader(), start, "a member name") {
                Ok(name) => name,
                Err(err) => return Err(nested_failure(parser, start, "composite", err)),
            };
            if members.contains_key(&name) {
                return Err(Error::malformed(
                    start,
                    parser.source_position(),
                    format!("member '{}' appears twice in composite '{}'", name, tag),
                ));
            }
            match parser.parse_value() {
                Ok(Some(value)) => {
                    members.insert(name, value);
                }
                Ok(None) => {
                    return Err(unterminated(parser, start, "composite", COMPOSITE_CLOSE_SIGN))
                }
                Err(err) => return Err(nested_failure(parser, start, "composite", err)),
            }
        }
    }
}

/// `#name`; the parser substitutes the bound value.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReferenceFactory;

impl ValueFactory for ReferenceFactory {
    fn produce(&self, parser: &mut Parser<'_>, start: Position) -> Result<Value> {
        let name = read_identifier(parser.reader(), start, "a reference name")?;
        Ok(Value::reference(name))
    }
}
