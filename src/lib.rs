//! # sigil_format
//!
//! A reader and writer for a sign-prefixed textual data format.
//!
//! ## What is it?
//!
//! Every value in a document starts with a single sign character (`=` for
//! numbers, `"` for text, `[` for arrays, `{` for tagged composites, ...).
//! The sign selects a pluggable [`ValueFactory`], so applications can add
//! their own value syntaxes next to the built-in ones. Values can be named
//! with `@anchor` and shared by later `#anchor` references, which resolve
//! to the very same instance.
//!
//! See [`grammar`] for the full format.
//!
//! ## Key Features
//!
//! - **Pull parsing**: [`Parser`] reads one top-level value at a time and
//!   can skip ahead to the next value of a given [`Tag`], keeping the
//!   values it passed for later
//! - **Shared values**: anchors and references preserve identity through a
//!   parse/compose round trip
//! - **Text blocks**: multi-line text without escapes, delimited by
//!   indentation
//! - **Serde compatible**: [`from_str`] and [`to_string`] work with
//!   `#[derive(Serialize, Deserialize)]` types
//! - **Positioned errors**: every parse error reports line, column and
//!   character index
//!
//! ## Quick Start
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use sigil_format::{from_str, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct User {
//!     id: u32,
//!     name: String,
//!     admin: bool,
//! }
//!
//! let user = User { id: 7, name: "Ada".to_string(), admin: true };
//! let text = to_string(&user).unwrap();
//! assert_eq!(text, "{User\n\tid =7\n\tname \"Ada\"\n\tadmin =1\n}");
//!
//! let back: User = from_str(&text).unwrap();
//! assert_eq!(user, back);
//! ```
//!
//! ### Working with Values
//!
//! ```rust
//! use sigil_format::{compose_all, parse_str};
//! use std::rc::Rc;
//!
//! let doc = "{Point x =0 y =0} @origin\n[ #origin #origin ]";
//! let values = parse_str(doc).unwrap();
//! let pair = values[1].as_array().unwrap();
//! assert!(Rc::ptr_eq(&values[0], &pair[0]));
//! assert!(Rc::ptr_eq(&pair[0], &pair[1]));
//!
//! let text = compose_all(&values).unwrap();
//! assert_eq!(text, "{Point\n\tx =0\n\ty =0\n} @origin\n[\n\t#origin\n\t#origin\n]");
//! ```
//!
//! ### Custom Value Syntax
//!
//! ```rust
//! use sigil_format::{Parser, Position, Result, Value};
//!
//! let mut parser = Parser::from_str("~3 ~5");
//! parser.register_factory('~', |parser: &mut Parser<'_>, _start: Position| -> Result<Value> {
//!     let digits = parser.reader().read_while(|c| c.is_ascii_digit())?;
//!     Ok(Value::text("~".repeat(digits.parse().unwrap_or(0))))
//! });
//! assert_eq!(parser.parse_next().unwrap().as_str().unwrap(), "~~~");
//! ```
//!
//! ## Logging
//!
//! Factory registration, anchor binding and parse failures are reported
//! through [`tracing`] at `debug` level; every parsed value at `trace`.

pub mod block;
pub mod compose;
pub mod de;
pub mod error;
pub mod factory;
pub mod grammar;
pub mod macros;
pub mod map;
pub mod options;
pub mod parser;
pub mod queue;
pub mod reader;
pub mod ser;
pub mod value;

pub use block::TextBlockFactory;
pub use compose::Composer;
pub use de::{from_value, ValueDeserializer};
pub use error::{Error, Result};
pub use factory::{
    ArrayFactory, CompositeFactory, NumericFactory, ReferenceFactory, Registry, TextFactory,
    ValueFactory,
};
pub use map::Members;
pub use options::{ComposeOptions, Indent, LineEnding, ParserOptions};
pub use parser::Parser;
pub use queue::{EntryId, TaggedQueue};
pub use reader::{IoSource, Position, PositionedReader, Source, StrSource};
pub use ser::{to_value, ValueSerializer};
pub use value::{Composite, Data, Number, Tag, Value};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{self, BufReader};
use std::rc::Rc;

/// Parses every top-level value of a document.
///
/// # Examples
///
/// ```rust
/// use sigil_format::parse_str;
///
/// let values = parse_str("=1 \"two\" [ =3 ]").unwrap();
/// assert_eq!(values.len(), 3);
/// ```
///
/// # Errors
///
/// Returns the first parse error.
pub fn parse_str(input: &str) -> Result<Vec<Rc<Value>>> {
    Parser::from_str(input).collect()
}

/// Deserializes the first top-level value of `s`.
///
/// # Examples
///
/// ```rust
/// use sigil_format::from_str;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_str("{Point x =1 y =2}").unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if the input holds no value, does not parse, or does
/// not match `T`. Parse errors include line and column.
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let value = Parser::from_str(s).parse_next()?;
    from_value(&value)
}

/// Deserializes the first top-level value read from `reader`.
///
/// Input is decoded as UTF-8 and read incrementally; nothing past the
/// first value is consumed beyond the current line.
///
/// # Examples
///
/// ```rust
/// use sigil_format::from_reader;
/// use std::io::Cursor;
///
/// let numbers: Vec<i64> = from_reader(Cursor::new(b"[ =1 =2 ]")).unwrap();
/// assert_eq!(numbers, vec![1, 2]);
/// ```
///
/// # Errors
///
/// Returns an error if reading fails, the bytes are not UTF-8, or the
/// value does not parse or match `T`.
pub fn from_reader<R, T>(reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let value = Parser::from_reader(BufReader::new(reader)).parse_next()?;
    from_value(&value)
}

/// Deserializes the first top-level value of UTF-8 `bytes`.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8, or as [`from_str`].
pub fn from_slice<T>(bytes: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    let s = std::str::from_utf8(bytes).map_err(|e| Error::custom(e.to_string()))?;
    from_str(s)
}

/// Serializes `value` with default layout.
///
/// # Errors
///
/// Returns an error if `T` holds a type with no representation or a name
/// that is not an identifier.
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, ComposeOptions::default())
}

/// Serializes `value` with the given layout.
///
/// # Examples
///
/// ```rust
/// use sigil_format::{to_string_with_options, ComposeOptions, Indent};
///
/// let options = ComposeOptions::new().with_indent(Indent::Spaces(2));
/// let text = to_string_with_options(&vec![1, 2], options).unwrap();
/// assert_eq!(text, "[\n  =1\n  =2\n]");
/// ```
///
/// # Errors
///
/// As [`to_string`].
pub fn to_string_with_options<T>(value: &T, options: ComposeOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    compose_with_options(&Rc::new(to_value(value)?), options)
}

/// Serializes `value` into `writer`.
///
/// # Errors
///
/// As [`to_string`], or if writing fails.
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    to_writer_with_options(writer, value, ComposeOptions::default())
}

/// Serializes `value` into `writer` with the given layout.
///
/// # Errors
///
/// As [`to_string`], or if writing fails.
pub fn to_writer_with_options<W, T>(mut writer: W, value: &T, options: ComposeOptions) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let text = to_string_with_options(value, options)?;
    writer.write_all(text.as_bytes())?;
    Ok(())
}

/// Composes a single value with default layout.
///
/// # Errors
///
/// Returns [`Error::InvalidIdentifier`] for tags, member names or anchors
/// that are not identifiers.
pub fn compose(value: &Rc<Value>) -> Result<String> {
    compose_with_options(value, ComposeOptions::default())
}

pub fn compose_with_options(value: &Rc<Value>, options: ComposeOptions) -> Result<String> {
    let mut composer = Composer::new(options);
    composer.compose(value)?;
    Ok(composer.into_inner())
}

/// Composes a sequence of top-level values, one after another.
///
/// Values shared between them are written in full once and referenced
/// afterwards.
///
/// # Errors
///
/// As [`compose`].
pub fn compose_all(values: &[Rc<Value>]) -> Result<String> {
    compose_all_with_options(values, ComposeOptions::default())
}

pub fn compose_all_with_options(values: &[Rc<Value>], options: ComposeOptions) -> Result<String> {
    let mut composer = Composer::new(options);
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            composer.line_break();
        }
        composer.compose(value)?;
    }
    Ok(composer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::io::Cursor;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct User {
        id: u32,
        name: String,
        active: bool,
        tags: Vec<String>,
        bio: String,
    }

    fn user() -> User {
        User {
            id: 123,
            name: "Alice".to_string(),
            active: true,
            tags: vec!["admin".to_string(), "user".to_string()],
            bio: "line one\nline two".to_string(),
        }
    }

    #[test]
    fn test_serialize_deserialize_point() {
        let point = Point { x: 1, y: 2 };
        let text = to_string(&point).unwrap();
        let point_back: Point = from_str(&text).unwrap();
        assert_eq!(point, point_back);
    }

    #[test]
    fn test_serialize_deserialize_user() {
        let text = to_string(&user()).unwrap();
        assert!(text.contains("\tbio |\n\t\tline one\n\t\tline two\n\t|"));
        let user_back: User = from_str(&text).unwrap();
        assert_eq!(user(), user_back);
    }

    #[test]
    fn test_custom_options() {
        let options = ComposeOptions::new()
            .with_indent(Indent::Spaces(4))
            .with_line_ending(LineEnding::CrLf)
            .with_block_text(false);
        let text = to_string_with_options(&user(), options).unwrap();
        assert!(text.contains("\r\n    bio \"line one\\nline two\"\r\n"));
        let user_back: User = from_str(&text).unwrap();
        assert_eq!(user(), user_back);
    }

    #[test]
    fn test_writer_and_reader() {
        let mut buffer = Vec::new();
        to_writer(&mut buffer, &user()).unwrap();
        let user_back: User = from_reader(Cursor::new(buffer.clone())).unwrap();
        assert_eq!(user(), user_back);
        let user_back: User = from_slice(&buffer).unwrap();
        assert_eq!(user(), user_back);
    }

    #[test]
    fn test_from_str_needs_a_value() {
        assert!(matches!(
            from_str::<Point>("  "),
            Err(Error::EndOfInput { .. })
        ));
        assert!(from_slice::<Point>(&[0xff]).is_err());
    }

    #[test]
    fn test_compose_all_round_trip() {
        let doc = "=1 @one\n\"text\"\n[\n\t#one\n\t{Empty}\n]";
        let values = parse_str(doc).unwrap();
        assert_eq!(compose_all(&values).unwrap(), doc);
    }
}
