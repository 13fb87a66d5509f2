//! The text format.
//!
//! A document is a sequence of top-level values separated by whitespace.
//! Every value starts with a single **sign** character that selects the
//! factory that reads it.
//!
//! # Values
//!
//! | Value | Sign | Example |
//! |-------|------|---------|
//! | Numeric | `=` | `=42`, `=-0.5`, `=1e9`, `=Inf`, `=-Inf`, `=NaN` |
//! | Quoted text | `"` | `"hello\tworld"` |
//! | Block text | `\|` | see below |
//! | Array | `[` | `[ =1 =2 ]` |
//! | Composite | `{` | `{Point x =1 y =2}` |
//! | Reference | `#` | `#origin` |
//!
//! Whitespace between tokens is insignificant, except inside a text block.
//!
//! ## Numbers
//!
//! A literal containing `.`, `e` or `E` is a float. Other literals are
//! integers; integers that do not fit in 64 bits are kept at arbitrary
//! precision.
//!
//! ## Quoted Text
//!
//! Escape sequences:
//! ```text
//! \"  - quote
//! \\  - backslash
//! \n  - newline
//! \r  - carriage return
//! \t  - tab
//! ```
//!
//! Any other escape is an error.
//!
//! ## Block Text
//!
//! The rest of the opening line is an optional indent specification built
//! from `\t` (tab) and `\s` (space); it defaults to one tab. Every content
//! line must start with the indentation of the opening line followed by
//! that indent. A line reaching the closing sign before its indentation is
//! complete ends the block:
//!
//! ```text
//! [
//! 	|
//! 		first line
//! 		second line
//! 	|
//! ]
//! ```
//!
//! The text above is `"first line\nsecond line"`. With `| \s\s` the content
//! lines would need two spaces after the tab instead of a second tab.
//!
//! ## Composites
//!
//! `{` is followed by the composite's tag, then any number of
//! `member value` pairs, then `}`. Tags and member names are identifiers:
//! `[A-Za-z0-9_]+`. Member order is preserved.
//!
//! # Anchors and References
//!
//! Any value may be followed by one or more `@name` tokens, binding each
//! name to that value. `#name` stands for the value bound to `name`, and is
//! only valid after the binding has been read:
//!
//! ```text
//! {Point x =0 y =0} @origin
//! [ #origin #origin ]
//! ```
//!
//! Both array elements are the very same value as the first composite.
//! Anchors bind when the value they follow is complete, so a composite can
//! refer to an anchor on one of its earlier members but never to an anchor
//! on itself.

pub const NUMERIC_SIGN: char = '=';
pub const TEXT_SIGN: char = '"';
pub const BLOCK_OPEN_SIGN: char = '|';
pub const BLOCK_CLOSE_SIGN: char = '|';
pub const ARRAY_OPEN_SIGN: char = '[';
pub const ARRAY_CLOSE_SIGN: char = ']';
pub const COMPOSITE_OPEN_SIGN: char = '{';
pub const COMPOSITE_CLOSE_SIGN: char = '}';
pub const ANCHOR_SIGN: char = '@';
pub const REFERENCE_SIGN: char = '#';

pub const INFINITY_LITERAL: &str = "Inf";
pub const NEG_INFINITY_LITERAL: &str = "-Inf";
pub const NAN_LITERAL: &str = "NaN";

/// Characters allowed in tags, member names and anchor names.
#[inline]
#[must_use]
pub fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

#[must_use]
pub fn is_identifier(name: &str) -> bool {
    !name.is_empty() && name.chars().all(is_identifier_char)
}

/// Characters that can make up a numeric literal after its sign.
#[inline]
#[must_use]
pub fn is_numeric_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '+' | '-' | '.')
}
