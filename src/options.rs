//! Configuration for parsing and composing.
//!
//! - [`ParserOptions`]: limits applied while reading
//! - [`ComposeOptions`]: layout of composed text
//! - [`Indent`]: the unit of indentation per nesting level
//! - [`LineEnding`]: the line terminator written between lines
//!
//! ## Examples
//!
//! ```rust
//! use sigil_format::{compose_with_options, ComposeOptions, Indent, LineEnding, Value};
//! use std::rc::Rc;
//!
//! let value = Rc::new(Value::from(vec![Value::from(1), Value::from(2)]));
//! let options = ComposeOptions::new()
//!     .with_indent(Indent::Spaces(2))
//!     .with_line_ending(LineEnding::CrLf);
//! let text = compose_with_options(&value, options).unwrap();
//! assert_eq!(text, "[\r\n  =1\r\n  =2\r\n]");
//! ```

/// Indentation unit for one nesting level.
///
/// # Examples
///
/// ```rust
/// use sigil_format::Indent;
///
/// assert_eq!(Indent::Tab.unit(), "\t");
/// assert_eq!(Indent::Spaces(2).unit(), "  ");
/// assert_eq!(Indent::Spaces(2).block_spec(), "\\s\\s");
/// assert_eq!(Indent::Tab.block_spec(), "");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Indent {
    #[default]
    Tab,
    Spaces(usize),
}

impl Indent {
    #[must_use]
    pub fn unit(&self) -> String {
        match self {
            Indent::Tab => "\t".to_string(),
            Indent::Spaces(n) => " ".repeat(*n),
        }
    }

    /// Extra indentation of text block content lines.
    ///
    /// Same as [`unit`](Self::unit), except that a zero-width unit falls
    /// back to one tab because block content must be indented.
    #[must_use]
    pub fn block_unit(&self) -> String {
        match self {
            Indent::Tab | Indent::Spaces(0) => "\t".to_string(),
            Indent::Spaces(n) => " ".repeat(*n),
        }
    }

    /// The indent specification written after a block's opening sign.
    ///
    /// Empty when the block unit is one tab, the default of text blocks.
    #[must_use]
    pub fn block_spec(&self) -> String {
        match self {
            Indent::Tab | Indent::Spaces(0) => String::new(),
            Indent::Spaces(n) => "\\s".repeat(*n),
        }
    }
}

/// Line terminator for composed text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// Layout options for the composer.
///
/// # Examples
///
/// ```rust
/// use sigil_format::{ComposeOptions, Indent};
///
/// let options = ComposeOptions::new();
/// assert_eq!(options.indent, Indent::Tab);
/// assert!(options.block_text);
///
/// let quoted_only = ComposeOptions::new().with_block_text(false);
/// assert!(!quoted_only.block_text);
/// ```
#[derive(Clone, Debug)]
pub struct ComposeOptions {
    pub indent: Indent,
    pub line_ending: LineEnding,
    /// Write multi-line text as text blocks instead of escaped quoted text.
    pub block_text: bool,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        ComposeOptions {
            indent: Indent::default(),
            line_ending: LineEnding::default(),
            block_text: true,
        }
    }
}

impl ComposeOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_indent(mut self, indent: Indent) -> Self {
        self.indent = indent;
        self
    }

    #[must_use]
    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    #[must_use]
    pub fn with_block_text(mut self, block_text: bool) -> Self {
        self.block_text = block_text;
        self
    }
}

/// Limits applied by the parser.
///
/// # Examples
///
/// ```rust
/// use sigil_format::ParserOptions;
///
/// let options = ParserOptions::new().with_max_depth(16);
/// assert_eq!(options.max_depth, 16);
/// ```
#[derive(Clone, Debug)]
pub struct ParserOptions {
    /// Deepest allowed nesting of values, counting the innermost one:
    /// `=1` is one level deep and `[[=1]]` is three.
    pub max_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions { max_depth: 256 }
    }
}

impl ParserOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
