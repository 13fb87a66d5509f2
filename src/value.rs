//! Parsed values.
//!
//! A [`Value`] pairs its variant data ([`Data`]) with the set of anchor
//! names bound to it. Values are shared as `Rc<Value>`: every reference to
//! an anchor resolves to the same allocation, so identity can be checked
//! with [`Rc::ptr_eq`].
//!
//! ## Core Types
//!
//! - [`Value`]: data plus anchor names
//! - [`Data`]: numeric, text, array, composite, or an unresolved reference
//! - [`Number`]: integers, floats, big integers and the special values
//! - [`Composite`]: a tagged, ordered set of named members
//! - [`Tag`]: the type class a value is queued under
//!
//! ## Extracting Values
//!
//! Each accessor names the one variant it accepts and fails with
//! [`Error::Conversion`](crate::Error::Conversion) otherwise:
//!
//! ```rust
//! use sigil_format::Value;
//!
//! let value = Value::from(42);
//! assert_eq!(value.as_i64().unwrap(), 42);
//! assert!(value.as_str().is_err());
//! ```

use crate::compose::Composer;
use crate::{ComposeOptions, Error, Members, Result};
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

/// A numeric value.
///
/// # Examples
///
/// ```rust
/// use sigil_format::Number;
///
/// let integer = Number::Integer(42);
/// let float = Number::Float(3.5);
///
/// assert!(integer.is_integer());
/// assert_eq!(integer.as_i64(), Some(42));
/// assert_eq!(float.as_f64(), 3.5);
/// assert!(Number::Infinity.is_special());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Number {
    Integer(i64),
    /// An integer literal too large for `i64`.
    Big(BigInt),
    Float(f64),
    Infinity,
    NegativeInfinity,
    NaN,
}

impl Number {
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_) | Number::Big(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }

    /// Returns `true` for `Inf`, `-Inf` and `NaN`.
    #[inline]
    #[must_use]
    pub const fn is_special(&self) -> bool {
        matches!(
            self,
            Number::Infinity | Number::NegativeInfinity | Number::NaN
        )
    }

    /// Converts to `i64` when no precision is lost.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sigil_format::Number;
    ///
    /// assert_eq!(Number::Float(42.0).as_i64(), Some(42));
    /// assert_eq!(Number::Float(42.5).as_i64(), None);
    /// assert_eq!(Number::Infinity.as_i64(), None);
    /// ```
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Integer(i) => Some(*i),
            Number::Big(big) => i64::try_from(big).ok(),
            Number::Float(f) => {
                // i64::MAX rounds up to 2^63 as f64, so the upper bound is exclusive.
                if f.fract() == 0.0
                    && *f >= -9_223_372_036_854_775_808.0
                    && *f < 9_223_372_036_854_775_808.0
                {
                    Some(*f as i64)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Converts to `f64`; big integers round to the nearest float.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            Number::Big(big) => big.to_f64().unwrap_or(f64::NAN),
            Number::Float(f) => *f,
            Number::Infinity => f64::INFINITY,
            Number::NegativeInfinity => f64::NEG_INFINITY,
            Number::NaN => f64::NAN,
        }
    }
}

/// Formats the literal as it appears after the numeric sign.
///
/// Finite floats always keep a decimal point or exponent so they read back
/// as floats.
impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Big(big) => write!(f, "{}", big),
            Number::Float(fl) if fl.is_nan() => f.write_str(crate::grammar::NAN_LITERAL),
            Number::Float(fl) if fl.is_infinite() && *fl > 0.0 => {
                f.write_str(crate::grammar::INFINITY_LITERAL)
            }
            Number::Float(fl) if fl.is_infinite() => {
                f.write_str(crate::grammar::NEG_INFINITY_LITERAL)
            }
            Number::Float(fl) => write!(f, "{:?}", fl),
            Number::Infinity => f.write_str(crate::grammar::INFINITY_LITERAL),
            Number::NegativeInfinity => f.write_str(crate::grammar::NEG_INFINITY_LITERAL),
            Number::NaN => f.write_str(crate::grammar::NAN_LITERAL),
        }
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Number::Integer(value as i64)
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Integer(value)
    }
}

impl From<u32> for Number {
    fn from(value: u32) -> Self {
        Number::Integer(value as i64)
    }
}

impl From<u64> for Number {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(i) => Number::Integer(i),
            Err(_) => Number::Big(BigInt::from(value)),
        }
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

impl From<BigInt> for Number {
    fn from(value: BigInt) -> Self {
        Number::Big(value)
    }
}

/// The type class of a value.
///
/// Composites are classed by their own tag, so a consumer can ask the parser
/// for "the next `Point`" as easily as for "the next array".
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    Numeric,
    Text,
    Array,
    Composite(String),
    Reference,
}

impl Tag {
    /// Shorthand for `Tag::Composite(tag.into())`.
    #[must_use]
    pub fn composite(tag: impl Into<String>) -> Self {
        Tag::Composite(tag.into())
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Numeric => f.write_str("Numeric"),
            Tag::Text => f.write_str("Text"),
            Tag::Array => f.write_str("Array"),
            Tag::Composite(tag) => f.write_str(tag),
            Tag::Reference => f.write_str("Reference"),
        }
    }
}

/// A named record: a tag and an ordered set of members.
#[derive(Clone, Debug, PartialEq)]
pub struct Composite {
    tag: String,
    members: Members,
}

impl Composite {
    pub fn new(tag: impl Into<String>) -> Self {
        Composite {
            tag: tag.into(),
            members: Members::new(),
        }
    }

    #[must_use]
    pub fn with_members(tag: impl Into<String>, members: Members) -> Self {
        Composite {
            tag: tag.into(),
            members,
        }
    }

    /// Builder-style insert.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sigil_format::{Composite, Value};
    ///
    /// let point = Composite::new("Point")
    ///     .with_member("x", Value::from(1))
    ///     .with_member("y", Value::from(2));
    /// assert_eq!(point.members().len(), 2);
    /// ```
    #[must_use]
    pub fn with_member(mut self, name: impl Into<String>, value: impl Into<Rc<Value>>) -> Self {
        self.members.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[must_use]
    pub fn members(&self) -> &Members {
        &self.members
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Rc<Value>> {
        self.members.get(name)
    }
}

/// The variant payload of a [`Value`].
#[derive(Clone, Debug, PartialEq)]
pub enum Data {
    Numeric(Number),
    Text(String),
    Array(Vec<Rc<Value>>),
    Composite(Composite),
    /// A `#name` back-reference.
    ///
    /// The parser always substitutes these with the bound value; they only
    /// survive in values built by hand, where they compose as `#name`.
    Reference(String),
}

/// A value together with the anchor names bound to it.
///
/// Equality compares data only; anchor names are binding metadata.
///
/// # Examples
///
/// ```rust
/// use sigil_format::{Value, Tag};
///
/// let text = Value::text("hello").with_anchor("greeting");
/// assert_eq!(text.tag(), Tag::Text);
/// assert_eq!(&*text.anchors(), ["greeting".to_string()]);
/// assert_eq!(text, Value::text("hello"));
/// ```
#[derive(Clone, Debug)]
pub struct Value {
    data: Data,
    anchors: RefCell<Vec<String>>,
}

impl Value {
    #[must_use]
    pub fn new(data: Data) -> Self {
        Value {
            data,
            anchors: RefCell::new(Vec::new()),
        }
    }

    pub fn numeric(number: impl Into<Number>) -> Self {
        Value::new(Data::Numeric(number.into()))
    }

    pub fn text(text: impl Into<String>) -> Self {
        Value::new(Data::Text(text.into()))
    }

    #[must_use]
    pub fn array(items: Vec<Rc<Value>>) -> Self {
        Value::new(Data::Array(items))
    }

    #[must_use]
    pub fn composite(composite: Composite) -> Self {
        Value::new(Data::Composite(composite))
    }

    pub fn reference(name: impl Into<String>) -> Self {
        Value::new(Data::Reference(name.into()))
    }

    /// Adds an anchor name while building a value by hand.
    #[must_use]
    pub fn with_anchor(self, name: impl Into<String>) -> Self {
        self.anchors.borrow_mut().push(name.into());
        self
    }

    #[must_use]
    pub fn data(&self) -> &Data {
        &self.data
    }

    #[must_use]
    pub fn tag(&self) -> Tag {
        match &self.data {
            Data::Numeric(_) => Tag::Numeric,
            Data::Text(_) => Tag::Text,
            Data::Array(_) => Tag::Array,
            Data::Composite(composite) => Tag::Composite(composite.tag.clone()),
            Data::Reference(_) => Tag::Reference,
        }
    }

    /// Anchor names bound to this value, in binding order.
    pub fn anchors(&self) -> Ref<'_, [String]> {
        Ref::map(self.anchors.borrow(), Vec::as_slice)
    }

    #[must_use]
    pub fn has_anchor(&self, name: &str) -> bool {
        self.anchors.borrow().iter().any(|anchor| anchor == name)
    }

    /// Only the parser calls this, while the value is still being read.
    pub(crate) fn bind_anchor(&self, name: String) {
        self.anchors.borrow_mut().push(name);
    }

    #[inline]
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self.data, Data::Numeric(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self.data, Data::Text(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self.data, Data::Array(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_composite(&self) -> bool {
        matches!(self.data, Data::Composite(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_reference(&self) -> bool {
        matches!(self.data, Data::Reference(_))
    }

    pub fn as_number(&self) -> Result<&Number> {
        match &self.data {
            Data::Numeric(n) => Ok(n),
            _ => Err(Error::conversion("numeric", self.tag())),
        }
    }

    /// Reads a numeric value as `i64`.
    ///
    /// Floats convert only when they have no fractional part.
    pub fn as_i64(&self) -> Result<i64> {
        let number = self.as_number()?;
        number
            .as_i64()
            .ok_or_else(|| Error::conversion("integer", format!("number {}", number)))
    }

    pub fn as_f64(&self) -> Result<f64> {
        Ok(self.as_number()?.as_f64())
    }

    pub fn as_str(&self) -> Result<&str> {
        match &self.data {
            Data::Text(s) => Ok(s),
            _ => Err(Error::conversion("text", self.tag())),
        }
    }

    pub fn as_array(&self) -> Result<&[Rc<Value>]> {
        match &self.data {
            Data::Array(items) => Ok(items),
            _ => Err(Error::conversion("array", self.tag())),
        }
    }

    pub fn as_composite(&self) -> Result<&Composite> {
        match &self.data {
            Data::Composite(composite) => Ok(composite),
            _ => Err(Error::conversion("composite", self.tag())),
        }
    }

    /// Looks up a member of a composite value.
    #[must_use]
    pub fn get(&self, member: &str) -> Option<&Rc<Value>> {
        match &self.data {
            Data::Composite(composite) => composite.get(member),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

/// Composes the value with default options.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut composer = Composer::new(ComposeOptions::default());
        self.compose(&mut composer).map_err(|_| fmt::Error)?;
        f.write_str(&composer.into_inner())
    }
}

impl TryFrom<&Value> for i64 {
    type Error = Error;

    fn try_from(value: &Value) -> Result<Self> {
        value.as_i64()
    }
}

impl TryFrom<&Value> for f64 {
    type Error = Error;

    fn try_from(value: &Value) -> Result<Self> {
        value.as_f64()
    }
}

impl TryFrom<&Value> for String {
    type Error = Error;

    fn try_from(value: &Value) -> Result<Self> {
        value.as_str().map(str::to_string)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::numeric(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::numeric(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::numeric(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::numeric(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::numeric(value)
    }
}

impl From<Number> for Value {
    fn from(value: Number) -> Self {
        Value::new(Data::Numeric(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::text(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::array(value.into_iter().map(Rc::new).collect())
    }
}

impl From<Vec<Rc<Value>>> for Value {
    fn from(value: Vec<Rc<Value>>) -> Self {
        Value::array(value)
    }
}

impl From<Composite> for Value {
    fn from(value: Composite) -> Self {
        Value::composite(value)
    }
}
