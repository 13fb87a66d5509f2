//! Writing values back to text.
//!
//! The [`Composer`] is the writer every value composes itself into. It
//! tracks the indentation level and inserts the indentation lazily, at the
//! first fragment written on each line.
//!
//! Values that carry anchors are composed in full the first time and as a
//! `#name` reference to their first anchor afterwards, so shared values
//! survive a parse/compose round trip as the same instance.
//!
//! ## Examples
//!
//! ```rust
//! use sigil_format::{compose, parse_str, Value};
//! use std::rc::Rc;
//!
//! let value = Rc::new(Value::from(vec![Value::from(2), Value::from("x")]));
//! assert_eq!(compose(&value).unwrap(), "[\n\t=2\n\t\"x\"\n]");
//!
//! let shared = Rc::new(Value::from(7).with_anchor("seven"));
//! let list = Rc::new(Value::array(vec![shared.clone(), shared]));
//! let text = compose(&list).unwrap();
//! assert_eq!(text, "[\n\t=7 @seven\n\t#seven\n]");
//!
//! let back = parse_str(&text).unwrap();
//! let items = back[0].as_array().unwrap();
//! assert!(Rc::ptr_eq(&items[0], &items[1]));
//! ```

use crate::grammar::{
    self, ANCHOR_SIGN, ARRAY_CLOSE_SIGN, ARRAY_OPEN_SIGN, BLOCK_CLOSE_SIGN, BLOCK_OPEN_SIGN,
    COMPOSITE_CLOSE_SIGN, COMPOSITE_OPEN_SIGN, NUMERIC_SIGN, REFERENCE_SIGN, TEXT_SIGN,
};
use crate::{ComposeOptions, Data, Error, Result, Value};
use std::collections::HashMap;
use std::rc::Rc;

/// Accumulates composed text.
pub struct Composer {
    output: String,
    options: ComposeOptions,
    unit: String,
    level: usize,
    at_line_start: bool,
    written: HashMap<*const Value, Rc<Value>>,
    anchor_owners: HashMap<String, *const Value>,
}

impl Composer {
    #[must_use]
    pub fn new(options: ComposeOptions) -> Self {
        Composer {
            output: String::new(),
            unit: options.indent.unit(),
            options,
            level: 0,
            at_line_start: true,
            written: HashMap::new(),
            anchor_owners: HashMap::new(),
        }
    }

    #[must_use]
    pub fn options(&self) -> &ComposeOptions {
        &self.options
    }

    /// Appends a fragment, indenting first if it starts a line.
    pub fn write_str(&mut self, fragment: &str) {
        if fragment.is_empty() {
            return;
        }
        if self.at_line_start {
            self.write_indentation();
            self.at_line_start = false;
        }
        self.output.push_str(fragment);
    }

    pub fn line_break(&mut self) {
        self.output.push_str(self.options.line_ending.as_str());
        self.at_line_start = true;
    }

    pub fn increase_indent(&mut self) {
        self.level += 1;
    }

    pub fn decrease_indent(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    #[must_use]
    pub fn indent_level(&self) -> usize {
        self.level
    }

    /// Composes a value, or a reference to it if it was composed before.
    pub fn compose(&mut self, value: &Rc<Value>) -> Result<()> {
        let first_anchor = value.anchors().first().cloned();
        if let Some(name) = first_anchor {
            let key = Rc::as_ptr(value);
            if self.written.contains_key(&key) {
                check_identifier(&name)?;
                self.write_char(REFERENCE_SIGN);
                self.write_str(&name);
                return Ok(());
            }
            self.written.insert(key, Rc::clone(value));
        }
        value.compose(self)
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.output
    }

    /// Records that `owner` writes the anchor `name`.
    ///
    /// A name may only ever be written by one instance.
    fn claim_anchor(&mut self, name: &str, owner: *const Value) -> Result<()> {
        match self.anchor_owners.get(name) {
            Some(existing) if *existing != owner => Err(Error::ConflictingAnchor {
                name: name.to_string(),
            }),
            Some(_) => Ok(()),
            None => {
                self.anchor_owners.insert(name.to_string(), owner);
                Ok(())
            }
        }
    }

    fn write_char(&mut self, ch: char) {
        let mut buf = [0; 4];
        self.write_str(ch.encode_utf8(&mut buf));
    }

    fn write_indentation(&mut self) {
        for _ in 0..self.level {
            self.output.push_str(&self.unit);
        }
    }

    fn compose_block(&mut self, text: &str) {
        self.write_char(BLOCK_OPEN_SIGN);
        let spec = self.options.indent.block_spec();
        if !spec.is_empty() {
            self.write_str(" ");
            self.write_str(&spec);
        }
        let block_unit = self.options.indent.block_unit();
        for line in text.split('\n') {
            self.line_break();
            self.write_indentation();
            self.output.push_str(&block_unit);
            self.output.push_str(line);
            self.at_line_start = false;
        }
        self.line_break();
        self.write_char(BLOCK_CLOSE_SIGN);
    }

    fn compose_quoted(&mut self, text: &str) {
        let mut quoted = String::with_capacity(text.len() + 2);
        quoted.push(TEXT_SIGN);
        for ch in text.chars() {
            match ch {
                '"' => quoted.push_str("\\\""),
                '\\' => quoted.push_str("\\\\"),
                '\n' => quoted.push_str("\\n"),
                '\r' => quoted.push_str("\\r"),
                '\t' => quoted.push_str("\\t"),
                _ => quoted.push(ch),
            }
        }
        quoted.push(TEXT_SIGN);
        self.write_str(&quoted);
    }
}

impl Default for Composer {
    fn default() -> Self {
        Composer::new(ComposeOptions::default())
    }
}

fn check_identifier(name: &str) -> Result<()> {
    if grammar::is_identifier(name) {
        Ok(())
    } else {
        Err(Error::invalid_identifier(name))
    }
}

impl Value {
    /// Writes this value and its anchors into `composer`.
    ///
    /// Nested values go through [`Composer::compose`], so shared elements
    /// are written once.
    pub fn compose(&self, composer: &mut Composer) -> Result<()> {
        match self.data() {
            Data::Numeric(number) => {
                composer.write_char(NUMERIC_SIGN);
                composer.write_str(&number.to_string());
            }
            Data::Text(text) => {
                if composer.options().block_text && text.contains('\n') && !text.contains('\r') {
                    composer.compose_block(text);
                } else {
                    composer.compose_quoted(text);
                }
            }
            Data::Array(items) => {
                composer.write_char(ARRAY_OPEN_SIGN);
                if !items.is_empty() {
                    composer.increase_indent();
                    for item in items {
                        composer.line_break();
                        composer.compose(item)?;
                    }
                    composer.decrease_indent();
                    composer.line_break();
                }
                composer.write_char(ARRAY_CLOSE_SIGN);
            }
            Data::Composite(composite) => {
                check_identifier(composite.tag())?;
                composer.write_char(COMPOSITE_OPEN_SIGN);
                composer.write_str(composite.tag());
                if !composite.members().is_empty() {
                    composer.increase_indent();
                    for (name, member) in composite.members() {
                        check_identifier(name)?;
                        composer.line_break();
                        composer.write_str(name);
                        composer.write_str(" ");
                        composer.compose(member)?;
                    }
                    composer.decrease_indent();
                    composer.line_break();
                }
                composer.write_char(COMPOSITE_CLOSE_SIGN);
            }
            Data::Reference(name) => {
                check_identifier(name)?;
                composer.write_char(REFERENCE_SIGN);
                composer.write_str(name);
            }
        }

        for anchor in self.anchors().iter() {
            check_identifier(anchor)?;
            composer.claim_anchor(anchor, self)?;
            composer.write_str(" ");
            composer.write_char(ANCHOR_SIGN);
            composer.write_str(anchor);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_str, Composite, Indent, LineEnding, Number};

    fn compose_with(value: Value, options: ComposeOptions) -> Result<String> {
        let mut composer = Composer::new(options);
        composer.compose(&Rc::new(value))?;
        Ok(composer.into_inner())
    }

    fn compose_default_result(value: Value) -> Result<String> {
        compose_with(value, ComposeOptions::default())
    }

    fn compose_default(value: Value) -> String {
        compose_with(value, ComposeOptions::default()).unwrap()
    }

    #[test]
    fn test_indentation_is_lazy() {
        let mut composer = Composer::default();
        composer.write_str("a");
        composer.increase_indent();
        assert_eq!(composer.indent_level(), 1);
        composer.line_break();
        composer.line_break();
        composer.write_str("b");
        composer.decrease_indent();
        composer.decrease_indent();
        assert_eq!(composer.indent_level(), 0);
        composer.line_break();
        composer.write_str("c");
        assert_eq!(composer.into_inner(), "a\n\n\tb\nc");
    }

    #[test]
    fn test_scalars() {
        assert_eq!(compose_default(Value::from(-3)), "=-3");
        assert_eq!(compose_default(Value::from(2.0)), "=2.0");
        assert_eq!(compose_default(Value::numeric(Number::NaN)), "=NaN");
        assert_eq!(
            compose_default(Value::numeric(Number::NegativeInfinity)),
            "=-Inf"
        );
        assert_eq!(compose_default(Value::from("a\"b\\")), r#""a\"b\\""#);
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!(compose_default(Value::array(Vec::new())), "[]");
        assert_eq!(compose_default(Value::composite(Composite::new("Unit"))), "{Unit}");
    }

    #[test]
    fn test_composite_layout() {
        let point = Composite::new("Point")
            .with_member("x", Value::from(1))
            .with_member("tags", Value::from(vec![Value::from("a")]));
        assert_eq!(
            compose_default(Value::composite(point)),
            "{Point\n\tx =1\n\ttags [\n\t\t\"a\"\n\t]\n}"
        );
    }

    #[test]
    fn test_multiline_text_becomes_block() {
        let doc = Composite::new("Doc").with_member("body", Value::from("one\n\ttwo\n"));
        let text = compose_default(Value::composite(doc));
        assert_eq!(text, "{Doc\n\tbody |\n\t\tone\n\t\t\ttwo\n\t\t\n\t|\n}");

        let back = parse_str(&text).unwrap();
        assert_eq!(
            back[0].get("body").unwrap().as_str().unwrap(),
            "one\n\ttwo\n"
        );
    }

    #[test]
    fn test_block_with_spaces() {
        let options = ComposeOptions::new().with_indent(Indent::Spaces(2));
        let value = Value::from(vec![Value::from("a\nb")]);
        let text = compose_with(value, options).unwrap();
        assert_eq!(text, "[\n  | \\s\\s\n    a\n    b\n  |\n]");
        assert_eq!(
            parse_str(&text).unwrap()[0].as_array().unwrap()[0]
                .as_str()
                .unwrap(),
            "a\nb"
        );
    }

    #[test]
    fn test_block_text_disabled_or_carriage_return() {
        let quoted = ComposeOptions::new().with_block_text(false);
        assert_eq!(
            compose_with(Value::from("a\nb"), quoted).unwrap(),
            r#""a\nb""#
        );
        assert_eq!(compose_default(Value::from("a\r\nb")), r#""a\r\nb""#);
    }

    #[test]
    fn test_crlf_line_endings() {
        let options = ComposeOptions::new().with_line_ending(LineEnding::CrLf);
        let text = compose_with(Value::from(vec![Value::from("x\ny")]), options).unwrap();
        assert_eq!(text, "[\r\n\t|\r\n\t\tx\r\n\t\ty\r\n\t|\r\n]");
        let back = parse_str(&text).unwrap();
        assert_eq!(back[0].as_array().unwrap()[0].as_str().unwrap(), "x\ny");
    }

    #[test]
    fn test_anchors_are_written_after_value() {
        let value = Value::from(1).with_anchor("a").with_anchor("b");
        assert_eq!(compose_default(value), "=1 @a @b");
    }

    #[test]
    fn test_repeated_unanchored_value_is_written_twice() {
        let shared = Rc::new(Value::from(1));
        let list = Value::array(vec![shared.clone(), shared]);
        assert_eq!(compose_default(list), "[\n\t=1\n\t=1\n]");
    }

    #[test]
    fn test_anchor_name_written_by_one_instance_only() {
        let values = parse_str("=1 @t").unwrap();
        let copy = Rc::new((*values[0]).clone());
        let list = Value::array(vec![Rc::clone(&values[0]), copy]);
        assert!(matches!(
            compose_default_result(list),
            Err(Error::ConflictingAnchor { ref name }) if name == "t"
        ));

        let first = Rc::new(Value::from(1).with_anchor("x"));
        let second = Rc::new(Value::from(2).with_anchor("y").with_anchor("x"));
        let list = Value::array(vec![first, second]);
        assert!(matches!(
            compose_default_result(list),
            Err(Error::ConflictingAnchor { ref name }) if name == "x"
        ));

        let mut composer = Composer::default();
        composer.compose(&values[0]).unwrap();
        composer.line_break();
        composer.compose(&values[0]).unwrap();
        assert_eq!(composer.into_inner(), "=1 @t\n#t");
    }

    #[test]
    fn test_invalid_identifiers() {
        assert!(matches!(
            compose_with(Value::composite(Composite::new("no tag")), ComposeOptions::default()),
            Err(Error::InvalidIdentifier { .. })
        ));
        let bad_member = Composite::new("T").with_member("a-b", Value::from(1));
        assert!(matches!(
            compose_with(Value::composite(bad_member), ComposeOptions::default()),
            Err(Error::InvalidIdentifier { .. })
        ));
        assert!(matches!(
            compose_with(Value::from(1).with_anchor(""), ComposeOptions::default()),
            Err(Error::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn test_display_uses_default_options() {
        assert_eq!(Value::from(vec![Value::from(1)]).to_string(), "[\n\t=1\n]");
    }
}
