use sigil_format::{
    compose_with_options, parse_str, ComposeOptions, Composite, Data, Error, Indent, LineEnding, Number,
    NumericFactory, Parser, Position, Registry, Result, StrSource, Tag, Value, ValueFactory,
};
use std::rc::Rc;

#[test]
fn test_numeric_literals() {
    let values = parse_str("=0 =-12 =+7 =1.5 =-2e-3 =6E2 =Inf =-Inf =NaN =123456789012345678901234567890")
        .unwrap();
    let numbers: Vec<_> = values
        .iter()
        .map(|v| v.as_number().unwrap().clone())
        .collect();
    assert_eq!(numbers[0], Number::Integer(0));
    assert_eq!(numbers[1], Number::Integer(-12));
    assert_eq!(numbers[2], Number::Integer(7));
    assert_eq!(numbers[3], Number::Float(1.5));
    assert_eq!(numbers[4], Number::Float(-0.002));
    assert_eq!(numbers[5], Number::Float(600.0));
    assert_eq!(numbers[6], Number::Infinity);
    assert_eq!(numbers[7], Number::NegativeInfinity);
    assert!(numbers[8].as_f64().is_nan());
    assert_eq!(
        numbers[9].to_string(),
        "123456789012345678901234567890"
    );
}

#[test]
fn test_number_ends_at_first_non_literal_char() {
    let values = parse_str("[=1=2]").unwrap();
    let items = values[0].as_array().unwrap();
    assert_eq!(items.len(), 2);
}

#[test]
fn test_quoted_text_keeps_whitespace_and_unicode() {
    let values = parse_str("\"  ünïcødé \u{1F980}  \"").unwrap();
    assert_eq!(values[0].as_str().unwrap(), "  ünïcødé \u{1F980}  ");
}

#[test]
fn test_identifier_rules() {
    let values = parse_str("{_T9 a_1 =1 B2 =2} @_x9").unwrap();
    assert_eq!(values[0].tag(), Tag::composite("_T9"));
    assert!(values[0].has_anchor("_x9"));

    assert!(matches!(
        parse_str("{T a-b =1}"),
        Err(Error::MalformedValue { .. })
    ));
}

#[test]
fn test_layout_with_spaces_and_crlf() {
    let value = Rc::new(Value::from(vec![
        Value::from("multi\nline"),
        Value::from(vec![Value::from(1)]),
    ]));
    let options = ComposeOptions::new()
        .with_indent(Indent::Spaces(3))
        .with_line_ending(LineEnding::CrLf);
    let text = compose_with_options(&value, options).unwrap();
    assert_eq!(
        text,
        "[\r\n   | \\s\\s\\s\r\n      multi\r\n      line\r\n   |\r\n   [\r\n      =1\r\n   ]\r\n]"
    );
    let back = parse_str(&text).unwrap();
    assert_eq!(*back[0], *value);
}

#[test]
fn test_zero_width_indent_still_reads_back() {
    let value = Rc::new(Value::from(vec![Value::from("a\nb")]));
    let options = ComposeOptions::new().with_indent(Indent::Spaces(0));
    let text = compose_with_options(&value, options).unwrap();
    assert_eq!(text, "[\n|\n\ta\n\tb\n|\n]");
    assert_eq!(*parse_str(&text).unwrap()[0], *value);
}

/// Reads `<name>` as text, a syntax the built-in registry does not know.
struct AngleFactory;

impl ValueFactory for AngleFactory {
    fn produce(&self, parser: &mut Parser<'_>, start: Position) -> Result<Value> {
        let reader = parser.reader();
        let name = reader.read_until(|c| c == '>')?;
        reader.expect('>')?;
        if name.is_empty() {
            return Err(Error::malformed(start, reader.position(), "empty angle value"));
        }
        Ok(Value::text(name))
    }
}

#[test]
fn test_custom_factory_participates_in_nesting_and_anchors() {
    let mut parser = Parser::from_str("[ <alpha> @a =1 ] #a");
    parser.register_factory('<', AngleFactory);
    let list = parser.parse_next().unwrap();
    let reference = parser.parse_next().unwrap();
    assert_eq!(reference.as_str().unwrap(), "alpha");
    assert!(Rc::ptr_eq(&list.as_array().unwrap()[0], &reference));
}

#[test]
fn test_custom_factory_errors_propagate() {
    let mut parser = Parser::from_str("<>");
    parser.register_factory('<', AngleFactory);
    assert!(matches!(
        parser.parse_next(),
        Err(Error::MalformedValue { .. })
    ));

    let mut parser = Parser::from_str("[ <open");
    parser.register_factory('<', AngleFactory);
    match parser.parse_next() {
        Err(Error::MalformedValue {
            source: Some(cause),
            ..
        }) => assert!(matches!(*cause, Error::UnexpectedEndOfInput { .. })),
        other => panic!("expected wrapped end of input, got {:?}", other),
    }
}

/// `%` wraps exactly one nested value in a composite tagged `Boxed`.
fn boxed(parser: &mut Parser<'_>, start: Position) -> Result<Value> {
    match parser.parse_value()? {
        Some(inner) => Ok(Value::composite(
            Composite::new("Boxed").with_member("inner", inner),
        )),
        None => Err(Error::unexpected_end(start, "a boxed value")),
    }
}

#[test]
fn test_factory_can_read_nested_values() {
    let mut parser = Parser::from_str("%%=3");
    parser.register_factory('%', boxed);
    let outer = parser.parse_next().unwrap();
    let inner = outer.get("inner").unwrap().get("inner").unwrap();
    assert_eq!(inner.as_i64().unwrap(), 3);
}

#[test]
fn test_custom_registry() {
    let mut registry = Registry::new();
    registry.register('=', NumericFactory);
    let mut parser = Parser::with_registry(StrSource::new("=1 \"no\""), registry);
    assert_eq!(parser.parse_next().unwrap().as_i64().unwrap(), 1);
    assert!(matches!(
        parser.parse_next(),
        Err(Error::NoFactoryForSign { sign: '"', .. })
    ));
}

#[test]
fn test_hand_built_reference_composes_as_reference() {
    let value = Rc::new(Value::reference("elsewhere"));
    assert!(matches!(value.data(), Data::Reference(_)));
    assert_eq!(
        compose_with_options(&value, ComposeOptions::default()).unwrap(),
        "#elsewhere"
    );
}
