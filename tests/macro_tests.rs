use sigil_format::{compose, parse_str, value, Number, Tag, Value};
use std::rc::Rc;

#[test]
fn test_value_macro_numbers() {
    assert_eq!(value!(42), Value::numeric(Number::Integer(42)));
    assert_eq!(value!(3.5), Value::numeric(Number::Float(3.5)));
    assert_eq!(value!(-123), Value::numeric(Number::Integer(-123)));
    assert_eq!(value!(u64::MAX).to_string(), "=18446744073709551615");
}

#[test]
fn test_value_macro_strings() {
    assert_eq!(value!("hello world"), Value::text("hello world"));
    assert_eq!(value!(""), Value::text(""));
    assert_eq!(value!(String::from("owned")), Value::text("owned"));
}

#[test]
fn test_value_macro_arrays() {
    assert_eq!(value!([]), Value::array(Vec::new()));

    let mixed = value!([1, "hello", [2.5]]);
    assert_eq!(
        mixed,
        Value::from(vec![
            Value::from(1),
            Value::from("hello"),
            Value::from(vec![Value::from(2.5)]),
        ])
    );
}

#[test]
fn test_value_macro_composites() {
    let user = value!({User
        name: "Alice",
        roles: ["admin", "dev"],
        home: {Address city: "Oslo", zip: "0150"},
    });
    assert_eq!(user.tag(), Tag::composite("User"));
    assert_eq!(
        user.get("home").unwrap().get("zip").unwrap().as_str().unwrap(),
        "0150"
    );
}

#[test]
fn test_value_macro_matches_parsed_text() {
    let built = value!({Point x: 1, y: 2, label: "p"});
    let parsed = parse_str("{Point x =1 y =2 label \"p\"}").unwrap();
    assert_eq!(*parsed[0], built);
    assert_eq!(
        compose(&Rc::new(built)).unwrap(),
        "{Point\n\tx =1\n\ty =2\n\tlabel \"p\"\n}"
    );
}
