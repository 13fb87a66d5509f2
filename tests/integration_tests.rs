use serde::{Deserialize, Serialize};
use sigil_format::{
    compose, compose_all, from_str, parse_str, to_string, to_value, Composite, Error, Parser,
    Tag, TaggedQueue, Value,
};
use std::rc::Rc;

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct User {
    id: u32,
    name: String,
    active: bool,
    tags: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Product {
    sku: String,
    price: f64,
    quantity: u32,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Order {
    order_id: u32,
    customer: User,
    items: Vec<Product>,
    total: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<String>,
}

fn order() -> Order {
    Order {
        order_id: 12345,
        customer: User {
            id: 123,
            name: "Alice".to_string(),
            active: true,
            tags: vec!["vip".to_string()],
        },
        items: vec![
            Product {
                sku: "WIDGET-001".to_string(),
                price: 29.99,
                quantity: 2,
            },
            Product {
                sku: "GADGET-002".to_string(),
                price: 49.5,
                quantity: 1,
            },
        ],
        total: 109.48,
        note: Some("leave at the door\nring twice".to_string()),
    }
}

#[test]
fn test_end_to_end_example() {
    let values = parse_str("[ =2 \"x\" ]").unwrap();
    assert_eq!(values.len(), 1);
    let items = values[0].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].as_i64().unwrap(), 2);
    assert_eq!(items[1].as_str().unwrap(), "x");

    assert_eq!(compose(&values[0]).unwrap(), "[\n\t=2\n\t\"x\"\n]");
}

#[test]
fn test_reference_example() {
    let mut parser = Parser::from_str("\"v\" @n\n#n");
    let first = parser.parse_next().unwrap();
    let second = parser.parse_next().unwrap();
    assert_eq!(first.as_str().unwrap(), "v");
    assert_eq!(&*first.anchors(), ["n".to_string()]);
    assert!(Rc::ptr_eq(&first, &second));
}

#[test]
fn test_fifo_with_tag_skip() {
    let mut queue = TaggedQueue::new();
    queue.enqueue(Some("A"), "a1");
    queue.enqueue(Some("B"), "b");
    queue.enqueue(Some("A"), "a2");
    queue.enqueue(Some("C"), "c");

    assert_eq!(queue.dequeue_tagged(&"A"), Some("a1"));
    assert_eq!(queue.dequeue(), Some("b"));
    assert_eq!(queue.count_of(&"A"), 1);
    assert_eq!(queue.count_of(&"C"), 1);
    assert_eq!(queue.dequeue(), Some("a2"));
    assert_eq!(queue.dequeue(), Some("c"));
    assert_eq!(queue.dequeue(), None);
}

#[test]
fn test_tag_skip_through_parser() {
    let mut parser = Parser::from_str("{A n =1} {B} {A n =2} {C}");
    let a = Tag::composite("A");
    assert_eq!(
        parser.parse_next_tagged(&a).unwrap().get("n").unwrap().as_i64().unwrap(),
        1
    );
    assert_eq!(parser.parse_next().unwrap().tag(), Tag::composite("B"));

    let rest = parser.parse_all().unwrap();
    let tags: Vec<_> = rest.iter().map(|(tag, _)| tag.cloned()).collect();
    assert_eq!(
        tags,
        vec![Some(Tag::composite("A")), Some(Tag::composite("C"))]
    );
}

#[test]
fn test_anchor_uniqueness() {
    let values = parse_str("{Cfg port =80} @cfg [ #cfg #cfg #cfg ]").unwrap();
    let items = values[1].as_array().unwrap();
    for item in items {
        assert!(Rc::ptr_eq(&values[0], item));
    }

    let err = parse_str("=1 @cfg =2 @cfg").unwrap_err();
    match err {
        Error::DuplicateAnchorName { name, position } => {
            assert_eq!(name, "cfg");
            assert_eq!(position.index, 11);
        }
        other => panic!("expected DuplicateAnchorName, got {:?}", other),
    }
}

#[test]
fn test_forward_only_references() {
    let err = parse_str("#later =1 @later").unwrap_err();
    assert!(matches!(err, Error::UndefinedReference { ref name, .. } if name == "later"));

    let err = parse_str("[ #x =1 @x ]").unwrap_err();
    assert!(matches!(err, Error::UndefinedReference { .. }));
}

#[test]
fn test_member_may_reference_earlier_sibling_anchor() {
    let values = parse_str("{Pair first \"shared\" @s second #s}").unwrap();
    let first = values[0].get("first").unwrap();
    let second = values[0].get("second").unwrap();
    assert!(Rc::ptr_eq(first, second));
}

#[test]
fn test_member_cannot_reference_anchor_of_enclosing_composite() {
    let err = parse_str("{Node self #me} @me").unwrap_err();
    assert!(matches!(err, Error::UndefinedReference { ref name, .. } if name == "me"));

    let err = parse_str("[ =1 [ #outer ] ] @outer").unwrap_err();
    assert!(matches!(err, Error::UndefinedReference { .. }));
}

#[test]
fn test_indentation_contract() {
    let err = parse_str("| \\s\\s\n\tline\n|").unwrap_err();
    assert!(matches!(err, Error::MalformedValue { .. }));

    let values = parse_str("| \\s\\s\n  line\n|").unwrap();
    assert_eq!(values[0].as_str().unwrap(), "line");
}

#[test]
fn test_error_positions_are_described() {
    let err = parse_str("=1\n  [ =2\n    ?").unwrap_err();
    let text = err.to_string();
    assert!(text.contains("line 2, column 3 (index 5)"), "{}", text);
    assert!(text.contains("line 3, column 5"), "{}", text);
}

#[test]
fn test_values_before_failure_remain_available() {
    let mut parser = Parser::from_str("=1 \"two\" [ =3");
    assert!(parser.parse_next_tagged(&Tag::Array).is_err());
    assert_eq!(parser.parse_next().unwrap().as_i64().unwrap(), 1);
    assert_eq!(parser.parse_next().unwrap().as_str().unwrap(), "two");
    assert!(matches!(
        parser.parse_next(),
        Err(Error::MalformedValue { .. })
    ));
}

#[test]
fn test_canonical_round_trip() {
    let doc = concat!(
        "{Scene\n",
        "\tname \"demo\"\n",
        "\torigin {Point\n",
        "\t\tx =0\n",
        "\t\ty =-1.5\n",
        "\t} @o\n",
        "\tpath [\n",
        "\t\t#o\n",
        "\t\t{Point\n",
        "\t\t\tx =Inf\n",
        "\t\t\ty =NaN\n",
        "\t\t}\n",
        "\t]\n",
        "\tnotes |\n",
        "\t\tfirst\n",
        "\t\t  second\n",
        "\t|\n",
        "\tempty []\n",
        "}\n",
        "#o",
    );
    let values = parse_str(doc).unwrap();
    assert_eq!(values.len(), 2);
    assert_eq!(compose_all(&values).unwrap(), doc);
}

#[test]
fn test_whitespace_is_normalized() {
    let values = parse_str("{P   x=1\n\n y    [=2\t=3]}").unwrap();
    assert_eq!(
        compose(&values[0]).unwrap(),
        "{P\n\tx =1\n\ty [\n\t\t=2\n\t\t=3\n\t]\n}"
    );
}

#[test]
fn test_built_values_compose_and_parse() {
    let shared = Rc::new(Value::text("tag").with_anchor("t"));
    let composite = Composite::new("Item")
        .with_member("a", Rc::clone(&shared))
        .with_member("b", shared);
    let text = compose(&Rc::new(Value::composite(composite))).unwrap();
    assert_eq!(text, "{Item\n\ta \"tag\" @t\n\tb #t\n}");

    let values = parse_str(&text).unwrap();
    assert!(Rc::ptr_eq(
        values[0].get("a").unwrap(),
        values[0].get("b").unwrap()
    ));
}

#[test]
fn test_nested_struct() {
    let text = to_string(&order()).unwrap();
    println!("Order: {}", text);
    assert!(text.starts_with("{Order\n\torder_id =12345\n\tcustomer {User\n"));
    let order_back: Order = from_str(&text).unwrap();
    assert_eq!(order(), order_back);
}

#[test]
fn test_to_value_matches_parsed_text() {
    let value = to_value(&order()).unwrap();
    let text = to_string(&order()).unwrap();
    let parsed = parse_str(&text).unwrap();
    assert_eq!(*parsed[0], value);
}

#[test]
fn test_streaming_from_reader() {
    let input = std::io::Cursor::new(b"=1\n=2\n=3\n".to_vec());
    let sum: i64 = Parser::from_reader(input)
        .map(|value| value.and_then(|v| v.as_i64()))
        .sum::<Result<i64, Error>>()
        .unwrap();
    assert_eq!(sum, 6);
}
