/// Builds a [`Value`](crate::Value) with literal-like syntax.
///
/// - `[a, b, ...]` builds an array
/// - `{Tag name: v, ...}` builds a composite; members keep their order
/// - anything else goes through `Value::from`
///
/// # Examples
///
/// ```rust
/// use sigil_format::value;
///
/// let point = value!({Point x: 1, y: 2, tags: ["a", "b"]});
/// assert_eq!(point.as_composite().unwrap().tag(), "Point");
/// assert_eq!(point.get("tags").unwrap().as_array().unwrap().len(), 2);
/// ```
#[macro_export]
macro_rules! value {
    // Empty array
    ([]) => {
        $crate::Value::array(::std::vec::Vec::new())
    };

    // Non-empty array
    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::array(::std::vec![$(::std::rc::Rc::new($crate::value!($elem))),*])
    };

    // Composite without members
    ({ $tag:ident }) => {
        $crate::Value::composite($crate::Composite::new(stringify!($tag)))
    };

    // Composite with members
    ({ $tag:ident $($name:ident : $member:tt),* $(,)? }) => {{
        let composite = $crate::Composite::new(stringify!($tag))
            $(.with_member(stringify!($name), $crate::value!($member)))*;
        $crate::Value::composite(composite)
    }};

    // Any expression with a `From` conversion
    ($other:expr) => {
        $crate::Value::from($other)
    };
}

#[cfg(test)]
mod tests {
    use crate::{Number, Tag, Value};

    #[test]
    fn test_value_macro_scalars() {
        assert_eq!(value!(42), Value::numeric(Number::Integer(42)));
        assert_eq!(value!(3.5), Value::numeric(Number::Float(3.5)));
        assert_eq!(value!("hello"), Value::text("hello"));
        let n = 7;
        assert_eq!(value!(n), Value::from(7));
    }

    #[test]
    fn test_value_macro_arrays() {
        assert!(value!([]).as_array().unwrap().is_empty());

        let arr = value!([1, "two", [3]]);
        let items = arr.as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].as_i64().unwrap(), 1);
        assert_eq!(items[1].as_str().unwrap(), "two");
        assert_eq!(items[2].as_array().unwrap()[0].as_i64().unwrap(), 3);
    }

    #[test]
    fn test_value_macro_composites() {
        assert_eq!(value!({Unit}).tag(), Tag::composite("Unit"));

        let user = value!({User
            name: "Alice",
            age: 30,
            address: {Address city: "Oslo"},
        });
        let names: Vec<_> = user.as_composite().unwrap().members().keys().cloned().collect();
        assert_eq!(names, vec!["name", "age", "address"]);
        assert_eq!(
            user.get("address").unwrap().get("city").unwrap().as_str().unwrap(),
            "Oslo"
        );
    }
}
