//! Deserializing Rust types from parsed values.
//!
//! [`ValueDeserializer`] walks a [`Value`] tree and drives any
//! `Deserialize` implementation from it. Most users go through the crate
//! root instead:
//!
//! ```rust
//! use sigil_format::from_str;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Point { x: i32, y: i32 }
//!
//! let point: Point = from_str("{Point x =1 y =2}").unwrap();
//! assert_eq!(point, Point { x: 1, y: 2 });
//! ```
//!
//! ## Mapping
//!
//! | Value | Rust |
//! |-------|------|
//! | numeric | integers and floats; `=0` / `=1` for `bool` |
//! | text | `String`, `char`, unit enum variants |
//! | array | sequences and tuples |
//! | composite | structs and maps (the tag is ignored); enum variants named by the tag |
//!
//! Absent members deserialize as `None` for `Option` fields.

use crate::{Data, Error, Number, Result, Value};
use serde::de::value::StrDeserializer;
use serde::de::{self, IntoDeserializer};
use serde::forward_to_deserialize_any;
use std::rc::Rc;

fn str_deserializer(s: &str) -> StrDeserializer<'_, Error> {
    s.into_deserializer()
}

/// Deserializes from a borrowed [`Value`].
pub struct ValueDeserializer<'a> {
    value: &'a Value,
}

impl<'a> ValueDeserializer<'a> {
    #[must_use]
    pub fn new(value: &'a Value) -> Self {
        ValueDeserializer { value }
    }
}

impl<'de> de::Deserializer<'de> for ValueDeserializer<'_> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value.data() {
            Data::Numeric(Number::Integer(i)) => visitor.visit_i64(*i),
            Data::Numeric(Number::Big(big)) => match u64::try_from(big) {
                Ok(u) => visitor.visit_u64(u),
                Err(_) => match i128::try_from(big) {
                    Ok(i) => visitor.visit_i128(i),
                    Err(_) => visitor.visit_string(big.to_string()),
                },
            },
            Data::Numeric(number) => visitor.visit_f64(number.as_f64()),
            Data::Text(s) => visitor.visit_str(s),
            Data::Array(items) => visitor.visit_seq(SeqDeserializer::new(items)),
            Data::Composite(composite) => {
                visitor.visit_map(MapDeserializer::new(composite.members().iter()))
            }
            Data::Reference(name) => Err(Error::custom(format!(
                "unresolved reference #{} cannot be deserialized",
                name
            ))),
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value.data() {
            Data::Numeric(Number::Integer(0)) => visitor.visit_bool(false),
            Data::Numeric(Number::Integer(1)) => visitor.visit_bool(true),
            _ => Err(Error::conversion("=0 or =1", self.value.tag())),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value.data() {
            Data::Composite(composite) if composite.members().is_empty() => visitor.visit_unit(),
            _ => Err(Error::conversion("empty composite", self.value.tag())),
        }
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value.data() {
            Data::Text(variant) => visitor.visit_enum(str_deserializer(variant)),
            Data::Composite(composite) => visitor.visit_enum(EnumDeserializer {
                variant: composite.tag(),
                members: composite.members().iter(),
            }),
            _ => Err(Error::conversion("text or composite", self.value.tag())),
        }
    }

    forward_to_deserialize_any! {
        i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit seq tuple tuple_struct map struct identifier ignored_any
    }
}

struct SeqDeserializer<'a> {
    iter: std::slice::Iter<'a, Rc<Value>>,
}

impl<'a> SeqDeserializer<'a> {
    fn new(items: &'a [Rc<Value>]) -> Self {
        SeqDeserializer { iter: items.iter() }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer<'_> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct MapDeserializer<'a> {
    iter: indexmap::map::Iter<'a, String, Rc<Value>>,
    value: Option<&'a Value>,
}

impl<'a> MapDeserializer<'a> {
    fn new(iter: indexmap::map::Iter<'a, String, Rc<Value>>) -> Self {
        MapDeserializer { iter, value: None }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer<'_> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(str_deserializer(key)).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct EnumDeserializer<'a> {
    variant: &'a str,
    members: indexmap::map::Iter<'a, String, Rc<Value>>,
}

impl<'de, 'a> de::EnumAccess<'de> for EnumDeserializer<'a> {
    type Error = Error;
    type Variant = VariantDeserializer<'a>;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(str_deserializer(self.variant))?;
        Ok((
            variant,
            VariantDeserializer {
                members: self.members,
            },
        ))
    }
}

struct VariantDeserializer<'a> {
    members: indexmap::map::Iter<'a, String, Rc<Value>>,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer<'_> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        if self.members.len() == 0 {
            Ok(())
        } else {
            Err(Error::custom("expected a composite without members for a unit variant"))
        }
    }

    fn newtype_variant_seed<T>(mut self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        match (self.members.next(), self.members.len()) {
            (Some((name, value)), 0) if name == "value" => {
                seed.deserialize(ValueDeserializer::new(value))
            }
            _ => Err(Error::custom(
                "expected a composite with a single 'value' member for a newtype variant",
            )),
        }
    }

    fn tuple_variant<V>(self, _len: usize, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::unsupported_type("tuple variants"))
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_map(MapDeserializer::new(self.members))
    }
}

/// Deserializes a `T` from a parsed value.
///
/// # Examples
///
/// ```rust
/// use sigil_format::{from_value, parse_str};
///
/// let values = parse_str("[ =1 =2 =3 ]").unwrap();
/// let numbers: Vec<u8> = from_value(&values[0]).unwrap();
/// assert_eq!(numbers, vec![1, 2, 3]);
/// ```
///
/// # Errors
///
/// Returns an error if the value's shape does not match `T`.
pub fn from_value<T>(value: &Value) -> Result<T>
where
    T: de::DeserializeOwned,
{
    T::deserialize(ValueDeserializer::new(value))
}
