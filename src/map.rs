//! Ordered member map for composites.
//!
//! [`Members`] wraps an [`IndexMap`] so that members compose back in the
//! order they were read or inserted.
//!
//! ## Examples
//!
//! ```rust
//! use sigil_format::{Members, Value};
//! use std::rc::Rc;
//!
//! let mut members = Members::new();
//! members.insert("x".to_string(), Rc::new(Value::from(1)));
//! members.insert("y".to_string(), Rc::new(Value::from(2)));
//!
//! let names: Vec<_> = members.keys().cloned().collect();
//! assert_eq!(names, vec!["x", "y"]);
//! ```

use crate::Value;
use indexmap::IndexMap;
use std::rc::Rc;

/// An insertion-ordered map of member names to shared values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Members(IndexMap<String, Rc<Value>>);

impl Members {
    #[must_use]
    pub fn new() -> Self {
        Members(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Members(IndexMap::with_capacity(capacity))
    }

    /// Inserts a member, returning the previous value under that name.
    ///
    /// A replaced member keeps its original position.
    pub fn insert(&mut self, name: String, value: Rc<Value>) -> Option<Rc<Value>> {
        self.0.insert(name, value)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Rc<Value>> {
        self.0.get(name)
    }

    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Rc<Value>> {
        self.0.keys()
    }

    pub fn values(&self) -> indexmap::map::Values<'_, String, Rc<Value>> {
        self.0.values()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Rc<Value>> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Members {
    type Item = (&'a String, &'a Rc<Value>);
    type IntoIter = indexmap::map::Iter<'a, String, Rc<Value>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Members {
    type Item = (String, Rc<Value>);
    type IntoIter = indexmap::map::IntoIter<String, Rc<Value>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<(String, Rc<Value>)> for Members {
    fn from_iter<T: IntoIterator<Item = (String, Rc<Value>)>>(iter: T) -> Self {
        Members(IndexMap::from_iter(iter))
    }
}
