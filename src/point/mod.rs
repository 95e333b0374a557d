//! Points and their parts, rendered into line protocol by [`encode_line`](crate::encode_line)
//!
//! # Examples
//!
//! ```rust
//! use influxdb_writer::{Field, Point};
//!
//! let point = Point::new("weather", Field::float(82.5))
//!     .add_tag("location", "us-midwest")
//!     .timestamp(11);
//!
//! assert_eq!(point.to_line(), "weather,location=us-midwest value=82.5 11");
//! ```

pub(crate) mod line_proto_term;
pub mod options;

use std::fmt::{self, Display, Formatter};
use std::iter::FromIterator;

use serde::de::{Deserialize, Deserializer};

use line_proto_term::encode_line;

/// Field key used when none is given
pub const DEFAULT_FIELD_KEY: &str = "value";

/// A scalar tag value
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Boolean(bool),
    Float(f64),
    SignedInteger(i64),
    UnsignedInteger(u64),
    Text(String),
}

impl Display for Type {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        use Type::*;

        match self {
            Boolean(x) => write!(f, "{}", x),
            Float(x) => write!(f, "{}", x),
            SignedInteger(x) => write!(f, "{}", x),
            UnsignedInteger(x) => write!(f, "{}", x),
            Text(text) => write!(f, "{text}", text = text),
        }
    }
}

macro_rules! from_impl {
        ( $variant:ident => $( $typ:ident ),+ ) => (
                $(
                    impl From<$typ> for Type {
                        fn from(b: $typ) -> Self {
                            Type::$variant(b.into())
                        }
                    }
                )+
        )
}
from_impl! {Boolean => bool}
from_impl! {Float => f32, f64}
from_impl! {SignedInteger => i8, i16, i32, i64}
from_impl! {UnsignedInteger => u8, u16, u32, u64}
from_impl! {Text => String}
impl From<&str> for Type {
    fn from(b: &str) -> Self {
        Type::Text(b.into())
    }
}
impl<T> From<&T> for Type
where
    T: Copy + Into<Type>,
{
    fn from(t: &T) -> Self {
        (*t).into()
    }
}

impl Type {
    /// Converts a JSON value into a tag value. `null` has no tag representation; arrays and
    /// objects are kept as their JSON text.
    pub(crate) fn from_json(value: serde_json::Value) -> Option<Type> {
        use serde_json::Value;

        match value {
            Value::Null => None,
            Value::Bool(b) => Some(Type::Boolean(b)),
            Value::Number(n) => n
                .as_i64()
                .map(Type::SignedInteger)
                .or_else(|| n.as_u64().map(Type::UnsignedInteger))
                .or_else(|| n.as_f64().map(Type::Float)),
            Value::String(s) => Some(Type::Text(s)),
            other => Some(Type::Text(other.to_string())),
        }
    }
}

/// Ordered tag mapping with unique keys.
///
/// Iteration follows insertion order. Inserting an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagSet(Vec<(String, Type)>);

impl TagSet {
    pub fn new() -> Self {
        TagSet(Vec::new())
    }

    pub fn insert<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<Type>,
    {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    /// Builder form of [`insert`](TagSet::insert)
    pub fn with<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Type>,
    {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Type> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Type)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns a copy of `self` with every tag of `overrides` applied on top.
    ///
    /// Keys present in both keep their position from `self` and take the value from `overrides`.
    pub fn merged(&self, overrides: &TagSet) -> TagSet {
        let mut merged = self.clone();
        merged.extend(overrides.0.iter().cloned());
        merged
    }
}

impl<K, V> Extend<(K, V)> for TagSet
where
    K: Into<String>,
    V: Into<Type>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for TagSet
where
    K: Into<String>,
    V: Into<Type>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tags = TagSet::new();
        tags.extend(iter);
        tags
    }
}

impl TagSet {
    /// Reads tags from JSON. Anything that is not an object yields no tags; `null` values are
    /// dropped.
    pub(crate) fn from_json(value: serde_json::Value) -> TagSet {
        match value {
            serde_json::Value::Object(map) => map
                .into_iter()
                .filter_map(|(k, v)| Type::from_json(v).map(|v| (k, v)))
                .collect(),
            _ => TagSet::new(),
        }
    }
}

impl<'de> Deserialize<'de> for TagSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        serde_json::Value::deserialize(deserializer).map(TagSet::from_json)
    }
}

/// The typed value of a point's single field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Float(f64),
    Integer(i64),
    Boolean(bool),
    /// Written verbatim, without quoting or escaping. Values needing quotes have to be
    /// passed pre-formatted, e.g. `"\"text\""`.
    Text(String),
}

/// One `key=value` field assignment
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    key: String,
    value: FieldValue,
}

impl Field {
    pub fn new<S: Into<String>>(key: S, value: FieldValue) -> Self {
        Field {
            key: key.into(),
            value,
        }
    }

    /// `value=<float>`
    pub fn float(value: f64) -> Self {
        Field::new(DEFAULT_FIELD_KEY, FieldValue::Float(value))
    }

    /// `value=<integer>i`
    pub fn integer(value: i64) -> Self {
        Field::new(DEFAULT_FIELD_KEY, FieldValue::Integer(value))
    }

    /// `<key>=true` or `<key>=false`
    pub fn boolean<S: Into<String>>(key: S, value: bool) -> Self {
        Field::new(key, FieldValue::Boolean(value))
    }

    /// `<key>=<raw text>`
    pub fn text<K: Into<String>, V: Into<String>>(key: K, value: V) -> Self {
        Field::new(key, FieldValue::Text(value.into()))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        use FieldValue::*;

        match &self.value {
            Float(x) => write!(f, "{}={}", self.key, x),
            Integer(x) => write!(f, "{}={}i", self.key, x),
            Boolean(x) => write!(f, "{}={}", self.key, x),
            Text(x) => write!(f, "{}={}", self.key, x),
        }
    }
}

/// A single observation: measurement, tags, one field and an optional timestamp
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    measurement: String,
    tags: TagSet,
    field: Field,
    timestamp: Option<i64>,
}

impl Point {
    pub fn new<S: Into<String>>(measurement: S, field: Field) -> Self {
        Point {
            measurement: measurement.into(),
            tags: TagSet::new(),
            field,
            timestamp: None,
        }
    }

    pub fn add_tag<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Type>,
    {
        self.tags.insert(key, value);
        self
    }

    /// Replaces all tags of the point
    pub fn with_tags(mut self, tags: TagSet) -> Self {
        self.tags = tags;
        self
    }

    pub fn timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn measurement(&self) -> &str {
        &self.measurement
    }

    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn get_timestamp(&self) -> Option<i64> {
        self.timestamp
    }

    /// Renders the point as one line of line protocol
    pub fn to_line(&self) -> String {
        encode_line(
            &self.measurement,
            &self.tags,
            &self.field.to_string(),
            self.timestamp,
        )
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}
