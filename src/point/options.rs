//! Options accepted by the typed write calls of [`Client`](crate::Client)
//!
//! # Examples
//!
//! ```rust
//! use influxdb_writer::{BoolOptions, FloatOptions};
//!
//! let opts = FloatOptions::new("temperature")
//!     .value(21.5)
//!     .add_tag("room", "kitchen")
//!     .timestamp(1_600_000_000);
//! assert_eq!(opts.val, Some(21.5));
//!
//! let opts = BoolOptions::new("door").value(true).key("open");
//! assert_eq!(opts.key.as_deref(), Some("open"));
//! ```

use serde::de::DeserializeOwned;
use serde_derive::Deserialize;

use crate::point::{TagSet, Type};
use crate::Error;

/// Options for writing a single value into measurement `name`.
///
/// `name` and `val` are required. `key` overrides the field key for boolean and string
/// writes; float and integer writes always use `value`. `tags` are merged over the client's
/// default tags. `ts` is written as given, in the precision the server expects.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(bound(deserialize = "V: serde::Deserialize<'de>"))]
pub struct WriteOptions<V> {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub val: Option<V>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub tags: TagSet,
    #[serde(default)]
    pub ts: Option<i64>,
}

pub type FloatOptions = WriteOptions<f64>;
pub type IntOptions = WriteOptions<i64>;
pub type BoolOptions = WriteOptions<bool>;
pub type StringOptions = WriteOptions<String>;

impl<V> WriteOptions<V> {
    pub fn new<S: Into<String>>(name: S) -> Self {
        WriteOptions {
            name: name.into(),
            val: None,
            key: None,
            tags: TagSet::new(),
            ts: None,
        }
    }

    pub fn value<T: Into<V>>(mut self, val: T) -> Self {
        self.val = Some(val.into());
        self
    }

    pub fn key<S: Into<String>>(mut self, key: S) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn add_tag<K, T>(mut self, key: K, value: T) -> Self
    where
        K: Into<String>,
        T: Into<Type>,
    {
        self.tags.insert(key, value);
        self
    }

    pub fn timestamp(mut self, ts: i64) -> Self {
        self.ts = Some(ts);
        self
    }

    /// Checks the required options, in order: `name`, then `val`.
    ///
    /// Only an absent value is rejected; `0`, `false` and `""` are written as given.
    pub(crate) fn validate(&self) -> Result<&V, Error> {
        if self.name.is_empty() {
            return Err(Error::validation("opts.name is required"));
        }
        self.val
            .as_ref()
            .ok_or_else(|| Error::validation("opts.val is required"))
    }
}

impl<V: DeserializeOwned> WriteOptions<V> {
    /// Reads options from a JSON value, e.g. one relayed from another system.
    ///
    /// # Errors
    ///
    /// [`Error::TypeError`] when `value` is not an object or a member has the wrong type.
    /// Missing `name` or `val` are not reported here but by the write call itself.
    pub fn from_json(value: serde_json::Value) -> Result<Self, Error> {
        if !value.is_object() {
            return Err(Error::TypeError {
                error: "opts must be an object".to_string(),
            });
        }
        serde_json::from_value(value).map_err(|err| Error::TypeError {
            error: err.to_string(),
        })
    }
}
