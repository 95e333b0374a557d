//! Configuration a [`Client`](crate::Client) is built from

use http::Uri;
use serde_derive::Deserialize;

use crate::point::{TagSet, Type};
use crate::Error;

/// # Examples
///
/// ```rust
/// use influxdb_writer::ClientConfig;
///
/// let config = ClientConfig::new("http://localhost:8086/ignored/path")
///     .database("telemetry")
///     .add_tag("host", "edge-1");
///
/// assert_eq!(config.database.as_deref(), Some("telemetry"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the server. Only scheme, host and port are kept.
    #[serde(default)]
    pub host: String,
    /// Database written to; the `db` parameter is left out while unset
    #[serde(default, alias = "db")]
    pub database: Option<String>,
    /// Tags added to every point written through the typed write calls
    #[serde(default)]
    pub tags: TagSet,
}

impl ClientConfig {
    pub fn new<S: Into<String>>(host: S) -> Self {
        ClientConfig {
            host: host.into(),
            ..Default::default()
        }
    }

    pub fn database<S: Into<String>>(mut self, database: S) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn tags(mut self, tags: TagSet) -> Self {
        self.tags = tags;
        self
    }

    pub fn add_tag<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Type>,
    {
        self.tags.insert(key, value);
        self
    }

    /// Reads a configuration from JSON. Non-object `tags` are ignored.
    ///
    /// # Errors
    ///
    /// [`Error::ConfigError`] when `value` is not an object or a member has the wrong type.
    pub fn from_json(value: serde_json::Value) -> Result<Self, Error> {
        if !value.is_object() {
            return Err(Error::ConfigError {
                error: "opts is required".to_string(),
            });
        }
        serde_json::from_value(value).map_err(|err| Error::ConfigError {
            error: err.to_string(),
        })
    }
}

/// Reduces `host` to `scheme://host[:port]`, dropping credentials, path and query.
pub(crate) fn normalize_host(host: &str) -> Result<String, Error> {
    if host.is_empty() {
        return Err(Error::ConfigError {
            error: "opts.host is required".to_string(),
        });
    }

    let uri: Uri = host.parse().map_err(|err| Error::ConfigError {
        error: format!("invalid host `{}`: {}", host, err),
    })?;

    match (uri.scheme_str(), uri.authority()) {
        (Some(scheme), Some(authority)) => Ok(match authority.port_u16() {
            Some(port) => format!("{}://{}:{}", scheme, authority.host(), port),
            None => format!("{}://{}", scheme, authority.host()),
        }),
        _ => Err(Error::ConfigError {
            error: format!("host `{}` must contain a scheme and an authority", host),
        }),
    }
}
