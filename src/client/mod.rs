//! Client which writes points to InfluxDB.
//!
//! # Arguments
//!
//!  * `url`: The URL where InfluxDB is running (ex. `http://localhost:8086`).
//!  * `database`: The Database against which writes will be run.
//!
//! # Examples
//!
//! ```rust
//! use influxdb_writer::Client;
//!
//! let client = Client::new("http://localhost:8086", "test").unwrap();
//!
//! assert_eq!(client.database_name(), Some("test"));
//! ```

pub mod config;
pub mod transport;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use http::header::{HeaderValue, AUTHORIZATION};
use http::{Method, StatusCode};
use serde_derive::Deserialize;
use tracing::{debug, warn};

use crate::point::options::{BoolOptions, FloatOptions, IntOptions, StringOptions, WriteOptions};
use crate::point::{Field, Point, TagSet, DEFAULT_FIELD_KEY};
use crate::Error;
use config::{normalize_host, ClientConfig};
use transport::{HttpRequest, HttpResponse, HttpTransport};

#[derive(Clone)]
/// Internal Representation of a Client
///
/// Cloning is cheap. A clone shares the transport but has its own database name.
pub struct Client {
    pub(crate) url: Arc<String>,
    pub(crate) parameters: Arc<BTreeMap<&'static str, String>>,
    pub(crate) tags: Arc<TagSet>,
    pub(crate) token: Option<HeaderValue>,
    pub(crate) transport: Arc<dyn HttpTransport>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("url", &self.url)
            .field("database", &self.database_name())
            .field("tags", &self.tags)
            .finish()
    }
}

/// Body of a `/query` response. Only the parts needed to spot statement errors are read.
#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    results: Vec<StatementResult>,
}

#[derive(Debug, Deserialize)]
struct StatementResult {
    #[serde(default)]
    error: Option<String>,
}

impl Client {
    /// Instantiates a new [`Client`](crate::Client) using [`ReqwestTransport`](transport::ReqwestTransport)
    ///
    /// # Arguments
    ///
    ///  * `url`: The URL where InfluxDB is running (ex. `http://localhost:8086`).
    ///  * `database`: The Database against which writes will be run.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use influxdb_writer::Client;
    ///
    /// let _client = Client::new("http://localhost:8086", "test").unwrap();
    /// ```
    ///
    /// # Errors
    ///
    /// [`Error::ConfigError`] if `url` is empty or has no scheme and authority.
    #[cfg(feature = "reqwest")]
    pub fn new<S1, S2>(url: S1, database: S2) -> Result<Self, Error>
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        Self::from_config(ClientConfig::new(url).database(database))
    }

    /// Instantiates a [`Client`](crate::Client) from a [`ClientConfig`] using [`ReqwestTransport`](transport::ReqwestTransport)
    #[cfg(feature = "reqwest")]
    pub fn from_config(config: ClientConfig) -> Result<Self, Error> {
        Self::with_transport(config, transport::ReqwestTransport::new())
    }

    /// Instantiates a [`Client`](crate::Client) which sends its requests through `transport`
    pub fn with_transport<T>(config: ClientConfig, transport: T) -> Result<Self, Error>
    where
        T: HttpTransport + 'static,
    {
        let url = normalize_host(&config.host)?;
        let mut parameters = BTreeMap::new();
        if let Some(database) = config.database {
            parameters.insert("db", database);
        }

        Ok(Client {
            url: Arc::new(url),
            parameters: Arc::new(parameters),
            tags: Arc::new(config.tags),
            token: None,
            transport: Arc::new(transport),
        })
    }

    /// Add authentication/authorization information to [`Client`](crate::Client)
    ///
    /// # Arguments
    ///
    /// * username: The Username for InfluxDB.
    /// * password: The Password for the user.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use influxdb_writer::Client;
    ///
    /// let _client = Client::new("http://localhost:9086", "test")
    ///     .unwrap()
    ///     .with_auth("admin", "password");
    /// ```
    pub fn with_auth<S1, S2>(mut self, username: S1, password: S2) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        let parameters = Arc::make_mut(&mut self.parameters);
        parameters.insert("u", username.into());
        parameters.insert("p", password.into());
        self
    }

    /// Add authorization token to [`Client`](crate::Client)
    ///
    /// Sent as `Authorization: Token <token>`, as expected by the InfluxDB 2.0
    /// compatibility API.
    ///
    /// # Errors
    ///
    /// [`Error::ConfigError`] if the token contains characters not allowed in a header value.
    pub fn with_token<S>(mut self, token: S) -> Result<Self, Error>
    where
        S: AsRef<str>,
    {
        let mut value = HeaderValue::from_str(&format!("Token {}", token.as_ref())).map_err(
            |err| Error::ConfigError {
                error: format!("invalid token: {}", err),
            },
        )?;
        value.set_sensitive(true);
        self.token = Some(value);
        Ok(self)
    }

    /// Adds a tag written with every point. Replaces an existing default tag of the same key.
    pub fn with_default_tag<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<crate::Type>,
    {
        Arc::make_mut(&mut self.tags).insert(key, value);
        self
    }

    /// Changes the database following writes go to.
    ///
    /// Calls already issued keep the database they were issued with. Clones of this client
    /// are not affected.
    pub fn set_database<S: Into<String>>(&mut self, database: S) {
        Arc::make_mut(&mut self.parameters).insert("db", database.into());
    }

    /// Returns the name of the database the client is using
    pub fn database_name(&self) -> Option<&str> {
        self.parameters.get("db").map(String::as_str)
    }

    /// Returns the URL of the InfluxDB installation the client is using
    pub fn database_url(&self) -> &str {
        &self.url
    }

    /// Returns the tags written with every point
    pub fn default_tags(&self) -> &TagSet {
        &self.tags
    }

    /// Pings the InfluxDB Server
    ///
    /// Returns a tuple of build type and version number. Missing headers are returned as empty strings.
    pub async fn ping(&self) -> Result<(String, String), Error> {
        let request = self.request(Method::GET, "ping", false);
        let res = self.send(request).await?;

        let header = |name: &str| {
            res.headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default()
                .to_owned()
        };

        Ok((header("X-Influxdb-Build"), header("X-Influxdb-Version")))
    }

    /// Creates database `name` by sending `CREATE DATABASE <name>` to `/query`.
    ///
    /// # Errors
    ///
    ///  * [`Error::ValidationError`] if `name` is empty. Nothing is sent.
    ///  * [`Error::ConnectionError`] if the request could not be sent.
    ///  * [`Error::HttpStatusError`] for any status other than `200`.
    ///  * [`Error::DatabaseError`] if the single statement result reports an error.
    pub async fn create_database<S: AsRef<str>>(&self, name: S) -> Result<(), Error> {
        let name = name.as_ref();
        if name.is_empty() {
            return Err(Error::validation("name is required"));
        }

        let mut request = self.request(Method::GET, "query", false);
        request
            .query
            .push(("q".to_string(), format!("CREATE DATABASE {}", name)));

        let res = self.send(request).await?;
        if res.status != StatusCode::OK {
            warn!(database = name, status = res.status.as_u16(), "create database failed");
            return Err(Error::HttpStatusError {
                code: res.status.as_u16(),
                body: res.text(),
            });
        }

        if let Some(error) = statement_error(&res) {
            warn!(database = name, %error, "create database rejected");
            return Err(Error::DatabaseError { error });
        }

        Ok(())
    }

    /// Writes raw line protocol to the configured database.
    ///
    /// `data` is sent as the request body unchanged. Both text and bytes are accepted.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use influxdb_writer::Client;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), influxdb_writer::Error> {
    /// let client = Client::new("http://localhost:8086", "test")?;
    /// client.write("weather,location=us-midwest temperature=82 1465839830100400200").await?;
    /// client.write(b"weather temperature=80".to_vec()).await?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    ///  * [`Error::ConnectionError`] if the request could not be sent.
    ///  * [`Error::NotWrittenError`] if the server answered `200` instead of `204`.
    ///  * [`Error::WriteFailedError`] for any other status.
    pub async fn write<B: Into<Vec<u8>>>(&self, data: B) -> Result<(), Error> {
        let mut request = self.request(Method::POST, "write", true);
        request.body = Some(data.into());

        let res = self.send(request).await?;
        match res.status {
            StatusCode::NO_CONTENT => Ok(()),
            StatusCode::OK => {
                warn!(status = 200, "write understood, but not written");
                Err(Error::NotWrittenError {
                    code: 200,
                    body: res.text(),
                })
            }
            status => {
                warn!(status = status.as_u16(), "write failed");
                Err(Error::WriteFailedError {
                    code: status.as_u16(),
                    body: res.text(),
                })
            }
        }
    }

    /// Writes a single point. The client's default tags are added beneath the point's own tags,
    /// which win on conflicting keys.
    pub async fn write_point(&self, point: Point) -> Result<(), Error> {
        let tags = self.tags.merged(point.tags());
        let line = point.with_tags(tags).to_line();
        self.write(line).await
    }

    /// Writes `value=<val>` into measurement `opts.name`.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use influxdb_writer::{Client, FloatOptions};
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), influxdb_writer::Error> {
    /// let client = Client::new("http://localhost:8086", "test")?;
    /// client
    ///     .write_float(FloatOptions::new("temperature").value(21.5).add_tag("room", "kitchen"))
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// [`Error::ValidationError`] if `opts.name` or `opts.val` is missing, otherwise as [`write`](Client::write).
    pub async fn write_float(&self, opts: FloatOptions) -> Result<(), Error> {
        let val = *opts.validate()?;
        self.write_options(opts, Field::float(val)).await
    }

    /// Writes `value=<val>i` into measurement `opts.name`.
    pub async fn write_int(&self, opts: IntOptions) -> Result<(), Error> {
        let val = *opts.validate()?;
        self.write_options(opts, Field::integer(val)).await
    }

    /// Writes `<key>=true|false` into measurement `opts.name`. `key` defaults to `value`.
    pub async fn write_bool(&self, opts: BoolOptions) -> Result<(), Error> {
        let val = *opts.validate()?;
        let field = Field::boolean(field_key(&opts), val);
        self.write_options(opts, field).await
    }

    /// Writes `<key>=<val>` into measurement `opts.name`. `key` defaults to `value`.
    ///
    /// `val` is written as-is; string field values have to be quoted by the caller.
    pub async fn write_string(&self, opts: StringOptions) -> Result<(), Error> {
        let val = opts.validate()?.clone();
        let field = Field::text(field_key(&opts), val);
        self.write_options(opts, field).await
    }

    async fn write_options<V>(&self, opts: WriteOptions<V>, field: Field) -> Result<(), Error> {
        let mut point = Point::new(opts.name, field).with_tags(opts.tags);
        if let Some(ts) = opts.ts {
            point = point.timestamp(ts);
        }
        self.write_point(point).await
    }

    fn request(&self, method: Method, endpoint: &str, with_db: bool) -> HttpRequest {
        let mut request = HttpRequest::new(method, format!("{}/{}", self.url, endpoint));
        request.query = self
            .parameters
            .iter()
            .filter(|(key, _)| with_db || **key != "db")
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect();

        if let Some(ref token) = self.token {
            request.headers.insert(AUTHORIZATION, token.clone());
        }

        request
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, Error> {
        debug!(
            method = %request.method,
            url = %request.url,
            database = request.query_param("db").unwrap_or_default(),
            "sending request"
        );

        self.transport.send(request).await.map_err(|error| {
            warn!(%error, "request could not be sent");
            Error::ConnectionError { error }
        })
    }
}

fn field_key<V>(opts: &WriteOptions<V>) -> String {
    match opts.key.as_deref() {
        Some(key) if !key.is_empty() => key.to_string(),
        _ => DEFAULT_FIELD_KEY.to_string(),
    }
}

/// The error of the only statement result, if the server reported one.
/// Bodies which are not JSON are treated as carrying no error.
fn statement_error(res: &HttpResponse) -> Option<String> {
    let body: QueryResponse = serde_json::from_slice(&res.body).ok()?;
    match body.results.as_slice() {
        [only] => only.error.clone().filter(|error| !error.is_empty()),
        _ => None,
    }
}
