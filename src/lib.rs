//! Writes single points to InfluxDB over HTTP using line protocol.
//!
//! ## Currently Supported Features
//!
//! -   Creating databases
//! -   Writing raw line protocol, as text or bytes
//! -   Writing typed single-value points (float, integer, boolean, string) with tags and timestamps
//! -   Default tags added to every point
//! -   Authenticated and Unauthenticated Connections
//! -   `async`/`await` support
//! -   Pluggable HTTP transport, [reqwest](https://docs.rs/reqwest) by default
//!
//! # Quickstart
//!
//! ```rust,no_run
//! use influxdb_writer::{BoolOptions, Client, ClientConfig, FloatOptions, TagSet};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), influxdb_writer::Error> {
//!     let config = ClientConfig::new("http://localhost:8086")
//!         .database("test")
//!         .tags(TagSet::new().with("host", "edge-1"));
//!     let client = Client::from_config(config)?;
//!
//!     client.create_database("test").await?;
//!
//!     // weather,host=edge-1,location=us-midwest value=82.5 1465839830100400200
//!     client
//!         .write_float(
//!             FloatOptions::new("weather")
//!                 .value(82.5)
//!                 .add_tag("location", "us-midwest")
//!                 .timestamp(1_465_839_830_100_400_200),
//!         )
//!         .await?;
//!
//!     // door,host=edge-1 open=true
//!     client
//!         .write_bool(BoolOptions::new("door").value(true).key("open"))
//!         .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Line protocol subset
//!
//! Only whitespace and double quotes are escaped, in measurement names and tag values.
//! String field values are written verbatim and must be quoted by the caller.
//!
//! # License
//!
//! [![License: MIT](https://img.shields.io/badge/License-MIT-yellow.svg)](https://opensource.org/licenses/MIT)

#![allow(clippy::needless_doctest_main)]

mod client;
mod error;
mod point;

pub use client::config::ClientConfig;
#[cfg(feature = "reqwest")]
pub use client::transport::ReqwestTransport;
pub use client::transport::{HttpRequest, HttpResponse, HttpTransport, TransportError};
pub use client::Client;
pub use error::Error;
pub use point::line_proto_term::encode_line;
pub use point::options::{BoolOptions, FloatOptions, IntOptions, StringOptions, WriteOptions};
pub use point::{Field, FieldValue, Point, TagSet, Type, DEFAULT_FIELD_KEY};
