//! Errors that might happen in the crate

use thiserror::Error;

use crate::client::transport::TransportError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid client configuration: {error}")]
    /// Error happens when the client is constructed with a missing or malformed host
    ConfigError { error: String },

    #[error("{error}")]
    /// Error happens when an argument has the wrong shape, e.g. options which are not an object
    TypeError { error: String },

    #[error("{error}")]
    /// Error happens when a required argument is missing. No request is sent.
    ValidationError { error: String },

    #[error("Received non-200 status code: {code}")]
    /// Error happens when creating a database answers with anything but `HTTP 200`
    HttpStatusError { code: u16, body: String },

    #[error("InfluxDB encountered the following error: {error}")]
    /// Error which has happened inside InfluxDB
    DatabaseError { error: String },

    #[error("request understood, but not written")]
    /// Error happens when a write answers with `HTTP 200` instead of `HTTP 204`
    NotWrittenError { code: u16, body: String },

    #[error("request failed: {code}")]
    /// Error happens when a write answers with any status other than `HTTP 200` or `HTTP 204`
    WriteFailedError { code: u16, body: String },

    #[error("connection error: {error}")]
    /// Error happens when the transport fails before any response is received
    ConnectionError {
        #[source]
        error: TransportError,
    },
}

impl Error {
    /// The HTTP status code the server answered with, if the error carries one
    pub fn code(&self) -> Option<u16> {
        match self {
            Error::HttpStatusError { code, .. }
            | Error::NotWrittenError { code, .. }
            | Error::WriteFailedError { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// The raw response body, if the error carries one
    pub fn body(&self) -> Option<&str> {
        match self {
            Error::HttpStatusError { body, .. }
            | Error::NotWrittenError { body, .. }
            | Error::WriteFailedError { body, .. } => Some(body),
            _ => None,
        }
    }

    pub(crate) fn validation<S: Into<String>>(error: S) -> Self {
        Error::ValidationError {
            error: error.into(),
        }
    }
}
