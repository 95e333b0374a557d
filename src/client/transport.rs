//! The HTTP seam of the [`Client`](crate::Client).
//!
//! The client never talks to the network itself. It hands an [`HttpRequest`] to an
//! [`HttpTransport`] and classifies the returned [`HttpResponse`]. With one of the
//! `reqwest-client-*` features enabled (the default), [`ReqwestTransport`] is used.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use http::{HeaderMap, Method, StatusCode};

/// Failure below HTTP, e.g. a refused connection. Handed to the caller unchanged.
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    /// Full URL without query string, e.g. `http://localhost:8086/write`
    pub url: String,
    /// Query string parameters, not yet encoded
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    pub fn new<S: Into<String>>(method: Method, url: S) -> Self {
        HttpRequest {
            method,
            url: url.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Value of the first query parameter named `key`
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: StatusCode) -> Self {
        HttpResponse {
            status,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    pub fn with_body<B: Into<Vec<u8>>>(mut self, body: B) -> Self {
        self.body = body.into();
        self
    }

    /// The body as text, with invalid UTF-8 replaced
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Sends a single request and resolves once, with either the response or a transport error.
///
/// Any status code, including `4xx` and `5xx`, is a response and must not be reported as a
/// [`TransportError`].
pub trait HttpTransport: Send + Sync {
    fn send(&self, request: HttpRequest) -> BoxFuture<'_, Result<HttpResponse, TransportError>>;
}

impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    fn send(&self, request: HttpRequest) -> BoxFuture<'_, Result<HttpResponse, TransportError>> {
        (**self).send(request)
    }
}

#[cfg(feature = "reqwest")]
pub use self::reqwest_transport::ReqwestTransport;

#[cfg(feature = "reqwest")]
mod reqwest_transport {
    use futures_util::future::{BoxFuture, FutureExt};

    use super::{HttpRequest, HttpResponse, HttpTransport, TransportError};

    /// [`HttpTransport`] backed by a [`reqwest::Client`]
    #[derive(Debug, Clone, Default)]
    pub struct ReqwestTransport {
        client: reqwest::Client,
    }

    impl ReqwestTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Uses a preconfigured client, e.g. one with timeouts or a proxy set
        pub fn with_client(client: reqwest::Client) -> Self {
            ReqwestTransport { client }
        }
    }

    impl HttpTransport for ReqwestTransport {
        fn send(
            &self,
            request: HttpRequest,
        ) -> BoxFuture<'_, Result<HttpResponse, TransportError>> {
            let mut builder = self
                .client
                .request(request.method, &request.url)
                .query(&request.query)
                .headers(request.headers);
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            async move {
                let res = builder.send().await?;
                let status = res.status();
                let headers = res.headers().clone();
                let body = res.bytes().await?.to_vec();
                Ok::<_, TransportError>(HttpResponse {
                    status,
                    headers,
                    body,
                })
            }
            .boxed()
        }
    }
}
