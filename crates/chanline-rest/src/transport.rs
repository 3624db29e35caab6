//! Transport capability traits.
//!
//! The rate-limited HTTP client lives outside this crate. Each resource
//! operation asks only for the verb it needs, so tests can hand in a mock
//! that implements a single trait. A concrete client implements all four
//! and gets [`Transport`] for free.

use async_trait::async_trait;
use bytes::Bytes;
use http::StatusCode;

use crate::bucket::BucketKey;
use crate::error::TransportError;

/// A request descriptor handed to the transport.
#[derive(Debug, Clone)]
pub struct Request {
    /// Rate-limit bucket the request is counted against.
    pub bucket: BucketKey,
    /// Path relative to the API base URL, query string included.
    pub endpoint: String,
    /// Encoded body, if any.
    pub body: Option<Bytes>,
    /// Media type of `body`.
    pub content_type: Option<String>,
}

impl Request {
    /// A body-less request.
    pub fn new(bucket: BucketKey, endpoint: impl Into<String>) -> Self {
        Self {
            bucket,
            endpoint: endpoint.into(),
            body: None,
            content_type: None,
        }
    }

    /// Attach a body and its media type.
    pub fn with_body(mut self, body: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self.content_type = Some(content_type.into());
        self
    }
}

/// Status and raw body returned by the transport.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code.
    pub status: StatusCode,
    /// Raw response body.
    pub body: Bytes,
}

impl Response {
    /// Build a response from parts.
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// The body as lossy UTF-8, for error reporting.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Issues `GET` requests.
#[async_trait]
pub trait Getter: Send + Sync {
    /// Dispatch a `GET`.
    async fn get(&self, request: Request) -> Result<Response, TransportError>;
}

/// Issues `POST` requests.
#[async_trait]
pub trait Poster: Send + Sync {
    /// Dispatch a `POST`.
    async fn post(&self, request: Request) -> Result<Response, TransportError>;
}

/// Issues `PATCH` requests.
#[async_trait]
pub trait Patcher: Send + Sync {
    /// Dispatch a `PATCH`.
    async fn patch(&self, request: Request) -> Result<Response, TransportError>;
}

/// Issues `DELETE` requests.
#[async_trait]
pub trait Deleter: Send + Sync {
    /// Dispatch a `DELETE`.
    async fn delete(&self, request: Request) -> Result<Response, TransportError>;
}

/// Every verb at once.
pub trait Transport: Getter + Poster + Patcher + Deleter {}

impl<T: Getter + Poster + Patcher + Deleter> Transport for T {}
