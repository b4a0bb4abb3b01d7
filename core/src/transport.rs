//! The seam between compiled endpoints and the HTTP client that sends them.
//!
//! # Design
//! The core never performs I/O. A `Transport` receives a fully resolved
//! `HttpRequest` plus a completion callback and returns whatever handle the
//! client uses for cancellation or chaining; compiled endpoints pass that
//! handle back to their caller untouched. Failures are reported only through
//! the callback and are never inspected here.

use std::sync::Arc;

use thiserror::Error;

use crate::http::{HttpRequest, HttpResponse, RequestOptions};

/// Errors a transport reports through the completion callback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request timed out")]
    Timeout,

    /// Anything else the client reports, as its message.
    #[error("{0}")]
    Other(String),
}

/// Completion callback: receives the response, or the transport's error.
pub type Completion = Box<dyn FnOnce(Result<HttpResponse, TransportError>) + Send + 'static>;

/// An HTTP client capability.
pub trait Transport: Send + Sync {
    /// Returned to the caller of a compiled endpoint as-is.
    type Handle;

    fn send(&self, request: HttpRequest, done: Completion) -> Self::Handle;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    type Handle = T::Handle;

    fn send(&self, request: HttpRequest, done: Completion) -> Self::Handle {
        (**self).send(request, done)
    }
}

/// A transport with default options laid under every outgoing request.
///
/// Options already present on the request win over the defaults. With empty
/// defaults every request passes through unchanged.
#[derive(Debug, Clone)]
pub struct WithDefaults<T> {
    inner: T,
    defaults: RequestOptions,
}

impl<T: Transport> WithDefaults<T> {
    pub fn new(inner: T, defaults: RequestOptions) -> Self {
        Self { inner, defaults }
    }

    pub fn defaults(&self) -> &RequestOptions {
        &self.defaults
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

impl<T: Transport> Transport for WithDefaults<T> {
    type Handle = T::Handle;

    fn send(&self, mut request: HttpRequest, done: Completion) -> Self::Handle {
        if !self.defaults.is_empty() {
            request.options = request.options.overlay_on(&self.defaults);
        }
        self.inner.send(request, done)
    }
}
