//! Compiled endpoint callables.
//!
//! # Design
//! A compiled endpoint keeps its root, pattern, verb and default options as
//! immutable data. Every invocation builds a brand-new `HttpRequest` from
//! those defaults plus the call's URI, method and body, so any number of
//! threads may call the same endpoint at once without seeing each other's
//! requests.
//!
//! The verb decides the calling convention: `PATCH`, `POST` and `PUT`
//! endpoints compile to [`BodyWrapper`], whose `call` takes a body; the rest
//! compile to [`PlainWrapper`], whose `call` does not.

use std::sync::Arc;

use tracing::trace;

use crate::error::BuildError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, RequestOptions};
use crate::pattern::Pattern;
use crate::transport::{Transport, TransportError};
use crate::uri::{self, Args};

/// State shared by both calling conventions.
#[derive(Debug)]
pub struct Endpoint<T> {
    name: String,
    method: HttpMethod,
    root: Arc<str>,
    pattern: Pattern,
    options: RequestOptions,
    strict: bool,
    transport: Arc<T>,
}

impl<T: Transport> Endpoint<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// The endpoint's own request options, before transport defaults.
    pub fn options(&self) -> &RequestOptions {
        &self.options
    }

    pub fn uri(&self, args: &Args) -> Result<String, BuildError> {
        if self.strict {
            uri::build_uri_strict(&self.root, args, &self.pattern)
        } else {
            Ok(uri::build_uri(&self.root, args, &self.pattern))
        }
    }

    fn request(&self, args: &Args, body: Option<String>) -> Result<HttpRequest, BuildError> {
        Ok(HttpRequest {
            method: self.method,
            uri: self.uri(args)?,
            options: self.options.clone(),
            body,
        })
    }

    fn dispatch<F>(&self, args: &Args, body: Option<String>, done: F) -> Result<T::Handle, BuildError>
    where
        F: FnOnce(Result<HttpResponse, TransportError>) + Send + 'static,
    {
        let request = self.request(args, body)?;
        trace!(endpoint = %self.name, method = %request.method, uri = %request.uri, "dispatching");
        Ok(self.transport.send(request, Box::new(done)))
    }
}

/// Endpoint compiled for `DELETE`, `GET` or `HEAD`: called with arguments only.
#[derive(Debug)]
pub struct PlainWrapper<T>(Endpoint<T>);

impl<T: Transport> PlainWrapper<T> {
    /// Build the request this call would send, without sending it.
    pub fn request(&self, args: &Args) -> Result<HttpRequest, BuildError> {
        self.0.request(args, None)
    }

    pub fn call<F>(&self, args: &Args, done: F) -> Result<T::Handle, BuildError>
    where
        F: FnOnce(Result<HttpResponse, TransportError>) + Send + 'static,
    {
        self.0.dispatch(args, None, done)
    }

    pub fn endpoint(&self) -> &Endpoint<T> {
        &self.0
    }
}

/// Endpoint compiled for `PATCH`, `POST` or `PUT`: called with arguments and a body.
#[derive(Debug)]
pub struct BodyWrapper<T>(Endpoint<T>);

impl<T: Transport> BodyWrapper<T> {
    /// Build the request this call would send, without sending it.
    pub fn request(&self, args: &Args, body: impl Into<String>) -> Result<HttpRequest, BuildError> {
        self.0.request(args, Some(body.into()))
    }

    pub fn call<F>(&self, args: &Args, body: impl Into<String>, done: F) -> Result<T::Handle, BuildError>
    where
        F: FnOnce(Result<HttpResponse, TransportError>) + Send + 'static,
    {
        self.0.dispatch(args, Some(body.into()), done)
    }

    pub fn endpoint(&self) -> &Endpoint<T> {
        &self.0
    }
}

/// A compiled endpoint in one of its two calling conventions.
#[derive(Debug)]
pub enum Wrapper<T> {
    Plain(PlainWrapper<T>),
    WithBody(BodyWrapper<T>),
}

impl<T: Transport> Wrapper<T> {
    pub fn endpoint(&self) -> &Endpoint<T> {
        match self {
            Wrapper::Plain(w) => w.endpoint(),
            Wrapper::WithBody(w) => w.endpoint(),
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.endpoint().method()
    }

    pub fn as_plain(&self) -> Option<&PlainWrapper<T>> {
        match self {
            Wrapper::Plain(w) => Some(w),
            Wrapper::WithBody(_) => None,
        }
    }

    pub fn as_with_body(&self) -> Option<&BodyWrapper<T>> {
        match self {
            Wrapper::WithBody(w) => Some(w),
            Wrapper::Plain(_) => None,
        }
    }
}

/// Everything needed to compile one endpoint.
#[derive(Debug)]
pub struct EndpointParts<T> {
    pub name: String,
    pub method: HttpMethod,
    pub root: Arc<str>,
    pub pattern: Pattern,
    pub options: Option<RequestOptions>,
    pub strict: bool,
    pub transport: Arc<T>,
}

/// Compile one endpoint into the calling convention its verb requires.
pub fn compile_wrapper<T: Transport>(parts: EndpointParts<T>) -> Wrapper<T> {
    let endpoint = Endpoint {
        name: parts.name,
        method: parts.method,
        root: parts.root,
        pattern: parts.pattern,
        options: parts.options.unwrap_or_default(),
        strict: parts.strict,
        transport: parts.transport,
    };
    if endpoint.method.takes_body() {
        Wrapper::WithBody(BodyWrapper(endpoint))
    } else {
        Wrapper::Plain(PlainWrapper(endpoint))
    }
}
