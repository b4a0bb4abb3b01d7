//! Compile a declarative REST API description into callable endpoints.
//!
//! # Overview
//! An [`ApiConfig`] maps HTTP verbs to named URL templates such as
//! `/users/${id}/posts?status|limit`. [`compile`] turns it into an
//! [`ApiTable`] of endpoints; calling one substitutes path variables,
//! assembles the query string, and hands a fully resolved [`HttpRequest`] to
//! a caller-supplied [`Transport`] (host-does-IO pattern).
//!
//! # Design
//! - Parsing ([`pattern`]) and URI building ([`uri`]) are pure functions.
//! - Each compiled endpoint holds its defaults immutably and builds a fresh
//!   request per call, so endpoints are safe to share across threads.
//! - The verb decides the calling convention: `PATCH`/`POST`/`PUT` endpoints
//!   take a body, `DELETE`/`GET`/`HEAD` endpoints do not.
//! - Lenient by default: malformed templates and unknown arguments degrade
//!   silently (with `tracing` diagnostics). `strict: true` in the
//!   configuration turns them into errors.

pub mod error;
pub mod http;
pub mod pattern;
pub mod table;
pub mod transport;
pub mod uri;
pub mod wrapper;

pub use error::{BuildError, CallError, ConfigError, TemplateError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, RequestOptions};
pub use pattern::Pattern;
pub use table::{compile, ApiConfig, ApiTable, EndpointSpec};
pub use transport::{Completion, Transport, TransportError, WithDefaults};
pub use uri::Args;
pub use wrapper::{BodyWrapper, PlainWrapper, Wrapper};
