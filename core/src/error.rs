//! Error types for template validation, URI building, compilation and calls.
//!
//! # Design
//! The default (lenient) mode never produces `TemplateError` or
//! `BuildError`; they only surface when a configuration opts into strict
//! checking. `ConfigError::DuplicateEndpoint` is raised in both modes.
//! Transport failures are not represented here: they are reported through
//! the completion callback as [`TransportError`](crate::transport::TransportError).

use thiserror::Error;

use crate::http::HttpMethod;

/// A template that parses but cannot be built reliably.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// A `${` with no closing `}` after it.
    #[error("unterminated placeholder at byte {offset}")]
    Unterminated { offset: usize },

    /// `${}`.
    #[error("empty placeholder at byte {offset}")]
    EmptyPlaceholder { offset: usize },

    /// The same name is both a path variable and a query parameter.
    #[error("`{name}` is declared as both a path variable and a query parameter")]
    AmbiguousName { name: String },

    /// A `${name}` after the `?`, which never reaches the built URI.
    #[error("placeholder `{name}` appears in the query parameter list")]
    PlaceholderInQuery { name: String },
}

/// A strict-mode URI build that could not be completed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// An argument that is neither a path variable nor a query parameter.
    #[error("unknown argument `{name}`")]
    UnknownArgument { name: String },

    /// A path variable with no matching argument.
    #[error("no value supplied for path variable `{name}`")]
    Unresolved { name: String },
}

/// Errors raised while loading or compiling a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration document is not valid JSON for `ApiConfig`.
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// One endpoint name used under two verbs.
    #[error("endpoint `{name}` is defined under both {first} and {second}")]
    DuplicateEndpoint {
        name: String,
        first: HttpMethod,
        second: HttpMethod,
    },

    /// A template rejected by strict validation.
    #[error("endpoint `{name}`: {source}")]
    Template {
        name: String,
        #[source]
        source: TemplateError,
    },
}

/// Errors raised when invoking an endpoint through an `ApiTable`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    #[error("no endpoint named `{0}`")]
    UnknownEndpoint(String),

    /// A body was passed to a `DELETE`, `GET` or `HEAD` endpoint.
    #[error("endpoint `{name}` is {method} and does not accept a body")]
    BodyNotAccepted { name: String, method: HttpMethod },

    /// A `PATCH`, `POST` or `PUT` endpoint was called without a body.
    #[error("endpoint `{name}` is {method} and requires a body")]
    BodyRequired { name: String, method: HttpMethod },

    #[error(transparent)]
    Build(#[from] BuildError),
}
