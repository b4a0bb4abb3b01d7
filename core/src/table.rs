//! Configuration model and the compiler that turns it into an endpoint table.
//!
//! # Design
//! `ApiConfig` mirrors the JSON configuration shape: a root URI, optional
//! transport defaults, and one map per HTTP verb from endpoint name to
//! template. `compile` walks the verbs in [`HttpMethod::ALL`] order and builds
//! one [`Wrapper`] per entry. Endpoint names form a single namespace across
//! all verbs; reusing a name is rejected rather than silently overwritten.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{CallError, ConfigError};
use crate::http::{HttpMethod, HttpResponse, RequestOptions};
use crate::pattern;
use crate::transport::{Transport, TransportError, WithDefaults};
use crate::uri::Args;
use crate::wrapper::{compile_wrapper, EndpointParts, Wrapper};

/// One endpoint: a bare template, or a template with its own request options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EndpointSpec {
    Template(String),
    #[serde(rename_all = "camelCase")]
    Detailed {
        #[serde(alias = "pathPattern")]
        template: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        request_options: Option<RequestOptions>,
    },
}

impl EndpointSpec {
    pub fn template(&self) -> &str {
        match self {
            EndpointSpec::Template(t) => t,
            EndpointSpec::Detailed { template, .. } => template,
        }
    }

    pub fn request_options(&self) -> Option<&RequestOptions> {
        match self {
            EndpointSpec::Template(_) => None,
            EndpointSpec::Detailed { request_options, .. } => request_options.as_ref(),
        }
    }
}

impl From<&str> for EndpointSpec {
    fn from(template: &str) -> Self {
        EndpointSpec::Template(template.to_string())
    }
}

impl From<String> for EndpointSpec {
    fn from(template: String) -> Self {
        EndpointSpec::Template(template)
    }
}

impl From<(&str, RequestOptions)> for EndpointSpec {
    fn from((template, options): (&str, RequestOptions)) -> Self {
        EndpointSpec::Detailed {
            template: template.to_string(),
            request_options: Some(options),
        }
    }
}

type EndpointMap = BTreeMap<String, EndpointSpec>;

/// A declarative API description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfig {
    pub root: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_defaults: Option<RequestOptions>,
    /// Validate templates at compile time and arguments at call time.
    #[serde(default)]
    pub strict: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<EndpointMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<EndpointMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<EndpointMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<EndpointMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<EndpointMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub put: Option<EndpointMap>,
}

impl ApiConfig {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn request_defaults(mut self, defaults: RequestOptions) -> Self {
        self.request_defaults = Some(defaults);
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Add an endpoint under `method`, replacing any same-named entry for
    /// that verb.
    pub fn endpoint(mut self, method: HttpMethod, name: impl Into<String>, spec: impl Into<EndpointSpec>) -> Self {
        self.verb_mut(method)
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), spec.into());
        self
    }

    pub fn verb(&self, method: HttpMethod) -> Option<&EndpointMap> {
        match method {
            HttpMethod::Delete => self.delete.as_ref(),
            HttpMethod::Get => self.get.as_ref(),
            HttpMethod::Head => self.head.as_ref(),
            HttpMethod::Patch => self.patch.as_ref(),
            HttpMethod::Post => self.post.as_ref(),
            HttpMethod::Put => self.put.as_ref(),
        }
    }

    fn verb_mut(&mut self, method: HttpMethod) -> &mut Option<EndpointMap> {
        match method {
            HttpMethod::Delete => &mut self.delete,
            HttpMethod::Get => &mut self.get,
            HttpMethod::Head => &mut self.head,
            HttpMethod::Patch => &mut self.patch,
            HttpMethod::Post => &mut self.post,
            HttpMethod::Put => &mut self.put,
        }
    }

    /// Every `(method, name, spec)` entry in compilation order.
    pub fn entries(&self) -> impl Iterator<Item = (HttpMethod, &str, &EndpointSpec)> {
        HttpMethod::ALL.into_iter().flat_map(move |method| {
            self.verb(method)
                .into_iter()
                .flatten()
                .map(move |(name, spec)| (method, name.as_str(), spec))
        })
    }
}

/// The compiled API surface: endpoint name to callable.
#[derive(Debug)]
pub struct ApiTable<T> {
    endpoints: BTreeMap<String, Wrapper<T>>,
}

impl<T: Transport> ApiTable<T> {
    pub fn get(&self, name: &str) -> Option<&Wrapper<T>> {
        self.endpoints.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.endpoints.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Invoke a `DELETE`, `GET` or `HEAD` endpoint by name.
    pub fn call<F>(&self, name: &str, args: &Args, done: F) -> Result<T::Handle, CallError>
    where
        F: FnOnce(Result<HttpResponse, TransportError>) + Send + 'static,
    {
        match self.lookup(name)? {
            Wrapper::Plain(w) => Ok(w.call(args, done)?),
            Wrapper::WithBody(w) => Err(CallError::BodyRequired {
                name: name.to_string(),
                method: w.endpoint().method(),
            }),
        }
    }

    /// Invoke a `PATCH`, `POST` or `PUT` endpoint by name.
    pub fn call_with_body<F>(&self, name: &str, args: &Args, body: impl Into<String>, done: F) -> Result<T::Handle, CallError>
    where
        F: FnOnce(Result<HttpResponse, TransportError>) + Send + 'static,
    {
        match self.lookup(name)? {
            Wrapper::WithBody(w) => Ok(w.call(args, body, done)?),
            Wrapper::Plain(w) => Err(CallError::BodyNotAccepted {
                name: name.to_string(),
                method: w.endpoint().method(),
            }),
        }
    }

    fn lookup(&self, name: &str) -> Result<&Wrapper<T>, CallError> {
        self.endpoints
            .get(name)
            .ok_or_else(|| CallError::UnknownEndpoint(name.to_string()))
    }
}

/// Compile `config` into an endpoint table dispatching through `transport`.
///
/// `requestDefaults`, when present, are applied by wrapping the transport in
/// [`WithDefaults`].
pub fn compile<T: Transport>(config: &ApiConfig, transport: T) -> Result<ApiTable<WithDefaults<T>>, ConfigError> {
    let defaults = config.request_defaults.clone().unwrap_or_default();
    let transport = Arc::new(WithDefaults::new(transport, defaults));
    let root: Arc<str> = Arc::from(config.root.as_str());

    let mut endpoints: BTreeMap<String, Wrapper<WithDefaults<T>>> = BTreeMap::new();
    for (method, name, spec) in config.entries() {
        if let Some(existing) = endpoints.get(name) {
            return Err(ConfigError::DuplicateEndpoint {
                name: name.to_string(),
                first: existing.method(),
                second: method,
            });
        }

        let template = spec.template();
        let pattern = pattern::parse(template);
        if config.strict {
            pattern::validate(&pattern, template).map_err(|source| ConfigError::Template {
                name: name.to_string(),
                source,
            })?;
        } else if let Some(overlap) = pattern.overlapping_names().next() {
            warn!(endpoint = %name, name = %overlap, "name is both path variable and query parameter; treating as path variable");
        }

        debug!(endpoint = %name, %method, template = %template, "compiled endpoint");
        let wrapper = compile_wrapper(EndpointParts {
            name: name.to_string(),
            method,
            root: Arc::clone(&root),
            pattern,
            options: spec.request_options().cloned(),
            strict: config.strict,
            transport: Arc::clone(&transport),
        });
        endpoints.insert(name.to_string(), wrapper);
    }

    info!(root = %config.root, endpoints = endpoints.len(), strict = config.strict, "compiled endpoint table");
    Ok(ApiTable { endpoints })
}
