//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. Compiled
//! endpoints build an `HttpRequest` per invocation and hand it to a
//! [`Transport`](crate::transport::Transport); the transport owns the actual
//! network round-trip and reports back an `HttpResponse`.
//!
//! All fields use owned types (`String`, `Vec`, `BTreeMap`) so a request can
//! be moved into a transport, queued, or sent to another thread without
//! lifetime concerns.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// HTTP method for a request, in the fixed order endpoint tables are walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Delete,
    Get,
    Head,
    Patch,
    Post,
    Put,
}

impl HttpMethod {
    /// Every recognised verb, in compilation order.
    pub const ALL: [HttpMethod; 6] = [
        HttpMethod::Delete,
        HttpMethod::Get,
        HttpMethod::Head,
        HttpMethod::Patch,
        HttpMethod::Post,
        HttpMethod::Put,
    ];

    /// Upper-case method token as sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Delete => "DELETE",
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        }
    }

    /// Whether endpoints under this verb take a request body.
    pub fn takes_body(self) -> bool {
        matches!(self, HttpMethod::Patch | HttpMethod::Post | HttpMethod::Put)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transport-level options attached to a request.
///
/// `headers` and `timeout_ms` are understood by most transports; anything
/// else a transport wants (proxy settings, flags, ...) rides along in
/// `extra` untouched. Numeric and boolean header values in a configuration
/// are kept as their text form. `timeout` is accepted for `timeoutMs`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOptions {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty", deserialize_with = "scalar_headers")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, alias = "timeout", skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.timeout_ms.is_none() && self.extra.is_empty()
    }

    /// Return a new set of options with `self` laid over `base`.
    ///
    /// Headers and extra keys from `self` replace those in `base` one by one;
    /// `timeout_ms` from `self` wins when set. Neither input is modified.
    pub fn overlay_on(&self, base: &RequestOptions) -> RequestOptions {
        let mut merged = base.clone();
        merged
            .headers
            .extend(self.headers.iter().map(|(k, v)| (k.clone(), v.clone())));
        if self.timeout_ms.is_some() {
            merged.timeout_ms = self.timeout_ms;
        }
        merged
            .extra
            .extend(self.extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
    }
}

fn scalar_headers<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(name, value)| {
            let text = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                _ => {
                    return Err(D::Error::custom(format!(
                        "header `{name}` must be a string, number or bool"
                    )))
                }
            };
            Ok((name, text))
        })
        .collect()
}

/// A fully resolved request described as plain data.
///
/// Built fresh by every compiled endpoint invocation. The transport is
/// responsible for executing it and reporting the corresponding
/// `HttpResponse`.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub uri: String,
    pub options: RequestOptions,
    pub body: Option<String>,
}

/// An HTTP response described as plain data, produced by a transport.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}
