//! Request URI construction from a root, a parsed pattern and call arguments.
//!
//! # Design
//! Values are inserted verbatim; no percent-encoding or slash normalisation
//! happens beyond the single separator between root and base path. Query
//! fragments follow argument order, not declaration order.

use tracing::{debug, warn};

use crate::error::BuildError;
use crate::pattern::Pattern;

/// Ordered call arguments: endpoint parameter name to string value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args(Vec<(String, String)>);

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an argument, keeping insertion order.
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl ToString) {
        self.0.push((name.into(), value.to_string()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Args {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Args(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.to_string()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: ToString, const N: usize> From<[(K, V); N]> for Args {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Join a root URI and a base path with exactly one `/` between them.
pub fn join(root: &str, base_path: &str) -> String {
    let base_path = base_path.strip_prefix('/').unwrap_or(base_path);
    let mut uri = String::with_capacity(root.len() + base_path.len() + 1);
    uri.push_str(root);
    if !root.ends_with('/') {
        uri.push('/');
    }
    uri.push_str(base_path);
    uri
}

struct Assembled<'a> {
    uri: String,
    ignored: Vec<&'a str>,
    unresolved: Vec<&'a str>,
}

fn assemble<'a>(root: &str, args: &'a Args, pattern: &'a Pattern) -> Assembled<'a> {
    let mut uri = join(root, &pattern.base_path);
    let mut query = Vec::new();
    let mut ignored = Vec::new();

    for (name, value) in args.iter() {
        if pattern.is_path_var(name) {
            let token = format!("${{{name}}}");
            if uri.contains(&token) {
                uri = uri.replace(&token, value);
            } else {
                // Placeholder sits after the `?` or was already substituted.
                ignored.push(name);
            }
        } else if pattern.is_query_param(name) {
            query.push(format!("{name}={value}"));
        } else {
            ignored.push(name);
        }
    }

    let mut unresolved: Vec<&str> = Vec::new();
    for var in &pattern.path_vars {
        if uri.contains(&format!("${{{var}}}")) && !unresolved.contains(&var.as_str()) {
            unresolved.push(var);
        }
    }

    if !query.is_empty() {
        uri.push('?');
        uri.push_str(&query.join("&"));
    }

    Assembled {
        uri,
        ignored,
        unresolved,
    }
}

/// Build the request URI for `args`.
///
/// Arguments naming a path variable replace every `${name}` occurrence;
/// arguments naming a query parameter become `name=value` fragments; any
/// other argument is dropped. Path variables without an argument stay in the
/// URI as literal `${name}` text.
pub fn build_uri(root: &str, args: &Args, pattern: &Pattern) -> String {
    let built = assemble(root, args, pattern);
    for name in &built.ignored {
        debug!(argument = %name, "ignoring undeclared argument");
    }
    if !built.unresolved.is_empty() {
        warn!(uri = %built.uri, unresolved = ?built.unresolved, "path variables left unresolved");
    }
    built.uri
}

/// Like [`build_uri`], but reject arguments that cannot land in the URI and
/// placeholders still left in it instead of ignoring them.
pub fn build_uri_strict(root: &str, args: &Args, pattern: &Pattern) -> Result<String, BuildError> {
    let built = assemble(root, args, pattern);
    if let Some(name) = built.ignored.first() {
        return Err(BuildError::UnknownArgument {
            name: name.to_string(),
        });
    }
    if let Some(name) = built.unresolved.first() {
        return Err(BuildError::Unresolved {
            name: name.to_string(),
        });
    }
    Ok(built.uri)
}
