//! Endpoint template parsing.
//!
//! A template such as `/users/${id}/posts?status|limit` carries three things:
//! the base path before the first `?`, the `|`-separated query parameter names
//! after it, and the `${name}` path variables found anywhere in the string.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::TemplateError;

static PATH_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid placeholder regex"));

/// The structured form of an endpoint template.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pattern {
    pub base_path: String,
    pub query_params: Vec<String>,
    /// In order of appearance; repeated names are kept.
    pub path_vars: Vec<String>,
}

impl Pattern {
    pub fn is_path_var(&self, name: &str) -> bool {
        self.path_vars.iter().any(|v| v == name)
    }

    pub fn is_query_param(&self, name: &str) -> bool {
        self.query_params.iter().any(|p| p == name)
    }

    /// Names declared both as a path variable and a query parameter.
    ///
    /// Building resolves these as path variables.
    pub fn overlapping_names(&self) -> impl Iterator<Item = &str> {
        self.query_params
            .iter()
            .filter(|p| self.is_path_var(p))
            .map(String::as_str)
    }
}

/// Parse a template. Never fails: malformed placeholders are simply not
/// recognised as path variables.
pub fn parse(template: &str) -> Pattern {
    let (base_path, query_params) = match template.split_once('?') {
        Some((base, query)) => (base, query.split('|').map(str::to_string).collect()),
        None => (template, Vec::new()),
    };

    Pattern {
        base_path: base_path.to_string(),
        query_params,
        path_vars: path_vars(template),
    }
}

/// Every `${name}` in `template`, including any after the `?`.
pub fn path_vars(template: &str) -> Vec<String> {
    PATH_VAR
        .captures_iter(template)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Check `template` (already parsed into `pattern`) for constructs that
/// `parse` tolerates but that cannot build a correct URI.
pub fn validate(pattern: &Pattern, template: &str) -> Result<(), TemplateError> {
    let mut rest = template;
    let mut offset = 0;
    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        match after.find('}') {
            None => return Err(TemplateError::Unterminated { offset: offset + start }),
            Some(0) => return Err(TemplateError::EmptyPlaceholder { offset: offset + start }),
            Some(end) => {
                let consumed = start + 2 + end + 1;
                offset += consumed;
                rest = &rest[consumed..];
            }
        }
    }

    if let Some(query_start) = template.find('?') {
        let in_query = PATH_VAR
            .captures_iter(template)
            .find(|caps| caps.get(0).is_some_and(|m| m.start() > query_start));
        if let Some(caps) = in_query {
            return Err(TemplateError::PlaceholderInQuery {
                name: caps[1].to_string(),
            });
        }
    }

    if let Some(name) = pattern.overlapping_names().next() {
        return Err(TemplateError::AmbiguousName {
            name: name.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_base_path_and_query_params() {
        let p = parse("/users/${id}/posts?status|limit");
        assert_eq!(p.base_path, "/users/${id}/posts");
        assert_eq!(p.query_params, vec!["status", "limit"]);
        assert_eq!(p.path_vars, vec!["id"]);
    }

    #[test]
    fn parse_without_question_mark_has_no_query_params() {
        let p = parse("/health");
        assert_eq!(p.base_path, "/health");
        assert!(p.query_params.is_empty());
        assert!(p.path_vars.is_empty());
    }

    #[test]
    fn parse_splits_only_on_the_first_question_mark() {
        let p = parse("/a?b?c|d");
        assert_eq!(p.base_path, "/a");
        assert_eq!(p.query_params, vec!["b?c", "d"]);
    }

    #[test]
    fn path_vars_keep_order_and_duplicates() {
        let p = parse("/${org}/${repo}/compare/${org}");
        assert_eq!(p.path_vars, vec!["org", "repo", "org"]);
    }

    #[test]
    fn placeholders_after_the_query_mark_are_still_path_vars() {
        let p = parse("/search?${scope}|q");
        assert_eq!(p.base_path, "/search");
        assert_eq!(p.path_vars, vec!["scope"]);
        assert_eq!(p.query_params, vec!["${scope}", "q"]);
    }

    #[test]
    fn unbalanced_placeholders_are_not_path_vars() {
        let p = parse("/users/${id");
        assert!(p.path_vars.is_empty());
        let p = parse("/users/${}");
        assert!(p.path_vars.is_empty());
    }

    #[test]
    fn repeated_scans_are_independent() {
        assert_eq!(path_vars("/${a}"), vec!["a"]);
        assert_eq!(path_vars("/${a}"), vec!["a"]);
        assert_eq!(path_vars("/${b}/${c}"), vec!["b", "c"]);
    }

    #[test]
    fn validate_accepts_well_formed_templates() {
        let t = "/users/${id}?fields";
        assert_eq!(validate(&parse(t), t), Ok(()));
    }

    #[test]
    fn validate_rejects_unterminated_placeholder() {
        let t = "/a/${ok}/${broken";
        assert_eq!(
            validate(&parse(t), t),
            Err(TemplateError::Unterminated { offset: 9 })
        );
    }

    #[test]
    fn validate_rejects_empty_placeholder() {
        let t = "/a/${}";
        assert_eq!(
            validate(&parse(t), t),
            Err(TemplateError::EmptyPlaceholder { offset: 3 })
        );
    }

    #[test]
    fn validate_rejects_placeholder_after_query_mark() {
        let t = "/search?${scope}|q";
        assert_eq!(
            validate(&parse(t), t),
            Err(TemplateError::PlaceholderInQuery { name: "scope".to_string() })
        );
    }

    #[test]
    fn validate_rejects_names_used_for_path_and_query() {
        let t = "/users/${id}?id";
        assert_eq!(
            validate(&parse(t), t),
            Err(TemplateError::AmbiguousName { name: "id".to_string() })
        );
    }
}
