//! Route declarations and URL templates.
//!
//! A route template is a path with `{name}` placeholders for path variables,
//! optionally followed by a query expression listing the accepted query
//! parameters:
//!
//! ```text
//! /users/{id}/posts{?limit,offset,tag*}
//! ```
//!
//! A trailing `*` marks an exploded parameter that accepts repeated values
//! (`?tag=a&tag=b`). The router matches paths; this module only describes
//! which names a template declares.

use crate::annotation::Annotation;
use http::Method;
use std::fmt;

/// A query parameter declared by a URL template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryVariable {
    name: String,
    explode: bool,
}

impl QueryVariable {
    /// Returns the parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if repeated values are accepted.
    #[must_use]
    pub fn is_exploded(&self) -> bool {
        self.explode
    }
}

/// Parsed URL template.
///
/// # Example
///
/// ```rust
/// use boreas_core::UrlTemplate;
///
/// let template = UrlTemplate::parse("/users/{id}{?limit,tag*}");
///
/// assert_eq!(template.path(), "/users/{id}");
/// assert!(template.has_path_variable("id"));
/// assert!(!template.query_variable("limit").unwrap().is_exploded());
/// assert!(template.query_variable("tag").unwrap().is_exploded());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    raw: String,
    path_end: usize,
    path_variables: Vec<String>,
    query_variables: Vec<QueryVariable>,
}

impl UrlTemplate {
    /// Parses a template. Unterminated expressions are kept as literal text.
    #[must_use]
    pub fn parse(template: &str) -> Self {
        let mut path_end = template.len();
        let mut path_variables = Vec::new();
        let mut query_variables = Vec::new();

        let mut rest = template;
        let mut offset = 0;
        while let Some(open) = rest.find('{') {
            let Some(close) = rest[open..].find('}') else {
                break;
            };
            let expression = &rest[open + 1..open + close];

            match expression.strip_prefix('?').or_else(|| expression.strip_prefix('&')) {
                Some(names) => {
                    path_end = path_end.min(offset + open);
                    query_variables.extend(parse_query_names(names));
                }
                None if !expression.is_empty() => path_variables.push(expression.trim().to_string()),
                None => {}
            }

            offset += open + close + 1;
            rest = &rest[open + close + 1..];
        }

        Self {
            raw: template.to_string(),
            path_end,
            path_variables,
            query_variables,
        }
    }

    /// Returns the template as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the path part, without the query expression.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.raw[..self.path_end]
    }

    /// Returns the declared path variable names in order.
    #[must_use]
    pub fn path_variables(&self) -> &[String] {
        &self.path_variables
    }

    /// Returns `true` if the path declares `{name}`.
    #[must_use]
    pub fn has_path_variable(&self, name: &str) -> bool {
        self.path_variables.iter().any(|v| v == name)
    }

    /// Returns the declared query variables in order.
    #[must_use]
    pub fn query_variables(&self) -> &[QueryVariable] {
        &self.query_variables
    }

    /// Looks up a declared query variable.
    #[must_use]
    pub fn query_variable(&self, name: &str) -> Option<&QueryVariable> {
        self.query_variables.iter().find(|v| v.name == name)
    }
}

fn parse_query_names(names: &str) -> impl Iterator<Item = QueryVariable> + '_ {
    names
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| match name.strip_suffix('*') {
            Some(name) => QueryVariable {
                name: name.to_string(),
                explode: true,
            },
            None => QueryVariable {
                name: name.to_string(),
                explode: false,
            },
        })
}

impl fmt::Display for UrlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Declares the HTTP route a controller method serves.
///
/// A method carries at most one route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteAnnotation {
    method: Option<Method>,
    template: UrlTemplate,
}

impl RouteAnnotation {
    /// Declares a route for one HTTP method.
    #[must_use]
    pub fn new(method: Method, template: &str) -> Self {
        Self {
            method: Some(method),
            template: UrlTemplate::parse(template),
        }
    }

    /// Declares a route that matches any HTTP method.
    #[must_use]
    pub fn any(template: &str) -> Self {
        Self {
            method: None,
            template: UrlTemplate::parse(template),
        }
    }

    /// Returns the HTTP method, or `None` for any method.
    #[must_use]
    pub fn method(&self) -> Option<&Method> {
        self.method.as_ref()
    }

    /// Returns the URL template.
    #[must_use]
    pub fn template(&self) -> &UrlTemplate {
        &self.template
    }
}

impl Annotation for RouteAnnotation {}
