//! Declaration-time metadata attached to controller methods.
//!
//! Annotations are plain Rust values stored by type. Resolvers look them up
//! in their support checks, e.g. the request-body resolver asks the owning
//! method for its [`RequestBodyAnnotation`].
//!
//! # Example
//!
//! ```rust
//! use boreas_core::{Annotations, RequestBodyAnnotation};
//!
//! let mut annotations = Annotations::new();
//! annotations.add(RequestBodyAnnotation::new("payload")).unwrap();
//!
//! let body = annotations.get_one_or_none::<RequestBodyAnnotation>().unwrap();
//! assert_eq!(body.argument_name(), "payload");
//!
//! // A method binds at most one body.
//! let err = annotations.add(RequestBodyAnnotation::new("other")).unwrap_err();
//! assert_eq!(err.to_string(), "Cannot annotate twice: RequestBodyAnnotation");
//! ```

use crate::types::readable_type_name;
use crate::AlreadyAnnotated;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A value that can be attached to a method.
///
/// By default an annotation type may appear only once per method. Types that
/// can repeat override [`conflicts_with`](Annotation::conflicts_with).
pub trait Annotation: Any + Send + Sync + fmt::Debug {
    /// Returns `true` if `self` cannot coexist with an annotation of the same
    /// type that is already attached.
    fn conflicts_with(&self, existing: &Self) -> bool
    where
        Self: Sized,
    {
        let _ = existing;
        true
    }
}

/// Set of annotations keyed by annotation type.
#[derive(Clone, Default)]
pub struct Annotations {
    entries: HashMap<TypeId, Vec<Arc<dyn Any + Send + Sync>>>,
}

impl Annotations {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches an annotation.
    ///
    /// # Errors
    ///
    /// Returns [`AlreadyAnnotated`] if it conflicts with an attached
    /// annotation of the same type.
    pub fn add<A: Annotation>(&mut self, annotation: A) -> Result<(), AlreadyAnnotated> {
        let entries = self.entries.entry(TypeId::of::<A>()).or_default();

        let conflict = entries
            .iter()
            .filter_map(|existing| (**existing).downcast_ref::<A>())
            .any(|existing| annotation.conflicts_with(existing));
        if conflict {
            return Err(AlreadyAnnotated {
                annotation: readable_type_name(std::any::type_name::<A>()),
            });
        }

        entries.push(Arc::new(annotation));
        Ok(())
    }

    /// Returns the first annotation of type `A`, if any.
    #[must_use]
    pub fn get_one_or_none<A: Annotation>(&self) -> Option<&A> {
        self.get::<A>().next()
    }

    /// Iterates over all annotations of type `A` in attachment order.
    pub fn get<A: Annotation>(&self) -> impl Iterator<Item = &A> {
        self.entries
            .get(&TypeId::of::<A>())
            .into_iter()
            .flatten()
            .filter_map(|entry| (**entry).downcast_ref::<A>())
    }

    /// Returns `true` if an annotation of type `A` is attached.
    #[must_use]
    pub fn contains<A: Annotation>(&self) -> bool {
        self.entries
            .get(&TypeId::of::<A>())
            .is_some_and(|entries| !entries.is_empty())
    }

    /// Returns the total number of attached annotations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Returns `true` if nothing is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Annotations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Annotations")
            .field("annotation_count", &self.len())
            .finish()
    }
}

/// Binds the parsed request body to the named argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBodyAnnotation {
    argument_name: String,
}

impl RequestBodyAnnotation {
    /// Binds the body to `argument_name`.
    #[must_use]
    pub fn new(argument_name: impl Into<String>) -> Self {
        Self {
            argument_name: argument_name.into(),
        }
    }

    /// Returns the bound argument name.
    #[must_use]
    pub fn argument_name(&self) -> &str {
        &self.argument_name
    }
}

impl Annotation for RequestBodyAnnotation {}

/// Maps a query parameter onto an argument with a different name.
///
/// A method may carry several mappings, but neither the query name nor the
/// target argument may repeat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapQueryParameterAnnotation {
    name: String,
    map_to: String,
}

impl MapQueryParameterAnnotation {
    /// Maps query parameter `name` onto the argument `map_to`.
    #[must_use]
    pub fn new(name: impl Into<String>, map_to: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            map_to: map_to.into(),
        }
    }

    /// Returns the query parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the target argument name.
    #[must_use]
    pub fn map_to(&self) -> &str {
        &self.map_to
    }
}

impl Annotation for MapQueryParameterAnnotation {
    fn conflicts_with(&self, existing: &Self) -> bool {
        self.name == existing.name || self.map_to == existing.map_to
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Tag(&'static str);

    impl Annotation for Tag {
        fn conflicts_with(&self, existing: &Self) -> bool {
            self.0 == existing.0
        }
    }

    #[test]
    fn test_empty_set() {
        let annotations = Annotations::new();
        assert!(annotations.is_empty());
        assert!(annotations.get_one_or_none::<RequestBodyAnnotation>().is_none());
        assert!(!annotations.contains::<RequestBodyAnnotation>());
    }

    #[test]
    fn test_repeatable_annotation() {
        let mut annotations = Annotations::new();
        annotations.add(Tag("a")).unwrap();
        annotations.add(Tag("b")).unwrap();

        let tags: Vec<_> = annotations.get::<Tag>().map(|t| t.0).collect();
        assert_eq!(tags, vec!["a", "b"]);
        assert_eq!(annotations.len(), 2);

        let err = annotations.add(Tag("a")).unwrap_err();
        assert_eq!(err.annotation, "Tag");
    }

    #[test]
    fn test_different_types_do_not_conflict() {
        let mut annotations = Annotations::new();
        annotations.add(RequestBodyAnnotation::new("body")).unwrap();
        annotations.add(Tag("body")).unwrap();
        assert!(annotations.contains::<RequestBodyAnnotation>());
        assert!(annotations.contains::<Tag>());
    }

    #[test]
    fn test_map_query_parameter_duplicate_target() {
        let mut annotations = Annotations::new();
        annotations
            .add(MapQueryParameterAnnotation::new("x", "query_param"))
            .unwrap();

        let err = annotations
            .add(MapQueryParameterAnnotation::new("y", "query_param"))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot annotate twice: MapQueryParameterAnnotation"
        );
    }

    #[test]
    fn test_map_query_parameter_duplicate_name() {
        let mut annotations = Annotations::new();
        annotations
            .add(MapQueryParameterAnnotation::new("x", "query_param1"))
            .unwrap();
        assert!(annotations
            .add(MapQueryParameterAnnotation::new("x", "query_param2"))
            .is_err());
    }

    #[test]
    fn test_map_query_parameter_distinct() {
        let mut annotations = Annotations::new();
        annotations
            .add(MapQueryParameterAnnotation::new("x", "x_param"))
            .unwrap();
        annotations
            .add(MapQueryParameterAnnotation::new("y", "y_param"))
            .unwrap();
        assert_eq!(annotations.get::<MapQueryParameterAnnotation>().count(), 2);
    }
}
