//! Declared controller methods and their arguments.
//!
//! A [`ComponentMethod`] is the dispatch-time description of a controller
//! method: its name, a unique [`MethodId`], the annotations attached to it,
//! and its arguments in declaration order. Each [`ComponentMethodArgument`]
//! keeps a handle to the owning method so resolvers can inspect the method's
//! annotations while deciding whether they support the argument.

use crate::annotation::{Annotation, Annotations};
use crate::types::ArgumentType;
use crate::AlreadyAnnotated;
use serde_json::Value;
use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use uuid::Uuid;

/// Unique identifier of a built [`ComponentMethod`].
///
/// Uses UUID v7, so identifiers sort by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodId(Uuid);

impl MethodId {
    /// Creates a new unique method ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for MethodId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Method-level data shared by the method and all of its arguments.
#[derive(Debug)]
pub struct MethodMetadata {
    id: MethodId,
    name: String,
    annotations: Annotations,
}

impl MethodMetadata {
    /// Returns the method ID.
    #[must_use]
    pub fn id(&self) -> MethodId {
        self.id
    }

    /// Returns the method name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the attached annotations.
    #[must_use]
    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}

/// Identity of an argument: owning method, name and declared type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArgumentKey {
    method: MethodId,
    name: String,
    type_id: TypeId,
}

impl ArgumentKey {
    /// Returns the owning method ID.
    #[must_use]
    pub fn method(&self) -> MethodId {
        self.method
    }

    /// Returns the argument name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// One declared argument of a controller method.
///
/// Equality and hashing use the argument identity ([`ArgumentKey`]).
#[derive(Clone)]
pub struct ComponentMethodArgument {
    method: Arc<MethodMetadata>,
    name: String,
    type_: ArgumentType,
    default: Option<Value>,
    optional: bool,
}

impl ComponentMethodArgument {
    /// Returns the argument name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared type.
    #[must_use]
    pub fn type_(&self) -> &ArgumentType {
        &self.type_
    }

    /// Returns the declared default value, if any.
    #[must_use]
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Returns `true` if the argument may be absent from the request.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Returns the owning method.
    #[must_use]
    pub fn method(&self) -> &MethodMetadata {
        &self.method
    }

    /// Returns the argument identity.
    #[must_use]
    pub fn key(&self) -> ArgumentKey {
        ArgumentKey {
            method: self.method.id,
            name: self.name.clone(),
            type_id: self.type_.id(),
        }
    }
}

impl PartialEq for ComponentMethodArgument {
    fn eq(&self, other: &Self) -> bool {
        self.method.id == other.method.id && self.name == other.name && self.type_ == other.type_
    }
}

impl Eq for ComponentMethodArgument {}

impl Hash for ComponentMethodArgument {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.method.id.hash(state);
        self.name.hash(state);
        self.type_.hash(state);
    }
}

impl fmt::Debug for ComponentMethodArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentMethodArgument")
            .field("method", &self.method.name)
            .field("name", &self.name)
            .field("type", &self.type_.readable_name())
            .field("optional", &self.optional)
            .finish()
    }
}

/// A controller method as seen by the dispatch layer.
///
/// # Example
///
/// ```rust
/// use boreas_core::{ComponentMethod, HttpRequest, RequestBodyAnnotation};
///
/// #[derive(serde::Deserialize)]
/// struct UserDto {
///     id: u64,
/// }
///
/// let method = ComponentMethod::builder("create_user")
///     .argument::<HttpRequest>("request")
///     .argument::<UserDto>("payload")
///     .annotate(RequestBodyAnnotation::new("payload"))
///     .unwrap()
///     .build();
///
/// assert_eq!(method.arguments().len(), 2);
/// assert!(method.get_argument("payload").unwrap().type_().is::<UserDto>());
/// ```
#[derive(Debug, Clone)]
pub struct ComponentMethod {
    metadata: Arc<MethodMetadata>,
    arguments: Vec<ComponentMethodArgument>,
}

impl ComponentMethod {
    /// Starts declaring a method.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> ComponentMethodBuilder {
        ComponentMethodBuilder::new(name)
    }

    /// Returns the method ID.
    #[must_use]
    pub fn id(&self) -> MethodId {
        self.metadata.id
    }

    /// Returns the method name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Returns the attached annotations.
    #[must_use]
    pub fn annotations(&self) -> &Annotations {
        &self.metadata.annotations
    }

    /// Returns the shared method metadata.
    #[must_use]
    pub fn metadata(&self) -> &MethodMetadata {
        &self.metadata
    }

    /// Returns the arguments in declaration order.
    #[must_use]
    pub fn arguments(&self) -> &[ComponentMethodArgument] {
        &self.arguments
    }

    /// Looks up an argument by name.
    #[must_use]
    pub fn get_argument(&self, name: &str) -> Option<&ComponentMethodArgument> {
        self.arguments.iter().find(|a| a.name == name)
    }
}

struct ArgumentSpec {
    name: String,
    type_: ArgumentType,
    default: Option<Value>,
    optional: bool,
}

/// Builder for [`ComponentMethod`].
///
/// Argument names are unique; declaring a name again replaces the earlier
/// declaration in place.
pub struct ComponentMethodBuilder {
    name: String,
    annotations: Annotations,
    arguments: Vec<ArgumentSpec>,
}

impl ComponentMethodBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotations: Annotations::new(),
            arguments: Vec::new(),
        }
    }

    /// Declares a required argument of type `T`.
    #[must_use]
    pub fn argument<T: Any>(self, name: impl Into<String>) -> Self {
        self.argument_of(name, ArgumentType::of::<T>())
    }

    /// Declares a required argument with an explicit type descriptor.
    #[must_use]
    pub fn argument_of(self, name: impl Into<String>, type_: ArgumentType) -> Self {
        self.push(ArgumentSpec {
            name: name.into(),
            type_,
            default: None,
            optional: false,
        })
    }

    /// Declares an argument of type `Option<T>` that may be absent.
    #[must_use]
    pub fn optional_argument<T: Any>(self, name: impl Into<String>) -> Self {
        self.push(ArgumentSpec {
            name: name.into(),
            type_: ArgumentType::of::<Option<T>>(),
            default: None,
            optional: true,
        })
    }

    /// Declares an argument of type `T` with a default used when absent.
    #[must_use]
    pub fn argument_with_default<T: Any>(self, name: impl Into<String>, default: Value) -> Self {
        self.push(ArgumentSpec {
            name: name.into(),
            type_: ArgumentType::of::<T>(),
            default: Some(default),
            optional: true,
        })
    }

    /// Attaches an annotation to the method.
    ///
    /// # Errors
    ///
    /// Returns [`AlreadyAnnotated`] if the annotation conflicts with one
    /// already attached.
    pub fn annotate<A: Annotation>(mut self, annotation: A) -> Result<Self, AlreadyAnnotated> {
        self.annotations.add(annotation)?;
        Ok(self)
    }

    /// Builds the method, assigning it a fresh [`MethodId`].
    ///
    /// Resolver caches are keyed by method id, so build each method once at
    /// startup and share it (clones keep the id). Building a method per
    /// request adds new cache entries on every call.
    #[must_use]
    pub fn build(self) -> ComponentMethod {
        let metadata = Arc::new(MethodMetadata {
            id: MethodId::new(),
            name: self.name,
            annotations: self.annotations,
        });

        let arguments = self
            .arguments
            .into_iter()
            .map(|spec| ComponentMethodArgument {
                method: Arc::clone(&metadata),
                name: spec.name,
                type_: spec.type_,
                default: spec.default,
                optional: spec.optional,
            })
            .collect();

        ComponentMethod { metadata, arguments }
    }

    fn push(mut self, spec: ArgumentSpec) -> Self {
        match self.arguments.iter_mut().find(|a| a.name == spec.name) {
            Some(existing) => *existing = spec,
            None => self.arguments.push(spec),
        }
        self
    }
}

impl fmt::Debug for ComponentMethodBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentMethodBuilder")
            .field("name", &self.name)
            .field("arguments", &self.arguments.len())
            .finish_non_exhaustive()
    }
}
