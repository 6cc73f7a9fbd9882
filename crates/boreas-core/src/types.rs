//! Runtime type descriptors for declared arguments.
//!
//! Controller arguments are declared with an [`ArgumentType`], a small
//! runtime description of a Rust type. Rust has no class hierarchy, so a
//! type that should be treated as a specialization of another (for example a
//! request newtype that stands in for [`HttpRequest`](crate::HttpRequest))
//! declares that relationship explicitly with [`ArgumentType::extends`].

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Runtime description of a declared argument type.
///
/// Two descriptors are equal when they describe the same [`TypeId`]; the
/// declared lineage does not take part in equality or hashing.
///
/// # Example
///
/// ```rust
/// use boreas_core::ArgumentType;
///
/// struct Request;
/// struct AuthenticatedRequest;
///
/// let ty = ArgumentType::of::<AuthenticatedRequest>().extends::<Request>();
///
/// assert!(ty.is::<AuthenticatedRequest>());
/// assert!(ty.is_subtype_of::<Request>());
/// assert!(!ty.is::<Request>());
/// ```
#[derive(Clone)]
pub struct ArgumentType {
    id: TypeId,
    name: &'static str,
    ancestors: Vec<TypeId>,
}

impl ArgumentType {
    /// Describes the type `T`.
    #[must_use]
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            ancestors: Vec::new(),
        }
    }

    /// Declares `P` as an ancestor of this type.
    #[must_use]
    pub fn extends<P: Any>(mut self) -> Self {
        let parent = TypeId::of::<P>();
        if parent != self.id && !self.ancestors.contains(&parent) {
            self.ancestors.push(parent);
        }
        self
    }

    /// Returns the [`TypeId`] of the described type.
    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Returns the fully qualified type name.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.name
    }

    /// Returns the type name without module paths.
    #[must_use]
    pub fn readable_name(&self) -> String {
        readable_type_name(self.name)
    }

    /// Returns `true` if this describes exactly `T`.
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    /// Returns `true` if this describes `T` or a type declared to extend `T`.
    #[must_use]
    pub fn is_subtype_of<T: Any>(&self) -> bool {
        self.is_subtype_of_id(TypeId::of::<T>())
    }

    /// Same as [`is_subtype_of`](Self::is_subtype_of) for a known [`TypeId`].
    #[must_use]
    pub fn is_subtype_of_id(&self, id: TypeId) -> bool {
        self.id == id || self.ancestors.contains(&id)
    }
}

impl PartialEq for ArgumentType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ArgumentType {}

impl Hash for ArgumentType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ArgumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgumentType")
            .field("name", &self.name)
            .field("ancestors", &self.ancestors.len())
            .finish()
    }
}

impl fmt::Display for ArgumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.readable_name())
    }
}

/// Strips module paths from a type name, keeping generic structure.
///
/// # Example
///
/// ```rust
/// use boreas_core::readable_type_name;
///
/// assert_eq!(
///     readable_type_name("core::option::Option<alloc::vec::Vec<alloc::string::String>>"),
///     "Option<Vec<String>>"
/// );
/// assert_eq!(readable_type_name("i64"), "i64");
/// ```
#[must_use]
pub fn readable_type_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut segment = String::new();

    for ch in name.chars() {
        if ch.is_alphanumeric() || ch == '_' || ch == ':' {
            segment.push(ch);
        } else {
            flush_segment(&mut segment, &mut out);
            out.push(ch);
        }
    }
    flush_segment(&mut segment, &mut out);

    out
}

fn flush_segment(segment: &mut String, out: &mut String) {
    if segment.is_empty() {
        return;
    }
    out.push_str(segment.rsplit("::").next().unwrap_or(segment.as_str()));
    segment.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct Base;
    struct Derived;

    #[test]
    fn test_exact_type() {
        let ty = ArgumentType::of::<String>();
        assert!(ty.is::<String>());
        assert!(!ty.is::<i32>());
        assert_eq!(ty.readable_name(), "String");
    }

    #[test]
    fn test_declared_lineage() {
        let ty = ArgumentType::of::<Derived>().extends::<Base>();
        assert!(ty.is_subtype_of::<Derived>());
        assert!(ty.is_subtype_of::<Base>());
        assert!(!ty.is_subtype_of::<String>());
    }

    #[test]
    fn test_extends_self_is_ignored() {
        let ty = ArgumentType::of::<Base>().extends::<Base>().extends::<Base>();
        assert!(ty.ancestors.is_empty());
    }

    #[test]
    fn test_equality_ignores_lineage() {
        let plain = ArgumentType::of::<Derived>();
        let declared = ArgumentType::of::<Derived>().extends::<Base>();
        assert_eq!(plain, declared);

        let mut set = HashSet::new();
        set.insert(plain);
        assert!(set.contains(&declared));
    }

    #[test]
    fn test_readable_names() {
        assert_eq!(readable_type_name("alloc::string::String"), "String");
        assert_eq!(
            readable_type_name("std::collections::hash::map::HashMap<alloc::string::String, i32>"),
            "HashMap<String, i32>"
        );
        assert_eq!(readable_type_name("&str"), "&str");
        assert_eq!(readable_type_name("(u8, my_crate::dto::User)"), "(u8, User)");
        assert_eq!(readable_type_name("[my::Item; 4]"), "[Item; 4]");
    }

    #[test]
    fn test_display_uses_readable_name() {
        let ty = ArgumentType::of::<Option<String>>();
        assert_eq!(ty.to_string(), "Option<String>");
    }

    proptest::proptest! {
        #[test]
        fn prop_readable_name_keeps_last_segment(
            modules in proptest::collection::vec("[a-z_][a-z0-9_]{0,8}", 0..4),
            name in "[A-Z][A-Za-z0-9]{0,10}",
        ) {
            let mut path = modules.join("::");
            if !path.is_empty() {
                path.push_str("::");
            }
            path.push_str(&name);

            let generic = format!("core::option::Option<{path}>");
            proptest::prop_assert_eq!(readable_type_name(&path), name.clone());
            proptest::prop_assert_eq!(readable_type_name(&generic), format!("Option<{name}>"));
        }
    }
}
