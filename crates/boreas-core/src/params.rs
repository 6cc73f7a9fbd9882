//! Named request parameters.
//!
//! [`Params`] stores ordered `(name, value)` pairs. It backs both the path
//! variables filled in by the router and the decoded query string, so a
//! name may appear more than once (`?tag=a&tag=b`).

use smallvec::SmallVec;

/// Number of pairs stored inline before spilling to the heap.
const INLINE_PARAMS: usize = 4;

/// Ordered, possibly repeated, named parameters.
///
/// # Example
///
/// ```rust
/// use boreas_core::Params;
///
/// let params = Params::from_query("tag=a&tag=b&limit=10");
///
/// assert_eq!(params.get("limit"), Some("10"));
/// assert_eq!(params.get_all("tag").collect::<Vec<_>>(), vec!["a", "b"]);
/// assert!(!params.contains("offset"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Params {
    inner: SmallVec<[(String, String); INLINE_PARAMS]>,
}

impl Params {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes an `application/x-www-form-urlencoded` query string.
    ///
    /// A query string that cannot be decoded yields an empty set.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        match serde_urlencoded::from_str::<Vec<(String, String)>>(query) {
            Ok(pairs) => pairs.into_iter().collect(),
            Err(error) => {
                tracing::warn!(%error, "Ignoring undecodable query string");
                Self::new()
            }
        }
    }

    /// Appends a parameter.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.push((name.into(), value.into()));
    }

    /// Returns the first value for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns every value for `name`, in order of appearance.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.inner
            .iter()
            .filter(move |(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` if at least one value exists for `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.inner.iter().any(|(n, _)| n == name)
    }

    /// Returns `true` if there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of stored pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Iterates over all pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}
