//! Type-directed value conversion.
//!
//! Arguments are declared with a runtime [`ArgumentType`], so decoding into
//! the declared type goes through a registry of `serde` decoders keyed by
//! [`TypeId`]. Every type an application binds from the body, the query
//! string, or the path must be registered once at startup.
//!
//! Textual inputs (query and path values) carry no type information, so
//! [`Converters::convert_text`] tries several JSON readings of the text and
//! keeps the first that decodes:
//!
//! 1. the text as a JSON string (`"abc"`)
//! 2. the text parsed as JSON (`42`, `true`, `{"a":1}`), or failing that
//!    as a number the way Rust's `str::parse` reads it (`007`, `+5`)
//! 3. the comma-separated parts as strings (`["a","b"]`)
//! 4. the comma-separated parts, each read as in step 2 (`[1,2]`)
//!
//! Repeated values skip the scalar readings.

use crate::{ArgumentValue, ConversionError};
use boreas_core::ArgumentType;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type Decoder = fn(Value) -> Result<ArgumentValue, serde_json::Error>;

fn decode<T: DeserializeOwned + Send + Sync + 'static>(
    value: Value,
) -> Result<ArgumentValue, serde_json::Error> {
    serde_json::from_value::<T>(value).map(|v| Arc::new(v) as ArgumentValue)
}

/// Registers `T`, `Option<T>` and `Vec<T>` for each listed type.
macro_rules! register_with_wrappers {
    ($converters:expr; $($ty:ty),* $(,)?) => {
        $(
            $converters.register::<$ty>();
            $converters.register::<Option<$ty>>();
            $converters.register::<Vec<$ty>>();
        )*
    };
}

/// Registry of decoders from JSON values to declared argument types.
///
/// # Example
///
/// ```rust
/// use boreas_core::ArgumentType;
/// use boreas_resolve::Converters;
/// use serde::Deserialize;
///
/// #[derive(Debug, Deserialize, PartialEq)]
/// struct UserDto {
///     id: u64,
/// }
///
/// let mut converters = Converters::with_defaults();
/// converters.register::<UserDto>();
///
/// let value = converters
///     .convert(serde_json::json!({"id": 1}), &ArgumentType::of::<UserDto>())
///     .unwrap();
/// assert_eq!(value.downcast_ref::<UserDto>(), Some(&UserDto { id: 1 }));
///
/// let limit = converters
///     .convert_text(&["20".to_string()], &ArgumentType::of::<u32>())
///     .unwrap();
/// assert_eq!(limit.downcast_ref::<u32>(), Some(&20));
/// ```
#[derive(Clone, Default)]
pub struct Converters {
    decoders: HashMap<TypeId, Decoder>,
}

impl Converters {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with strings, booleans, integers, floats and JSON
    /// values, each also as `Option<T>` and `Vec<T>`.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut converters = Self::new();
        register_with_wrappers!(converters;
            String, bool, char,
            i8, i16, i32, i64, isize,
            u8, u16, u32, u64, usize,
            f32, f64,
            Value,
        );
        converters
    }

    /// Registers a decoder for `T`.
    pub fn register<T: DeserializeOwned + Send + Sync + 'static>(&mut self) -> &mut Self {
        self.decoders.insert(TypeId::of::<T>(), decode::<T>);
        self
    }

    /// Returns `true` if a decoder exists for `type_`.
    #[must_use]
    pub fn supports(&self, type_: &ArgumentType) -> bool {
        self.decoders.contains_key(&type_.id())
    }

    /// Returns the number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    /// Returns `true` if no type is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    /// Decodes a JSON value into `type_`.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError`] if `type_` is not registered or the value
    /// does not decode.
    pub fn convert(&self, value: Value, type_: &ArgumentType) -> Result<ArgumentValue, ConversionError> {
        let decoder = self.decoder(type_)?;
        decoder(value).map_err(|e| ConversionError::Decode {
            type_name: type_.readable_name(),
            message: e.to_string(),
        })
    }

    /// Decodes textual values (query or path) into `type_`.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError`] if `type_` is not registered or no reading
    /// of the text decodes. The error reports the first failed reading.
    pub fn convert_text(
        &self,
        values: &[String],
        type_: &ArgumentType,
    ) -> Result<ArgumentValue, ConversionError> {
        let decoder = self.decoder(type_)?;

        let mut first_error = None;
        for candidate in text_candidates(values) {
            match decoder(candidate) {
                Ok(value) => return Ok(value),
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }

        Err(ConversionError::Decode {
            type_name: type_.readable_name(),
            message: first_error.map_or_else(|| "no value".to_string(), |e| e.to_string()),
        })
    }

    fn decoder(&self, type_: &ArgumentType) -> Result<Decoder, ConversionError> {
        self.decoders
            .get(&type_.id())
            .copied()
            .ok_or_else(|| ConversionError::NoConverter {
                type_name: type_.readable_name(),
            })
    }
}

fn text_candidates(values: &[String]) -> Vec<Value> {
    let strings = |parts: &[&str]| {
        Value::Array(parts.iter().map(|p| Value::String((*p).to_string())).collect())
    };
    let readings = |parts: &[&str]| Value::Array(parts.iter().map(|p| json_reading(p)).collect());

    match values {
        [] => Vec::new(),
        [single] => {
            let mut candidates = vec![Value::String(single.clone())];
            if let Some(parsed) = scalar_reading(single) {
                candidates.push(parsed);
            }
            let parts: Vec<&str> = single.split(',').collect();
            candidates.push(strings(&parts));
            candidates.push(readings(&parts));
            candidates
        }
        many => {
            let parts: Vec<&str> = many.iter().map(String::as_str).collect();
            vec![strings(&parts), readings(&parts)]
        }
    }
}

fn json_reading(text: &str) -> Value {
    scalar_reading(text).unwrap_or_else(|| Value::String(text.to_string()))
}

fn scalar_reading(text: &str) -> Option<Value> {
    serde_json::from_str(text).ok().or_else(|| number_reading(text.trim()))
}

fn number_reading(text: &str) -> Option<Value> {
    if let Ok(n) = text.parse::<i64>() {
        return Some(Value::from(n));
    }
    if let Ok(n) = text.parse::<u64>() {
        return Some(Value::from(n));
    }
    text.parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
}

impl fmt::Debug for Converters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converters")
            .field("registered", &self.decoders.len())
            .finish()
    }
}
