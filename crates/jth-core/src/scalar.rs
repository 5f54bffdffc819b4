//! Tagged scalar values and the keyed store shared by event contexts and jet
//! attributes.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, JthError};

/// Primitive type a configured variable is declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    /// Declared as `int`, stored as `i32`.
    Int,
    /// Declared as `float`, stored as `f32`.
    Float,
}

impl ScalarType {
    /// Parses a configuration type string. Only `int` and `float` are known.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "int" => Some(ScalarType::Int),
            "float" => Some(ScalarType::Float),
            _ => None,
        }
    }

    /// Returns the configuration spelling of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarType::Int => "int",
            ScalarType::Float => "float",
        }
    }
}

impl Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored value together with its type tag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Scalar {
    /// Integer payload.
    Int(i32),
    /// Floating point payload.
    Float(f32),
}

impl Scalar {
    /// Returns the type tag of the value.
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            Scalar::Int(_) => ScalarType::Int,
            Scalar::Float(_) => ScalarType::Float,
        }
    }

    /// Widens the value to a table coordinate.
    pub fn as_f64(&self) -> f64 {
        match *self {
            Scalar::Int(value) => f64::from(value),
            Scalar::Float(value) => f64::from(value),
        }
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for i32 {}
    impl Sealed for f32 {}
}

/// Rust types that may be stored in an [`AttributeStore`].
///
/// Sealed: only `i32` and `f32` implement it, so unsupported types are
/// rejected at compile time.
pub trait ContextValue: sealed::Sealed + Copy {
    /// The type tag matching `Self`.
    const SCALAR_TYPE: ScalarType;

    /// Wraps the value in its tagged form.
    fn into_scalar(self) -> Scalar;

    /// Unwraps a tagged value when the tag matches.
    fn from_scalar(scalar: Scalar) -> Option<Self>;
}

impl ContextValue for i32 {
    const SCALAR_TYPE: ScalarType = ScalarType::Int;

    fn into_scalar(self) -> Scalar {
        Scalar::Int(self)
    }

    fn from_scalar(scalar: Scalar) -> Option<Self> {
        match scalar {
            Scalar::Int(value) => Some(value),
            Scalar::Float(_) => None,
        }
    }
}

impl ContextValue for f32 {
    const SCALAR_TYPE: ScalarType = ScalarType::Float;

    fn into_scalar(self) -> Scalar {
        Scalar::Float(self)
    }

    fn from_scalar(scalar: Scalar) -> Option<Self> {
        match scalar {
            Scalar::Float(value) => Some(value),
            Scalar::Int(_) => None,
        }
    }
}

/// Ordered string keyed store of tagged scalars.
///
/// A key keeps the type it was first inserted with. Re-inserting a key needs
/// an explicit overwrite and the same type. The empty key is rejected.
#[derive(Debug, Clone)]
pub struct AttributeStore {
    values: BTreeMap<String, Scalar>,
    family: fn(ErrorInfo) -> JthError,
}

impl AttributeStore {
    /// Creates an empty store whose errors are reported in `family`.
    pub fn new(family: fn(ErrorInfo) -> JthError) -> Self {
        Self {
            values: BTreeMap::new(),
            family,
        }
    }

    fn error(&self, code: &str, message: &str, key: &str) -> JthError {
        (self.family)(ErrorInfo::new(code, message).with_context("key", key))
    }

    /// Inserts a new key. Fails if the key already exists.
    pub fn set_value<T: ContextValue>(&mut self, key: &str, value: T) -> Result<(), JthError> {
        self.set_value_with(key, value, false)
    }

    /// Inserts a key, replacing an existing value of the same type when
    /// `allow_overwrite` is set.
    pub fn set_value_with<T: ContextValue>(
        &mut self,
        key: &str,
        value: T,
        allow_overwrite: bool,
    ) -> Result<(), JthError> {
        if key.is_empty() {
            return Err(self.error("empty-key", "keys must not be empty", key));
        }
        if let Some(existing) = self.values.get(key) {
            if !allow_overwrite {
                return Err(self.error("key-exists", "key is already set", key));
            }
            if existing.scalar_type() != T::SCALAR_TYPE {
                return Err(self
                    .error("type-mismatch", "key was inserted with another type", key)
                    .map_info(|info| {
                        info.with_context("stored", existing.scalar_type().as_str())
                            .with_context("requested", T::SCALAR_TYPE.as_str())
                    }));
            }
        }
        self.values.insert(key.to_string(), value.into_scalar());
        Ok(())
    }

    /// Reads a key as `T`.
    pub fn get_value<T: ContextValue>(&self, key: &str) -> Result<T, JthError> {
        if key.is_empty() {
            return Err(self.error("empty-key", "keys must not be empty", key));
        }
        let scalar = self
            .values
            .get(key)
            .ok_or_else(|| self.error("key-not-found", "key is not set", key))?;
        T::from_scalar(*scalar).ok_or_else(|| {
            self.error("type-mismatch", "key holds another type", key)
                .map_info(|info| {
                    info.with_context("stored", scalar.scalar_type().as_str())
                        .with_context("requested", T::SCALAR_TYPE.as_str())
                })
        })
    }

    /// Reads a key with the type chosen at runtime and widens it.
    pub fn get_as(&self, key: &str, scalar_type: ScalarType) -> Result<f64, JthError> {
        match scalar_type {
            ScalarType::Int => self.get_value::<i32>(key).map(f64::from),
            ScalarType::Float => self.get_value::<f32>(key).map(f64::from),
        }
    }

    /// Returns the tagged value stored under `key`.
    pub fn get(&self, key: &str) -> Option<Scalar> {
        self.values.get(key).copied()
    }

    /// Returns whether any value is stored under `key`.
    pub fn is_available(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Returns whether a value of type `T` is stored under `key`.
    pub fn is_available_as<T: ContextValue>(&self, key: &str) -> bool {
        self.values
            .get(key)
            .map(|scalar| scalar.scalar_type() == T::SCALAR_TYPE)
            .unwrap_or(false)
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over the stored values in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Scalar)> + '_ {
        self.values.iter().map(|(key, value)| (key.as_str(), *value))
    }
}
