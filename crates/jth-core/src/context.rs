//! Per-event auxiliary values that are not carried by the jet itself.

use crate::errors::JthError;
use crate::scalar::{AttributeStore, ContextValue, Scalar, ScalarType};

/// String keyed store of event level scalars, read by context-bound axes.
///
/// The caller owns the context and fills it once per event. Lookups only
/// borrow it for the duration of a single resolve.
#[derive(Debug, Clone)]
pub struct EventContext {
    store: AttributeStore,
}

impl Default for EventContext {
    fn default() -> Self {
        Self::new()
    }
}

impl EventContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self {
            store: AttributeStore::new(JthError::Context),
        }
    }

    /// Inserts a new key. Fails with `key-exists` when the key is already set.
    pub fn set_value<T: ContextValue>(&mut self, key: &str, value: T) -> Result<(), JthError> {
        self.store.set_value(key, value)
    }

    /// Inserts a key, optionally replacing a value of the same type.
    pub fn set_value_with<T: ContextValue>(
        &mut self,
        key: &str,
        value: T,
        allow_overwrite: bool,
    ) -> Result<(), JthError> {
        self.store.set_value_with(key, value, allow_overwrite)
    }

    /// Reads `key` as `T`, failing with `key-not-found` or `type-mismatch`.
    pub fn get_value<T: ContextValue>(&self, key: &str) -> Result<T, JthError> {
        self.store.get_value(key)
    }

    /// Reads `key` with a runtime type tag and widens it to `f64`.
    pub fn get_as(&self, key: &str, scalar_type: ScalarType) -> Result<f64, JthError> {
        self.store.get_as(key, scalar_type)
    }

    /// Returns the tagged value under `key`, if any.
    pub fn get(&self, key: &str) -> Option<Scalar> {
        self.store.get(key)
    }

    /// Returns whether `key` holds any value.
    pub fn is_available(&self, key: &str) -> bool {
        self.store.is_available(key)
    }

    /// Returns whether `key` holds a value of type `T`.
    pub fn is_available_as<T: ContextValue>(&self, key: &str) -> bool {
        self.store.is_available_as::<T>(key)
    }

    /// Number of keys set.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns true if no key is set.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Iterates over all keys in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Scalar)> + '_ {
        self.store.iter()
    }
}
