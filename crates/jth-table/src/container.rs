use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use jth_core::errors::{ErrorInfo, JthError};
use serde::{Deserialize, Serialize};

use crate::histogram::Histogram;

/// Current on-disk layout version.
pub const FORMAT_VERSION: u32 = 1;

/// An object stored in a container file. Only histograms are lookup tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoredObject {
    /// A binned lookup table.
    Histogram(Histogram),
    /// Free-form annotation.
    Text(String),
    /// Plain list of numbers without binning.
    Values(Vec<f64>),
}

impl StoredObject {
    /// Short label used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            StoredObject::Histogram(_) => "histogram",
            StoredObject::Text(_) => "text",
            StoredObject::Values(_) => "values",
        }
    }
}

/// Encoding used for a container file, chosen from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerFormat {
    /// Pretty-printed JSON (default).
    Json,
    /// `bincode`, selected by a `.bin` extension.
    Bincode,
}

impl ContainerFormat {
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("bin") => ContainerFormat::Bincode,
            _ => ContainerFormat::Json,
        }
    }
}

/// A named collection of stored objects, written to and read from one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableContainer {
    #[serde(default = "default_version")]
    pub format_version: u32,
    #[serde(default)]
    objects: BTreeMap<String, StoredObject>,
}

fn default_version() -> u32 {
    FORMAT_VERSION
}

impl Default for TableContainer {
    fn default() -> Self {
        Self::new()
    }
}

fn load_error(code: &str, err: impl ToString, path: &Path) -> JthError {
    JthError::TableLoad(
        ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()),
    )
}

fn write_error(code: &str, err: impl ToString, path: &Path) -> JthError {
    JthError::Serde(
        ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()),
    )
}

fn not_found(name: &str) -> JthError {
    JthError::TableLoad(
        ErrorInfo::new("table-not-found", "no object stored under this name")
            .with_context("table", name),
    )
}

fn wrong_type(name: &str, object: &StoredObject) -> JthError {
    JthError::TableLoad(
        ErrorInfo::new("wrong-object-type", "stored object is not a histogram")
            .with_context("table", name)
            .with_context("kind", object.kind()),
    )
}

impl TableContainer {
    pub fn new() -> Self {
        Self {
            format_version: FORMAT_VERSION,
            objects: BTreeMap::new(),
        }
    }

    /// Stores `object` under `name`, returning the object it replaced.
    pub fn insert(&mut self, name: impl Into<String>, object: StoredObject) -> Option<StoredObject> {
        self.objects.insert(name.into(), object)
    }

    /// Stores a histogram under its own name.
    pub fn insert_histogram(&mut self, hist: Histogram) -> Option<StoredObject> {
        let name = hist.name().to_string();
        self.insert(name, StoredObject::Histogram(hist))
    }

    pub fn get(&self, name: &str) -> Option<&StoredObject> {
        self.objects.get(name)
    }

    /// Names of all stored objects in order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.objects.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StoredObject)> + '_ {
        self.objects.iter().map(|(name, object)| (name.as_str(), object))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Returns the histogram stored under `name`.
    ///
    /// Fails with `table-not-found` when nothing is stored under the name and
    /// with `wrong-object-type` when the object is not a histogram.
    pub fn histogram(&self, name: &str) -> Result<&Histogram, JthError> {
        match self.objects.get(name) {
            Some(StoredObject::Histogram(hist)) => Ok(hist),
            Some(other) => Err(wrong_type(name, other)),
            None => Err(not_found(name)),
        }
    }

    /// Removes and returns the histogram stored under `name`.
    pub fn take_histogram(mut self, name: &str) -> Result<Histogram, JthError> {
        match self.objects.remove(name) {
            Some(StoredObject::Histogram(hist)) => Ok(hist),
            Some(other) => Err(wrong_type(name, &other)),
            None => Err(not_found(name)),
        }
    }

    /// Writes the container, picking the encoding from the extension.
    pub fn write(&self, path: &Path) -> Result<(), JthError> {
        let bytes = match ContainerFormat::for_path(path) {
            ContainerFormat::Json => serde_json::to_vec_pretty(self)
                .map_err(|err| write_error("container-serialize", err, path))?,
            ContainerFormat::Bincode => bincode::serialize(self)
                .map_err(|err| write_error("container-serialize", err, path))?,
        };
        fs::write(path, bytes).map_err(|err| write_error("container-write", err, path))
    }

    /// Reads a container, picking the encoding from the extension.
    pub fn read(path: &Path) -> Result<Self, JthError> {
        let bytes = fs::read(path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => load_error("file-not-found", err, path),
            _ => load_error("container-decode", err, path),
        })?;
        match ContainerFormat::for_path(path) {
            ContainerFormat::Json => serde_json::from_slice(&bytes)
                .map_err(|err| load_error("container-decode", err, path)),
            ContainerFormat::Bincode => bincode::deserialize(&bytes)
                .map_err(|err| load_error("container-decode", err, path)),
        }
    }
}
