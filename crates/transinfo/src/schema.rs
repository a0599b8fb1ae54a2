//! Builtin description records.
//!
//! A description file is a JSON object with two required keys:
//! - `HelperStructures`: named lists of symbolic values used to describe
//!   builtins. `OperandKind` is the one every description must provide.
//! - `BuiltinDescriptions`: builtins keyed by identifier, each with an external
//!   `Name` and an ordered list of `Operands`.
//!
//! Key order inside both objects decides the order of every generated
//! enumeration and table, so both are read into [`NamedList`], which keeps
//! entries in document order.

use serde::Deserialize;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use std::fmt;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the helper structure listing the legal operand kinds.
pub const OPERAND_KIND: &str = "OperandKind";

/// Errors that can occur while loading a description.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read description {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid description: {0}")]
    Json(#[from] serde_json::Error),
}

/// Map from name to value that iterates in insertion order.
///
/// When deserialized from a JSON object the entries follow the order of the
/// object's keys. A key repeated within one object is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedList<T> {
    entries: Vec<(String, T)>,
}

impl<T> NamedList<T> {
    pub fn new() -> Self {
        NamedList {
            entries: Vec::new(),
        }
    }

    /// Inserts `value` under `name`.
    ///
    /// An existing entry keeps its position and has its value replaced; the
    /// previous value is returned. New names are appended at the back.
    pub fn insert(&mut self, name: impl Into<String>, value: T) -> Option<T> {
        let name = name.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(_, value)| value)
    }
}

impl<T> Default for NamedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, T> FromIterator<(K, T)> for NamedList<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut list = NamedList::new();
        for (name, value) in iter {
            list.insert(name, value);
        }
        list
    }
}

struct NamedListVisitor<T>(PhantomData<T>);

impl<'de, T> Visitor<'de> for NamedListVisitor<T>
where
    T: Deserialize<'de>,
{
    type Value = NamedList<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a JSON object")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut list = NamedList {
            entries: Vec::with_capacity(access.size_hint().unwrap_or(0)),
        };
        while let Some((name, value)) = access.next_entry::<String, T>()? {
            if list.contains_key(&name) {
                return Err(de::Error::custom(format_args!("duplicate key `{}`", name)));
            }
            list.entries.push((name, value));
        }
        Ok(list)
    }
}

impl<'de, T> Deserialize<'de> for NamedList<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(NamedListVisitor(PhantomData))
    }
}

/// Helper structures: structure name to its ordered value names.
pub type HelperStructures = NamedList<Vec<String>>;

/// Builtins keyed by identifier, in declaration order.
pub type BuiltinDescriptions = NamedList<BuiltinDescriptor>;

/// A single builtin operand.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OperandDescriptor {
    /// Symbolic operand name, unique within its builtin
    pub name: String,
    /// One of the values of the `OperandKind` helper structure
    pub kind: String,
}

impl OperandDescriptor {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        OperandDescriptor {
            name: name.into(),
            kind: kind.into(),
        }
    }
}

/// A builtin and its operands.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BuiltinDescriptor {
    /// External name, without the builtin prefix
    pub name: String,
    /// Operands in declaration order
    pub operands: Vec<OperandDescriptor>,
}

impl BuiltinDescriptor {
    pub fn new(name: impl Into<String>, operands: Vec<OperandDescriptor>) -> Self {
        BuiltinDescriptor {
            name: name.into(),
            operands,
        }
    }

    pub fn has_operands(&self) -> bool {
        !self.operands.is_empty()
    }
}

/// A whole description file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Description {
    pub helper_structures: HelperStructures,
    pub builtin_descriptions: BuiltinDescriptions,
}

impl Description {
    /// Load a description from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Parse a description from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Values of the `OperandKind` helper structure, if declared.
    pub fn operand_kinds(&self) -> Option<&[String]> {
        self.helper_structures
            .get(OPERAND_KIND)
            .map(|kinds| kinds.as_slice())
    }
}
