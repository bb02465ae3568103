//! Field-level helpers shared by the per-clause parsers and writers.
use std::fmt;

use ordered_float::OrderedFloat;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::ClauseRegistry;
use crate::error::{QueryError, Result};
use crate::query::{QueryBase, QueryContainer};

// ————————————————————————————————————————————————————————————————————————————
// POINTER
// ————————————————————————————————————————————————————————————————————————————

/// JSON pointer (RFC 6901) to the node being parsed. The root displays as `/`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pointer {
    segments: Vec<String>,
}

impl Pointer {
    pub fn root() -> Self {
        Self::default()
    }
    pub fn child(&self, segment: impl fmt::Display) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        Self { segments }
    }
    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{}", segment.replace('~', "~0").replace('/', "~1"))?;
        }
        Ok(())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// READER
// ————————————————————————————————————————————————————————————————————————————

/// A clause body being parsed: the object, where it sits, and the registry to
/// recurse through for nested queries.
///
/// `null` fields read as absent.
#[derive(Clone)]
pub struct ObjectReader<'a> {
    object: &'a Map<String, Value>,
    at: Pointer,
    registry: &'a ClauseRegistry,
}

impl<'a> ObjectReader<'a> {
    /// `field` names `value` itself, for the error when it is not an object.
    pub fn new(value: &'a Value, field: &str, at: Pointer, registry: &'a ClauseRegistry) -> Result<Self> {
        match value {
            Value::Object(object) => Ok(Self { object, at, registry }),
            _ => Err(QueryError::malformed(field, "an object", &at)),
        }
    }
    pub fn at(&self) -> &Pointer {
        &self.at
    }
    pub fn entries(&self) -> impl Iterator<Item = (&'a String, &'a Value)> + 'a {
        self.object.iter()
    }
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.object.get(key).filter(|v| !v.is_null())
    }
    /// Reader over a nested object (e.g. the long form of a `term` field).
    pub fn nested(&self, key: &str) -> Result<Option<ObjectReader<'a>>> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => Self::new(value, key, self.at.child(key), self.registry).map(Some),
        }
    }
    pub fn malformed(&self, key: &str, expected: &str) -> QueryError {
        QueryError::malformed(key, expected, self.at.child(key))
    }

    pub fn optional_str(&self, key: &str) -> Result<Option<String>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(self.malformed(key, "a string")),
        }
    }
    pub fn optional_u32(&self, key: &str) -> Result<Option<u32>> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| self.malformed(key, "a non-negative integer")),
        }
    }
    pub fn optional_f64(&self, key: &str) -> Result<Option<f64>> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_f64()
                .map(Some)
                .ok_or_else(|| self.malformed(key, "a number")),
        }
    }
    /// Typed sub-documents go through serde, keeping the failing path.
    pub fn optional_typed<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => crate::path_de::from_value_with_path(value, key, &self.at.child(key)).map(Some),
        }
    }

    pub fn optional_query(&self, key: &str) -> Result<Option<QueryContainer>> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => self.registry.read_at(value, &self.at.child(key)).map(Some),
        }
    }
    /// A clause list; a lone object counts as a list of one.
    pub fn query_list(&self, key: &str) -> Result<Vec<QueryContainer>> {
        let at = self.at.child(key);
        match self.get(key) {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(index, item)| self.registry.read_at(item, &at.child(index)))
                .collect(),
            Some(value @ Value::Object(_)) => Ok(vec![self.registry.read_at(value, &at)?]),
            Some(_) => Err(self.malformed(key, "an object or an array of objects")),
        }
    }

    /// `_name` and `boost`.
    pub fn base(&self) -> Result<QueryBase> {
        Ok(QueryBase {
            name: self.optional_str("_name")?,
            boost: self.optional_f64("boost")?.map(OrderedFloat),
            ..QueryBase::default()
        })
    }
}

// ————————————————————————————————————————————————————————————————————————————
// WRITER
// ————————————————————————————————————————————————————————————————————————————

/// Appends `boost` and `_name` when set.
pub fn write_base(base: &QueryBase, body: &mut Map<String, Value>) {
    if let Some(boost) = base.boost {
        body.insert("boost".into(), boost.0.into());
    }
    if let Some(name) = &base.name {
        body.insert("_name".into(), name.clone().into());
    }
}

pub fn has_wire_metadata(base: &QueryBase) -> bool {
    base.boost.is_some() || base.name.is_some()
}
