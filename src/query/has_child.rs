//! `has_child`: match parent documents whose children match a query.
//!
//! ```json
//! {
//!   "has_child": {
//!     "type": "comment",
//!     "score_type": "max",
//!     "min_children": 2,
//!     "max_children": 5,
//!     "query": { "match_all": {} },
//!     "inner_hits": {}
//!   }
//! }
//! ```
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Clause, InnerHits, InnerHitsBuilder, Query, QueryBase, QueryContainer, QueryDescriptor};
use crate::builder::QueryBuilder;
use crate::codec::fields::write_base;
use crate::codec::{ClauseRegistry, ObjectReader};
use crate::error::Result;
use crate::type_name::{DocumentType, TypeName};

/// How the scores of matching children roll up into the parent's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChildScoreMode {
    None,
    #[serde(rename = "avg")]
    Average,
    Sum,
    Max,
    Min,
}

// ————————————————————————————————————————————————————————————————————————————
// RECORD
// ————————————————————————————————————————————————————————————————————————————

/// `min_children <= max_children` is not checked; whatever was built is sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HasChildQuery {
    pub type_name: Option<TypeName>,
    pub score_mode: Option<ChildScoreMode>,
    pub min_children: Option<u32>,
    pub max_children: Option<u32>,
    pub query: Option<QueryContainer>,
    pub inner_hits: Option<InnerHits>,
    pub base: QueryBase,
}

impl Clause for HasChildQuery {
    const KIND: &'static str = "has_child";

    fn base(&self) -> &QueryBase {
        &self.base
    }

    /// A wrapper is conditionless iff what it wraps is.
    fn is_conditionless(&self) -> bool {
        self.query.as_ref().is_none_or(QueryContainer::is_conditionless)
    }

    fn from_query(query: &Query) -> Option<&Self> {
        match query {
            Query::HasChild(q) => Some(q),
            _ => None,
        }
    }

    fn write_body(&self, registry: &ClauseRegistry) -> Result<Value> {
        let mut body = Map::new();
        if let Some(type_name) = &self.type_name {
            body.insert("type".into(), type_name.as_str().into());
        }
        if let Some(mode) = self.score_mode {
            body.insert("score_type".into(), serde_json::to_value(mode)?);
        }
        if let Some(min) = self.min_children {
            body.insert("min_children".into(), min.into());
        }
        if let Some(max) = self.max_children {
            body.insert("max_children".into(), max.into());
        }
        if let Some(query) = &self.query {
            if let Some(value) = registry.write(query)? {
                body.insert("query".into(), value);
            }
        }
        if let Some(inner_hits) = &self.inner_hits {
            body.insert("inner_hits".into(), serde_json::to_value(inner_hits)?);
        }
        write_base(&self.base, &mut body);
        Ok(Value::Object(body))
    }

    fn parse_body(reader: ObjectReader<'_>) -> Result<Self> {
        for (key, _) in reader.entries() {
            if !KNOWN_FIELDS.contains(&key.as_str()) {
                tracing::debug!(field = %key, path = %reader.at(), "ignoring unknown has_child field");
            }
        }
        Ok(HasChildQuery {
            type_name: reader.optional_str("type")?.and_then(TypeName::try_new),
            score_mode: reader.optional_typed("score_type")?,
            min_children: reader.optional_u32("min_children")?,
            max_children: reader.optional_u32("max_children")?,
            query: reader.optional_query("query")?,
            inner_hits: reader.optional_typed("inner_hits")?,
            base: reader.base()?,
        })
    }
}

const KNOWN_FIELDS: &[&str] = &[
    "type",
    "score_type",
    "min_children",
    "max_children",
    "query",
    "inner_hits",
    "boost",
    "_name",
];

// ————————————————————————————————————————————————————————————————————————————
// BUILDER
// ————————————————————————————————————————————————————————————————————————————

/// Fluent view over a [`HasChildQuery`] draft, scoped to the child document
/// type `T`. Installing it (`QueryContainer::from`) moves the draft into the
/// container, so nothing done to a builder later can reach back into it.
pub struct HasChildQueryBuilder<T> {
    inner: HasChildQuery,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DocumentType> HasChildQueryBuilder<T> {
    pub fn new() -> Self {
        Self {
            inner: HasChildQuery {
                type_name: TypeName::of::<T>(),
                ..HasChildQuery::default()
            },
            _marker: PhantomData,
        }
    }

    /// Override the type name inferred from `T`. An empty name clears it.
    pub fn type_name(mut self, name: impl Into<String>) -> Self {
        self.inner.type_name = TypeName::try_new(name);
        self
    }
    /// Replaces any previously set child query.
    pub fn query<F>(mut self, build: F) -> Self
    where
        F: FnOnce(QueryBuilder<T>) -> QueryContainer,
    {
        self.inner.query = Some(build(QueryBuilder::new()));
        self
    }
    pub fn score_mode(mut self, mode: ChildScoreMode) -> Self {
        self.inner.score_mode = Some(mode);
        self
    }
    pub fn min_children(mut self, min: u32) -> Self {
        self.inner.min_children = Some(min);
        self
    }
    pub fn max_children(mut self, max: u32) -> Self {
        self.inner.max_children = Some(max);
        self
    }
    pub fn inner_hits(mut self) -> Self {
        self.inner.inner_hits = Some(InnerHits::default());
        self
    }
    pub fn inner_hits_with<F, R>(mut self, build: F) -> Self
    where
        F: FnOnce(InnerHitsBuilder<T>) -> R,
        R: Into<InnerHits>,
    {
        self.inner.inner_hits = Some(build(InnerHitsBuilder::new()).into());
        self
    }

    pub fn build(self) -> HasChildQuery {
        self.inner
    }
}

impl<T: DocumentType> Default for HasChildQueryBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for HasChildQueryBuilder<T> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone(), _marker: PhantomData }
    }
}

impl<T> QueryDescriptor for HasChildQueryBuilder<T> {
    fn base_mut(&mut self) -> &mut QueryBase {
        &mut self.inner.base
    }
}

impl<T> From<HasChildQueryBuilder<T>> for HasChildQuery {
    fn from(builder: HasChildQueryBuilder<T>) -> Self {
        builder.inner
    }
}

impl<T> From<HasChildQueryBuilder<T>> for QueryContainer {
    fn from(builder: HasChildQueryBuilder<T>) -> Self {
        QueryContainer::from(builder.inner)
    }
}
