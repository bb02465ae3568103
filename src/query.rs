//! Clause records and the one-of `QueryContainer`.
//!
//! Every clause kind follows the same contract:
//! - one canonical record (`HasChildQuery`, `TermQuery`, ...) carrying the
//!   clause's fields plus the shared [`QueryBase`] metadata,
//! - a pure conditionless rule ([`Clause::is_conditionless`]),
//! - a writer and a parser, registered once in the codec table
//!   ([`crate::codec::ClauseRegistry`]),
//! - a thin builder wrapper over the record.
pub mod bool_query;
pub mod has_child;
pub mod inner_hits;
pub mod match_all;
pub mod ops;
pub mod term;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::codec::{ClauseRegistry, ObjectReader};
use crate::error::Result;

pub use bool_query::{BoolQuery, BoolQueryBuilder, MinimumShouldMatch};
pub use has_child::{ChildScoreMode, HasChildQuery, HasChildQueryBuilder};
pub use inner_hits::{InnerHits, InnerHitsBuilder};
pub use match_all::{MatchAllQuery, MatchAllQueryBuilder};
pub use term::{TermQuery, TermQueryBuilder};

// ————————————————————————————————————————————————————————————————————————————
// SHARED METADATA
// ————————————————————————————————————————————————————————————————————————————

/// Metadata every clause carries.
///
/// `name` and `boost` go on the wire (`_name`, `boost`). `verbatim` and
/// `strict` only steer the writer:
/// - verbatim: emit the clause even when it is conditionless,
/// - strict: fail instead of silently eliding a conditionless clause.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryBase {
    pub name: Option<String>,
    pub boost: Option<OrderedFloat<f64>>,
    pub verbatim: bool,
    pub strict: bool,
}

/// Setters shared by every clause builder.
pub trait QueryDescriptor: Sized {
    fn base_mut(&mut self) -> &mut QueryBase;

    fn name(mut self, name: impl Into<String>) -> Self {
        self.base_mut().name = Some(name.into());
        self
    }
    /// JSON has no NaN or infinity; such a boost is ignored.
    fn boost(mut self, boost: f64) -> Self {
        if !boost.is_finite() {
            tracing::warn!(boost, "ignoring non-finite boost");
            return self;
        }
        self.base_mut().boost = Some(OrderedFloat(boost));
        self
    }
    fn verbatim(mut self, verbatim: bool) -> Self {
        self.base_mut().verbatim = verbatim;
        self
    }
    fn strict(mut self, strict: bool) -> Self {
        self.base_mut().strict = strict;
        self
    }
}

// ————————————————————————————————————————————————————————————————————————————
// CLAUSE CONTRACT
// ————————————————————————————————————————————————————————————————————————————

pub trait Clause: Sized + Into<Query> {
    /// Wire discriminator, e.g. `"has_child"`.
    const KIND: &'static str;

    fn base(&self) -> &QueryBase;

    /// True when the clause has no filtering effect and should be left out of
    /// the output. Must not depend on anything but `self`.
    fn is_conditionless(&self) -> bool;

    /// Borrow this kind out of a `Query`, if that is what it holds.
    fn from_query(query: &Query) -> Option<&Self>;

    /// The object that goes under the `KIND` key.
    fn write_body(&self, registry: &ClauseRegistry) -> Result<Value>;

    /// Inverse of `write_body`.
    fn parse_body(reader: ObjectReader<'_>) -> Result<Self>;
}

/// The populated variant of a [`QueryContainer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    HasChild(HasChildQuery),
    MatchAll(MatchAllQuery),
    Term(TermQuery),
    Bool(BoolQuery),
}

impl Query {
    pub fn kind(&self) -> &'static str {
        match self {
            Query::HasChild(_) => HasChildQuery::KIND,
            Query::MatchAll(_) => MatchAllQuery::KIND,
            Query::Term(_) => TermQuery::KIND,
            Query::Bool(_) => BoolQuery::KIND,
        }
    }
    pub fn base(&self) -> &QueryBase {
        match self {
            Query::HasChild(q) => q.base(),
            Query::MatchAll(q) => q.base(),
            Query::Term(q) => q.base(),
            Query::Bool(q) => q.base(),
        }
    }
    pub fn is_conditionless(&self) -> bool {
        match self {
            Query::HasChild(q) => q.is_conditionless(),
            Query::MatchAll(q) => q.is_conditionless(),
            Query::Term(q) => q.is_conditionless(),
            Query::Bool(q) => q.is_conditionless(),
        }
    }
    /// Containers nested directly under this clause.
    pub fn nested(&self) -> Vec<&QueryContainer> {
        match self {
            Query::HasChild(q) => q.query.iter().collect(),
            Query::Bool(q) => q.must.iter().chain(&q.should).chain(&q.must_not).chain(&q.filter).collect(),
            Query::MatchAll(_) | Query::Term(_) => Vec::new(),
        }
    }
    /// Kind of the first strict clause in this subtree that the writer would
    /// drop. Eliding a wrapper drops everything under it, strict or not.
    pub fn find_strict_conditionless(&self) -> Option<&'static str> {
        let base = self.base();
        if base.strict && !base.verbatim && self.is_conditionless() {
            return Some(self.kind());
        }
        self.nested()
            .into_iter()
            .filter_map(QueryContainer::query)
            .find_map(Query::find_strict_conditionless)
    }
}

macro_rules! install_clause {
    ($($variant:ident => $record:ty),* $(,)?) => {
        $(
            impl From<$record> for Query {
                fn from(clause: $record) -> Self {
                    Query::$variant(clause)
                }
            }
            impl From<$record> for QueryContainer {
                fn from(clause: $record) -> Self {
                    QueryContainer::from(Query::$variant(clause))
                }
            }
        )*
    };
}

install_clause! {
    HasChild => HasChildQuery,
    MatchAll => MatchAllQuery,
    Term => TermQuery,
    Bool => BoolQuery,
}

// ————————————————————————————————————————————————————————————————————————————
// CONTAINER
// ————————————————————————————————————————————————————————————————————————————

/// Holds zero or one clause.
///
/// Assigning a clause replaces whatever was there before; nothing accumulates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryContainer {
    query: Option<Box<Query>>,
}

impl QueryContainer {
    pub const fn new() -> Self {
        Self { query: None }
    }
    pub fn assign(&mut self, query: impl Into<Query>) {
        self.query = Some(Box::new(query.into()));
    }
    pub fn clear(&mut self) {
        self.query = None;
    }
    pub fn query(&self) -> Option<&Query> {
        self.query.as_deref()
    }
    pub fn into_query(self) -> Option<Query> {
        self.query.map(|q| *q)
    }
    pub fn is_empty(&self) -> bool {
        self.query.is_none()
    }
    /// An empty container is conditionless by definition.
    pub fn is_conditionless(&self) -> bool {
        self.query().is_none_or(Query::is_conditionless)
    }
    pub fn is_verbatim(&self) -> bool {
        self.query().is_some_and(|q| q.base().verbatim)
    }
    pub fn is_strict(&self) -> bool {
        self.query().is_some_and(|q| q.base().strict)
    }
    /// Whether the writer leaves this container out of its enclosing structure.
    /// Usable as a `skip_serializing_if` predicate.
    pub fn is_elided(&self) -> bool {
        self.is_conditionless() && !self.is_verbatim()
    }
}

impl From<Query> for QueryContainer {
    fn from(query: Query) -> Self {
        Self { query: Some(Box::new(query)) }
    }
}

/// Conditionless containers serialize as `null`; pair with
/// `#[serde(skip_serializing_if = "QueryContainer::is_elided")]` to drop the key.
impl Serialize for QueryContainer {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::Error;
        match crate::codec::to_value(self).map_err(S::Error::custom)? {
            Some(value) => value.serialize(serializer),
            None => serializer.serialize_unit(),
        }
    }
}

impl<'de> Deserialize<'de> for QueryContainer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        use serde::de::Error;
        let value = Value::deserialize(deserializer)?;
        crate::codec::from_value(&value).map_err(D::Error::custom)
    }
}
