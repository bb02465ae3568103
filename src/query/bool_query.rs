//! `bool`: compound clause over four lists of sub-queries.
//!
//! Elided members are skipped on write and a list left empty is omitted.
use std::marker::PhantomData;

use serde_json::{Map, Value};

use super::{Clause, Query, QueryBase, QueryContainer, QueryDescriptor};
use crate::codec::fields::write_base;
use crate::codec::{ClauseRegistry, ObjectReader};
use crate::error::Result;

/// `2`, `-1`, `"75%"`, `"3<90%"`: the engine owns the grammar, we only carry it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MinimumShouldMatch {
    Count(i64),
    Expression(String),
}

impl From<i64> for MinimumShouldMatch {
    fn from(count: i64) -> Self {
        MinimumShouldMatch::Count(count)
    }
}

impl From<&str> for MinimumShouldMatch {
    fn from(expression: &str) -> Self {
        MinimumShouldMatch::Expression(expression.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoolQuery {
    pub must: Vec<QueryContainer>,
    pub should: Vec<QueryContainer>,
    pub must_not: Vec<QueryContainer>,
    pub filter: Vec<QueryContainer>,
    pub minimum_should_match: Option<MinimumShouldMatch>,
    pub base: QueryBase,
}

impl BoolQuery {
    fn lists(&self) -> [(&'static str, &[QueryContainer]); 4] {
        [
            ("must", self.must.as_slice()),
            ("should", self.should.as_slice()),
            ("must_not", self.must_not.as_slice()),
            ("filter", self.filter.as_slice()),
        ]
    }

    /// Only `must` clauses and nothing else; safe to extend with another `must`.
    pub(crate) fn is_plain_must(&self) -> bool {
        self.should.is_empty()
            && self.must_not.is_empty()
            && self.filter.is_empty()
            && self.minimum_should_match.is_none()
            && self.base == QueryBase::default()
    }

    pub(crate) fn is_plain_should(&self) -> bool {
        self.must.is_empty()
            && self.must_not.is_empty()
            && self.filter.is_empty()
            && self.minimum_should_match.is_none()
            && self.base == QueryBase::default()
    }
}

impl Clause for BoolQuery {
    const KIND: &'static str = "bool";

    fn base(&self) -> &QueryBase {
        &self.base
    }

    /// Conditionless when no member would make it to the wire.
    fn is_conditionless(&self) -> bool {
        self.lists()
            .iter()
            .all(|(_, list)| list.iter().all(QueryContainer::is_elided))
    }

    fn from_query(query: &Query) -> Option<&Self> {
        match query {
            Query::Bool(q) => Some(q),
            _ => None,
        }
    }

    fn write_body(&self, registry: &ClauseRegistry) -> Result<Value> {
        let mut body = Map::new();
        for (key, list) in self.lists() {
            let written = registry.write_list(list)?;
            if !written.is_empty() {
                body.insert(key.into(), Value::Array(written));
            }
        }
        match &self.minimum_should_match {
            Some(MinimumShouldMatch::Count(count)) => {
                body.insert("minimum_should_match".into(), (*count).into());
            }
            Some(MinimumShouldMatch::Expression(expression)) => {
                body.insert("minimum_should_match".into(), expression.clone().into());
            }
            None => {}
        }
        write_base(&self.base, &mut body);
        Ok(Value::Object(body))
    }

    fn parse_body(reader: ObjectReader<'_>) -> Result<Self> {
        let minimum_should_match = match reader.get("minimum_should_match") {
            None => None,
            Some(Value::String(expression)) => Some(MinimumShouldMatch::Expression(expression.clone())),
            Some(value) => match value.as_i64() {
                Some(count) => Some(MinimumShouldMatch::Count(count)),
                None => return Err(reader.malformed("minimum_should_match", "an integer or a string")),
            },
        };
        Ok(BoolQuery {
            must: reader.query_list("must")?,
            should: reader.query_list("should")?,
            must_not: reader.query_list("must_not")?,
            filter: reader.query_list("filter")?,
            minimum_should_match,
            base: reader.base()?,
        })
    }
}

// ————————————————————————————————————————————————————————————————————————————
// BUILDER
// ————————————————————————————————————————————————————————————————————————————

/// Each list setter replaces the list it names.
pub struct BoolQueryBuilder<T> {
    inner: BoolQuery,
    _marker: PhantomData<fn() -> T>,
}

impl<T> BoolQueryBuilder<T> {
    pub fn new() -> Self {
        Self { inner: BoolQuery::default(), _marker: PhantomData }
    }
    pub fn must(mut self, clauses: impl IntoIterator<Item = QueryContainer>) -> Self {
        self.inner.must = clauses.into_iter().collect();
        self
    }
    pub fn should(mut self, clauses: impl IntoIterator<Item = QueryContainer>) -> Self {
        self.inner.should = clauses.into_iter().collect();
        self
    }
    pub fn must_not(mut self, clauses: impl IntoIterator<Item = QueryContainer>) -> Self {
        self.inner.must_not = clauses.into_iter().collect();
        self
    }
    pub fn filter(mut self, clauses: impl IntoIterator<Item = QueryContainer>) -> Self {
        self.inner.filter = clauses.into_iter().collect();
        self
    }
    pub fn minimum_should_match(mut self, minimum: impl Into<MinimumShouldMatch>) -> Self {
        self.inner.minimum_should_match = Some(minimum.into());
        self
    }
    pub fn build(self) -> BoolQuery {
        self.inner
    }
}

impl<T> Default for BoolQueryBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> QueryDescriptor for BoolQueryBuilder<T> {
    fn base_mut(&mut self) -> &mut QueryBase {
        &mut self.inner.base
    }
}

impl<T> From<BoolQueryBuilder<T>> for QueryContainer {
    fn from(builder: BoolQueryBuilder<T>) -> Self {
        QueryContainer::from(builder.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::QueryBuilder;
    use crate::codec;
    use crate::type_name::Untyped;
    use serde_json::json;

    #[test]
    fn skips_elided_members() {
        let q = QueryBuilder::<Untyped>::new();
        let container = q.bool(|b| b.must([q.term("user", ""), q.term("user", "kimchy")]).filter([q.term("tag", "")]));
        assert_eq!(
            codec::to_value(&container).unwrap(),
            Some(json!({"bool": {"must": [{"term": {"user": "kimchy"}}]}})),
        );
    }

    #[test]
    fn all_conditionless_members_make_it_conditionless() {
        let q = QueryBuilder::<Untyped>::new();
        let container = q.bool(|b| b.must([q.term("user", "")]).should([QueryContainer::new()]));
        assert!(container.is_conditionless());
        assert!(q.bool(|b| b).is_conditionless());
        assert_eq!(codec::to_value(&container).unwrap(), None);

        let verbatim_member = q.bool(|b| b.must([q.term_with("user", "", |t| t.verbatim(true))]));
        assert!(!verbatim_member.is_conditionless());
    }

    #[test]
    fn reads_single_object_or_array_lists() {
        let container = codec::from_value(&json!({"bool": {
            "must": {"match_all": {}},
            "should": [{"term": {"a": 1}}, {"term": {"b": 2}}],
            "minimum_should_match": "50%",
            "boost": 1.5
        }}))
        .unwrap();
        let Some(Query::Bool(b)) = container.query() else { panic!("expected bool") };
        assert_eq!(b.must.len(), 1);
        assert_eq!(b.should.len(), 2);
        assert_eq!(b.minimum_should_match, Some(MinimumShouldMatch::Expression("50%".into())));
        assert_eq!(b.base.boost.map(|b| b.0), Some(1.5));
    }

    #[test]
    fn nested_errors_point_into_the_list() {
        let err = codec::from_value(&json!({"bool": {"filter": [{"match_all": {}}, {"nope": {}}]}})).unwrap_err();
        assert_eq!(err.path(), Some("/bool/filter/1/nope"));

        let err = codec::from_value(&json!({"bool": {"minimum_should_match": true}})).unwrap_err();
        assert_eq!(err.path(), Some("/bool/minimum_should_match"));
    }
}
