use serde_json::{Map, Value};

use super::{Clause, Query, QueryBase, QueryContainer, QueryDescriptor};
use crate::codec::fields::write_base;
use crate::codec::{ClauseRegistry, ObjectReader};
use crate::error::Result;

/// `{"match_all": {}}`: matches every document. Never conditionless.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchAllQuery {
    pub base: QueryBase,
}

impl Clause for MatchAllQuery {
    const KIND: &'static str = "match_all";

    fn base(&self) -> &QueryBase {
        &self.base
    }
    fn is_conditionless(&self) -> bool {
        false
    }
    fn from_query(query: &Query) -> Option<&Self> {
        match query {
            Query::MatchAll(q) => Some(q),
            _ => None,
        }
    }
    fn write_body(&self, _registry: &ClauseRegistry) -> Result<Value> {
        let mut body = Map::new();
        write_base(&self.base, &mut body);
        Ok(Value::Object(body))
    }
    fn parse_body(reader: ObjectReader<'_>) -> Result<Self> {
        Ok(MatchAllQuery { base: reader.base()? })
    }
}

#[derive(Debug, Clone, Default)]
pub struct MatchAllQueryBuilder {
    inner: MatchAllQuery,
}

impl MatchAllQueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn build(self) -> MatchAllQuery {
        self.inner
    }
}

impl QueryDescriptor for MatchAllQueryBuilder {
    fn base_mut(&mut self) -> &mut QueryBase {
        &mut self.inner.base
    }
}

impl From<MatchAllQueryBuilder> for QueryContainer {
    fn from(builder: MatchAllQueryBuilder) -> Self {
        QueryContainer::from(builder.inner)
    }
}
