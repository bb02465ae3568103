//! `term`: exact value match on a single field.
//!
//! Short form `{"term": {"user": "kimchy"}}` is written when no metadata is
//! set and the value is a scalar, long form
//! `{"term": {"user": {"value": "kimchy", "boost": 2.0}}}` otherwise. Both are
//! accepted on read; a bare object is always read as the long form.
use serde_json::{Map, Value};

use super::{Clause, Query, QueryBase, QueryContainer, QueryDescriptor};
use crate::codec::fields::{has_wire_metadata, write_base};
use crate::codec::{ClauseRegistry, ObjectReader};
use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermQuery {
    pub field: String,
    pub value: Value,
    pub base: QueryBase,
}

impl TermQuery {
    pub fn new(field: impl Into<String>, value: impl Into<Value>) -> Self {
        TermQuery { field: field.into(), value: value.into(), base: QueryBase::default() }
    }
}

impl Clause for TermQuery {
    const KIND: &'static str = "term";

    fn base(&self) -> &QueryBase {
        &self.base
    }

    /// No field, or nothing to compare it with.
    fn is_conditionless(&self) -> bool {
        if self.field.is_empty() {
            return true;
        }
        match &self.value {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            _ => false,
        }
    }

    fn from_query(query: &Query) -> Option<&Self> {
        match query {
            Query::Term(q) => Some(q),
            _ => None,
        }
    }

    fn write_body(&self, _registry: &ClauseRegistry) -> Result<Value> {
        let compound = matches!(self.value, Value::Array(_) | Value::Object(_));
        let term = if compound || has_wire_metadata(&self.base) {
            let mut long = Map::new();
            long.insert("value".into(), self.value.clone());
            write_base(&self.base, &mut long);
            Value::Object(long)
        } else {
            self.value.clone()
        };
        let mut body = Map::new();
        body.insert(self.field.clone(), term);
        Ok(Value::Object(body))
    }

    fn parse_body(reader: ObjectReader<'_>) -> Result<Self> {
        let mut entries = reader.entries();
        let (field, term) = match (entries.next(), entries.next()) {
            (Some(entry), None) => entry,
            _ => return Err(reader.malformed("term", "exactly one field")),
        };
        match term {
            Value::Object(_) => {
                let Some(long) = reader.nested(field)? else {
                    return Err(reader.malformed(field, "a value or an object with `value`"));
                };
                let value = long
                    .get("value")
                    .cloned()
                    .ok_or_else(|| long.malformed("value", "a term value"))?;
                Ok(TermQuery { field: field.clone(), value, base: long.base()? })
            }
            Value::Array(_) => Err(reader.malformed(field, "a scalar value")),
            scalar => Ok(TermQuery::new(field.clone(), scalar.clone())),
        }
    }
}

pub struct TermQueryBuilder {
    inner: TermQuery,
}

impl TermQueryBuilder {
    pub fn new(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self { inner: TermQuery::new(field, value) }
    }
    pub fn build(self) -> TermQuery {
        self.inner
    }
}

impl QueryDescriptor for TermQueryBuilder {
    fn base_mut(&mut self) -> &mut QueryBase {
        &mut self.inner.base
    }
}

impl From<TermQueryBuilder> for QueryContainer {
    fn from(builder: TermQueryBuilder) -> Self {
        QueryContainer::from(builder.inner)
    }
}
