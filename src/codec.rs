//! Wire codec for query containers.
//!
//! The two directions are deliberately asymmetric:
//! - write: the populated variant knows its own kind, so we look its writer up
//!   by kind and emit `{ "<kind>": <body> }`, or nothing at all when the
//!   clause is conditionless;
//! - read: an incoming object is discriminated by which registered key it
//!   carries, and the body is handed to that kind's parser.
//!
//! Both directions go through one explicit table, [`ClauseRegistry`].
pub mod fields;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde_json::{Map, Value};

use crate::error::{QueryError, Result};
use crate::query::{BoolQuery, Clause, HasChildQuery, MatchAllQuery, Query, QueryContainer, TermQuery};

pub use fields::{ObjectReader, Pointer};

// ————————————————————————————————————————————————————————————————————————————
// REGISTRY
// ————————————————————————————————————————————————————————————————————————————

type WriteFn = fn(&Query, &ClauseRegistry) -> Result<Value>;
type ParseFn = fn(ObjectReader<'_>) -> Result<Query>;

/// Writer and parser for one clause kind.
#[derive(Clone, Copy)]
pub struct ClauseCodec {
    kind: &'static str,
    write: WriteFn,
    parse: ParseFn,
}

impl ClauseCodec {
    pub fn of<C: Clause>() -> Self {
        ClauseCodec {
            kind: C::KIND,
            write: |query, registry| match C::from_query(query) {
                Some(clause) => clause.write_body(registry),
                None => Err(QueryError::UnrecognizedClauseKind {
                    kind: query.kind().to_string(),
                    path: Pointer::root().to_string(),
                }),
            },
            parse: |reader| C::parse_body(reader).map(Into::into),
        }
    }
    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

impl std::fmt::Debug for ClauseCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClauseCodec").field("kind", &self.kind).finish_non_exhaustive()
    }
}

/// Wire key → (writer, parser).
///
/// Nested containers (`has_child.query`, `bool.must`, ...) recurse through the
/// same registry they were reached from.
#[derive(Debug, Clone, Default)]
pub struct ClauseRegistry {
    codecs: IndexMap<&'static str, ClauseCodec>,
}

static DEFAULT_REGISTRY: Lazy<ClauseRegistry> = Lazy::new(ClauseRegistry::with_default_clauses);

/// The registry with every built-in clause kind.
pub fn registry() -> &'static ClauseRegistry {
    &DEFAULT_REGISTRY
}

impl ClauseRegistry {
    pub fn empty() -> Self {
        Self::default()
    }
    pub fn with_default_clauses() -> Self {
        let mut registry = Self::empty();
        registry
            .register::<HasChildQuery>()
            .register::<MatchAllQuery>()
            .register::<TermQuery>()
            .register::<BoolQuery>();
        registry
    }
    /// Re-registering a kind replaces its codec.
    pub fn register<C: Clause>(&mut self) -> &mut Self {
        self.codecs.insert(C::KIND, ClauseCodec::of::<C>());
        self
    }
    pub fn get(&self, kind: &str) -> Option<&ClauseCodec> {
        self.codecs.get(kind)
    }
    pub fn kinds(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.codecs.keys().copied()
    }

    // ---- write ----

    /// `None` means the container is elided: the caller omits the key or
    /// skips the list element.
    pub fn write(&self, container: &QueryContainer) -> Result<Option<Value>> {
        let Some(query) = container.query() else {
            return Ok(None);
        };
        let kind = query.kind();
        if query.is_conditionless() {
            let base = query.base();
            if !base.verbatim {
                // Strict clauses nested under the elided one count too.
                if let Some(kind) = query.find_strict_conditionless() {
                    return Err(QueryError::StrictConditionless { kind });
                }
                tracing::debug!(kind, "eliding conditionless clause");
                return Ok(None);
            }
            tracing::trace!(kind, "writing conditionless clause verbatim");
        }
        let codec = self.get(kind).ok_or_else(|| QueryError::UnrecognizedClauseKind {
            kind: kind.to_string(),
            path: Pointer::root().to_string(),
        })?;
        let body = (codec.write)(query, self)?;
        let mut object = Map::new();
        object.insert(kind.to_string(), body);
        Ok(Some(Value::Object(object)))
    }

    /// Writes each member of a clause list, skipping elided ones.
    pub fn write_list(&self, containers: &[QueryContainer]) -> Result<Vec<Value>> {
        let mut out = Vec::with_capacity(containers.len());
        for container in containers {
            if let Some(value) = self.write(container)? {
                out.push(value);
            }
        }
        Ok(out)
    }

    // ---- read ----

    pub fn read(&self, value: &Value) -> Result<QueryContainer> {
        self.read_at(value, &Pointer::root())
    }

    pub fn read_at(&self, value: &Value, at: &Pointer) -> Result<QueryContainer> {
        let object = match value {
            Value::Object(object) => object,
            Value::Null => return Ok(QueryContainer::new()),
            _ => {
                let field = at.last().unwrap_or("query");
                return Err(QueryError::malformed(field, "an object", at));
            }
        };
        // Several clause keys in one object: the last one wins, same as `assign`.
        let mut container = QueryContainer::new();
        for (kind, body) in object {
            let at = at.child(kind);
            let Some(codec) = self.get(kind) else {
                return Err(QueryError::UnrecognizedClauseKind {
                    kind: kind.clone(),
                    path: at.to_string(),
                });
            };
            tracing::trace!(kind = codec.kind, path = %at, "parsing clause");
            let reader = ObjectReader::new(body, kind, at, self)?;
            container.assign((codec.parse)(reader)?);
        }
        Ok(container)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// ENTRY POINTS (default registry)
// ————————————————————————————————————————————————————————————————————————————

pub fn to_value(container: &QueryContainer) -> Result<Option<Value>> {
    registry().write(container)
}

pub fn to_string(container: &QueryContainer) -> Result<Option<String>> {
    match to_value(container)? {
        Some(value) => Ok(Some(serde_json::to_string(&value)?)),
        None => Ok(None),
    }
}

pub fn to_string_pretty(container: &QueryContainer) -> Result<Option<String>> {
    match to_value(container)? {
        Some(value) => Ok(Some(serde_json::to_string_pretty(&value)?)),
        None => Ok(None),
    }
}

pub fn from_value(value: &Value) -> Result<QueryContainer> {
    registry().read(value)
}

pub fn from_str(src: &str) -> Result<QueryContainer> {
    let value = serde_json::from_str::<Value>(src)?;
    from_value(&value)
}

pub fn from_slice(bytes: &[u8]) -> Result<QueryContainer> {
    let value = serde_json::from_slice::<Value>(bytes)?;
    from_value(&value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryDescriptor;
    use crate::QueryBuilder;
    use serde_json::json;

    #[test]
    fn default_registry_knows_builtin_kinds() {
        let kinds = registry().kinds().collect::<Vec<_>>();
        assert_eq!(kinds, vec!["has_child", "match_all", "term", "bool"]);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err = from_value(&json!({"unknown_clause": {}})).unwrap_err();
        match err {
            QueryError::UnrecognizedClauseKind { kind, path } => {
                assert_eq!(kind, "unknown_clause");
                assert_eq!(path, "/unknown_clause");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn restricted_registry_rejects_unregistered_kinds() {
        let mut registry = ClauseRegistry::empty();
        registry.register::<MatchAllQuery>();
        assert!(registry.read(&json!({"match_all": {}})).is_ok());
        let err = registry.read(&json!({"term": {"user": "kimchy"}})).unwrap_err();
        assert!(matches!(err, QueryError::UnrecognizedClauseKind { .. }));

        let container = QueryContainer::from(TermQuery::new("user", "kimchy"));
        assert!(matches!(registry.write(&container), Err(QueryError::UnrecognizedClauseKind { .. })));
    }

    #[test]
    fn empty_object_and_null_read_as_empty_container() {
        assert!(from_value(&json!({})).unwrap().is_empty());
        assert!(from_value(&Value::Null).unwrap().is_empty());
    }

    #[test]
    fn non_object_is_malformed() {
        let err = from_value(&json!([1, 2])).unwrap_err();
        assert!(matches!(err, QueryError::MalformedField { ref field, .. } if field == "query"));
    }

    #[test]
    fn several_keys_in_one_object_last_wins() {
        let container = from_value(&json!({"term": {"user": "kimchy"}, "match_all": {}})).unwrap();
        assert_eq!(container, QueryContainer::from(MatchAllQuery::default()));
    }

    #[test]
    fn strict_conditionless_fails_and_verbatim_is_written() {
        let q = QueryBuilder::<crate::Untyped>::new();
        let strict = q.term_with("user", "", |t| t.strict(true));
        assert!(matches!(
            to_value(&strict),
            Err(QueryError::StrictConditionless { kind: "term" })
        ));

        let verbatim = q.term_with("user", "", |t| t.verbatim(true).strict(true));
        assert_eq!(to_value(&verbatim).unwrap(), Some(json!({"term": {"user": ""}})));

        let plain = q.term("user", "");
        assert_eq!(to_value(&plain).unwrap(), None);
    }

    #[test]
    fn strict_clause_under_elided_wrapper_still_fails() {
        let q = QueryBuilder::<crate::Untyped>::new();
        let wrapped = q.has_child::<crate::Untyped, _>(|c| c.query(|q| q.term_with("a", "", |t| t.strict(true))));
        assert!(matches!(to_value(&wrapped), Err(QueryError::StrictConditionless { kind: "term" })));

        let alone = q.bool(|b| b.must([q.term_with("a", "", |t| t.strict(true))]));
        assert!(matches!(to_value(&alone), Err(QueryError::StrictConditionless { kind: "term" })));

        let with_sibling = q.bool(|b| b.must([q.term_with("a", "", |t| t.strict(true)), q.match_all()]));
        assert!(matches!(to_value(&with_sibling), Err(QueryError::StrictConditionless { kind: "term" })));

        let nested_deeper = q.bool(|b| {
            b.should([q.match_all(), q.has_child::<crate::Untyped, _>(|c| c.query(|q| q.term_with("a", "", |t| t.strict(true))))])
        });
        assert!(matches!(to_value(&nested_deeper), Err(QueryError::StrictConditionless { kind: "term" })));
    }

    #[test]
    fn syntax_errors_surface_as_json_errors() {
        assert!(matches!(from_str("{\"match_all\": "), Err(QueryError::Json(_))));
        assert_eq!(
            from_slice(br#"{"match_all": {"boost": 1.5}}"#).unwrap(),
            QueryBuilder::<crate::Untyped>::new().match_all_with(|m| m.boost(1.5)),
        );
    }
}
