//! Typed builders and a JSON codec for an Elasticsearch-style query DSL.
//!
//! - build clauses fluently ([`QueryBuilder`], [`HasChildQueryBuilder`], ...),
//! - hold them in a one-of [`QueryContainer`],
//! - let conditionless clauses fall out of the output on their own,
//! - read and write the engine's wire format ([`codec`]).
//!
//! Nothing here executes a query.
pub mod builder;
pub mod cli;
pub mod codec;
pub mod error;
pub mod jq_exec;
pub mod path_de;
pub mod query;
pub mod type_name;

pub use builder::QueryBuilder;
pub use codec::{ClauseRegistry, from_slice, from_str, from_value, to_string, to_string_pretty, to_value};
pub use error::{QueryError, Result};
pub use query::{
    BoolQuery, BoolQueryBuilder, ChildScoreMode, Clause, HasChildQuery, HasChildQueryBuilder, InnerHits,
    InnerHitsBuilder, MatchAllQuery, MatchAllQueryBuilder, MinimumShouldMatch, Query, QueryBase, QueryContainer,
    QueryDescriptor, TermQuery, TermQueryBuilder,
};
pub use type_name::{DocumentType, TypeName, Untyped};
