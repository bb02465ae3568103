//! Entry point for building containers.
use std::marker::PhantomData;

use serde_json::Value;

use crate::query::{
    BoolQueryBuilder, HasChildQueryBuilder, MatchAllQueryBuilder, QueryContainer, TermQueryBuilder,
};
use crate::type_name::DocumentType;

/// Hands out one installed container per call. `T` is the document type the
/// query runs against; it only matters to clauses that infer a type name.
///
/// ```
/// use search_dsl::{ChildScoreMode, QueryBuilder, Untyped};
///
/// struct Comment;
/// search_dsl::document_type!(Comment => "comment");
///
/// let q = QueryBuilder::<Untyped>::new();
/// let container = q.has_child::<Comment, _>(|c| {
///     c.score_mode(ChildScoreMode::Max)
///         .query(|q| q.term("author", "kimchy"))
/// });
/// assert!(!container.is_conditionless());
/// ```
pub struct QueryBuilder<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> QueryBuilder<T> {
    pub const fn new() -> Self {
        Self { _marker: PhantomData }
    }

    pub fn has_child<C, F>(self, build: F) -> QueryContainer
    where
        C: DocumentType,
        F: FnOnce(HasChildQueryBuilder<C>) -> HasChildQueryBuilder<C>,
    {
        QueryContainer::from(build(HasChildQueryBuilder::new()))
    }

    pub fn match_all(self) -> QueryContainer {
        QueryContainer::from(MatchAllQueryBuilder::new())
    }

    pub fn match_all_with<F>(self, build: F) -> QueryContainer
    where
        F: FnOnce(MatchAllQueryBuilder) -> MatchAllQueryBuilder,
    {
        QueryContainer::from(build(MatchAllQueryBuilder::new()))
    }

    pub fn term(self, field: impl Into<String>, value: impl Into<Value>) -> QueryContainer {
        QueryContainer::from(TermQueryBuilder::new(field, value))
    }

    pub fn term_with<F>(self, field: impl Into<String>, value: impl Into<Value>, build: F) -> QueryContainer
    where
        F: FnOnce(TermQueryBuilder) -> TermQueryBuilder,
    {
        QueryContainer::from(build(TermQueryBuilder::new(field, value)))
    }

    pub fn bool<F>(self, build: F) -> QueryContainer
    where
        F: FnOnce(BoolQueryBuilder<T>) -> BoolQueryBuilder<T>,
    {
        QueryContainer::from(build(BoolQueryBuilder::new()))
    }
}

impl<T> Clone for QueryBuilder<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for QueryBuilder<T> {}

impl<T> Default for QueryBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}
