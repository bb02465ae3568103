//! `a & b`, `a | b`, `!a` on containers.
//!
//! Elided operands drop out: combining with one yields the other side as-is.
//! Chains flatten, so `a & b & c` is one `bool.must` with three members.
use std::ops::{BitAnd, BitOr, Not};

use super::{BoolQuery, Query, QueryContainer};

impl BitAnd for QueryContainer {
    type Output = QueryContainer;

    fn bitand(self, rhs: QueryContainer) -> QueryContainer {
        if self.is_elided() {
            return rhs;
        }
        if rhs.is_elided() {
            return self;
        }
        match self.into_query() {
            Some(Query::Bool(mut lhs)) if lhs.is_plain_must() => {
                lhs.must.push(rhs);
                QueryContainer::from(lhs)
            }
            lhs => {
                let lhs = lhs.map(QueryContainer::from).unwrap_or_default();
                QueryContainer::from(BoolQuery { must: vec![lhs, rhs], ..BoolQuery::default() })
            }
        }
    }
}

impl BitOr for QueryContainer {
    type Output = QueryContainer;

    fn bitor(self, rhs: QueryContainer) -> QueryContainer {
        if self.is_elided() {
            return rhs;
        }
        if rhs.is_elided() {
            return self;
        }
        match self.into_query() {
            Some(Query::Bool(mut lhs)) if lhs.is_plain_should() => {
                lhs.should.push(rhs);
                QueryContainer::from(lhs)
            }
            lhs => {
                let lhs = lhs.map(QueryContainer::from).unwrap_or_default();
                QueryContainer::from(BoolQuery { should: vec![lhs, rhs], ..BoolQuery::default() })
            }
        }
    }
}

impl Not for QueryContainer {
    type Output = QueryContainer;

    fn not(self) -> QueryContainer {
        if self.is_elided() {
            return self;
        }
        QueryContainer::from(BoolQuery { must_not: vec![self], ..BoolQuery::default() })
    }
}
