use proptest::prelude::*;
use search_dsl::{
    ChildScoreMode, Clause, HasChildQueryBuilder, MatchAllQuery, Query, QueryBuilder, QueryContainer,
    QueryDescriptor, QueryError, TermQuery, TypeName, Untyped, codec,
};
use serde_json::json;

struct Product;
search_dsl::document_type!(Product => "product");

fn has_child(container: &QueryContainer) -> &search_dsl::HasChildQuery {
    match container.query() {
        Some(Query::HasChild(q)) => q,
        other => panic!("expected has_child, got {other:?}"),
    }
}

#[test]
fn conditionless_tracks_embedded_query() {
    let q = QueryBuilder::<Untyped>::new();

    let empty_child = q.has_child::<Product, _>(|c| c.query(|q| q.term("sku", "")));
    assert!(empty_child.is_conditionless());

    let no_child = q.has_child::<Product, _>(|c| c.min_children(1));
    assert!(no_child.is_conditionless());

    let real_child = q.has_child::<Product, _>(|c| c.query(|q| q.term("sku", "A-1")));
    assert!(!real_child.is_conditionless());

    // recursion through nested wrappers
    let nested = q.has_child::<Product, _>(|c| c.query(|q| q.has_child::<Product, _>(|c| c.query(|q| q.term("sku", "")))));
    assert!(nested.is_conditionless());
}

#[test]
fn empty_container_is_conditionless() {
    assert!(QueryContainer::new().is_conditionless());
    assert_eq!(codec::to_value(&QueryContainer::new()).unwrap(), None);
}

#[test]
fn round_trips_fully_populated_clause() {
    let built = QueryBuilder::<Untyped>::new().has_child::<Product, _>(|c| {
        c.score_mode(ChildScoreMode::Max)
            .min_children(2)
            .max_children(5)
            .query(|q| q.match_all())
    });
    let wire = codec::to_value(&built).unwrap().unwrap();
    assert_eq!(
        wire,
        json!({"has_child": {
            "type": "product",
            "score_type": "max",
            "min_children": 2,
            "max_children": 5,
            "query": {"match_all": {}}
        }}),
    );
    let parsed = codec::from_value(&wire).unwrap();
    assert_eq!(parsed, built);

    let q = has_child(&parsed);
    assert_eq!(q.type_name, TypeName::try_new("product"));
    assert_eq!(q.score_mode, Some(ChildScoreMode::Max));
    assert_eq!((q.min_children, q.max_children), (Some(2), Some(5)));
    assert_eq!(q.query, Some(QueryContainer::from(MatchAllQuery::default())));
}

#[test]
fn unset_max_children_is_omitted() {
    let built = QueryContainer::from(
        HasChildQueryBuilder::<Product>::new()
            .min_children(3)
            .query(|q| q.match_all()),
    );
    let wire = codec::to_value(&built).unwrap().unwrap();
    let body = wire["has_child"].as_object().unwrap();
    assert!(body.contains_key("min_children"));
    assert!(!body.contains_key("max_children"));
    assert!(!body.contains_key("score_type"));
    assert!(!body.contains_key("inner_hits"));
}

#[test]
fn second_assignment_replaces_first() {
    let mut container = QueryBuilder::<Untyped>::new().has_child::<Product, _>(|c| c.query(|q| q.match_all()));
    container.assign(TermQuery::new("user", "kimchy"));
    assert_eq!(container.query().map(Query::kind), Some(TermQuery::KIND));
    assert_eq!(codec::to_value(&container).unwrap(), Some(json!({"term": {"user": "kimchy"}})));
}

#[test]
fn parses_minimal_has_child() {
    let container = codec::from_value(&json!({"has_child": {"type": "comment", "query": {"match_all": {}}}})).unwrap();
    let q = has_child(&container);
    assert_eq!(q.type_name, TypeName::try_new("comment"));
    assert_eq!(q.score_mode, None);
    assert_eq!(q.min_children, None);
    assert_eq!(q.max_children, None);
    assert_eq!(q.inner_hits, None);
    assert_eq!(q.query, Some(QueryContainer::from(MatchAllQuery::default())));
}

#[test]
fn string_count_is_malformed() {
    let err = codec::from_value(&json!({"has_child": {"type": "x", "min_children": "oops"}})).unwrap_err();
    match err {
        QueryError::MalformedField { field, expected, path } => {
            assert_eq!(field, "min_children");
            assert_eq!(expected, "a non-negative integer");
            assert_eq!(path, "/has_child/min_children");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unknown_kind_is_unrecognized() {
    let err = codec::from_value(&json!({"unknown_clause": {}})).unwrap_err();
    assert!(matches!(err, QueryError::UnrecognizedClauseKind { ref kind, .. } if kind == "unknown_clause"));
}

#[test]
fn unknown_kind_nested_under_query_reports_its_path() {
    let err = codec::from_str(r#"{"has_child": {"type": "comment", "query": {"fuzzy_thing": {}}}}"#).unwrap_err();
    match err {
        QueryError::UnrecognizedClauseKind { kind, path } => {
            assert_eq!(kind, "fuzzy_thing");
            assert_eq!(path, "/has_child/query/fuzzy_thing");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn inner_hits_and_metadata_round_trip() {
    let built = QueryContainer::from(
        HasChildQueryBuilder::<Product>::new()
            .query(|q| q.term_with("color", "red", |t| t.boost(2.0)))
            .inner_hits_with(|ih| ih.name("red_ones").from(1).size(10).option("_source", false))
            .boost(1.5)
            .name("products"),
    );
    let text = codec::to_string(&built).unwrap().unwrap();
    assert_eq!(codec::from_str(&text).unwrap(), built);
}

#[test]
fn strict_flag_turns_elision_into_error() {
    let strict = QueryContainer::from(HasChildQueryBuilder::<Product>::new().strict(true));
    assert!(matches!(
        codec::to_value(&strict),
        Err(QueryError::StrictConditionless { kind: "has_child" })
    ));

    let verbatim = QueryContainer::from(HasChildQueryBuilder::<Product>::new().verbatim(true));
    assert_eq!(codec::to_value(&verbatim).unwrap(), Some(json!({"has_child": {"type": "product"}})));
}

#[test]
fn conditionless_child_is_elided_from_bool_list() {
    let q = QueryBuilder::<Untyped>::new();
    let container = q.bool(|b| {
        b.should([
            q.has_child::<Product, _>(|c| c.query(|q| q.term("sku", ""))),
            q.has_child::<Product, _>(|c| c.query(|q| q.term("sku", "A-1"))),
        ])
    });
    assert_eq!(
        codec::to_value(&container).unwrap(),
        Some(json!({"bool": {"should": [
            {"has_child": {"type": "product", "query": {"term": {"sku": "A-1"}}}}
        ]}})),
    );
}

fn score_mode() -> impl Strategy<Value = Option<ChildScoreMode>> {
    prop_oneof![
        Just(None),
        Just(Some(ChildScoreMode::None)),
        Just(Some(ChildScoreMode::Average)),
        Just(Some(ChildScoreMode::Sum)),
        Just(Some(ChildScoreMode::Max)),
        Just(Some(ChildScoreMode::Min)),
    ]
}

/// Any value a `term` can be built with that is not conditionless.
fn term_value() -> impl Strategy<Value = serde_json::Value> {
    let scalar = prop_oneof![
        "[A-Z0-9-]{1,8}".prop_map(serde_json::Value::from),
        any::<i64>().prop_map(serde_json::Value::from),
        any::<bool>().prop_map(serde_json::Value::from),
        (-1.0e6f64..1.0e6).prop_map(serde_json::Value::from),
    ];
    prop_oneof![
        4 => scalar.clone(),
        1 => proptest::collection::vec(scalar.clone(), 0..4).prop_map(serde_json::Value::from),
        1 => proptest::collection::btree_map("[a-z]{1,6}", scalar, 0..4)
            .prop_map(|entries| entries.into_iter().collect::<serde_json::Map<_, _>>().into()),
    ]
}

proptest! {
    #[test]
    fn has_child_round_trips(
        type_name in "[a-z][a-z_]{0,11}",
        mode in score_mode(),
        min in proptest::option::of(0u32..1000),
        max in proptest::option::of(0u32..1000),
        sku in term_value(),
    ) {
        let mut builder = HasChildQueryBuilder::<Untyped>::new()
            .type_name(type_name)
            .query(|q| q.term("sku", sku));
        if let Some(mode) = mode { builder = builder.score_mode(mode); }
        if let Some(min) = min { builder = builder.min_children(min); }
        if let Some(max) = max { builder = builder.max_children(max); }
        let built = QueryContainer::from(builder);

        let wire = codec::to_value(&built).unwrap().unwrap();
        prop_assert_eq!(codec::from_value(&wire).unwrap(), built);
    }

    #[test]
    fn term_round_trips_with_metadata(
        value in term_value(),
        boost in proptest::option::of(0.1f64..10.0),
        name in proptest::option::of("[a-z]{1,8}"),
    ) {
        let built = QueryBuilder::<Untyped>::new().term_with("field", value, |mut t| {
            if let Some(boost) = boost { t = t.boost(boost); }
            if let Some(name) = name { t = t.name(name); }
            t
        });
        let wire = codec::to_value(&built).unwrap().unwrap();
        prop_assert_eq!(codec::from_value(&wire).unwrap(), built);
    }
}
