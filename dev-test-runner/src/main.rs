//! Pushes realistic query bodies through parse → write → parse and reports
//! which ones survive unchanged.
use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;
use search_dsl::codec;
use serde_json::{json, Value};

/// Query bodies as clients actually send them:
/// - parent/child lookups with and without inner hits
/// - bool trees mixing real and empty clauses
/// - long-form terms carrying metadata
fn realistic_samples() -> Vec<(&'static str, Value)> {
    vec![
        ("minimal has_child", json!({
            "has_child": {"type": "comment", "query": {"match_all": {}}}
        })),
        ("scored has_child with bounds", json!({
            "has_child": {
                "type": "answer",
                "score_type": "max",
                "min_children": 2,
                "max_children": 10,
                "query": {"term": {"accepted": true}},
                "inner_hits": {"name": "top_answers", "size": 3, "sort": [{"votes": "desc"}]}
            }
        })),
        ("bool of parents", json!({
            "bool": {
                "must": [
                    {"term": {"status": "published"}},
                    {"has_child": {"type": "comment", "query": {"term": {"author": "kimchy"}}}}
                ],
                "should": {"term": {"tags": {"value": "rust", "boost": 2.0, "_name": "rusty"}}},
                "minimum_should_match": 1
            }
        })),
        ("term over an array value", json!({
            "term": {"tags": {"value": ["rust", "search"]}}
        })),
        ("inverted bounds are kept", json!({
            "has_child": {"type": "review", "min_children": 9, "max_children": 1, "query": {"match_all": {"boost": 0.5}}}
        })),
    ]
}

/// Bodies that parse fine but have nothing left to send.
fn conditionless_samples() -> Vec<(&'static str, Value)> {
    vec![
        ("has_child without query", json!({"has_child": {"type": "comment"}})),
        ("has_child over empty term", json!({"has_child": {"type": "comment", "query": {"term": {"author": ""}}}})),
        ("bool of empties", json!({"bool": {"must": [{"term": {"a": ""}}], "filter": [{}]}})),
    ]
}

fn round_trip(sample: &Value) -> Result<()> {
    let first = codec::from_value(sample).context("first parse")?;
    let written = codec::to_value(&first)
        .context("write")?
        .context("clause was elided on write")?;
    let second = codec::from_value(&written).context("second parse")?;
    anyhow::ensure!(first == second, "round trip changed the query:\n{written:#}");
    Ok(())
}

fn elides(sample: &Value) -> Result<()> {
    let container = codec::from_value(sample).context("parse")?;
    anyhow::ensure!(container.is_conditionless(), "expected a conditionless query");
    anyhow::ensure!(codec::to_value(&container)?.is_none(), "conditionless query was written");
    Ok(())
}

fn main() -> ExitCode {
    let mut failed = 0;
    eprintln!("—— round trips ——");
    for (label, sample) in realistic_samples() {
        match round_trip(&sample) {
            Ok(()) => eprintln!("✅ {}", label.green()),
            Err(error) => {
                failed += 1;
                eprintln!("❌ {}: {error:#}", label.red());
            }
        }
    }
    eprintln!("—— elision ——");
    for (label, sample) in conditionless_samples() {
        match elides(&sample) {
            Ok(()) => eprintln!("✅ {}", label.green()),
            Err(error) => {
                failed += 1;
                eprintln!("❌ {}: {error:#}", label.red());
            }
        }
    }
    if failed == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
