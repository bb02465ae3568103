//! Minimal CLI: query documents → (check | normalize)
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use serde_json::Value;

use crate::error::QueryError;
use crate::query::QueryContainer;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// parse search-query JSON documents, report conditionless clauses, or re-emit them with those clauses elided
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// parse every document and print one status line per document
    Check(CheckOut),
    /// parse every document and print it back with conditionless clauses dropped
    Normalize(NormalizeOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select the query inside each document (e.g. /query)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document.
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct CheckOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// treat conditionless documents as failures
    #[arg(long)]
    deny_conditionless: bool,
}

#[derive(clap::Parser, Debug)]
struct NormalizeOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output file (stdout if omitted); one document per line with --compact
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// single-line JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,
}

/// One query document pulled out of an input file.
#[derive(Debug)]
struct Document {
    /// `path`, `path:line` for NDJSON, with `#n` appended per jq output.
    origin: String,
    value: Value,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_documents(&self) -> Result<Vec<Document>> {
        let source_paths = resolve_file_path_patterns(&self.input)?;
        let mut documents = Vec::new();
        for source_path in source_paths {
            let source_path_str = source_path.to_string_lossy().to_string();
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read source file: {source_path_str}"))?;
            if self.ndjson {
                for (index, line) in source.lines().enumerate() {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let origin = format!("{source_path_str}:{}", index + 1);
                    let json_value = serde_json::from_str::<Value>(line)
                        .with_context(|| format!("failed to parse JSON ({origin})"))?;
                    self.select(origin, json_value, &mut documents)?;
                }
            } else {
                let json_value = serde_json::from_str::<Value>(&source)
                    .with_context(|| format!("failed to parse JSON source file ({source_path_str})"))?;
                self.select(source_path_str, json_value, &mut documents)?;
            }
        }
        tracing::debug!(count = documents.len(), "loaded query documents");
        Ok(documents)
    }

    /// Applies `--jq-expr`, then `--json-pointer`.
    fn select(&self, origin: String, json_value: Value, out: &mut Vec<Document>) -> Result<()> {
        let values = match self.jq_expr.as_ref() {
            None => vec![json_value],
            Some(jq_expr) => crate::jq_exec::run_jaq(jq_expr, &json_value)
                .with_context(|| format!("failed to apply jq expression to {origin}"))?,
        };
        let many = values.len() > 1;
        for (index, value) in values.into_iter().enumerate() {
            let origin = if many { format!("{origin}#{index}") } else { origin.clone() };
            let value = match self.json_pointer.as_deref() {
                None => value,
                Some(pointer) => match value.pointer(pointer) {
                    Some(selected) => selected.clone(),
                    None => bail!("JSON pointer {pointer} selects nothing in {origin}"),
                },
            };
            out.push(Document { origin, value });
        }
        Ok(())
    }
}

enum Outcome {
    Ok,
    Conditionless,
    Failed(QueryError),
}

fn check_document(document: &Document) -> Outcome {
    match crate::codec::from_value(&document.value) {
        Ok(container) if container.is_conditionless() => Outcome::Conditionless,
        Ok(_) => Outcome::Ok,
        Err(error) => Outcome::Failed(error),
    }
}

fn normalize_document(document: &Document, compact: bool) -> Result<Option<String>> {
    let container: QueryContainer = crate::codec::from_value(&document.value)
        .with_context(|| format!("failed to parse query ({})", document.origin))?;
    let written = if compact {
        crate::codec::to_string(&container)
    } else {
        crate::codec::to_string_pretty(&container)
    };
    written.with_context(|| format!("failed to write query ({})", document.origin))
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> Result<ExitCode> {
        match &self.cmd {
            Command::Check(target) => {
                let documents = target.input_settings.load_documents()?;
                let outcomes = documents.par_iter().map(check_document).collect::<Vec<_>>();
                let mut failed = 0usize;
                for (document, outcome) in documents.iter().zip(outcomes) {
                    match outcome {
                        Outcome::Ok => println!("{} {}", "ok".green(), document.origin),
                        Outcome::Conditionless => {
                            if target.deny_conditionless {
                                failed += 1;
                            }
                            println!("{} {}", "conditionless".yellow(), document.origin);
                        }
                        Outcome::Failed(error) => {
                            failed += 1;
                            println!("{} {}: {error}", "error".red(), document.origin);
                        }
                    }
                }
                eprintln!("{} documents, {failed} failed", documents.len());
                Ok(if failed == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE })
            }
            Command::Normalize(target) => {
                let documents = target.input_settings.load_documents()?;
                let rendered = documents
                    .par_iter()
                    .map(|document| normalize_document(document, target.compact))
                    .collect::<Result<Vec<_>>>()?;
                let output = join_rendered(rendered);

                if let Some(out) = target.out.as_ref() {
                    if let Some(parent) = out.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(out, &output)
                        .with_context(|| format!("failed to write {}", out.display()))?;
                } else {
                    print!("{output}");
                }
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// Fully conditionless documents have nothing left to print; when none
/// remain the output is empty, not a lone newline.
fn join_rendered(rendered: Vec<Option<String>>) -> String {
    let mut output = String::new();
    for text in rendered.into_iter().flatten() {
        output.push_str(&text);
        output.push('\n');
    }
    output
}

/// Literal paths pass through untouched; anything with glob syntax must match
/// at least one file.
fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut paths = Vec::new();
    for pattern in patterns {
        let pattern = pattern.as_ref();
        if !pattern.contains(['*', '?', '[', '{']) {
            paths.push(PathBuf::from(pattern));
            continue;
        }
        let matches = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {pattern}"))?
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("failed to expand glob pattern: {pattern}"))?;
        if matches.is_empty() {
            bail!("glob pattern matched no query documents: {pattern}");
        }
        paths.extend(matches);
    }
    Ok(paths)
}
