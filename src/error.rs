use thiserror::Error;

pub type Result<T, E = QueryError> = std::result::Result<T, E>;

/// Everything that can go wrong while reading or writing the wire format.
///
/// Building a clause never fails; illogical clauses (`min_children >
/// max_children` and friends) are carried as-built for the engine to judge.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Read path: an object key that no registered clause kind claims.
    #[error("unrecognized clause kind `{kind}` at {path}")]
    UnrecognizedClauseKind { kind: String, path: String },

    /// Read path: a known field with the wrong shape.
    #[error("malformed field `{field}` at {path}: expected {expected}")]
    MalformedField {
        field: String,
        expected: String,
        path: String,
    },

    /// Reserved. Containers are last-write-wins, so this is never produced today.
    #[error("query container holds more than one clause ({})", kinds.join(", "))]
    AmbiguousContainerState { kinds: Vec<String> },

    /// Write path: a strict clause turned out to be conditionless.
    #[error("`{kind}` query is conditionless but strict is turned on")]
    StrictConditionless { kind: &'static str },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl QueryError {
    pub(crate) fn malformed(
        field: impl Into<String>,
        expected: impl Into<String>,
        path: impl ToString,
    ) -> Self {
        QueryError::MalformedField {
            field: field.into(),
            expected: expected.into(),
            path: path.to_string(),
        }
    }

    /// The JSON pointer of the offending node, for the read-path errors.
    pub fn path(&self) -> Option<&str> {
        match self {
            QueryError::UnrecognizedClauseKind { path, .. }
            | QueryError::MalformedField { path, .. } => Some(path),
            _ => None,
        }
    }
}
