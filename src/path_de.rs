use serde::de::DeserializeOwned;
use serde_json::Value;
use serde_path_to_error::Segment;

use crate::codec::Pointer;
use crate::error::QueryError;

/// Deserialize a typed sub-document found at `at`, keeping the JSON path of
/// the first failure in the error.
///
/// `field` names the sub-document itself (e.g. `inner_hits`); when the failure
/// is deeper inside, the innermost key is reported instead.
pub fn from_value_with_path<T: DeserializeOwned>(
    value: &Value,
    field: &str,
    at: &Pointer,
) -> Result<T, QueryError> {
    match serde_path_to_error::deserialize::<_, T>(value) {
        Ok(v) => Ok(v),
        Err(err) => {
            let mut path = at.clone();
            let mut innermost = field.to_string();
            for segment in err.path().iter() {
                match segment {
                    Segment::Map { key } => {
                        innermost = key.clone();
                        path = path.child(key);
                    }
                    Segment::Seq { index } => path = path.child(index),
                    Segment::Enum { variant } => path = path.child(variant),
                    Segment::Unknown => {}
                }
            }
            Err(QueryError::malformed(innermost, err.into_inner().to_string(), path))
        }
    }
}
