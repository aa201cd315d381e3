//! Recursive document merging.
//!
//! Later sources override earlier ones key by key rather than wholesale.
//! Folding walks both documents together: where both sides hold a mapping
//! the walk recurses, anywhere else the incoming value replaces the
//! existing one.

use crate::value::{Dict, Value};

/// Folds the `from` document onto the `onto` document, returning the merged
/// result.
///
/// Keys unique to either side survive untouched. Where both sides hold a
/// mapping the contents merge recursively; in every other conflict the
/// `from` value wins, including a scalar displacing a whole mapping or the
/// reverse. Neither input is modified and the result shares no storage with
/// either.
///
/// # Examples
///
/// ```rust
/// use strata_config::{Dict, Value, fold};
///
/// let onto = Dict::from([
///     ("host".to_owned(), Value::from("localhost")),
///     ("port".to_owned(), Value::from(8080_i64)),
/// ]);
/// let from = Dict::from([("port".to_owned(), Value::from(9090_i64))]);
///
/// let merged = fold(&from, &onto);
/// assert_eq!(merged.get("host"), Some(&Value::from("localhost")));
/// assert_eq!(merged.get("port"), Some(&Value::Integer(9090)));
/// ```
#[must_use]
pub fn fold(from: &Dict, onto: &Dict) -> Dict {
    let mut merged = onto.clone();
    for (key, incoming) in from {
        let folded = match (merged.get(key), incoming) {
            (Some(Value::Dict(existing)), Value::Dict(overlay)) => {
                Value::Dict(fold(overlay, existing))
            }
            _ => incoming.clone(),
        };
        merged.insert(key.clone(), folded);
    }
    merged
}
