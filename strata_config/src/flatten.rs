//! Document flattening.
//!
//! Nested documents collapse into a single-level map whose keys are the
//! paths from the root to each leaf, joined with a delimiter. Flattening
//! copies keys verbatim; normalisation happens separately so the two
//! concerns stay independent.

use crate::value::{Dict, Value};

/// The delimiter joining path segments in flattened keys.
pub const DEFAULT_DELIMITER: &str = ":";

/// Flattens a nested document into delimiter-joined leaf paths.
///
/// Every scalar leaf appears under the path of keys leading to it. Mappings
/// themselves never appear in the output, so an empty nested mapping
/// contributes nothing.
///
/// # Examples
///
/// ```rust
/// use strata_config::{Dict, Value, flatten};
///
/// let document = Dict::from([(
///     "db".to_owned(),
///     Value::from(Dict::from([(
///         "pool".to_owned(),
///         Value::from(Dict::from([("size".to_owned(), Value::from(8_i64))])),
///     )])),
/// )]);
///
/// let flat = flatten(&document, ":");
/// assert_eq!(flat.get("db:pool:size"), Some(&Value::Integer(8)));
/// ```
#[must_use]
pub fn flatten(document: &Dict, delimiter: &str) -> Dict {
    let mut flat = Dict::new();
    flatten_into(&mut flat, document, "", delimiter);
    flat
}

fn flatten_into(flat: &mut Dict, node: &Dict, prefix: &str, delimiter: &str) {
    for (key, value) in node {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}{delimiter}{key}")
        };
        match value {
            Value::Dict(nested) => flatten_into(flat, nested, &path, delimiter),
            scalar => {
                flat.insert(path, scalar.clone());
            }
        }
    }
}
