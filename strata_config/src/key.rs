//! Key normalisation.
//!
//! Lookups tolerate the casing and separator conventions of different
//! sources: environment variables shout in upper snake case while JSON
//! documents tend towards camel or lower case. Normalising both the stored
//! keys and the lookup key onto one canonical form makes `LOWERCase`,
//! `lower_case`, and `lowercase` the same key.

/// The separator character removed during normalisation.
const SEPARATOR: char = '_';

/// Normalises a key for storage and lookup.
///
/// Lowercases the key and strips every underscore. Delimiters and any other
/// punctuation pass through untouched, so a flattened path keeps its shape.
/// The function is idempotent: normalising an already-normalised key returns
/// it unchanged.
///
/// # Examples
///
/// ```rust
/// use strata_config::normalise;
///
/// assert_eq!(normalise("LOWERCase"), "lowercase");
/// assert_eq!(normalise("lower_case"), "lowercase");
/// assert_eq!(normalise("db:Pool_Size"), "db:poolsize");
/// ```
#[must_use]
pub fn normalise(key: &str) -> String {
    key.chars()
        .filter(|character| *character != SEPARATOR)
        .flat_map(char::to_lowercase)
        .collect()
}

/// Normalises a delimited lookup path one segment at a time.
///
/// Splitting first keeps the delimiter intact even when it contains
/// characters that [`normalise`] would otherwise strip or lowercase, such
/// as an underscore.
pub(crate) fn normalise_path(key: &str, delimiter: &str) -> String {
    if delimiter.is_empty() {
        return normalise(key);
    }
    key.split(delimiter)
        .map(normalise)
        .collect::<Vec<_>>()
        .join(delimiter)
}
