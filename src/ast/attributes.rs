//! Typed attributes attached to blocks, marks, and objects.
//!
//!     Attribute values are JSON values; the notation delegates to a standard
//!     JSON decoder instead of re-implementing one. Keys are unique with
//!     last-write-wins assembly, and the canonical serialization emits them
//!     in code-point-sorted order. A `BTreeMap` gives both properties
//!     directly, so no separate sorting step exists anywhere in the crate.

use std::collections::BTreeMap;

/// A single attribute value: string, integer, boolean, null, array, or
/// object. `serde_json`'s default map representation is ordered, which keeps
/// nested objects canonical too.
pub type AttrValue = serde_json::Value;

/// Attribute mapping with unique, sorted keys.
pub type Attributes = BTreeMap<String, AttrValue>;

/// Build an [`Attributes`] map from `(key, value)` pairs. Later duplicates
/// win, matching parser assembly.
pub fn attrs<K, V, I>(pairs: I) -> Attributes
where
    K: Into<String>,
    V: Into<AttrValue>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_duplicates_win() {
        let a = attrs([("k", 1), ("k", 2)]);
        assert_eq!(a.get("k"), Some(&AttrValue::from(2)));
    }

    #[test]
    fn keys_iterate_sorted() {
        let a = attrs([("z", 1), ("a", 2), ("m", 3)]);
        let keys: Vec<_> = a.keys().map(String::as_str).collect();
        assert_eq!(keys, ["a", "m", "z"]);
    }
}
