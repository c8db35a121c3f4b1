//! Shareable query-string form of a [`FacetSelection`].
//!
//! Each value is percent-encoded before joining, so a delimiter can never
//! collide with a value. Dimensions whose values routinely contain commas
//! (category, caste, ministry, occupation) join with `||`; the rest with `,`.
//! The joined parameter is encoded once more when placed in a query string.

use std::borrow::Cow;

use super::selection::FacetSelection;
use crate::schemes::facets::FacetDimension;

pub const PIPE_DELIMITER: &str = "||";
pub const COMMA_DELIMITER: &str = ",";
pub const QUERY_KEY: &str = "q";

fn delimiter(dimension: FacetDimension) -> &'static str {
    if dimension.uses_pipe_delimiter() {
        PIPE_DELIMITER
    } else {
        COMMA_DELIMITER
    }
}

fn decode(value: &str) -> String {
    match urlencoding::decode(value) {
        Ok(Cow::Borrowed(text)) => text.to_string(),
        Ok(Cow::Owned(text)) => text,
        Err(_) => value.to_string(),
    }
}

/// Parameter value for one dimension, or `None` when nothing is selected.
pub fn parameter_value(selection: &FacetSelection, dimension: FacetDimension) -> Option<String> {
    let values = selection.values(dimension);
    if values.is_empty() {
        return None;
    }
    Some(
        values
            .iter()
            .map(|value| urlencoding::encode(value).into_owned())
            .collect::<Vec<_>>()
            .join(delimiter(dimension)),
    )
}

/// Decoded `(key, value)` pairs in dimension order, ready for a URL encoder.
pub fn to_pairs(selection: &FacetSelection) -> Vec<(&'static str, String)> {
    let mut pairs: Vec<(&'static str, String)> = FacetDimension::ordered()
        .into_iter()
        .filter_map(|dimension| {
            parameter_value(selection, dimension).map(|value| (dimension.query_key(), value))
        })
        .collect();

    let query = selection.query.trim();
    if !query.is_empty() {
        pairs.push((QUERY_KEY, query.to_string()));
    }
    pairs
}

pub fn to_query_string(selection: &FacetSelection) -> String {
    to_pairs(selection)
        .into_iter()
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(&value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn split_parameter(dimension: FacetDimension, raw: &str) -> Vec<String> {
    let parts: Vec<&str> = if dimension.uses_pipe_delimiter() {
        raw.split(PIPE_DELIMITER).collect()
    } else {
        raw.split(COMMA_DELIMITER).collect()
    };

    parts
        .into_iter()
        .map(|part| decode(part.trim()))
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect()
}

/// Builds a selection from already URL-decoded `(key, value)` pairs.
///
/// Unknown keys are ignored. The legacy `category` key carries one raw value;
/// it only applies when `categories` is absent.
pub fn from_pairs<I, K, V>(pairs: I) -> FacetSelection
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut selection = FacetSelection::new();
    let mut legacy_category: Option<String> = None;

    for (key, value) in pairs {
        let key = key.as_ref();
        let value = value.as_ref();

        if key == QUERY_KEY {
            selection.query = value.to_string();
            continue;
        }

        if key == "category" {
            let value = value.trim();
            if !value.is_empty() {
                legacy_category = Some(value.to_string());
            }
            continue;
        }

        let Some(dimension) = FacetDimension::from_query_key(key) else {
            continue;
        };

        for part in split_parameter(dimension, value) {
            selection.select(dimension, part);
        }
    }

    if selection.categories.is_empty() {
        if let Some(category) = legacy_category {
            selection.select(FacetDimension::Category, category);
        }
    }

    selection
}

/// Parses a raw (still encoded) query string such as `states=Kerala&q=loan`.
pub fn from_query_string(raw: &str) -> FacetSelection {
    let raw = raw.trim_start_matches('?');
    let pairs = raw
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (
                decode(&key.replace('+', " ")),
                decode(&value.replace('+', " ")),
            )
        });
    from_pairs(pairs)
}

/// Canonical key for memoizing filter results: selection order and query
/// spacing or case do not change the key.
pub fn cache_key(selection: &FacetSelection) -> String {
    let mut canonical = selection.clone();
    canonical.query = selection.query_words().join(" ");
    for dimension in FacetDimension::ordered() {
        if !canonical.is_active(dimension) {
            canonical.clear(dimension);
        }
    }
    to_query_string(&canonical)
}
