use crate::schemes::domain::Scheme;

/// Conjunctive substring search: every word must occur somewhere in the
/// scheme's searchable text. Words are expected lower-cased.
pub fn matches_query(scheme: &Scheme, words: &[String]) -> bool {
    if words.is_empty() {
        return true;
    }
    let haystack = scheme.searchable_text();
    words.iter().all(|word| haystack.contains(word.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemes::normalizer::normalize;
    use crate::schemes::raw::RawSchemeRecord;
    use serde_json::json;

    fn words(query: &str) -> Vec<String> {
        query
            .to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn every_word_must_be_present() {
        let raw: RawSchemeRecord = serde_json::from_value(json!({
            "scheme_id": "girls",
            "scheme_name": "Scholarship for Girl Students",
            "ministry": ["Ministry of Education"]
        }))
        .expect("raw record");
        let scheme = normalize(&raw);

        assert!(matches_query(&scheme, &words("scholarship girl")));
        assert!(matches_query(&scheme, &words("EDUCATION")));
        assert!(!matches_query(&scheme, &words("scholarship boy")));
        assert!(matches_query(&scheme, &[]));
    }

    #[test]
    fn categories_and_state_are_searchable() {
        let raw: RawSchemeRecord = serde_json::from_value(json!({
            "scheme_id": "kerala",
            "states": ["Kerala"],
            "scheme_category": ["Housing & Shelter"]
        }))
        .expect("raw record");
        let scheme = normalize(&raw);

        assert!(matches_query(&scheme, &words("kerala shelter")));
    }
}
