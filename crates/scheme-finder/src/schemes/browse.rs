//! Browse summaries: schemes per state and per central ministry.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{RegexSet, RegexSetBuilder};
use serde::Serialize;

use super::domain::Scheme;

const UNION_TERRITORIES: [&str; 6] = [
    "Andaman and Nicobar Islands",
    "Chandigarh",
    "Dadra and Nagar Haveli and Daman and Diu",
    "Delhi",
    "Lakshadweep",
    "Puducherry",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateSummary {
    pub name: String,
    pub scheme_count: usize,
    /// Nationwide schemes also open to residents of this state.
    pub central_count: usize,
    pub is_union_territory: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MinistrySummary {
    pub name: String,
    pub short_name: String,
    pub scheme_count: usize,
}

/// States with at least one state-run scheme, alphabetically.
pub fn state_summaries(schemes: &[Scheme]) -> Vec<StateSummary> {
    let central_count = schemes.iter().filter(|scheme| scheme.is_central()).count();

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for scheme in schemes.iter().filter(|scheme| !scheme.is_central()) {
        let state = scheme.classified_state.trim();
        if state.eq_ignore_ascii_case("All States") {
            continue;
        }
        *counts.entry(state).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(name, scheme_count)| StateSummary {
            name: name.to_string(),
            scheme_count,
            central_count,
            is_union_territory: UNION_TERRITORIES.contains(&name),
        })
        .collect()
}

/// Ministries that look like central government entities, most schemes first.
pub fn ministry_summaries(schemes: &[Scheme]) -> Vec<MinistrySummary> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for scheme in schemes {
        *counts.entry(scheme.ministry.as_str()).or_default() += 1;
    }

    let mut summaries: Vec<MinistrySummary> = counts
        .into_iter()
        .filter(|(name, _)| is_central_ministry(name))
        .map(|(name, scheme_count)| MinistrySummary {
            name: name.to_string(),
            short_name: short_name(name),
            scheme_count,
        })
        .collect();

    summaries.sort_by(|left, right| {
        right
            .scheme_count
            .cmp(&left.scheme_count)
            .then_with(|| left.name.cmp(&right.name))
    });
    summaries
}

pub fn short_name(name: &str) -> String {
    if name.chars().count() > 60 {
        let prefix: String = name.chars().take(57).collect();
        format!("{prefix}...")
    } else {
        name.to_string()
    }
}

/// Text that is a scheme description or a state body rather than a ministry.
static DESCRIPTION_PATTERNS: LazyLock<RegexSet> = LazyLock::new(|| {
    case_insensitive(&[
        r"Scholarship-Free Education",
        r"Stationary-Text Books",
        r"welfare scheme that",
        r"financial support to",
        r"The objective of this scheme",
        r"provides financial support",
        r"cash award.*author",
        r"subsidy.*provided",
        r"Training by Department for",
        r"Stipend Scheme \(",
        r"Braille Watches by",
        r"Book Binder Training",
        r"Educational Assistance for Government",
        r"@ \d+%",
        r"\d+th Std",
        r"Fellowship.*awarded",
        r"Government of [A-Z][a-z]",
        r"for the educational upliftment",
        r"aims to promote",
        r"personality development",
        r"observation skills",
        r"through funding",
        r"educational tours",
        r"Empowerment for the",
        r"Govt\. of India\.",
        r"and Co-operation\.",
    ])
});

static VAGUE_DEPARTMENTS: LazyLock<RegexSet> = LazyLock::new(|| {
    case_insensitive(&[
        r"^Department of Social Justice\.?$",
        r"^Department of Education\.?$",
        r"^Department of Agriculture\.?$",
        r"^Department of Govt\. of India\.?$",
        r"^Department of Agriculture and Co-operation\.?$",
        r"^Empowerment for the",
    ])
});

static CENTRAL_ENTITIES: LazyLock<RegexSet> = LazyLock::new(|| {
    case_insensitive(&[
        r"^Ministry of",
        r"^Comptroller And Auditor General",
        r"^NITI Aayog",
        r"^The Lokpal of India",
        r"^Cabinet Secretariat",
        r"^Prime Minister",
        r"^Department of Atomic Energy",
        r"^Department of Space",
        r"^National",
        r"^Central",
    ])
});

fn case_insensitive(patterns: &[&str]) -> RegexSet {
    RegexSetBuilder::new(patterns)
        .case_insensitive(true)
        .build()
        .unwrap_or_else(|_| RegexSet::empty())
}

const STATE_SPECIFIC_TERMS: [&str; 25] = [
    "government of",
    "state of",
    "union territory of",
    "puducherry",
    "goa",
    "karnataka",
    "arunachal pradesh",
    "madhya pradesh",
    "tripura",
    "sikkim",
    "haryana",
    "chhattisgarh",
    "uttar pradesh",
    "andaman and nicobar",
    "tamil nadu",
    "kerala",
    "west bengal",
    "odisha",
    "aims to",
    "provides",
    "for the",
    "through",
    "with the objective",
    "educational upliftment",
    "personality development",
];

/// Heuristic separating central ministries and departments from scheme
/// descriptions and state departments that leak into the ministry field.
pub fn is_central_ministry(name: &str) -> bool {
    let name = name.trim();
    let length = name.chars().count();
    if DESCRIPTION_PATTERNS.is_match(name) || !(10..=200).contains(&length) || name.ends_with('.')
    {
        return false;
    }

    if VAGUE_DEPARTMENTS.is_match(name) {
        return false;
    }
    if CENTRAL_ENTITIES.is_match(name) {
        return true;
    }

    if name.starts_with("Department of") {
        if !(25..=150).contains(&length) {
            return false;
        }
        let lower = name.to_lowercase();
        return !STATE_SPECIFIC_TERMS
            .iter()
            .any(|term| lower.contains(term));
    }

    false
}
