//! Display labels for facet options. Labels never feed back into matching.

use super::FacetDimension;
use crate::schemes::domain::{ALL, ALL_AGES, NO_OCCUPATION};

pub(crate) fn option_label(dimension: FacetDimension, value: &str) -> String {
    if value == ALL {
        return match dimension {
            FacetDimension::AgeGroup => ALL_AGES.to_string(),
            _ => ALL.to_string(),
        };
    }

    match dimension {
        FacetDimension::Ministry => ministry_label(value),
        FacetDimension::Caste => caste_label(value),
        FacetDimension::Occupation => occupation_label(value),
        FacetDimension::EmploymentStatus => employment_label(value),
        FacetDimension::Category => category_label(value),
        FacetDimension::AgeGroup => format!("{value} years"),
        _ => value.to_string(),
    }
}

/// Drops a leading "Ministry of" so long ministry names fit the sidebar.
pub fn ministry_label(value: &str) -> String {
    let trimmed = value.trim();
    for prefix in ["Ministry of ", "Ministry Of ", "Ministry OF "] {
        if let Some(rest) = trimmed.strip_prefix(prefix) {
            let rest = rest.trim();
            if !rest.is_empty() {
                return rest.to_string();
            }
        }
    }
    trimmed.to_string()
}

/// Uses the parenthesised acronym when the caste name carries one, e.g. `Scheduled Caste (SC)`.
pub fn caste_label(value: &str) -> String {
    let acronym = value
        .rfind('(')
        .and_then(|open| {
            let rest = &value[open + 1..];
            rest.find(')').map(|close| &rest[..close])
        })
        .map(str::trim)
        .filter(|candidate| {
            !candidate.is_empty()
                && candidate
                    .chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        });

    match acronym {
        Some(acronym) => acronym.to_string(),
        None => value.trim().to_string(),
    }
}

fn occupation_label(value: &str) -> String {
    match value {
        NO_OCCUPATION => "No Specific Occupation".to_string(),
        "Tea and Ex-Tea Garden tribes" => "Tea Garden Worker".to_string(),
        other => other.to_string(),
    }
}

fn employment_label(value: &str) -> String {
    match value {
        "Self-Employed/ Entrepreneur" => "Self-Employed".to_string(),
        other => other.to_string(),
    }
}

/// Raw category names are comma-joined without spaces (`Agriculture,Rural & Environment`).
fn category_label(value: &str) -> String {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}
