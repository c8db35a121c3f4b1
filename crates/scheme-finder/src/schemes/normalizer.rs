use super::domain::{
    DisabilityBucket, DisabilityLabels, Faq, Scheme, SchemeId, SpecialCategories, AGE_BUCKETS,
    ALL, ALL_INDIA, CENTRAL, NOT_SPECIFIED, NO_OCCUPATION,
};
use super::raw::{RangeCriteria, RawSchemeRecord, StringOrList};
use std::collections::BTreeSet;

const UNTITLED: &str = "Untitled Scheme";
const RESIDENCE_BOTH: &str = "Both";
const AGE_CEILING: f64 = 110.0;

/// Converts raw dataset records into canonical [`Scheme`] values.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    disability_labels: DisabilityLabels,
}

impl Normalizer {
    pub fn new(disability_labels: DisabilityLabels) -> Self {
        Self { disability_labels }
    }

    pub fn disability_labels(&self) -> DisabilityLabels {
        self.disability_labels
    }

    /// Pure mapping from one raw record; never fails, malformed fields take defaults.
    pub fn normalize(&self, raw: &RawSchemeRecord) -> Scheme {
        let residence = array_to_single_value(raw.residence.as_deref(), RESIDENCE_BOTH);
        let residence = if residence == RESIDENCE_BOTH {
            ALL.to_string()
        } else {
            residence
        };

        let special_categories = match &raw.special_categories {
            Some(StringOrList::One(value)) => SpecialCategories::One(value.clone()),
            Some(StringOrList::Many(values)) => SpecialCategories::Many(values.clone()),
            None => SpecialCategories::default(),
        };

        Scheme {
            scheme_id: SchemeId(raw.scheme_id.clone().unwrap_or_default().trim().to_string()),
            title: raw
                .scheme_name
                .clone()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| UNTITLED.to_string()),
            url: text(&raw.url),
            ministry: raw
                .ministry
                .as_ref()
                .and_then(|ministries| ministries.first().cloned())
                .unwrap_or_default(),
            details: text(&raw.details),
            benefits: text(&raw.benefits),
            eligibility: text(&raw.eligibility),
            exclusions: text(&raw.exclusions),
            application_process: text(&raw.application_process),
            documents_required: text(&raw.documents_required),
            faq: raw
                .faqs
                .iter()
                .map(|faq| Faq {
                    question: text(&faq.question),
                    answer: text(&faq.answer),
                })
                .collect(),
            sources_and_references: text(&raw.sources_references),
            classified_state: primary_state(raw.states.as_deref()),
            filter_scheme_category: raw.scheme_category.clone().unwrap_or_default(),
            filter_gender: array_to_single_value(raw.gender.as_deref(), ALL),
            filter_residence: residence,
            filter_benefit_type: array_to_single_value(raw.benefit_type.as_deref(), ALL),
            filter_marital_status: array_to_single_value(raw.marital_status.as_deref(), ALL),
            filter_employment_status: array_to_single_value(
                raw.employment_status.as_deref(),
                ALL,
            ),
            filter_occupation: array_to_single_value(raw.occupations.as_deref(), NO_OCCUPATION),
            filter_caste: raw
                .caste_categories
                .clone()
                .filter(|castes| !castes.is_empty())
                .unwrap_or_else(|| vec![ALL.to_string()]),
            filter_special_categories: special_categories,
            filter_disability_percentage: disability_bucket(
                raw.requires_disability,
                raw.disability_percent.as_ref(),
            )
            .label(self.disability_labels)
            .to_string(),
            age_tags: age_tags(raw.age_criteria.as_ref()),
            age_coverage_description: raw.age_criteria.as_ref().map(age_coverage),
            scheme_level: raw.scheme_level.clone(),
            implementation_type: raw.implementation_type.clone(),
        }
    }
}

/// Normalizes with the default disability naming.
pub fn normalize(raw: &RawSchemeRecord) -> Scheme {
    Normalizer::default().normalize(raw)
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// Collapses a multi-valued raw field to one value.
///
/// Returns `default` for an absent or empty sequence, `"All"` when the sequence
/// contains `"All"` or more than one distinct value, otherwise the sole value.
pub fn array_to_single_value(values: Option<&[String]>, default: &str) -> String {
    let Some(values) = values.filter(|values| !values.is_empty()) else {
        return default.to_string();
    };

    let distinct: BTreeSet<&str> = values.iter().map(String::as_str).collect();
    if distinct.contains(ALL) || distinct.len() > 1 {
        return ALL.to_string();
    }

    values[0].clone()
}

/// Picks the scheme's primary jurisdiction, `"Central"` for nationwide schemes.
pub fn primary_state(states: Option<&[String]>) -> String {
    let Some(states) = states.filter(|states| !states.is_empty()) else {
        return CENTRAL.to_string();
    };

    if states.iter().any(|state| state == ALL_INDIA) {
        return CENTRAL.to_string();
    }

    states
        .iter()
        .find(|state| state.as_str() != NOT_SPECIFIED && state.as_str() != ALL_INDIA)
        .cloned()
        .unwrap_or_else(|| CENTRAL.to_string())
}

pub fn disability_bucket(
    requires_disability: bool,
    percent: Option<&RangeCriteria>,
) -> DisabilityBucket {
    if !requires_disability {
        return DisabilityBucket::NoRequirement;
    }

    let Some(range) = percent.filter(|range| range.lower().is_some() || range.upper().is_some())
    else {
        return DisabilityBucket::Any;
    };

    let min = range.lower().unwrap_or(0.0);
    let max = range.upper().unwrap_or(100.0);

    if min >= 80.0 {
        DisabilityBucket::Profound
    } else if min >= 60.0 {
        DisabilityBucket::Severe
    } else if min >= 40.0 {
        DisabilityBucket::Moderate
    } else if min >= 1.0 && max < 40.0 {
        DisabilityBucket::Mild
    } else {
        DisabilityBucket::Any
    }
}

/// Age bucket labels overlapping the criteria range.
///
/// Absent criteria, or criteria overlapping no bucket, yield every bucket.
pub fn age_tags(criteria: Option<&RangeCriteria>) -> Vec<String> {
    let all = || -> Vec<String> { AGE_BUCKETS.iter().map(|bucket| bucket.label.to_string()).collect() };
    let Some(criteria) = criteria else {
        return all();
    };

    let min = criteria.lower().unwrap_or(0.0);
    let max = criteria.upper().unwrap_or(AGE_CEILING);

    let tags: Vec<String> = AGE_BUCKETS
        .iter()
        .filter(|bucket| min <= f64::from(bucket.max) && max >= f64::from(bucket.min))
        .map(|bucket| bucket.label.to_string())
        .collect();

    if tags.is_empty() {
        all()
    } else {
        tags
    }
}

fn age_coverage(criteria: &RangeCriteria) -> String {
    format!(
        "{} - {} years",
        display_bound(criteria.lower().unwrap_or(0.0)),
        display_bound(criteria.upper().unwrap_or(AGE_CEILING))
    )
}

fn display_bound(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    fn range(min: Option<f64>, max: Option<f64>) -> RangeCriteria {
        RangeCriteria { min, max }
    }

    #[test]
    fn single_value_collapse_follows_cardinality() {
        assert_eq!(array_to_single_value(Some(strings(&["Male"]).as_slice()), ALL), "Male");
        assert_eq!(
            array_to_single_value(Some(strings(&["Male", "Female"]).as_slice()), ALL),
            "All"
        );
        assert_eq!(array_to_single_value(Some(strings(&["Male", "Male"]).as_slice()), ALL), "Male");
        assert_eq!(array_to_single_value(Some(strings(&["All"]).as_slice()), ALL), "All");
        assert_eq!(array_to_single_value(Some(&[][..]), NO_OCCUPATION), "No");
        assert_eq!(array_to_single_value(None, NO_OCCUPATION), "No");
    }

    #[test]
    fn primary_state_prefers_first_specific_entry() {
        assert_eq!(primary_state(None), "Central");
        assert_eq!(primary_state(Some(strings(&["Kerala", "All India"]).as_slice())), "Central");
        assert_eq!(primary_state(Some(strings(&["Not specified"]).as_slice())), "Central");
        assert_eq!(
            primary_state(Some(strings(&["Not specified", "Goa", "Kerala"]).as_slice())),
            "Goa"
        );
    }

    #[test]
    fn disability_bucket_boundaries() {
        assert_eq!(disability_bucket(false, None), DisabilityBucket::NoRequirement);
        assert_eq!(disability_bucket(true, None), DisabilityBucket::Any);
        assert_eq!(
            disability_bucket(true, Some(&range(Some(0.0), Some(0.0)))),
            DisabilityBucket::Any
        );
        assert_eq!(
            disability_bucket(true, Some(&range(Some(79.0), None))),
            DisabilityBucket::Severe
        );
        assert_eq!(
            disability_bucket(true, Some(&range(Some(80.0), None))),
            DisabilityBucket::Profound
        );
        assert_eq!(
            disability_bucket(true, Some(&range(Some(40.0), Some(59.0)))),
            DisabilityBucket::Moderate
        );
        assert_eq!(
            disability_bucket(true, Some(&range(Some(5.0), Some(39.0)))),
            DisabilityBucket::Mild
        );
        assert_eq!(
            disability_bucket(true, Some(&range(None, Some(70.0)))),
            DisabilityBucket::Any
        );
    }

    #[test]
    fn age_tags_cover_overlapping_buckets() {
        let tags = age_tags(Some(&range(Some(18.0), Some(25.0))));
        assert_eq!(tags, strings(&["11-20", "21-30"]));
        assert!(!tags.contains(&"31-40".to_string()));
    }

    #[test]
    fn age_tags_fall_back_to_every_bucket() {
        assert_eq!(age_tags(None).len(), AGE_BUCKETS.len());
        assert_eq!(
            age_tags(Some(&range(Some(200.0), Some(300.0)))).len(),
            AGE_BUCKETS.len()
        );
    }

    #[test]
    fn normalize_applies_documented_defaults() {
        let raw: RawSchemeRecord = serde_json::from_value(json!({
            "scheme_id": "s-1",
            "residence": ["Both"],
            "occupations": [],
        }))
        .expect("raw record");

        let scheme = normalize(&raw);
        assert_eq!(scheme.title, "Untitled Scheme");
        assert_eq!(scheme.ministry, "");
        assert_eq!(scheme.classified_state, "Central");
        assert_eq!(scheme.filter_residence, "All");
        assert_eq!(scheme.filter_occupation, "No");
        assert_eq!(scheme.filter_caste, strings(&["All"]));
        assert_eq!(scheme.filter_disability_percentage, "No Disability Requirement");
        assert_eq!(scheme.age_tags.len(), AGE_BUCKETS.len());
        assert!(scheme.age_coverage_description.is_none());
    }

    #[test]
    fn normalize_uses_configured_top_disability_label() {
        let raw: RawSchemeRecord = serde_json::from_value(json!({
            "scheme_id": "s-2",
            "requires_disability": true,
            "disability_percent": {"min": 85, "max": 100},
            "age_criteria": {"min": 18, "max": 60}
        }))
        .expect("raw record");

        let profound = Normalizer::new(DisabilityLabels::Profound).normalize(&raw);
        let very_severe = Normalizer::new(DisabilityLabels::VerySevere).normalize(&raw);
        assert_eq!(
            profound.filter_disability_percentage,
            "Profound/Very Severe Disability (80-100%)"
        );
        assert_eq!(
            very_severe.filter_disability_percentage,
            "Very Severe Disability (80%+)"
        );
        assert_eq!(
            profound.age_coverage_description.as_deref(),
            Some("18 - 60 years")
        );
    }

    #[test]
    fn normalize_is_deterministic() {
        let raw: RawSchemeRecord = serde_json::from_value(json!({
            "scheme_id": "s-3",
            "scheme_name": "Widow Pension",
            "states": ["Kerala"],
            "gender": ["Female"],
            "marital_status": ["Widowed"],
            "scheme_category": ["Social welfare & Empowerment", "Women and Child"]
        }))
        .expect("raw record");

        assert_eq!(normalize(&raw), normalize(&raw));
    }
}
