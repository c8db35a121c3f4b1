use serde::{Deserialize, Serialize};

/// Sentinel meaning "no restriction" on a demographic field.
pub const ALL: &str = "All";
/// Primary-state sentinel for nationwide schemes.
pub const CENTRAL: &str = "Central";
pub const ALL_INDIA: &str = "All India";
pub const NOT_SPECIFIED: &str = "Not specified";
/// Occupation sentinel meaning "no specific occupation required".
pub const NO_OCCUPATION: &str = "No";
pub const ALL_AGES: &str = "All Ages";

/// Identifier wrapper for catalog schemes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemeId(pub String);

impl SchemeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SchemeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SchemeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Question/answer pair shown on the scheme detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

/// Special categories arrive either as a single label or a list of labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpecialCategories {
    One(String),
    Many(Vec<String>),
}

impl SpecialCategories {
    /// Non-empty labels carried by the scheme.
    pub fn values(&self) -> Vec<&str> {
        match self {
            SpecialCategories::One(value) => {
                if value.trim().is_empty() {
                    Vec::new()
                } else {
                    vec![value.as_str()]
                }
            }
            SpecialCategories::Many(values) => values
                .iter()
                .map(String::as_str)
                .filter(|value| !value.trim().is_empty())
                .collect(),
        }
    }
}

impl Default for SpecialCategories {
    fn default() -> Self {
        SpecialCategories::Many(Vec::new())
    }
}

/// Canonical scheme entity built once from a raw record and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scheme {
    pub scheme_id: SchemeId,
    pub title: String,
    pub url: String,
    pub ministry: String,
    pub details: String,
    pub benefits: String,
    pub eligibility: String,
    pub exclusions: String,
    pub application_process: String,
    pub documents_required: String,
    pub faq: Vec<Faq>,
    pub sources_and_references: String,
    pub classified_state: String,
    pub filter_scheme_category: Vec<String>,
    pub filter_gender: String,
    pub filter_residence: String,
    pub filter_benefit_type: String,
    pub filter_marital_status: String,
    pub filter_employment_status: String,
    pub filter_occupation: String,
    pub filter_caste: Vec<String>,
    pub filter_special_categories: SpecialCategories,
    pub filter_disability_percentage: String,
    pub age_tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_coverage_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implementation_type: Option<String>,
}

impl Scheme {
    /// Lower-cased haystack for the free-text search.
    pub fn searchable_text(&self) -> String {
        [
            self.title.as_str(),
            self.details.as_str(),
            self.benefits.as_str(),
            self.ministry.as_str(),
            self.classified_state.as_str(),
            &self.filter_scheme_category.join(" "),
        ]
        .join(" ")
        .to_lowercase()
    }

    /// Lower-cased text used by the intent classifier.
    pub fn classification_text(&self) -> String {
        format!("{} {} {}", self.title, self.details, self.benefits).to_lowercase()
    }

    pub fn is_central(&self) -> bool {
        let state = self.classified_state.trim();
        state.is_empty() || state == CENTRAL || state == ALL_INDIA
    }
}

/// Fixed disability buckets derived from `requires_disability` and `disability_percent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisabilityBucket {
    NoRequirement,
    Any,
    Mild,
    Moderate,
    Severe,
    Profound,
}

/// Naming of the top disability bucket; the dataset variants disagree on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisabilityLabels {
    /// "Profound/Very Severe Disability (80-100%)"
    #[default]
    Profound,
    /// "Very Severe Disability (80%+)"
    VerySevere,
}

impl DisabilityLabels {
    pub fn from_name(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "profound" => Some(Self::Profound),
            "very_severe" | "very-severe" | "verysevere" => Some(Self::VerySevere),
            _ => None,
        }
    }
}

impl DisabilityBucket {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::NoRequirement,
            Self::Any,
            Self::Mild,
            Self::Moderate,
            Self::Severe,
            Self::Profound,
        ]
    }

    pub const fn label(self, labels: DisabilityLabels) -> &'static str {
        match self {
            Self::NoRequirement => "No Disability Requirement",
            Self::Any => "Any Disability (1%+)",
            Self::Mild => "Mild Disability (1-39%)",
            Self::Moderate => "Moderate Disability (40-59%)",
            Self::Severe => "Severe Disability (60-79%)",
            Self::Profound => match labels {
                DisabilityLabels::Profound => "Profound/Very Severe Disability (80-100%)",
                DisabilityLabels::VerySevere => "Very Severe Disability (80%+)",
            },
        }
    }

    /// Resolves a label from either naming variant.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ordered().into_iter().find(|bucket| {
            bucket.label(DisabilityLabels::Profound) == label
                || bucket.label(DisabilityLabels::VerySevere) == label
        })
    }
}

pub const NO_DISABILITY_REQUIREMENT: &str = "No Disability Requirement";

/// One of the fixed ten-year age buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeBucket {
    pub label: &'static str,
    pub min: u16,
    pub max: u16,
}

impl AgeBucket {
    pub fn contains(&self, age: u32) -> bool {
        age >= u32::from(self.min) && age <= u32::from(self.max)
    }
}

pub const AGE_BUCKETS: [AgeBucket; 11] = [
    AgeBucket { label: "0-10", min: 0, max: 10 },
    AgeBucket { label: "11-20", min: 11, max: 20 },
    AgeBucket { label: "21-30", min: 21, max: 30 },
    AgeBucket { label: "31-40", min: 31, max: 40 },
    AgeBucket { label: "41-50", min: 41, max: 50 },
    AgeBucket { label: "51-60", min: 51, max: 60 },
    AgeBucket { label: "61-70", min: 61, max: 70 },
    AgeBucket { label: "71-80", min: 71, max: 80 },
    AgeBucket { label: "81-90", min: 81, max: 90 },
    AgeBucket { label: "91-100", min: 91, max: 100 },
    AgeBucket { label: "101-110", min: 101, max: 110 },
];

/// Parses an age tag such as `"21-30"` into its inclusive bounds.
pub fn parse_age_tag(tag: &str) -> Option<(u32, u32)> {
    let (min, max) = tag.trim().split_once('-')?;
    let min = min.trim().parse().ok()?;
    let max = max.trim().parse().ok()?;
    Some((min, max))
}
