//! Facet dimensions and the counted option lists derived from the catalog.

mod labels;

pub use labels::{caste_label, ministry_label};

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::domain::{DisabilityBucket, Scheme, ALL, AGE_BUCKETS};

/// Every filterable dimension of a scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetDimension {
    Category,
    State,
    Gender,
    Caste,
    Residence,
    BenefitType,
    MaritalStatus,
    EmploymentStatus,
    Occupation,
    SpecialCategories,
    DisabilityPercentage,
    AgeGroup,
    Ministry,
}

impl FacetDimension {
    pub const fn ordered() -> [Self; 13] {
        [
            Self::Category,
            Self::State,
            Self::Gender,
            Self::Caste,
            Self::Residence,
            Self::BenefitType,
            Self::MaritalStatus,
            Self::EmploymentStatus,
            Self::Occupation,
            Self::SpecialCategories,
            Self::DisabilityPercentage,
            Self::AgeGroup,
            Self::Ministry,
        ]
    }

    /// Key used for the dimension in shareable query strings.
    pub const fn query_key(self) -> &'static str {
        match self {
            Self::Category => "categories",
            Self::State => "states",
            Self::Gender => "gender",
            Self::Caste => "caste",
            Self::Residence => "residence",
            Self::BenefitType => "benefitType",
            Self::MaritalStatus => "maritalStatus",
            Self::EmploymentStatus => "employmentStatus",
            Self::Occupation => "occupation",
            Self::SpecialCategories => "specialCategories",
            Self::DisabilityPercentage => "disabilityPercentage",
            Self::AgeGroup => "ageGroup",
            Self::Ministry => "ministry",
        }
    }

    pub fn from_query_key(key: &str) -> Option<Self> {
        match key {
            "category" => Some(Self::Category),
            "state" => Some(Self::State),
            other => Self::ordered()
                .into_iter()
                .find(|dimension| dimension.query_key() == other),
        }
    }

    /// Dimensions whose values may themselves contain commas.
    pub const fn uses_pipe_delimiter(self) -> bool {
        matches!(
            self,
            Self::Category | Self::Caste | Self::Ministry | Self::Occupation
        )
    }

    /// Dimensions where a scheme can carry several values at once.
    pub const fn is_multi_valued(self) -> bool {
        matches!(
            self,
            Self::Category | Self::Caste | Self::SpecialCategories | Self::AgeGroup
        )
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Category => "Category",
            Self::State => "State",
            Self::Gender => "Gender",
            Self::Caste => "Caste",
            Self::Residence => "Residence",
            Self::BenefitType => "Benefit Type",
            Self::MaritalStatus => "Marital Status",
            Self::EmploymentStatus => "Employment Status",
            Self::Occupation => "Occupation",
            Self::SpecialCategories => "Special Categories",
            Self::DisabilityPercentage => "Disability Percentage",
            Self::AgeGroup => "Age Group",
            Self::Ministry => "Ministry",
        }
    }

    /// Raw values a scheme carries for this dimension.
    pub fn scheme_values(self, scheme: &Scheme) -> Vec<&str> {
        match self {
            Self::Category => scheme
                .filter_scheme_category
                .iter()
                .map(String::as_str)
                .collect(),
            Self::State => vec![scheme.classified_state.as_str()],
            Self::Gender => vec![scheme.filter_gender.as_str()],
            Self::Caste => scheme.filter_caste.iter().map(String::as_str).collect(),
            Self::Residence => vec![scheme.filter_residence.as_str()],
            Self::BenefitType => vec![scheme.filter_benefit_type.as_str()],
            Self::MaritalStatus => vec![scheme.filter_marital_status.as_str()],
            Self::EmploymentStatus => vec![scheme.filter_employment_status.as_str()],
            Self::Occupation => vec![scheme.filter_occupation.as_str()],
            Self::SpecialCategories => scheme.filter_special_categories.values(),
            Self::DisabilityPercentage => vec![scheme.filter_disability_percentage.as_str()],
            Self::AgeGroup => scheme.age_tags.iter().map(String::as_str).collect(),
            Self::Ministry => vec![scheme.ministry.as_str()],
        }
    }

    fn curated_rank(self, value: &str) -> Option<usize> {
        match self {
            Self::AgeGroup => AGE_BUCKETS.iter().position(|bucket| bucket.label == value),
            Self::DisabilityPercentage => DisabilityBucket::from_label(value)
                .and_then(|bucket| {
                    DisabilityBucket::ordered()
                        .iter()
                        .position(|candidate| *candidate == bucket)
                }),
            _ => None,
        }
    }
}

impl std::fmt::Display for FacetDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.query_key())
    }
}

/// One selectable value within a facet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetOption {
    pub value: String,
    pub label: String,
    pub count: usize,
}

/// Option list for one dimension, `All` first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Facet {
    pub dimension: FacetDimension,
    pub key: &'static str,
    pub title: &'static str,
    pub options: Vec<FacetOption>,
}

/// Read-only derivation of every facet over one catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FacetIndex {
    pub total: usize,
    pub facets: Vec<Facet>,
}

impl FacetIndex {
    pub fn build(schemes: &[Scheme]) -> Self {
        let facets = FacetDimension::ordered()
            .into_iter()
            .map(|dimension| Facet {
                dimension,
                key: dimension.query_key(),
                title: dimension.title(),
                options: facet_options(schemes, dimension),
            })
            .collect();

        Self {
            total: schemes.len(),
            facets,
        }
    }

    pub fn facet(&self, dimension: FacetDimension) -> Option<&Facet> {
        self.facets.iter().find(|facet| facet.dimension == dimension)
    }

    pub fn count(&self, dimension: FacetDimension, value: &str) -> usize {
        self.facet(dimension)
            .and_then(|facet| facet.options.iter().find(|option| option.value == value))
            .map(|option| option.count)
            .unwrap_or(0)
    }
}

/// Counted options for one dimension. A scheme counts once per distinct value
/// it carries; `All`-valued and blank entries only feed the `All` aggregate.
pub fn facet_options(schemes: &[Scheme], dimension: FacetDimension) -> Vec<FacetOption> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for scheme in schemes {
        let distinct: BTreeSet<&str> = dimension
            .scheme_values(scheme)
            .into_iter()
            .map(str::trim)
            .filter(|value| !value.is_empty() && *value != ALL)
            .collect();
        for value in distinct {
            *counts.entry(value).or_default() += 1;
        }
    }

    let mut options: Vec<FacetOption> = counts
        .into_iter()
        .map(|(value, count)| FacetOption {
            value: value.to_string(),
            label: labels::option_label(dimension, value),
            count,
        })
        .collect();

    options.sort_by(|left, right| {
        match (
            dimension.curated_rank(&left.value),
            dimension.curated_rank(&right.value),
        ) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => left
                .label
                .to_lowercase()
                .cmp(&right.label.to_lowercase())
                .then_with(|| left.value.cmp(&right.value)),
        }
    });

    let mut result = Vec::with_capacity(options.len() + 1);
    result.push(FacetOption {
        value: ALL.to_string(),
        label: labels::option_label(dimension, ALL),
        count: schemes.len(),
    });
    result.extend(options);
    result
}
