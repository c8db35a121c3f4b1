use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::schemes::domain::ALL;
use crate::schemes::facets::FacetDimension;

/// Selected values per facet dimension plus the free-text query.
///
/// An empty set, or a set holding `All`, places no constraint on its dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FacetSelection {
    pub categories: BTreeSet<String>,
    pub states: BTreeSet<String>,
    pub gender: BTreeSet<String>,
    pub caste: BTreeSet<String>,
    pub residence: BTreeSet<String>,
    pub benefit_type: BTreeSet<String>,
    pub marital_status: BTreeSet<String>,
    pub employment_status: BTreeSet<String>,
    pub occupation: BTreeSet<String>,
    pub special_categories: BTreeSet<String>,
    pub disability_percentage: BTreeSet<String>,
    pub age_group: BTreeSet<String>,
    pub ministry: BTreeSet<String>,
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("unknown facet dimension '{0}'")]
    UnknownDimension(String),
}

impl FacetSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn values(&self, dimension: FacetDimension) -> &BTreeSet<String> {
        match dimension {
            FacetDimension::Category => &self.categories,
            FacetDimension::State => &self.states,
            FacetDimension::Gender => &self.gender,
            FacetDimension::Caste => &self.caste,
            FacetDimension::Residence => &self.residence,
            FacetDimension::BenefitType => &self.benefit_type,
            FacetDimension::MaritalStatus => &self.marital_status,
            FacetDimension::EmploymentStatus => &self.employment_status,
            FacetDimension::Occupation => &self.occupation,
            FacetDimension::SpecialCategories => &self.special_categories,
            FacetDimension::DisabilityPercentage => &self.disability_percentage,
            FacetDimension::AgeGroup => &self.age_group,
            FacetDimension::Ministry => &self.ministry,
        }
    }

    fn values_mut(&mut self, dimension: FacetDimension) -> &mut BTreeSet<String> {
        match dimension {
            FacetDimension::Category => &mut self.categories,
            FacetDimension::State => &mut self.states,
            FacetDimension::Gender => &mut self.gender,
            FacetDimension::Caste => &mut self.caste,
            FacetDimension::Residence => &mut self.residence,
            FacetDimension::BenefitType => &mut self.benefit_type,
            FacetDimension::MaritalStatus => &mut self.marital_status,
            FacetDimension::EmploymentStatus => &mut self.employment_status,
            FacetDimension::Occupation => &mut self.occupation,
            FacetDimension::SpecialCategories => &mut self.special_categories,
            FacetDimension::DisabilityPercentage => &mut self.disability_percentage,
            FacetDimension::AgeGroup => &mut self.age_group,
            FacetDimension::Ministry => &mut self.ministry,
        }
    }

    /// Adds a value. `All` clears its siblings; a specific value drops `All`.
    pub fn select(&mut self, dimension: FacetDimension, value: impl Into<String>) {
        let value = value.into();
        let value = value.trim();
        if value.is_empty() {
            return;
        }

        let values = self.values_mut(dimension);
        if value == ALL {
            values.clear();
        } else {
            values.remove(ALL);
        }
        values.insert(value.to_string());
    }

    pub fn deselect(&mut self, dimension: FacetDimension, value: &str) {
        self.values_mut(dimension).remove(value.trim());
    }

    /// Checkbox-style toggle.
    pub fn set_checked(&mut self, dimension: FacetDimension, value: &str, checked: bool) {
        if checked {
            self.select(dimension, value);
        } else {
            self.deselect(dimension, value);
        }
    }

    /// Toggle addressed by query key, as sent by clients.
    pub fn set_checked_by_key(
        &mut self,
        key: &str,
        value: &str,
        checked: bool,
    ) -> Result<(), SelectionError> {
        let dimension = FacetDimension::from_query_key(key)
            .ok_or_else(|| SelectionError::UnknownDimension(key.to_string()))?;
        self.set_checked(dimension, value, checked);
        Ok(())
    }

    pub fn clear(&mut self, dimension: FacetDimension) {
        self.values_mut(dimension).clear();
    }

    pub fn with(mut self, dimension: FacetDimension, value: impl Into<String>) -> Self {
        self.select(dimension, value);
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// True when the dimension constrains the result set.
    pub fn is_active(&self, dimension: FacetDimension) -> bool {
        let values = self.values(dimension);
        !values.is_empty() && !values.contains(ALL)
    }

    pub fn active_dimensions(&self) -> impl Iterator<Item = FacetDimension> + '_ {
        FacetDimension::ordered()
            .into_iter()
            .filter(|dimension| self.is_active(*dimension))
    }

    /// Lower-cased, whitespace-separated query words.
    pub fn query_words(&self) -> Vec<String> {
        self.query
            .to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    pub fn is_unconstrained(&self) -> bool {
        self.active_dimensions().next().is_none() && self.query.trim().is_empty()
    }
}
