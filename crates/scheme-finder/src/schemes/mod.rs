//! Government welfare scheme catalog: normalization, faceted filtering,
//! eligibility matching, browse summaries and saved schemes.

pub mod browse;
pub mod catalog;
pub mod domain;
pub mod eligibility;
pub mod export;
pub mod facets;
pub mod filter;
pub mod normalizer;
pub mod raw;
pub mod router;
pub mod saved;
pub mod service;

#[cfg(test)]
mod tests;

pub use browse::{MinistrySummary, StateSummary};
pub use catalog::{DatasetError, LoadReport, SchemeCatalog};
pub use domain::{DisabilityLabels, Scheme, SchemeId};
pub use eligibility::{
    EligibilityConfig, EligibilityEngine, EligibilityOutcome, EligibilityProfile,
    EligibilityStrategy, KeywordClassifier, KeywordRules, RulesError, SchemeAssessment,
};
pub use facets::{FacetDimension, FacetIndex};
pub use filter::{FacetSelection, FilterCache};
pub use normalizer::Normalizer;
pub use raw::RawSchemeRecord;
pub use router::scheme_router;
pub use service::{SchemeFinderService, SchemePage, SchemeServiceError};
