//! Eligibility matching of a questionnaire profile against the catalog.

mod classifier;
mod config;
mod profile;
mod rules;
mod scoring;

pub use classifier::{
    ConditionalTerm, KeywordClassifier, KeywordRules, RulesError, SchemeClassification,
    SchemeClassifier,
};
pub use config::{EligibilityConfig, EligibilityStrategy};
pub use profile::{Answer, EligibilityProfile};
pub use rules::{Exclusion, SpecialRequirement};
pub use scoring::{MatchSignal, ScoreComponent};

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::domain::{Scheme, SchemeId};

/// Per-scheme verdict with its audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemeAssessment {
    pub scheme_id: SchemeId,
    pub eligible: bool,
    pub classification: SchemeClassification,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusion: Option<Exclusion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i16>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<ScoreComponent>,
}

/// One scheme that passed, with its score under the scored strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibleScheme<'a> {
    pub scheme: &'a Scheme,
    pub score: Option<i16>,
    pub components: Vec<ScoreComponent>,
}

/// Eligible schemes in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibilityOutcome<'a> {
    pub strategy: EligibilityStrategy,
    pub evaluated: usize,
    pub eligible: Vec<EligibleScheme<'a>>,
}

impl<'a> EligibilityOutcome<'a> {
    pub fn schemes(&self) -> Vec<&'a Scheme> {
        self.eligible.iter().map(|entry| entry.scheme).collect()
    }

    pub fn len(&self) -> usize {
        self.eligible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.eligible.is_empty()
    }
}

/// Stateless evaluator combining the rule set with a pluggable classifier.
pub struct EligibilityEngine {
    config: EligibilityConfig,
    classifier: Arc<dyn SchemeClassifier>,
}

impl std::fmt::Debug for EligibilityEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EligibilityEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for EligibilityEngine {
    fn default() -> Self {
        Self::new(EligibilityConfig::default())
    }
}

impl EligibilityEngine {
    pub fn new(config: EligibilityConfig) -> Self {
        Self::with_classifier(config, Arc::new(KeywordClassifier::standard()))
    }

    pub fn with_classifier(config: EligibilityConfig, classifier: Arc<dyn SchemeClassifier>) -> Self {
        Self { config, classifier }
    }

    pub fn config(&self) -> &EligibilityConfig {
        &self.config
    }

    pub fn classify(&self, scheme: &Scheme) -> SchemeClassification {
        self.classifier.classify(&scheme.classification_text())
    }

    /// Full verdict for one scheme under `strategy`.
    pub fn assess(
        &self,
        scheme: &Scheme,
        profile: &EligibilityProfile,
        strategy: EligibilityStrategy,
    ) -> SchemeAssessment {
        let classification = self.classify(scheme);
        let (eligible, exclusion, score, components) = match strategy {
            EligibilityStrategy::Strict => match rules::check_strict(scheme, profile, classification) {
                Ok(()) => (true, None, None, Vec::new()),
                Err(exclusion) => (false, Some(exclusion), None, Vec::new()),
            },
            EligibilityStrategy::Scored => match scoring::score_scheme(scheme, profile, classification) {
                Ok((total, components)) => {
                    (total >= self.config.minimum_score, None, Some(total), components)
                }
                Err(exclusion) => (false, Some(exclusion), None, Vec::new()),
            },
        };

        SchemeAssessment {
            scheme_id: scheme.scheme_id.clone(),
            eligible,
            classification,
            exclusion,
            score,
            components,
        }
    }

    /// Stable filter of `schemes` under `strategy`.
    pub fn evaluate<'a>(
        &self,
        schemes: &'a [Scheme],
        profile: &EligibilityProfile,
        strategy: EligibilityStrategy,
    ) -> EligibilityOutcome<'a> {
        let eligible: Vec<EligibleScheme<'a>> = schemes
            .iter()
            .filter_map(|scheme| {
                let assessment = self.assess(scheme, profile, strategy);
                assessment.eligible.then(|| EligibleScheme {
                    scheme,
                    score: assessment.score,
                    components: assessment.components,
                })
            })
            .collect();

        debug!(
            strategy = %strategy,
            evaluated = schemes.len(),
            eligible = eligible.len(),
            "eligibility evaluated"
        );

        EligibilityOutcome {
            strategy,
            evaluated: schemes.len(),
            eligible,
        }
    }

    /// Eligible schemes under the configured strategy, in input order.
    pub fn match_eligibility<'a>(
        &self,
        schemes: &'a [Scheme],
        profile: &EligibilityProfile,
    ) -> Vec<&'a Scheme> {
        self.evaluate(schemes, profile, self.config.strategy).schemes()
    }
}

/// Strict matching with the standard keyword classifier.
pub fn match_eligibility<'a>(schemes: &'a [Scheme], profile: &EligibilityProfile) -> Vec<&'a Scheme> {
    EligibilityEngine::default().match_eligibility(schemes, profile)
}
