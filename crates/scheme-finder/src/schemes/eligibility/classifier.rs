//! Keyword heuristics deciding whether a scheme targets students, or
//! institutions and businesses rather than individuals.

use std::path::Path;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use tracing::error;

/// Intent flags derived from a scheme's title, details and benefits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeClassification {
    pub is_student_oriented: bool,
    pub is_institutional: bool,
}

/// Pluggable classifier over lower-cased scheme text.
pub trait SchemeClassifier: Send + Sync {
    fn classify(&self, text: &str) -> SchemeClassification;
}

/// A term that only counts when none of its `unless` terms appear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalTerm {
    pub term: String,
    #[serde(default)]
    pub unless: Vec<String>,
}

impl ConditionalTerm {
    fn matches(&self, text: &str) -> bool {
        text.contains(self.term.as_str())
            && !self
                .unless
                .iter()
                .any(|exception| text.contains(exception.as_str()))
    }
}

/// Keyword sets, loadable from JSON so they can change without code edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRules {
    pub student_terms: Vec<String>,
    pub institutional_terms: Vec<String>,
    #[serde(default)]
    pub conditional_institutional_terms: Vec<ConditionalTerm>,
}

#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    #[error("failed to read keyword rules: {0}")]
    Io(#[from] std::io::Error),
    #[error("keyword rules are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("keyword rules must list at least one student term")]
    NoStudentTerms,
}

const BUNDLED_RULES: &str = include_str!("../../../../../data/classifier_rules.json");

static STANDARD_RULES: LazyLock<KeywordRules> = LazyLock::new(|| {
    KeywordRules::from_json(BUNDLED_RULES).unwrap_or_else(|error| {
        error!(%error, "bundled keyword rules failed to load, classifier disabled");
        KeywordRules {
            student_terms: Vec::new(),
            institutional_terms: Vec::new(),
            conditional_institutional_terms: Vec::new(),
        }
    })
});

impl KeywordRules {
    /// Rules shipped in `data/classifier_rules.json`.
    pub fn standard() -> Self {
        STANDARD_RULES.clone()
    }

    pub fn from_json(json: &str) -> Result<Self, RulesError> {
        let rules: Self = serde_json::from_str(json)?;
        rules.normalized()
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RulesError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    fn normalized(self) -> Result<Self, RulesError> {
        fn clean(terms: Vec<String>) -> Vec<String> {
            terms
                .into_iter()
                .map(|term| term.trim().to_lowercase())
                .filter(|term| !term.is_empty())
                .collect()
        }

        let student_terms = clean(self.student_terms);
        if student_terms.is_empty() {
            return Err(RulesError::NoStudentTerms);
        }

        Ok(Self {
            student_terms,
            institutional_terms: clean(self.institutional_terms),
            conditional_institutional_terms: self
                .conditional_institutional_terms
                .into_iter()
                .map(|conditional| ConditionalTerm {
                    term: conditional.term.trim().to_lowercase(),
                    unless: clean(conditional.unless),
                })
                .filter(|conditional| !conditional.term.is_empty())
                .collect(),
        })
    }
}

impl Default for KeywordRules {
    fn default() -> Self {
        Self::standard()
    }
}

/// Substring classifier driven by [`KeywordRules`].
#[derive(Debug, Clone, Default)]
pub struct KeywordClassifier {
    rules: KeywordRules,
}

impl KeywordClassifier {
    pub fn new(rules: KeywordRules) -> Self {
        Self { rules }
    }

    pub fn standard() -> Self {
        Self::new(KeywordRules::standard())
    }

    pub fn rules(&self) -> &KeywordRules {
        &self.rules
    }
}

impl SchemeClassifier for KeywordClassifier {
    fn classify(&self, text: &str) -> SchemeClassification {
        let text = text.to_lowercase();
        let is_institutional = self
            .rules
            .institutional_terms
            .iter()
            .any(|term| text.contains(term.as_str()))
            || self
                .rules
                .conditional_institutional_terms
                .iter()
                .any(|conditional| conditional.matches(&text));
        let is_student_oriented = self
            .rules
            .student_terms
            .iter()
            .any(|term| text.contains(term.as_str()));

        SchemeClassification {
            is_student_oriented,
            is_institutional,
        }
    }
}
