use serde::{Deserialize, Serialize};

/// Which matching policy the engine applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EligibilityStrategy {
    /// Every specified scheme requirement must match the profile.
    #[default]
    Strict,
    /// Partial credit per matched signal; only hard conflicts exclude.
    Scored,
}

impl EligibilityStrategy {
    pub fn from_name(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "strict" => Some(Self::Strict),
            "scored" | "score" => Some(Self::Scored),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Scored => "scored",
        }
    }
}

impl std::fmt::Display for EligibilityStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityConfig {
    pub strategy: EligibilityStrategy,
    /// Inclusion threshold for the scored strategy.
    pub minimum_score: i16,
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self {
            strategy: EligibilityStrategy::Strict,
            minimum_score: 20,
        }
    }
}
