use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::schemes::domain::{Scheme, SchemeId};

/// Fixed local-storage namespace for saved schemes.
pub const LOCAL_NAMESPACE: &str = "schemeFinder_savedSchemes";

/// Identity of a signed-in user, as provided by the authentication layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    /// Blank identities are treated as anonymous.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        (!value.is_empty()).then(|| Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Snapshot of a scheme at the time it was saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedScheme {
    pub scheme_id: SchemeId,
    pub title: String,
    pub details: String,
    pub benefits: String,
    pub classified_state: String,
    pub filter_scheme_category: Vec<String>,
    pub filter_gender: String,
    pub filter_caste: Vec<String>,
    pub ministry: String,
    pub saved_at: DateTime<Utc>,
}

impl SavedScheme {
    pub fn snapshot(scheme: &Scheme, saved_at: DateTime<Utc>) -> Self {
        Self {
            scheme_id: scheme.scheme_id.clone(),
            title: scheme.title.clone(),
            details: scheme.details.clone(),
            benefits: scheme.benefits.clone(),
            classified_state: scheme.classified_state.clone(),
            filter_scheme_category: scheme.filter_scheme_category.clone(),
            filter_gender: scheme.filter_gender.clone(),
            filter_caste: scheme.filter_caste.clone(),
            ministry: scheme.ministry.clone(),
            saved_at,
        }
    }
}

impl From<&Scheme> for SavedScheme {
    fn from(scheme: &Scheme) -> Self {
        Self::snapshot(scheme, Utc::now())
    }
}

/// Hosted per-user store.
#[async_trait]
pub trait RemoteSavedSchemes: Send + Sync {
    async fn list(&self, user: &UserId) -> Result<Vec<SavedScheme>, StoreError>;
    async fn insert(&self, user: &UserId, scheme: SavedScheme) -> Result<(), StoreError>;
    async fn delete(&self, user: &UserId, scheme_id: &SchemeId) -> Result<(), StoreError>;
}

/// Device-local store holding one list per namespace.
#[async_trait]
pub trait LocalSavedSchemes: Send + Sync {
    async fn load(&self, namespace: &str) -> Result<Vec<SavedScheme>, StoreError>;
    async fn persist(&self, namespace: &str, schemes: &[SavedScheme]) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("store io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("store payload invalid: {0}")]
    Serialization(#[from] serde_json::Error),
}
