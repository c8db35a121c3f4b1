use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::repository::{
    LocalSavedSchemes, RemoteSavedSchemes, SavedScheme, StoreError, UserId, LOCAL_NAMESPACE,
};
use crate::schemes::domain::SchemeId;

/// Where a change ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SavedStore {
    Remote,
    Local,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SaveOutcome {
    Saved { store: SavedStore },
    AlreadySaved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RemoveOutcome {
    Removed { store: SavedStore },
    NotSaved,
}

/// Raised only when no store could serve the request.
#[derive(Debug, thiserror::Error)]
pub enum SavedSchemesError {
    #[error("saved schemes unavailable (remote: {remote}; local: {local})")]
    Exhausted { remote: StoreError, local: StoreError },
    #[error("local saved-schemes store failed: {0}")]
    Local(#[source] StoreError),
}

/// Saved-schemes boundary: remote per-user store with a local write-through
/// fallback. Anonymous callers only ever touch the local store.
pub struct SavedSchemesService<R, L> {
    remote: Arc<R>,
    local: Arc<L>,
    namespace: String,
    writes: Mutex<()>,
}

impl<R, L> SavedSchemesService<R, L>
where
    R: RemoteSavedSchemes + 'static,
    L: LocalSavedSchemes + 'static,
{
    pub fn new(remote: Arc<R>, local: Arc<L>) -> Self {
        Self::with_namespace(remote, local, LOCAL_NAMESPACE)
    }

    pub fn with_namespace(remote: Arc<R>, local: Arc<L>, namespace: impl Into<String>) -> Self {
        Self {
            remote,
            local,
            namespace: namespace.into(),
            writes: Mutex::new(()),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn load_local(&self) -> Result<Vec<SavedScheme>, StoreError> {
        self.local.load(&self.namespace).await
    }

    pub async fn list(&self, user: Option<&UserId>) -> Result<Vec<SavedScheme>, SavedSchemesError> {
        let Some(user) = user else {
            return self.load_local().await.map_err(SavedSchemesError::Local);
        };

        match self.remote.list(user).await {
            Ok(saved) => Ok(saved),
            Err(remote) => {
                warn!(user = %user.as_str(), error = %remote, "remote saved schemes unavailable, reading local store");
                self.load_local()
                    .await
                    .map_err(|local| SavedSchemesError::Exhausted { remote, local })
            }
        }
    }

    pub async fn is_saved(
        &self,
        user: Option<&UserId>,
        scheme_id: &SchemeId,
    ) -> Result<bool, SavedSchemesError> {
        let saved = self.list(user).await?;
        Ok(saved.iter().any(|entry| &entry.scheme_id == scheme_id))
    }

    /// Idempotent: saving an already-saved scheme changes nothing.
    pub async fn add(
        &self,
        user: Option<&UserId>,
        scheme: SavedScheme,
    ) -> Result<SaveOutcome, SavedSchemesError> {
        let _guard = self.writes.lock().await;

        let current = self.list(user).await?;
        if current.iter().any(|entry| entry.scheme_id == scheme.scheme_id) {
            return Ok(SaveOutcome::AlreadySaved);
        }

        let Some(user) = user else {
            let mut updated = current;
            updated.push(scheme);
            self.local
                .persist(&self.namespace, &updated)
                .await
                .map_err(SavedSchemesError::Local)?;
            return Ok(SaveOutcome::Saved {
                store: SavedStore::Local,
            });
        };

        let scheme_id = scheme.scheme_id.clone();
        match self.remote.insert(user, scheme.clone()).await {
            Ok(()) => {
                info!(user = %user.as_str(), scheme_id = %scheme_id, "scheme saved");
                Ok(SaveOutcome::Saved {
                    store: SavedStore::Remote,
                })
            }
            Err(remote) => {
                warn!(user = %user.as_str(), scheme_id = %scheme_id, error = %remote, "remote save failed, writing to local store");
                let result: Result<(), StoreError> = async {
                    let mut local = self.load_local().await?;
                    if !local.iter().any(|entry| entry.scheme_id == scheme_id) {
                        local.push(scheme);
                    }
                    self.local.persist(&self.namespace, &local).await
                }
                .await;

                match result {
                    Ok(()) => Ok(SaveOutcome::Saved {
                        store: SavedStore::Local,
                    }),
                    Err(local) => Err(SavedSchemesError::Exhausted { remote, local }),
                }
            }
        }
    }

    /// Idempotent: removing an unsaved scheme changes nothing.
    pub async fn remove(
        &self,
        user: Option<&UserId>,
        scheme_id: &SchemeId,
    ) -> Result<RemoveOutcome, SavedSchemesError> {
        let _guard = self.writes.lock().await;

        let current = self.list(user).await?;
        if !current.iter().any(|entry| &entry.scheme_id == scheme_id) {
            return Ok(RemoveOutcome::NotSaved);
        }

        let Some(user) = user else {
            let updated: Vec<SavedScheme> = current
                .into_iter()
                .filter(|entry| &entry.scheme_id != scheme_id)
                .collect();
            self.local
                .persist(&self.namespace, &updated)
                .await
                .map_err(SavedSchemesError::Local)?;
            return Ok(RemoveOutcome::Removed {
                store: SavedStore::Local,
            });
        };

        match self.remote.delete(user, scheme_id).await {
            Ok(()) => {
                info!(user = %user.as_str(), scheme_id = %scheme_id, "saved scheme removed");
                Ok(RemoveOutcome::Removed {
                    store: SavedStore::Remote,
                })
            }
            Err(remote) => {
                warn!(user = %user.as_str(), scheme_id = %scheme_id, error = %remote, "remote removal failed, updating local store");
                let result: Result<(), StoreError> = async {
                    let local: Vec<SavedScheme> = self
                        .load_local()
                        .await?
                        .into_iter()
                        .filter(|entry| &entry.scheme_id != scheme_id)
                        .collect();
                    self.local.persist(&self.namespace, &local).await
                }
                .await;

                match result {
                    Ok(()) => Ok(RemoveOutcome::Removed {
                        store: SavedStore::Local,
                    }),
                    Err(local) => Err(SavedSchemesError::Exhausted { remote, local }),
                }
            }
        }
    }
}
