use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::schemes::domain::SchemeId;
use crate::schemes::normalizer::normalize;
use crate::schemes::raw::RawSchemeRecord;
use crate::schemes::saved::{
    LocalSavedSchemes, RemoteSavedSchemes, SavedScheme, SavedSchemesService, StoreError, UserId,
};

pub(crate) fn saved(id: &str) -> SavedScheme {
    let raw: RawSchemeRecord = serde_json::from_value(serde_json::json!({
        "scheme_id": id,
        "scheme_name": format!("Scheme {id}"),
        "states": ["Kerala"]
    }))
    .expect("raw record");
    let saved_at = Utc
        .with_ymd_and_hms(2025, 3, 1, 9, 30, 0)
        .single()
        .expect("valid timestamp");
    SavedScheme::snapshot(&normalize(&raw), saved_at)
}

pub(crate) fn user() -> UserId {
    UserId("user-42".to_string())
}

pub(crate) fn ids(saved: &[SavedScheme]) -> Vec<&str> {
    saved.iter().map(|entry| entry.scheme_id.as_str()).collect()
}

#[derive(Default)]
pub(crate) struct MemoryRemote {
    entries: Mutex<HashMap<UserId, Vec<SavedScheme>>>,
    failing: AtomicBool,
}

impl MemoryRemote {
    pub(crate) fn failing() -> Self {
        let remote = Self::default();
        remote.set_failing(true);
        remote
    }

    pub(crate) fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub(crate) fn entries_for(&self, user: &UserId) -> Vec<SavedScheme> {
        self.entries
            .lock()
            .expect("remote lock")
            .get(user)
            .cloned()
            .unwrap_or_default()
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("remote offline".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RemoteSavedSchemes for MemoryRemote {
    async fn list(&self, user: &UserId) -> Result<Vec<SavedScheme>, StoreError> {
        self.check()?;
        Ok(self.entries_for(user))
    }

    async fn insert(&self, user: &UserId, scheme: SavedScheme) -> Result<(), StoreError> {
        self.check()?;
        self.entries
            .lock()
            .expect("remote lock")
            .entry(user.clone())
            .or_default()
            .push(scheme);
        Ok(())
    }

    async fn delete(&self, user: &UserId, scheme_id: &SchemeId) -> Result<(), StoreError> {
        self.check()?;
        if let Some(entries) = self.entries.lock().expect("remote lock").get_mut(user) {
            entries.retain(|entry| &entry.scheme_id != scheme_id);
        }
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct MemoryLocal {
    namespaces: Mutex<HashMap<String, Vec<SavedScheme>>>,
    failing: AtomicBool,
}

impl MemoryLocal {
    pub(crate) fn failing() -> Self {
        let local = Self::default();
        local.failing.store(true, Ordering::SeqCst);
        local
    }

    pub(crate) fn entries(&self, namespace: &str) -> Vec<SavedScheme> {
        self.namespaces
            .lock()
            .expect("local lock")
            .get(namespace)
            .cloned()
            .unwrap_or_default()
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("device storage full".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl LocalSavedSchemes for MemoryLocal {
    async fn load(&self, namespace: &str) -> Result<Vec<SavedScheme>, StoreError> {
        self.check()?;
        Ok(self.entries(namespace))
    }

    async fn persist(&self, namespace: &str, schemes: &[SavedScheme]) -> Result<(), StoreError> {
        self.check()?;
        self.namespaces
            .lock()
            .expect("local lock")
            .insert(namespace.to_string(), schemes.to_vec());
        Ok(())
    }
}

pub(crate) fn build_service(
    remote: MemoryRemote,
    local: MemoryLocal,
) -> (
    SavedSchemesService<MemoryRemote, MemoryLocal>,
    Arc<MemoryRemote>,
    Arc<MemoryLocal>,
) {
    let remote = Arc::new(remote);
    let local = Arc::new(local);
    let service = SavedSchemesService::new(remote.clone(), local.clone());
    (service, remote, local)
}
