use async_trait::async_trait;
use metrics_exporter_prometheus::PrometheusHandle;
use scheme_finder::config::AppConfig;
use scheme_finder::error::AppError;
use scheme_finder::schemes::domain::SchemeId;
use scheme_finder::schemes::eligibility::{
    EligibilityConfig, EligibilityEngine, KeywordClassifier, KeywordRules,
};
use scheme_finder::schemes::saved::{
    LocalSavedSchemes, RemoteSavedSchemes, SavedScheme, SavedSchemesService, StoreError, UserId,
};
use scheme_finder::schemes::{FilterCache, Normalizer, SchemeCatalog, SchemeFinderService};
use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

pub(crate) type AppService = SchemeFinderService<InMemoryRemoteStore, JsonFileLocalStore>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Per-user saved schemes held for the lifetime of the process.
#[derive(Default, Clone)]
pub(crate) struct InMemoryRemoteStore {
    entries: Arc<Mutex<HashMap<UserId, Vec<SavedScheme>>>>,
}

impl InMemoryRemoteStore {
    fn with_entries<T>(
        &self,
        apply: impl FnOnce(&mut HashMap<UserId, Vec<SavedScheme>>) -> T,
    ) -> Result<T, StoreError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| StoreError::Unavailable("remote store lock poisoned".to_string()))?;
        Ok(apply(&mut guard))
    }
}

#[async_trait]
impl RemoteSavedSchemes for InMemoryRemoteStore {
    async fn list(&self, user: &UserId) -> Result<Vec<SavedScheme>, StoreError> {
        self.with_entries(|entries| entries.get(user).cloned().unwrap_or_default())
    }

    async fn insert(&self, user: &UserId, scheme: SavedScheme) -> Result<(), StoreError> {
        self.with_entries(|entries| {
            let saved = entries.entry(user.clone()).or_default();
            if !saved.iter().any(|entry| entry.scheme_id == scheme.scheme_id) {
                saved.push(scheme);
            }
        })
    }

    async fn delete(&self, user: &UserId, scheme_id: &SchemeId) -> Result<(), StoreError> {
        self.with_entries(|entries| {
            if let Some(saved) = entries.get_mut(user) {
                saved.retain(|entry| &entry.scheme_id != scheme_id);
            }
        })
    }
}

/// Device-local fallback: one JSON document mapping namespace to saved list.
#[derive(Debug, Clone)]
pub(crate) struct JsonFileLocalStore {
    path: PathBuf,
}

impl JsonFileLocalStore {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read_all(&self) -> Result<BTreeMap<String, Vec<SavedScheme>>, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(BTreeMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl LocalSavedSchemes for JsonFileLocalStore {
    async fn load(&self, namespace: &str) -> Result<Vec<SavedScheme>, StoreError> {
        let mut all = self.read_all().await?;
        Ok(all.remove(namespace).unwrap_or_default())
    }

    async fn persist(&self, namespace: &str, schemes: &[SavedScheme]) -> Result<(), StoreError> {
        let mut all = self.read_all().await?;
        all.insert(namespace.to_string(), schemes.to_vec());

        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let staged = self.path.with_extension("json.tmp");
        tokio::fs::write(&staged, serde_json::to_vec_pretty(&all)?).await?;
        tokio::fs::rename(&staged, &self.path).await?;
        Ok(())
    }
}

/// Loads the catalog and classifier vocabulary named by `config`.
pub(crate) fn load_engine_and_catalog(
    config: &AppConfig,
) -> Result<(SchemeCatalog, EligibilityEngine), AppError> {
    let normalizer = Normalizer::new(config.dataset.disability_labels);
    let (catalog, report) = SchemeCatalog::from_path(&config.dataset.path, &normalizer)?;
    info!(
        path = %config.dataset.path.display(),
        loaded = report.loaded,
        duplicates = report.duplicate_ids.len(),
        "dataset ready"
    );

    let rules = match &config.matching.classifier_rules_path {
        Some(path) => KeywordRules::from_path(path)?,
        None => KeywordRules::standard(),
    };
    let engine = EligibilityEngine::with_classifier(
        EligibilityConfig {
            strategy: config.matching.strategy,
            ..EligibilityConfig::default()
        },
        Arc::new(KeywordClassifier::new(rules)),
    );

    Ok((catalog, engine))
}

pub(crate) fn build_service(config: &AppConfig) -> Result<AppService, AppError> {
    let (catalog, engine) = load_engine_and_catalog(config)?;
    let saved = SavedSchemesService::new(
        Arc::new(InMemoryRemoteStore::default()),
        Arc::new(JsonFileLocalStore::new(&config.dataset.saved_store_path)),
    );

    Ok(SchemeFinderService::new(
        catalog,
        engine,
        FilterCache::new(config.matching.filter_cache_capacity),
        saved,
    ))
}
