use super::domain::{Scheme, SchemeId};
use super::normalizer::Normalizer;
use super::raw::RawSchemeRecord;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

/// Errors raised while reading the raw dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read scheme dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("scheme dataset is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("scheme dataset must be a JSON array of records")]
    NotAnArray,
}

/// Bookkeeping from one dataset load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped_malformed: usize,
    pub skipped_missing_id: usize,
    pub duplicate_ids: Vec<String>,
}

/// Immutable, id-indexed set of canonical schemes in dataset order.
#[derive(Debug, Clone, Default)]
pub struct SchemeCatalog {
    schemes: Vec<Scheme>,
    by_id: HashMap<SchemeId, usize>,
}

impl SchemeCatalog {
    /// Normalizes raw records, keeping the first occurrence of each id.
    pub fn from_records<I>(records: I, normalizer: &Normalizer) -> (Self, LoadReport)
    where
        I: IntoIterator<Item = RawSchemeRecord>,
    {
        let mut catalog = Self::default();
        let mut report = LoadReport::default();

        for record in records {
            let scheme = normalizer.normalize(&record);
            if scheme.scheme_id.as_str().is_empty() {
                report.skipped_missing_id += 1;
                warn!(title = %scheme.title, "skipping scheme without an identifier");
                continue;
            }

            if catalog.by_id.contains_key(&scheme.scheme_id) {
                warn!(scheme_id = %scheme.scheme_id, "duplicate scheme id, keeping first occurrence");
                report.duplicate_ids.push(scheme.scheme_id.0.clone());
                continue;
            }

            catalog
                .by_id
                .insert(scheme.scheme_id.clone(), catalog.schemes.len());
            catalog.schemes.push(scheme);
        }

        report.loaded = catalog.schemes.len();
        (catalog, report)
    }

    /// Builds a catalog from already-normalized schemes.
    pub fn from_schemes(schemes: Vec<Scheme>) -> Self {
        let mut catalog = Self::default();
        for scheme in schemes {
            if catalog.by_id.contains_key(&scheme.scheme_id) {
                continue;
            }
            catalog
                .by_id
                .insert(scheme.scheme_id.clone(), catalog.schemes.len());
            catalog.schemes.push(scheme);
        }
        catalog
    }

    pub fn from_reader<R: Read>(
        reader: R,
        normalizer: &Normalizer,
    ) -> Result<(Self, LoadReport), DatasetError> {
        let value: Value = serde_json::from_reader(reader)?;
        let Value::Array(entries) = value else {
            return Err(DatasetError::NotAnArray);
        };

        let mut skipped_malformed = 0;
        let records: Vec<RawSchemeRecord> = entries
            .into_iter()
            .enumerate()
            .filter_map(|(position, entry)| {
                if !entry.is_object() {
                    skipped_malformed += 1;
                    warn!(position, "skipping dataset entry that is not an object");
                    return None;
                }
                match serde_json::from_value::<RawSchemeRecord>(entry) {
                    Ok(record) => Some(record),
                    Err(err) => {
                        skipped_malformed += 1;
                        warn!(position, error = %err, "skipping unreadable dataset entry");
                        None
                    }
                }
            })
            .collect();

        let (catalog, mut report) = Self::from_records(records, normalizer);
        report.skipped_malformed = skipped_malformed;

        info!(
            loaded = report.loaded,
            skipped = report.skipped_malformed + report.skipped_missing_id,
            duplicates = report.duplicate_ids.len(),
            "scheme catalog loaded"
        );

        Ok((catalog, report))
    }

    pub fn from_path<P: AsRef<Path>>(
        path: P,
        normalizer: &Normalizer,
    ) -> Result<(Self, LoadReport), DatasetError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file), normalizer)
    }

    pub fn schemes(&self) -> &[Scheme] {
        &self.schemes
    }

    /// Looks up a scheme by id; `None` is the "scheme not found" outcome.
    pub fn get(&self, scheme_id: &str) -> Option<&Scheme> {
        self.by_id
            .get(&SchemeId(scheme_id.trim().to_string()))
            .map(|index| &self.schemes[*index])
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }
}
