use std::sync::Arc;

use serde::Serialize;

use super::browse::{ministry_summaries, state_summaries, MinistrySummary, StateSummary};
use super::catalog::SchemeCatalog;
use super::domain::{Scheme, SchemeId};
use super::eligibility::{
    EligibilityEngine, EligibilityOutcome, EligibilityProfile, EligibilityStrategy,
    SchemeAssessment,
};
use super::facets::FacetIndex;
use super::filter::{matching_positions, FacetSelection, FilterCache};
use super::saved::{
    LocalSavedSchemes, RemoteSavedSchemes, RemoveOutcome, SaveOutcome, SavedScheme,
    SavedSchemesError, SavedSchemesService, UserId,
};

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 100;

/// One page of filter results; `page` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemePage<'a> {
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
    pub schemes: Vec<&'a Scheme>,
}

/// Service composing the catalog, derived indexes, eligibility engine and
/// saved-schemes boundary behind one read-mostly handle.
pub struct SchemeFinderService<R, L> {
    catalog: Arc<SchemeCatalog>,
    facets: FacetIndex,
    states: Vec<StateSummary>,
    ministries: Vec<MinistrySummary>,
    cache: FilterCache,
    engine: Arc<EligibilityEngine>,
    saved: SavedSchemesService<R, L>,
}

impl<R, L> SchemeFinderService<R, L>
where
    R: RemoteSavedSchemes + 'static,
    L: LocalSavedSchemes + 'static,
{
    pub fn new(
        catalog: SchemeCatalog,
        engine: EligibilityEngine,
        cache: FilterCache,
        saved: SavedSchemesService<R, L>,
    ) -> Self {
        let facets = FacetIndex::build(catalog.schemes());
        let states = state_summaries(catalog.schemes());
        let ministries = ministry_summaries(catalog.schemes());

        Self {
            catalog: Arc::new(catalog),
            facets,
            states,
            ministries,
            cache,
            engine: Arc::new(engine),
            saved,
        }
    }

    pub fn catalog(&self) -> &SchemeCatalog {
        &self.catalog
    }

    pub fn engine(&self) -> &EligibilityEngine {
        &self.engine
    }

    /// Schemes matching every active facet and the free-text query, in
    /// catalog order.
    pub fn search(&self, selection: &FacetSelection) -> Vec<&Scheme> {
        let schemes = self.catalog.schemes();
        let positions = self
            .cache
            .get_or_compute(selection, || matching_positions(schemes, selection));
        positions
            .iter()
            .filter_map(|&position| schemes.get(position))
            .collect()
    }

    /// Out-of-range pages come back empty with the real totals.
    pub fn search_page(
        &self,
        selection: &FacetSelection,
        page: Option<usize>,
        per_page: Option<usize>,
    ) -> SchemePage<'_> {
        let matches = self.search(selection);
        let per_page = per_page
            .filter(|size| *size > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(MAX_PAGE_SIZE);
        let page = page.filter(|page| *page > 0).unwrap_or(1);
        let total = matches.len();
        let total_pages = total.div_ceil(per_page);

        let schemes = matches
            .into_iter()
            .skip((page - 1).saturating_mul(per_page))
            .take(per_page)
            .collect();

        SchemePage {
            total,
            page,
            per_page,
            total_pages,
            schemes,
        }
    }

    pub fn scheme(&self, scheme_id: &str) -> Result<&Scheme, SchemeServiceError> {
        self.catalog
            .get(scheme_id)
            .ok_or_else(|| SchemeServiceError::NotFound(SchemeId(scheme_id.trim().to_string())))
    }

    pub fn facets(&self) -> &FacetIndex {
        &self.facets
    }

    pub fn states(&self) -> &[StateSummary] {
        &self.states
    }

    pub fn ministries(&self) -> &[MinistrySummary] {
        &self.ministries
    }

    /// Falls back to the configured strategy when none is requested.
    pub fn eligibility(
        &self,
        profile: &EligibilityProfile,
        strategy: Option<EligibilityStrategy>,
    ) -> EligibilityOutcome<'_> {
        let strategy = strategy.unwrap_or(self.engine.config().strategy);
        self.engine
            .evaluate(self.catalog.schemes(), profile, strategy)
    }

    /// Verdict with exclusion reason for a single scheme.
    pub fn assess(
        &self,
        scheme_id: &str,
        profile: &EligibilityProfile,
        strategy: Option<EligibilityStrategy>,
    ) -> Result<SchemeAssessment, SchemeServiceError> {
        let scheme = self.scheme(scheme_id)?;
        let strategy = strategy.unwrap_or(self.engine.config().strategy);
        Ok(self.engine.assess(scheme, profile, strategy))
    }

    pub async fn saved(
        &self,
        user: Option<&UserId>,
    ) -> Result<Vec<SavedScheme>, SchemeServiceError> {
        Ok(self.saved.list(user).await?)
    }

    pub async fn is_saved(
        &self,
        user: Option<&UserId>,
        scheme_id: &str,
    ) -> Result<bool, SchemeServiceError> {
        let scheme_id = SchemeId(scheme_id.trim().to_string());
        Ok(self.saved.is_saved(user, &scheme_id).await?)
    }

    /// Snapshots the catalog entry; unknown ids are rejected.
    pub async fn save(
        &self,
        user: Option<&UserId>,
        scheme_id: &str,
    ) -> Result<SaveOutcome, SchemeServiceError> {
        let snapshot = SavedScheme::from(self.scheme(scheme_id)?);
        Ok(self.saved.add(user, snapshot).await?)
    }

    /// Removal works for ids no longer in the catalog.
    pub async fn unsave(
        &self,
        user: Option<&UserId>,
        scheme_id: &str,
    ) -> Result<RemoveOutcome, SchemeServiceError> {
        let scheme_id = SchemeId(scheme_id.trim().to_string());
        Ok(self.saved.remove(user, &scheme_id).await?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SchemeServiceError {
    #[error("scheme not found: {0}")]
    NotFound(SchemeId),
    #[error(transparent)]
    Saved(#[from] SavedSchemesError),
}
