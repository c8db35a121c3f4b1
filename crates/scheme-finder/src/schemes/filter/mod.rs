//! Facet filter engine: conjunction across dimensions, disjunction within one.

mod cache;
pub mod encoding;
mod search;
mod selection;

pub use cache::FilterCache;
pub use encoding::{cache_key, from_pairs, from_query_string, to_pairs, to_query_string};
pub use search::matches_query;
pub use selection::{FacetSelection, SelectionError};

use tracing::debug;

use super::domain::{Scheme, ALL};
use super::facets::FacetDimension;

/// Whether one scheme satisfies one dimension of the selection.
pub fn matches_dimension(scheme: &Scheme, selection: &FacetSelection, dimension: FacetDimension) -> bool {
    if !selection.is_active(dimension) {
        return true;
    }
    let selected = selection.values(dimension);

    match dimension {
        FacetDimension::State => {
            let state = scheme.classified_state.trim().to_lowercase();
            selected
                .iter()
                .any(|value| value.trim().to_lowercase() == state)
        }
        dimension if dimension.is_multi_valued() => {
            let values = dimension.scheme_values(scheme);
            values.iter().any(|value| value.trim() == ALL)
                || values.iter().any(|value| selected.contains(value.trim()))
        }
        dimension => dimension
            .scheme_values(scheme)
            .first()
            .is_some_and(|value| selected.contains(*value)),
    }
}

/// Whether one scheme satisfies every active dimension and the free-text query.
pub fn matches_selection(scheme: &Scheme, selection: &FacetSelection) -> bool {
    let words = selection.query_words();
    matches_query(scheme, &words)
        && selection
            .active_dimensions()
            .all(|dimension| matches_dimension(scheme, selection, dimension))
}

/// Positions of the matching schemes, in catalog order.
pub fn matching_positions(schemes: &[Scheme], selection: &FacetSelection) -> Vec<usize> {
    let words = selection.query_words();
    let active: Vec<FacetDimension> = selection.active_dimensions().collect();

    let positions: Vec<usize> = schemes
        .iter()
        .enumerate()
        .filter(|(_, scheme)| {
            matches_query(scheme, &words)
                && active
                    .iter()
                    .all(|dimension| matches_dimension(scheme, selection, *dimension))
        })
        .map(|(position, _)| position)
        .collect();

    debug!(
        total = schemes.len(),
        matched = positions.len(),
        active_dimensions = active.len(),
        "facet filter applied"
    );
    positions
}

/// Stable filter of `schemes` by `selection`.
pub fn filter_schemes<'a>(schemes: &'a [Scheme], selection: &FacetSelection) -> Vec<&'a Scheme> {
    matching_positions(schemes, selection)
        .into_iter()
        .map(|position| &schemes[position])
        .collect()
}
