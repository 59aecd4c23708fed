//! Visible Set - The filter predicate over the catalog.
//!
//! Pure and order-preserving: a card is visible iff its collection is
//! active AND (no tag restriction OR a tag matches) AND (no year
//! restriction OR the year matches). Catalog insertion order is the output
//! order; the filter never re-sorts.

use std::rc::Rc;

use spark_signals::{derived, Derived};

use crate::catalog::Catalog;
use crate::state::filter::{
    active_collections_signal, active_tags_signal, active_years_signal, FilterState,
};
use crate::types::CardId;

/// Compute the visible set of card ids for a filter state.
///
/// Pure, deterministic, O(|catalog| * |tags per card|). Malformed criteria
/// (a year or tag absent from the catalog) simply match nothing.
pub fn compute_visible(catalog: &Catalog, filter: &FilterState) -> Vec<CardId> {
    catalog
        .cards()
        .iter()
        .filter(|card| {
            if !filter.collections.contains(&card.collection) {
                return false;
            }
            if !filter.tags.is_empty() && !card.tags.iter().any(|t| filter.tags.contains(t)) {
                return false;
            }
            if !filter.years.is_empty()
                && !card.year().is_some_and(|y| filter.years.contains(&y))
            {
                return false;
            }
            true
        })
        .map(|card| card.id.clone())
        .collect()
}

/// Create the visible derived.
///
/// Re-runs whenever any of the three filter signals changes.
pub fn create_visible_derived(
    catalog: Rc<Catalog>,
) -> Derived<Vec<CardId>> {
    let collections = active_collections_signal();
    let tags = active_tags_signal();
    let years = active_years_signal();

    derived(move || {
        let filter = FilterState {
            collections: collections.get(),
            tags: tags.get(),
            years: years.get(),
        };
        compute_visible(&catalog, &filter)
    })
}

// =============================================================================
// Tests
// =============================================================================
