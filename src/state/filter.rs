//! Filter State - Active collection/tag/year criteria.
//!
//! Three thread-local signals hold the active filter sets. The semantics
//! are asymmetric by design:
//!
//! - `active_collections` - "all selected" is the default; an empty set is a
//!   legitimate user state that matches nothing, but the engine never
//!   *starts* there.
//! - `active_tags` / `active_years` - an empty set means "no restriction"
//!   (match all), never "match none".
//!
//! Every mutating operation resets the current page to 1 so a stale page
//! can never point past the end of a freshly narrowed visible set.

use std::collections::BTreeSet;

use spark_signals::{signal, Signal};

use crate::catalog::Catalog;

use super::pager;

// =============================================================================
// FILTER SIGNALS
// =============================================================================

thread_local! {
    static ACTIVE_COLLECTIONS: Signal<BTreeSet<String>> = signal(BTreeSet::new());
    static ACTIVE_TAGS: Signal<BTreeSet<String>> = signal(BTreeSet::new());
    static ACTIVE_YEARS: Signal<BTreeSet<i32>> = signal(BTreeSet::new());
}

/// Snapshot of the full filter state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub collections: BTreeSet<String>,
    pub tags: BTreeSet<String>,
    pub years: BTreeSet<i32>,
}

/// Initialize filter state from a freshly loaded catalog: every collection
/// selected, no tag or year restriction.
pub fn init_filter_state(catalog: &Catalog) {
    ACTIVE_COLLECTIONS.with(|s| s.set(catalog.collections().into_iter().collect()));
    ACTIVE_TAGS.with(|s| s.set(BTreeSet::new()));
    ACTIVE_YEARS.with(|s| s.set(BTreeSet::new()));
    pager::reset_page();
}

/// Get the active collection set.
pub fn active_collections() -> BTreeSet<String> {
    ACTIVE_COLLECTIONS.with(|s| s.get())
}

/// Get the active tag set (empty = no restriction).
pub fn active_tags() -> BTreeSet<String> {
    ACTIVE_TAGS.with(|s| s.get())
}

/// Get the active year set (empty = no restriction).
pub fn active_years() -> BTreeSet<i32> {
    ACTIVE_YEARS.with(|s| s.get())
}

/// Snapshot all three filter signals.
pub fn filter_state() -> FilterState {
    FilterState {
        collections: active_collections(),
        tags: active_tags(),
        years: active_years(),
    }
}

// =============================================================================
// MUTATIONS
// =============================================================================

/// Toggle a collection on or off.
pub fn toggle_collection(collection: &str, checked: bool) {
    ACTIVE_COLLECTIONS.with(|s| {
        let mut next = s.get();
        if checked {
            next.insert(collection.to_string());
        } else {
            next.remove(collection);
        }
        s.set(next);
    });
    pager::reset_page();
}

/// Toggle a tag on or off.
pub fn toggle_tag(tag: &str, checked: bool) {
    ACTIVE_TAGS.with(|s| {
        let mut next = s.get();
        if checked {
            next.insert(tag.to_string());
        } else {
            next.remove(tag);
        }
        s.set(next);
    });
    pager::reset_page();
}

/// Toggle a year on or off.
pub fn toggle_year(year: i32, checked: bool) {
    ACTIVE_YEARS.with(|s| {
        let mut next = s.get();
        if checked {
            next.insert(year);
        } else {
            next.remove(&year);
        }
        s.set(next);
    });
    pager::reset_page();
}

/// Replace the active collection set wholesale.
pub fn set_active_collections(collections: BTreeSet<String>) {
    ACTIVE_COLLECTIONS.with(|s| s.set(collections));
    pager::reset_page();
}

/// Replace the active tag set wholesale.
pub fn set_active_tags(tags: BTreeSet<String>) {
    ACTIVE_TAGS.with(|s| s.set(tags));
    pager::reset_page();
}

/// Replace the active year set wholesale.
pub fn set_active_years(years: BTreeSet<i32>) {
    ACTIVE_YEARS.with(|s| s.set(years));
    pager::reset_page();
}

// =============================================================================
// SIGNAL ACCESSORS (for reactive tracking)
// =============================================================================

pub fn active_collections_signal() -> Signal<BTreeSet<String>> {
    ACTIVE_COLLECTIONS.with(|s| s.clone())
}

pub fn active_tags_signal() -> Signal<BTreeSet<String>> {
    ACTIVE_TAGS.with(|s| s.clone())
}

pub fn active_years_signal() -> Signal<BTreeSet<i32>> {
    ACTIVE_YEARS.with(|s| s.clone())
}

/// Reset all filter signals to empty (for testing).
pub fn reset_filter_state() {
    ACTIVE_COLLECTIONS.with(|s| s.set(BTreeSet::new()));
    ACTIVE_TAGS.with(|s| s.set(BTreeSet::new()));
    ACTIVE_YEARS.with(|s| s.set(BTreeSet::new()));
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Card, Catalog};

    fn catalog() -> Catalog {
        let cards = vec![
            Card {
                id: "1".into(),
                title: String::new(),
                image: String::new(),
                summary: String::new(),
                content: String::new(),
                collection: "art".into(),
                tags: vec!["a".into()],
                date: None,
                url: None,
            },
            Card {
                id: "2".into(),
                title: String::new(),
                image: String::new(),
                summary: String::new(),
                content: String::new(),
                collection: "code".into(),
                tags: vec!["b".into()],
                date: None,
                url: None,
            },
        ];
        Catalog::from_cards(cards).unwrap()
    }

    #[test]
    fn test_init_selects_all_collections() {
        reset_filter_state();
        init_filter_state(&catalog());
        let active = active_collections();
        assert!(active.contains("art"));
        assert!(active.contains("code"));
        assert!(active_tags().is_empty());
    }

    #[test]
    fn test_toggle_collection() {
        reset_filter_state();
        init_filter_state(&catalog());
        toggle_collection("art", false);
        assert!(!active_collections().contains("art"));
        toggle_collection("art", true);
        assert!(active_collections().contains("art"));
    }

    #[test]
    fn test_filter_change_resets_page() {
        reset_filter_state();
        super::super::pager::reset_pager_state();
        super::super::pager::set_page(7);
        toggle_tag("anything", true);
        assert_eq!(super::super::pager::raw_page(), 1);
    }
}
