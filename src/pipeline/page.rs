//! Page Derived - The page window, plus read-only display counts.
//!
//! The page derived slices the visible set by the pager signals. The
//! display signals (`visible_count`, `current_page`, `page_count`) are the
//! read-only surface UI chrome binds to; the reconcile effect refreshes
//! them on every run so they always reflect the clamped, live values.

use spark_signals::{derived, signal, Derived, Signal};

use crate::state::pager::{page_count_for, page_size_signal, paginate, raw_page_signal};
use crate::types::CardId;

thread_local! {
    static VISIBLE_COUNT: Signal<usize> = signal(0);
    static CURRENT_PAGE: Signal<usize> = signal(1);
    static PAGE_COUNT: Signal<usize> = signal(1);
}

/// Create the page derived: the desired card ids for the current window.
pub fn create_page_derived(
    visible_derived: Derived<Vec<CardId>>,
) -> Derived<Vec<CardId>> {
    let page_signal = raw_page_signal();
    let size_signal = page_size_signal();

    derived(move || {
        let visible = visible_derived.get();
        let page = page_signal.get();
        let size = size_signal.get();
        paginate(&visible, page, size)
    })
}

// =============================================================================
// DISPLAY COUNTS
// =============================================================================

/// Number of cards passing the active filter.
pub fn visible_count() -> usize {
    VISIBLE_COUNT.with(|s| s.get())
}

/// The effective (upper-clamped) current page.
pub fn current_page() -> usize {
    CURRENT_PAGE.with(|s| s.get())
}

/// Number of pages for the current visible set.
pub fn page_count() -> usize {
    PAGE_COUNT.with(|s| s.get())
}

/// Refresh the display signals. Called by the reconcile effect with the
/// freshly computed visible set.
pub(crate) fn set_display_counts(visible_len: usize, raw_page: usize, page_size: usize) {
    let pages = page_count_for(visible_len, page_size);
    let page = raw_page.clamp(1, pages);
    VISIBLE_COUNT.with(|s| {
        if s.get() != visible_len {
            s.set(visible_len);
        }
    });
    PAGE_COUNT.with(|s| {
        if s.get() != pages {
            s.set(pages);
        }
    });
    CURRENT_PAGE.with(|s| {
        if s.get() != page {
            s.set(page);
        }
    });
}

/// Reset display signals (for testing).
pub fn reset_display_counts() {
    VISIBLE_COUNT.with(|s| s.set(0));
    CURRENT_PAGE.with(|s| s.set(1));
    PAGE_COUNT.with(|s| s.set(1));
}

// =============================================================================
// Tests
// =============================================================================
