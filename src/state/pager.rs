//! Pager - The page window over the visible set.
//!
//! `current_page` is 1-based. The signal only enforces the lower bound;
//! the upper bound depends on the live visible count, so [`paginate`]
//! clamps against it on every slice and the pipeline surfaces the clamped
//! value for display. Changing the page size resets the page to 1 to avoid
//! pointing past the end.

use spark_signals::{signal, Signal};

use crate::types::CardId;

/// Documented fallback page size.
pub const DEFAULT_PAGE_SIZE: usize = 24;

thread_local! {
    static CURRENT_PAGE: Signal<usize> = signal(1);
    static PAGE_SIZE: Signal<usize> = signal(DEFAULT_PAGE_SIZE);
}

/// The raw (floor-clamped only) current page.
pub fn raw_page() -> usize {
    CURRENT_PAGE.with(|s| s.get())
}

/// The current page size.
pub fn page_size() -> usize {
    PAGE_SIZE.with(|s| s.get())
}

/// Set the current page. Values below 1 clamp to 1; the upper clamp is
/// applied against the visible count at slice time.
pub fn set_page(page: usize) {
    CURRENT_PAGE.with(|s| s.set(page.max(1)));
}

/// Reset to the first page.
pub fn reset_page() {
    CURRENT_PAGE.with(|s| s.set(1));
}

/// Set the page size. Non-positive values clamp to 1. Also resets the page
/// to 1.
pub fn set_page_size(size: usize) {
    PAGE_SIZE.with(|s| s.set(size.max(1)));
    reset_page();
}

pub fn raw_page_signal() -> Signal<usize> {
    CURRENT_PAGE.with(|s| s.clone())
}

pub fn page_size_signal() -> Signal<usize> {
    PAGE_SIZE.with(|s| s.clone())
}

/// Reset pager signals to defaults (for testing).
pub fn reset_pager_state() {
    CURRENT_PAGE.with(|s| s.set(1));
    PAGE_SIZE.with(|s| s.set(DEFAULT_PAGE_SIZE));
}

// =============================================================================
// PURE SLICING
// =============================================================================

/// Number of pages needed for `len` items, minimum 1.
pub fn page_count_for(len: usize, page_size: usize) -> usize {
    let size = page_size.max(1);
    len.div_ceil(size).max(1)
}

/// Slice one page out of the visible set.
///
/// `page` is clamped into `[1, page_count_for(len, page_size)]`; the
/// returned slice is the contiguous window
/// `[(page-1)*page_size, page*page_size)`.
pub fn paginate(visible: &[CardId], page: usize, page_size: usize) -> Vec<CardId> {
    let size = page_size.max(1);
    let clamped = page.clamp(1, page_count_for(visible.len(), size));
    let start = (clamped - 1) * size;
    let end = (start + size).min(visible.len());
    if start >= visible.len() {
        return Vec::new();
    }
    visible[start..end].to_vec()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<CardId> {
        (0..n).map(|i| format!("c{i}")).collect()
    }

    #[test]
    fn test_paginate_slices_window() {
        let visible = ids(10);
        assert_eq!(paginate(&visible, 1, 4), ids(10)[0..4].to_vec());
        assert_eq!(paginate(&visible, 2, 4), ids(10)[4..8].to_vec());
        assert_eq!(paginate(&visible, 3, 4), ids(10)[8..10].to_vec());
    }

    #[test]
    fn test_paginate_clamps_page() {
        let visible = ids(10);
        // Past the end clamps to the last page.
        assert_eq!(paginate(&visible, 99, 4), ids(10)[8..10].to_vec());
        // Page 0 clamps to 1.
        assert_eq!(paginate(&visible, 0, 4), ids(10)[0..4].to_vec());
    }

    #[test]
    fn test_paginate_empty_visible() {
        assert!(paginate(&[], 1, 4).is_empty());
        assert!(paginate(&[], 5, 4).is_empty());
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count_for(0, 4), 1);
        assert_eq!(page_count_for(4, 4), 1);
        assert_eq!(page_count_for(5, 4), 2);
    }

    #[test]
    fn test_set_page_size_resets_page() {
        reset_pager_state();
        set_page(3);
        set_page_size(10);
        assert_eq!(raw_page(), 1);
        assert_eq!(page_size(), 10);
    }

    #[test]
    fn test_page_size_clamps_to_one() {
        reset_pager_state();
        set_page_size(0);
        assert_eq!(page_size(), 1);
    }
}
