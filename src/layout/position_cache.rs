//! Position Cache - Last known coordinates per card.
//!
//! Deliberately stateful: positions are overwritten entry by entry when a
//! layout pass runs and never cleared wholesale, so a card filtered off
//! the page keeps its last coordinates for when it reappears.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::types::{CardId, Point};

thread_local! {
    static POSITIONS: RefCell<HashMap<CardId, Point>> = RefCell::new(HashMap::new());
}

/// Last known position of a card, if a layout pass ever placed it.
pub fn cached_position(card_id: &str) -> Option<Point> {
    POSITIONS.with(|p| p.borrow().get(card_id).copied())
}

/// Store (or overwrite) a card's position.
pub fn store_position(card_id: &str, position: Point) {
    POSITIONS.with(|p| {
        p.borrow_mut().insert(card_id.to_string(), position);
    });
}

/// Number of cached entries.
pub fn cached_count() -> usize {
    POSITIONS.with(|p| p.borrow().len())
}

/// Clear the cache (for testing).
pub fn reset_position_cache() {
    POSITIONS.with(|p| p.borrow_mut().clear());
}

// =============================================================================
// Tests
// =============================================================================
