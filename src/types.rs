//! Core types shared across the engine.
//!
//! Ids, canvas-space geometry, and the entity-id derivation rules used by
//! every subsystem.

use std::cell::RefCell;
use std::fmt;

/// Stable unique identifier of a catalog card.
pub type CardId = String;

/// Identifier of a visual entity on the canvas.
///
/// Card entities derive their id deterministically from the owning card id,
/// so a card can never have two live entities at once. Ink entities get a
/// freshly generated id per stroke.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub String);

thread_local! {
    /// Counter for generating unique ink entity ids.
    static INK_COUNTER: RefCell<usize> = const { RefCell::new(0) };
}

impl EntityId {
    /// Deterministic entity id for a card (`card:<cardId>`).
    pub fn for_card(card_id: &str) -> Self {
        EntityId(format!("card:{card_id}"))
    }

    /// Generate a fresh ink entity id (`ink:<n>`).
    pub fn new_ink() -> Self {
        INK_COUNTER.with(|counter| {
            let mut counter = counter.borrow_mut();
            let id = EntityId(format!("ink:{}", *counter));
            *counter += 1;
            id
        })
    }

    /// The card id this entity id was derived from, if it is a card id.
    pub fn card_id(&self) -> Option<&str> {
        self.0.strip_prefix("card:")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reset the ink id counter (for testing).
pub fn reset_ink_counter() {
    INK_COUNTER.with(|counter| *counter.borrow_mut() = 0);
}

/// A point in canvas coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A size in canvas coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub w: f64,
    pub h: f64,
}

impl Size {
    pub fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }
}

/// An axis-aligned rectangle in canvas coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Whether two rectangles overlap (touching edges do not count).
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_entity_id_is_deterministic() {
        let a = EntityId::for_card("alpha");
        let b = EntityId::for_card("alpha");
        assert_eq!(a, b);
        assert_eq!(a.card_id(), Some("alpha"));
    }

    #[test]
    fn test_ink_ids_are_unique() {
        reset_ink_counter();
        let a = EntityId::new_ink();
        let b = EntityId::new_ink();
        assert_ne!(a, b);
        assert_eq!(a.card_id(), None);
    }

    #[test]
    fn test_rect_intersects() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        let c = Rect::new(10.0, 0.0, 5.0, 5.0);
        assert!(a.intersects(&b));
        // Touching edges do not overlap.
        assert!(!a.intersects(&c));
    }
}
