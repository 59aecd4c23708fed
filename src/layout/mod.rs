//! Grid Layout Engine - Greedy shortest-column packing.
//!
//! Assigns canvas positions to a page of variable-height cards. One
//! deterministic pass, O(N * COLUMNS): it runs on every visible/page
//! change, so speed and idempotence-on-stable-input win over bin-packing
//! optimality.
//!
//! # Algorithm
//!
//! 1. `COLUMNS = clamp(ceil(sqrt(N)), MIN_COLUMNS, MAX_COLUMNS)` - the
//!    column count follows the population so the wall keeps a roughly
//!    stable aspect ratio as filters narrow or widen it.
//! 2. Walk the entities in input order, dropping each into the currently
//!    shortest column (ties to the lowest index).
//! 3. Heights come from the live rendered geometry when the entity already
//!    exists (manual resizes and collapsed cards pack tighter or looser
//!    accordingly), else the default card height.
//!
//! Positions land in the position cache keyed by card id; the cache is
//! overwritten entry by entry, never cleared, so off-page cards keep their
//! last coordinates for when they reappear.

pub mod position_cache;
pub mod text_measure;

pub use position_cache::{cached_position, reset_position_cache, store_position};
pub use text_measure::{estimate_expanded_height, measure_text_height, string_width};

use crate::engine::CanvasEngine;
use crate::types::{CardId, EntityId, Point};

/// Card footprint on the canvas.
pub const CARD_WIDTH: f64 = 360.0;
/// Default height for cards with no live entity to measure.
pub const DEFAULT_CARD_HEIGHT: f64 = 420.0;
/// Horizontal and vertical spacing between cards.
pub const GRID_GAP: f64 = 40.0;
/// Top-left origin of the wall.
pub const GRID_START_X: f64 = 60.0;
pub const GRID_START_Y: f64 = 60.0;
/// Column count bounds.
pub const MIN_COLUMNS: usize = 2;
pub const MAX_COLUMNS: usize = 12;

/// Column count for a population of `n` entities.
pub fn column_count(n: usize) -> usize {
    if n == 0 {
        return MIN_COLUMNS;
    }
    let cols = (n as f64).sqrt().ceil() as usize;
    cols.clamp(MIN_COLUMNS, MAX_COLUMNS)
}

/// Pack `heights.len()` entities into columns; returns one position per
/// entity, in input order.
pub fn pack_grid(heights: &[f64]) -> Vec<Point> {
    let columns = column_count(heights.len());
    let mut col_heights = vec![0.0f64; columns];
    let mut positions = Vec::with_capacity(heights.len());

    for &height in heights {
        // Shortest column, ties broken by lowest index.
        let mut col = 0;
        for (i, &h) in col_heights.iter().enumerate() {
            if h < col_heights[col] {
                col = i;
            }
        }
        let x = GRID_START_X + col as f64 * (CARD_WIDTH + GRID_GAP);
        let y = GRID_START_Y + col_heights[col];
        positions.push(Point::new(x, y));
        col_heights[col] += height + GRID_GAP;
    }

    positions
}

/// Resolve an entity's packing height: live rendered geometry when it
/// exists on the canvas, else the default.
pub fn entity_height(engine: &dyn CanvasEngine, card_id: &str) -> f64 {
    engine
        .entity_geometry(&EntityId::for_card(card_id))
        .map(|size| size.h)
        .unwrap_or(DEFAULT_CARD_HEIGHT)
}

/// Lay out one page of cards and write every position into the cache.
///
/// Returns the positions in input order. The layout itself never fails;
/// ids with no live entity simply pack at the default height.
pub fn layout_page(desired: &[CardId], engine: &dyn CanvasEngine) -> Vec<Point> {
    let heights: Vec<f64> = desired
        .iter()
        .map(|id| entity_height(engine, id))
        .collect();
    let positions = pack_grid(&heights);
    for (card_id, position) in desired.iter().zip(&positions) {
        store_position(card_id, *position);
    }
    positions
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rect;

    #[test]
    fn test_column_count_scales_with_population() {
        assert_eq!(column_count(0), MIN_COLUMNS);
        assert_eq!(column_count(1), MIN_COLUMNS);
        assert_eq!(column_count(9), 3);
        assert_eq!(column_count(10), 4);
        assert_eq!(column_count(10_000), MAX_COLUMNS);
    }

    #[test]
    fn test_pack_is_deterministic() {
        let heights = vec![420.0, 300.0, 500.0, 420.0, 250.0];
        assert_eq!(pack_grid(&heights), pack_grid(&heights));
    }

    #[test]
    fn test_no_overlap_within_columns() {
        let heights: Vec<f64> = (0..20).map(|i| 200.0 + (i as f64 * 37.0) % 300.0).collect();
        let positions = pack_grid(&heights);
        let rects: Vec<Rect> = positions
            .iter()
            .zip(&heights)
            .map(|(p, &h)| Rect::new(p.x, p.y, CARD_WIDTH, h))
            .collect();
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                assert!(!a.intersects(b), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn test_columns_stay_balanced() {
        let heights: Vec<f64> = (0..30).map(|i| 150.0 + (i as f64 * 91.0) % 400.0).collect();
        let columns = column_count(heights.len());
        let mut col_heights = vec![0.0f64; columns];
        for (p, &h) in pack_grid(&heights).iter().zip(&heights) {
            let col = ((p.x - GRID_START_X) / (CARD_WIDTH + GRID_GAP)).round() as usize;
            let bottom = p.y - GRID_START_Y + h + GRID_GAP;
            if bottom > col_heights[col] {
                col_heights[col] = bottom;
            }
        }
        let max = col_heights.iter().cloned().fold(0.0f64, f64::max);
        let min = col_heights.iter().cloned().fold(f64::INFINITY, f64::min);
        let tallest = heights.iter().cloned().fold(0.0f64, f64::max);
        // Greedy packing keeps the spread bounded by one entity.
        assert!(max - min <= tallest + GRID_GAP);
    }

    #[test]
    fn test_ties_break_to_lowest_column() {
        // All equal heights: first COLUMNS entities fill columns 0..n in
        // order.
        let heights = vec![100.0; 4];
        let positions = pack_grid(&heights);
        assert_eq!(positions[0].x, GRID_START_X);
        assert_eq!(positions[1].x, GRID_START_X + CARD_WIDTH + GRID_GAP);
        assert_eq!(positions[0].y, positions[1].y);
    }
}
