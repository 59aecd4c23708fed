//! Timed Lifecycle Manager - Fade and expire ink entities.
//!
//! Independent of the filter pipeline: every cooperative frame ages the
//! ink population, recomputes opacities, and deletes expired strokes. The
//! pass is driven by [`tick`]/[`run`] on the mount handle; it skips the
//! frame (and keeps going next frame) when the engine is momentarily
//! unavailable, and it never busy-loops - the frame loop yields between
//! ticks.
//!
//! # Per tick
//!
//! For every ink entity with `age = now - created_at`:
//! - `age >= lifespan_ms` -> marked for deletion
//! - otherwise the opacity is `base_opacity` until `fade_start =
//!   lifespan_ms - fade_ms`, then ramps linearly to zero over the fade
//!   window (floored at zero)
//!
//! Opacity writes are skipped while the value is unchanged (steady state
//! pre-fade costs nothing), and the whole tick lands as one batched
//! update plus one batched delete - two bounded mutation sets per frame
//! regardless of population size.
//!
//! [`tick`]: crate::pipeline::tick
//! [`run`]: crate::pipeline::run

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use log::{trace, warn};

use crate::engine::{
    CanvasEngine, CanvasEntity, EntityBatch, EntityKind, EntityPatch, InkEntity, InkPatch,
};
use crate::state::timed_config::{timed_config, TimedConfig};
use crate::types::{EntityId, Point};

/// Opacity for an ink entity of the given age, or `None` once expired.
///
/// Pure: the whole fade curve is a function of the creation-time
/// snapshot.
pub fn compute_fade(age_ms: u64, lifespan_ms: u64, fade_ms: u64, base_opacity: f32) -> Option<f32> {
    if age_ms >= lifespan_ms {
        return None;
    }
    let fade_start = lifespan_ms.saturating_sub(fade_ms);
    if age_ms <= fade_start || fade_ms == 0 {
        return Some(base_opacity);
    }
    let into_fade = (age_ms - fade_start) as f32 / fade_ms as f32;
    Some(base_opacity * (1.0 - into_fade).max(0.0))
}

/// Run one aging pass over the ink population.
///
/// A skipped frame (engine unavailable) is not an error; the caller's
/// loop re-invokes next frame.
pub fn tick_timed_entities(engine: &Rc<RefCell<dyn CanvasEngine>>, now: Instant) {
    let batch = {
        let eng = engine.borrow();
        if !eng.is_ready() {
            return;
        }
        let mut batch = EntityBatch::new();
        for entity in eng.entities_of(EntityKind::Ink) {
            let CanvasEntity::Ink(ink) = entity else { continue };
            match compute_fade(ink.age_ms(now), ink.lifespan_ms, ink.fade_ms, ink.base_opacity) {
                None => batch.delete.push(ink.id.clone()),
                Some(fade) => {
                    // Skip redundant writes while the value holds steady.
                    if fade != ink.fade {
                        batch.update.push(EntityPatch::Ink {
                            id: ink.id.clone(),
                            patch: InkPatch { fade },
                        });
                    }
                }
            }
        }
        batch
    };

    if batch.is_empty() {
        return;
    }
    trace!(
        "lifecycle tick: {} fades, {} expiries",
        batch.update.len(),
        batch.delete.len()
    );
    if let Err(e) = engine.borrow_mut().apply(batch) {
        warn!("lifecycle batch rejected: {e}");
    }
}

// =============================================================================
// Ink Creation
// =============================================================================

/// Build a new ink entity.
///
/// `cfg` is taken by value: the entity snapshots the lifespan/fade it was
/// created under, and later slider changes never touch it.
pub fn create_ink_entity(
    points: Vec<Point>,
    base_opacity: f32,
    cfg: TimedConfig,
    now: Instant,
) -> InkEntity {
    InkEntity {
        id: EntityId::new_ink(),
        points,
        created_at: now,
        lifespan_ms: cfg.lifespan_ms,
        fade_ms: cfg.fade_ms.min(cfg.lifespan_ms),
        base_opacity,
        fade: base_opacity,
    }
}

/// Start a timed stroke: snapshot the current config and the active
/// drawing opacity into a fresh ink entity and create it on the canvas.
///
/// Returns the new entity id, or `None` when the engine is unavailable.
pub fn begin_ink_stroke(
    engine: &Rc<RefCell<dyn CanvasEngine>>,
    points: Vec<Point>,
    style_opacity: f32,
) -> Option<EntityId> {
    if !engine.borrow().is_ready() {
        return None;
    }
    let ink = create_ink_entity(points, style_opacity, timed_config(), Instant::now());
    let id = ink.id.clone();
    let batch = EntityBatch::new().create(CanvasEntity::Ink(ink));
    match engine.borrow_mut().apply(batch) {
        Ok(()) => Some(id),
        Err(e) => {
            warn!("ink stroke rejected: {e}");
            None
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MemoryCanvas;
    use crate::state::timed_config::{reset_timed_config, set_timed_config};
    use std::time::Duration;

    fn engine() -> Rc<RefCell<dyn CanvasEngine>> {
        let mut canvas = MemoryCanvas::new();
        canvas.set_ready(true);
        Rc::new(RefCell::new(canvas))
    }

    fn ink_fades(engine: &Rc<RefCell<dyn CanvasEngine>>) -> Vec<f32> {
        engine
            .borrow()
            .entities_of(EntityKind::Ink)
            .iter()
            .filter_map(|e| e.as_ink().map(|i| i.fade))
            .collect()
    }

    #[test]
    fn test_fade_curve() {
        // lifespan 5000, fade 2000, base 1.0: flat until 3000, then a
        // linear ramp to zero.
        assert_eq!(compute_fade(1000, 5000, 2000, 1.0), Some(1.0));
        assert_eq!(compute_fade(3000, 5000, 2000, 1.0), Some(1.0));
        assert_eq!(compute_fade(4000, 5000, 2000, 1.0), Some(0.5));
        assert_eq!(compute_fade(5000, 5000, 2000, 1.0), None);
        assert_eq!(compute_fade(5001, 5000, 2000, 1.0), None);
    }

    #[test]
    fn test_fade_never_negative() {
        let fade = compute_fade(4999, 5000, 2000, 1.0).unwrap();
        assert!(fade >= 0.0);
        // Zero-length fade window: full opacity until expiry.
        assert_eq!(compute_fade(4999, 5000, 0, 0.7), Some(0.7));
    }

    #[test]
    fn test_tick_fades_and_expires() {
        let engine = engine();
        let t0 = Instant::now();
        let cfg = TimedConfig { lifespan_ms: 5000, fade_ms: 2000 };
        let ink = create_ink_entity(vec![], 1.0, cfg, t0);
        engine
            .borrow_mut()
            .apply(EntityBatch::new().create(CanvasEntity::Ink(ink)))
            .unwrap();

        // Pre-fade: no write needed, opacity stays at base.
        tick_timed_entities(&engine, t0 + Duration::from_millis(1000));
        assert_eq!(ink_fades(&engine), vec![1.0]);

        // Mid-fade: opacity halves.
        tick_timed_entities(&engine, t0 + Duration::from_millis(4000));
        assert_eq!(ink_fades(&engine), vec![0.5]);

        // Past the lifespan: entity is gone.
        tick_timed_entities(&engine, t0 + Duration::from_millis(5001));
        assert!(ink_fades(&engine).is_empty());
    }

    #[test]
    fn test_steady_state_writes_nothing() {
        let mut canvas = MemoryCanvas::new();
        canvas.set_ready(true);
        let concrete = Rc::new(RefCell::new(canvas));
        let engine: Rc<RefCell<dyn CanvasEngine>> = concrete.clone();

        let t0 = Instant::now();
        let cfg = TimedConfig { lifespan_ms: 10_000, fade_ms: 1000 };
        let ink = create_ink_entity(vec![], 0.8, cfg, t0);
        engine
            .borrow_mut()
            .apply(EntityBatch::new().create(CanvasEntity::Ink(ink)))
            .unwrap();

        let before = concrete.borrow().batches_applied();
        // Two pre-fade ticks: neither should apply a batch.
        tick_timed_entities(&engine, t0 + Duration::from_millis(100));
        tick_timed_entities(&engine, t0 + Duration::from_millis(200));
        assert_eq!(concrete.borrow().batches_applied(), before);
        assert_eq!(ink_fades(&engine), vec![0.8]);
    }

    #[test]
    fn test_engine_unavailable_skips_frame() {
        let canvas = MemoryCanvas::new(); // not ready
        let engine: Rc<RefCell<dyn CanvasEngine>> = Rc::new(RefCell::new(canvas));
        // Must not panic or error; the loop just tries again next frame.
        tick_timed_entities(&engine, Instant::now());
    }

    #[test]
    fn test_config_snapshot_at_creation() {
        reset_timed_config();
        let engine = engine();
        let t0 = Instant::now();
        let before = create_ink_entity(vec![], 1.0, timed_config(), t0);
        set_timed_config(50, 10);
        let after = create_ink_entity(vec![], 1.0, timed_config(), t0);

        assert_eq!(before.lifespan_ms, 5000);
        assert_eq!(after.lifespan_ms, 50);

        engine
            .borrow_mut()
            .apply(
                EntityBatch::new()
                    .create(CanvasEntity::Ink(before))
                    .create(CanvasEntity::Ink(after)),
            )
            .unwrap();

        // 100ms in: only the short-lived entity expires.
        tick_timed_entities(&engine, t0 + Duration::from_millis(100));
        assert_eq!(engine.borrow().entities_of(EntityKind::Ink).len(), 1);
        reset_timed_config();
    }

    #[test]
    fn test_begin_stroke_snapshots_style() {
        reset_timed_config();
        let engine = engine();
        crate::types::reset_ink_counter();
        let id = begin_ink_stroke(&engine, vec![Point::new(1.0, 2.0)], 0.6).unwrap();
        let entities = engine.borrow().entities_of(EntityKind::Ink);
        let ink = entities[0].as_ink().unwrap();
        assert_eq!(&id, &ink.id);
        assert_eq!(ink.base_opacity, 0.6);
        assert_eq!(ink.fade, 0.6);
        assert_eq!(ink.lifespan_ms, 5000);
    }
}
