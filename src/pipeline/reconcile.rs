//! Canvas Reconciler - Diff desired vs. live, apply one atomic batch.
//!
//! The single authority that creates, deletes, and repositions card
//! entities. Every run queries the live entities fresh from the engine
//! (never cached across invocations), computes three disjoint sets -
//! delete / create / update - and dispatches them together with any camera
//! adjustment as ONE batch, so a later run can never observe a partially
//! applied predecessor.
//!
//! Re-running with unchanged input produces an empty batch: creates and
//! deletes vanish by construction, and update patches are emitted only
//! when position or display properties actually differ.
//!
//! Engine-owned interactive state (user-driven size, collapsed flag) is
//! never patched here. Position IS: layout authority wins on reflow, so a
//! manually dragged card snaps back into its column the next time the
//! grid runs. The resized *height* survives and feeds back into packing
//! via the engine's rendered geometry.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use log::{debug, warn};
use spark_signals::{effect, Derived};

use crate::catalog::Catalog;
use crate::engine::{
    CameraOp, CanvasEngine, CanvasEntity, CardDisplay, CardEntity, CardPatch, EntityBatch,
    EntityKind, EntityPatch,
};
use crate::layout::{layout_page, CARD_WIDTH, DEFAULT_CARD_HEIGHT};
use crate::state::pager::{page_size_signal, raw_page_signal};
use crate::types::{CardId, Point, Size};

use super::mount::engine_ready_signal;
use super::page::set_display_counts;

/// Compute the reconciliation batch for one desired page.
///
/// `positions` is parallel to `desired` (the freshly computed layout).
/// `live` is the current card entity population. Stale live entities whose
/// `card_id` matches no catalog record fall into the delete set like any
/// other no-longer-desired entity; desired ids without a catalog record
/// (which a well-formed pipeline never produces) are skipped rather than
/// created from nothing.
pub fn plan_reconcile(
    desired: &[CardId],
    positions: &[Point],
    live: &[CanvasEntity],
    catalog: &Catalog,
) -> EntityBatch {
    let live_cards: Vec<&CardEntity> = live.iter().filter_map(CanvasEntity::as_card).collect();
    let by_card_id: HashMap<&str, &CardEntity> =
        live_cards.iter().map(|c| (c.card_id.as_str(), *c)).collect();
    let desired_set: HashSet<&str> = desired.iter().map(String::as_str).collect();

    let mut batch = EntityBatch::new();

    // Live entities no longer desired (including stale card ids).
    for entity in &live_cards {
        if !desired_set.contains(entity.card_id.as_str()) {
            batch.delete.push(entity.id.clone());
        }
    }

    let mut seen: HashSet<&str> = HashSet::with_capacity(desired.len());
    for (card_id, &position) in desired.iter().zip(positions) {
        // One live entity per card id, ever.
        if !seen.insert(card_id.as_str()) {
            continue;
        }
        let Some(card) = catalog.get(card_id) else {
            warn!("desired card {card_id} has no catalog record, skipping");
            continue;
        };

        match by_card_id.get(card_id.as_str()) {
            None => {
                let size = Size::new(CARD_WIDTH, DEFAULT_CARD_HEIGHT);
                batch
                    .create
                    .push(CanvasEntity::Card(CardEntity::from_card(card, position, size)));
            }
            Some(existing) => {
                let mut patch = CardPatch::default();
                if existing.position != position {
                    patch.position = Some(position);
                }
                let display = CardDisplay::from_card(card);
                if existing.display != display {
                    patch.display = Some(display);
                }
                if !patch.is_empty() {
                    batch.update.push(EntityPatch::Card {
                        id: existing.id.clone(),
                        patch,
                    });
                }
            }
        }
    }

    batch
}

/// Run one reconciliation pass against the engine.
///
/// A no-op when the engine is not ready - no retry, no backoff; the next
/// state change re-invokes. The camera refits only when the population
/// changed, keeping stable-input runs at zero operations.
pub fn run_reconcile(
    engine: &Rc<RefCell<dyn CanvasEngine>>,
    catalog: &Catalog,
    desired: &[CardId],
) {
    let batch = {
        let eng = engine.borrow();
        if !eng.is_ready() {
            debug!("reconcile skipped: engine not ready");
            return;
        }
        let live = eng.entities_of(EntityKind::Card);
        // Layout runs every pass; heights come from live geometry so
        // resized/collapsed cards pack accordingly. Writes the position
        // cache as a side effect.
        let positions = layout_page(desired, &*eng);
        let mut batch = plan_reconcile(desired, &positions, &live, catalog);
        if !batch.create.is_empty() || !batch.delete.is_empty() {
            batch.camera = Some(CameraOp::FitContent);
        }
        batch
    };

    if batch.is_empty() {
        debug!("reconcile: no changes");
        return;
    }

    debug!(
        "reconcile: {} create, {} update, {} delete",
        batch.create.len(),
        batch.update.len(),
        batch.delete.len()
    );
    if let Err(e) = engine.borrow_mut().apply(batch) {
        warn!("reconcile batch rejected: {e}");
    }
}

/// Create the reconcile effect.
///
/// Re-runs whenever the visible set, the page window, or engine readiness
/// changes; refreshes the display-count signals on every run.
pub fn create_reconcile_effect(
    engine: Rc<RefCell<dyn CanvasEngine>>,
    catalog: Rc<Catalog>,
    visible_derived: Derived<Vec<CardId>>,
    page_derived: Derived<Vec<CardId>>,
) -> impl FnOnce() {
    let ready_signal = engine_ready_signal();
    let page_signal = raw_page_signal();
    let size_signal = page_size_signal();

    effect(move || {
        // Reads establish the reactive dependencies.
        let visible = visible_derived.get();
        let desired = page_derived.get();
        let ready = ready_signal.get();

        set_display_counts(visible.len(), page_signal.get(), size_signal.get());

        if !ready {
            return;
        }
        run_reconcile(&engine, &catalog, &desired);
    })
}

// =============================================================================
// Tests
// =============================================================================
