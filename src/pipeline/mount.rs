//! Mount API - Application lifecycle and the cooperative frame loop.
//!
//! Wires the whole pipeline against a canvas engine and returns a handle
//! that drives it:
//!
//! ```ignore
//! use spark_canvas::pipeline::{mount, run, tick};
//!
//! let handle = mount(engine, catalog, Some(Box::new(store)));
//!
//! // Option 1: blocking frame loop
//! run(&handle);
//!
//! // Option 2: tick manually from your own loop
//! while tick(&handle) {
//!     // your logic here
//! }
//!
//! handle.unmount();
//! ```
//!
//! Each tick runs the timed-entity lifecycle pass; the reconcile effect
//! runs on its own whenever a filter/page signal changes. Stopping the
//! handle halts the loop at the next frame boundary - there is no
//! scheduled timer to leak.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

use log::debug;
use spark_signals::{signal, Signal};

use crate::catalog::Catalog;
use crate::engine::CanvasEngine;
use crate::lifecycle::tick_timed_entities;
use crate::state::filter::init_filter_state;
use crate::state::persist::{create_autosave_effect, load_preferences, PrefStore};
use crate::state::selection::handle_selection_change;

use super::page::create_page_derived;
use super::reconcile::create_reconcile_effect;
use super::visible::create_visible_derived;

/// Frame cadence of the cooperative loop (~60fps).
pub const FRAME_MS: u64 = 16;

// =============================================================================
// Engine Readiness
// =============================================================================

thread_local! {
    static ENGINE_READY: Signal<bool> = signal(false);
}

/// Whether the engine has signalled readiness.
pub fn engine_ready() -> bool {
    ENGINE_READY.with(|s| s.get())
}

/// Signal that the engine surface is up. Triggers the first real
/// reconciliation pass.
pub fn notify_engine_ready() {
    ENGINE_READY.with(|s| s.set(true));
}

/// Get the readiness signal for reactive tracking.
pub fn engine_ready_signal() -> Signal<bool> {
    ENGINE_READY.with(|s| s.clone())
}

/// Reset readiness (for testing).
pub fn reset_engine_ready() {
    ENGINE_READY.with(|s| s.set(false));
}

// =============================================================================
// Mount Handle
// =============================================================================

/// Handle returned by [`mount`].
///
/// Holds the stop functions for every wired effect and the running flag
/// the frame loop checks. Dropping the handle stops everything.
pub struct MountHandle {
    stop_effects: Vec<Box<dyn FnOnce()>>,
    running: Rc<Cell<bool>>,
    engine: Rc<RefCell<dyn CanvasEngine>>,
}

impl MountHandle {
    /// Check if the frame loop should keep running.
    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Request shutdown; the loop exits at the next frame boundary.
    pub fn stop(&self) {
        self.running.set(false);
    }

    /// Stop the frame loop and every wired effect.
    pub fn unmount(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.running.set(false);
        for stop in self.stop_effects.drain(..) {
            stop();
        }
    }
}

impl Drop for MountHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// =============================================================================
// Mount Function
// =============================================================================

/// Mount the engine pipeline.
///
/// This sets up:
/// 1. Filter state from the catalog (all collections selected)
/// 2. Preference load (once) + autosave effect, when a store is supplied
/// 3. The selection listener on the engine
/// 4. The visible/page deriveds and the reconcile effect
///
/// Returns a [`MountHandle`]; drive it with [`tick`] or [`run`].
pub fn mount(
    engine: Rc<RefCell<dyn CanvasEngine>>,
    catalog: Rc<Catalog>,
    prefs: Option<Box<dyn PrefStore>>,
) -> MountHandle {
    init_filter_state(&catalog);

    let mut stop_effects: Vec<Box<dyn FnOnce()>> = Vec::new();

    if let Some(store) = prefs {
        load_preferences(store.as_ref());
        stop_effects.push(Box::new(create_autosave_effect(store)));
    }

    // Selection events resolve through the catalog into the selection
    // signal.
    {
        let catalog = catalog.clone();
        engine
            .borrow_mut()
            .set_selection_listener(Box::new(move |ids| {
                handle_selection_change(ids, &catalog);
            }));
    }

    // Reactive pipeline: filters -> visible -> page -> reconcile.
    let visible_derived = create_visible_derived(catalog.clone());
    let page_derived = create_page_derived(visible_derived.clone());
    stop_effects.push(Box::new(create_reconcile_effect(
        engine.clone(),
        catalog,
        visible_derived,
        page_derived,
    )));

    // Pick up an engine that was ready before mount.
    if engine.borrow().is_ready() {
        notify_engine_ready();
    }

    debug!("mounted");
    MountHandle {
        stop_effects,
        running: Rc::new(Cell::new(true)),
        engine,
    }
}

/// Unmount and clean up.
pub fn unmount(handle: MountHandle) {
    handle.unmount();
}

// =============================================================================
// Frame Loop
// =============================================================================

/// Run one cooperative frame: the timed-entity lifecycle pass.
///
/// Returns `false` once the handle has been stopped. The pass itself never
/// fails; an unavailable engine just skips this frame's aging.
pub fn tick(handle: &MountHandle) -> bool {
    if !handle.is_running() {
        return false;
    }
    tick_timed_entities(&handle.engine, Instant::now());
    handle.is_running()
}

/// Run the blocking frame loop until the handle is stopped.
///
/// Yields between frames (no busy loop); cancellation via
/// [`MountHandle::stop`] takes effect at the next frame boundary and
/// leaves nothing scheduled.
pub fn run(handle: &MountHandle) {
    while tick(handle) {
        thread::sleep(Duration::from_millis(FRAME_MS));
    }
}

// =============================================================================
// Tests
// =============================================================================
