//! # spark-canvas
//!
//! Reactive infinite-canvas card wall engine for Rust.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! fine-grained reactivity.
//!
//! ## Architecture
//!
//! A filterable catalog of cards is projected onto a pannable canvas of
//! visual entities owned by an external engine, while a second, independent
//! subsystem ages and expires user-drawn timed ink strokes:
//!
//! ```text
//! Filter signals → visible derived → page derived → reconcile effect → Canvas Engine
//!                                       Timed lifecycle tick (per frame) ↗
//! ```
//!
//! The reconcile effect is the single authority over card entities: every
//! run diffs the desired page against the live population and applies one
//! atomic create/update/delete batch. The lifecycle tick is the single
//! authority over ink entities. The two never touch the same entity.
//!
//! ## Modules
//!
//! - [`types`] - Core ids and canvas geometry
//! - [`catalog`] - The immutable card collection
//! - [`state`] - Filter/pager/config/selection signals and persistence
//! - [`engine`] - Entity model, atomic batches, and the renderer port
//! - [`layout`] - Greedy shortest-column grid packing + position cache
//! - [`pipeline`] - Deriveds, the reconciler, and the mount/frame loop
//! - [`lifecycle`] - Timed ink fade-and-expire

pub mod catalog;
pub mod engine;
pub mod layout;
pub mod lifecycle;
pub mod pipeline;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use catalog::{Card, Catalog, CatalogError};

pub use engine::{
    CameraOp, CanvasEngine, CanvasEntity, CanvasError, CardDisplay, CardEntity, CardPatch,
    EntityBatch, EntityFlags, EntityKind, EntityPatch, InkEntity, InkPatch, MemoryCanvas,
    SelectionListener,
};

pub use layout::{
    cached_position, column_count, estimate_expanded_height, layout_page, pack_grid,
    reset_position_cache, store_position, CARD_WIDTH, DEFAULT_CARD_HEIGHT, GRID_GAP,
    GRID_START_X, GRID_START_Y, MAX_COLUMNS, MIN_COLUMNS,
};

pub use pipeline::{
    compute_visible, create_page_derived, create_reconcile_effect, create_visible_derived,
    current_page, engine_ready, mount, notify_engine_ready, page_count, plan_reconcile,
    run, run_reconcile, tick, toggle_card_details, unmount, visible_count, MountHandle,
    FRAME_MS,
};

pub use lifecycle::{begin_ink_stroke, compute_fade, create_ink_entity, tick_timed_entities};

pub use state::{
    // Filter
    active_collections, active_tags, active_years, filter_state, init_filter_state,
    set_active_collections, set_active_tags, set_active_years, toggle_collection,
    toggle_tag, toggle_year, FilterState,
    // Pager
    paginate, set_page, set_page_size, DEFAULT_PAGE_SIZE,
    // Timed config
    set_timed_config, timed_config, TimedConfig,
    // Selection
    selected_card, selected_card_record,
    // Panel
    panel_visible, set_panel_visible, toggle_panel,
    // Persistence
    load_preferences, save_preferences, FilePrefStore, MemoryPrefStore, PrefError,
    PrefStore, Preferences,
};
