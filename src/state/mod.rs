//! State Module - Reactive application state.
//!
//! Thread-local signals with free-function accessors, one module per
//! concern:
//!
//! - **Filter** - Active collection/tag/year sets driving the visible set
//! - **Pager** - Current page window over the visible set
//! - **Timed config** - Lifespan/fade settings snapshotted by ink entities
//! - **Selection** - The selected card, fed by engine selection events
//! - **Panel** - Filter panel visibility flag
//! - **Persist** - Preference store port and load/save/autosave

pub mod filter;
pub mod pager;
pub mod panel;
pub mod persist;
pub mod selection;
pub mod timed_config;

pub use filter::{
    active_collections, active_collections_signal, active_tags, active_tags_signal,
    active_years, active_years_signal, filter_state, init_filter_state,
    reset_filter_state, set_active_collections, set_active_tags, set_active_years,
    toggle_collection, toggle_tag, toggle_year, FilterState,
};
pub use pager::{
    page_count_for, page_size, page_size_signal, paginate, raw_page, raw_page_signal,
    reset_page, reset_pager_state, set_page, set_page_size, DEFAULT_PAGE_SIZE,
};
pub use panel::{panel_visible, panel_visible_signal, reset_panel_state, set_panel_visible, toggle_panel};
pub use persist::{
    create_autosave_effect, load_preferences, save_preferences, FilePrefStore,
    MemoryPrefStore, PrefError, PrefStore, Preferences, PREFS_KEY,
};
pub use selection::{
    handle_selection_change, reset_selection_state, selected_card, selected_card_record,
    selected_card_signal,
};
pub use timed_config::{
    reset_timed_config, set_timed_config, timed_config, timed_config_signal, TimedConfig,
};
