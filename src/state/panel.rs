//! Panel State - Filter panel visibility.
//!
//! A single persisted flag; the panel chrome itself lives outside this
//! crate.

use spark_signals::{signal, Signal};

thread_local! {
    static PANEL_VISIBLE: Signal<bool> = signal(true);
}

/// Whether the filter panel is visible.
pub fn panel_visible() -> bool {
    PANEL_VISIBLE.with(|s| s.get())
}

/// Show or hide the filter panel.
pub fn set_panel_visible(visible: bool) {
    PANEL_VISIBLE.with(|s| s.set(visible));
}

/// Toggle panel visibility.
pub fn toggle_panel() {
    PANEL_VISIBLE.with(|s| s.set(!s.get()));
}

/// Get the visibility signal for reactive tracking.
pub fn panel_visible_signal() -> Signal<bool> {
    PANEL_VISIBLE.with(|s| s.clone())
}

/// Reset to default (for testing).
pub fn reset_panel_state() {
    PANEL_VISIBLE.with(|s| s.set(true));
}
