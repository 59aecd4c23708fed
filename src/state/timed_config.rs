//! Timed Config - Lifespan and fade settings for ink entities.
//!
//! A process-wide mutable record the UI updates from sliders. Every newly
//! created timed entity snapshots the config **by value at creation time**;
//! later changes affect only entities created afterward.

use spark_signals::{signal, Signal};

/// Lifespan/fade configuration for timed ink entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedConfig {
    /// Total time an ink entity lives, in milliseconds.
    pub lifespan_ms: u64,
    /// Length of the fade-out window at the end of the lifespan.
    /// Invariant: `fade_ms <= lifespan_ms`.
    pub fade_ms: u64,
}

impl Default for TimedConfig {
    fn default() -> Self {
        Self { lifespan_ms: 5000, fade_ms: 2000 }
    }
}

thread_local! {
    static TIMED_CONFIG: Signal<TimedConfig> = signal(TimedConfig::default());
}

/// Snapshot the current timed config.
pub fn timed_config() -> TimedConfig {
    TIMED_CONFIG.with(|s| s.get())
}

/// Update the timed config. Invalid values are clamped silently, never
/// surfaced to the user: lifespan is at least 1ms and the fade window never
/// exceeds the lifespan.
pub fn set_timed_config(lifespan_ms: u64, fade_ms: u64) {
    let lifespan = lifespan_ms.max(1);
    let fade = fade_ms.min(lifespan);
    TIMED_CONFIG.with(|s| s.set(TimedConfig { lifespan_ms: lifespan, fade_ms: fade }));
}

/// Get the config signal for reactive tracking.
pub fn timed_config_signal() -> Signal<TimedConfig> {
    TIMED_CONFIG.with(|s| s.clone())
}

/// Reset to defaults (for testing).
pub fn reset_timed_config() {
    TIMED_CONFIG.with(|s| s.set(TimedConfig::default()));
}

// =============================================================================
// Tests
// =============================================================================
