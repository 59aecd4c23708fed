//! Selection State - The currently selected card.
//!
//! The canvas engine owns selection gestures; it reports selection changes
//! through the listener wired at mount. This module resolves the first
//! selected *card* entity through the catalog and exposes it as a signal
//! for the detail panel. A selected entity whose card id no longer matches
//! any catalog record resolves to no selection rather than erroring.

use log::trace;
use spark_signals::{signal, Signal};

use crate::catalog::{Card, Catalog};
use crate::types::{CardId, EntityId};

thread_local! {
    static SELECTED_CARD: Signal<Option<CardId>> = signal(None);
}

/// The currently selected card id, if any.
pub fn selected_card() -> Option<CardId> {
    SELECTED_CARD.with(|s| s.get())
}

/// Resolve the selection to the full card record.
pub fn selected_card_record<'a>(catalog: &'a Catalog) -> Option<&'a Card> {
    selected_card().and_then(|id| catalog.get(&id))
}

/// Get the selection signal for reactive tracking.
pub fn selected_card_signal() -> Signal<Option<CardId>> {
    SELECTED_CARD.with(|s| s.clone())
}

/// Handle a selection change reported by the canvas engine.
///
/// The first selected entity that is a card entity with a live catalog
/// record wins; anything else (ink entities, stale card ids) clears the
/// selection.
pub fn handle_selection_change(selected: &[EntityId], catalog: &Catalog) {
    let card_id = selected
        .iter()
        .filter_map(|id| id.card_id())
        .find(|card_id| catalog.contains(card_id))
        .map(|s| s.to_string());
    trace!("selection -> {card_id:?}");
    SELECTED_CARD.with(|s| {
        if s.get() != card_id {
            s.set(card_id);
        }
    });
}

/// Clear selection state (for testing).
pub fn reset_selection_state() {
    SELECTED_CARD.with(|s| s.set(None));
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn catalog() -> Catalog {
        Catalog::from_json_str(r#"[{"id": "known", "collection": "art"}]"#).unwrap()
    }

    #[test]
    fn test_resolves_card_entity() {
        reset_selection_state();
        let catalog = catalog();
        handle_selection_change(&[EntityId::for_card("known")], &catalog);
        assert_eq!(selected_card().as_deref(), Some("known"));
    }

    #[test]
    fn test_stale_card_id_clears_selection() {
        reset_selection_state();
        let catalog = catalog();
        handle_selection_change(&[EntityId::for_card("known")], &catalog);
        handle_selection_change(&[EntityId::for_card("ghost")], &catalog);
        assert_eq!(selected_card(), None);
    }

    #[test]
    fn test_ink_entities_ignored() {
        reset_selection_state();
        let catalog = catalog();
        handle_selection_change(&[EntityId("ink:0".into())], &catalog);
        assert_eq!(selected_card(), None);
    }
}
