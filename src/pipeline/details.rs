//! Detail Toggling - Collapse/expand a card entity.
//!
//! Flips the `COLLAPSED` flag and, on expand, grows the card so the full
//! summary fits (estimated from the display text; the estimate only ever
//! grows a card, never shrinks one the user made taller). Size and flags
//! are exactly the interactive state reconciliation preserves, so the
//! toggle survives reflows; the next layout pass packs the new effective
//! height.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, warn};

use crate::engine::{CanvasEngine, CanvasEntity, CardPatch, EntityBatch, EntityFlags, EntityKind, EntityPatch};
use crate::layout::estimate_expanded_height;
use crate::types::{EntityId, Size};

/// Toggle a card entity between collapsed and expanded.
///
/// A no-op when the engine is not ready or the entity does not exist.
pub fn toggle_card_details(engine: &Rc<RefCell<dyn CanvasEngine>>, id: &EntityId) {
    let patch = {
        let eng = engine.borrow();
        if !eng.is_ready() {
            return;
        }
        let card = eng
            .entities_of(EntityKind::Card)
            .into_iter()
            .filter_map(|e| match e {
                CanvasEntity::Card(c) => Some(c),
                CanvasEntity::Ink(_) => None,
            })
            .find(|c| &c.id == id);
        let Some(card) = card else {
            debug!("detail toggle on missing entity {id}");
            return;
        };

        let expanding = card.flags.contains(EntityFlags::COLLAPSED);
        let mut patch = CardPatch {
            flags: Some(card.flags ^ EntityFlags::COLLAPSED),
            ..Default::default()
        };
        if expanding {
            let required = estimate_expanded_height(&card.display, card.size.w);
            if required > card.size.h {
                patch.size = Some(Size::new(card.size.w, required));
            }
        }
        patch
    };

    let batch = EntityBatch::new().update(EntityPatch::Card {
        id: id.clone(),
        patch,
    });
    if let Err(e) = engine.borrow_mut().apply(batch) {
        warn!("detail toggle rejected: {e}");
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::engine::MemoryCanvas;
    use crate::layout::reset_position_cache;
    use crate::pipeline::reconcile::run_reconcile;

    fn setup() -> (Rc<RefCell<dyn CanvasEngine>>, Catalog) {
        reset_position_cache();
        let catalog = Catalog::from_json_str(
            r#"[{"id": "1", "title": "One", "collection": "a",
                 "summary": "a long summary that wraps over several lines when measured"}]"#,
        )
        .unwrap();
        let mut canvas = MemoryCanvas::new();
        canvas.set_ready(true);
        let engine: Rc<RefCell<dyn CanvasEngine>> = Rc::new(RefCell::new(canvas));
        run_reconcile(&engine, &catalog, &["1".to_string()]);
        (engine, catalog)
    }

    fn card_of(engine: &Rc<RefCell<dyn CanvasEngine>>) -> crate::engine::CardEntity {
        engine.borrow().entities_of(EntityKind::Card)[0]
            .as_card()
            .unwrap()
            .clone()
    }

    #[test]
    fn test_collapse_then_expand() {
        let (engine, _catalog) = setup();
        let id = EntityId::for_card("1");

        toggle_card_details(&engine, &id);
        assert!(card_of(&engine).flags.contains(EntityFlags::COLLAPSED));

        toggle_card_details(&engine, &id);
        let card = card_of(&engine);
        assert!(!card.flags.contains(EntityFlags::COLLAPSED));
        // Expansion may have grown the card to fit the summary, never
        // shrunk it.
        assert!(card.size.h >= 420.0);
    }

    #[test]
    fn test_toggle_survives_reflow() {
        let (engine, catalog) = setup();
        let id = EntityId::for_card("1");
        toggle_card_details(&engine, &id);
        run_reconcile(&engine, &catalog, &["1".to_string()]);
        assert!(card_of(&engine).flags.contains(EntityFlags::COLLAPSED));
    }

    #[test]
    fn test_missing_entity_is_noop() {
        let (engine, _catalog) = setup();
        toggle_card_details(&engine, &EntityId::for_card("ghost"));
        assert_eq!(engine.borrow().entities_of(EntityKind::Card).len(), 1);
    }
}
