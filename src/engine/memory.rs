//! Memory Canvas - In-process reference backend.
//!
//! Holds entities in an insertion-ordered store, validates every batch
//! fully before mutating (so partial application is never observable), and
//! drives the selection listener on demand. The integration tests and the
//! demo run against this backend; a real renderer implements the same
//! port.

use std::collections::HashMap;

use log::debug;

use crate::types::{EntityId, Size};

use super::batch::{CardPatch, EntityBatch, EntityPatch, InkPatch};
use super::entity::{CanvasEntity, EntityKind};
use super::port::{CanvasEngine, CanvasError, SelectionListener};

/// In-memory implementation of [`CanvasEngine`].
#[derive(Default)]
pub struct MemoryCanvas {
    ready: bool,
    order: Vec<EntityId>,
    entities: HashMap<EntityId, CanvasEntity>,
    selection: Vec<EntityId>,
    listener: Option<SelectionListener>,
    batches_applied: usize,
}

impl MemoryCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the readiness flag (a real engine does this once its surface
    /// is mounted).
    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    /// Number of batches applied so far (test instrumentation).
    pub fn batches_applied(&self) -> usize {
        self.batches_applied
    }

    /// Total live entities of every kind.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Look up one entity.
    pub fn get(&self, id: &EntityId) -> Option<&CanvasEntity> {
        self.entities.get(id)
    }

    /// Simulate a user selection gesture: store the selection and notify
    /// the listener.
    pub fn select(&mut self, ids: Vec<EntityId>) {
        self.selection = ids;
        if let Some(listener) = &self.listener {
            listener(&self.selection);
        }
    }

    /// Validate a batch without mutating anything.
    fn validate(&self, batch: &EntityBatch) -> Result<(), CanvasError> {
        for entity in &batch.create {
            if self.entities.contains_key(entity.id()) {
                return Err(CanvasError::DuplicateEntity(entity.id().clone()));
            }
        }
        for patch in &batch.update {
            if !self.entities.contains_key(patch.id()) {
                return Err(CanvasError::UnknownEntity(patch.id().clone()));
            }
        }
        for id in &batch.delete {
            if !self.entities.contains_key(id) {
                return Err(CanvasError::UnknownEntity(id.clone()));
            }
        }
        Ok(())
    }

    fn apply_card_patch(entity: &mut CanvasEntity, patch: &CardPatch) {
        if let CanvasEntity::Card(card) = entity {
            if let Some(position) = patch.position {
                card.position = position;
            }
            if let Some(size) = patch.size {
                card.size = size;
            }
            if let Some(flags) = patch.flags {
                card.flags = flags;
            }
            if let Some(display) = &patch.display {
                card.display = display.clone();
            }
        }
    }

    fn apply_ink_patch(entity: &mut CanvasEntity, patch: &InkPatch) {
        if let CanvasEntity::Ink(ink) = entity {
            ink.fade = patch.fade;
        }
    }
}

impl CanvasEngine for MemoryCanvas {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn entities_of(&self, kind: EntityKind) -> Vec<CanvasEntity> {
        self.order
            .iter()
            .filter_map(|id| self.entities.get(id))
            .filter(|e| e.kind() == kind)
            .cloned()
            .collect()
    }

    fn entity_geometry(&self, id: &EntityId) -> Option<Size> {
        match self.entities.get(id)? {
            CanvasEntity::Card(card) => Some(card.effective_size()),
            CanvasEntity::Ink(_) => None,
        }
    }

    fn apply(&mut self, batch: EntityBatch) -> Result<(), CanvasError> {
        if !self.ready {
            return Err(CanvasError::NotReady);
        }
        // Validate first: a rejected batch must leave the store untouched.
        self.validate(&batch)?;

        for id in &batch.delete {
            self.entities.remove(id);
            self.order.retain(|o| o != id);
            self.selection.retain(|s| s != id);
        }
        for patch in &batch.update {
            let entity = self
                .entities
                .get_mut(patch.id())
                .ok_or_else(|| CanvasError::UnknownEntity(patch.id().clone()))?;
            match patch {
                EntityPatch::Card { patch, .. } => Self::apply_card_patch(entity, patch),
                EntityPatch::Ink { patch, .. } => Self::apply_ink_patch(entity, patch),
            }
        }
        for entity in batch.create {
            self.order.push(entity.id().clone());
            self.entities.insert(entity.id().clone(), entity);
        }
        // Camera ops are a no-op for the headless backend.
        self.batches_applied += 1;
        debug!(
            "memory canvas: batch applied ({} live entities)",
            self.entities.len()
        );
        Ok(())
    }

    fn set_selection_listener(&mut self, listener: SelectionListener) {
        self.listener = Some(listener);
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::entity::{CardDisplay, CardEntity, EntityFlags};
    use crate::types::{Point, Size};

    fn card(id: &str) -> CanvasEntity {
        CanvasEntity::Card(CardEntity {
            id: EntityId::for_card(id),
            card_id: id.into(),
            position: Point::default(),
            size: Size::new(360.0, 420.0),
            flags: EntityFlags::empty(),
            display: CardDisplay::default(),
        })
    }

    fn ready_canvas() -> MemoryCanvas {
        let mut canvas = MemoryCanvas::new();
        canvas.set_ready(true);
        canvas
    }

    #[test]
    fn test_not_ready_rejects() {
        let mut canvas = MemoryCanvas::new();
        let err = canvas.apply(EntityBatch::new().create(card("a")));
        assert_eq!(err, Err(CanvasError::NotReady));
    }

    #[test]
    fn test_create_and_query() {
        let mut canvas = ready_canvas();
        canvas
            .apply(EntityBatch::new().create(card("a")).create(card("b")))
            .unwrap();
        let cards = canvas.entities_of(EntityKind::Card);
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].id(), &EntityId::for_card("a"));
        assert!(canvas.entities_of(EntityKind::Ink).is_empty());
    }

    #[test]
    fn test_invalid_batch_mutates_nothing() {
        let mut canvas = ready_canvas();
        canvas.apply(EntityBatch::new().create(card("a"))).unwrap();
        // One valid delete + one unknown delete: whole batch must reject.
        let err = canvas.apply(
            EntityBatch::new()
                .delete(EntityId::for_card("a"))
                .delete(EntityId::for_card("ghost")),
        );
        assert!(matches!(err, Err(CanvasError::UnknownEntity(_))));
        assert_eq!(canvas.len(), 1);
    }

    #[test]
    fn test_duplicate_create_rejected() {
        let mut canvas = ready_canvas();
        canvas.apply(EntityBatch::new().create(card("a"))).unwrap();
        let err = canvas.apply(EntityBatch::new().create(card("a")));
        assert!(matches!(err, Err(CanvasError::DuplicateEntity(_))));
    }

    #[test]
    fn test_patch_preserves_untouched_fields() {
        let mut canvas = ready_canvas();
        canvas.apply(EntityBatch::new().create(card("a"))).unwrap();
        let id = EntityId::for_card("a");
        canvas
            .apply(EntityBatch::new().update(EntityPatch::Card {
                id: id.clone(),
                patch: CardPatch {
                    position: Some(Point::new(10.0, 20.0)),
                    ..Default::default()
                },
            }))
            .unwrap();
        let entity = canvas.get(&id).unwrap().as_card().unwrap().clone();
        assert_eq!(entity.position, Point::new(10.0, 20.0));
        assert_eq!(entity.size, Size::new(360.0, 420.0));
    }

    #[test]
    fn test_geometry_reflects_collapse() {
        let mut canvas = ready_canvas();
        canvas.apply(EntityBatch::new().create(card("a"))).unwrap();
        let id = EntityId::for_card("a");
        let expanded = canvas.entity_geometry(&id).unwrap();
        canvas
            .apply(EntityBatch::new().update(EntityPatch::Card {
                id: id.clone(),
                patch: CardPatch {
                    flags: Some(EntityFlags::COLLAPSED),
                    ..Default::default()
                },
            }))
            .unwrap();
        let collapsed = canvas.entity_geometry(&id).unwrap();
        assert!(collapsed.h < expanded.h);
    }

    #[test]
    fn test_selection_listener_fires() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let mut canvas = ready_canvas();
        canvas.apply(EntityBatch::new().create(card("a"))).unwrap();

        let seen: Rc<RefCell<Vec<EntityId>>> = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        canvas.set_selection_listener(Box::new(move |ids| {
            *seen_clone.borrow_mut() = ids.to_vec();
        }));
        canvas.select(vec![EntityId::for_card("a")]);
        assert_eq!(seen.borrow().as_slice(), &[EntityId::for_card("a")]);
    }

    #[test]
    fn test_delete_clears_selection() {
        let mut canvas = ready_canvas();
        canvas.apply(EntityBatch::new().create(card("a"))).unwrap();
        canvas.select(vec![EntityId::for_card("a")]);
        canvas
            .apply(EntityBatch::new().delete(EntityId::for_card("a")))
            .unwrap();
        assert!(canvas.selection.is_empty());
    }
}
