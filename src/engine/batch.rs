//! Entity Batches - The atomic unit of canvas mutation.
//!
//! Every mutation this crate issues - reconciliation, detail toggles, ink
//! strokes, lifecycle fades - travels as one [`EntityBatch`]. The engine
//! applies a batch atomically: partial application (deletes landing while
//! creates fail) must never be observable.

use crate::types::{EntityId, Point, Size};

use super::entity::{CanvasEntity, CardDisplay, EntityFlags};

/// Patch for a card entity. `None` fields are left untouched.
///
/// Reconciliation only ever sets `position` and `display`; `size` and
/// `flags` are engine-owned interactive state that survives reconcile
/// passes and is patched only by explicit user-facing operations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CardPatch {
    pub position: Option<Point>,
    pub size: Option<Size>,
    pub flags: Option<EntityFlags>,
    pub display: Option<CardDisplay>,
}

impl CardPatch {
    pub fn is_empty(&self) -> bool {
        self.position.is_none()
            && self.size.is_none()
            && self.flags.is_none()
            && self.display.is_none()
    }
}

/// Patch for an ink entity: the freshly computed opacity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InkPatch {
    pub fade: f32,
}

/// A keyed patch against a live entity.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityPatch {
    Card { id: EntityId, patch: CardPatch },
    Ink { id: EntityId, patch: InkPatch },
}

impl EntityPatch {
    pub fn id(&self) -> &EntityId {
        match self {
            EntityPatch::Card { id, .. } | EntityPatch::Ink { id, .. } => id,
        }
    }
}

/// Camera adjustment carried with a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraOp {
    /// Fit the camera to the visible content.
    FitContent,
}

/// One atomic batch of canvas mutations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EntityBatch {
    pub create: Vec<CanvasEntity>,
    pub update: Vec<EntityPatch>,
    pub delete: Vec<EntityId>,
    pub camera: Option<CameraOp>,
}

impl EntityBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(mut self, entity: CanvasEntity) -> Self {
        self.create.push(entity);
        self
    }

    pub fn update(mut self, patch: EntityPatch) -> Self {
        self.update.push(patch);
        self
    }

    pub fn delete(mut self, id: EntityId) -> Self {
        self.delete.push(id);
        self
    }

    pub fn with_camera(mut self, op: CameraOp) -> Self {
        self.camera = Some(op);
        self
    }

    /// A batch with no entity operations and no camera adjustment.
    pub fn is_empty(&self) -> bool {
        self.create.is_empty()
            && self.update.is_empty()
            && self.delete.is_empty()
            && self.camera.is_none()
    }

    /// Total entity operations (camera excluded).
    pub fn op_count(&self) -> usize {
        self.create.len() + self.update.len() + self.delete.len()
    }
}

// =============================================================================
// Tests
// =============================================================================
