//! Canvas Engine Port - The contract with the rendering surface.
//!
//! The renderer is dumb: it owns entities, gestures, and the camera, and
//! applies the batches this crate hands it. All domain logic (what should
//! be visible, where, at what opacity) stays on this side of the port.

use thiserror::Error;

use crate::types::{EntityId, Size};

use super::batch::EntityBatch;
use super::entity::{CanvasEntity, EntityKind};

/// Error type for batch application.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CanvasError {
    /// The engine has not signalled readiness yet.
    #[error("engine not ready")]
    NotReady,
    /// A patch or delete referenced an entity the engine does not hold.
    #[error("unknown entity: {0}")]
    UnknownEntity(EntityId),
    /// A create collided with a live entity of the same id.
    #[error("duplicate entity: {0}")]
    DuplicateEntity(EntityId),
    /// A backend-specific failure.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Callback invoked when the engine's selection changes.
pub type SelectionListener = Box<dyn Fn(&[EntityId])>;

/// The rendering surface this crate drives.
///
/// # Atomicity
///
/// `apply` is all-or-nothing: implementations must validate the whole
/// batch before mutating anything, so a rejected batch leaves the entity
/// store untouched. Reconciliation depends on always observing a fully
/// applied previous batch.
pub trait CanvasEngine {
    /// Whether the engine is initialized and accepting batches.
    fn is_ready(&self) -> bool;

    /// All live entities of one kind, in creation order.
    fn entities_of(&self, kind: EntityKind) -> Vec<CanvasEntity>;

    /// Current rendered geometry of an entity - reflects manual resize and
    /// collapsed/expanded display state. `None` when the entity does not
    /// exist.
    fn entity_geometry(&self, id: &EntityId) -> Option<Size>;

    /// Apply one atomic mutation batch.
    fn apply(&mut self, batch: EntityBatch) -> Result<(), CanvasError>;

    /// Register the listener notified on selection changes. Replaces any
    /// previous listener.
    fn set_selection_listener(&mut self, listener: SelectionListener);
}
