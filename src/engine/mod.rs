//! Canvas Engine Interface - Entities, batches, and the renderer port.
//!
//! The real rendering/hit-testing/gesture surface lives outside this crate
//! behind the [`CanvasEngine`] trait. This module defines the typed entity
//! model shared across that boundary, the atomic mutation batch, and an
//! in-process reference backend used by tests and demos.
//!
//! # Discipline
//!
//! The entity population is partitioned by kind: only the reconciler
//! creates/deletes/repositions card entities; only the timed lifecycle
//! manager mutates ink fade metadata and deletes expired ink entities.

pub mod batch;
pub mod entity;
pub mod memory;
pub mod port;

pub use batch::{CameraOp, CardPatch, EntityBatch, EntityPatch, InkPatch};
pub use entity::{
    CanvasEntity, CardDisplay, CardEntity, EntityFlags, EntityKind, InkEntity,
};
pub use memory::MemoryCanvas;
pub use port::{CanvasEngine, CanvasError, SelectionListener};
