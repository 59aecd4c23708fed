//! Canvas Entities - Typed visual objects.
//!
//! One tagged variant per entity kind with a fixed field set; no
//! stringly-typed property bags. Card entities mirror a catalog record
//! plus engine-owned interactive state; ink entities carry the timed
//! lifecycle metadata they snapshot at creation.

use std::time::Instant;

use bitflags::bitflags;

use crate::catalog::Card;
use crate::types::{CardId, EntityId, Point, Size};

/// Title bar height of a card entity.
pub const TITLE_BAR_H: f64 = 30.0;

/// Entity kind discriminator for typed queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Card,
    Ink,
}

bitflags! {
    /// Engine-owned interactive state on a card entity.
    ///
    /// Reconciliation preserves these bits; only user interaction (or the
    /// detail-toggle operation) changes them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct EntityFlags: u8 {
        /// Details hidden; the card renders title bar + image band only.
        const COLLAPSED = 1 << 0;
        /// The user locked the card against edits.
        const LOCKED = 1 << 1;
    }
}

/// Display properties of a card entity, copied from the catalog record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CardDisplay {
    pub title: String,
    pub image: String,
    pub summary: String,
    pub content: String,
    pub collection: String,
    pub tags: Vec<String>,
    /// ISO date string for display, empty when the card is undated.
    pub date: String,
    pub url: Option<String>,
}

impl CardDisplay {
    /// Copy the display properties out of a catalog record.
    pub fn from_card(card: &Card) -> Self {
        Self {
            title: card.title.clone(),
            image: card.image.clone(),
            summary: card.summary.clone(),
            content: card.content.clone(),
            collection: card.collection.clone(),
            tags: card.tags.clone(),
            date: card.date.map(|d| d.to_string()).unwrap_or_default(),
            url: card.url.clone(),
        }
    }
}

/// A visual object representing exactly one catalog card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardEntity {
    pub id: EntityId,
    /// Back-reference to the owning catalog card.
    pub card_id: CardId,
    pub position: Point,
    pub size: Size,
    pub flags: EntityFlags,
    pub display: CardDisplay,
}

impl CardEntity {
    /// Build a fresh card entity at the given position with default size.
    pub fn from_card(card: &Card, position: Point, size: Size) -> Self {
        Self {
            id: EntityId::for_card(&card.id),
            card_id: card.id.clone(),
            position,
            size,
            flags: EntityFlags::empty(),
            display: CardDisplay::from_card(card),
        }
    }

    /// The height this entity currently occupies on the canvas.
    ///
    /// A collapsed card shows only the title bar and the image band; the
    /// band height follows the card width, clamped so a collapsed card
    /// never exceeds its expanded footprint.
    pub fn effective_height(&self) -> f64 {
        if self.flags.contains(EntityFlags::COLLAPSED) {
            let reserved = TITLE_BAR_H + 20.0;
            let max_image_h = (self.size.h - reserved).max(100.0);
            let image_h = (self.size.w * 0.75).clamp(80.0, max_image_h);
            TITLE_BAR_H + image_h
        } else {
            self.size.h
        }
    }

    /// The geometry the engine reports for this entity.
    pub fn effective_size(&self) -> Size {
        Size::new(self.size.w, self.effective_height())
    }
}

/// A user-drawn ink stroke subject to automatic fade-and-expire.
///
/// The lifecycle fields are snapshotted from [`TimedConfig`] and the active
/// drawing style at creation; later config changes do not touch them.
///
/// [`TimedConfig`]: crate::state::TimedConfig
#[derive(Debug, Clone, PartialEq)]
pub struct InkEntity {
    pub id: EntityId,
    /// Raw stroke polyline in canvas space. Smoothing is the renderer's
    /// concern.
    pub points: Vec<Point>,
    pub created_at: Instant,
    pub lifespan_ms: u64,
    /// Invariant: `fade_ms <= lifespan_ms`.
    pub fade_ms: u64,
    /// Opacity at creation time, from the active drawing style.
    pub base_opacity: f32,
    /// Current computed opacity; rewritten by the lifecycle tick.
    pub fade: f32,
}

impl InkEntity {
    /// Age of this entity at `now`, in milliseconds.
    pub fn age_ms(&self, now: Instant) -> u64 {
        now.saturating_duration_since(self.created_at).as_millis() as u64
    }
}

/// A visual entity on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasEntity {
    Card(CardEntity),
    Ink(InkEntity),
}

impl CanvasEntity {
    pub fn id(&self) -> &EntityId {
        match self {
            CanvasEntity::Card(c) => &c.id,
            CanvasEntity::Ink(i) => &i.id,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            CanvasEntity::Card(_) => EntityKind::Card,
            CanvasEntity::Ink(_) => EntityKind::Ink,
        }
    }

    pub fn as_card(&self) -> Option<&CardEntity> {
        match self {
            CanvasEntity::Card(c) => Some(c),
            CanvasEntity::Ink(_) => None,
        }
    }

    pub fn as_ink(&self) -> Option<&InkEntity> {
        match self {
            CanvasEntity::Ink(i) => Some(i),
            CanvasEntity::Card(_) => None,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
