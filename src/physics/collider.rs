//! Rectangles, AABBs, and collider response kinds.

use glam::Vec2;

/// An axis-aligned rectangle with its origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    /// Create a rectangle. Negative size components are clamped to zero;
    /// a degenerate rectangle never overlaps anything.
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size: size.max(Vec2::ZERO),
        }
    }

    /// Shorthand for [`Rect::new`] with scalar coordinates.
    pub fn from_xywh(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self::new(Vec2::new(x, y), Vec2::new(w, h))
    }

    pub fn top_left(&self) -> Vec2 {
        self.pos
    }

    pub fn bottom_right(&self) -> Vec2 {
        self.pos + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    #[inline]
    pub fn min_x(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn max_x(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn min_y(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn max_y(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Point containment over the half-open interval `[pos, pos + size)`.
    #[inline]
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.min_x() && p.y >= self.min_y() && p.x < self.max_x() && p.y < self.max_y()
    }

    /// Whether `other` lies entirely within this rectangle (edges inclusive).
    #[inline]
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.min_x() >= self.min_x()
            && other.min_y() >= self.min_y()
            && other.max_x() <= self.max_x()
            && other.max_y() <= self.max_y()
    }
}

/// Collision response policy of an [`Aabb`], applied by the collision
/// pipeline when a moving entity strikes this box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColliderKind {
    /// Blocks movement.
    #[default]
    Solid,
    /// Reflects the velocity component along the contact axis.
    Bounce,
    /// No velocity response; emits a contact event for gameplay code.
    Custom,
    /// Blocks movement and emits a contact event.
    CustomSolid,
    /// One-way platform: blocks only when struck from above.
    SolidFromTop,
    /// One-way platform that also emits a contact event.
    CustomSolidFromTop,
}

impl ColliderKind {
    /// Whether this kind produces a velocity correction for a hit with the
    /// given contact normal.
    pub(crate) fn resolves(self, normal: Vec2) -> bool {
        match self {
            ColliderKind::Solid | ColliderKind::CustomSolid | ColliderKind::Bounce => true,
            ColliderKind::SolidFromTop | ColliderKind::CustomSolidFromTop => normal.y < 0.0,
            ColliderKind::Custom => false,
        }
    }

    /// Whether gameplay code should be notified of hits against this kind.
    pub(crate) fn emits_event(self) -> bool {
        matches!(
            self,
            ColliderKind::Custom | ColliderKind::CustomSolid | ColliderKind::CustomSolidFromTop
        )
    }
}

/// An axis-aligned bounding box with the per-frame velocity used by the
/// swept test.
///
/// The velocity is an input to the swept test
/// ([`dynamic_rect_vs_rect`](crate::physics::narrowphase::dynamic_rect_vs_rect))
/// only; the box never integrates it. Broad-phase structures carry the owning
/// entity key next to the box, so the `Aabb` itself holds no back-reference.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Aabb {
    pub rect: Rect,
    pub vel: Vec2,
    pub kind: ColliderKind,
}

impl Aabb {
    /// A stationary box of the given kind.
    pub fn new(rect: Rect, kind: ColliderKind) -> Self {
        Self {
            rect,
            vel: Vec2::ZERO,
            kind,
        }
    }

    #[inline]
    pub fn min_x(&self) -> f32 {
        self.rect.min_x()
    }

    #[inline]
    pub fn max_x(&self) -> f32 {
        self.rect.max_x()
    }

    #[inline]
    pub fn min_y(&self) -> f32 {
        self.rect.min_y()
    }

    #[inline]
    pub fn max_y(&self) -> f32 {
        self.rect.max_y()
    }
}
