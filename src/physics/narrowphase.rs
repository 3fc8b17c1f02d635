//! Narrowphase intersection tests: point, rect, ray, and swept AABB.
//!
//! Everything is built on [`ray_vs_rect`], the slab-method ray cast.
//! [`dynamic_rect_vs_rect`] reduces the swept-box problem to a ray cast by
//! expanding the target with the mover's half-size (Minkowski sum) and
//! casting the frame's motion from the mover's center.

use glam::Vec2;

use super::collider::{Aabb, Rect};
use super::contact::Contact;

/// Swept hits are accepted for `toi` in `(-TOI_TOLERANCE, 1]`; the small
/// negative tolerance absorbs floating-point error at t = 0 so that
/// already-touching starts still count as hits.
const TOI_TOLERANCE: f32 = 0.0001;

/// Point containment over the half-open interval `[pos, pos + size)`.
#[inline]
pub fn point_vs_rect(p: Vec2, r: &Rect) -> bool {
    r.contains_point(p)
}

/// Static AABB overlap with open intervals: edge-touching rectangles do not
/// collide. Symmetric in its arguments.
#[inline]
pub fn rect_vs_rect(a: &Rect, b: &Rect) -> bool {
    a.min_x() < b.max_x() && a.max_x() > b.min_x() && a.min_y() < b.max_y() && a.max_y() > b.min_y()
}

/// Cast a ray at `target` and report the earliest intersection.
///
/// `dir` is the full motion for the frame, not normalized; the returned
/// [`Contact::toi`] is the fraction of `dir` traveled at entry, in `[0, 1]`.
/// Degenerate directions (a zero component on an axis the ray starts level
/// with) produce NaN slab times and report no collision.
pub fn ray_vs_rect(origin: Vec2, dir: Vec2, target: &Rect) -> Option<Contact> {
    let mut t_near = (target.top_left() - origin) / dir;
    let mut t_far = (target.bottom_right() - origin) / dir;

    if t_near.is_nan() || t_far.is_nan() {
        return None;
    }

    // Sort the slab times per axis so negative directions work.
    if t_near.x > t_far.x {
        std::mem::swap(&mut t_near.x, &mut t_far.x);
    }
    if t_near.y > t_far.y {
        std::mem::swap(&mut t_near.y, &mut t_far.y);
    }

    if t_near.x > t_far.y || t_near.y > t_far.x {
        return None;
    }

    let t_hit_near = t_near.x.max(t_near.y);
    let t_hit_far = t_far.x.min(t_far.y);

    if t_hit_near > 1.0 || t_hit_far < 0.0 {
        return None;
    }

    // Both components of dir zero, or origin inside with a zero component:
    // the slab times collapse to +/-infinity.
    if !t_hit_near.is_finite() {
        return None;
    }

    // The later near-time decides which face was struck; the normal opposes
    // the ray on that axis. Exact ties (corner hits) leave the normal zero.
    let normal = if t_near.x > t_near.y {
        if dir.x < 0.0 {
            Vec2::new(1.0, 0.0)
        } else {
            Vec2::new(-1.0, 0.0)
        }
    } else if t_near.x < t_near.y {
        if dir.y < 0.0 {
            Vec2::new(0.0, 1.0)
        } else {
            Vec2::new(0.0, -1.0)
        }
    } else {
        Vec2::ZERO
    };

    Some(Contact {
        point: origin + t_hit_near * dir,
        normal,
        exit: origin + t_hit_far * dir,
        toi: t_hit_near,
    })
}

/// Swept test of a moving box against a static one over the time step `dt`.
///
/// Returns `None` immediately when `input` has exactly zero velocity. The
/// target is expanded by half of `input`'s size in every direction and the
/// motion `input.vel * dt` is cast from `input`'s center, so the box-vs-box
/// sweep reduces to [`ray_vs_rect`]. Hits are accepted for `toi` in
/// `(-0.0001, 1]`.
pub fn dynamic_rect_vs_rect(input: &Aabb, target: &Aabb, dt: f32) -> Option<Contact> {
    if input.vel == Vec2::ZERO {
        return None;
    }

    let expanded = Rect::new(
        target.rect.pos - input.rect.size * 0.5,
        target.rect.size + input.rect.size,
    );

    let origin = input.rect.center();
    let delta = input.vel * dt;

    let contact = ray_vs_rect(origin, delta, &expanded)?;
    if contact.toi > -TOI_TOLERANCE && contact.toi <= 1.0 {
        Some(contact)
    } else {
        None
    }
}
