//! Rounded-rectangle outline parametrized by arc length.
//!
//! Circles are placed and moved "along" the track by perimeter distance.
//! The walk starts at the left end of the top straight edge and proceeds
//! clockwise (screen coordinates, y down) through eight segments:
//! top edge, top-right arc, right edge, bottom-right arc, bottom edge,
//! bottom-left arc, left edge, top-left arc. Downstream alignment of the
//! circle train depends on this start point and order.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle with uniformly rounded corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundedRect {
    /// Top-left corner.
    pub origin: Vec2,
    /// Width and height.
    pub size: Vec2,
    /// Requested corner radius; clamped to half the shorter side on use.
    pub corner_radius: f32,
}

/// One piece of the outline walk.
#[derive(Debug, Clone, Copy)]
enum Segment {
    /// Straight edge from `from` to `to`.
    Line { from: Vec2, to: Vec2 },
    /// Quarter circle around `center` starting at `start_angle`.
    Arc { center: Vec2, start_angle: f32 },
}

impl RoundedRect {
    /// Rectangle at `origin` with the given size and corner radius.
    #[must_use]
    pub fn new(origin: Vec2, size: Vec2, corner_radius: f32) -> Self {
        Self {
            origin,
            size,
            corner_radius,
        }
    }

    /// Geometric center.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.origin + self.size * 0.5
    }

    /// Corner radius actually used: within `[0, min(w, h) / 2]`.
    #[must_use]
    pub fn effective_radius(&self) -> f32 {
        let w = self.size.x.max(0.0);
        let h = self.size.y.max(0.0);
        self.corner_radius.clamp(0.0, 0.5 * w.min(h))
    }

    /// Outline length: `2(w − 2r) + 2(h − 2r) + 2πr`.
    #[must_use]
    pub fn perimeter(&self) -> f32 {
        let w = self.size.x.max(0.0);
        let h = self.size.y.max(0.0);
        let r = self.effective_radius();
        2.0 * (w - 2.0 * r) + 2.0 * (h - 2.0 * r) + TAU * r
    }

    /// Point on the outline `distance` along the clockwise walk.
    ///
    /// Distances wrap modulo the perimeter, so `point_at(0.0)` and
    /// `point_at(perimeter)` coincide. A degenerate (zero-perimeter)
    /// rectangle maps every distance to its origin.
    #[must_use]
    pub fn point_at(&self, distance: f32) -> Vec2 {
        let perimeter = self.perimeter();
        if perimeter <= f32::EPSILON || !distance.is_finite() {
            return self.origin;
        }

        let r = self.effective_radius();
        let arc_span = FRAC_PI_2 * r;
        let mut remaining = distance.rem_euclid(perimeter);

        for (segment, span) in self.segments(r, arc_span) {
            if remaining <= span {
                return segment.point(remaining, span, r);
            }
            remaining -= span;
        }

        // Float slop past the final span lands back on the start.
        self.origin + Vec2::new(r, 0.0)
    }

    /// The eight outline segments in walk order, each with its length.
    fn segments(&self, r: f32, arc_span: f32) -> [(Segment, f32); 8] {
        let o = self.origin;
        let w = self.size.x.max(0.0);
        let h = self.size.y.max(0.0);
        let horizontal = w - 2.0 * r;
        let vertical = h - 2.0 * r;

        [
            (
                Segment::Line {
                    from: o + Vec2::new(r, 0.0),
                    to: o + Vec2::new(w - r, 0.0),
                },
                horizontal,
            ),
            (
                Segment::Arc {
                    center: o + Vec2::new(w - r, r),
                    start_angle: -FRAC_PI_2,
                },
                arc_span,
            ),
            (
                Segment::Line {
                    from: o + Vec2::new(w, r),
                    to: o + Vec2::new(w, h - r),
                },
                vertical,
            ),
            (
                Segment::Arc {
                    center: o + Vec2::new(w - r, h - r),
                    start_angle: 0.0,
                },
                arc_span,
            ),
            (
                Segment::Line {
                    from: o + Vec2::new(w - r, h),
                    to: o + Vec2::new(r, h),
                },
                horizontal,
            ),
            (
                Segment::Arc {
                    center: o + Vec2::new(r, h - r),
                    start_angle: FRAC_PI_2,
                },
                arc_span,
            ),
            (
                Segment::Line {
                    from: o + Vec2::new(0.0, h - r),
                    to: o + Vec2::new(0.0, r),
                },
                vertical,
            ),
            (
                Segment::Arc {
                    center: o + Vec2::new(r, r),
                    start_angle: PI,
                },
                arc_span,
            ),
        ]
    }
}

impl Segment {
    /// Point `along` units into a segment of length `span`.
    fn point(self, along: f32, span: f32, r: f32) -> Vec2 {
        let t = if span > f32::EPSILON { along / span } else { 0.0 };
        match self {
            Self::Line { from, to } => from.lerp(to, t),
            Self::Arc {
                center,
                start_angle,
            } => {
                let angle = start_angle + t * FRAC_PI_2;
                center + Vec2::new(angle.cos(), angle.sin()) * r
            }
        }
    }
}
