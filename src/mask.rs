// filepath: src/mask.rs
//! Mask paths for the dimmed backdrop
//!
//! The backdrop is a path made of closed subpaths: the full overlay bounds
//! and the highlight cutout. Filled with the even-odd rule, a point inside
//! both is outside the fill, which leaves a hole where the target is.

use crate::geometry::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Stroke width of the inner highlight outline; the rectangle cutout is
/// inflated by this much around the target.
pub const OUTLINE_WIDTH: f32 = 3.0;
/// Gap between the target rect and the outer halo ring
pub const HALO_PADDING: f32 = 15.0;
pub const HALO_WIDTH: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightShape {
    #[default]
    Rectangle,
    Circle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillRule {
    #[default]
    EvenOdd,
    NonZero,
}

/// A closed subpath
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Subpath {
    RoundedRect { rect: Rect, corner_radius: f32 },
    Circle { center: Point, radius: f32 },
}

impl Subpath {
    pub fn rect(rect: Rect) -> Self {
        Subpath::RoundedRect {
            rect,
            corner_radius: 0.0,
        }
    }

    /// Signed distance from `p` to the outline; negative inside.
    pub fn signed_distance(&self, p: Point) -> f32 {
        match *self {
            Subpath::Circle { center, radius } => {
                let (dx, dy) = (p.x - center.x, p.y - center.y);
                (dx * dx + dy * dy).sqrt() - radius
            }
            Subpath::RoundedRect {
                rect,
                corner_radius,
            } => {
                let half_w = rect.width / 2.0;
                let half_h = rect.height / 2.0;
                let r = corner_radius.clamp(0.0, half_w.min(half_h));
                let c = rect.center();
                let qx = (p.x - c.x).abs() - half_w + r;
                let qy = (p.y - c.y).abs() - half_h + r;
                let outside = (qx.max(0.0).powi(2) + qy.max(0.0).powi(2)).sqrt();
                outside + qx.max(qy).min(0.0) - r
            }
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        self.signed_distance(p) <= 0.0
    }

    /// Smallest rect enclosing the subpath
    pub fn bounds(&self) -> Rect {
        match *self {
            Subpath::RoundedRect { rect, .. } => rect,
            Subpath::Circle { center, radius } => Rect::new(
                center.x - radius,
                center.y - radius,
                radius * 2.0,
                radius * 2.0,
            ),
        }
    }
}

/// Filled path made of several subpaths
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MaskPath {
    subpaths: Vec<Subpath>,
    rule: FillRule,
}

impl MaskPath {
    pub fn new(rule: FillRule) -> Self {
        Self {
            subpaths: Vec::new(),
            rule,
        }
    }

    /// Full-bounds backdrop with an optional hole, filled even-odd.
    pub fn backdrop(bounds: Rect, cutout: Option<Subpath>) -> Self {
        let mut path = Self::new(FillRule::EvenOdd);
        path.push(Subpath::rect(bounds));
        if let Some(cutout) = cutout {
            path.push(cutout);
        }
        path
    }

    pub fn push(&mut self, subpath: Subpath) -> &mut Self {
        self.subpaths.push(subpath);
        self
    }

    pub fn subpaths(&self) -> &[Subpath] {
        &self.subpaths
    }

    /// Whether the fill covers `p`. Every subpath winds the same way, so
    /// the winding number is just the count of subpaths containing `p`.
    pub fn contains(&self, p: Point) -> bool {
        let winding = self.subpaths.iter().filter(|s| s.contains(p)).count();
        match self.rule {
            FillRule::EvenOdd => winding % 2 == 1,
            FillRule::NonZero => winding > 0,
        }
    }
}

/// A stroked outline, centered on the subpath's edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub path: Subpath,
    pub width: f32,
    /// Fraction of the highlight color's alpha used for this stroke
    pub opacity: f32,
}

impl Stroke {
    /// Coverage in `[0, 1]` at `p`, with a one pixel anti-aliasing ramp.
    pub fn coverage(&self, p: Point) -> f32 {
        let d = self.path.signed_distance(p).abs() - self.width / 2.0;
        (0.5 - d).clamp(0.0, 1.0)
    }
}

/// Hole to cut for `target`, or `None` when there is nothing to highlight.
pub fn cutout(shape: HighlightShape, target: Rect, radius: f32, corner_radius: f32) -> Option<Subpath> {
    if target.is_empty() {
        return None;
    }
    Some(match shape {
        HighlightShape::Rectangle => Subpath::RoundedRect {
            rect: target.inflate(OUTLINE_WIDTH),
            corner_radius,
        },
        HighlightShape::Circle => Subpath::Circle {
            center: target.center(),
            radius,
        },
    })
}

/// Highlight strokes for `target`: the outer halo first, then the inner outline.
pub fn outline(shape: HighlightShape, target: Rect, radius: f32, corner_radius: f32) -> Vec<Stroke> {
    let Some(inner) = cutout(shape, target, radius, corner_radius) else {
        return Vec::new();
    };
    let halo = match shape {
        HighlightShape::Rectangle => Subpath::RoundedRect {
            rect: target.inflate(HALO_PADDING),
            corner_radius: if corner_radius > 0.0 {
                corner_radius + HALO_PADDING - OUTLINE_WIDTH
            } else {
                0.0
            },
        },
        HighlightShape::Circle => Subpath::Circle {
            center: target.center(),
            radius: radius * 2.0,
        },
    };
    vec![
        Stroke {
            path: halo,
            width: HALO_WIDTH,
            opacity: 0.4,
        },
        Stroke {
            path: inner,
            width: OUTLINE_WIDTH,
            opacity: 1.0,
        },
    ]
}
