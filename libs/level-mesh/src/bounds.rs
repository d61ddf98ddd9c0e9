//! # Bounding Box
//!
//! Axis-aligned box used as the broad phase of level composition.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box.
///
/// An empty box has `min = +inf` and `max = -inf`, so encapsulating any
/// point yields a box around exactly that point and an empty box overlaps
/// nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Minimum corner
    pub min: DVec3,
    /// Maximum corner
    pub max: DVec3,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

impl BoundingBox {
    /// Creates a box from two corners.
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Creates a box that contains nothing.
    pub fn empty() -> Self {
        Self {
            min: DVec3::splat(f64::INFINITY),
            max: DVec3::splat(f64::NEG_INFINITY),
        }
    }

    /// Smallest box containing every point.
    pub fn from_points(points: &[DVec3]) -> Self {
        let mut bounds = Self::empty();
        for &p in points {
            bounds.encapsulate(p);
        }
        bounds
    }

    /// Returns true if the box contains no point.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Grows the box to include a point.
    pub fn encapsulate(&mut self, point: DVec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Grows the box to include another box.
    pub fn encapsulate_box(&mut self, other: &BoundingBox) {
        if other.is_empty() {
            return;
        }
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Moves every face of the box outward by `margin`.
    ///
    /// An empty box stays empty.
    pub fn expand(&mut self, margin: f64) {
        if self.is_empty() {
            return;
        }
        self.min -= DVec3::splat(margin);
        self.max += DVec3::splat(margin);
    }

    /// Returns an expanded copy.
    pub fn expanded(mut self, margin: f64) -> Self {
        self.expand(margin);
        self
    }

    /// Returns true if the boxes overlap on all three axes.
    ///
    /// Touching boxes count as overlapping.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Returns true if the point is inside or on the box.
    pub fn contains(&self, point: DVec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Center of the box.
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Extent along each axis (zero for an empty box).
    pub fn size(&self) -> DVec3 {
        if self.is_empty() {
            DVec3::ZERO
        } else {
            self.max - self.min
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit() -> BoundingBox {
        BoundingBox::new(DVec3::ZERO, DVec3::ONE)
    }

    #[test]
    fn test_empty_box() {
        let empty = BoundingBox::empty();
        assert!(empty.is_empty());
        assert!(!empty.intersects(&unit()));
        assert!(!unit().intersects(&empty));
        assert_eq!(empty.size(), DVec3::ZERO);
        assert!(empty.expanded(1.0).is_empty());
    }

    #[test]
    fn test_from_points() {
        let bounds = BoundingBox::from_points(&[
            DVec3::new(1.0, -2.0, 3.0),
            DVec3::new(-1.0, 2.0, 0.0),
        ]);
        assert_eq!(bounds.min, DVec3::new(-1.0, -2.0, 0.0));
        assert_eq!(bounds.max, DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(bounds.center(), DVec3::new(0.0, 0.0, 1.5));
    }

    #[test]
    fn test_encapsulate_box() {
        let mut bounds = unit();
        bounds.encapsulate_box(&BoundingBox::new(DVec3::splat(2.0), DVec3::splat(3.0)));
        bounds.encapsulate_box(&BoundingBox::empty());
        assert_eq!(bounds.min, DVec3::ZERO);
        assert_eq!(bounds.max, DVec3::splat(3.0));
    }

    #[test]
    fn test_touching_boxes_intersect() {
        let right = BoundingBox::new(DVec3::new(1.0, 0.0, 0.0), DVec3::new(2.0, 1.0, 1.0));
        assert!(unit().intersects(&right));
        assert!(right.intersects(&unit()));
    }

    #[test]
    fn test_separated_on_one_axis() {
        let above = BoundingBox::new(DVec3::new(0.0, 0.0, 1.5), DVec3::new(1.0, 1.0, 2.0));
        assert!(!unit().intersects(&above));
    }

    #[test]
    fn test_margin_closes_gap() {
        let gap = BoundingBox::new(DVec3::new(1.005, 0.0, 0.0), DVec3::new(2.0, 1.0, 1.0));
        assert!(!unit().intersects(&gap));
        assert!(unit().expanded(0.01).intersects(&gap.expanded(0.01)));
    }

    #[test]
    fn test_contains() {
        assert!(unit().contains(DVec3::splat(0.5)));
        assert!(unit().contains(DVec3::ONE));
        assert!(!unit().contains(DVec3::splat(1.5)));
    }
}
