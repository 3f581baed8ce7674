use crate::math::vec2::Vec2;

/// An axis-aligned bounding box stored as center and full size.
///
/// The scene tests box overlap before running any narrow-phase geometry,
/// which rejects the vast majority of body pairs cheaply.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    pub center: Vec2,
    pub size: Vec2,
}

impl BoundingBox {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self { center, size }
    }

    /// Checks if this box overlaps another, comparing center deltas against
    /// the combined half-sizes on each axis.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        let delta = other.center - self.center;
        let half_sizes = (self.size + other.size) / 2.0;
        delta.x.abs() < half_sizes.x && delta.y.abs() < half_sizes.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersects_overlapping() {
        let a = BoundingBox::new(Vec2::ZERO, Vec2::new(2.0, 2.0));
        let b = BoundingBox::new(Vec2::new(1.5, 0.0), Vec2::new(2.0, 2.0));
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn test_intersects_separated() {
        let a = BoundingBox::new(Vec2::ZERO, Vec2::new(2.0, 2.0));
        let b = BoundingBox::new(Vec2::new(3.0, 0.0), Vec2::new(2.0, 2.0));
        assert!(!a.intersects(&b));
    }

    #[test]
    fn test_intersects_touching_is_not_overlap() {
        let a = BoundingBox::new(Vec2::ZERO, Vec2::new(2.0, 2.0));
        let b = BoundingBox::new(Vec2::new(2.0, 0.0), Vec2::new(2.0, 2.0));
        assert!(!a.intersects(&b));
    }

    #[test]
    fn test_intersects_one_axis_only() {
        let a = BoundingBox::new(Vec2::ZERO, Vec2::new(2.0, 2.0));
        let b = BoundingBox::new(Vec2::new(1.0, 5.0), Vec2::new(2.0, 2.0));
        assert!(!a.intersects(&b));
    }
}
