use crate::math::vec2::Vec2;

/// A convex polygon defined by its vertices relative to the owning body's
/// position. The vertices are stored already rotated: changing the body's
/// angle rotates them in place, so collision code never re-applies the
/// rotation per query.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub vertices: Vec<Vec2>,
}

impl Polygon {
    /// Creates a new polygon from a vector of vertices.
    ///
    /// Panics if fewer than 3 vertices are provided.
    pub fn new(vertices: Vec<Vec2>) -> Self {
        assert!(vertices.len() >= 3, "Polygon must have at least 3 vertices");
        Polygon { vertices }
    }

    /// Vertex set of an axis-aligned box of the given full size, centered
    /// on the body position.
    pub fn box_vertices(size: Vec2) -> Vec<Vec2> {
        vec![
            -size / 2.0,
            Vec2::new(size.x, -size.y) / 2.0,
            size / 2.0,
            Vec2::new(-size.x, size.y) / 2.0,
        ]
    }

    /// Vertex set of a regular polygon with `point_count` vertices, scaled
    /// component-wise by `size`.
    pub fn regular_vertices(size: Vec2, point_count: u32) -> Vec<Vec2> {
        (0..point_count)
            .map(|i| {
                let angle = i as f32 / point_count as f32 * std::f32::consts::PI * 2.0;
                Vec2::from_angle(angle) * size
            })
            .collect()
    }

    /// Rotates every vertex in place by `delta_angle` radians.
    pub fn rotate_by(&mut self, delta_angle: f32) {
        for v in &mut self.vertices {
            *v = v.rotate(delta_angle);
        }
    }

    /// World-space vertices for a body at `position`.
    pub fn absolute_vertices<'a>(
        &'a self,
        position: Vec2,
    ) -> impl Iterator<Item = Vec2> + Clone + 'a {
        self.vertices.iter().map(move |&v| v + position)
    }

    /// Consecutive vertex pairs (edges) relative to the body position.
    pub fn vertex_pairs(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Consecutive world-space vertex pairs (edges) for a body at `position`.
    pub fn absolute_vertex_pairs(
        &self,
        position: Vec2,
    ) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.vertex_pairs()
            .map(move |(a, b)| (a + position, b + position))
    }

    /// Axis-aligned extents (min corner, max corner) of the world-space
    /// vertex set for a body at `position`.
    pub fn extents(&self, position: Vec2) -> (Vec2, Vec2) {
        let mut min = Vec2::new(f32::MAX, f32::MAX);
        let mut max = Vec2::new(f32::MIN, f32::MIN);
        for v in self.absolute_vertices(position) {
            min.x = min.x.min(v.x);
            min.y = min.y.min(v.y);
            max.x = max.x.max(v.x);
            max.y = max.y.max(v.y);
        }
        (min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_polygon_new() {
        let polygon = Polygon::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
        ]);
        assert_eq!(polygon.vertices.len(), 3);
    }

    #[test]
    #[should_panic]
    fn test_polygon_new_too_few_vertices() {
        Polygon::new(vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)]);
    }

    #[test]
    fn test_box_vertices() {
        let verts = Polygon::box_vertices(Vec2::new(2.0, 4.0));
        assert_eq!(verts.len(), 4);
        assert_eq!(verts[0], Vec2::new(-1.0, -2.0));
        assert_eq!(verts[1], Vec2::new(1.0, -2.0));
        assert_eq!(verts[2], Vec2::new(1.0, 2.0));
        assert_eq!(verts[3], Vec2::new(-1.0, 2.0));
    }

    #[test]
    fn test_regular_vertices() {
        let verts = Polygon::regular_vertices(Vec2::new(2.0, 2.0), 4);
        assert_eq!(verts.len(), 4);
        // First vertex at angle 0
        assert!((verts[0].x - 2.0).abs() < EPSILON);
        assert!(verts[0].y.abs() < EPSILON);
        // Second at 90 degrees
        assert!(verts[1].x.abs() < EPSILON);
        assert!((verts[1].y - 2.0).abs() < EPSILON);
        // All on the radius
        for v in verts {
            assert!((v.length() - 2.0).abs() < EPSILON);
        }
    }

    #[test]
    fn test_rotate_by() {
        let mut polygon = Polygon::new(Polygon::box_vertices(Vec2::new(2.0, 2.0)));
        polygon.rotate_by(PI / 2.0);
        // (-1,-1) rotated 90 degrees CCW becomes (1,-1)
        assert!((polygon.vertices[0].x - 1.0).abs() < EPSILON);
        assert!((polygon.vertices[0].y - -1.0).abs() < EPSILON);
    }

    #[test]
    fn test_absolute_vertices() {
        let polygon = Polygon::new(Polygon::box_vertices(Vec2::new(2.0, 2.0)));
        let abs: Vec<Vec2> = polygon.absolute_vertices(Vec2::new(10.0, 5.0)).collect();
        assert_eq!(abs[0], Vec2::new(9.0, 4.0));
        assert_eq!(abs[2], Vec2::new(11.0, 6.0));
    }

    #[test]
    fn test_vertex_pairs_wrap() {
        let polygon = Polygon::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
        ]);
        let pairs: Vec<_> = polygon.vertex_pairs().collect();
        assert_eq!(pairs.len(), 3);
        // Last pair closes the loop back to the first vertex
        assert_eq!(pairs[2], (Vec2::new(0.0, 1.0), Vec2::new(0.0, 0.0)));
    }

    #[test]
    fn test_extents() {
        let polygon = Polygon::new(Polygon::box_vertices(Vec2::new(4.0, 2.0)));
        let (min, max) = polygon.extents(Vec2::new(1.0, 1.0));
        assert_eq!(min, Vec2::new(-1.0, 0.0));
        assert_eq!(max, Vec2::new(3.0, 2.0));
    }
}
