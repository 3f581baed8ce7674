pub mod circle;
pub mod inverse_circle;
pub mod polygon;

// Re-export the specific shape types
pub use circle::Circle;
pub use inverse_circle::InverseCircle;
pub use polygon::Polygon;

/// Enum representing the geometric shape of a rigid body.
///
/// Closed set of variants: every collision pair the engine supports is an
/// exhaustive match over two of these tags.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle(Circle),
    /// A circular cavity: bodies collide with its inner wall.
    InverseCircle(InverseCircle),
    Polygon(Polygon),
}
