/// A circular cavity of the given radius. Other bodies press against its
/// inner wall rather than its outside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InverseCircle {
    pub radius: f32,
}

impl InverseCircle {
    pub fn new(radius: f32) -> Self {
        assert!(radius >= 0.0, "Cavity radius cannot be negative");
        Self { radius }
    }
}
