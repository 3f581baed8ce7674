use crate::math::vec2::Vec2;
use crate::objects::rigid_body::BodyId;

/// Geometry of a single colliding pair for one substep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit collision normal, pointing towards body A.
    pub normal: Vec2,
    /// Penetration depth, >= 0.
    pub depth: f32,
    /// The first contact point, in world coordinates.
    pub point1: Vec2,
    /// Optional second contact point, present for face-face polygon contact.
    pub point2: Option<Vec2>,
}

/// A contact bound to two bodies in the scene's body list.
///
/// The order of the bodies carries no meaning beyond matching the normal
/// orientation. Indices are only valid within the substep that produced the
/// manifold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionManifold {
    /// Index of the first body in the scene body list.
    pub body_a: usize,
    /// Index of the second body in the scene body list.
    pub body_b: usize,
    pub contact: Contact,
}

/// Caller-visible record of a collision detected during `Scene::update`.
///
/// Collected into a list consumed after the update returns, instead of
/// invoking callbacks mid-solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    pub body_a: BodyId,
    pub body_b: BodyId,
    /// Collision normal pointing towards `body_a`.
    pub normal: Vec2,
}
