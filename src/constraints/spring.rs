use crate::math::vec2::Vec2;
use crate::objects::rigid_body::{BodyId, RigidBody};
use super::mount_point;

/// A damped spring between mount points on two bodies.
///
/// Mount points are given relative to each body's center without rotation;
/// the body's current angle is applied when the spring is evaluated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    pub body_a: BodyId,
    pub mount_a: Vec2,
    pub body_b: BodyId,
    pub mount_b: Vec2,
    /// Spring strength coefficient.
    pub hardness: f32,
    /// Oscillation reduction coefficient.
    pub damping: f32,
    /// Rest length.
    pub length: f32,
}

impl Spring {
    pub fn new(
        body_a: BodyId,
        mount_a: Vec2,
        body_b: BodyId,
        mount_b: Vec2,
        hardness: f32,
        damping: f32,
        length: f32,
    ) -> Self {
        Self {
            body_a,
            mount_a,
            body_b,
            mount_b,
            hardness,
            damping,
            length,
        }
    }

    /// Creates a spring whose rest length is the current distance between
    /// the mount points.
    pub fn at_rest(
        body_a: &RigidBody,
        mount_a: Vec2,
        body_b: &RigidBody,
        mount_b: Vec2,
        hardness: f32,
        damping: f32,
    ) -> Self {
        let length = (mount_point(body_b, mount_b) - mount_point(body_a, mount_a)).length();
        Self::new(body_a.id(), mount_a, body_b.id(), mount_b, hardness, damping, length)
    }

    /// Applies one substep of spring force as impulses at the mount points.
    /// The impulse scales with stretch past the rest length plus a damping
    /// term from the closing velocity.
    pub(crate) fn apply(&self, a: &mut RigidBody, b: &mut RigidBody, dt: f32) {
        let p1 = mount_point(a, self.mount_a);
        let p2 = mount_point(b, self.mount_b);
        let delta = p2 - p1;
        if delta == Vec2::ZERO {
            return;
        }

        let length = delta.length();
        let normal = delta / length;

        let closing = normal.dot(b.velocity_at(p2) - a.velocity_at(p1));

        let spring_mag = self.hardness * (length - self.length);
        let damping_mag = closing * self.damping;
        let impulse = normal * (spring_mag + damping_mag) * dt;

        a.apply_impulse(p1, impulse);
        b.apply_impulse(p2, -impulse);
    }
}
