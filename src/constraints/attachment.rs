use crate::collision::manifold::Contact;
use crate::collision::solver;
use crate::math::vec2::Vec2;
use crate::objects::rigid_body::{BodyId, RigidBody};
use super::mount_point;

/// Pins a mount point on one body to a mount point on another.
///
/// Applied as a synthetic contact between the mount points, reusing the
/// collision solver's positional correction and impulse phases. By default
/// the attached pair is excluded from narrow-phase testing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyAttachment {
    pub body_a: BodyId,
    pub mount_a: Vec2,
    pub body_b: BodyId,
    pub mount_b: Vec2,
    /// Skip collision checks between the attached bodies.
    pub disable_collision: bool,
}

impl BodyAttachment {
    pub fn new(body_a: BodyId, mount_a: Vec2, body_b: BodyId, mount_b: Vec2) -> Self {
        Self {
            body_a,
            mount_a,
            body_b,
            mount_b,
            disable_collision: true,
        }
    }

    pub(crate) fn apply(&self, a: &mut RigidBody, b: &mut RigidBody) {
        let mount_a = mount_point(a, self.mount_a);
        let mount_b = mount_point(b, self.mount_b);

        let delta = mount_b - mount_a;
        if delta == Vec2::ZERO {
            return;
        }

        let depth = delta.length();
        let contact = Contact {
            normal: delta / depth,
            depth,
            point1: (mount_a + mount_b) / 2.0,
            point2: None,
        };
        solver::separate(a, b, &contact);
        solver::resolve(a, b, &contact);
    }
}

/// Pins a mount point on a body to a fixed world position.
///
/// Solved against a zero-radius static anchor body constructed on the spot,
/// so the regular contact solver handles the correction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldAttachment {
    pub body: BodyId,
    pub body_mount: Vec2,
    /// Fixed world-space anchor position.
    pub position: Vec2,
}

impl WorldAttachment {
    pub fn new(body: BodyId, body_mount: Vec2, position: Vec2) -> Self {
        Self {
            body,
            body_mount,
            position,
        }
    }

    /// Anchors the mount point at its current world position.
    pub fn here(body: &RigidBody, body_mount: Vec2) -> Self {
        Self::new(body.id(), body_mount, mount_point(body, body_mount))
    }

    pub(crate) fn apply(&self, body: &mut RigidBody) {
        let mount = mount_point(body, self.body_mount);
        let delta = self.position - mount;
        if delta == Vec2::ZERO {
            return;
        }

        let depth = delta.length();
        let contact = Contact {
            normal: delta / depth,
            depth,
            point1: mount,
            point2: None,
        };

        let mut anchor = RigidBody::circle_static(self.position, 0.0);
        solver::separate(body, &mut anchor, &contact);
        solver::resolve(body, &mut anchor, &contact);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn test_body_attachment_closes_gap() {
        let mut a = RigidBody::circle(Vec2::new(0.0, 0.0), 1.0, 1.0);
        let mut b = RigidBody::circle(Vec2::new(4.0, 0.0), 1.0, 1.0);
        let att = BodyAttachment::new(a.id(), Vec2::ZERO, b.id(), Vec2::ZERO);

        att.apply(&mut a, &mut b);

        // Each dynamic body moves half the gap
        assert!((a.position.x - 2.0).abs() < EPSILON);
        assert!((b.position.x - 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_body_attachment_against_static_body() {
        let mut a = RigidBody::circle(Vec2::new(0.0, 0.0), 1.0, 1.0);
        let mut b = RigidBody::circle_static(Vec2::new(4.0, 0.0), 1.0);
        let att = BodyAttachment::new(a.id(), Vec2::ZERO, b.id(), Vec2::ZERO);

        att.apply(&mut a, &mut b);

        // The dynamic body absorbs the whole correction
        assert!((a.position.x - 4.0).abs() < EPSILON);
        assert_eq!(b.position, Vec2::new(4.0, 0.0));
    }

    #[test]
    fn test_body_attachment_coincident_mounts_noop() {
        let mut a = RigidBody::circle(Vec2::new(1.0, 2.0), 1.0, 1.0);
        let mut b = RigidBody::circle(Vec2::new(1.0, 2.0), 1.0, 1.0);
        let att = BodyAttachment::new(a.id(), Vec2::ZERO, b.id(), Vec2::ZERO);

        att.apply(&mut a, &mut b);

        assert_eq!(a.position, Vec2::new(1.0, 2.0));
        assert_eq!(b.position, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn test_body_attachment_disables_collision_by_default() {
        let att = BodyAttachment::new(BodyId::new(1), Vec2::ZERO, BodyId::new(2), Vec2::ZERO);
        assert!(att.disable_collision);
    }

    #[test]
    fn test_world_attachment_pulls_body_to_anchor() {
        let mut body = RigidBody::circle(Vec2::new(3.0, 0.0), 1.0, 1.0);
        let att = WorldAttachment::new(body.id(), Vec2::ZERO, Vec2::new(0.0, 0.0));

        att.apply(&mut body);

        // The anchor is immovable so the body takes the full correction
        assert!(body.position.length() < EPSILON);
    }

    #[test]
    fn test_world_attachment_here_holds_position() {
        let mut body = RigidBody::circle(Vec2::new(3.0, 5.0), 1.0, 1.0);
        let att = WorldAttachment::here(&body, Vec2::ZERO);
        assert_eq!(att.position, Vec2::new(3.0, 5.0));

        att.apply(&mut body);
        assert_eq!(body.position, Vec2::new(3.0, 5.0));
    }

    #[test]
    fn test_world_attachment_offset_mount() {
        // Anchor the right edge of a box at (2, 0)
        let mut body = RigidBody::cuboid(Vec2::ZERO, Vec2::new(2.0, 2.0), 1.0);
        let att = WorldAttachment::new(body.id(), Vec2::new(1.0, 0.0), Vec2::new(2.0, 0.0));

        att.apply(&mut body);

        assert!((body.position.x - 1.0).abs() < EPSILON);
    }
}
