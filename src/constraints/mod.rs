pub mod attachment;
pub mod spring;

pub use attachment::{BodyAttachment, WorldAttachment};
pub use spring::Spring;

use crate::math::vec2::Vec2;
use crate::objects::rigid_body::{BodyId, RigidBody};

/// A persistent link between bodies, applied once per substep before
/// collision handling.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    Spring(Spring),
    BodyAttachment(BodyAttachment),
    WorldAttachment(WorldAttachment),
}

impl Constraint {
    /// Whether the constraint references the given body. Used to cascade
    /// constraint removal when a body leaves the scene.
    pub fn contains(&self, id: BodyId) -> bool {
        match self {
            Constraint::Spring(spring) => spring.body_a == id || spring.body_b == id,
            Constraint::BodyAttachment(att) => att.body_a == id || att.body_b == id,
            Constraint::WorldAttachment(att) => att.body == id,
        }
    }

    /// Whether narrow-phase testing between the two bodies should be
    /// skipped because this constraint pins them together.
    pub(crate) fn suppresses_collision(&self, a: BodyId, b: BodyId) -> bool {
        match self {
            Constraint::BodyAttachment(att) if att.disable_collision => {
                (att.body_a == a && att.body_b == b) || (att.body_a == b && att.body_b == a)
            }
            _ => false,
        }
    }
}

impl From<Spring> for Constraint {
    fn from(spring: Spring) -> Self {
        Constraint::Spring(spring)
    }
}

impl From<BodyAttachment> for Constraint {
    fn from(att: BodyAttachment) -> Self {
        Constraint::BodyAttachment(att)
    }
}

impl From<WorldAttachment> for Constraint {
    fn from(att: WorldAttachment) -> Self {
        Constraint::WorldAttachment(att)
    }
}

/// World-space position of a mount point given relative to a body's center,
/// unrotated. The body's current angle is applied here.
pub(crate) fn mount_point(body: &RigidBody, mount: Vec2) -> Vec2 {
    body.position + mount.rotate(body.angle())
}
