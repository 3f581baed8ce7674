pub mod math;
pub mod shapes;
pub mod objects;
pub mod collision;
pub mod constraints;
pub mod world;

// Re-export key types for easier use
pub use math::vec2::Vec2;
pub use shapes::{Circle, InverseCircle, Polygon, Shape};
pub use objects::rigid_body::{BodyId, RigidBody};
pub use collision::{BoundingBox, CollisionEvent, CollisionManifold, Contact};
pub use constraints::{BodyAttachment, Constraint, Spring, WorldAttachment};
pub use world::{Scene, SceneError, SleepSettings};
