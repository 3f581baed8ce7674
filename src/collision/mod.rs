pub mod bounding_box;
pub mod detection;
pub mod manifold;
pub mod solver;

// Re-export key types
pub use bounding_box::BoundingBox;
pub use detection::collide;
pub use manifold::{CollisionEvent, CollisionManifold, Contact};
