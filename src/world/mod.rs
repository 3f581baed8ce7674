pub mod scene;

pub use scene::{Scene, SceneError, SleepSettings};
