pub mod config;
pub mod error;
pub mod pipeline;
pub mod rig;
pub mod scene;

pub use config::NormalizeConfig;
pub use error::{ArmatureError, Result};
pub use pipeline::{Pipeline, RunReport, Stage};
pub use scene::{Bone, Mode, ObjectKind, Scene, SceneObject, Skeleton};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
