use thiserror::Error;

/// Errors raised by the armature operations.
///
/// The selection variants all abort before any bone is touched.
#[derive(Debug, Error)]
pub enum ArmatureError {
    #[error("Please select an armature (no active object)")]
    NoActiveObject,
    #[error("Please select an armature (active object '{0}' is not in the scene)")]
    ActiveObjectMissing(String),
    #[error("Please select an armature ('{name}' is a {kind})")]
    NotAnArmature { name: String, kind: &'static str },
    #[error("symmetrize failed: {0}")]
    Mirror(String),
}

impl ArmatureError {
    pub fn is_selection(&self) -> bool {
        !matches!(self, ArmatureError::Mirror(_))
    }
}

pub type Result<T, E = ArmatureError> = std::result::Result<T, E>;
