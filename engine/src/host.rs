use thiserror::Error;

use crate::Store;

/// Element the application tree is mounted into.
pub const ROOT_MOUNT_ID: &str = "root";

#[derive(Debug, Error)]
pub enum MountError {
    #[error("mount target '{0}' not found")]
    TargetNotFound(String),
    #[error("failed to render into mount target: {0}")]
    Render(String),
}

/// Something that can render the application bound to a store.
pub trait Host {
    /// Render the application into `target`. Replaces anything mounted there.
    fn mount(&mut self, target: &str, store: &Store) -> Result<(), MountError>;
}
