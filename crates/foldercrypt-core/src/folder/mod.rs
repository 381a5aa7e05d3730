//! Folder-level operations: validation, tree transforms, and lifecycle

pub mod lifecycle;
pub mod password;
pub mod transform;

// Re-export commonly used types
pub use lifecycle::{Folder, FolderError, SHADOW_SUFFIX};
pub use password::{PasswordValidationError, PasswordValidator};
pub use transform::{transform_tree, Direction, TransformError};
