#![forbid(unsafe_code)]

pub mod crypto;
pub mod error;
pub mod folder;

pub use crypto::kdf::FolderKey;
pub use folder::Folder;
