//! Infrastructure layer for filesystem and environment interactions.

pub mod paths;

pub use paths::{default_data_dir, default_storage_path, expand_tilde};
