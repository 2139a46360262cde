//! Local key-value storage used to resolve the current user.
//!
//! # Modules
//!
//! - `backend`: [`KeyValueStore`] trait
//! - `json`: JSON file implementation with atomic writes
//! - `memory`: in-process implementation

pub mod backend;
pub mod json;
pub mod memory;

pub use backend::KeyValueStore;
pub use json::JsonKeyValueStore;
pub use memory::MemoryKeyValueStore;
