#![forbid(unsafe_code)]

pub mod repository;
pub mod session_keys;
pub mod sqlite;

pub use repository::{InMemoryStore, LocalStore, Storage, StorageError};
