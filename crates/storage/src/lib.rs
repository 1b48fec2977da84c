#![forbid(unsafe_code)]

pub mod price_table;
pub mod repository;

pub use repository::{InMemoryRepository, Storage, StorageError};
