#![forbid(unsafe_code)]

pub mod docstore;
pub mod repository;

pub use docstore::{DocumentStore, DocumentStoreInitError};
pub use repository::{
    InMemoryRepository, ReportRecord, ReportRepository, ReportRow, Storage, StorageError,
    UserRepository,
};
