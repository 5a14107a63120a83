//! Object storage backends for finished CSV files
//!
//! - [`traits`] - the [`ObjectStore`] trait
//! - [`s3`] - Amazon S3 (and S3-compatible endpoints)
//! - [`memory`] - in-process store

pub mod memory;
pub mod s3;
pub mod traits;

pub use memory::{InMemoryObjectStore, StoredObject};
pub use s3::S3ObjectStore;
pub use traits::{CompletedPart, ObjectStore};
