//! Media store implementations.

mod memory;

#[cfg(feature = "s3")]
mod s3;

pub use memory::InMemoryMediaStore;

#[cfg(feature = "s3")]
pub use s3::{S3Config, S3MediaStore};
