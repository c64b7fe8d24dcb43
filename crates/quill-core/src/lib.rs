//! # Quill Core
//!
//! The domain layer of the Quill blog backend.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! the entities, the ports that infrastructure must implement, and the
//! authorization & mutation services that enforce ownership and lifecycle
//! invariants on every write path.

pub mod domain;
pub mod error;
pub mod ports;
pub mod sanitize;
pub mod service;

pub use error::DomainError;
