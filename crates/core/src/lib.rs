//! `studio-core` — shared primitives for the studio workspace.
//!
//! Pure types only (no IO, no HTTP).

pub mod error;
pub mod id;

pub use error::DomainError;
pub use id::ProfileId;
