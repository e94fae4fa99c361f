//! wayfarer/crates/wf-core/src/lib.rs
//!
//! The central domain models and interface definitions for the Wayfarer
//! client. Backends (live HTTP, local mock) plug in through `traits`.

pub mod error;
pub mod models;
pub mod traits;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use traits::*;
