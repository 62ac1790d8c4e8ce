//! Data models
//!
//! Wire shapes of the remote catalog collections plus the form drafts used
//! to create and update them. Field normalization happens once, during
//! deserialization, via [`serde_helpers`].

pub mod promotion;
pub mod serde_helpers;
pub mod tyre;
pub mod vehicle;

// Re-exports
pub use promotion::*;
pub use tyre::*;
pub use vehicle::*;
