//! Shared types for the SkyPortal client and its server collaborator.

pub mod error;
pub mod models;
pub mod protocol;

pub use error::*;
pub use models::*;
pub use protocol::*;
