//! Shared domain types and collaborator interfaces for the installer depot.
//!
//! Everything here is consumed by the serve path in `depot-core`; the
//! concrete collaborators (organization storage, the setup relay) live
//! behind the traits so the core stays free of framework-ambient state.

pub mod config;
pub mod forward;
pub mod organization;
pub mod request;
