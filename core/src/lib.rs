//! Artifact resolution and serving for the installer depot.
//!
//! The serve path is: resolve the platform against the [`catalog`], take
//! the single [`gate`] slot, then brand or patch the artifact
//! ([`branding`], [`script`]) or forward it through the setup relay. The
//! [`dispatch`] module ties the flows together behind one typed API.

pub mod branding;
pub mod catalog;
pub mod dispatch;
pub mod gate;
pub mod script;
