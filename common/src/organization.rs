//! # Organization Records
//!
//! Read-only view of the organizations the installer depot brands
//! artifacts for. The records are owned by an external directory service;
//! this module only defines the shape the serve path consumes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Ordered sponsorship tier on an organization record.
///
/// The ordering is load-bearing: desktop relay branding requires
/// [`SponsorLevel::Relay`] or above, while any tier above
/// [`SponsorLevel::None`] switches the Windows installer from
/// organization-id branding to relay-code branding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SponsorLevel {
    #[default]
    None,
    Basic,
    Relay,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationRecord {
    pub id: String,
    #[serde(default)]
    pub sponsor_level: SponsorLevel,
    /// Token identifying the sponsor-provided relay server, when one exists.
    #[serde(default)]
    pub relay_code: Option<String>,
}

/// Lookup interface onto the external organization store.
///
/// Implementations decide where the records live (database, config file,
/// in-memory fixture); the serve path never persists anything through this.
#[async_trait]
pub trait OrganizationDirectory: Send + Sync {
    /// The organization an authenticated user belongs to, if any.
    async fn organization_by_user(&self, user_name: &str)
    -> anyhow::Result<Option<OrganizationRecord>>;

    async fn organization_by_id(&self, id: &str) -> anyhow::Result<Option<OrganizationRecord>>;

    /// Relay code handed to anonymous desktop downloads.
    ///
    /// An empty string means no system-wide relay is configured.
    async fn default_relay_code(&self) -> anyhow::Result<String>;
}
