//! TOML-backed organization directory for operator use.
//!
//! Production deployments put a real directory service behind
//! [`OrganizationDirectory`]; the CLI reads a flat file instead:
//!
//! ```toml
//! default_relay_code = "RELAY1"
//!
//! [[organization]]
//! id = "ORG1"
//! sponsor_level = "relay"
//! relay_code = "ABC123"
//! users = ["alice@example.com"]
//! ```

use std::path::Path;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;

use depot_common::organization::{OrganizationDirectory, OrganizationRecord};

#[derive(Debug, Deserialize)]
struct OrganizationEntry {
    #[serde(default)]
    users: Vec<String>,
    #[serde(flatten)]
    record: OrganizationRecord,
}

#[derive(Debug, Default, Deserialize)]
pub struct FileDirectory {
    #[serde(default)]
    default_relay_code: String,
    #[serde(default, rename = "organization")]
    organizations: Vec<OrganizationEntry>,
}

impl FileDirectory {
    /// Loads a directory file; no path means an empty directory.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read directory file {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("failed to parse directory file {}", path.display()))
    }
}

#[async_trait]
impl OrganizationDirectory for FileDirectory {
    async fn organization_by_user(
        &self,
        user_name: &str,
    ) -> anyhow::Result<Option<OrganizationRecord>> {
        Ok(self
            .organizations
            .iter()
            .find(|entry| entry.users.iter().any(|user| user == user_name))
            .map(|entry| entry.record.clone()))
    }

    async fn organization_by_id(&self, id: &str) -> anyhow::Result<Option<OrganizationRecord>> {
        Ok(self
            .organizations
            .iter()
            .find(|entry| entry.record.id == id)
            .map(|entry| entry.record.clone()))
    }

    async fn default_relay_code(&self) -> anyhow::Result<String> {
        Ok(self.default_relay_code.clone())
    }
}
