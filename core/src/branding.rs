//! # Download Branding
//!
//! Decides the download names binary artifacts are served under. A relay
//! code embedded in the name tells the installed client which sponsor
//! relay to connect through; an organization id in the name is how the
//! provisioning pipeline attributes an unsponsored installer.

use std::path::Path;

use depot_common::organization::{OrganizationDirectory, OrganizationRecord, SponsorLevel};
use depot_common::request::Caller;

/// Outcome of the per-request relay branding decision.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RelayDecision {
    /// Brand the download name with this relay code.
    Branded { relay_code: String },
    Unbranded,
}

impl RelayDecision {
    /// Wraps a candidate code; blank and whitespace-only codes never brand.
    pub fn from_code(code: Option<String>) -> Self {
        match code {
            Some(code) if !code.trim().is_empty() => Self::Branded { relay_code: code },
            _ => Self::Unbranded,
        }
    }
}

/// Derives the relay branding for a desktop download.
///
/// Authenticated callers brand with their organization's relay code only
/// when the organization sponsors at [`SponsorLevel::Relay`] or above.
/// Anonymous callers get the directory's default relay code
/// unconditionally.
pub async fn relay_decision(
    directory: &dyn OrganizationDirectory,
    caller: &Caller,
) -> anyhow::Result<RelayDecision> {
    match caller {
        Caller::Authenticated { user_name } => {
            let organization = directory.organization_by_user(user_name).await?;
            let code = organization
                .filter(|org| org.sponsor_level >= SponsorLevel::Relay)
                .and_then(|org| org.relay_code);
            Ok(RelayDecision::from_code(code))
        }
        Caller::Anonymous => {
            let code = directory.default_relay_code().await?;
            Ok(RelayDecision::from_code(Some(code)))
        }
    }
}

/// Download name for a desktop client binary.
///
/// Unbranded desktop binaries are served under the bare file stem; the
/// Windows artifacts shed their `.exe` this way, and previously
/// distributed tooling depends on that.
pub fn desktop_file_name(artifact_path: &Path, decision: &RelayDecision) -> String {
    let stem = artifact_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    match decision {
        RelayDecision::Branded { relay_code } => {
            let extension = artifact_path
                .extension()
                .map(|ext| format!(".{}", ext.to_string_lossy()))
                .unwrap_or_default();
            format!("{stem}-[{relay_code}]{extension}")
        }
        RelayDecision::Unbranded => stem,
    }
}

/// Download name for the organization-scoped Windows installer.
///
/// Any sponsorship above [`SponsorLevel::None`] brands with the relay
/// code; unsponsored organizations are branded with their id instead.
/// The `Install`/`Installer` stem split mirrors the shipped artifacts and
/// must stay: it is how the provisioning pipeline tells the two apart.
pub fn installer_file_name(organization: &OrganizationRecord) -> String {
    if organization.sponsor_level > SponsorLevel::None {
        let relay_code = organization.relay_code.clone().unwrap_or_default();
        format!("Remotely_Install-[{relay_code}].exe")
    } else {
        format!("Remotely_Installer-[{}].exe", organization.id)
    }
}
