//! # Install Script Patching
//!
//! The shell provisioning scripts ship with two empty marker lines that
//! the depot fills in per request. The patch is a pure function over the
//! line sequence, so it is testable without touching the file system.

use thiserror::Error;

const HOST_MARKER: &str = "HostName=";
const ORGANIZATION_MARKER: &str = "Organization=";

/// A provisioning script is missing one of its rewrite markers.
///
/// A script without the markers would install clients with no host or
/// organization configured, so the request fails instead of serving the
/// script unpatched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("missing `{marker}` marker line")]
pub struct MissingMarker {
    pub marker: &'static str,
}

/// Replaces the host and organization marker lines of an install script.
///
/// A marker only matches a line that equals it exactly; every other line
/// is preserved in its original position.
pub fn patch_install_script(
    lines: &[String],
    external_url: &str,
    organization_id: &str,
) -> Result<Vec<String>, MissingMarker> {
    let host_index = position(lines, HOST_MARKER)?;
    let organization_index = position(lines, ORGANIZATION_MARKER)?;

    let mut patched = lines.to_vec();
    patched[host_index] = format!("{HOST_MARKER}\"{external_url}\"");
    patched[organization_index] = format!("{ORGANIZATION_MARKER}\"{organization_id}\"");

    Ok(patched)
}

fn position(lines: &[String], marker: &'static str) -> Result<usize, MissingMarker> {
    lines
        .iter()
        .position(|line| line == marker)
        .ok_or(MissingMarker { marker })
}
