//! # Request Dispatcher
//!
//! Resolves an incoming install-artifact request to one of the serve
//! flows and produces a ready-to-send [`Download`]. The HTTP surface
//! itself belongs to the host router; the routes it is expected to wire
//! up are:
//!
//! * `GET /installers/desktop/{platformID}` — anonymous desktop download.
//! * `GET /installers/{platformID}` — authenticated, organization taken
//!   from the caller's header.
//! * `GET /installers/{organizationID}/{platformID}` — explicit
//!   organization.
//! * `GET /installers/clickonce-setup/{architecture}/{organizationID}` —
//!   relay-forwarded ClickOnce bootstrapper.
//!
//! All three installer shapes collapse into [`InstallerDispatcher::serve_installer`]
//! with an optional organization id; the router maps [`ServeError::status_code`]
//! onto its response.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error, warn};

use depot_common::config::Config;
use depot_common::forward::{Architecture, ForwardError, SetupForwarder};
use depot_common::organization::OrganizationDirectory;
use depot_common::request::{Caller, RequestOrigin};

use crate::branding;
use crate::catalog::{clickonce_setup_path, ArtifactKind, Platform};
use crate::gate::FileGate;
use crate::script::{self, MissingMarker};

/// Every artifact is served as an opaque byte stream.
pub const ARTIFACT_CONTENT_TYPE: &str = "application/octet-stream";

/// A fully prepared artifact response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Download {
    /// Name the client should save the artifact under.
    pub file_name: String,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Download {
    fn new(file_name: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: ARTIFACT_CONTENT_TYPE,
            body,
        }
    }
}

/// Failure taxonomy of the serve path.
///
/// Every variant maps onto a distinct response status via
/// [`ServeError::status_code`]; nothing is swallowed.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("unknown platform identifier `{0}`")]
    UnknownPlatform(String),
    #[error("unknown setup architecture `{0}`")]
    UnknownArchitecture(String),
    #[error("platform requires an organization id")]
    MissingOrganization,
    #[error("organization `{0}` not found")]
    UnknownOrganization(String),
    #[error("timed out waiting for the artifact file gate")]
    GateTimeout,
    /// The artifact itself is broken; a catalog defect, not a caller error.
    #[error("malformed install script `{file_name}`: {source}")]
    MalformedArtifact {
        file_name: String,
        #[source]
        source: MissingMarker,
    },
    #[error("forwarding through the setup relay failed")]
    Forwarding(#[from] ForwardError),
    #[error("failed to read artifact {path:?}")]
    ArtifactIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("organization directory lookup failed")]
    Directory(#[source] anyhow::Error),
}

impl ServeError {
    /// The HTTP status a host router should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::UnknownPlatform(_)
            | Self::UnknownArchitecture(_)
            | Self::MissingOrganization
            | Self::UnknownOrganization(_) => 400,
            Self::GateTimeout => 408,
            Self::Forwarding(_) => 502,
            Self::MalformedArtifact { .. } | Self::ArtifactIo { .. } | Self::Directory(_) => 500,
        }
    }
}

/// Serves the install-artifact catalog.
///
/// Stateless across requests; the only shared mutable state is the
/// injected [`FileGate`] slot.
pub struct InstallerDispatcher {
    artifact_root: PathBuf,
    gate: FileGate,
    directory: Arc<dyn OrganizationDirectory>,
    forwarder: Arc<dyn SetupForwarder>,
    config: Config,
}

impl InstallerDispatcher {
    pub fn new(
        artifact_root: impl Into<PathBuf>,
        gate: FileGate,
        directory: Arc<dyn OrganizationDirectory>,
        forwarder: Arc<dyn SetupForwarder>,
        config: Config,
    ) -> Self {
        Self {
            artifact_root: artifact_root.into(),
            gate,
            directory,
            forwarder,
            config,
        }
    }

    /// Serves a desktop binary, organization installer or install script.
    ///
    /// Unknown platform identifiers are rejected before the gate is
    /// touched or any file is opened. Everything after a successful
    /// acquire runs under the permit, which drops on every path out.
    pub async fn serve_installer(
        &self,
        platform_id: &str,
        organization_id: Option<&str>,
        caller: &Caller,
        origin: &RequestOrigin,
    ) -> Result<Download, ServeError> {
        let platform = Platform::resolve(platform_id)
            .ok_or_else(|| ServeError::UnknownPlatform(platform_id.to_string()))?;
        let descriptor = platform.descriptor();

        let _permit = self.gate.acquire().await.map_err(|_| {
            warn!(platform_id, "gave up waiting for the artifact file gate");
            ServeError::GateTimeout
        })?;

        let path = self.artifact_root.join(&descriptor.relative_path);
        match descriptor.kind {
            ArtifactKind::DesktopBinary => self.serve_desktop(&path, caller).await,
            ArtifactKind::OrganizationInstaller => {
                self.serve_organization_installer(&path, organization_id).await
            }
            ArtifactKind::InstallScript => {
                self.serve_install_script(&path, organization_id, origin).await
            }
        }
    }

    /// Forwards the local ClickOnce bootstrapper through the setup relay
    /// and serves whatever the relay answers, verbatim.
    ///
    /// Skips the gate: the only local file access is a short shared read
    /// of the bootstrapper, which does not contend for exclusive handles.
    pub async fn serve_clickonce_setup(
        &self,
        architecture: &str,
        organization_id: &str,
        origin: &RequestOrigin,
    ) -> Result<Download, ServeError> {
        let architecture = Architecture::resolve(architecture)
            .ok_or_else(|| ServeError::UnknownArchitecture(architecture.to_string()))?;

        let setup_path = self.artifact_root.join(clickonce_setup_path(architecture));
        let setup_bytes = self.read_artifact(&setup_path).await?;

        let body = self
            .forwarder
            .forward(setup_bytes, &origin.url(), organization_id, architecture)
            .await?;

        debug!(%architecture, organization_id, "served relay-forwarded setup");
        Ok(Download::new("setup.exe", body))
    }

    async fn serve_desktop(&self, path: &Path, caller: &Caller) -> Result<Download, ServeError> {
        let decision = branding::relay_decision(self.directory.as_ref(), caller)
            .await
            .map_err(ServeError::Directory)?;

        let body = self.read_artifact(path).await?;
        let file_name = branding::desktop_file_name(path, &decision);

        debug!(%file_name, "served desktop binary");
        Ok(Download::new(file_name, body))
    }

    async fn serve_organization_installer(
        &self,
        path: &Path,
        organization_id: Option<&str>,
    ) -> Result<Download, ServeError> {
        let organization_id = organization_id.ok_or(ServeError::MissingOrganization)?;
        let organization = self
            .directory
            .organization_by_id(organization_id)
            .await
            .map_err(ServeError::Directory)?
            .ok_or_else(|| ServeError::UnknownOrganization(organization_id.to_string()))?;

        let body = self.read_artifact(path).await?;
        let file_name = branding::installer_file_name(&organization);

        debug!(%file_name, "served organization installer");
        Ok(Download::new(file_name, body))
    }

    async fn serve_install_script(
        &self,
        path: &Path,
        organization_id: Option<&str>,
        origin: &RequestOrigin,
    ) -> Result<Download, ServeError> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ServeError::ArtifactIo {
                path: path.to_path_buf(),
                source,
            })?;
        let lines: Vec<String> = text.lines().map(str::to_owned).collect();

        let external_url = origin.external_url(&self.config);
        let patched = script::patch_install_script(
            &lines,
            &external_url,
            organization_id.unwrap_or_default(),
        )
        .map_err(|source| {
            error!(%file_name, %source, "install script cannot be patched");
            ServeError::MalformedArtifact {
                file_name: file_name.clone(),
                source,
            }
        })?;

        debug!(%file_name, "served install script");
        Ok(Download::new(file_name, patched.join("\n").into_bytes()))
    }

    async fn read_artifact(&self, path: &Path) -> Result<Vec<u8>, ServeError> {
        tokio::fs::read(path)
            .await
            .map_err(|source| ServeError::ArtifactIo {
                path: path.to_path_buf(),
                source,
            })
    }
}
