//! # Setup Forwarding Interface
//!
//! The ClickOnce bootstrapper cannot be patched locally; it is uploaded to
//! an external relay service that rewrites the deployment manifest and
//! returns the bytes to serve. This module defines the interface the
//! dispatcher consumes; the HTTP implementation lives in `depot-relay`.

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

/// Windows build flavor of the ClickOnce bootstrapper.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Architecture {
    X64,
    X86,
}

impl Architecture {
    /// Resolves the wire token, case-insensitively. Anything other than
    /// `x64`/`x86` is unknown, never a default.
    pub fn resolve(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "x64" => Some(Self::X64),
            "x86" => Some(Self::X86),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::X64 => "x64",
            Self::X86 => "x86",
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The relay call failed; the request it belonged to fails with it.
/// Retrying is left to the caller or an outer proxy, never done here.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// The relay answered, but not with a success status.
    #[error("relay responded with status {status}")]
    Upstream { status: u16 },
    /// The relay could not be reached or the transfer broke midway.
    #[error("relay request failed: {source}")]
    Transport {
        #[source]
        source: anyhow::Error,
    },
}

/// Uploads a local setup binary and returns the relayed bytes verbatim.
#[async_trait]
pub trait SetupForwarder: Send + Sync {
    async fn forward(
        &self,
        setup_bytes: Vec<u8>,
        host_url: &str,
        organization_id: &str,
        architecture: Architecture,
    ) -> Result<Vec<u8>, ForwardError>;
}
