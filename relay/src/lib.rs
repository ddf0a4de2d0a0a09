//! # ClickOnce Setup Relay Client
//!
//! Uploads the local ClickOnce bootstrapper to the external relay
//! service, which rewrites the deployment manifest for the requesting
//! host and organization. The relay is authoritative for the result;
//! this client returns its bytes verbatim and never retries.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::debug;
use url::Url;

use depot_common::forward::{Architecture, ForwardError, SetupForwarder};

/// Multipart field the relay expects the bootstrapper under.
const SETUP_FIELD: &str = "setup";
const SETUP_FILE_NAME: &str = "setup.exe";

/// HTTP implementation of [`SetupForwarder`] against a fixed relay
/// endpoint.
pub struct RelaySetupClient {
    endpoint: Url,
    http: reqwest::Client,
}

impl RelaySetupClient {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl SetupForwarder for RelaySetupClient {
    async fn forward(
        &self,
        setup_bytes: Vec<u8>,
        host_url: &str,
        organization_id: &str,
        architecture: Architecture,
    ) -> Result<Vec<u8>, ForwardError> {
        let form = Form::new().part(
            SETUP_FIELD,
            Part::bytes(setup_bytes).file_name(SETUP_FILE_NAME),
        );

        let url = forward_url(&self.endpoint, host_url, organization_id, architecture);
        debug!(%url, "uploading setup binary to relay");

        let response = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|source| ForwardError::Transport {
                source: source.into(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ForwardError::Upstream {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| ForwardError::Transport {
                source: source.into(),
            })?;

        Ok(body.to_vec())
    }
}

/// The relay endpoint with the per-request query parameters attached.
fn forward_url(
    endpoint: &Url,
    host_url: &str,
    organization_id: &str,
    architecture: Architecture,
) -> Url {
    let mut url = endpoint.clone();
    url.query_pairs_mut()
        .append_pair("host", host_url)
        .append_pair("organizationid", organization_id)
        .append_pair("architecture", architecture.as_str());
    url
}
