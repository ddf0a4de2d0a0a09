//! # Request Context
//!
//! The identity and origin facts a host router extracts from an inbound
//! request. Both are passed explicitly into the dispatcher so the serve
//! path never reads framework-ambient state.

use crate::config::Config;

/// Who is asking for the artifact, as established by the host's
/// authentication middleware. The depot treats this as opaque input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Caller {
    Anonymous,
    Authenticated { user_name: String },
}

/// Scheme and authority of the inbound request, e.g. `http` and
/// `support.example.com:5000`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestOrigin {
    pub scheme: String,
    pub host: String,
}

impl RequestOrigin {
    pub fn new(scheme: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
        }
    }

    /// The origin exactly as the request arrived, `{scheme}://{host}`.
    pub fn url(&self) -> String {
        format!("{}://{}", self.scheme, self.host)
    }

    /// The URL advertised to installed clients.
    ///
    /// Upgrades the scheme to `https` when the deployment redirects all
    /// traffic there, since clients would otherwise be configured against
    /// an endpoint that only answers with redirects.
    pub fn external_url(&self, config: &Config) -> String {
        if config.redirect_to_https {
            format!("https://{}", self.host)
        } else {
            self.url()
        }
    }
}
