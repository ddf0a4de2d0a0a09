use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use tracing::info;

use depot_common::config::Config;
use depot_common::forward::{Architecture, ForwardError, SetupForwarder};
use depot_common::request::{Caller, RequestOrigin};
use depot_core::dispatch::InstallerDispatcher;
use depot_core::gate::FileGate;

use crate::commands::FetchArgs;
use crate::directory::FileDirectory;

/// Fetch never reaches the ClickOnce flow, so the dispatcher gets a
/// forwarder that refuses outright instead of a live relay client.
struct NoRelay;

#[async_trait]
impl SetupForwarder for NoRelay {
    async fn forward(
        &self,
        _setup_bytes: Vec<u8>,
        _host_url: &str,
        _organization_id: &str,
        _architecture: Architecture,
    ) -> Result<Vec<u8>, ForwardError> {
        Err(ForwardError::Transport {
            source: anyhow::anyhow!("no relay endpoint configured; use the clickonce command"),
        })
    }
}

pub async fn fetch(args: FetchArgs) -> anyhow::Result<()> {
    let directory = Arc::new(FileDirectory::load(args.directory.as_deref())?);
    let dispatcher = InstallerDispatcher::new(
        args.root,
        FileGate::new(),
        directory,
        Arc::new(NoRelay),
        Config {
            redirect_to_https: args.https,
        },
    );

    let caller = match args.user {
        Some(user_name) => Caller::Authenticated { user_name },
        None => Caller::Anonymous,
    };
    let origin = RequestOrigin::new(args.scheme, args.host);

    let download = dispatcher
        .serve_installer(&args.platform_id, args.org.as_deref(), &caller, &origin)
        .await
        .map_err(|err| anyhow::anyhow!("{err} (status {})", err.status_code()))?;

    let out_path = args.out_dir.join(&download.file_name);
    tokio::fs::write(&out_path, &download.body)
        .await
        .with_context(|| format!("failed to write {}", out_path.display()))?;

    info!(
        "wrote {} ({} bytes)",
        out_path.display(),
        download.body.len()
    );
    Ok(())
}
