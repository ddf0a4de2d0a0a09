use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use depot_common::config::Config;
use depot_common::request::RequestOrigin;
use depot_core::dispatch::InstallerDispatcher;
use depot_core::gate::FileGate;
use depot_relay::RelaySetupClient;

use crate::commands::ClickonceArgs;
use crate::directory::FileDirectory;

pub async fn clickonce(args: ClickonceArgs) -> anyhow::Result<()> {
    let dispatcher = InstallerDispatcher::new(
        args.root,
        FileGate::new(),
        Arc::new(FileDirectory::default()),
        Arc::new(RelaySetupClient::new(args.relay_url)),
        Config::default(),
    );

    let origin = RequestOrigin::new(args.scheme, args.host);
    let download = dispatcher
        .serve_clickonce_setup(&args.architecture, &args.organization_id, &origin)
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
