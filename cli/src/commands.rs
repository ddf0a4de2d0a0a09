pub mod clickonce;
pub mod fetch;
pub mod resolve;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use url::Url;

#[derive(Parser)]
#[command(name = "depot")]
#[command(about = "Serves branded client install artifacts.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the catalog entry for a platform identifier
    #[command(alias = "r")]
    Resolve { platform_id: String },
    /// Run the serve path and write the artifact under its download name
    #[command(alias = "f")]
    Fetch(FetchArgs),
    /// Forward the local ClickOnce bootstrapper through a relay endpoint
    #[command(alias = "c")]
    Clickonce(ClickonceArgs),
}

#[derive(Args)]
pub struct FetchArgs {
    /// Platform identifier, e.g. `WindowsDesktop-x64`
    pub platform_id: String,
    /// Artifact root holding the pre-built downloads
    #[arg(long, default_value = "Downloads")]
    pub root: PathBuf,
    /// Organization id for organization-scoped artifacts
    #[arg(long)]
    pub org: Option<String>,
    /// Act as this authenticated user for relay branding lookups
    #[arg(long)]
    pub user: Option<String>,
    /// TOML organization directory file
    #[arg(long)]
    pub directory: Option<PathBuf>,
    /// Host clients are told to connect back to
    #[arg(long, default_value = "localhost:5000")]
    pub host: String,
    /// Scheme of the simulated inbound request
    #[arg(long, default_value = "http")]
    pub scheme: String,
    /// Advertise https inside rewritten install scripts
    #[arg(long)]
    pub https: bool,
    /// Directory the fetched artifact is written into
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
}

#[derive(Args)]
pub struct ClickonceArgs {
    /// Bootstrapper flavor, `x64` or `x86`
    pub architecture: String,
    pub organization_id: String,
    /// Relay endpoint that rewrites the bootstrapper
    #[arg(long)]
    pub relay_url: Url,
    /// Artifact root holding the pre-built downloads
    #[arg(long, default_value = "Downloads")]
    pub root: PathBuf,
    /// Host the relay embeds into the rewritten deployment
    #[arg(long, default_value = "localhost:5000")]
    pub host: String,
    #[arg(long, default_value = "http")]
    pub scheme: String,
    /// Directory the forwarded setup is written into
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
