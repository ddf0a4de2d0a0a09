mod commands;
mod directory;
mod terminal;

use commands::{CommandLine, Commands, clickonce, fetch, resolve};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    terminal::logging::init();

    match commands.command {
        Commands::Resolve { platform_id } => resolve::resolve(&platform_id),
        Commands::Fetch(args) => fetch::fetch(args).await,
        Commands::Clickonce(args) => clickonce::clickonce(args).await,
    }
}
