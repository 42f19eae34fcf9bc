use anyhow::Result;
use clap::Parser;
use tracing::error;

use ironlog::app::{init_logging, AppConfig};
use ironlog::cli::{execute_command, Cli};
use ironlog::config::ConfigLoader;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let app_config = AppConfig::new(cli.verbose).with_config_path(cli.config.clone());
    init_logging(&app_config);

    if let Err(e) = run(cli, &app_config).await {
        error!("Fatal error: {:#}", e);
        eprintln!("Error: {e}");
        if app_config.verbose >= 1 {
            eprintln!("\nError chain:");
            for (i, cause) in e.chain().enumerate() {
                eprintln!("  {i}: {cause}");
            }
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli, app_config: &AppConfig) -> Result<()> {
    let config = ConfigLoader::new()
        .load(app_config.config_path.as_deref())
        .await?;
    execute_command(cli.command, config).await
}
