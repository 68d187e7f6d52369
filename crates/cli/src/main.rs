use anyhow::Context;
use clap::{Parser, Subcommand};

use catalog_kernel::settings::Settings;

/// Book catalog command-line interface
#[derive(Debug, Parser)]
#[command(name = "catalog", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Migrate the database and serve the catalog over HTTP
    Serve {
        /// Address to bind, overriding `server.host`
        #[arg(long)]
        host: Option<String>,
        /// Port to bind, overriding `server.port`
        #[arg(long)]
        port: Option<u16>,
    },
    /// Apply pending database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load().with_context(|| "failed to load catalog settings")?;
    catalog_telemetry::init(&settings.telemetry)?;

    match cli.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                settings.server.host = host;
            }
            if let Some(port) = port {
                settings.server.port = port;
            }
            catalog_app::serve(&settings).await
        }
        Command::Migrate => migrate(&settings).await,
    }
}

async fn migrate(settings: &Settings) -> anyhow::Result<()> {
    let pool = catalog_db::connect(&settings.database)
        .await
        .context("failed to open the catalog database")?;
    let registry = catalog_app::build_registry(&pool);

    let applied = catalog_app::migrate(&registry, &pool).await?;
    pool.close().await;

    println!("applied {} migration(s)", applied);
    Ok(())
}
