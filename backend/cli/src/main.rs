mod commands;
mod settings;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use settings::Settings;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Folio: rich documents, HTML, and uploaded media")]
#[command(version)]
struct Cli {
    /// Config file (defaults to $FOLIO_CONFIG_DIR/config.yaml or ~/.folio/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render an editor JSON document to HTML
    Render {
        /// Path to the document JSON
        doc: PathBuf,
    },
    /// Convert an HTML file into editor JSON
    Parse {
        /// Path to the HTML file
        file: PathBuf,
    },
    /// List uploads referenced by PREV but no longer by NEXT
    Diff {
        prev: PathBuf,
        next: PathBuf,
        /// Delete the removed uploads from the media directory
        #[arg(long)]
        delete: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .unwrap_or_else(|| folio_config::config_file_path(&folio_config::config_dir()));
    let (config, report) = folio_config::load_and_validate(&config_path).await?;
    let settings = Settings::from_config(&config);
    let _log_guard = folio_logging::init_logger(&settings.log);
    folio_config::log_report(&report);
    if !report.is_valid() {
        anyhow::bail!("Invalid config at {}", config_path.display());
    }

    match cli.command {
        Commands::Render { doc } => {
            println!("{}", commands::render(&doc).await?);
        }
        Commands::Parse { file } => {
            println!("{}", commands::parse(&file).await?);
        }
        Commands::Diff { prev, next, delete } => {
            let removed = commands::removed(&prev, &next, &settings).await?;
            if !delete {
                for reference in &removed {
                    println!("{reference}");
                }
                return Ok(());
            }

            info!(
                count = removed.len(),
                media_dir = %settings.media_dir.display(),
                "Deleting removed uploads"
            );
            let events = commands::delete(removed, &settings).await;
            let failures = events.iter().filter(|e| e.is_failure()).count();
            for event in &events {
                println!("{}", serde_json::to_string(event)?);
            }
            if failures > 0 {
                warn!(failures, "Some uploads could not be deleted");
                anyhow::bail!("{failures} upload(s) could not be deleted");
            }
        }
    }

    Ok(())
}
