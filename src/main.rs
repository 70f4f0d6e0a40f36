//! # Launchpad Import Entry Point
//!
//! One-shot batch job: reads a Launchpad bug export from disk and writes it
//! into the configured database under an existing project.

use std::path::PathBuf;

use clap::Parser;
use migration::MigratorTrait;
use storyboard::config::ConfigLoader;
use storyboard::logging::init_subscriber;
use storyboard::migrate::launchpad::{self, LaunchpadWriter, OpenIdResolver};

#[derive(Debug, Parser)]
#[command(name = "storyboard-import", about = "Import a Launchpad bug export")]
struct Cli {
    /// Name of the local project the imported tasks target
    #[arg(long)]
    project_name: String,

    /// Path to the JSON bug export
    #[arg(long)]
    bugs: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = ConfigLoader::new().load()?;
    init_subscriber(&config);
    tracing::info!(profile = %config.profile, "loaded configuration");

    let db = storyboard::db::init_pool(&config).await?;
    migration::Migrator::up(&db, None).await?;

    let bugs = launchpad::load_bug_export(&cli.bugs)?;
    tracing::info!(count = bugs.len(), "loaded bug export");

    let resolver = OpenIdResolver::new();
    let mut writer = LaunchpadWriter::new(&db, &resolver, &cli.project_name).await?;
    let summary = launchpad::import_bugs(&mut writer, &bugs).await?;

    tracing::info!(
        stories = summary.stories,
        skipped = summary.skipped,
        "import finished"
    );

    Ok(())
}
