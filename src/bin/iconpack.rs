//! Packs pre-rendered PNG files into ICNS and ICO icon files.
//!
//! ```shell
//! iconpack path/to/pngs -o path/to/icons
//! # reads path/to/pngs/<app>_<size>.png
//! # writes path/to/icons/<app>.icns and path/to/icons/<app>.ico
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use iconpack::export::{self, DirectorySource, ExportOptions};
use iconpack::{ContainerKind, UnregisteredPolicy};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "iconpack")]
#[command(about = "Pack <app>_<size>.png files into .icns and .ico icon files")]
#[command(version)]
struct Cli {
    /// Directory containing <app>_<size>.png files
    input: PathBuf,

    /// Directory to write the icon files into (defaults to the input directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only export these apps (may be repeated; defaults to every app found)
    #[arg(long = "app")]
    apps: Vec<String>,

    /// Fail on images whose size no container supports, instead of skipping them
    #[arg(long)]
    strict: bool,

    /// Write each file to a temporary file first, then rename it into place
    #[arg(long)]
    atomic: bool,

    /// Only write one kind of container
    #[arg(long, value_enum)]
    only: Option<Kind>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    Icns,
    Ico,
}

impl From<Kind> for ContainerKind {
    fn from(kind: Kind) -> ContainerKind {
        match kind {
            Kind::Icns => ContainerKind::Icns,
            Kind::Ico => ContainerKind::Ico,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let source = DirectorySource::new(&cli.input);
    let apps = if cli.apps.is_empty() {
        source.apps()
            .with_context(|| format!("Failed to scan {}", cli.input.display()))?
    } else {
        cli.apps.clone()
    };
    if apps.is_empty() {
        bail!("No <app>_<size>.png files found in {}", cli.input.display());
    }

    let mut options = ExportOptions::new(cli.output.clone().unwrap_or_else(|| cli.input.clone()));
    if cli.strict {
        options.policy = UnregisteredPolicy::Reject;
    }
    options.atomic = cli.atomic;
    if let Some(kind) = cli.only {
        options.kinds = vec![kind.into()];
    }

    let written = export::export_all(&source, &apps, &options)
        .context("Failed to export icons")?;
    for path in &written {
        println!("{}", path.display());
    }
    Ok(())
}
