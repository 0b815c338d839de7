//! RO-Crate Preview CLI
//!
//! Command-line tool that renders an HTML preview of an RO-Crate, or dumps
//! its flattened view model as JSON.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rocrate_preview::vocab::PREVIEW_FILENAME;
use rocrate_preview::{
    crate_lite, load, preview, to_json_string, CrateSource, LayoutSource, PreviewError,
    PreviewOptions,
};

#[derive(Parser)]
#[command(name = "rocrate-preview")]
#[command(about = "Render an HTML preview of an RO-Crate")]
#[command(version)]
struct Cli {
    /// Path to RO-Crate directory, metadata file, zip archive, or URL
    source: String,

    /// Output file (default: ro-crate-preview.html next to a local crate)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Handlebars template to use instead of the bundled one
    #[arg(long)]
    template: Option<PathBuf>,

    /// Layout file or URL (default: crate-o's default layout)
    #[arg(long, conflicts_with = "offline")]
    layout: Option<String>,

    /// Use the bundled layout without touching the network
    #[arg(long)]
    offline: bool,

    /// Write the flattened view model as JSON instead of HTML
    #[arg(long)]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

impl Cli {
    fn options(&self) -> PreviewOptions {
        let layout = match (&self.layout, self.offline) {
            (_, true) => LayoutSource::Bundled,
            (Some(layout), false) => LayoutSource::detect(layout),
            (None, false) => LayoutSource::default(),
        };
        PreviewOptions {
            layout,
            template: self.template.clone(),
        }
    }
}

/// Where to write: the explicit output, else next to a local crate
fn output_path(cli: &Cli, source: &CrateSource) -> Option<PathBuf> {
    if cli.output.is_some() {
        return cli.output.clone();
    }
    if cli.json {
        // JSON goes to stdout unless asked otherwise
        return None;
    }
    source.preview_dir().map(|dir| dir.join(PREVIEW_FILENAME))
}

/// Write output to file or stdout
fn write_output(content: &str, output: Option<&Path>) -> Result<(), PreviewError> {
    match output {
        Some(path) => {
            fs::write(path, content)?;
            tracing::info!("Wrote preview to {}", path.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), PreviewError> {
    let source = CrateSource::detect(&cli.source);

    let content = if cli.json {
        let view = crate_lite(&load(&source)?)?;
        to_json_string(&view, cli.pretty)?
    } else {
        preview(&source, &cli.options())?
    };

    write_output(&content, output_path(&cli, &source).as_deref())
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rocrate_preview=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
