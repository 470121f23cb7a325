use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use catalog_client::HttpCatalogSource;
use clap::Parser;
use gallery_core::{DateStyle, Gallery};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod page;

use config::{load_settings, shape_policy, validate_catalog_url, Settings};

/// Fetches the astronomy picture catalog and writes the rendered gallery page.
#[derive(Parser, Debug)]
#[command(name = "apod-gallery", version)]
struct Args {
    /// Config file (defaults to ./gallery.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    catalog_url: Option<String>,
    /// month_day_year, day_month_year or iso.
    #[arg(long)]
    date_style: Option<DateStyle>,
    /// Show an error instead of an empty gallery when the catalog is not a JSON array.
    #[arg(long)]
    strict_shape: bool,
    /// Open the detail modal for the card at this position after loading.
    #[arg(long, value_name = "INDEX")]
    open: Option<usize>,
    /// Write the page here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

impl Args {
    fn apply(&self, settings: &mut Settings) {
        if let Some(url) = &self.catalog_url {
            settings.catalog_url = url.clone();
        }
        if let Some(style) = self.date_style {
            settings.date_style = style;
        }
        if self.strict_shape {
            settings.shape_policy = shape_policy(true);
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut settings = load_settings(args.config.as_deref())?;
    args.apply(&mut settings);
    let catalog_url = validate_catalog_url(&settings.catalog_url)?;

    let source = HttpCatalogSource::new(catalog_url.as_str());
    let mut app = Gallery::attach(page::scaffold(), source, settings.gallery_options())
        .context("page shell does not expose the gallery anchors")?;

    if let Some(fact) = app.start() {
        info!(fact, "showing space fact");
    }

    info!(url = %catalog_url, "fetching catalog");
    let trigger = app.anchors().trigger;
    app.click(trigger).await;

    if let Some(index) = args.open {
        let cards = app.cards();
        match cards.get(index).copied() {
            Some(card) => app.click(card).await,
            None => warn!(index, cards = cards.len(), "no card at requested position"),
        }
    }

    let html = page::render_page(&app.to_html());
    match &args.output {
        Some(path) => {
            fs::write(path, html)
                .with_context(|| format!("failed to write page to '{}'", path.display()))?;
            info!(path = %path.display(), "wrote gallery page");
        }
        None => println!("{html}"),
    }

    Ok(())
}
