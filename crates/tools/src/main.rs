use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use catalog::Catalog;
use clap::{Parser, Subcommand};
use foundation::math::{LngLat, great_circle_distance_m};
use navigation::{DetailPanel, filter_candidates, nearest_campus};
use session::ViewerConfig;
use tools::replay::Replay;
use tools::script::parse_script;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect the campus dataset and replay viewer sessions")]
struct Args {
    /// Campus dataset (JSON array). Defaults to the bundled list.
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Viewer config (JSON). Defaults to built-in settings.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load and validate the dataset
    Validate,

    /// List campuses whose name contains QUERY (case-insensitive)
    Search { query: String },

    /// Campus nearest to a point
    Nearest {
        #[arg(allow_hyphen_values = true)]
        lng: f64,
        #[arg(allow_hyphen_values = true)]
        lat: f64,
    },

    /// Print the detail view of one campus as JSON
    Show { name: String },

    /// Run an interaction script against a headless viewer and print the
    /// event trail
    Replay { script: PathBuf },
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    match path {
        Some(p) => Catalog::from_path(p).with_context(|| format!("loading {}", p.display())),
        None => Catalog::bundled().context("loading bundled dataset"),
    }
}

fn load_config(path: Option<&Path>) -> Result<ViewerConfig> {
    let Some(p) = path else {
        return Ok(ViewerConfig::default());
    };
    let raw = fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?;
    ViewerConfig::from_json_str(&raw).with_context(|| format!("parsing {}", p.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let catalog = load_catalog(args.data.as_deref())?;
    info!(campuses = catalog.len(), "dataset loaded");

    match args.command {
        Command::Validate => {
            println!("{} campuses", catalog.len());
            if let Some(b) = catalog.bounds() {
                println!("bounds: {} .. {}", b.min, b.max);
                println!("center: {}", b.center());
            }
        }
        Command::Search { query } => {
            for id in filter_candidates(&catalog, &query) {
                if let Some(rec) = catalog.get(id) {
                    println!("{}", rec.name);
                }
            }
        }
        Command::Nearest { lng, lat } => {
            let center = LngLat::new(lng, lat);
            if !center.is_valid() {
                return Err(anyhow!("coordinate out of range: {center}"));
            }
            let id = nearest_campus(&catalog, center).ok_or_else(|| anyhow!("dataset is empty"))?;
            let rec = catalog.get(id).ok_or_else(|| anyhow!("dataset is empty"))?;
            let km = great_circle_distance_m(center, rec.position()) / 1000.0;
            println!("{} ({km:.2} km)", rec.name);
        }
        Command::Show { name } => {
            let config = load_config(args.config.as_deref())?;
            let id = catalog
                .find_by_name(&name)
                .ok_or_else(|| anyhow!("no campus named {name:?}"))?;
            let mut panel = DetailPanel::new(config.placeholder_image_url);
            panel.show_detail(id);
            let view = panel.view(&catalog).ok_or_else(|| anyhow!("no detail for {name:?}"))?;
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        Command::Replay { script } => {
            let config = load_config(args.config.as_deref())?;
            let src = fs::read_to_string(&script)
                .with_context(|| format!("reading {}", script.display()))?;
            let steps = parse_script(&src).with_context(|| format!("parsing {}", script.display()))?;
            let trail = Replay::start(catalog, config)?.run(&steps)?;
            for event in &trail {
                println!("{event}");
            }
        }
    }
    Ok(())
}
