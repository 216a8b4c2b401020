//! geotile — render map rasters and find routes from the command line.
//!
//! ```text
//! # Shortest route between two points, as JSON.
//! geotile --nodes nodes.csv --edges edges.csv route 37.870 -122.260 37.855 -122.240
//!
//! # Stitch the tiles for a viewport, with that route drawn on top.
//! geotile --nodes nodes.csv --edges edges.csv raster \
//!     --ullat 37.88 --ullon -122.27 --lrlat 37.85 --lrlon -122.23 \
//!     --width 1024 --height 768 --route 37.870 -122.260 37.855 -122.240 --out map.png
//! ```
//!
//! Without `--config` the built-in Berkeley tile set constants are used and
//! tiles are read from `img/`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use gt_core::MapConfig;
use gt_route::{load_graph_csv, RoadGraph};
use gt_service::{MapService, RasterRequest, RouteRequest, DEFAULT_SESSION};

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "geotile", version, about = "Render map rasters and find routes")]
struct Cli {
    /// JSON map configuration; missing fields take built-in defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Tile directory (overrides the configuration)
    #[arg(long)]
    tile_dir: Option<PathBuf>,

    /// Road nodes CSV (`id,lat,lon`)
    #[arg(long, requires = "edges")]
    nodes: Option<PathBuf>,

    /// Road edges CSV (`from,to`)
    #[arg(long, requires = "nodes")]
    edges: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Stitch the tiles covering a box into one PNG and print its metadata
    Raster(RasterArgs),
    /// Print the shortest route between the road nodes nearest two points
    Route(RouteArgs),
}

#[derive(Args, Debug)]
struct RasterArgs {
    #[arg(long, allow_negative_numbers = true)]
    ullat: f64,
    #[arg(long, allow_negative_numbers = true)]
    ullon: f64,
    #[arg(long, allow_negative_numbers = true)]
    lrlat: f64,
    #[arg(long, allow_negative_numbers = true)]
    lrlon: f64,

    /// Viewport width in pixels
    #[arg(long, default_value_t = 1024)]
    width: u32,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 768)]
    height: u32,

    /// Output PNG path
    #[arg(short, long, default_value = "raster.png")]
    out: PathBuf,

    /// Route to draw on the raster
    #[arg(
        long,
        num_args = 4,
        allow_negative_numbers = true,
        value_names = ["START_LAT", "START_LON", "END_LAT", "END_LON"]
    )]
    route: Option<Vec<f64>>,
}

#[derive(Args, Debug)]
struct RouteArgs {
    #[arg(allow_negative_numbers = true)]
    start_lat: f64,
    #[arg(allow_negative_numbers = true)]
    start_lon: f64,
    #[arg(allow_negative_numbers = true)]
    end_lat: f64,
    #[arg(allow_negative_numbers = true)]
    end_lon: f64,
}

impl From<&RouteArgs> for RouteRequest {
    fn from(a: &RouteArgs) -> Self {
        RouteRequest {
            start_lat: a.start_lat,
            start_lon: a.start_lon,
            end_lat:   a.end_lat,
            end_lon:   a.end_lon,
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let config = load_config(&cli)?;
    let graph = load_graph(&cli)?;
    let service = MapService::with_tile_dir(config, graph).context("Failed to start map service")?;

    match &cli.command {
        Command::Raster(args) => run_raster(&service, args),
        Command::Route(args) => run_route(&service, args),
    }
}

fn load_config(cli: &Cli) -> Result<MapConfig> {
    let mut config = match &cli.config {
        Some(path) => MapConfig::from_json_path(path)
            .with_context(|| format!("Failed to load config {:?}", path))?,
        None => MapConfig::default(),
    };
    if let Some(dir) = &cli.tile_dir {
        config.tile_dir = dir.clone();
    }
    log::debug!("config: {config:?}");
    Ok(config)
}

fn load_graph(cli: &Cli) -> Result<Arc<RoadGraph>> {
    match (&cli.nodes, &cli.edges) {
        (Some(nodes), Some(edges)) => {
            let graph = load_graph_csv(nodes, edges)
                .with_context(|| format!("Failed to load road graph from {:?} and {:?}", nodes, edges))?;
            Ok(Arc::new(graph))
        }
        _ => {
            log::warn!("no road graph given (--nodes/--edges); every route will be empty");
            Ok(Arc::new(RoadGraph::empty()))
        }
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn run_raster(service: &MapService, args: &RasterArgs) -> Result<()> {
    match args.route.as_deref() {
        None => {}
        Some(&[start_lat, start_lon, end_lat, end_lon]) => {
            let req = RouteRequest { start_lat, start_lon, end_lat, end_lon };
            let route = service.route(DEFAULT_SESSION, &req)?;
            if !route.success {
                log::warn!("no route between the given points; drawing none");
            }
        }
        Some(other) => bail!("--route takes 4 values, got {}", other.len()),
    }

    let req = RasterRequest {
        ullat: args.ullat,
        ullon: args.ullon,
        lrlat: args.lrlat,
        lrlon: args.lrlon,
        w:     args.width,
        h:     args.height,
    };
    let resp = service.raster(DEFAULT_SESSION, &req)?;

    match &resp.image_png {
        Some(png) => {
            std::fs::write(&args.out, png)
                .with_context(|| format!("Failed to write raster to {:?}", args.out))?;
            log::info!(
                "wrote {}x{} raster at depth {} to {:?}",
                resp.raster_width,
                resp.raster_height,
                resp.depth,
                args.out
            );
        }
        None => log::warn!("query box does not intersect the map; no image written"),
    }

    println!("{}", serde_json::to_string_pretty(&resp)?);
    Ok(())
}

fn run_route(service: &MapService, args: &RouteArgs) -> Result<()> {
    let resp = service.route(DEFAULT_SESSION, &RouteRequest::from(args))?;
    println!("{}", serde_json::to_string_pretty(&resp)?);
    Ok(())
}
