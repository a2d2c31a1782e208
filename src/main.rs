use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use std::process::ExitCode;
use tintlab::catalog::{ColorCatalog, ColorEntry, StaticCatalog};
use tintlab::pipeline::{PipelineError, PipelineRequest, RunReport};
use tintlab::{config, output, pipeline};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tintlab")]
#[command(about = "Batch image filter pipeline")]
#[command(long_about = "\
Batch image filter pipeline

Decodes one source image, resizes it to a fixed working size, and writes
a PNG per filter next to the output prefix:

  O.png           resized base
  O-gray.png      16-bit grayscale
  O-nega.png      negative
  O-moza.png      mosaic
  O-sepia.png     sepia
  O-smog.png      dimmed (×0.2)
  O-red.png       red tint
  O-blue.png      blue tint
  O-green.png     green tint
  O-sb.png        sky-blue tint
  O-<name>.png    one blend per catalog color

The color catalog is scraped from the URL in [catalog] unless --color or
--offline is given.

Run 'tintlab --gen-config' to generate a documented tintlab.toml.")]
#[command(version)]
struct Cli {
    /// Source image (any format the decoder recognises)
    #[arg(short, long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Output path prefix; artifacts are <PREFIX>.png and <PREFIX>-<suffix>.png
    #[arg(short, long, value_name = "PREFIX")]
    output: Option<PathBuf>,

    /// TOML config overlay on top of the stock defaults
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Catalog color as NAME=CODE or CODE (repeatable; disables remote fetch)
    #[arg(long = "color", value_name = "NAME=CODE", value_parser = ColorEntry::parse_arg)]
    colors: Vec<ColorEntry>,

    /// Skip the remote color catalog
    #[arg(long)]
    offline: bool,

    /// Write a JSON run report to this file
    #[arg(long, value_name = "FILE")]
    manifest: Option<PathBuf>,

    /// Print a stock tintlab.toml with all options documented
    #[arg(long)]
    gen_config: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    if cli.gen_config {
        print!("{}", config::stock_config_toml());
        return ExitCode::SUCCESS;
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(PipelineError::MissingArgument(name)) => {
            eprintln!("error: missing required argument {name}");
            eprintln!("{}", Cli::command().render_usage());
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), PipelineError> {
    let input = cli.input.ok_or(PipelineError::MissingArgument("-i <PATH>"))?;
    let prefix = cli
        .output
        .ok_or(PipelineError::MissingArgument("-o <PREFIX>"))?;

    let config = config::load_config(cli.config.as_deref())?;
    init_thread_pool(&config.processing);

    let catalog = select_catalog(cli.colors, cli.offline, &config.catalog);
    let request = PipelineRequest { input, prefix };

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_pipeline_event(&event) {
                println!("{}", line);
            }
        }
    });
    let result = pipeline::run(&request, &config, &catalog, Some(tx));
    // The sender is dropped by now, so the printer drains and exits.
    let _ = printer.join();
    let report = result?;

    if let Some(path) = &cli.manifest {
        write_manifest(&report, path)?;
    }
    output::print_run_summary(&report);
    Ok(())
}

/// Catalog for this run: `--color` entries win, then `--offline`, then remote.
enum Catalog {
    Static(StaticCatalog),
    #[cfg(feature = "remote-catalog")]
    Remote(tintlab::catalog::RemoteCatalog),
}

impl ColorCatalog for Catalog {
    fn entries(&self) -> Vec<ColorEntry> {
        match self {
            Catalog::Static(c) => c.entries(),
            #[cfg(feature = "remote-catalog")]
            Catalog::Remote(c) => c.entries(),
        }
    }
}

fn select_catalog(
    colors: Vec<ColorEntry>,
    offline: bool,
    catalog_config: &config::CatalogConfig,
) -> Catalog {
    if !colors.is_empty() || offline {
        return Catalog::Static(StaticCatalog(colors));
    }
    #[cfg(feature = "remote-catalog")]
    {
        Catalog::Remote(tintlab::catalog::RemoteCatalog::from_config(
            catalog_config,
        ))
    }
    #[cfg(not(feature = "remote-catalog"))]
    {
        let _ = catalog_config;
        tracing::warn!("Built without remote-catalog; no named-color variants");
        Catalog::Static(StaticCatalog::default())
    }
}

fn write_manifest(report: &RunReport, path: &std::path::Path) -> Result<(), PipelineError> {
    let json = serde_json::to_string_pretty(report).map_err(std::io::Error::other)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores: user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
