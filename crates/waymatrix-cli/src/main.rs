use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use waymatrix_cli::output::{render_records, OutputFormat};
use waymatrix_lib::{
    shortest_path_records, ComputeOptions, DuplicateEdgePolicy, LocalitySource, SourceConfig,
    TracingReporter,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "All-pairs shortest travel time and distance")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch localities and print the shortest time and distance for every pair.
    Paths(PathsArgs),
}

#[derive(Args, Debug)]
struct PathsArgs {
    /// Locality endpoint. Defaults to WAYMATRIX_LOCALITY_URL.
    #[arg(long, conflicts_with = "file")]
    url: Option<String>,
    /// Local JSON file with locality records.
    #[arg(long)]
    file: Option<PathBuf>,
    /// Fetch timeout in seconds.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,
    /// Extra fetch attempts after a transport failure.
    #[arg(long)]
    retries: Option<u32>,
    /// How repeated city pairs combine: `last` or `min`.
    #[arg(long, default_value_t = DuplicateEdgePolicy::default())]
    duplicates: DuplicateEdgePolicy,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Paths(args) => handle_paths(args).await,
    }
}

async fn handle_paths(args: PathsArgs) -> Result<()> {
    let config = source_config(&args)?;
    let location = config.location.to_string();
    let source = LocalitySource::new(config).context("failed to build locality client")?;

    let reporter = TracingReporter;
    let parsed = source
        .fetch_edges(&reporter)
        .await
        .with_context(|| format!("failed to fetch localities from {location}"))?;

    let options = ComputeOptions {
        duplicate_edges: args.duplicates,
    };
    let records = shortest_path_records(&parsed.edges, options, &reporter)
        .context("failed to compute shortest paths")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_records(&records, args.format, &mut out).context("failed to write output")?;
    out.flush()?;
    Ok(())
}

/// Command-line flags win over `WAYMATRIX_*` environment variables.
fn source_config(args: &PathsArgs) -> Result<SourceConfig> {
    let mut config = match (&args.file, &args.url) {
        (Some(path), _) => SourceConfig::file(path.clone()),
        (None, Some(url)) => SourceConfig::url(url.clone()),
        (None, None) => {
            SourceConfig::from_env().context("no locality source given; pass --url or --file")?
        }
    };

    if let Some(secs) = args.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    if let Some(retries) = args.retries {
        config = config.with_retries(retries);
    }
    Ok(config)
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .compact()
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
