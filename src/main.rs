use clap::{Parser, Subcommand, builder::styling};
use corral::DataCarrier;
use eyre::Result;
use owo_colors::OwoColorize;
use std::path::PathBuf;

// CLI Styling
const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::BrightWhite.on_default())
    .usage(styling::AnsiColor::BrightWhite.on_default())
    .literal(styling::AnsiColor::Green.on_default())
    .placeholder(styling::AnsiColor::Cyan.on_default());

/// Corral: fetch remote datasets, convert them to columnar tables, and never do the same work twice
#[derive(Parser)]
#[command(name = "corral", version, styles = STYLES)]
struct Cli {
    /// The dotenv file to source credentials from
    #[arg(short, long, global = true, default_value = ".env")]
    env: String,

    /// More verbose logging
    #[arg(long, global = true)]
    debug: bool,

    /// Command to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch dataset files from remote URLs into a destination directory
    Fetch {
        /// URLs of the dataset files to download
        #[arg(required = true)]
        urls: Vec<String>,

        /// Directory to save fetched files to
        #[arg(short, long, default_value = "data/raw")]
        output_dir: String,

        /// Ignore any cached prior fetch and download everything again
        #[arg(short, long)]
        force: bool,
    },

    /// Convert local raw files (CSV, NDJSON) into one columnar table
    Convert {
        /// Input files to convert
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Directory holding materialized table artifacts
        #[arg(short, long, default_value = "data/cache")]
        cache_dir: String,

        /// Re-parse the inputs even when a cached table exists
        #[arg(short, long)]
        force: bool,

        /// Write the resulting table to a parquet file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Fetch and convert in one go
    Run {
        /// URLs of the dataset files to download
        #[arg(required = true)]
        urls: Vec<String>,

        /// Directory to save fetched files to
        #[arg(long, default_value = "data/raw")]
        raw_dir: String,

        /// Directory holding materialized table artifacts
        #[arg(long, default_value = "data/cache")]
        cache_dir: String,

        /// Bypass both the fetch and conversion caches
        #[arg(short, long)]
        force: bool,

        /// Write the resulting table to a parquet file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Remove top-level files matching a glob pattern from a directory
    Clear {
        /// Directory to clear
        dir: String,

        /// Glob pattern of file names to remove
        #[arg(default_value = "*")]
        pattern: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if std::path::Path::new(&cli.env).exists() {
        dotenvy::from_filename(&cli.env)?;
    }

    let log_level = match cli.debug {
        true => "debug",
        false => "info",
    };
    let env = env_logger::Env::default().filter_or("LOG_LEVEL", log_level);
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .init();

    match cli.command {
        Commands::Fetch {
            urls,
            output_dir,
            force,
        } => {
            log::info!(
                "Fetching {} files to {}",
                urls.len().cyan(),
                output_dir.bright_black()
            );
            let paths = corral::cli::fetch_datasets(&urls, &output_dir, force).await?;
            for path in &paths {
                println!("{}", path.display());
            }
            log::info!("Fetched {} files", paths.len().cyan());
        }
        Commands::Convert {
            inputs,
            cache_dir,
            force,
            output,
        } => {
            log::info!(
                "Converting {} files via cache {}",
                inputs.len().cyan(),
                cache_dir.bright_black()
            );
            let mut table = corral::cli::convert_files(&inputs, &cache_dir, force)?;
            println!("{}", DataCarrier::Table(table.clone()));
            if let Some(output) = output {
                corral::cli::write_table(&mut table, output)?;
            }
        }
        Commands::Run {
            urls,
            raw_dir,
            cache_dir,
            force,
            output,
        } => {
            log::info!(
                "Running pipeline: {} -> {}",
                raw_dir.bright_black(),
                cache_dir.bright_black()
            );
            let carrier = corral::cli::run_pipeline(&urls, &raw_dir, &cache_dir, force).await?;
            println!("{}", carrier);
            if let (Some(output), DataCarrier::Table(mut table)) = (output, carrier) {
                corral::cli::write_table(&mut table, output)?;
            }
        }
        Commands::Clear { dir, pattern } => {
            log::info!(
                "Clearing {} from {}",
                pattern.cyan(),
                dir.bright_black()
            );
            let removed = corral::cli::clear_directory(&dir, &pattern)?;
            log::info!("Removed {} files", removed.cyan());
        }
    }

    Ok(())
}
