//! CLI helper functions

use crate::{
    client::{Auth, AuthType, RemoteClient},
    etl::{Acquirer, Converter, DataCarrier, Pipeline},
    format::FileConverter,
    source::HttpSource,
    storage::OutputDir,
};
use eyre::{Context, Result, eyre};
use polars::prelude::{DataFrame, ParquetWriter};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use url::Url;

/// Load a remote client from environment variables
///
/// Expected environment variables:
/// - CORRAL_AUTH: Auth scheme, one of "token", "basic", "none" (optional,
///   inferred from whichever credentials are set when absent)
/// - CORRAL_TOKEN: Bearer token for auth (optional, conflicts with username/password)
/// - CORRAL_USERNAME: Username for basic auth (optional)
/// - CORRAL_PASSWORD: Password for basic auth (optional)
pub fn load_remote_client() -> Result<RemoteClient> {
    let token = std::env::var("CORRAL_TOKEN").ok();
    let username = std::env::var("CORRAL_USERNAME").ok();
    let password = std::env::var("CORRAL_PASSWORD").ok();

    let auth_type = match std::env::var("CORRAL_AUTH") {
        Ok(value) => {
            AuthType::from_str(&value).map_err(|_| eyre!("Invalid CORRAL_AUTH: {}", value))?
        }
        Err(_) if token.is_some() => AuthType::Token,
        Err(_) if username.is_some() && password.is_some() => AuthType::Basic,
        Err(_) => AuthType::None,
    };

    let auth = Auth::new(&auth_type, username, password, token);
    log::debug!("Using auth: {}", auth);
    RemoteClient::try_new(auth).context("Failed to create remote client")
}

fn parse_urls(urls: &[String]) -> Result<Vec<Url>> {
    urls.iter()
        .map(|u| Url::parse(u).with_context(|| format!("Invalid URL: {}", u)))
        .collect()
}

/// Fetch dataset files into a destination directory
///
/// Pipeline stage: HttpSource → destination directory
pub async fn fetch_datasets(
    urls: &[String],
    dest: impl AsRef<Path>,
    force: bool,
) -> Result<Vec<PathBuf>> {
    let client = load_remote_client()?;
    let urls = parse_urls(urls)?;

    let source = HttpSource::try_new(client, urls, dest)?;
    let paths = source.fetch(force).await?;

    Ok(paths)
}

/// Convert local files into a table, serving from the cache when possible
pub fn convert_files(
    inputs: &[PathBuf],
    cache_dir: impl AsRef<Path>,
    force: bool,
) -> Result<DataFrame> {
    let converter = FileConverter::new(cache_dir)?;
    let table = converter.convert(inputs, force)?;

    Ok(table)
}

/// Run the full pipeline: fetch into `raw_dir`, convert via `cache_dir`
pub async fn run_pipeline(
    urls: &[String],
    raw_dir: impl AsRef<Path>,
    cache_dir: impl AsRef<Path>,
    force: bool,
) -> Result<DataCarrier> {
    let client = load_remote_client()?;
    let urls = parse_urls(urls)?;

    let source = HttpSource::try_new(client, urls, raw_dir)?;
    let converter = FileConverter::new(cache_dir)?;

    let carrier = Pipeline::new(source, converter).run(force).await?;
    Ok(carrier)
}

/// Write a table to a parquet file for downstream consumers
pub fn write_table(table: &mut DataFrame, output: impl AsRef<Path>) -> Result<()> {
    let output = output.as_ref();
    let file = std::fs::File::create(output)
        .with_context(|| format!("Failed to create output file: {}", output.display()))?;

    ParquetWriter::new(file)
        .finish(table)
        .with_context(|| format!("Failed to write parquet: {}", output.display()))?;

    log::info!("Wrote table to {}", output.display());
    Ok(())
}

/// Clear top-level files matching a glob pattern from a directory
pub fn clear_directory(dir: impl AsRef<Path>, pattern: &str) -> Result<usize> {
    let dir = OutputDir::new(dir)?;
    let removed = dir.clear(pattern)?;

    Ok(removed)
}
