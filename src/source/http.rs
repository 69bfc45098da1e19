//! HTTP dataset source
//!
//! Downloads a fixed list of URLs into the destination directory. The cache
//! check compares the requested file set against the fetch manifest, so
//! adding or removing a URL invalidates the prior result even when every
//! previously fetched file is still intact.

use crate::client::RemoteClient;
use crate::error::{PipelineError, Result};
use crate::etl::Acquirer;
use crate::storage::{FetchManifest, OutputDir};
use std::path::PathBuf;
use url::Url;

const STAGING_DIR: &str = ".staging";

/// Acquirer that fetches dataset files over HTTP.
///
/// File names are taken from each URL's last path segment, and the fetch
/// result is returned sorted by name.
#[derive(Debug)]
pub struct HttpSource {
    client: RemoteClient,
    urls: Vec<Url>,
    dest: OutputDir,
}

impl HttpSource {
    /// Create a source for a list of URLs, creating the destination
    /// directory (parents included) if absent.
    ///
    /// # Errors
    /// Returns `Config` if any URL has no usable file name segment, or if
    /// two URLs would download to the same file name and clobber each other.
    pub fn try_new(
        client: RemoteClient,
        urls: Vec<Url>,
        dest: impl AsRef<std::path::Path>,
    ) -> Result<Self> {
        let mut names = std::collections::HashSet::new();
        for url in &urls {
            let name = file_name(url)?;
            if !names.insert(name.clone()) {
                return Err(PipelineError::Config(format!(
                    "duplicate file name across URLs: {}",
                    name
                )));
            }
        }
        Ok(Self {
            client,
            urls,
            dest: OutputDir::new(dest)?,
        })
    }

    pub fn dest(&self) -> &std::path::Path {
        self.dest.path()
    }

    /// Label stored in the manifest; a destination fetched from different
    /// URLs is never mistaken for a valid prior result.
    fn source_label(&self) -> String {
        let mut urls: Vec<String> = self.urls.iter().map(|u| u.to_string()).collect();
        urls.sort();
        urls.join(" ")
    }

    /// Check for a reusable prior fetch covering exactly the requested set.
    fn cached_result(&self) -> Result<Option<Vec<PathBuf>>> {
        let Some(manifest) = FetchManifest::read(self.dest.path())? else {
            return Ok(None);
        };

        if manifest.source != self.source_label() {
            log::debug!("Manifest covers a different URL set, refetching");
            return Ok(None);
        }
        if !manifest.is_valid(self.dest.path()) {
            log::debug!("Manifest failed validation, refetching");
            return Ok(None);
        }

        let mut paths = manifest.paths(self.dest.path());
        paths.sort();
        Ok(Some(paths))
    }
}

impl Acquirer for HttpSource {
    async fn fetch(&self, force: bool) -> Result<Vec<PathBuf>> {
        if !force && let Some(paths) = self.cached_result()? {
            log::info!(
                "Destination holds a valid prior fetch ({} files), skipping download",
                paths.len()
            );
            return Ok(paths);
        }

        // Stage the whole fetch before touching the destination, so a failed
        // download leaves the old result untouched.
        let staging = self.dest.join(STAGING_DIR);
        std::fs::create_dir_all(&staging)?;

        let mut names = Vec::with_capacity(self.urls.len());
        for url in &self.urls {
            let name = file_name(url)?;
            let result = self.client.download(url, &staging.join(&name)).await;

            if let Err(error) = result {
                let _ = std::fs::remove_dir_all(&staging);
                return Err(error);
            }
            names.push(name);
        }

        // Promote: clear conflicting prior contents, then move staged files in
        self.dest.clear("*")?;
        for name in &names {
            std::fs::rename(staging.join(name), self.dest.join(name))?;
        }
        let _ = std::fs::remove_dir_all(&staging);

        let manifest = FetchManifest::from_files(&self.source_label(), self.dest.path(), &names)?;
        manifest.write(self.dest.path())?;

        let mut paths: Vec<PathBuf> = names.iter().map(|n| self.dest.join(n)).collect();
        paths.sort();

        log::info!("Fetched {} files to {}", paths.len(), self.dest.path().display());
        Ok(paths)
    }
}

fn file_name(url: &Url) -> Result<String> {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| PipelineError::Config(format!("URL has no file name: {}", url)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_from_url() {
        let url = Url::parse("https://example.com/datasets/weather/2024.csv").unwrap();
        assert_eq!(file_name(&url).unwrap(), "2024.csv");
    }

    #[test]
    fn test_file_name_rejects_bare_host() {
        let url = Url::parse("https://example.com/").unwrap();
        assert!(matches!(
            file_name(&url),
            Err(PipelineError::Config(_))
        ));
    }

    #[test]
    fn test_rejects_colliding_file_names() {
        let client = RemoteClient::try_new(crate::client::Auth::None).unwrap();
        let urls = vec![
            Url::parse("https://example.com/2023/data.csv").unwrap(),
            Url::parse("https://example.com/2024/data.csv").unwrap(),
        ];

        let temp = tempfile::TempDir::new().unwrap();
        let err = HttpSource::try_new(client, urls, temp.path()).unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[test]
    fn test_source_label_order_independent() {
        let client = RemoteClient::try_new(crate::client::Auth::None).unwrap();
        let a = Url::parse("https://example.com/a.csv").unwrap();
        let b = Url::parse("https://example.com/b.csv").unwrap();

        let temp = tempfile::TempDir::new().unwrap();
        let forward = HttpSource::try_new(
            client.clone(),
            vec![a.clone(), b.clone()],
            temp.path().join("x"),
        )
        .unwrap();
        let reverse =
            HttpSource::try_new(client, vec![b, a], temp.path().join("y")).unwrap();

        assert_eq!(forward.source_label(), reverse.source_label());
    }
}
