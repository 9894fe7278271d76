//! Remote document download.

use std::io::Write;

use anyhow::{bail, Context, Result};
use url::Url;

/// Downloads a remote document into a writer.
pub trait Fetcher {
    fn fetch(&self, url: &Url, dest: &mut dyn Write) -> Result<()>;
}

/// Blocking HTTP(S) fetcher.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpFetcher;

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &Url, dest: &mut dyn Write) -> Result<()> {
        tracing::debug!("GET {}", url);

        let response = reqwest::blocking::get(url.as_str())
            .with_context(|| format!("request to {} failed", url))?;

        if !response.status().is_success() {
            bail!("HTTP {}", response.status());
        }

        let body = response
            .bytes()
            .with_context(|| "failed to read response body")?;

        dest.write_all(&body)
            .with_context(|| "failed to write downloaded spec")?;
        dest.flush()?;

        tracing::debug!("downloaded {} bytes from {}", body.len(), url);
        Ok(())
    }
}
