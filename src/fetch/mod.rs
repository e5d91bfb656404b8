//! Data source access: the HTTP seam and the ordered-fallback loader.

mod basic;
mod client;
mod loader;

pub use basic::BasicClient;
pub use client::HttpClient;
pub use loader::{Body, Loaded, Loader, Source, SourceFormat};

use crate::error::{DashboardError, Result};
use tracing::debug;

/// GETs `url` and returns the body as text.
///
/// # Errors
///
/// Any transport failure or non-2xx status is a [`DashboardError::Network`].
pub async fn fetch_text<C: HttpClient>(client: &C, url: &str) -> Result<String> {
    let parsed = url
        .parse::<reqwest::Url>()
        .map_err(|e| DashboardError::network(url, format!("invalid URL: {e}")))?;
    let req = reqwest::Request::new(reqwest::Method::GET, parsed);

    let resp = client
        .execute(req)
        .await
        .map_err(|e| DashboardError::network(url, e))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(DashboardError::network(url, format!("HTTP {status}")));
    }

    let text = resp
        .text()
        .await
        .map_err(|e| DashboardError::network(url, e))?;
    debug!(url, bytes = text.len(), "Fetched text");
    Ok(text)
}
