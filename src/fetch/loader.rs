use serde_json::Value;
use tracing::{info, warn};

use super::{HttpClient, fetch_text};
use crate::error::{DashboardError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// A pre-aggregated JSON document.
    Json,
    /// Delimited text for the parser.
    Text,
}

/// One place a dataset may be found: an HTTP(S) URL or a local path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub location: String,
    pub format: SourceFormat,
}

impl Source {
    pub fn json(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            format: SourceFormat::Json,
        }
    }

    pub fn text(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            format: SourceFormat::Text,
        }
    }

    pub fn is_remote(&self) -> bool {
        self.location.starts_with("http://") || self.location.starts_with("https://")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(Value),
    Text(String),
}

/// A successfully read source.
#[derive(Debug, Clone)]
pub struct Loaded {
    pub source: Source,
    pub body: Body,
}

impl Loaded {
    /// The body as text; JSON bodies are re-serialized.
    pub fn into_text(self) -> String {
        match self.body {
            Body::Text(text) => text,
            Body::Json(value) => value.to_string(),
        }
    }
}

/// Tries sources in order until one both reads and decodes.
pub struct Loader<C> {
    client: C,
}

impl<C: HttpClient> Loader<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Reads a single source without any fallback.
    pub async fn fetch(&self, source: &Source) -> Result<Loaded> {
        let raw = if source.is_remote() {
            fetch_text(&self.client, &source.location).await?
        } else {
            tokio::fs::read_to_string(&source.location)
                .await
                .map_err(|e| DashboardError::network(&source.location, e))?
        };

        let body = match source.format {
            SourceFormat::Json => Body::Json(serde_json::from_str(&raw)?),
            SourceFormat::Text => Body::Text(raw),
        };

        Ok(Loaded {
            source: source.clone(),
            body,
        })
    }

    /// Tries `primary`, then each of `fallbacks` in declared order.
    pub async fn load<T, F>(
        &self,
        what: &str,
        primary: &Source,
        fallbacks: &[Source],
        decode: F,
    ) -> Result<T>
    where
        F: Fn(Loaded) -> Result<T>,
    {
        let mut sources = Vec::with_capacity(fallbacks.len() + 1);
        sources.push(primary.clone());
        sources.extend_from_slice(fallbacks);
        self.load_any(what, &sources, decode).await
    }

    /// Returns the first decoded value among `sources`.
    ///
    /// Fetch failures, bad JSON and rejected payloads move on to the next
    /// source. Parse errors are returned as-is. Running out of sources yields
    /// [`DashboardError::DataUnavailable`].
    #[tracing::instrument(skip(self, sources, decode), fields(source_count = sources.len()))]
    pub async fn load_any<T, F>(&self, what: &str, sources: &[Source], decode: F) -> Result<T>
    where
        F: Fn(Loaded) -> Result<T>,
    {
        let mut attempts = Vec::with_capacity(sources.len());

        for source in sources {
            attempts.push(source.location.clone());

            let outcome = match self.fetch(source).await {
                Ok(loaded) => decode(loaded),
                Err(e) => Err(e),
            };

            match outcome {
                Ok(value) => {
                    info!(source = %source.location, "Loaded {what}");
                    return Ok(value);
                }
                Err(e) if e.is_source_failure() => {
                    warn!(source = %source.location, error = %e, "Source failed, trying next");
                }
                Err(e) => return Err(e),
            }
        }

        Err(DashboardError::DataUnavailable {
            message: format!("Unable to load {what}"),
            attempts,
        })
    }

    /// [`Loader::load_any`] returning the raw text of the first readable source.
    pub async fn load_text(&self, what: &str, sources: &[Source]) -> Result<String> {
        self.load_any(what, sources, |loaded| Ok(loaded.into_text()))
            .await
    }
}
