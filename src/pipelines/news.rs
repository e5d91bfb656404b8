use tracing::{debug, info};

use crate::config::{ALL_CATEGORY, DashboardConfig};
use crate::error::{DashboardError, Result};
use crate::fetch::{Body, HttpClient, Loaded, Loader, Source};
use crate::parser::parse_daily_counts;
use crate::payload::DashboardPayload;
use crate::stats::Series;

/// Builds the payload from a `date,count` export.
///
/// A file without a single dated row is rejected, so a host that answers a
/// missing file with an HTML page does not produce an empty chart.
pub fn build_from_csv(raw: &str, config: &DashboardConfig) -> Result<DashboardPayload> {
    let records = parse_daily_counts(raw)?;
    if records.is_empty() {
        return Err(DashboardError::InvalidPayload(
            "no dated rows in news mentions data".to_string(),
        ));
    }

    let series = Series::new(ALL_CATEGORY, records);
    debug!(days = series.len(), "Parsed news mentions series");

    let payload = DashboardPayload::from_series(&series, config);
    payload.validate()?;
    Ok(payload)
}

/// Accepts either the API document or CSV text.
pub fn decode(loaded: Loaded, config: &DashboardConfig) -> Result<DashboardPayload> {
    match loaded.body {
        Body::Json(value) => {
            let payload: DashboardPayload = serde_json::from_value(value)?;
            payload.validate()?;
            Ok(payload)
        }
        Body::Text(text) => build_from_csv(&text, config),
    }
}

/// The API endpoint (when configured) first, then the CSV under every data root.
pub fn sources(config: &DashboardConfig) -> Vec<Source> {
    let mut sources: Vec<Source> = config.sources.news_api().into_iter().collect();
    sources.extend(config.sources.candidates(&config.files.news_mentions));
    sources
}

#[tracing::instrument(skip_all)]
pub async fn load_news<C: HttpClient>(
    loader: &Loader<C>,
    config: &DashboardConfig,
) -> Result<DashboardPayload> {
    let payload = loader
        .load_any("news mentions data", &sources(config), |loaded| {
            decode(loaded, config)
        })
        .await?;

    info!(
        days = payload.series.len(),
        total = payload.summary.total_mentions,
        "News mentions ready"
    );
    Ok(payload)
}
