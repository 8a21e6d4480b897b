use async_trait::async_trait;
use std::fmt::Debug;

use crate::{Config, QueryError, model::Location, payload::RawForecastPayload};

pub mod open_meteo;

pub use open_meteo::OpenMeteoClient;

/// Maps free text to a single place.
#[async_trait]
pub trait GeoResolver: Send + Sync + Debug {
    /// Picks the first candidate as returned by the provider, without
    /// re-ranking. Fails with `NotFound` when there are none.
    async fn resolve(&self, query: &str) -> Result<Location, QueryError>;
}

/// Retrieves current, hourly and daily data around a place.
#[async_trait]
pub trait ForecastFetcher: Send + Sync + Debug {
    async fn fetch(&self, location: &Location) -> Result<RawForecastPayload, QueryError>;
}

/// Construct the Open-Meteo client described by the config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<OpenMeteoClient> {
    config.validate()?;
    Ok(OpenMeteoClient::new(
        &config.geocoding_url,
        &config.forecast_url,
        config.request_timeout(),
    )?)
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
