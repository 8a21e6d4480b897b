//! Core library for the `weathernow` CLI.
//!
//! This crate defines:
//! - Configuration handling
//! - Geocoding and forecast retrieval over Open-Meteo
//! - Normalization of raw forecasts into a view model
//! - The bounded recent-searches list
//! - The single-flight query orchestrator tying these together
//!
//! It is used by `weathernow-cli`, but any front end can drive [`WeatherQuery`]
//! and render the [`CurrentConditions`] it returns.

pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod payload;
pub mod provider;
pub mod query;
pub mod recent;
pub mod weather_code;

pub use config::Config;
pub use error::QueryError;
pub use model::{CurrentConditions, DayPoint, Details, HourPoint, Location, RecentSearchEntry, TimeOfDay};
pub use normalize::normalize;
pub use payload::RawForecastPayload;
pub use provider::{ForecastFetcher, GeoResolver, OpenMeteoClient, provider_from_config};
pub use query::{QueryState, WeatherQuery};
pub use recent::{FileStorage, MemoryStorage, RecentSearchStore, SearchStorage};
pub use weather_code::{WeatherCodeInfo, weather_info};

use std::sync::Arc;

/// Wire up the Open-Meteo client and file-backed recent searches from config.
pub fn query_from_config(config: &Config) -> anyhow::Result<WeatherQuery> {
    let client = Arc::new(provider_from_config(config)?);
    let storage = FileStorage::new(config.recent_searches_path()?);
    tracing::debug!("Recent searches stored at {}", storage.path().display());

    Ok(WeatherQuery::new(
        client.clone(),
        client,
        RecentSearchStore::open(Box::new(storage)),
    ))
}
