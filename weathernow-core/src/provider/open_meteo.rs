//! Open-Meteo geocoding and forecast client. No API key required.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;

use crate::{
    QueryError,
    model::Location,
    normalize::{FORECAST_DAYS, PAST_DAYS},
    payload::RawForecastPayload,
};

use super::{ForecastFetcher, GeoResolver, truncate_body};

const USER_AGENT: &str = concat!("weathernow/", env!("CARGO_PKG_VERSION"));

const HOURLY_VARIABLES: &str = "temperature_2m,precipitation_probability,weathercode,relativehumidity_2m,apparent_temperature,windspeed_10m";
const DAILY_VARIABLES: &str =
    "weathercode,temperature_2m_max,temperature_2m_min,precipitation_probability_max";

#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    http: Client,
    geocoding_url: String,
    forecast_url: String,
}

impl OpenMeteoClient {
    pub fn new(
        geocoding_url: &str,
        forecast_url: &str,
        timeout: Duration,
    ) -> Result<Self, QueryError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(QueryError::from_transport)?;

        Ok(Self {
            http,
            geocoding_url: geocoding_url.to_string(),
            forecast_url: forecast_url.to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        what: &str,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, QueryError> {
        tracing::debug!("Open-Meteo {what} request: {url} {query:?}");

        let res = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(QueryError::from_transport)?;

        let status = res.status();
        let body = res.text().await.map_err(QueryError::from_transport)?;

        if !status.is_success() {
            return Err(QueryError::Upstream(format!(
                "{what} request failed with status {status}: {}",
                truncate_body(&body)
            )));
        }

        serde_json::from_str(&body)
            .map_err(|e| QueryError::Upstream(format!("failed to parse {what} response: {e}")))
    }
}

#[derive(Debug, Deserialize)]
struct GeoResponse {
    #[serde(default)]
    results: Vec<GeoCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeoCandidate {
    name: String,
    #[serde(default)]
    country: String,
    latitude: f64,
    longitude: f64,
}

#[async_trait]
impl GeoResolver for OpenMeteoClient {
    async fn resolve(&self, query: &str) -> Result<Location, QueryError> {
        let parsed: GeoResponse = self
            .get_json("geocoding", &self.geocoding_url, &[("name", query.to_string())])
            .await?;

        let first = parsed
            .results
            .into_iter()
            .next()
            .ok_or_else(|| QueryError::NotFound(query.to_string()))?;

        let location = Location {
            name: first.name,
            country: first.country,
            latitude: first.latitude,
            longitude: first.longitude,
        };
        tracing::info!(
            "Resolved '{query}' to {}, {} ({}, {})",
            location.name,
            location.country,
            location.latitude,
            location.longitude
        );

        Ok(location)
    }
}

#[async_trait]
impl ForecastFetcher for OpenMeteoClient {
    async fn fetch(&self, location: &Location) -> Result<RawForecastPayload, QueryError> {
        let query = [
            ("latitude", location.latitude.to_string()),
            ("longitude", location.longitude.to_string()),
            ("current_weather", "true".to_string()),
            ("hourly", HOURLY_VARIABLES.to_string()),
            ("daily", DAILY_VARIABLES.to_string()),
            ("timezone", "auto".to_string()),
            ("past_days", PAST_DAYS.to_string()),
            ("forecast_days", FORECAST_DAYS.to_string()),
        ];

        self.get_json("forecast", &self.forecast_url, &query).await
    }
}
