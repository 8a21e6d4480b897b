//! Raw forecast response as returned by the forecast endpoint.
//!
//! Series are parallel arrays indexed together. Values are nullable because
//! the provider emits `null` for hours/days it has no data for.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct RawForecastPayload {
    /// Offset of the location's local time; always sent with `timezone=auto`.
    pub utc_offset_seconds: i32,
    #[serde(default)]
    pub timezone: String,
    pub current_weather: RawCurrentWeather,
    pub hourly: RawHourly,
    pub daily: RawDaily,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCurrentWeather {
    pub temperature: f64,
    pub windspeed: f64,
    pub weathercode: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawHourly {
    pub time: Vec<String>,
    pub temperature_2m: Vec<Option<f64>>,
    pub apparent_temperature: Vec<Option<f64>>,
    pub relativehumidity_2m: Vec<Option<f64>>,
    pub windspeed_10m: Vec<Option<f64>>,
    pub precipitation_probability: Vec<Option<f64>>,
    pub weathercode: Vec<Option<i32>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawDaily {
    pub time: Vec<String>,
    pub weathercode: Vec<Option<i32>>,
    pub temperature_2m_max: Vec<Option<f64>>,
    pub temperature_2m_min: Vec<Option<f64>>,
    pub precipitation_probability_max: Vec<Option<f64>>,
}

impl RawHourly {
    /// Shortest of the parallel arrays.
    pub fn len(&self) -> usize {
        [
            self.time.len(),
            self.temperature_2m.len(),
            self.apparent_temperature.len(),
            self.relativehumidity_2m.len(),
            self.windspeed_10m.len(),
            self.precipitation_probability.len(),
            self.weathercode.len(),
        ]
        .into_iter()
        .min()
        .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RawDaily {
    /// Shortest of the parallel arrays.
    pub fn len(&self) -> usize {
        [
            self.time.len(),
            self.weathercode.len(),
            self.temperature_2m_max.len(),
            self.temperature_2m_min.len(),
            self.precipitation_probability_max.len(),
        ]
        .into_iter()
        .min()
        .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
