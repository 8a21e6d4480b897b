use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::weather_code::WeatherCodeInfo;

/// A geocoded place, as picked from the geocoding results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourPoint {
    pub time: NaiveDateTime,
    pub temperature: f64,
    pub apparent_temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub precipitation_probability: Option<f64>,
    pub weather_code: i32,
    pub weather_info: WeatherCodeInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayPoint {
    pub date: NaiveDate,
    pub weather_code: i32,
    pub weather_info: WeatherCodeInfo,
    pub max_temp: f64,
    pub min_temp: f64,
    pub precip_prob_max: Option<f64>,
}

/// "Feels like" panel, read from the hourly series at the current hour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Details {
    pub humidity: f64,
    pub apparent_temperature: f64,
    pub precip_prob: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Day,
    Night,
}

impl TimeOfDay {
    /// Day between 06:00 and 17:59 local time.
    pub fn from_hour(hour: u32) -> Self {
        if (6..18).contains(&hour) { Self::Day } else { Self::Night }
    }
}

/// View model handed to the rendering layer after a successful lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentConditions {
    pub location: Location,
    pub timezone: String,
    pub local_time: DateTime<FixedOffset>,
    pub time_of_day: TimeOfDay,
    pub temperature: f64,
    pub wind_speed: f64,
    pub weather_code: i32,
    pub weather_info: WeatherCodeInfo,
    pub details: Details,
    pub hourly: Vec<HourPoint>,
    pub past_week: Vec<DayPoint>,
    pub next_week: Vec<DayPoint>,
}

impl CurrentConditions {
    /// Today's entry of the upcoming week (high/low for the headline).
    pub fn today(&self) -> Option<&DayPoint> {
        self.next_week.first()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentSearchEntry {
    pub name: String,
    pub country: String,
}

impl From<&Location> for RecentSearchEntry {
    fn from(location: &Location) -> Self {
        Self {
            name: location.name.clone(),
            country: location.country.clone(),
        }
    }
}
