//! Turns a raw forecast payload into the provider-independent view model.
//!
//! Pure: no I/O, the caller supplies `now`.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Timelike, Utc};

use crate::{
    error::QueryError,
    model::{CurrentConditions, DayPoint, Details, HourPoint, Location, TimeOfDay},
    payload::{RawDaily, RawForecastPayload, RawHourly},
    weather_code::weather_info,
};

/// Days of history requested from the forecast endpoint.
pub const PAST_DAYS: usize = 7;
/// Days of forecast requested from the forecast endpoint.
pub const FORECAST_DAYS: usize = 7;
/// Length of the hourly strip, starting at the current hour.
pub const HOURS_AHEAD: usize = 24;

const HOURLY_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";
const DAILY_TIME_FORMAT: &str = "%Y-%m-%d";

pub fn normalize(
    payload: &RawForecastPayload,
    now: DateTime<Utc>,
    location: Location,
) -> Result<CurrentConditions, QueryError> {
    let offset = FixedOffset::east_opt(payload.utc_offset_seconds).ok_or_else(|| {
        malformed(format!("invalid utc offset {}s", payload.utc_offset_seconds))
    })?;
    let local_time = now.with_timezone(&offset);
    let local_hour = local_time.hour();
    let current_hour_index = PAST_DAYS * 24 + local_hour as usize;

    let hourly_len = payload.hourly.len();
    if hourly_len < current_hour_index + HOURS_AHEAD {
        return Err(malformed(format!(
            "hourly series has {hourly_len} entries, need {} from index {current_hour_index}",
            HOURS_AHEAD
        )));
    }

    let daily_len = payload.daily.len();
    if daily_len < PAST_DAYS + FORECAST_DAYS {
        return Err(malformed(format!(
            "daily series has {daily_len} entries, need {}",
            PAST_DAYS + FORECAST_DAYS
        )));
    }

    tracing::debug!(
        location = %location.name,
        utc_offset = payload.utc_offset_seconds,
        current_hour_index,
        "normalizing forecast"
    );

    let current = &payload.current_weather;

    let mut hourly = (current_hour_index..current_hour_index + HOURS_AHEAD)
        .map(|i| hour_point(&payload.hourly, i))
        .collect::<Result<Vec<_>, _>>()?;

    // The first hour is "now": keep it consistent with the live reading.
    if let Some(first) = hourly.first_mut() {
        first.temperature = current.temperature;
        first.wind_speed = current.windspeed;
        first.weather_code = current.weathercode;
        first.weather_info = weather_info(current.weathercode);
    }

    let mut past_week = (0..PAST_DAYS + FORECAST_DAYS)
        .map(|i| day_point(&payload.daily, i))
        .collect::<Result<Vec<_>, _>>()?;
    let next_week = past_week.split_off(PAST_DAYS);

    // The current block has no humidity or precipitation, so the panel is
    // read from the hourly series.
    let details = Details {
        humidity: value(
            &payload.hourly.relativehumidity_2m,
            current_hour_index,
            "relativehumidity_2m",
        )?,
        apparent_temperature: value(
            &payload.hourly.apparent_temperature,
            current_hour_index,
            "apparent_temperature",
        )?,
        precip_prob: optional(&payload.hourly.precipitation_probability, current_hour_index),
    };

    Ok(CurrentConditions {
        location,
        timezone: payload.timezone.clone(),
        local_time,
        time_of_day: TimeOfDay::from_hour(local_hour),
        temperature: current.temperature,
        wind_speed: current.windspeed,
        weather_code: current.weathercode,
        weather_info: weather_info(current.weathercode),
        details,
        hourly,
        past_week,
        next_week,
    })
}

fn hour_point(hourly: &RawHourly, i: usize) -> Result<HourPoint, QueryError> {
    let weather_code = value(&hourly.weathercode, i, "hourly weathercode")?;

    Ok(HourPoint {
        time: parse_hour(&hourly.time[i])?,
        temperature: value(&hourly.temperature_2m, i, "temperature_2m")?,
        apparent_temperature: value(&hourly.apparent_temperature, i, "apparent_temperature")?,
        humidity: value(&hourly.relativehumidity_2m, i, "relativehumidity_2m")?,
        wind_speed: value(&hourly.windspeed_10m, i, "windspeed_10m")?,
        precipitation_probability: optional(&hourly.precipitation_probability, i),
        weather_code,
        weather_info: weather_info(weather_code),
    })
}

fn day_point(daily: &RawDaily, i: usize) -> Result<DayPoint, QueryError> {
    let weather_code = value(&daily.weathercode, i, "daily weathercode")?;

    Ok(DayPoint {
        date: parse_day(&daily.time[i])?,
        weather_code,
        weather_info: weather_info(weather_code),
        max_temp: value(&daily.temperature_2m_max, i, "temperature_2m_max")?,
        min_temp: value(&daily.temperature_2m_min, i, "temperature_2m_min")?,
        precip_prob_max: optional(&daily.precipitation_probability_max, i),
    })
}

fn value<T: Copy>(series: &[Option<T>], i: usize, name: &str) -> Result<T, QueryError> {
    optional(series, i).ok_or_else(|| malformed(format!("{name} has no value at index {i}")))
}

fn optional<T: Copy>(series: &[Option<T>], i: usize) -> Option<T> {
    series.get(i).copied().flatten()
}

fn parse_hour(raw: &str) -> Result<NaiveDateTime, QueryError> {
    NaiveDateTime::parse_from_str(raw, HOURLY_TIME_FORMAT)
        .map_err(|e| malformed(format!("bad hourly timestamp '{raw}': {e}")))
}

fn parse_day(raw: &str) -> Result<NaiveDate, QueryError> {
    NaiveDate::parse_from_str(raw, DAILY_TIME_FORMAT)
        .map_err(|e| malformed(format!("bad daily date '{raw}': {e}")))
}

fn malformed(msg: String) -> QueryError {
    QueryError::MalformedPayload(msg)
}
