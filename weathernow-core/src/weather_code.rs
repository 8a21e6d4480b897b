//! WMO weather code lookup.
//! See: https://open-meteo.com/en/docs#weathervariables

use serde::Serialize;

/// Icon and human label for a weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeatherCodeInfo {
    pub icon: &'static str,
    pub label: &'static str,
}

const fn info(icon: &'static str, label: &'static str) -> WeatherCodeInfo {
    WeatherCodeInfo { icon, label }
}

const CLEAR_SKY: WeatherCodeInfo = info("☀️", "Clear sky");

static TABLE: &[(i32, WeatherCodeInfo)] = &[
    (0, CLEAR_SKY),
    (1, info("🌤️", "Mainly clear")),
    (2, info("⛅", "Partly cloudy")),
    (3, info("☁️", "Overcast")),
    (45, info("🌫️", "Foggy")),
    (48, info("❄️", "Freezing fog")),
    (51, info("🌧️", "Light drizzle")),
    (53, info("🌧️", "Moderate drizzle")),
    (55, info("🌧️", "Heavy drizzle")),
    (56, info("🌧️", "Light freezing drizzle")),
    (57, info("🌧️", "Dense freezing drizzle")),
    (61, info("🌧️", "Light rain")),
    (63, info("🌧️", "Moderate rain")),
    (65, info("🌧️", "Heavy rain")),
    (66, info("🌧️", "Light freezing rain")),
    (67, info("🌧️", "Heavy freezing rain")),
    (71, info("🌨️", "Light snow")),
    (73, info("🌨️", "Moderate snow")),
    (75, info("🌨️", "Heavy snow")),
    (77, info("❄️", "Snow grains")),
    (80, info("🌦️", "Light showers")),
    (81, info("🌦️", "Moderate showers")),
    (82, info("🌦️", "Heavy showers")),
    (85, info("🌨️", "Light snow showers")),
    (86, info("🌨️", "Heavy snow showers")),
    (95, info("⛈️", "Thunderstorm")),
    (96, info("⛈️", "Thunderstorm with light hail")),
    (99, info("⛈️", "Thunderstorm with heavy hail")),
];

/// Look up a weather code. Codes missing from the table resolve to the
/// code-0 ("Clear sky") entry.
pub fn weather_info(code: i32) -> WeatherCodeInfo {
    TABLE
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, info)| *info)
        .unwrap_or(CLEAR_SKY)
}
