//! Plain-text rendering of the view model.

use weathernow_core::{CurrentConditions, DayPoint, HourPoint, RecentSearchEntry, TimeOfDay};

/// Decorative strip drawn above the headline, picked from the weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backdrop {
    Rain,
    Clouds,
}

impl Backdrop {
    pub fn for_code(code: i32) -> Option<Self> {
        match code {
            51..=65 => Some(Self::Rain),
            0..=3 => Some(Self::Clouds),
            _ => None,
        }
    }

    fn strip(self) -> &'static str {
        match self {
            Self::Rain => "  ╎  ╎   ╎ ╎   ╎  ╎   ╎ ╎  ╎   ╎  ",
            Self::Clouds => "    ☁️            ☁️          ☁️     ",
        }
    }
}

pub fn place(name: &str, country: &str) -> String {
    if country.is_empty() {
        name.to_string()
    } else {
        format!("{name}, {country}")
    }
}

pub fn recent_label(entry: &RecentSearchEntry) -> String {
    place(&entry.name, &entry.country)
}

fn temp(t: f64) -> String {
    format!("{}°", t.round() as i64)
}

fn percent(p: Option<f64>) -> String {
    match p {
        Some(p) => format!("{}%", p.round() as i64),
        None => "–".to_string(),
    }
}

fn hour_line(hour: &HourPoint) -> String {
    format!(
        "  {}  {:<3} {:>5}  {:>4}",
        hour.time.format("%H:%M"),
        hour.weather_info.icon,
        temp(hour.temperature),
        percent(hour.precipitation_probability)
    )
}

fn day_line(day: &DayPoint) -> String {
    format!(
        "  {}  {:<3} {:>5} / {:<5} {:>4}  {}",
        day.date.format("%a %d %b"),
        day.weather_info.icon,
        temp(day.max_temp),
        temp(day.min_temp),
        percent(day.precip_prob_max),
        day.weather_info.label
    )
}

pub fn conditions(c: &CurrentConditions, past_week: bool) -> String {
    let mut lines = Vec::new();

    if let Some(backdrop) = Backdrop::for_code(c.weather_code) {
        lines.push(backdrop.strip().to_string());
    }

    lines.push(place(&c.location.name, &c.location.country));
    let period = match c.time_of_day {
        TimeOfDay::Day => "day",
        TimeOfDay::Night => "night",
    };
    lines.push(format!(
        "{} ({}, {period})",
        c.local_time.format("%a %d %b %H:%M"),
        if c.timezone.is_empty() { "local time" } else { c.timezone.as_str() }
    ));
    lines.push(String::new());
    lines.push(format!(
        "  {}  {}  {}",
        c.weather_info.icon,
        temp(c.temperature),
        c.weather_info.label
    ));
    if let Some(today) = c.today() {
        lines.push(format!("  H: {}  L: {}", temp(today.max_temp), temp(today.min_temp)));
    }

    lines.push(String::new());
    lines.push(format!("  🌡️ Feels like     {}", temp(c.details.apparent_temperature)));
    lines.push(format!("  💧 Humidity       {}", percent(Some(c.details.humidity))));
    lines.push(format!("  💨 Wind           {:.0} km/h", c.wind_speed));
    lines.push(format!("  ☔ Precipitation  {}", percent(c.details.precip_prob)));

    lines.push(String::new());
    lines.push("Next 24 hours".to_string());
    lines.extend(c.hourly.iter().map(hour_line));

    lines.push(String::new());
    lines.push("Next 7 days".to_string());
    lines.extend(c.next_week.iter().map(day_line));

    if past_week {
        lines.push(String::new());
        lines.push("Past 7 days".to_string());
        lines.extend(c.past_week.iter().map(day_line));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset, NaiveDate, TimeZone};
    use weathernow_core::{Details, Location, weather_info};

    fn day(offset: i64, code: i32, max_temp: f64, min_temp: f64) -> DayPoint {
        DayPoint {
            date: NaiveDate::from_ymd_opt(2024, 6, 8).unwrap() + Duration::days(offset),
            weather_code: code,
            weather_info: weather_info(code),
            max_temp,
            min_temp,
            precip_prob_max: Some(10.0),
        }
    }

    fn sample(weather_code: i32) -> CurrentConditions {
        let start = NaiveDate::from_ymd_opt(2024, 6, 8)
            .unwrap()
            .and_hms_opt(14, 0, 0)
            .unwrap();
        CurrentConditions {
            location: Location {
                name: "Paris".into(),
                country: "France".into(),
                latitude: 48.85,
                longitude: 2.35,
            },
            timezone: "Europe/Paris".into(),
            local_time: FixedOffset::east_opt(7200)
                .unwrap()
                .with_ymd_and_hms(2024, 6, 8, 14, 5, 0)
                .unwrap(),
            time_of_day: TimeOfDay::Day,
            temperature: 18.4,
            wind_speed: 9.7,
            weather_code,
            weather_info: weather_info(weather_code),
            details: Details {
                humidity: 61.0,
                apparent_temperature: 17.2,
                precip_prob: None,
            },
            hourly: (0..24)
                .map(|i| HourPoint {
                    time: start + Duration::hours(i),
                    temperature: 18.0,
                    apparent_temperature: 17.0,
                    humidity: 60.0,
                    wind_speed: 9.0,
                    precipitation_probability: Some(20.0),
                    weather_code,
                    weather_info: weather_info(weather_code),
                })
                .collect(),
            past_week: (-7..0).map(|i| day(i, 95, 31.0, 21.0)).collect(),
            next_week: std::iter::once(day(0, 3, 27.4, 12.6))
                .chain((1..7).map(|i| day(i, 80, 40.0, 30.0)))
                .collect(),
        }
    }

    #[test]
    fn past_week_only_with_flag() {
        let without = conditions(&sample(3), false);
        assert!(!without.contains("Past 7 days"));
        assert!(!without.contains("Thunderstorm"));

        let with = conditions(&sample(3), true);
        assert!(with.contains("Past 7 days"));
        assert_eq!(with.matches("Thunderstorm").count(), 7);
    }

    #[test]
    fn headline_uses_todays_high_and_low() {
        let out = conditions(&sample(3), false);

        assert!(out.contains("Paris, France"));
        assert!(out.contains("☁️  18°  Overcast"));
        assert!(out.contains("H: 27°  L: 13°"), "{out}");
    }

    #[test]
    fn details_panel_and_sections() {
        let out = conditions(&sample(3), false);

        assert!(out.contains("Feels like     17°"));
        assert!(out.contains("Humidity       61%"));
        assert!(out.contains("Wind           10 km/h"));
        assert!(out.contains("Precipitation  –"));
        assert!(out.contains("Sat 08 Jun 14:05 (Europe/Paris, day)"));

        let lines: Vec<&str> = out.lines().collect();
        let hours = lines.iter().position(|l| *l == "Next 24 hours").unwrap();
        let days = lines.iter().position(|l| *l == "Next 7 days").unwrap();
        // 24 hour lines plus a blank separator.
        assert_eq!(days - hours, 26);
        assert_eq!(lines.len() - days - 1, 7);
        assert!(lines[hours + 1].contains("14:00"));
    }

    #[test]
    fn backdrop_strip_tops_the_output() {
        let rain = conditions(&sample(61), false);
        assert_eq!(rain.lines().next(), Some(Backdrop::Rain.strip()));

        let clouds = conditions(&sample(2), false);
        assert_eq!(clouds.lines().next(), Some(Backdrop::Clouds.strip()));

        let fog = conditions(&sample(45), false);
        assert_eq!(fog.lines().next(), Some("Paris, France"));
    }

    #[test]
    fn backdrop_follows_weather_code() {
        assert_eq!(Backdrop::for_code(0), Some(Backdrop::Clouds));
        assert_eq!(Backdrop::for_code(3), Some(Backdrop::Clouds));
        assert_eq!(Backdrop::for_code(45), None);
        assert_eq!(Backdrop::for_code(51), Some(Backdrop::Rain));
        assert_eq!(Backdrop::for_code(65), Some(Backdrop::Rain));
        assert_eq!(Backdrop::for_code(71), None);
        assert_eq!(Backdrop::for_code(-1), None);
    }

    #[test]
    fn place_omits_missing_country() {
        assert_eq!(place("Paris", "France"), "Paris, France");
        assert_eq!(place("Null Island", ""), "Null Island");
    }

    #[test]
    fn numbers_are_rounded() {
        assert_eq!(temp(21.6), "22°");
        assert_eq!(temp(-0.4), "0°");
        assert_eq!(percent(Some(4.5)), "5%");
        assert_eq!(percent(None), "–");
    }
}
