use std::{fmt, sync::Arc};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{CustomType, InquireError, Select, Text};
use weathernow_core::{
    Config, FileStorage, RecentSearchEntry, RecentSearchStore, WeatherQuery, query_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weathernow", version, about = "Current weather and forecasts for any city")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show weather for a city.
    Show {
        /// City name, e.g. "Paris" or "New York".
        #[arg(required = true, num_args = 1..)]
        city: Vec<String>,

        /// Print the view model as JSON.
        #[arg(long)]
        json: bool,

        /// Also list the past seven days.
        #[arg(long)]
        past_week: bool,
    },

    /// List recent searches.
    Recent,

    /// Search repeatedly, picking from recent searches.
    Interactive,

    /// Edit endpoints and request timeout.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Show { city, json, past_week } => {
                let config = Config::load()?;
                tracing::debug!(?config, "loaded configuration");
                show(&config, &city.join(" "), json, past_week).await
            }
            Command::Recent => {
                let config = Config::load()?;
                recent(&config)
            }
            Command::Interactive => {
                let config = Config::load()?;
                tracing::debug!(?config, "loaded configuration");
                interactive(&config).await
            }
            Command::Configure => configure(),
        }
    }
}

async fn show(config: &Config, city: &str, json: bool, past_week: bool) -> anyhow::Result<()> {
    let query = Arc::new(query_from_config(config)?);

    // Ctrl-C drops whatever the lookup was doing.
    let on_interrupt = query.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.shutdown();
        }
    });

    match query.query(city).await {
        Ok(conditions) if json => {
            let out = serde_json::to_string_pretty(&conditions)
                .context("Failed to serialize weather as JSON")?;
            println!("{out}");
        }
        Ok(conditions) => println!("{}", render::conditions(&conditions, past_week)),
        Err(e) if e.is_silent() => {}
        Err(e) => bail!(e.user_message()),
    }

    Ok(())
}

fn recent(config: &Config) -> anyhow::Result<()> {
    let store = RecentSearchStore::open(Box::new(FileStorage::new(config.recent_searches_path()?)));

    if store.entries().is_empty() {
        println!("No recent searches.");
    }
    for entry in store.entries() {
        println!("{}", render::recent_label(entry));
    }

    Ok(())
}

enum Choice {
    Recent(RecentSearchEntry),
    NewSearch,
    Quit,
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::Recent(entry) => f.write_str(&render::recent_label(entry)),
            Choice::NewSearch => f.write_str("Search for a city..."),
            Choice::Quit => f.write_str("Quit"),
        }
    }
}

/// `None` when the user backs out of the prompt.
fn prompted<T>(result: Result<T, InquireError>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn interactive(config: &Config) -> anyhow::Result<()> {
    let query = query_from_config(config)?;

    loop {
        let recent = query.recent_searches();
        let city = if recent.is_empty() {
            match prompted(Text::new("City:").prompt())? {
                Some(city) => city,
                None => break,
            }
        } else {
            let mut options: Vec<Choice> = recent.into_iter().map(Choice::Recent).collect();
            options.push(Choice::NewSearch);
            options.push(Choice::Quit);

            match prompted(Select::new("Weather for:", options).prompt())? {
                Some(Choice::Recent(entry)) => entry.name,
                Some(Choice::NewSearch) => match prompted(Text::new("City:").prompt())? {
                    Some(city) => city,
                    None => continue,
                },
                Some(Choice::Quit) | None => break,
            }
        };

        lookup_and_print(&query, &city).await;
    }

    Ok(())
}

async fn lookup_and_print(query: &WeatherQuery, city: &str) {
    if !city.trim().is_empty() {
        eprintln!("Searching...");
    }

    match query.query(city).await {
        Ok(conditions) => println!("{}\n", render::conditions(&conditions, false)),
        Err(e) if e.is_silent() => {}
        Err(e) => eprintln!("{}\n", e.user_message()),
    }
}

fn configure() -> anyhow::Result<()> {
    let path = Config::config_file_path()?;
    let mut config = Config::load_from(&path)?;

    config.geocoding_url = Text::new("Geocoding endpoint:")
        .with_default(&config.geocoding_url)
        .prompt()?;
    config.forecast_url = Text::new("Forecast endpoint:")
        .with_default(&config.forecast_url)
        .prompt()?;
    config.request_timeout_secs = CustomType::<u64>::new("Request timeout (seconds):")
        .with_default(config.request_timeout_secs)
        .with_error_message("Please enter a whole number of seconds")
        .prompt()?;

    config.save_to(&path)?;
    println!("Saved configuration to {}", path.display());

    Ok(())
}
