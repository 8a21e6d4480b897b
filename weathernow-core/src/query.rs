//! The one "look up a city" operation exposed to the rendering layer.
//!
//! Geocoding and forecast calls run strictly in sequence, then the payload is
//! normalized. Only one lookup is honored at a time: a lookup issued while
//! another is in flight fails fast with [`QueryError::Busy`].

use chrono::Utc;
use parking_lot::Mutex;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::{
    QueryError,
    model::{CurrentConditions, RecentSearchEntry},
    normalize::normalize,
    provider::{ForecastFetcher, GeoResolver},
    recent::RecentSearchStore,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum QueryState {
    #[default]
    Idle,
    Searching,
    Succeeded,
    Failed { message: String },
}

impl QueryState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Searching)
    }
}

pub struct WeatherQuery {
    geo: Arc<dyn GeoResolver>,
    forecast: Arc<dyn ForecastFetcher>,
    recent: Mutex<RecentSearchStore>,
    current: Mutex<Option<CurrentConditions>>,
    state_tx: watch::Sender<QueryState>,
    recent_tx: watch::Sender<Vec<RecentSearchEntry>>,
    in_flight: AtomicBool,
    shutdown: CancellationToken,
}

impl std::fmt::Debug for WeatherQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherQuery")
            .field("geo", &self.geo)
            .field("forecast", &self.forecast)
            .field("state", &*self.state_tx.borrow())
            .finish_non_exhaustive()
    }
}

/// Clears the in-flight flag however the lookup ends, including when the
/// future is dropped.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl WeatherQuery {
    pub fn new(
        geo: Arc<dyn GeoResolver>,
        forecast: Arc<dyn ForecastFetcher>,
        recent: RecentSearchStore,
    ) -> Self {
        let (state_tx, _) = watch::channel(QueryState::Idle);
        let (recent_tx, _) = watch::channel(recent.entries().to_vec());

        Self {
            geo,
            forecast,
            recent: Mutex::new(recent),
            current: Mutex::new(None),
            state_tx,
            recent_tx,
            in_flight: AtomicBool::new(false),
            shutdown: CancellationToken::new(),
        }
    }

    /// Look up `city` and return the normalized view model.
    ///
    /// On success the resolved place is recorded as a recent search. On
    /// failure the previous view model is cleared and recent searches are
    /// left untouched.
    pub async fn query(&self, city: &str) -> Result<CurrentConditions, QueryError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(QueryError::EmptyQuery);
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            tracing::debug!("Ignoring '{city}': a search is already in progress");
            return Err(QueryError::Busy);
        }
        let _guard = InFlight(&self.in_flight);

        if self.shutdown.is_cancelled() {
            return Err(QueryError::Cancelled);
        }

        self.state_tx.send_replace(QueryState::Searching);

        let outcome = tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => Err(QueryError::Cancelled),
            result = self.lookup(city) => result,
        };

        match outcome {
            Ok(conditions) => {
                let entry = RecentSearchEntry::from(&conditions.location);
                // Synchronous on purpose: the list is at most three entries,
                // and it must be on disk before the lookup reports success.
                let entries = self.recent.lock().record(entry).to_vec();
                self.recent_tx.send_replace(entries);

                *self.current.lock() = Some(conditions.clone());
                self.state_tx.send_replace(QueryState::Succeeded);

                tracing::info!(
                    "Weather for {}, {}: {} {}",
                    conditions.location.name,
                    conditions.location.country,
                    conditions.temperature,
                    conditions.weather_info.label
                );
                Ok(conditions)
            }
            Err(err) => {
                *self.current.lock() = None;
                self.state_tx.send_replace(QueryState::Failed {
                    message: err.user_message(),
                });

                tracing::debug!("Lookup for '{city}' failed: {err}");
                Err(err)
            }
        }
    }

    async fn lookup(&self, city: &str) -> Result<CurrentConditions, QueryError> {
        let location = self.geo.resolve(city).await?;
        let payload = self.forecast.fetch(&location).await?;
        normalize(&payload, Utc::now(), location)
    }

    /// Cancel any in-flight lookup and refuse new ones. The cancelled lookup
    /// resolves to [`QueryError::Cancelled`] and writes nothing.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    pub fn state(&self) -> QueryState {
        self.state_tx.borrow().clone()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<QueryState> {
        self.state_tx.subscribe()
    }

    /// Last successful view model, if the latest lookup succeeded.
    pub fn current(&self) -> Option<CurrentConditions> {
        self.current.lock().clone()
    }

    pub fn recent_searches(&self) -> Vec<RecentSearchEntry> {
        self.recent_tx.borrow().clone()
    }

    /// Fires whenever the recent-search list changes.
    pub fn subscribe_recent(&self) -> watch::Receiver<Vec<RecentSearchEntry>> {
        self.recent_tx.subscribe()
    }
}
