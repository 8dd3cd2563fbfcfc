//! Session controller: the stateful orchestrator of the search-and-forecast
//! flow.
//!
//! Keystrokes feed a debouncer which resolves candidate locations; selecting a
//! candidate fetches the forecast and persists the city; cold start replays
//! the persisted (or default) city. The rendering surface binds to
//! [`SessionState`] snapshots and the `on_*` operations.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use parking_lot::Mutex;

use harmattan_weather::{ForecastPayload, Location, WeatherClient};

use crate::config::Config;
use crate::debounce::Debouncer;
use crate::store::CityStore;

/// Queries of this many characters or fewer never reach the resolver.
const MIN_QUERY_CHARS: usize = 2;

/// Lifecycle phase of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// Startup only: persisted-city read issued, first fetch not yet applied.
    AwaitingFirstForecast,
    Searching,
    Loading,
    Ready,
}

/// UI-relevant state, mutated only through controller operations.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub phase: Phase,
    /// Whether the search input affordance is shown.
    pub search_active: bool,
    /// Candidate locations for the current query, in provider order.
    pub candidates: Vec<Location>,
    /// Last successfully fetched forecast. Replaced atomically as a whole.
    pub forecast: Option<ForecastPayload>,
    /// True from the moment a forecast fetch begins until its result applies.
    pub loading: bool,
    /// User-facing message from the most recent failed fetch, if any.
    pub last_error: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            search_active: false,
            candidates: Vec::new(),
            forecast: None,
            loading: false,
            last_error: None,
        }
    }
}

struct Inner {
    client: WeatherClient,
    store: CityStore,
    state: Mutex<SessionState>,
    /// Tags resolver calls so only the newest response is applied.
    search_seq: AtomicU64,
    days: u8,
    default_city: String,
}

/// Orchestrates the search-and-forecast data flow.
///
/// Cheap to clone; all clones share the same state and debounce timer. Must be
/// created from within a tokio runtime (the debounce task is spawned at
/// construction so the quiet window is shared across the controller lifetime).
#[derive(Clone)]
pub struct SessionController {
    inner: Arc<Inner>,
    debounce: Arc<Debouncer>,
}

impl SessionController {
    /// Build a controller from configuration.
    ///
    /// # Errors
    /// Fails if the HTTP client cannot be constructed.
    pub fn new(config: &Config) -> Result<Self> {
        let client =
            WeatherClient::with_base_url(&config.provider.api_key, &config.provider.base_url)?;
        let store = CityStore::new(&config.config_dir);

        let inner = Arc::new(Inner {
            client,
            store,
            state: Mutex::new(SessionState::default()),
            search_seq: AtomicU64::new(0),
            days: config.forecast.days,
            default_city: config.forecast.default_city.clone(),
        });

        let search_inner = inner.clone();
        let debounce = Arc::new(Debouncer::new(
            Duration::from_millis(config.search.debounce_ms),
            move |query| {
                tokio::spawn(run_search(search_inner.clone(), query));
            },
        ));

        Ok(Self { inner, debounce })
    }

    /// Snapshot of the current state for the rendering surface.
    pub fn state(&self) -> SessionState {
        self.inner.state.lock().clone()
    }

    /// Startup transition: fetch the forecast for the persisted city, falling
    /// back to the configured default when nothing is stored.
    pub async fn start(&self) {
        {
            let mut state = self.inner.state.lock();
            state.phase = Phase::AwaitingFirstForecast;
            state.loading = true;
        }

        let city = match self.inner.store.get() {
            Ok(Some(city)) => city,
            Ok(None) => self.inner.default_city.clone(),
            Err(e) => {
                tracing::warn!("failed to read persisted city: {:#}", e);
                self.inner.default_city.clone()
            }
        };

        tracing::info!("startup forecast for {}", city);
        self.apply_fetch(&city, false).await;
    }

    /// Search-input operation: feed a keystroke into the debouncer. After the
    /// quiet window the latest input triggers one resolver call, and only for
    /// inputs longer than two characters.
    pub fn on_search_text_changed(&self, text: &str) {
        self.debounce.notify(text);
    }

    /// Selection transition: hide search, fetch the forecast for the chosen
    /// candidate, and on success persist its city name (fire-and-forget).
    pub async fn on_location_selected(&self, location: &Location) {
        tracing::info!("selected {}", location.display_label());
        {
            let mut state = self.inner.state.lock();
            state.candidates.clear();
            state.search_active = false;
            state.loading = true;
            state.phase = Phase::Loading;
        }

        self.apply_fetch(&location.name, true).await;
    }

    /// Show or hide the search affordance. Hiding clears stale candidates so
    /// they cannot reappear when search is reopened.
    pub fn on_toggle_search(&self) {
        let mut state = self.inner.state.lock();
        state.search_active = !state.search_active;

        if state.search_active {
            state.phase = Phase::Searching;
        } else {
            state.candidates.clear();
            state.phase = if state.forecast.is_some() {
                Phase::Ready
            } else {
                Phase::Idle
            };
        }
    }

    /// Run a forecast fetch and apply its result. On failure the previous
    /// forecast is kept, loading clears, and `last_error` carries the message.
    async fn apply_fetch(&self, city: &str, persist: bool) {
        match self.inner.client.fetch_forecast(city, self.inner.days).await {
            Ok(payload) => {
                {
                    let mut state = self.inner.state.lock();
                    state.forecast = Some(payload);
                    state.loading = false;
                    state.last_error = None;
                    state.phase = Phase::Ready;
                }

                if persist {
                    // Fire-and-forget: the UI flow never waits on the write
                    let store = self.inner.store.clone();
                    let city = city.to_string();
                    tokio::spawn(async move {
                        if let Err(e) = store.set(&city) {
                            tracing::warn!("failed to persist city {}: {:#}", city, e);
                        }
                    });
                }
            }
            Err(e) => {
                tracing::warn!("forecast fetch for {} failed: {}", city, e);
                let mut state = self.inner.state.lock();
                state.loading = false;
                state.last_error = Some(e.user_message());
                state.phase = Phase::Ready;
            }
        }
    }
}

/// Debounce-fired resolver call. A stale response (one overtaken by a newer
/// fired query) is discarded by sequence number rather than applied.
async fn run_search(inner: Arc<Inner>, query: String) {
    if query.chars().count() <= MIN_QUERY_CHARS {
        return;
    }

    let seq = inner.search_seq.fetch_add(1, Ordering::SeqCst) + 1;

    match inner.client.search_locations(&query).await {
        Ok(found) => {
            let mut state = inner.state.lock();
            let newest = seq == inner.search_seq.load(Ordering::SeqCst);
            if newest && state.search_active && !state.loading {
                state.candidates = found;
            } else {
                tracing::debug!("discarding search results for {:?}", query);
            }
        }
        Err(e) => {
            // Candidates are left as-is; the user keeps typing or retries
            tracing::warn!("location search for {:?} failed: {}", query, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_config(dir: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.config_dir = dir.to_path_buf();
        config.provider.api_key = "test_key".to_string();
        config.provider.base_url = "http://127.0.0.1:9".to_string();
        config.search.debounce_ms = 20;
        config
    }

    #[tokio::test]
    async fn test_initial_state() {
        let dir = tempfile::tempdir().unwrap();
        let session = SessionController::new(&offline_config(dir.path())).unwrap();

        let state = session.state();
        assert_eq!(state.phase, Phase::Idle);
        assert!(!state.search_active);
        assert!(state.candidates.is_empty());
        assert!(state.forecast.is_none());
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_toggle_clears_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let session = SessionController::new(&offline_config(dir.path())).unwrap();

        session.on_toggle_search();
        assert_eq!(session.state().phase, Phase::Searching);
        assert!(session.state().search_active);

        // Simulate a populated candidate list, then hide search
        session.inner.state.lock().candidates.push(Location {
            name: "Accra".into(),
            region: "Greater Accra".into(),
            country: "Ghana".into(),
        });

        session.on_toggle_search();
        let state = session.state();
        assert!(!state.search_active);
        assert!(state.candidates.is_empty());
        assert_eq!(state.phase, Phase::Idle);
    }
}
