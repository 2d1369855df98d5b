//! Day-cached JSON resource loader
//!
//! Fetches one JSON document with bounded retries and exponential backoff,
//! memoizes it for the local calendar day, and degrades to the last good copy
//! when a new day's fetch fails.
//!
//! Cache lifecycle (one slot per resource):
//!   Empty ──load ok──▶ Populated(day, value) ──rollover + load ok──▶ Populated(day', value')
//! A failed load never clears the slot. After a failed refresh the stale value
//! is served without network I/O until the failure cooldown has passed.

use chrono::NaiveDate;
use moka::future::Cache;
use serde::de::DeserializeOwned;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;
use tokio::time::Instant;

use crate::clock::Clock;
use crate::error::{FetchError, ZenError};
use crate::fetcher::Fetcher;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(30);
const BASE_DELAY: Duration = Duration::from_millis(1000);
const MAX_DELAY: Duration = Duration::from_millis(5000);
pub const DEFAULT_FAILURE_COOLDOWN: Duration = Duration::from_secs(60);

// ============================================================================
// Retry policy
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Budget for a single attempt; an expired attempt is dropped and counted as failed
    pub attempt_timeout: Duration,
    pub base_delay: Duration,
    pub max_delay: Duration,
    /// How long a failed refresh keeps serving the stale value before retrying
    pub failure_cooldown: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
            base_delay: BASE_DELAY,
            max_delay: MAX_DELAY,
            failure_cooldown: DEFAULT_FAILURE_COOLDOWN,
        }
    }
}

impl RetryPolicy {
    /// Delay after failed attempt `attempt` (0-based): `min(base * 2^attempt, max)`
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(self.max_delay)
    }
}

// ============================================================================
// Cache state
// ============================================================================

struct Snapshot<T> {
    day: NaiveDate,
    value: Arc<T>,
}

/// Single-slot, day-keyed cache owned by one loader.
///
/// Created empty and injected into [`ResourceLoader`], so tests can inspect
/// or pre-seed it without a network.
pub struct CacheState<T> {
    slot: RwLock<Option<Snapshot<T>>>,
}

impl<T> Default for CacheState<T> {
    fn default() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }
}

impl<T> CacheState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached value if it was loaded on `day`
    pub fn fresh(&self, day: NaiveDate) -> Option<Arc<T>> {
        self.read(|slot| {
            slot.as_ref()
                .filter(|snap| snap.day == day)
                .map(|snap| Arc::clone(&snap.value))
        })
    }

    /// Last successfully loaded value, whatever day it belongs to
    pub fn latest(&self) -> Option<Arc<T>> {
        self.read(|slot| slot.as_ref().map(|snap| Arc::clone(&snap.value)))
    }

    pub fn loaded_for(&self) -> Option<NaiveDate> {
        self.read(|slot| slot.as_ref().map(|snap| snap.day))
    }

    pub fn is_empty(&self) -> bool {
        self.read(|slot| slot.is_none())
    }

    pub fn store(&self, day: NaiveDate, value: Arc<T>) {
        let snapshot = Snapshot { day, value };
        match self.slot.write() {
            Ok(mut guard) => *guard = Some(snapshot),
            Err(poisoned) => *poisoned.into_inner() = Some(snapshot),
        }
    }

    fn read<R>(&self, f: impl FnOnce(&Option<Snapshot<T>>) -> R) -> R {
        match self.slot.read() {
            Ok(guard) => f(&guard),
            Err(poisoned) => f(&poisoned.into_inner()),
        }
    }
}

// ============================================================================
// Loader
// ============================================================================

/// Loads and day-caches one JSON document of type `T`.
pub struct ResourceLoader<T> {
    url: String,
    fetcher: Arc<dyn Fetcher>,
    clock: Arc<dyn Clock>,
    policy: RetryPolicy,
    cache: Arc<CacheState<T>>,
    /// Coalesces concurrent loads for the same day into one fetch
    in_flight: Cache<NaiveDate, Arc<T>>,
    /// Set after a failed refresh that fell back to the stale value
    retry_after: Mutex<Option<Instant>>,
}

impl<T> ResourceLoader<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    pub fn new(
        url: impl Into<String>,
        fetcher: Arc<dyn Fetcher>,
        clock: Arc<dyn Clock>,
        policy: RetryPolicy,
        cache: Arc<CacheState<T>>,
    ) -> Self {
        let in_flight = Cache::builder()
            .max_capacity(2)
            .time_to_live(Duration::from_secs(24 * 60 * 60))
            .build();

        Self {
            url: url.into(),
            fetcher,
            clock,
            policy,
            cache,
            in_flight,
            retry_after: Mutex::new(None),
        }
    }

    pub fn cache(&self) -> &Arc<CacheState<T>> {
        &self.cache
    }

    /// Current cached value without any network I/O
    pub fn cached(&self) -> Option<Arc<T>> {
        self.cache.latest()
    }

    /// Today's document: cached, freshly fetched, or yesterday's as a fallback.
    ///
    /// Fails with [`ZenError::FetchFailure`] only when every attempt failed and
    /// nothing was ever cached.
    pub async fn load(&self) -> Result<Arc<T>, ZenError> {
        let today = self.clock.today();

        if let Some(hit) = self.cache.fresh(today) {
            tracing::debug!("Cache hit for {} ({})", self.url, today);
            return Ok(hit);
        }

        if let Some(stale) = self.cooling_down() {
            tracing::debug!("Serving cached {} until the failure cooldown ends", self.url);
            return Ok(stale);
        }

        let outcome = self
            .in_flight
            .try_get_with(today, self.fetch_and_store(today))
            .await;

        match outcome {
            Ok(value) => Ok(value),
            Err(err) => match self.cache.latest() {
                Some(stale) => {
                    tracing::warn!(
                        "Using cached {} from {:?}: {}",
                        self.url,
                        self.cache.loaded_for(),
                        err
                    );
                    self.set_retry_after(Some(Instant::now() + self.policy.failure_cooldown));
                    Ok(stale)
                }
                None => Err(err.as_ref().clone()),
            },
        }
    }

    async fn fetch_and_store(&self, today: NaiveDate) -> Result<Arc<T>, ZenError> {
        tracing::info!("Loading {} for {}", self.url, today);
        let value = Arc::new(self.fetch_with_retry().await?);
        self.cache.store(today, Arc::clone(&value));
        self.set_retry_after(None);
        tracing::info!("Loaded {}", self.url);
        Ok(value)
    }

    /// Stale value, if a failed refresh is still within its cooldown
    fn cooling_down(&self) -> Option<Arc<T>> {
        let until = (*self.retry_after.lock().unwrap_or_else(PoisonError::into_inner))?;
        if Instant::now() < until {
            self.cache.latest()
        } else {
            None
        }
    }

    fn set_retry_after(&self, until: Option<Instant>) {
        *self.retry_after.lock().unwrap_or_else(PoisonError::into_inner) = until;
    }

    /// Fetch and decode with retry/backoff, bypassing the cache entirely.
    ///
    /// A non-retryable failure (unusable URL) ends the run after one attempt.
    pub async fn fetch_with_retry(&self) -> Result<T, ZenError> {
        let max_attempts = self.policy.max_attempts;
        let mut last_error = FetchError::Transport("no attempt made".to_string());
        let mut attempts = 0;

        for attempt in 0..max_attempts {
            attempts = attempt + 1;
            match self.attempt().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    tracing::warn!(
                        "Fetch {} failed (attempt {}/{}): {}",
                        self.url,
                        attempts,
                        max_attempts,
                        e
                    );
                    let retryable = e.is_retryable();
                    last_error = e;
                    if !retryable {
                        break;
                    }
                }
            }

            if attempts < max_attempts {
                tokio::time::sleep(self.policy.backoff(attempt)).await;
            }
        }

        Err(ZenError::FetchFailure {
            url: self.url.clone(),
            attempts,
            source: last_error,
        })
    }

    async fn attempt(&self) -> Result<T, FetchError> {
        let timeout = self.policy.attempt_timeout;
        let body = tokio::time::timeout(timeout, self.fetcher.fetch(&self.url))
            .await
            .map_err(|_| FetchError::Timeout(timeout))??;

        serde_json::from_slice(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_then_caps() {
        let policy = RetryPolicy::default();
        let delays: Vec<u128> = (0..5).map(|i| policy.backoff(i).as_millis()).collect();
        assert_eq!(delays, vec![1000, 2000, 4000, 5000, 5000]);
    }

    #[test]
    fn test_backoff_large_attempt_does_not_overflow() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(40), Duration::from_millis(5000));
    }

    #[test]
    fn test_cache_state_transitions() {
        let cache: CacheState<u32> = CacheState::new();
        let d1 = NaiveDate::from_ymd_opt(2025, 10, 16).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2025, 10, 17).unwrap();

        assert!(cache.is_empty());
        assert!(cache.fresh(d1).is_none());

        cache.store(d1, Arc::new(1));
        assert_eq!(cache.fresh(d1).as_deref(), Some(&1));
        assert!(cache.fresh(d2).is_none());
        assert_eq!(cache.latest().as_deref(), Some(&1));

        cache.store(d2, Arc::new(2));
        assert_eq!(cache.loaded_for(), Some(d2));
        assert_eq!(cache.latest().as_deref(), Some(&2));
    }
}
