//! Zengo Daily
//!
//! Deterministic "zen word of the day" core: one catalog entry per local
//! calendar day, the active solar term (二十四節気), and render-ready labels.
//!
//! Pipeline:
//! - `loader/`: retrying, day-cached, single-flight JSON loading
//! - `selector/`: date → catalog index (epoch = January 1 of the year)
//! - `sekki/`: month/day → active solar term, cyclic over New Year
//! - `display/`: entry + term + date → `DisplayState`
//! - `service/`: wires the above together, placeholders on every failure
//!
//! Rendering (DOM, layout, device quirks) is left to the consumer of
//! `DisplayState`; the `api` feature exposes it over HTTP.

pub mod clock;
pub mod config;
pub mod display;
pub mod error;
pub mod fetcher;
pub mod loader;
pub mod model;
pub mod sekki;
pub mod selector;
pub mod service;

#[cfg(feature = "api")]
pub mod api_server;

// Re-export commonly used types
pub use clock::{Clock, FixedClock, LocalClock};
pub use config::Config;
pub use display::DisplayState;
pub use error::{FetchError, ZenError};
pub use fetcher::{Fetcher, HttpFetcher};
pub use loader::{CacheState, ResourceLoader, RetryPolicy};
pub use model::{Catalog, CatalogEntry, SekkiDefinition, SekkiDocument, SekkiTable, ZenWordsDocument};
pub use selector::{select_index, wrap_index, Epoch};
pub use service::{DailyView, ZenService};

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};
