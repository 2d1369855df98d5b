//! Word-of-the-day service
//!
//! Wires the two loaders, the daily selector and the sekki resolver into
//! ready-to-render views. Never fails: every error path ends in a placeholder
//! so the renderer always has something to show.

use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;

use crate::clock::Clock;
use crate::config::Config;
use crate::display::{self, DisplayState};
use crate::error::ZenError;
use crate::fetcher::Fetcher;
use crate::loader::{CacheState, ResourceLoader};
use crate::model::{Catalog, SekkiDefinition, SekkiDocument, ZenWordsDocument};
use crate::selector::{self, Epoch};
use crate::sekki;

/// What the renderer receives
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyView {
    pub date: NaiveDate,
    /// Catalog position shown, `None` when the catalog was unavailable
    pub index: Option<usize>,
    pub total: usize,
    pub display: DisplayState,
}

pub struct ZenService {
    words: ResourceLoader<ZenWordsDocument>,
    sekki: ResourceLoader<SekkiDocument>,
    clock: Arc<dyn Clock>,
    epoch: Epoch,
}

impl ZenService {
    pub fn new(config: &Config, fetcher: Arc<dyn Fetcher>, clock: Arc<dyn Clock>) -> Self {
        let words = ResourceLoader::new(
            config.zen_words_url.clone(),
            Arc::clone(&fetcher),
            Arc::clone(&clock),
            config.retry,
            Arc::new(CacheState::new()),
        );
        let sekki = ResourceLoader::new(
            config.sekki_data_url.clone(),
            fetcher,
            Arc::clone(&clock),
            config.retry,
            Arc::new(CacheState::new()),
        );
        Self::from_loaders(words, sekki, clock, Epoch::default())
    }

    pub fn from_loaders(
        words: ResourceLoader<ZenWordsDocument>,
        sekki: ResourceLoader<SekkiDocument>,
        clock: Arc<dyn Clock>,
        epoch: Epoch,
    ) -> Self {
        Self {
            words,
            sekki,
            clock,
            epoch,
        }
    }

    pub fn today_date(&self) -> NaiveDate {
        self.clock.today()
    }

    pub async fn catalog(&self) -> Result<Arc<ZenWordsDocument>, ZenError> {
        self.words.load().await
    }

    /// Active solar term for today
    pub async fn current_sekki(&self) -> Result<SekkiDefinition, ZenError> {
        let doc = self.sekki.load().await?;
        sekki::resolve_date(self.today_date(), &doc.sekki_data).cloned()
    }

    /// Today's entry, chosen by the daily selector
    pub async fn today(&self) -> DailyView {
        let (date, catalog, sekki) = self.inputs().await;
        let Some(catalog) = catalog else {
            return unavailable(date, sekki.as_ref());
        };

        match selector::select_index_with(self.epoch, date, catalog.zen_words.len()) {
            Ok(index) => view_at(&catalog.zen_words, index, sekki.as_ref(), date),
            Err(e) => {
                tracing::error!("Cannot select today's entry: {}", e);
                unavailable(date, sekki.as_ref())
            }
        }
    }

    /// Explicit catalog position (debug navigation), wrapped into range.
    pub async fn at_index(&self, index: i64) -> DailyView {
        let (date, catalog, sekki) = self.inputs().await;
        let Some(catalog) = catalog else {
            return unavailable(date, sekki.as_ref());
        };

        let total = catalog.zen_words.len();
        match selector::wrap_index(index, total) {
            Ok(wrapped) => {
                tracing::debug!("Debug index {} -> {}/{}", index, wrapped + 1, total);
                let mut view = view_at(&catalog.zen_words, wrapped, sekki.as_ref(), date);
                view.display = view.display.with_debug_position(wrapped, total);
                view
            }
            Err(e) => {
                tracing::error!("Cannot select entry {}: {}", index, e);
                unavailable(date, sekki.as_ref())
            }
        }
    }

    /// Loads catalog and sekki side by side; a slow catalog never delays the term
    async fn inputs(&self) -> (NaiveDate, Option<Arc<ZenWordsDocument>>, Option<SekkiDefinition>) {
        let date = self.today_date();
        let (words, sekki) = tokio::join!(self.words.load(), self.current_sekki());

        let catalog = match words {
            Ok(doc) => Some(doc),
            Err(e) => {
                tracing::error!("No catalog available: {}", e);
                None
            }
        };
        let sekki = match sekki {
            Ok(def) => Some(def),
            Err(e @ ZenError::FetchFailure { .. }) => {
                tracing::warn!("Sekki table could not be loaded: {}", e);
                Some(DisplayState::sekki_load_failed())
            }
            Err(e) => {
                tracing::warn!("No active sekki: {}", e);
                None
            }
        };

        (date, catalog, sekki)
    }
}

fn view_at(
    catalog: &Catalog,
    index: usize,
    sekki: Option<&SekkiDefinition>,
    date: NaiveDate,
) -> DailyView {
    let display = match catalog.get(index) {
        Some(entry) => display::build(entry, sekki, date),
        None => DisplayState::placeholder(sekki, date),
    };
    DailyView {
        date,
        index: Some(index),
        total: catalog.len(),
        display,
    }
}

fn unavailable(date: NaiveDate, sekki: Option<&SekkiDefinition>) -> DailyView {
    DailyView {
        date,
        index: None,
        total: 0,
        display: DisplayState::placeholder(sekki, date),
    }
}
