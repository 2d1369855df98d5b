//! Shared fakes for the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;
use zengo_daily::{FetchError, Fetcher};

/// What the fake does on one call
#[derive(Debug, Clone)]
pub enum Step {
    Body(String),
    Fail(FetchError),
    /// Never answers; only the loader's timeout ends the attempt
    Hang,
    /// Answers after a delay
    Slow(Duration, String),
}

/// Plays back scripted steps; once the script runs out, repeats `fallback`.
pub struct ScriptedFetcher {
    steps: Mutex<VecDeque<Step>>,
    fallback: Step,
    calls: AtomicUsize,
    started: Mutex<Vec<Instant>>,
}

impl ScriptedFetcher {
    pub fn new(steps: Vec<Step>, fallback: Step) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            fallback,
            calls: AtomicUsize::new(0),
            started: Mutex::new(Vec::new()),
        }
    }

    pub fn always(step: Step) -> Self {
        Self::new(Vec::new(), step)
    }

    pub fn push(&self, step: Step) {
        self.steps.lock().unwrap().push_back(step);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Gap between consecutive attempt starts
    pub fn gaps(&self) -> Vec<Duration> {
        let started = self.started.lock().unwrap();
        started.windows(2).map(|w| w[1] - w[0]).collect()
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, _url: &str) -> Result<Vec<u8>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.started.lock().unwrap().push(Instant::now());

        let step = self
            .steps
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        match step {
            Step::Body(body) => Ok(body.into_bytes()),
            Step::Fail(e) => Err(e),
            Step::Hang => {
                std::future::pending::<()>().await;
                unreachable!()
            }
            Step::Slow(delay, body) => {
                tokio::time::sleep(delay).await;
                Ok(body.into_bytes())
            }
        }
    }
}

/// Routes by URL suffix so one fake can serve both documents
pub struct RoutedFetcher {
    pub words: ScriptedFetcher,
    pub sekki: ScriptedFetcher,
}

#[async_trait]
impl Fetcher for RoutedFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        if url.ends_with("sekki_data.json") {
            self.sekki.fetch(url).await
        } else {
            self.words.fetch(url).await
        }
    }
}

pub fn catalog_json(headwords: &[&str]) -> String {
    let entries: Vec<serde_json::Value> = headwords
        .iter()
        .enumerate()
        .map(|(i, h)| {
            serde_json::json!({
                "no": i + 1,
                "zengo": h,
                "reading": format!("よみ{}", i + 1),
                "meaning": format!("意味{}", i + 1),
                "theme": "テーマ",
                "source_person": "人物",
                "source_text_en": "Source"
            })
        })
        .collect();
    serde_json::json!({ "zenWords": entries }).to_string()
}

pub fn sekki_json() -> String {
    serde_json::json!({
        "sekkiData": [
            {"month": 2, "day": 4, "sekki": "立春 (りっしゅん)"},
            {"month": 5, "day": 5, "sekki": "立夏 (りっか)"},
            {"month": 8, "day": 7, "sekki": "立秋 (りっしゅう)"},
            {"month": 10, "day": 8, "sekki": "寒露 (かんろ)"},
            {"month": 11, "day": 7, "sekki": "立冬 (りっとう)"},
            {"month": 12, "day": 22, "sekki": "冬至 (とうじ)"}
        ]
    })
    .to_string()
}
