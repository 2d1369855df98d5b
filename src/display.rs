//! Render-ready display state
//!
//! Pure assembly of the selected entry, the date and the active solar term
//! into strings a renderer can drop into place. Layout choice (vertical vs
//! horizontal) stays with the renderer, so both date and sekki variants are
//! precomputed here.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use crate::model::{CatalogEntry, SekkiDefinition};

/// Headwords at least this long get a smaller font
pub const LONG_HEADWORD_CHARS: usize = 7;

const THEME_PLACEHOLDER: &str = "テーマなし";
const MEANING_PLACEHOLDER: &str = "説明なし";
const SOURCE_PERSON_PLACEHOLDER: &str = "出典不明";
const SOURCE_TEXT_PLACEHOLDER: &str = "Unknown";

const ERROR_HEADWORD: &str = "エラー";
const ERROR_MEANING: &str = "データ読み込みに失敗しました。";
pub const SEKKI_PLACEHOLDER: &str = "データなし";
pub const SEKKI_LOAD_FAILED: &str = "データ読み込み失敗";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayState {
    pub headword_text: String,
    pub reading_text: String,
    pub meaning_block: String,
    pub date_label_vertical: String,
    pub date_label_horizontal: String,
    /// `name（reading）` on one line
    pub sekki_label: String,
    /// Name and reading on separate lines
    pub sekki_label_stacked: String,
    pub long_headword: bool,
}

/// Assemble the display state for one entry on one day.
pub fn build(entry: &CatalogEntry, sekki: Option<&SekkiDefinition>, date: NaiveDate) -> DisplayState {
    let headword = entry.headword.trim();
    let (sekki_label, sekki_label_stacked) = sekki_labels(sekki);

    DisplayState {
        headword_text: headword.to_string(),
        reading_text: entry.reading.trim().to_string(),
        meaning_block: meaning_block(entry),
        date_label_vertical: date_label(date),
        date_label_horizontal: date_label(date),
        sekki_label,
        sekki_label_stacked,
        long_headword: headword.chars().count() >= LONG_HEADWORD_CHARS,
    }
}

impl DisplayState {
    /// State shown when no catalog could be loaded at all
    pub fn placeholder(sekki: Option<&SekkiDefinition>, date: NaiveDate) -> Self {
        let (sekki_label, sekki_label_stacked) = sekki_labels(sekki);
        Self {
            headword_text: ERROR_HEADWORD.to_string(),
            reading_text: String::new(),
            meaning_block: ERROR_MEANING.to_string(),
            date_label_vertical: date_label(date),
            date_label_horizontal: date_label(date),
            sekki_label,
            sekki_label_stacked,
            long_headword: false,
        }
    }

    /// Stand-in term shown when the sekki table could not be fetched at all
    pub fn sekki_load_failed() -> SekkiDefinition {
        SekkiDefinition::new(1, 1, SEKKI_LOAD_FAILED, None)
    }

    /// Prefix the meaning with the 1-based catalog position (debug navigation)
    pub fn with_debug_position(mut self, index: usize, len: usize) -> Self {
        self.meaning_block = format!("[DEBUG {}/{}]{}", index + 1, len, self.meaning_block);
        self
    }
}

fn or_placeholder<'a>(text: &'a str, placeholder: &'a str) -> &'a str {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        placeholder
    } else {
        trimmed
    }
}

/// `【theme】\nmeaning＜person：source＞`
pub fn meaning_block(entry: &CatalogEntry) -> String {
    format!(
        "【{}】\n{}＜{}：{}＞",
        or_placeholder(&entry.theme, THEME_PLACEHOLDER),
        or_placeholder(&entry.meaning, MEANING_PLACEHOLDER),
        or_placeholder(&entry.source_person, SOURCE_PERSON_PLACEHOLDER),
        or_placeholder(&entry.source_text, SOURCE_TEXT_PLACEHOLDER),
    )
}

fn sekki_labels(sekki: Option<&SekkiDefinition>) -> (String, String) {
    match sekki {
        Some(def) => match def.reading_annotation.as_deref() {
            Some(reading) => (
                format!("{}（{}）", def.name, reading),
                format!("{}\n（{}）", def.name, reading),
            ),
            None => (def.name.clone(), def.name.clone()),
        },
        None => (SEKKI_PLACEHOLDER.to_string(), SEKKI_PLACEHOLDER.to_string()),
    }
}

// ============================================================================
// Kansuji dates
// ============================================================================

/// Digit-by-digit kansuji: `2025` → `二〇二五`, `16` → `一六`
pub fn to_kansuji(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '0' => '〇',
            '1' => '一',
            '2' => '二',
            '3' => '三',
            '4' => '四',
            '5' => '五',
            '6' => '六',
            '7' => '七',
            '8' => '八',
            '9' => '九',
            other => other,
        })
        .collect()
}

pub fn weekday_kanji(weekday: Weekday) -> char {
    match weekday {
        Weekday::Sun => '日',
        Weekday::Mon => '月',
        Weekday::Tue => '火',
        Weekday::Wed => '水',
        Weekday::Thu => '木',
        Weekday::Fri => '金',
        Weekday::Sat => '土',
    }
}

/// `二〇二五年一〇月一六日（木）`
pub fn date_label(date: NaiveDate) -> String {
    format!(
        "{}年{}月{}日（{}）",
        to_kansuji(&date.year().to_string()),
        to_kansuji(&date.month().to_string()),
        to_kansuji(&date.day().to_string()),
        weekday_kanji(date.weekday()),
    )
}
