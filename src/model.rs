//! Catalog and solar-term data model
//!
//! Mirrors the two published JSON documents:
//! - `zen_words.json`: `{ "zenWords": [ { "no", "zengo", "reading", ... } ] }`
//! - `sekki_data.json`: `{ "sekkiData": [ { "month", "day", "sekki" } ] }`
//!
//! Catalog order is load-bearing: position N is shown on day N of the epoch.

use serde::{Deserialize, Serialize};

/// One word-of-the-day entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(rename = "no", alias = "sequenceNumber", default)]
    pub sequence_number: u32,
    #[serde(default)]
    pub reading: String,
    #[serde(rename = "zengo", alias = "headword")]
    pub headword: String,
    #[serde(default)]
    pub meaning: String,
    #[serde(default)]
    pub theme: String,
    #[serde(alias = "sourcePerson", default)]
    pub source_person: String,
    #[serde(rename = "source_text_en", alias = "sourceText", default)]
    pub source_text: String,
}

/// Ordered catalog of entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog(Vec<CatalogEntry>);

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self(entries)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.0.get(index)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.0
    }
}

/// Top-level shape of `zen_words.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZenWordsDocument {
    #[serde(rename = "zenWords")]
    pub zen_words: Catalog,
}

// ============================================================================
// Solar terms
// ============================================================================

/// Start of one of the 24 solar terms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSekki", into = "RawSekki")]
pub struct SekkiDefinition {
    pub month: u32,
    pub day: u32,
    pub name: String,
    /// Kana reading without surrounding parentheses
    pub reading_annotation: Option<String>,
}

impl SekkiDefinition {
    pub fn new(month: u32, day: u32, name: impl Into<String>, reading: Option<&str>) -> Self {
        Self {
            month,
            day,
            name: name.into(),
            reading_annotation: reading.map(str::to_string),
        }
    }

    /// Sort key used for interval lookup (`month * 100 + day`)
    pub fn date_value(&self) -> u32 {
        self.month * 100 + self.day
    }

    /// Split a combined label such as `立春 (りっしゅん)` into name and reading.
    ///
    /// Only the first space separates the two parts; ASCII and full-width
    /// parentheses are stripped from the reading.
    pub fn parse_label(label: &str) -> (String, Option<String>) {
        let mut parts = label.trim().split(' ');
        let name = parts.next().unwrap_or_default().to_string();
        let reading = parts
            .next()
            .map(|r| r.replace(['(', ')', '（', '）'], ""))
            .filter(|r| !r.is_empty());
        (name, reading)
    }

    /// Inverse of [`parse_label`](Self::parse_label)
    pub fn label(&self) -> String {
        match &self.reading_annotation {
            Some(reading) => format!("{} ({})", self.name, reading),
            None => self.name.clone(),
        }
    }
}

/// Wire form of a sekki row. Accepts both the combined `sekki` label and the
/// explicit `name` / `readingAnnotation` pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawSekki {
    month: u32,
    day: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sekki: Option<String>,
    #[serde(default, skip_serializing)]
    name: Option<String>,
    #[serde(rename = "readingAnnotation", default, skip_serializing)]
    reading_annotation: Option<String>,
}

impl TryFrom<RawSekki> for SekkiDefinition {
    type Error = String;

    fn try_from(raw: RawSekki) -> Result<Self, Self::Error> {
        if !(1..=12).contains(&raw.month) {
            return Err(format!("sekki month out of range: {}", raw.month));
        }
        if !(1..=31).contains(&raw.day) {
            return Err(format!("sekki day out of range: {}", raw.day));
        }

        let (name, reading_annotation) = match (raw.name, raw.sekki) {
            (Some(name), _) => (name, raw.reading_annotation.filter(|r| !r.is_empty())),
            (None, Some(label)) => Self::parse_label(&label),
            (None, None) => return Err("sekki row has neither `sekki` nor `name`".to_string()),
        };

        Ok(Self {
            month: raw.month,
            day: raw.day,
            name,
            reading_annotation,
        })
    }
}

impl From<SekkiDefinition> for RawSekki {
    fn from(def: SekkiDefinition) -> Self {
        let sekki = Some(def.label());
        RawSekki {
            month: def.month,
            day: def.day,
            sekki,
            name: None,
            reading_annotation: None,
        }
    }
}

/// Solar-term table, sorted by `(month, day)` and read cyclically
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SekkiTable(Vec<SekkiDefinition>);

impl SekkiTable {
    pub fn new(entries: Vec<SekkiDefinition>) -> Self {
        Self(entries)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn entries(&self) -> &[SekkiDefinition] {
        &self.0
    }
}

/// Top-level shape of `sekki_data.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SekkiDocument {
    #[serde(rename = "sekkiData")]
    pub sekki_data: SekkiTable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_entry_uses_data_file_names() {
        let json = r#"{
            "zenWords": [
                {"no": 1, "zengo": "日日是好日", "reading": "にちにちこれこうじつ",
                 "meaning": "毎日がかけがえのない一日", "theme": "日常",
                 "source_person": "雲門文偃", "source_text_en": "Blue Cliff Record"}
            ]
        }"#;

        let doc: ZenWordsDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.zen_words.len(), 1);

        let entry = doc.zen_words.get(0).unwrap();
        assert_eq!(entry.sequence_number, 1);
        assert_eq!(entry.headword, "日日是好日");
        assert_eq!(entry.source_text, "Blue Cliff Record");

        let out = serde_json::to_value(&doc).unwrap();
        assert_eq!(out["zenWords"][0]["zengo"], "日日是好日");
        assert_eq!(out["zenWords"][0]["source_text_en"], "Blue Cliff Record");
    }

    #[test]
    fn test_catalog_entry_accepts_camel_case_aliases() {
        let json = r#"{"sequenceNumber": 7, "headword": "喫茶去", "sourcePerson": "趙州"}"#;
        let entry: CatalogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.sequence_number, 7);
        assert_eq!(entry.headword, "喫茶去");
        assert_eq!(entry.source_person, "趙州");
        assert!(entry.meaning.is_empty());
    }

    #[test]
    fn test_parse_label_variants() {
        assert_eq!(
            SekkiDefinition::parse_label("立春 (りっしゅん)"),
            ("立春".to_string(), Some("りっしゅん".to_string()))
        );
        assert_eq!(
            SekkiDefinition::parse_label("立春 （りっしゅん）"),
            ("立春".to_string(), Some("りっしゅん".to_string()))
        );
        assert_eq!(SekkiDefinition::parse_label("立春"), ("立春".to_string(), None));
    }

    #[test]
    fn test_sekki_document_round_trip() {
        let json = r#"{"sekkiData": [{"month": 2, "day": 4, "sekki": "立春 (りっしゅん)"}]}"#;
        let doc: SekkiDocument = serde_json::from_str(json).unwrap();
        let def = &doc.sekki_data.entries()[0];
        assert_eq!(def.name, "立春");
        assert_eq!(def.reading_annotation.as_deref(), Some("りっしゅん"));
        assert_eq!(def.date_value(), 204);

        let out = serde_json::to_value(&doc).unwrap();
        assert_eq!(out["sekkiData"][0]["sekki"], "立春 (りっしゅん)");
        assert_eq!(out["sekkiData"][0]["month"], 2);
    }

    #[test]
    fn test_sekki_explicit_form() {
        let json = r#"{"month": 3, "day": 20, "name": "春分", "readingAnnotation": "しゅんぶん"}"#;
        let def: SekkiDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(def, SekkiDefinition::new(3, 20, "春分", Some("しゅんぶん")));
    }

    #[test]
    fn test_sekki_rejects_out_of_range_month() {
        let json = r#"{"month": 13, "day": 1, "sekki": "謎"}"#;
        assert!(serde_json::from_str::<SekkiDefinition>(json).is_err());
    }
}
