//! JSON artifacts exchanged between stages.
//!
//! Every stage reads and writes whole files. Output is pretty-printed with
//! two-space indentation and keeps non-ASCII text as-is.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::catalog::model::{AnimeRecord, Database};
use crate::errors::StoreError;

/// Key holding the record mapping in the wrapped database layout.
const ANIME_KEY: &str = "anime";

/// One entry of the catalog link list fed to the scrape stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogLink {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub id: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeMetadata {
    pub total_anime: usize,
    pub processed: usize,
    pub errors: usize,
    pub source: String,
    pub timestamp: String,
}

impl ScrapeMetadata {
    pub fn new(
        total_anime: usize,
        processed: usize,
        errors: usize,
        source: impl Into<String>,
        at: DateTime<Local>,
    ) -> Self {
        Self {
            total_anime,
            processed,
            errors,
            source: source.into(),
            timestamp: at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// Wrapped layout written by the scrape stage.
#[derive(Debug, Serialize)]
pub struct ScrapedDatabase<'a> {
    pub metadata: ScrapeMetadata,
    pub anime: &'a Database,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedLink {
    pub url: Option<String>,
    pub id: Option<Value>,
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorLog {
    pub errors: Vec<FailedLink>,
}

pub fn read_json(path: &Path) -> Result<Value, StoreError> {
    let raw = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    serde_json::from_str(&raw).map_err(|e| StoreError::json(path, e))
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }
    let body = serde_json::to_string_pretty(value).map_err(|e| StoreError::json(path, e))?;
    fs::write(path, body).map_err(|e| StoreError::io(path, e))
}

/// Load a database in either the bare `title -> record` layout or the
/// wrapped `{"metadata": ..., "anime": {...}}` layout.
pub fn load_database(path: &Path) -> Result<Database, StoreError> {
    let value = read_json(path)?;
    parse_database(value, path)
}

/// Only the outer shape is fatal. A record that is not an object or cannot be
/// read is logged and left out.
pub fn parse_database(value: Value, path: &Path) -> Result<Database, StoreError> {
    let Value::Object(mut top) = value else {
        return Err(StoreError::structural(
            path,
            "expected a JSON object at the top level",
        ));
    };

    let records = match top.remove(ANIME_KEY) {
        Some(Value::Object(inner)) => inner,
        Some(other) => {
            // A bare mapping may legitimately hold a title "anime".
            top.insert(ANIME_KEY.to_string(), other);
            top
        }
        None => top,
    };

    let mut database = Database::new();
    for (title, raw) in records {
        if !raw.is_object() {
            warn!(path = %path.display(), title = %title, "record is not an object, skipped");
            continue;
        }
        match serde_json::from_value::<AnimeRecord>(raw) {
            Ok(record) => {
                database.insert(title, record);
            }
            Err(e) => warn!(path = %path.display(), title = %title, "malformed record skipped: {}", e),
        }
    }
    Ok(database)
}

/// Load the link list: a bare array or `{"anime": [...]}`.
pub fn load_links(path: &Path) -> Result<Vec<CatalogLink>, StoreError> {
    let value = read_json(path)?;
    let list = match value {
        Value::Array(_) => value,
        Value::Object(mut top) => match top.remove(ANIME_KEY) {
            Some(list @ Value::Array(_)) => list,
            _ => {
                return Err(StoreError::structural(
                    path,
                    "expected a list of links or an object with an 'anime' list",
                ));
            }
        },
        _ => {
            return Err(StoreError::structural(
                path,
                "expected a list of links or an object with an 'anime' list",
            ));
        }
    };
    serde_json::from_value(list).map_err(|e| StoreError::structural(path, e.to_string()))
}

/// `dir/name.json` -> `dir/name_<suffix>.json`.
pub fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    path.with_file_name(format!("{}_{}.json", stem, suffix))
}
