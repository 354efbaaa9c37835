use crate::models::{Candidate, MalformedCandidateError, Position, FOOD_TYPE_BOTH};
use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors that make a whole catalog unreadable
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error reading catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Catalog load failed: {0}")]
    Load(String),
}

/// One row exactly as it appears in the NGO spreadsheet
#[derive(Debug, Default, Deserialize)]
struct RawCandidateRecord {
    #[serde(rename = "Name", default)]
    name: Option<String>,
    #[serde(rename = "Area", default)]
    area: Option<String>,
    #[serde(rename = "Capacity_kg", default)]
    capacity_kg: Option<String>,
    #[serde(rename = "Latitude", default)]
    latitude: Option<String>,
    #[serde(rename = "Longitude", default)]
    longitude: Option<String>,
    #[serde(rename = "Contact", default)]
    contact: Option<String>,
    #[serde(rename = "Accepted_Food_Types", default)]
    accepted_food_types: Option<String>,
}

/// Parsed catalog plus the rows that were skipped
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub source: String,
    pub candidates: Vec<Candidate>,
    pub rejected: Vec<MalformedCandidateError>,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_number(value: Option<String>, field: &str) -> Result<f64, String> {
    let raw = non_empty(value).ok_or_else(|| format!("missing {}", field))?;
    let parsed: f64 = raw
        .parse()
        .map_err(|_| format!("{} is not a number: {:?}", field, raw))?;
    if !parsed.is_finite() {
        return Err(format!("{} is not finite: {:?}", field, raw));
    }
    Ok(parsed)
}

/// Validate one spreadsheet row into a [`Candidate`]
///
/// `row` is the 1-based data row number (header excluded).
fn validate_record(row: usize, raw: RawCandidateRecord) -> Result<Candidate, MalformedCandidateError> {
    let name = non_empty(raw.name);
    let malformed = |reason: String| MalformedCandidateError {
        row,
        name: name.clone(),
        reason,
    };

    let capacity_kg = parse_number(raw.capacity_kg, "Capacity_kg").map_err(&malformed)?;
    if capacity_kg < 0.0 {
        return Err(malformed(format!("Capacity_kg is negative: {}", capacity_kg)));
    }

    let latitude = parse_number(raw.latitude, "Latitude").map_err(&malformed)?;
    let longitude = parse_number(raw.longitude, "Longitude").map_err(&malformed)?;
    let position = Position::new(latitude, longitude);
    if !position.is_valid() {
        return Err(malformed(format!(
            "position ({}, {}) is outside the valid coordinate range",
            latitude, longitude
        )));
    }

    Ok(Candidate {
        name: name.clone().unwrap_or_default(),
        area: non_empty(raw.area).unwrap_or_default(),
        capacity_kg,
        position,
        contact: non_empty(raw.contact).unwrap_or_default(),
        accepted_food_types: non_empty(raw.accepted_food_types)
            .unwrap_or_else(|| FOOD_TYPE_BOTH.to_string()),
    })
}

/// Parse a catalog from any CSV reader
///
/// Bad rows become [`MalformedCandidateError`]s; only an unreadable header
/// fails the whole load.
pub fn parse_catalog<R: Read>(reader: R, source: &str) -> Result<CatalogSnapshot, CatalogError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    // Surface header problems up front
    csv_reader.headers()?;

    let mut candidates = Vec::new();
    let mut rejected = Vec::new();

    for (idx, result) in csv_reader.deserialize::<RawCandidateRecord>().enumerate() {
        let row = idx + 1;
        let outcome = result
            .map_err(|e| MalformedCandidateError {
                row,
                name: None,
                reason: e.to_string(),
            })
            .and_then(|raw| validate_record(row, raw));

        match outcome {
            Ok(candidate) => candidates.push(candidate),
            Err(e) => {
                tracing::warn!("Skipping catalog row: {}", e);
                rejected.push(e);
            }
        }
    }

    tracing::info!(
        "Loaded {} candidates from {} ({} rows skipped)",
        candidates.len(),
        source,
        rejected.len()
    );

    Ok(CatalogSnapshot {
        source: source.to_string(),
        candidates,
        rejected,
        loaded_at: chrono::Utc::now(),
    })
}

/// Load a catalog CSV from disk
pub fn load_catalog(path: impl AsRef<Path>) -> Result<CatalogSnapshot, CatalogError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })?;

    parse_catalog(std::io::BufReader::new(file), &path.display().to_string())
}

/// Catalog store with a single cached snapshot
///
/// The snapshot is parsed once and served from memory until the TTL
/// expires or [`CatalogStore::invalidate`] is called.
pub struct CatalogStore {
    path: PathBuf,
    cache: moka::future::Cache<String, Arc<CatalogSnapshot>>,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>, ttl_secs: u64) -> Self {
        let cache = moka::future::CacheBuilder::new(1)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self {
            path: path.into(),
            cache,
        }
    }

    fn key(&self) -> String {
        self.path.display().to_string()
    }

    /// Get the current snapshot, loading it on first use
    pub async fn snapshot(&self) -> Result<Arc<CatalogSnapshot>, CatalogError> {
        let path = self.path.clone();
        self.cache
            .try_get_with(self.key(), async move {
                let snapshot = tokio::task::spawn_blocking(move || load_catalog(path))
                    .await
                    .map_err(|e| CatalogError::Load(e.to_string()))??;
                Ok::<_, CatalogError>(Arc::new(snapshot))
            })
            .await
            .map_err(|e: Arc<CatalogError>| CatalogError::Load(e.to_string()))
    }

    /// Snapshot if already cached, without touching disk
    pub async fn cached(&self) -> Option<Arc<CatalogSnapshot>> {
        self.cache.get(&self.key()).await
    }

    /// Drop the cached snapshot so the next request reloads from disk
    pub async fn invalidate(&self) {
        self.cache.invalidate(&self.key()).await;
        tracing::info!("Catalog cache invalidated for {}", self.path.display());
    }

    /// Invalidate and load again immediately
    pub async fn reload(&self) -> Result<Arc<CatalogSnapshot>, CatalogError> {
        self.invalidate().await;
        self.snapshot().await
    }
}
