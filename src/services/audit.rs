use crate::models::AuditRecord;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;

/// Errors that can occur when writing or reading match history
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Task error: {0}")]
    TaskError(String),
}

/// Append-only store of completed matches
#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn append(&self, record: &AuditRecord) -> Result<(), AuditError>;

    /// Most recent records, newest first
    async fn recent(&self, limit: usize) -> Result<Vec<AuditRecord>, AuditError>;
}

/// Audit log kept in a local CSV file, one row per match
pub struct CsvAuditLog {
    path: PathBuf,
    // Serialises appends so rows never interleave
    write_lock: Mutex<()>,
}

impl CsvAuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append_blocking(path: &Path, record: &AuditRecord) -> Result<(), AuditError> {
        let needs_header = std::fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;

        Ok(())
    }

    fn read_blocking(path: &Path) -> Result<Vec<AuditRecord>, AuditError> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(path)?;
        let mut records = Vec::new();
        for result in reader.deserialize::<AuditRecord>() {
            match result {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!("Skipping unreadable audit row in {}: {}", path.display(), e),
            }
        }

        Ok(records)
    }
}

#[async_trait]
impl AuditLog for CsvAuditLog {
    async fn append(&self, record: &AuditRecord) -> Result<(), AuditError> {
        let _guard = self.write_lock.lock().await;

        let path = self.path.clone();
        let record = record.clone();
        tokio::task::spawn_blocking(move || Self::append_blocking(&path, &record))
            .await
            .map_err(|e| AuditError::TaskError(e.to_string()))??;

        tracing::debug!("Appended audit record to {}", self.path.display());
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<AuditRecord>, AuditError> {
        let path = self.path.clone();
        let records = tokio::task::spawn_blocking(move || Self::read_blocking(&path))
            .await
            .map_err(|e| AuditError::TaskError(e.to_string()))??;

        Ok(records.into_iter().rev().take(limit).collect())
    }
}

/// PostgreSQL-backed match history
pub struct PostgresAuditLog {
    pool: PgPool,
}

impl PostgresAuditLog {
    /// Connect and run the embedded migrations
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AuditError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl AuditLog for PostgresAuditLog {
    async fn append(&self, record: &AuditRecord) -> Result<(), AuditError> {
        let query = r#"
            INSERT INTO match_history (
                id, recorded_at, kitchen_name, required_capacity_kg,
                kitchen_latitude, kitchen_longitude, food_type, match_count, top_candidate
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#;

        sqlx::query(query)
            .bind(record.id)
            .bind(record.timestamp)
            .bind(&record.kitchen_name)
            .bind(record.required_capacity_kg)
            .bind(record.kitchen_latitude)
            .bind(record.kitchen_longitude)
            .bind(&record.food_type)
            .bind(record.match_count as i32)
            .bind(&record.top_candidate)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Recorded match history {} for {}", record.id, record.kitchen_name);

        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<AuditRecord>, AuditError> {
        let query = r#"
            SELECT id, recorded_at, kitchen_name, required_capacity_kg,
                   kitchen_latitude, kitchen_longitude, food_type, match_count, top_candidate
            FROM match_history
            ORDER BY recorded_at DESC
            LIMIT $1
        "#;

        let rows = sqlx::query(query)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        let records = rows
            .iter()
            .map(|row| AuditRecord {
                id: row.get("id"),
                timestamp: row.get("recorded_at"),
                kitchen_name: row.get("kitchen_name"),
                required_capacity_kg: row.get("required_capacity_kg"),
                kitchen_latitude: row.get("kitchen_latitude"),
                kitchen_longitude: row.get("kitchen_longitude"),
                food_type: row.get("food_type"),
                match_count: row.get::<i32, _>("match_count").max(0) as usize,
                top_candidate: row.get("top_candidate"),
            })
            .collect();

        Ok(records)
    }
}
