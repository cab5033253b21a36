//! SQLite Storage Implementation
//!
//! Feedback persistence and aggregation.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::config::DatabaseConfig;
use crate::feedback::{FeedbackFilter, FeedbackRecord, NewFeedback, SentimentStats};

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Storage error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid timestamp
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
    /// Initialization error
    #[error("Initialization error: {0}")]
    Init(String),
}

/// Storage result type
pub type Result<T> = std::result::Result<T, StorageError>;

const SELECT_COLUMNS: &str =
    "id, text_original, text_translated, sentiment, language, product, created_at";

// ============================================================================
// STORAGE
// ============================================================================

/// Feedback storage
///
/// Uses separate reader/writer connections for interior mutability.
/// All methods take `&self`, so the HTTP layer can share an `Arc<Storage>`.
/// Each call holds a connection only for its own duration.
pub struct Storage {
    writer: Mutex<Connection>,
    reader: Mutex<Connection>,
    path: PathBuf,
}

impl Storage {
    /// Apply PRAGMAs to a connection
    fn configure_connection(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;",
        )?;
        Ok(())
    }

    /// Open storage from a connection string (`sqlite://path`, `sqlite:path` or a path)
    pub fn open(database_url: &str) -> Result<Self> {
        let path = DatabaseConfig {
            url: database_url.to_string(),
        }
        .path()
        .map_err(|e| StorageError::Init(e.to_string()))?;
        Self::new(path)
    }

    /// Open (creating if absent) the database at `path` and migrate it
    pub fn new(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        // Open writer connection
        let writer_conn = Connection::open(&path)?;
        Self::configure_connection(&writer_conn)?;

        // Apply migrations on writer only
        let applied = super::migrations::apply_migrations(&writer_conn)?;
        if applied > 0 {
            tracing::info!(path = %path.display(), applied, "Database schema up to date");
        }

        // Open reader connection to same path
        let reader_conn = Connection::open(&path)?;
        Self::configure_connection(&reader_conn)?;

        Ok(Self {
            writer: Mutex::new(writer_conn),
            reader: Mutex::new(reader_conn),
            path,
        })
    }

    /// Database file location
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse RFC3339 timestamp
    fn parse_timestamp(value: &str, field_name: &str) -> rusqlite::Result<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    0,
                    rusqlite::types::Type::Text,
                    Box::new(StorageError::InvalidTimestamp(format!(
                        "{} '{}': {}",
                        field_name, value, e
                    ))),
                )
            })
    }

    /// Convert a row to FeedbackRecord
    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<FeedbackRecord> {
        let created_at: String = row.get("created_at")?;

        Ok(FeedbackRecord {
            id: row.get("id")?,
            text_original: row.get("text_original")?,
            text_translated: row.get("text_translated")?,
            sentiment: row.get("sentiment")?,
            language: row.get("language")?,
            product: row.get("product")?,
            created_at: Self::parse_timestamp(&created_at, "created_at")?,
        })
    }

    /// Insert one analyzed submission.
    ///
    /// Single statement, so the row is either fully written or not at all.
    /// Returns the stored record with its assigned id and timestamp.
    pub fn insert_feedback(&self, input: NewFeedback) -> Result<FeedbackRecord> {
        let writer = self
            .writer
            .lock()
            .map_err(|_| StorageError::Init("Writer lock poisoned".into()))?;

        let record = writer.query_row(
            &format!(
                "INSERT INTO feedback (text_original, text_translated, sentiment, language, product)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 RETURNING {}",
                SELECT_COLUMNS
            ),
            params![
                input.text_original,
                input.text_translated,
                input.sentiment,
                input.language,
                input.product,
            ],
            Self::row_to_record,
        )?;

        tracing::info!(
            id = record.id,
            product = %record.product,
            sentiment = %record.sentiment,
            language = %record.language,
            "Inserted feedback"
        );
        Ok(record)
    }

    /// Get a single record by id
    pub fn get_feedback(&self, id: i64) -> Result<Option<FeedbackRecord>> {
        let reader = self
            .reader
            .lock()
            .map_err(|_| StorageError::Init("Reader lock poisoned".into()))?;

        let record = reader
            .query_row(
                &format!("SELECT {} FROM feedback WHERE id = ?1", SELECT_COLUMNS),
                params![id],
                Self::row_to_record,
            )
            .optional()?;
        Ok(record)
    }

    /// All records matching `filter`, newest first
    pub fn list_feedback(&self, filter: &FeedbackFilter) -> Result<Vec<FeedbackRecord>> {
        let filter = filter.normalized();

        let reader = self
            .reader
            .lock()
            .map_err(|_| StorageError::Init("Reader lock poisoned".into()))?;
        let mut stmt = reader.prepare(&format!(
            "SELECT {} FROM feedback
             WHERE (?1 IS NULL OR language = ?1)
               AND (?2 IS NULL OR product = ?2)
             ORDER BY created_at DESC, id DESC",
            SELECT_COLUMNS
        ))?;

        let rows = stmt.query_map(params![filter.language, filter.product], Self::row_to_record)?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    /// Total number of stored records
    pub fn count_feedback(&self) -> Result<i64> {
        let reader = self
            .reader
            .lock()
            .map_err(|_| StorageError::Init("Reader lock poisoned".into()))?;
        let total = reader.query_row("SELECT COUNT(*) FROM feedback", [], |row| row.get(0))?;
        Ok(total)
    }

    /// Sentiment counts and percentages over the whole table
    pub fn sentiment_stats(&self) -> Result<SentimentStats> {
        let reader = self
            .reader
            .lock()
            .map_err(|_| StorageError::Init("Reader lock poisoned".into()))?;

        let mut stmt =
            reader.prepare("SELECT sentiment, COUNT(*) FROM feedback GROUP BY sentiment")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut counts = Vec::new();
        for row in rows {
            counts.push(row?);
        }
        let total = counts.iter().map(|(_, count)| count).sum();

        Ok(SentimentStats::from_counts(total, counts))
    }
}
