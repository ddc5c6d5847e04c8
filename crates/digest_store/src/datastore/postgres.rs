use anyhow::Context;
use sqlx::{migrate::Migrator, postgres::PgPoolOptions, PgPool};

use crate::{datastore::DataStore, NewSummary, SummaryRecord};

static MIGRATOR: Migrator = sqlx::migrate!();

#[derive(Debug, Clone)]
pub struct PgDataStore {
    pub pool: PgPool,
}

impl PgDataStore {
    /// Establish connection to database and create the summaries table
    /// if not exists
    pub async fn init(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .inspect_err(
                |e| tracing::error!(error = ?e, "Failed to establish connection to database"),
            )
            .context("Failed to connect to postgres database")?;

        MIGRATOR
            .run(&pool)
            .await
            .inspect_err(|e| tracing::error!(error = ?e, "Failed to run database migrations"))
            .context("Failed to run database migrations")?;

        Ok(PgDataStore { pool })
    }
}

impl DataStore for PgDataStore {
    #[tracing::instrument(skip_all, fields(video_id = %summary.video_id))]
    async fn insert_summary(&self, summary: &NewSummary) -> anyhow::Result<SummaryRecord> {
        let record = sqlx::query_as::<_, SummaryRecord>(
            r#"
            INSERT INTO youtube_summaries
                (youtube_url, video_id, title, thumbnail_url, summary_text, transcript_text, tags)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, youtube_url, video_id, title, thumbnail_url, summary_text,
                      transcript_text, tags, created_at
            "#,
        )
        .bind(&summary.youtube_url)
        .bind(&summary.video_id)
        .bind(&summary.title)
        .bind(&summary.thumbnail_url)
        .bind(&summary.summary_text)
        .bind(&summary.transcript_text)
        .bind(&summary.tags)
        .fetch_one(&self.pool)
        .await
        .inspect_err(|err| {
            tracing::error!(
                error = ?err,
                video_id = %summary.video_id,
                "Failed to insert summary"
            )
        })
        .context("Failed to insert summary")?;

        tracing::info!(id = %record.id, "Stored summary");

        Ok(record)
    }
}
