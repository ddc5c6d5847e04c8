use chrono::{DateTime, Utc};
use uuid::Uuid;

pub const THUMBNAIL_BASE_URL: &str = "https://img.youtube.com/vi";

/// Thumbnail for a video, derived from its id alone
pub fn thumbnail_url(video_id: &str) -> String {
    format!("{THUMBNAIL_BASE_URL}/{video_id}/maxresdefault.jpg")
}

/// A summary that has not been stored yet.
///
/// `transcript_text` holds the complete concatenated captions, not a link to them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewSummary {
    pub youtube_url: String,
    pub video_id: String,
    pub title: String,
    pub thumbnail_url: String,
    pub summary_text: String,
    pub transcript_text: String,
    pub tags: Vec<String>,
}

impl NewSummary {
    /// Builds an insertable summary, deriving the thumbnail from `video_id`
    pub fn new(
        youtube_url: impl Into<String>,
        video_id: impl Into<String>,
        title: impl Into<String>,
        summary_text: impl Into<String>,
        transcript_text: impl Into<String>,
        tags: Vec<String>,
    ) -> Self {
        let video_id = video_id.into();
        Self {
            youtube_url: youtube_url.into(),
            thumbnail_url: thumbnail_url(&video_id),
            video_id,
            title: title.into(),
            summary_text: summary_text.into(),
            transcript_text: transcript_text.into(),
            tags,
        }
    }

    /// Attaches the store-assigned identity, producing the persisted shape
    pub fn into_record(self, id: Uuid, created_at: DateTime<Utc>) -> SummaryRecord {
        SummaryRecord {
            id,
            youtube_url: self.youtube_url,
            video_id: self.video_id,
            title: self.title,
            thumbnail_url: self.thumbnail_url,
            summary_text: self.summary_text,
            transcript_text: self.transcript_text,
            tags: self.tags,
            created_at,
        }
    }
}

/// A stored summary row. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct SummaryRecord {
    pub id: Uuid,
    pub youtube_url: String,
    pub video_id: String,
    pub title: String,
    pub thumbnail_url: String,
    pub summary_text: String,
    pub transcript_text: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}
