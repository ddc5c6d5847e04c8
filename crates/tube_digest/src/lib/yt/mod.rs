pub mod captions;

use std::{future::Future, sync::Arc};

use itertools::Itertools;
use serde::Deserialize;

use crate::link::VideoId;

/// One language's caption track as listed by YouTube
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionTrack {
    pub base_url: String,
    pub language_code: String,
    /// `Some("asr")` for auto-generated tracks
    #[serde(default)]
    pub kind: Option<String>,
}

impl CaptionTrack {
    pub fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

/// A single timed caption line; timing is dropped at the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionEntry {
    pub text: String,
}

impl From<&str> for CaptionEntry {
    fn from(text: &str) -> Self {
        CaptionEntry { text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptResult {
    pub language_code: String,
    pub text: String,
}

pub trait CaptionSource {
    fn list_tracks(
        &self,
        video_id: &VideoId,
    ) -> impl Future<Output = anyhow::Result<Vec<CaptionTrack>>> + Send;

    /// Caption entries in chronological order
    fn fetch_track(
        &self,
        track: &CaptionTrack,
    ) -> impl Future<Output = anyhow::Result<Vec<CaptionEntry>>> + Send;
}

impl<T: CaptionSource + Send + Sync> CaptionSource for Arc<T> {
    async fn list_tracks(&self, video_id: &VideoId) -> anyhow::Result<Vec<CaptionTrack>> {
        (**self).list_tracks(video_id).await
    }

    async fn fetch_track(&self, track: &CaptionTrack) -> anyhow::Result<Vec<CaptionEntry>> {
        (**self).fetch_track(track).await
    }
}

/// Retrieves a video's transcript with language and track fallback
#[derive(Debug, Clone)]
pub struct TranscriptFetcher<C> {
    source: C,
    languages: Vec<String>,
}

impl<C: CaptionSource + Send + Sync> TranscriptFetcher<C> {
    pub const DEFAULT_LANGUAGES: [&'static str; 2] = ["ko", "en"];

    pub fn new(source: C) -> Self {
        Self {
            source,
            languages: Self::DEFAULT_LANGUAGES.map(String::from).to_vec(),
        }
    }

    pub fn with_languages(mut self, languages: Vec<String>) -> Self {
        self.languages = languages;
        self
    }

    /// Fetches the transcript for `video_id`.
    ///
    /// Returns `None` when nothing usable came back, whatever the cause: no
    /// tracks, a listing error, or every candidate track failing or being empty.
    #[tracing::instrument(skip(self, video_id), fields(video_id = %video_id))]
    pub async fn fetch(&self, video_id: &VideoId) -> Option<TranscriptResult> {
        let tracks = self
            .source
            .list_tracks(video_id)
            .await
            .inspect_err(|e| tracing::warn!(error = ?e, "Failed to list caption tracks"))
            .ok()?;

        if tracks.is_empty() {
            tracing::info!("Video has no caption tracks");
            return None;
        }

        for track in candidate_tracks(&tracks, &self.languages) {
            let entries = match self.source.fetch_track(track).await {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(error = ?e, language = %track.language_code, "Failed to fetch caption track");
                    continue;
                }
            };

            let text = join_entries(&entries);
            if text.is_empty() {
                tracing::debug!(language = %track.language_code, "Caption track is empty");
                continue;
            }

            tracing::info!(language = %track.language_code, chars = text.len(), "Fetched transcript");
            return Some(TranscriptResult {
                language_code: track.language_code.clone(),
                text,
            });
        }

        None
    }
}

/// Orders the tracks worth trying: every track of each preferred language
/// (manual before generated), then the first listed track not already a
/// candidate as the any-language fallback.
pub fn candidate_tracks<'a>(tracks: &'a [CaptionTrack], languages: &[String]) -> Vec<&'a CaptionTrack> {
    let mut candidates = languages
        .iter()
        .flat_map(|lang| {
            tracks
                .iter()
                .filter(move |t| t.language_code == *lang)
                .sorted_by_key(|t| t.is_generated())
        })
        .unique()
        .collect_vec();

    if let Some(fallback) = tracks.iter().find(|t| !candidates.contains(t)) {
        candidates.push(fallback);
    }
    candidates
}

/// Joins entry texts with single spaces, dropping empty entries
pub fn join_entries(entries: &[CaptionEntry]) -> String {
    entries
        .iter()
        .map(|e| e.text.split_whitespace().join(" "))
        .filter(|t| !t.is_empty())
        .join(" ")
}
