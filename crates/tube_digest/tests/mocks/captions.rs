use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use tube_digest::{
    link::VideoId,
    yt::{CaptionEntry, CaptionSource, CaptionTrack},
};

#[derive(Clone, Default)]
pub struct MockCaptionSource {
    pub tracks: Vec<CaptionTrack>,
    /// Entries per track `base_url`; a missing key makes the fetch fail
    pub entries: HashMap<String, Vec<CaptionEntry>>,
    pub list_calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
}

impl MockCaptionSource {
    /// A single track in `language` with the given caption lines
    pub fn with_track(language: &str, lines: &[&str]) -> Self {
        let track = CaptionTrack {
            base_url: format!("https://www.youtube.com/api/timedtext?lang={language}"),
            language_code: language.to_string(),
            kind: None,
        };
        let entries = lines.iter().map(|line| CaptionEntry::from(*line)).collect();

        Self {
            entries: HashMap::from([(track.base_url.clone(), entries)]),
            tracks: vec![track],
            ..Default::default()
        }
    }

    pub fn without_tracks() -> Self {
        Self::default()
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

impl CaptionSource for MockCaptionSource {
    async fn list_tracks(&self, video_id: &VideoId) -> anyhow::Result<Vec<CaptionTrack>> {
        self.list_calls.lock().unwrap().push(video_id.to_string());
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        Ok(self.tracks.clone())
    }

    async fn fetch_track(&self, track: &CaptionTrack) -> anyhow::Result<Vec<CaptionEntry>> {
        self.entries
            .get(&track.base_url)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no entries for {}", track.base_url))
    }
}
