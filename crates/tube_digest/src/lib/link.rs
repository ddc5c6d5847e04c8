//! # Link extraction
//!
//! Pulls a YouTube video id out of free-form message text.
//!
//! Extraction happens in two steps so callers can tell "this isn't a YouTube
//! link at all" apart from "this is a YouTube link we can't read":
//!
//! 1. a substring check for the known hostnames, which short-circuits;
//! 2. an ordered list of id patterns, first match wins.

use std::{fmt, ops::Deref, sync::LazyLock};

use regex::Regex;

use crate::error::Error;

const YOUTUBE_HOSTS: [&str; 2] = ["youtube.com", "youtu.be"];

/// Long-form `?v=`, short-domain, and `/shorts/` forms first, `/embed/` last
static VIDEO_ID_PATTERNS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"(?:v=|youtu\.be/|shorts/)([A-Za-z0-9_-]{11})").unwrap(),
        Regex::new(r"embed/([A-Za-z0-9_-]{11})").unwrap(),
    ]
});

/// An 11 character YouTube video id
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    pub const LEN: usize = 11;

    /// Validates a bare id
    pub fn parse(id: &str) -> Option<Self> {
        let valid = id.len() == Self::LEN
            && id
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');

        valid.then(|| VideoId(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for VideoId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Cheap hostname check, run before any pattern matching
pub fn mentions_youtube(text: &str) -> bool {
    YOUTUBE_HOSTS.iter().any(|host| text.contains(host))
}

/// Extracts the first video id found in `text`.
///
/// # Returns
/// * `Ok(VideoId)` for the first pattern that matches.
/// * `Err(Error::NotARecognizedLink)` if neither YouTube hostname appears.
/// * `Err(Error::UnrecognizedLinkFormat)` if a hostname appears but no pattern matches.
pub fn extract_video_id(text: &str) -> Result<VideoId, Error> {
    if !mentions_youtube(text) {
        return Err(Error::NotARecognizedLink);
    }

    VIDEO_ID_PATTERNS
        .iter()
        .find_map(|re| re.captures(text).and_then(|cap| cap.get(1)))
        .and_then(|m| VideoId::parse(m.as_str()))
        .ok_or(Error::UnrecognizedLinkFormat)
}
