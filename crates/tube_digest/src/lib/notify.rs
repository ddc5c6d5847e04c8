//! User-facing texts sent back to the chat.
//!
//! Everything here is pure formatting.

use itertools::Itertools;

use crate::error::Error;

pub const HELP: &str = "Send me a YouTube link and I'll summarize the video for you. 🎬\n\
Supported: youtube.com/watch?v=…, youtu.be/…, youtube.com/shorts/…, youtube.com/embed/…";
pub const FETCHING_TRANSCRIPT: &str = "⏳ Fetching transcript...";
pub const SUMMARIZING: &str = "🤖 Summarizing... (about 30 seconds)";

const NOT_A_LINK: &str = "Please send me a YouTube link! 🎬";
const UNRECOGNIZED_FORMAT: &str = "I couldn't find a valid YouTube video in that link 😢";
const TRANSCRIPT_UNAVAILABLE: &str = "❌ Couldn't get captions or a transcript for this video.";
const GENERIC_FAILURE: &str = "❌ Something went wrong while summarizing this video. Please try again later.";

/// The message shown for a failed run.
///
/// Summarization and storage failures share one message that carries no
/// error detail.
pub fn failure_message(error: &Error) -> &'static str {
    match error {
        Error::NotARecognizedLink => NOT_A_LINK,
        Error::UnrecognizedLinkFormat => UNRECOGNIZED_FORMAT,
        Error::TranscriptUnavailable { .. } => TRANSCRIPT_UNAVAILABLE,
        _ => GENERIC_FAILURE,
    }
}

/// Confirmation for a stored summary
pub fn compose_confirmation(title: &str, tags: &[String], digest: Option<&str>) -> String {
    let mut text = format!("✅ Summary complete!\n\n📌 {title}");

    if !tags.is_empty() {
        let tags = tags.iter().map(|t| format!("#{t}")).join(" ");
        text.push_str(&format!("\n🏷️ {tags}"));
    }

    if let Some(digest) = digest.map(str::trim).filter(|d| !d.is_empty()) {
        text.push_str(&format!("\n\n💬 {digest}"));
    }

    text.push_str("\n\nCheck the dashboard for the full summary!");
    text
}
