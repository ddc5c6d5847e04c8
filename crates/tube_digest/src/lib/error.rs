/// Failures a single pipeline run can end with.
///
/// The first two are detected before any network call; each variant maps to
/// exactly one user-facing message in [`crate::notify`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Message does not contain a YouTube link")]
    NotARecognizedLink,
    #[error("YouTube link found but its format is not recognized")]
    UnrecognizedLinkFormat,
    #[error("No usable transcript for video {video_id}")]
    TranscriptUnavailable { video_id: String },
    #[error("Summarization failed")]
    Summarization(#[source] anyhow::Error),
    #[error("Failed to persist summary")]
    Persistence(#[source] anyhow::Error),
    #[error("Parse error: {0}")]
    ParseError(&'static str),
}

impl Error {
    /// Whether the failure happened after the link was accepted and work began
    pub fn is_run_failure(&self) -> bool {
        matches!(self, Error::Summarization(_) | Error::Persistence(_))
    }
}
