use std::{
    fmt::{Debug, Display},
    future::Future,
    sync::Arc,
};

const SUMMARY_PROMPT: &str = include_str!("./prompts/summary_0.txt");
const CONDENSE_PROMPT: &str = include_str!("./prompts/condense_0.txt");

pub trait Summarizer {
    /// Transcripts are cut to this many characters before prompting
    const TRANSCRIPT_CHAR_LIMIT: usize = 12_000;
    const SUMMARIZER_MODEL: &str;

    /// Converted into an [`anyhow::Error`] so the run keeps the cause chain
    type Error: Into<anyhow::Error> + Debug + Display + Send;

    /// One request, one structured markdown summary back
    fn summarize(
        &self,
        transcript: &str,
    ) -> impl Future<Output = Result<SummaryResponse, Self::Error>> + Send;

    /// Squeezes an existing summary into a single sentence
    fn condense(&self, summary: &str) -> impl Future<Output = Result<String, Self::Error>> + Send;
}

impl<T: Summarizer + Send + Sync> Summarizer for Arc<T> {
    const TRANSCRIPT_CHAR_LIMIT: usize = T::TRANSCRIPT_CHAR_LIMIT;
    const SUMMARIZER_MODEL: &'static str = T::SUMMARIZER_MODEL;
    type Error = T::Error;

    async fn summarize(&self, transcript: &str) -> Result<SummaryResponse, Self::Error> {
        (**self).summarize(transcript).await
    }

    async fn condense(&self, summary: &str) -> Result<String, Self::Error> {
        (**self).condense(summary).await
    }
}

#[derive(Debug, Clone)]
pub struct SummaryResponse {
    /// Markdown following the summary template, ending in a `[TAGS]` line
    pub summary: String,
}

/// First `max_chars` characters of `text`, never splitting a character
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// The full summary prompt with the (truncated) transcript filled in
pub fn build_summary_prompt(transcript: &str, max_chars: usize) -> String {
    SUMMARY_PROMPT.replace("{transcript}", truncate_chars(transcript, max_chars))
}

pub fn build_condense_prompt(summary: &str) -> String {
    CONDENSE_PROMPT.replace("{summary}", summary)
}
