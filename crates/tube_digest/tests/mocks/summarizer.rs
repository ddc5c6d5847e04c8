use std::sync::{Arc, Mutex};

use tube_digest::{Summarizer, SummaryResponse};

#[derive(Clone)]
pub struct MockSummarizer {
    pub summary: String,
    pub digest: Option<String>,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
}

impl MockSummarizer {
    pub fn new(summary: &str) -> Self {
        Self {
            summary: summary.to_string(),
            digest: None,
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn with_digest(mut self, digest: &str) -> Self {
        self.digest = Some(digest.to_string());
        self
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            summary: String::new(),
            digest: None,
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(msg.to_string()),
        }
    }
}

impl Summarizer for MockSummarizer {
    const TRANSCRIPT_CHAR_LIMIT: usize = 12_000;
    const SUMMARIZER_MODEL: &'static str = "mock-model";
    type Error = anyhow::Error;

    async fn summarize(&self, transcript: &str) -> Result<SummaryResponse, Self::Error> {
        self.calls.lock().unwrap().push(transcript.to_string());
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        Ok(SummaryResponse {
            summary: self.summary.clone(),
        })
    }

    async fn condense(&self, _summary: &str) -> Result<String, Self::Error> {
        self.digest
            .clone()
            .ok_or_else(|| anyhow::anyhow!("condense not configured"))
    }
}
