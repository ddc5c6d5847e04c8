use reqwest::Client;
use serde::Deserialize;

use crate::{
    llm::summarizer::{build_condense_prompt, build_summary_prompt},
    Summarizer, SummaryResponse,
};

#[derive(Debug, Clone)]
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AnthropicError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Model returned no text content")]
    EmptyResponse,
}

impl AnthropicClient {
    const API_VERSION: &str = "2023-06-01";
    const MAX_TOKENS: u32 = 4096;
    const CONDENSE_MAX_TOKENS: u32 = 256;

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: "https://api.anthropic.com/v1".into(),
            model: <Self as Summarizer>::SUMMARIZER_MODEL.into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    #[tracing::instrument(skip(self, user_content), fields(model = %self.model))]
    pub async fn send_message_request(
        &self,
        user_content: impl Into<String>,
        max_tokens: u32,
    ) -> Result<MessageResponse, AnthropicError> {
        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": max_tokens,
            "messages": [
                {
                    "role": "user",
                    "content": user_content.into()
                }
            ]
        });

        let resp = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", Self::API_VERSION)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(AnthropicError::Api { status, message });
        }

        Ok(resp.json::<MessageResponse>().await?)
    }
}

#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    pub id: String,
    pub content: Vec<ContentBlock>,
    pub stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

impl MessageResponse {
    /// The first text block, if the model produced one
    pub fn into_text(self) -> Option<String> {
        self.content.into_iter().find_map(|block| match block {
            ContentBlock::Text { text } if !text.trim().is_empty() => Some(text),
            _ => None,
        })
    }
}

impl Summarizer for AnthropicClient {
    const SUMMARIZER_MODEL: &'static str = "claude-sonnet-4-5";
    type Error = AnthropicError;

    async fn summarize(&self, transcript: &str) -> Result<SummaryResponse, Self::Error> {
        let prompt = build_summary_prompt(transcript, Self::TRANSCRIPT_CHAR_LIMIT);

        let response = self
            .send_message_request(prompt, Self::MAX_TOKENS)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to summarize transcript"))?;

        if response.stop_reason.as_deref() == Some("max_tokens") {
            tracing::warn!(id = %response.id, "Summary was cut off at the token limit");
        }

        let summary = response.into_text().ok_or(AnthropicError::EmptyResponse)?;

        Ok(SummaryResponse { summary })
    }

    async fn condense(&self, summary: &str) -> Result<String, Self::Error> {
        let response = self
            .send_message_request(build_condense_prompt(summary), Self::CONDENSE_MAX_TOKENS)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to condense summary"))?;

        response
            .into_text()
            .map(|text| text.trim().to_string())
            .ok_or(AnthropicError::EmptyResponse)
    }
}
