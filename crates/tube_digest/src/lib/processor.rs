pub mod builder;

use digest_store::{DataStore, NewSummary, SummaryRecord};

use crate::{
    dispatch::UpdateHandler,
    error::Error,
    link::{extract_video_id, VideoId},
    notify,
    parser::{parse_tags, parse_title},
    telegram::{Messenger, SentMessage},
    types::Update,
    yt::{CaptionSource, TranscriptFetcher},
    Summarizer,
};

/// Turns one chat message with a YouTube link into one stored summary
#[derive(Debug)]
pub struct SummaryPipeline<D, C, S, M>
where
    D: DataStore + Send + Sync + 'static,
    C: CaptionSource + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
    M: Messenger + Send + Sync + 'static,
{
    store: D,
    transcripts: TranscriptFetcher<C>,
    summarizer: S,
    messenger: M,
    digest: bool,
}

impl<D, C, S, M> SummaryPipeline<D, C, S, M>
where
    D: DataStore + Send + Sync + 'static,
    C: CaptionSource + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
    M: Messenger + Send + Sync + 'static,
{
    /// Handles one inbound text message end to end.
    ///
    /// Every failure of the run itself is reported to the chat and yields
    /// `Ok(None)`; `Err` means the chat could not be reached.
    #[tracing::instrument(skip(self, text))]
    pub async fn handle_text(
        &self,
        chat_id: i64,
        text: &str,
    ) -> anyhow::Result<Option<SummaryRecord>> {
        let text = text.trim();

        let video_id = match extract_video_id(text) {
            Ok(video_id) => video_id,
            Err(e) => {
                tracing::info!(reason = %e, "Ignoring message without a usable link");
                self.messenger
                    .send_text(chat_id, notify::failure_message(&e))
                    .await?;
                return Ok(None);
            }
        };

        tracing::info!(%video_id, "Starting pipeline run");
        let status = self
            .messenger
            .send_text(chat_id, notify::FETCHING_TRANSCRIPT)
            .await?;

        match self.summarize_video(text, &video_id, status).await {
            Ok(record) => {
                let digest = self.condense(&record).await;
                let confirmation =
                    notify::compose_confirmation(&record.title, &record.tags, digest.as_deref());
                self.messenger.edit_text(status, &confirmation).await?;
                Ok(Some(record))
            }
            Err(e) => {
                if e.is_run_failure() {
                    tracing::error!(error = ?e, %video_id, "Pipeline run failed");
                } else {
                    tracing::info!(reason = %e, %video_id, "Pipeline run ended early");
                }
                self.messenger
                    .edit_text(status, notify::failure_message(&e))
                    .await?;
                Ok(None)
            }
        }
    }

    /// Transcript, summary, parsing, and storage. Nothing is stored unless
    /// both a transcript and a summary exist.
    async fn summarize_video(
        &self,
        url: &str,
        video_id: &VideoId,
        status: SentMessage,
    ) -> Result<SummaryRecord, Error> {
        let transcript =
            self.transcripts
                .fetch(video_id)
                .await
                .ok_or_else(|| Error::TranscriptUnavailable {
                    video_id: video_id.to_string(),
                })?;

        // progress only; the run goes on if the edit fails
        if let Err(e) = self.messenger.edit_text(status, notify::SUMMARIZING).await {
            tracing::warn!(error = ?e, "Failed to update progress message");
        }

        let summary = self
            .summarizer
            .summarize(&transcript.text)
            .await
            .map_err(|e| Error::Summarization(e.into()))?
            .summary;

        let title = parse_title(&summary);
        let tags = parse_tags(&summary);
        tracing::debug!(%title, ?tags, language = %transcript.language_code, "Parsed summary");

        let summary = NewSummary::new(url, video_id.as_str(), title, summary, transcript.text, tags);

        self.store
            .insert_summary(&summary)
            .await
            .map_err(Error::Persistence)
    }

    /// One-sentence digest for the confirmation, when enabled. Never fails the run.
    async fn condense(&self, record: &SummaryRecord) -> Option<String> {
        if !self.digest {
            return None;
        }

        self.summarizer
            .condense(&record.summary_text)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, id = %record.id, "Failed to condense summary"))
            .ok()
    }
}

impl<D, C, S, M> UpdateHandler for SummaryPipeline<D, C, S, M>
where
    D: DataStore + Send + Sync + 'static,
    C: CaptionSource + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
    M: Messenger + Send + Sync + 'static,
{
    async fn handle_update(&self, update: Update) -> anyhow::Result<()> {
        let Some((message, text)) = update.text_message() else {
            tracing::debug!(update_id = update.update_id, "Skipping update without text");
            return Ok(());
        };
        let chat_id = message.chat.id;

        if let Some(command) = bot_command(text) {
            if matches!(command, "start" | "help") {
                self.messenger.send_text(chat_id, notify::HELP).await?;
            } else {
                tracing::debug!(command, "Ignoring unknown command");
            }
            return Ok(());
        }

        self.handle_text(chat_id, text).await?;
        Ok(())
    }
}

/// `"/start@my_bot args"` -> `Some("start")`
fn bot_command(text: &str) -> Option<&str> {
    let command = text.trim_start().strip_prefix('/')?;
    let command = command.split_whitespace().next().unwrap_or_default();
    Some(command.split('@').next().unwrap_or_default())
}
