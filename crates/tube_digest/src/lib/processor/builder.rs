use digest_store::DataStore;

use crate::{
    telegram::Messenger,
    yt::{CaptionSource, TranscriptFetcher},
    Summarizer, SummaryPipeline,
};

pub struct SummaryPipelineBuilder<D = (), C = (), S = (), M = ()> {
    store: D,
    captions: C,
    summarizer: S,
    messenger: M,
    languages: Option<Vec<String>>,
    digest: bool,
}

impl SummaryPipelineBuilder {
    pub fn new() -> Self {
        Self {
            store: (),
            captions: (),
            summarizer: (),
            messenger: (),
            languages: None,
            digest: false,
        }
    }
}

impl Default for SummaryPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<D, C, S, M> SummaryPipelineBuilder<D, C, S, M> {
    pub fn store<D2: DataStore + Send + Sync + 'static>(
        self,
        store: D2,
    ) -> SummaryPipelineBuilder<D2, C, S, M> {
        SummaryPipelineBuilder {
            store,
            captions: self.captions,
            summarizer: self.summarizer,
            messenger: self.messenger,
            languages: self.languages,
            digest: self.digest,
        }
    }

    pub fn captions<C2: CaptionSource + Send + Sync + 'static>(
        self,
        captions: C2,
    ) -> SummaryPipelineBuilder<D, C2, S, M> {
        SummaryPipelineBuilder {
            store: self.store,
            captions,
            summarizer: self.summarizer,
            messenger: self.messenger,
            languages: self.languages,
            digest: self.digest,
        }
    }

    pub fn summarizer<S2: Summarizer + Send + Sync + 'static>(
        self,
        summarizer: S2,
    ) -> SummaryPipelineBuilder<D, C, S2, M> {
        SummaryPipelineBuilder {
            store: self.store,
            captions: self.captions,
            summarizer,
            messenger: self.messenger,
            languages: self.languages,
            digest: self.digest,
        }
    }

    pub fn messenger<M2: Messenger + Send + Sync + 'static>(
        self,
        messenger: M2,
    ) -> SummaryPipelineBuilder<D, C, S, M2> {
        SummaryPipelineBuilder {
            store: self.store,
            captions: self.captions,
            summarizer: self.summarizer,
            messenger,
            languages: self.languages,
            digest: self.digest,
        }
    }

    /// Caption languages to try, most preferred first
    pub fn languages(mut self, languages: Vec<String>) -> Self {
        self.languages = Some(languages);
        self
    }

    /// Adds a one-sentence digest to confirmations
    pub fn with_digest(mut self, digest: bool) -> Self {
        self.digest = digest;
        self
    }
}

impl<D, C, S, M> SummaryPipelineBuilder<D, C, S, M>
where
    D: DataStore + Send + Sync + 'static,
    C: CaptionSource + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
    M: Messenger + Send + Sync + 'static,
{
    pub fn build(self) -> SummaryPipeline<D, C, S, M> {
        let mut transcripts = TranscriptFetcher::new(self.captions);
        if let Some(languages) = self.languages.filter(|l| !l.is_empty()) {
            transcripts = transcripts.with_languages(languages);
        }

        SummaryPipeline {
            store: self.store,
            transcripts,
            summarizer: self.summarizer,
            messenger: self.messenger,
            digest: self.digest,
        }
    }
}
