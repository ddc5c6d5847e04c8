pub mod dispatch;
mod error;
pub mod intake;
pub mod link;
mod llm;
pub mod notify;
pub mod parser;
mod processor;
pub mod telegram;
pub mod tracing;
pub mod types;
pub mod yt;

pub use error::Error;
pub use llm::anthropic;
pub use llm::summarizer::{
    build_condense_prompt, build_summary_prompt, truncate_chars, Summarizer, SummaryResponse,
};
pub use processor::{builder::SummaryPipelineBuilder, SummaryPipeline};
