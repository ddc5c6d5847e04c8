use std::future::Future;

use crate::{NewSummary, SummaryRecord};

pub mod postgres;

pub trait DataStore {
    /// Inserts one new summary row and returns it with its assigned id and timestamp.
    ///
    /// No lookup by `video_id` happens first; submitting the same video twice
    /// yields two rows.
    fn insert_summary(
        &self,
        summary: &NewSummary,
    ) -> impl Future<Output = anyhow::Result<SummaryRecord>> + Send;
}

impl<T: DataStore + Send + Sync> DataStore for &T {
    async fn insert_summary(&self, summary: &NewSummary) -> anyhow::Result<SummaryRecord> {
        (**self).insert_summary(summary).await
    }
}

impl<T: DataStore + Send + Sync> DataStore for std::sync::Arc<T> {
    async fn insert_summary(&self, summary: &NewSummary) -> anyhow::Result<SummaryRecord> {
        (**self).insert_summary(summary).await
    }
}
