use std::sync::{Arc, Mutex};

use chrono::Utc;
use digest_store::{DataStore, NewSummary, SummaryRecord};
use uuid::Uuid;

#[derive(Clone, Default)]
pub struct MockDataStore {
    pub inserted: Arc<Mutex<Vec<SummaryRecord>>>,
    pub fail_with: Option<String>,
}

impl MockDataStore {
    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

impl DataStore for MockDataStore {
    async fn insert_summary(&self, summary: &NewSummary) -> anyhow::Result<SummaryRecord> {
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        let record = summary.clone().into_record(Uuid::new_v4(), Utc::now());
        self.inserted.lock().unwrap().push(record.clone());
        Ok(record)
    }
}
