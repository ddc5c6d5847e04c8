use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc, Mutex,
};

use tube_digest::telegram::{Messenger, SentMessage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outgoing {
    Sent { chat_id: i64, text: String },
    Edited { message: SentMessage, text: String },
}

impl Outgoing {
    pub fn text(&self) -> &str {
        match self {
            Outgoing::Sent { text, .. } | Outgoing::Edited { text, .. } => text,
        }
    }
}

#[derive(Clone, Default)]
pub struct MockMessenger {
    pub outgoing: Arc<Mutex<Vec<Outgoing>>>,
    next_id: Arc<AtomicI64>,
    fail_edits: bool,
}

impl MockMessenger {
    /// Sends succeed, every edit fails
    pub fn failing_edits() -> Self {
        Self {
            fail_edits: true,
            ..Default::default()
        }
    }

    /// The last text the user would see
    pub fn last_text(&self) -> Option<String> {
        self.outgoing
            .lock()
            .unwrap()
            .last()
            .map(|o| o.text().to_string())
    }
}

impl Messenger for MockMessenger {
    async fn send_text(&self, chat_id: i64, text: &str) -> anyhow::Result<SentMessage> {
        let message = SentMessage {
            chat_id,
            message_id: self.next_id.fetch_add(1, Ordering::SeqCst),
        };
        self.outgoing.lock().unwrap().push(Outgoing::Sent {
            chat_id,
            text: text.to_string(),
        });
        Ok(message)
    }

    async fn edit_text(&self, message: SentMessage, text: &str) -> anyhow::Result<()> {
        if self.fail_edits {
            anyhow::bail!("Bad Request: message to edit not found");
        }
        self.outgoing.lock().unwrap().push(Outgoing::Edited {
            message,
            text: text.to_string(),
        });
        Ok(())
    }
}
