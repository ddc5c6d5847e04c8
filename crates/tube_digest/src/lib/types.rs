//! Wire types for the Telegram Bot API.
//!
//! Only the fields the pipeline reads are modelled; everything else in an
//! update is ignored during deserialization.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Chat {
    pub id: i64,
}

/// Envelope around every Bot API response
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

impl Update {
    /// The text of the carried message, if this update is a text message
    pub fn text_message(&self) -> Option<(&Message, &str)> {
        let message = self.message.as_ref()?;
        let text = message.text.as_deref()?;
        Some((message, text))
    }
}
