use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const PNG_CONTENT_TYPE: &str = "image/png";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: String,
    pub url: String,
    pub title: String,
    pub source: String,
    pub description: String,
    pub text: String,
    pub content_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}

/// Inbound chat message handed to an action by the host runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Memory {
    pub id: Uuid,
    pub user_id: Option<String>,
    pub room_id: Option<String>,
    pub content: Content,
}

impl Memory {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: None,
            room_id: None,
            content: Content::text(text),
        }
    }
}

/// A single turn in an action usage example.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionExample {
    pub user: String,
    pub content: Content,
}

impl ActionExample {
    pub fn new(user: &str, content: Content) -> Self {
        Self {
            user: user.to_string(),
            content,
        }
    }
}
