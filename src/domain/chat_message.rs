use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use crate::record_store::NewObject;

pub const CHAT_MESSAGE_OBJECT_TYPE: &str = "chat-messages";

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct ChatBody {
    pub name: String,
    pub email: String,
    pub message: String,
    pub message_type: String,
}

#[derive(Debug)]
pub struct NewChatMessage {
    pub name: String,
    pub email: String,
    pub message: String,
    pub message_type: String,
}

impl TryFrom<ChatBody> for NewChatMessage {
    type Error = String;

    fn try_from(body: ChatBody) -> Result<Self, Self::Error> {
        let is_missing_field = [&body.name, &body.email, &body.message, &body.message_type]
            .iter()
            .any(|field| field.trim().is_empty());

        if is_missing_field {
            return Err(String::from("Missing required fields"));
        }

        Ok(NewChatMessage {
            name: body.name,
            email: body.email,
            message: body.message,
            message_type: body.message_type,
        })
    }
}

impl NewChatMessage {
    pub fn into_object(self, sent_on: NaiveDate) -> NewObject {
        NewObject::new(
            CHAT_MESSAGE_OBJECT_TYPE,
            format!("Chat from {}", self.name),
            json!({
                "name": self.name,
                "email": self.email,
                "message": self.message,
                "message_type": self.message_type,
                "timestamp": sent_on.format("%Y-%m-%d").to_string(),
            }),
        )
    }
}
