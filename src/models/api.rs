use serde::{ Serialize, Deserialize };
use serde_json::{ Map, Value };

use crate::models::chat::ChatMessage;

#[derive(Deserialize, Debug, Default)]
pub struct CidQuery {
    pub cid: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct MessageRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Serialize, Debug)]
pub struct NewConversationResponse {
    pub conversation_id: String,
}

#[derive(Serialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize, Debug)]
pub struct StatusResponse {
    pub status: &'static str,
}

#[derive(Serialize, Debug)]
pub struct SendResponse {
    pub message: String,
    pub finished: bool,
}

#[derive(Serialize, Debug)]
pub struct MessagesResponse {
    pub messages: Vec<ChatMessage>,
}

#[derive(Serialize, Debug)]
pub struct ConversationStateResponse {
    pub finished: bool,
    pub responses: Map<String, Value>,
}

#[derive(Serialize, Debug)]
pub struct HealthResponse {
    pub status: &'static str,
    pub conversations: usize,
}

#[derive(Serialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
}
