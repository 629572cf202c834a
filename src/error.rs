use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Invalid conversation id")] UnknownConversation(String),
    #[error("Conversation '{id}' is a {kind} conversation and does not support this operation")]
    UnsupportedOperation {
        id: String,
        kind: &'static str,
    },
    #[error("Unknown flow: {0}")] UnknownFlow(String),
    #[error("Invalid request body: {0}")] InvalidBody(String),
    #[error("Unsupported conversation store type: {0}")] UnsupportedStore(String),
}
