// Re-export shared error types from chat-ox-common
pub use chat_ox_common::error::CommonRequestError;

/// Errors returned by [`crate::ChatClient`]
pub type ChatError = CommonRequestError;
