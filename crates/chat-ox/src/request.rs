use serde::Serialize;

use crate::message::Message;

/// Body of a `POST /api/chat` request.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ChatRequest<'a> {
    pub messages: &'a [Message],
}

impl<'a> ChatRequest<'a> {
    #[must_use]
    pub fn new(messages: &'a [Message]) -> Self {
        Self { messages }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body_shape() {
        let messages = vec![Message::user("hi"), Message::assistant("hello")];
        let body = serde_json::to_value(ChatRequest::new(&messages)).unwrap();

        assert_eq!(
            body,
            json!({
                "messages": [
                    {"role": "user", "content": "hi"},
                    {"role": "assistant", "content": "hello"}
                ]
            })
        );
    }

    #[test]
    fn test_empty_history_is_passed_through() {
        let body = serde_json::to_value(ChatRequest::new(&[])).unwrap();
        assert_eq!(body, json!({"messages": []}));
    }
}
