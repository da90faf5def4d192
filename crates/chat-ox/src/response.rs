use serde::{Deserialize, Serialize};

use crate::usage::Usage;

/// Payload of one `data: ` record in the response stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// A fragment of assistant text.
    Text { content: String },
    /// Progress information meant for display, not for the transcript.
    Status { message: String },
    /// The server finished the response.
    Done {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        usage: Option<Usage>,
    },
    /// The server reported a failure in-band.
    Error { message: String },
}

impl StreamEvent {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { content } => Some(content),
            _ => None,
        }
    }

    #[must_use]
    pub fn usage(&self) -> Option<&Usage> {
        match self {
            Self::Done { usage } => usage.as_ref(),
            _ => None,
        }
    }

    /// `done` and `error` end a response as far as the server is concerned.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done { .. } | Self::Error { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> StreamEvent {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_text_event() {
        let event = parse(json!({"type": "text", "content": "Hello"}));
        assert_eq!(event, StreamEvent::Text { content: "Hello".to_string() });
        assert_eq!(event.as_text(), Some("Hello"));
        assert!(!event.is_terminal());
    }

    #[test]
    fn test_status_event() {
        let event = parse(json!({"type": "status", "message": "Searching..."}));
        assert_eq!(event, StreamEvent::Status { message: "Searching...".to_string() });
        assert_eq!(event.as_text(), None);
    }

    #[test]
    fn test_done_event_without_usage() {
        let event = parse(json!({"type": "done"}));
        assert_eq!(event, StreamEvent::Done { usage: None });
        assert!(event.is_terminal());
        assert!(event.usage().is_none());
    }

    #[test]
    fn test_done_event_with_usage() {
        let event = parse(json!({
            "type": "done",
            "usage": {"input_tokens": 12, "output_tokens": 30}
        }));

        let usage = event.usage().copied().unwrap();
        assert_eq!(usage, Usage::new(12, 30));
        assert_eq!(usage.total_tokens(), 42);
    }

    #[test]
    fn test_error_event() {
        let event = parse(json!({"type": "error", "message": "server overloaded"}));
        assert_eq!(event, StreamEvent::Error { message: "server overloaded".to_string() });
        assert!(event.is_terminal());
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let event = parse(json!({"type": "text", "content": "a", "index": 3}));
        assert_eq!(event.as_text(), Some("a"));
    }

    #[test]
    fn test_unknown_or_incomplete_events_are_rejected() {
        for value in [
            json!({"type": "ping"}),
            json!({"content": "no tag"}),
            json!({"type": "text"}),
            json!({"type": "error", "message": 5}),
        ] {
            assert!(serde_json::from_value::<StreamEvent>(value).is_err());
        }
    }

    #[test]
    fn test_done_serializes_without_usage_key() {
        let value = serde_json::to_value(StreamEvent::Done { usage: None }).unwrap();
        assert_eq!(value, json!({"type": "done"}));
    }
}
