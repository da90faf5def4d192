use chat_ox_common::{
    ByteStream,
    request_builder::{Endpoint, RequestBuilder, RequestConfig},
};

use crate::{ChatError, message::Message, request::ChatRequest};

const CHAT_PATH: &str = "api/chat";

/// Request plumbing for the chat endpoint
#[derive(Debug, Clone)]
pub(crate) struct ChatRequestHelper {
    request_builder: RequestBuilder,
}

impl ChatRequestHelper {
    pub(crate) fn new(client: reqwest::Client, base_url: &str, user_agent: Option<&str>) -> Self {
        let mut config = RequestConfig::new(base_url);

        if let Some(user_agent) = user_agent {
            config = config.with_user_agent(user_agent);
        }

        Self {
            request_builder: RequestBuilder::new(client, config),
        }
    }

    pub(crate) async fn open_chat_stream(
        &self,
        messages: &[Message],
    ) -> Result<ByteStream, ChatError> {
        let endpoint = Endpoint::post(CHAT_PATH);
        self.request_builder
            .open_stream(&endpoint, &ChatRequest::new(messages))
            .await
    }
}
