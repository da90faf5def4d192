#![cfg_attr(not(test), deny(unsafe_code))]
#![warn(
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::missing_docs_in_private_items
)]

//! Streaming chat endpoint client for Rust
//!
//! Sends a conversation history to `POST {base_url}/api/chat` and hands every
//! `data: ` record of the streamed response to a callback as a [`StreamEvent`].
//!
//! # Example
//!
//! ```rust,no_run
//! use chat_ox::{ChatClient, Message, StreamEvent};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), chat_ox::ChatError> {
//!     let client = ChatClient::builder()
//!         .base_url("http://localhost:8000")
//!         .build();
//!
//!     client
//!         .stream_chat(&[Message::user("hi")], |event| {
//!             if let StreamEvent::Text { content } = event {
//!                 print!("{content}");
//!             }
//!         })
//!         .await
//! }
//! ```

pub mod error;
mod internal;
pub mod message;
pub mod request;
pub mod response;
pub mod usage;

pub use chat_ox_common::{ByteStream, ReadState, StreamOutcome};
pub use error::ChatError;
pub use message::{Message, Role};
pub use request::ChatRequest;
pub use response::StreamEvent;
pub use usage::Usage;

use async_stream::try_stream;
use bon::Builder;
use chat_ox_common::EventDispatcher;
use core::fmt;
use futures_util::{
    future::{self, Either},
    stream::BoxStream,
};
#[cfg(feature = "leaky-bucket")]
use leaky_bucket::RateLimiter;
use std::future::Future;
#[cfg(feature = "leaky-bucket")]
use std::sync::Arc;

use crate::internal::ChatRequestHelper;

const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Environment variable read by [`ChatClient::load_from_env`].
pub const BASE_URL_ENV: &str = "CHAT_API_BASE_URL";

#[derive(Clone, Builder)]
pub struct ChatClient {
    #[builder(default = DEFAULT_BASE_URL.to_string(), into)]
    pub(crate) base_url: String,
    #[builder(default)]
    pub(crate) client: reqwest::Client,
    #[builder(into)]
    pub(crate) user_agent: Option<String>,
    #[cfg(feature = "leaky-bucket")]
    pub(crate) leaky_bucket: Option<Arc<RateLimiter>>,
}

impl Default for ChatClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatClient {
    /// Create a client pointed at the default local endpoint.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            client: reqwest::Client::new(),
            user_agent: None,
            #[cfg(feature = "leaky-bucket")]
            leaky_bucket: None,
        }
    }

    /// Read the base URL from `CHAT_API_BASE_URL`, falling back to the default when unset.
    pub fn load_from_env() -> Result<Self, std::env::VarError> {
        match std::env::var(BASE_URL_ENV) {
            Ok(base_url) => Ok(Self::builder().base_url(base_url).build()),
            Err(std::env::VarError::NotPresent) => Ok(Self::new()),
            Err(e) => Err(e),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request_helper(&self) -> ChatRequestHelper {
        ChatRequestHelper::new(
            self.client.clone(),
            &self.base_url,
            self.user_agent.as_deref(),
        )
    }
}

impl ChatClient {
    /// Send the history and return the raw response body.
    ///
    /// The HTTP status is not checked; an error status with a body is returned
    /// like any other response.
    pub async fn send(&self, messages: &[Message]) -> Result<ByteStream, ChatError> {
        #[cfg(feature = "leaky-bucket")]
        if let Some(ref limiter) = self.leaky_bucket {
            limiter.acquire_one().await;
        }

        self.request_helper().open_chat_stream(messages).await
    }

    /// Send the history and call `on_event` for every event until the response ends.
    ///
    /// `done` and `error` events are delivered like any other; the call only
    /// completes once the server closes the stream.
    pub async fn stream_chat<F>(&self, messages: &[Message], on_event: F) -> Result<(), ChatError>
    where
        F: FnMut(StreamEvent),
    {
        let byte_stream = self.send(messages).await?;
        EventDispatcher::new(byte_stream)
            .run::<StreamEvent, _>(on_event)
            .await
    }

    /// Like [`ChatClient::stream_chat`], but gives up at the next suspension point once `cancel` resolves.
    pub async fn stream_chat_until<F, C>(
        &self,
        messages: &[Message],
        on_event: F,
        cancel: C,
    ) -> Result<StreamOutcome, ChatError>
    where
        F: FnMut(StreamEvent),
        C: Future<Output = ()>,
    {
        let mut cancel = std::pin::pin!(cancel);

        let byte_stream = {
            let send = std::pin::pin!(self.send(messages));
            match future::select(cancel.as_mut(), send).await {
                Either::Left(_) => {
                    log::debug!("Chat request cancelled before the response arrived");
                    return Ok(StreamOutcome::Cancelled);
                }
                Either::Right((byte_stream, _)) => byte_stream?,
            }
        };

        EventDispatcher::new(byte_stream)
            .run_until::<StreamEvent, _, _>(on_event, cancel)
            .await
    }

    /// Send the history and expose the events as a stream.
    ///
    /// Dropping the returned stream closes the connection.
    pub fn stream(&self, messages: &[Message]) -> BoxStream<'static, Result<StreamEvent, ChatError>> {
        let helper = self.request_helper();
        let messages = messages.to_vec();

        #[cfg(feature = "leaky-bucket")]
        let rate_limiter = self.leaky_bucket.clone();

        Box::pin(try_stream! {
            #[cfg(feature = "leaky-bucket")]
            if let Some(ref limiter) = rate_limiter {
                limiter.acquire_one().await;
            }

            let byte_stream = helper.open_chat_stream(&messages).await?;
            let mut dispatcher = EventDispatcher::new(byte_stream);

            while let Some(events) = dispatcher.next_events::<StreamEvent>().await? {
                for event in events {
                    yield event;
                }
            }
        })
    }
}

impl fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatClient")
            .field("base_url", &self.base_url)
            .field("client", &self.client)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

/// Stream a chat response using the endpoint configured in the environment.
///
/// Equivalent to `ChatClient::load_from_env()?.stream_chat(messages, on_event)`.
pub async fn stream_chat<F>(messages: &[Message], on_event: F) -> Result<(), ChatError>
where
    F: FnMut(StreamEvent),
{
    ChatClient::load_from_env()?
        .stream_chat(messages, on_event)
        .await
}
