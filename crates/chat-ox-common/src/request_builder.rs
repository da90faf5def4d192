use crate::error::{self, CommonRequestError};
use bytes::Bytes;
use futures_util::stream::BoxStream;
use reqwest::{Method, RequestBuilder as ReqwestRequestBuilder};
use serde::Serialize;
use std::collections::HashMap;

/// Raw response body as delivered by the transport, one chunk per item.
pub type ByteStream = BoxStream<'static, Result<Bytes, reqwest::Error>>;

/// Represents an API endpoint with its configuration
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub path: String,
    pub method: Method,
    pub extra_headers: Option<HashMap<String, String>>,
}

impl Endpoint {
    pub fn new(path: impl Into<String>, method: Method) -> Self {
        Self {
            path: path.into(),
            method,
            extra_headers: None,
        }
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(path, Method::POST)
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut headers = self.extra_headers.unwrap_or_default();
        headers.insert(key.into(), value.into());
        self.extra_headers = Some(headers);
        self
    }
}

/// Configuration for request building
#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub base_url: String,
    pub default_headers: HashMap<String, String>,
    pub user_agent: Option<String>,
}

impl RequestConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            default_headers: HashMap::new(),
            user_agent: None,
        }
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

/// Builds and sends requests against a configured base URL
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    client: reqwest::Client,
    config: RequestConfig,
}

impl RequestBuilder {
    pub fn new(client: reqwest::Client, config: RequestConfig) -> Self {
        Self { client, config }
    }

    /// Full URL for an endpoint; a trailing slash on the base URL is tolerated.
    #[must_use]
    pub fn url_for(&self, endpoint: &Endpoint) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint.path.trim_start_matches('/')
        )
    }

    /// Build a reqwest RequestBuilder for the given endpoint
    pub fn build_request(&self, endpoint: &Endpoint) -> ReqwestRequestBuilder {
        let url = self.url_for(endpoint);
        let mut req = self.client.request(endpoint.method.clone(), &url);

        for (key, value) in &self.config.default_headers {
            req = req.header(key, value);
        }

        if let Some(ref headers) = endpoint.extra_headers {
            for (key, value) in headers {
                req = req.header(key, value);
            }
        }

        if let Some(ref user_agent) = self.config.user_agent {
            req = req.header("user-agent", user_agent);
        }

        if matches!(endpoint.method, Method::POST | Method::PUT | Method::PATCH) {
            req = req.header("content-type", "application/json");
        }

        req
    }

    /// Send a JSON body and hand back the raw response body stream.
    ///
    /// The HTTP status is deliberately not inspected: any response that has a
    /// body is returned as a stream, error statuses included. Only statuses that
    /// carry no body at all fail with [`CommonRequestError::EmptyBody`].
    pub async fn open_stream<B: Serialize + ?Sized>(
        &self,
        endpoint: &Endpoint,
        body: &B,
    ) -> Result<ByteStream, CommonRequestError> {
        log::debug!("{} {}", endpoint.method, self.url_for(endpoint));

        let response = self.build_request(endpoint).json(body).send().await?;
        let status = response.status();
        log::debug!("{} responded with HTTP {}", endpoint.path, status.as_u16());

        if error::is_null_body_status(status) {
            return Err(CommonRequestError::EmptyBody {
                status: status.as_u16(),
            });
        }

        Ok(Box::pin(response.bytes_stream()))
    }
}
