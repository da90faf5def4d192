#[cfg(test)]
mod tests {
    use chat_ox_common::request_builder::{Endpoint, RequestBuilder, RequestConfig};
    use reqwest::Method;

    fn builder(base_url: &str) -> RequestBuilder {
        RequestBuilder::new(reqwest::Client::new(), RequestConfig::new(base_url))
    }

    #[test]
    fn test_endpoint_creation() {
        let endpoint = Endpoint::post("api/chat");
        assert_eq!(endpoint.path, "api/chat");
        assert_eq!(endpoint.method, Method::POST);
        assert!(endpoint.extra_headers.is_none());
    }

    #[test]
    fn test_endpoint_with_header() {
        let endpoint = Endpoint::new("api/chat", Method::POST).with_header("accept", "text/event-stream");
        let headers = endpoint.extra_headers.as_ref().unwrap();
        assert_eq!(headers.get("accept").map(String::as_str), Some("text/event-stream"));
    }

    #[test]
    fn test_request_config_builder() {
        let config = RequestConfig::new("http://localhost:8000")
            .with_header("x-client", "chat-ox")
            .with_user_agent("test-client/1.0");

        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.default_headers.len(), 1);
        assert_eq!(config.user_agent, Some("test-client/1.0".to_string()));
    }

    #[test]
    fn test_url_joining() {
        let endpoint = Endpoint::post("api/chat");
        assert_eq!(builder("http://localhost:8000").url_for(&endpoint), "http://localhost:8000/api/chat");
        assert_eq!(builder("http://localhost:8000/").url_for(&endpoint), "http://localhost:8000/api/chat");
        assert_eq!(
            builder("https://example.com/v2").url_for(&Endpoint::post("/api/chat")),
            "https://example.com/v2/api/chat"
        );
    }

    #[test]
    fn test_post_request_carries_json_content_type() {
        let request = builder("http://localhost:8000")
            .build_request(&Endpoint::post("api/chat"))
            .build()
            .unwrap();

        assert_eq!(request.method(), Method::POST);
        assert_eq!(request.url().as_str(), "http://localhost:8000/api/chat");
        assert_eq!(request.headers()["content-type"], "application/json");
    }

    #[test]
    fn test_get_request_has_no_content_type() {
        let request = builder("http://localhost:8000")
            .build_request(&Endpoint::new("health", Method::GET))
            .build()
            .unwrap();

        assert!(request.headers().get("content-type").is_none());
    }

    #[test]
    fn test_default_and_endpoint_headers_are_applied() {
        let config = RequestConfig::new("http://localhost:8000")
            .with_header("x-client", "chat-ox")
            .with_user_agent("chat-ox-tests/0.1");
        let request = RequestBuilder::new(reqwest::Client::new(), config)
            .build_request(&Endpoint::post("api/chat").with_header("accept", "text/event-stream"))
            .build()
            .unwrap();

        assert_eq!(request.headers()["x-client"], "chat-ox");
        assert_eq!(request.headers()["accept"], "text/event-stream");
        assert_eq!(request.headers()["user-agent"], "chat-ox-tests/0.1");
    }
}
