use crate::error::GenerationError;
use crate::request_id::RequestId;
use reqwest::header::HeaderValue;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// How a vendor expects the API key.
#[derive(Debug, Clone, Copy)]
pub enum ApiAuth<'a> {
    /// `Authorization: Bearer <key>` (OpenAI)
    Bearer(&'a str),
    /// `?key=<key>` query parameter (Gemini)
    QueryKey(&'a str),
}

#[derive(Debug, Clone)]
pub struct LlmClient {
    http_client: Arc<reqwest::Client>,
}

impl LlmClient {
    pub fn new(http_client: Arc<reqwest::Client>) -> Self {
        Self { http_client }
    }

    pub fn join_url(api_base: &str, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if api_base.ends_with('/') {
            format!("{}{}", api_base, path)
        } else {
            format!("{}/{}", api_base, path)
        }
    }

    /// POST `body` as JSON and decode a 2xx reply into `T`.
    ///
    /// Non-2xx replies become [`GenerationError::Provider`] carrying the
    /// vendor's own error message when the body has one.
    pub async fn post_json<B, T>(
        &self,
        provider: &str,
        url: &str,
        auth: ApiAuth<'_>,
        body: &B,
        request_id: &RequestId,
    ) -> Result<T, GenerationError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self
            .http_client
            .post(url)
            .header("Content-Type", "application/json");

        if let Ok(val) = HeaderValue::from_str(&request_id.0) {
            request = request.header("x-request-id", val);
        }

        request = match auth {
            ApiAuth::Bearer(key) => request.header("Authorization", format!("Bearer {}", key)),
            ApiAuth::QueryKey(key) => request.query(&[("key", key)]),
        };

        // url never carries the key; QueryKey is appended by reqwest
        info!("Sending {} request to: {}", provider, url);
        if tracing::enabled!(tracing::Level::DEBUG) {
            debug!("request body: {}", serde_json::to_string(body)?);
        }

        let response = request.json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!("{} responded with status {}", provider, status);

        if !status.is_success() {
            return Err(GenerationError::from_vendor_body(provider, status.as_u16(), &text));
        }

        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_join_url() {
        assert_eq!(LlmClient::join_url("https://api.openai.com/v1", "chat/completions"), "https://api.openai.com/v1/chat/completions");
        assert_eq!(LlmClient::join_url("https://api.openai.com/v1/", "/images/generations"), "https://api.openai.com/v1/images/generations");
    }

    #[tokio::test]
    async fn test_post_json_sends_bearer_and_request_id() {
        let mut server = mockito::Server::new_async().await;
        let request_id = RequestId::new();
        let _m = server.mock("POST", "/v1/echo")
            .match_header("authorization", "Bearer sk-test")
            .match_header("x-request-id", request_id.0.as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok":true}"#)
            .create_async()
            .await;

        let client = LlmClient::new(Arc::new(reqwest::Client::new()));
        let url = format!("{}/v1/echo", server.url());
        let value: Value = client
            .post_json("openai", &url, ApiAuth::Bearer("sk-test"), &json!({"a": 1}), &request_id)
            .await
            .expect("request failed");
        assert_eq!(value["ok"], true);
    }

    #[tokio::test]
    async fn test_post_json_puts_key_in_query() {
        let mut server = mockito::Server::new_async().await;
        let _m = server.mock("POST", "/models/m:generateContent")
            .match_query(mockito::Matcher::UrlEncoded("key".into(), "AIzaTest".into()))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let client = LlmClient::new(Arc::new(reqwest::Client::new()));
        let url = format!("{}/models/m:generateContent", server.url());
        let value: Value = client
            .post_json("gemini", &url, ApiAuth::QueryKey("AIzaTest"), &json!({}), &RequestId::new())
            .await
            .expect("request failed");
        assert!(value.is_object());
    }

    #[tokio::test]
    async fn test_non_2xx_becomes_provider_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server.mock("POST", "/fail")
            .with_status(429)
            .with_body(r#"{"error":{"message":"Rate limit reached","type":"requests"}}"#)
            .create_async()
            .await;

        let client = LlmClient::new(Arc::new(reqwest::Client::new()));
        let url = format!("{}/fail", server.url());
        let err = client
            .post_json::<_, Value>("openai", &url, ApiAuth::Bearer("sk-x"), &json!({}), &RequestId::new())
            .await
            .unwrap_err();
        match err {
            GenerationError::Provider { status, message, .. } => {
                assert_eq!(status, 429);
                assert_eq!(message, "Rate limit reached");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
