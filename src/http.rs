//! reqwest-backed transport for the channel message resource.
//!
//! Every request is sent once. Rate-limit buckets are reported in the
//! `X-Chanline-Bucket` header and on the request span, but nothing is
//! queued or retried here.

use async_trait::async_trait;
use chanline_rest::{Deleter, Getter, Patcher, Poster, Request, Response, TransportError};
use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use tracing::{Instrument, debug};

use crate::config::ApiConfig;
use crate::telemetry::spans;

/// Header carrying the rate-limit bucket key of a request.
pub const BUCKET_HEADER: &str = "x-chanline-bucket";

/// HTTP client for the REST API.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    authorization: HeaderValue,
}

impl HttpTransport {
    /// Build a client from the API configuration.
    pub fn new(config: &ApiConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;

        let mut authorization = HeaderValue::from_str(&format!("Bot {}", config.token))?;
        authorization.set_sensitive(true);

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            authorization,
        })
    }

    async fn execute(&self, method: Method, request: Request) -> Result<Response, TransportError> {
        let url = format!("{}{}", self.base_url, request.endpoint);
        let span = spans::request(method.as_str(), request.bucket.as_str(), &request.endpoint);

        async move {
            let mut builder = self
                .client
                .request(method, &url)
                .header(AUTHORIZATION, self.authorization.clone())
                .header(BUCKET_HEADER, request.bucket.as_str());

            if let Some(body) = request.body {
                if let Some(content_type) = &request.content_type {
                    builder = builder.header(CONTENT_TYPE, content_type.as_str());
                }
                builder = builder.body(body);
            }

            let response = builder.send().await.map_err(map_error)?;
            let status = response.status();
            let body = response.bytes().await.map_err(map_error)?;
            debug!(status = %status, bytes = body.len(), "response received");

            Ok(Response::new(status, body))
        }
        .instrument(span)
        .await
    }
}

fn map_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connection(err.to_string())
    } else {
        TransportError::Other(Box::new(err))
    }
}

#[async_trait]
impl Getter for HttpTransport {
    async fn get(&self, request: Request) -> Result<Response, TransportError> {
        self.execute(Method::GET, request).await
    }
}

#[async_trait]
impl Poster for HttpTransport {
    async fn post(&self, request: Request) -> Result<Response, TransportError> {
        self.execute(Method::POST, request).await
    }
}

#[async_trait]
impl Patcher for HttpTransport {
    async fn patch(&self, request: Request) -> Result<Response, TransportError> {
        self.execute(Method::PATCH, request).await
    }
}

#[async_trait]
impl Deleter for HttpTransport {
    async fn delete(&self, request: Request) -> Result<Response, TransportError> {
        self.execute(Method::DELETE, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::extract::{Path, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use chanline_rest::{
        BulkDeleteMessagesParams, CreateChannelMessageFileParams, CreateChannelMessageParams,
        Error, Snowflake,
    };
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// What the test server saw: (authorization, bucket, content type, body).
    type Seen = Arc<Mutex<Vec<(String, String, String, Vec<u8>)>>>;

    fn header(headers: &HeaderMap, name: &str) -> String {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }

    fn message(id: &str, channel: &str, content: &str) -> String {
        serde_json::json!({
            "id": id,
            "channel_id": channel,
            "content": content,
            "author": {"id": "1", "username": "bot", "discriminator": "0000", "avatar": null},
            "type": 0
        })
        .to_string()
    }

    async fn create(
        State(seen): State<Seen>,
        Path(channel): Path<String>,
        headers: HeaderMap,
        body: axum::body::Bytes,
    ) -> (StatusCode, String) {
        seen.lock().unwrap().push((
            header(&headers, "authorization"),
            header(&headers, BUCKET_HEADER),
            header(&headers, "content-type"),
            body.to_vec(),
        ));
        (StatusCode::OK, message("500", &channel, "created"))
    }

    async fn fetch(Path((channel, id)): Path<(String, String)>) -> (StatusCode, String) {
        if id == "404" {
            return (StatusCode::NOT_FOUND, r#"{"message":"Unknown Message","code":10008}"#.into());
        }
        (StatusCode::OK, message(&id, &channel, "fetched"))
    }

    async fn remove(State(seen): State<Seen>, headers: HeaderMap) -> StatusCode {
        seen.lock().unwrap().push((
            header(&headers, "authorization"),
            header(&headers, BUCKET_HEADER),
            String::new(),
            Vec::new(),
        ));
        StatusCode::NO_CONTENT
    }

    async fn bulk(State(seen): State<Seen>, headers: HeaderMap, body: axum::body::Bytes) -> StatusCode {
        seen.lock().unwrap().push((
            header(&headers, "authorization"),
            header(&headers, BUCKET_HEADER),
            header(&headers, "content-type"),
            body.to_vec(),
        ));
        StatusCode::NO_CONTENT
    }

    async fn slow() -> StatusCode {
        tokio::time::sleep(Duration::from_secs(5)).await;
        StatusCode::OK
    }

    async fn spawn_server() -> (String, Seen) {
        let seen: Seen = Arc::default();
        let app = Router::new()
            .route("/api/channels/:channel/messages", post(create).get(slow))
            .route("/api/channels/:channel/messages/bulk-delete", post(bulk))
            .route("/api/channels/:channel/messages/:id", get(fetch).delete(remove))
            .with_state(seen.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}/api", addr), seen)
    }

    fn transport(base_url: &str, timeout_secs: u64) -> HttpTransport {
        let config: ApiConfig = toml::from_str(&format!(
            "base_url = \"{}\"\ntoken = \"test-token\"\ntimeout_secs = {}\n",
            base_url, timeout_secs
        ))
        .unwrap();
        HttpTransport::new(&config).unwrap()
    }

    const CHANNEL: Snowflake = Snowflake::new(290926798999357250);

    #[tokio::test]
    async fn test_create_sends_auth_bucket_and_json() {
        let (base, seen) = spawn_server().await;
        let http = transport(&base, 5);

        let msg = chanline_rest::create_channel_message(
            &http,
            CHANNEL,
            CreateChannelMessageParams::from_content("hello"),
        )
        .await
        .unwrap();

        assert_eq!(msg.id(), Some(Snowflake::new(500)));
        assert_eq!(msg.channel_id(), CHANNEL);

        let seen = seen.lock().unwrap();
        let (auth, bucket, content_type, body) = &seen[0];
        assert_eq!(auth, "Bot test-token");
        assert_eq!(bucket, &format!("c:{}:m", CHANNEL));
        assert_eq!(content_type, "application/json");
        assert_eq!(body.as_slice(), br#"{"content":"hello"}"#);
    }

    #[tokio::test]
    async fn test_create_with_file_is_multipart() {
        let (base, seen) = spawn_server().await;
        let http = transport(&base, 5);

        let draft = CreateChannelMessageParams::from_content("see file")
            .with_file(CreateChannelMessageFileParams::from_bytes(b"data".to_vec(), "a.txt").spoiler());
        chanline_rest::create_channel_message(&http, CHANNEL, draft)
            .await
            .unwrap();

        let seen = seen.lock().unwrap();
        let (_, _, content_type, body) = &seen[0];
        assert!(content_type.starts_with("multipart/form-data; boundary="));
        let body = String::from_utf8_lossy(body);
        assert!(body.contains("name=\"payload_json\""));
        assert!(body.contains("filename=\"SPOILER_a.txt\""));
    }

    #[tokio::test]
    async fn test_fetch_not_found_is_unexpected_status() {
        let (base, _) = spawn_server().await;
        let http = transport(&base, 5);

        let err = chanline_rest::get_channel_message(&http, CHANNEL, Snowflake::new(404))
            .await
            .unwrap_err();

        match err {
            Error::UnexpectedStatus { got, body, .. } => {
                assert_eq!(got, StatusCode::NOT_FOUND);
                assert!(body.contains("Unknown Message"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_delete_uses_delete_bucket() {
        let (base, seen) = spawn_server().await;
        let http = transport(&base, 5);

        chanline_rest::delete_message(&http, CHANNEL, Snowflake::new(9))
            .await
            .unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].1, format!("c:{}:m:delete", CHANNEL));
    }

    #[tokio::test]
    async fn test_bulk_delete_sends_ids() {
        let (base, seen) = spawn_server().await;
        let http = transport(&base, 5);
        let params = BulkDeleteMessagesParams::from_ids([Snowflake::new(1), Snowflake::new(2)]);

        chanline_rest::bulk_delete_messages(&http, CHANNEL, &params)
            .await
            .unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].1, format!("c:{}:m:delete", CHANNEL));
        assert_eq!(seen[0].3.as_slice(), br#"{"messages":["1","2"]}"#);
    }

    #[tokio::test]
    async fn test_timeout_maps_to_transport_timeout() {
        let (base, _) = spawn_server().await;
        let http = transport(&base, 1);

        let err = chanline_rest::get_channel_messages(&http, CHANNEL, None)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Transport(TransportError::Timeout)));
    }

    #[tokio::test]
    async fn test_refused_connection_maps_to_connection() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let http = transport(&format!("http://{}", addr), 5);

        let err = chanline_rest::get_channel_message(&http, CHANNEL, Snowflake::new(1))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Transport(TransportError::Connection(_))));
    }
}
