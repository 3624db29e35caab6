//! Integration test common infrastructure.
//!
//! Provides a scripted in-memory transport that records every request and
//! answers with queued responses.

#![allow(dead_code)]

use std::collections::VecDeque;

use async_trait::async_trait;
use chanline_rest::{Deleter, Getter, Patcher, Poster, Request, Response, TransportError};
use http::{Method, StatusCode};
use parking_lot::Mutex;

/// A transport that answers from a queue and remembers what it was asked.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<Response, TransportError>>>,
    requests: Mutex<Vec<(Method, Request)>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with a JSON body.
    pub fn respond_json(&self, status: StatusCode, body: serde_json::Value) -> &Self {
        let body = serde_json::to_vec(&body).expect("json");
        self.responses
            .lock()
            .push_back(Ok(Response::new(status, body)));
        self
    }

    /// Queue a raw response.
    pub fn respond_raw(&self, status: StatusCode, body: &'static [u8]) -> &Self {
        self.responses
            .lock()
            .push_back(Ok(Response::new(status, body)));
        self
    }

    /// Queue a transport failure.
    pub fn fail(&self, error: TransportError) -> &Self {
        self.responses.lock().push_back(Err(error));
        self
    }

    /// Every request seen so far, in order.
    pub fn requests(&self) -> Vec<(Method, Request)> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// The most recent request.
    pub fn last(&self) -> (Method, Request) {
        self.requests
            .lock()
            .last()
            .cloned()
            .expect("no request was dispatched")
    }

    fn answer(&self, method: Method, request: Request) -> Result<Response, TransportError> {
        self.requests.lock().push((method, request));
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Connection("no scripted response".into())))
    }
}

#[async_trait]
impl Getter for MockTransport {
    async fn get(&self, request: Request) -> Result<Response, TransportError> {
        self.answer(Method::GET, request)
    }
}

#[async_trait]
impl Poster for MockTransport {
    async fn post(&self, request: Request) -> Result<Response, TransportError> {
        self.answer(Method::POST, request)
    }
}

#[async_trait]
impl Patcher for MockTransport {
    async fn patch(&self, request: Request) -> Result<Response, TransportError> {
        self.answer(Method::PATCH, request)
    }
}

#[async_trait]
impl Deleter for MockTransport {
    async fn delete(&self, request: Request) -> Result<Response, TransportError> {
        self.answer(Method::DELETE, request)
    }
}

/// A message object as the service returns it.
pub fn message_json(id: u64, channel_id: u64, content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id.to_string(),
        "channel_id": channel_id.to_string(),
        "author": {
            "id": "53908232506183680",
            "username": "Mason",
            "discriminator": "9999",
            "avatar": null
        },
        "content": content,
        "timestamp": "2017-07-11T17:27:07.299000+00:00",
        "edited_timestamp": null,
        "tts": false,
        "mention_everyone": false,
        "mentions": [],
        "mention_roles": [],
        "attachments": [],
        "embeds": [],
        "pinned": false,
        "type": 0
    })
}

/// Body of a request as text.
pub fn body_text(request: &Request) -> String {
    request
        .body
        .as_ref()
        .map(|body| String::from_utf8_lossy(body).into_owned())
        .unwrap_or_default()
}
