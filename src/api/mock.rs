use std::collections::VecDeque;
use std::sync::Mutex;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use super::error::TransportError;
use super::transport::{HttpRequest, RawResponse, Transport};

type Matcher = Box<dyn Fn(&HttpRequest) -> bool + Send + Sync>;

struct ScriptedReply {
    matcher: Option<Matcher>,
    reply: Result<RawResponse, TransportError>,
}

/// Scripted [`Transport`]: replays queued replies and records every request.
///
/// A reply with a matcher is only handed to a request the matcher accepts;
/// the first acceptable reply in queue order wins.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<ScriptedReply>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("pending", &self.pending())
            .field("requests", &self.request_count())
            .finish()
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a reply for any request.
    pub fn push_response(&self, response: RawResponse) {
        self.push(None, Ok(response));
    }

    /// Queues a JSON reply with `status`.
    pub fn push_json(&self, status: u16, body: serde_json::Value) {
        self.push_response(RawResponse::new(status, body.to_string()));
    }

    /// Queues a reply carrying extra headers.
    pub fn push_with_headers(&self, status: u16, headers: &[(&'static str, &str)], body: &str) {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                map.insert(name, value);
            }
        }
        self.push_response(RawResponse {
            status,
            headers: map,
            body: body.to_string(),
        });
    }

    /// Queues a JSON reply that only matches requests accepted by `matcher`.
    pub fn push_json_when<F>(&self, matcher: F, status: u16, body: serde_json::Value)
    where
        F: Fn(&HttpRequest) -> bool + Send + Sync + 'static,
    {
        self.push(
            Some(Box::new(matcher)),
            Ok(RawResponse::new(status, body.to_string())),
        );
    }

    /// Queues a transport failure.
    pub fn push_failure(&self, error: TransportError) {
        self.push(None, Err(error));
    }

    /// Requests seen so far, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// Replies not yet consumed.
    pub fn pending(&self) -> usize {
        self.replies.lock().map(|r| r.len()).unwrap_or(0)
    }

    fn push(&self, matcher: Option<Matcher>, reply: Result<RawResponse, TransportError>) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(ScriptedReply { matcher, reply });
        }
    }

    fn next_reply(&self, request: &HttpRequest) -> Result<RawResponse, TransportError> {
        let mut replies = self.replies.lock().map_err(|_| TransportError::Other {
            message: "lock poisoned".to_string(),
        })?;

        let position = replies.iter().position(|scripted| {
            scripted
                .matcher
                .as_ref()
                .is_none_or(|matcher| matcher(request))
        });

        match position.and_then(|idx| replies.remove(idx)) {
            Some(scripted) => scripted.reply,
            None => Err(TransportError::Other {
                message: format!("no scripted reply for {}", request.full_url()),
            }),
        }
    }
}

impl Transport for MockTransport {
    async fn get(&self, request: &HttpRequest) -> Result<RawResponse, TransportError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        self.next_reply(request)
    }
}
