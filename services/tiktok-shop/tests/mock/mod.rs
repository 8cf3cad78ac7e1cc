use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, Method, Uri};
use serde_json::Value;
use ttsign_core::time::FixedClock;
use ttsign_core::{Context, Error, HttpSend, ProxyAgent, RequestTimeout, Result};
use ttsign_tiktok_shop::{Client, StaticCredentialProvider};

pub const TIMESTAMP: i64 = 1_700_000_000;
pub const BASE_URL: &str = "https://open-api.test";

/// A request captured by [`MockHttpSend`].
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub agent: Option<ProxyAgent>,
    pub timeout: Option<Duration>,
}

impl Recorded {
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    pub fn params(&self) -> Vec<(String, String)> {
        form_urlencoded::parse(self.uri.query().unwrap_or_default().as_bytes())
            .into_owned()
            .collect()
    }

    pub fn param(&self, key: &str) -> Option<String> {
        self.params()
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn header(&self, key: &str) -> Option<String> {
        self.headers
            .get(key)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("body must be json")
    }
}

#[derive(Debug, Clone)]
enum Reply {
    Response {
        status: u16,
        content_type: Option<String>,
        body: Bytes,
    },
    Transport(String),
}

/// MockHttpSend records every request and answers with a canned reply.
#[derive(Debug, Clone)]
pub struct MockHttpSend {
    reply: Reply,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockHttpSend {
    pub fn json(status: u16, body: Value) -> Self {
        Self::new(Reply::Response {
            status,
            content_type: Some("application/json".to_string()),
            body: Bytes::from(body.to_string()),
        })
    }

    pub fn raw(status: u16, content_type: Option<&str>, body: &'static [u8]) -> Self {
        Self::new(Reply::Response {
            status,
            content_type: content_type.map(str::to_string),
            body: Bytes::from_static(body),
        })
    }

    pub fn transport_error(message: &str) -> Self {
        Self::new(Reply::Transport(message.to_string()))
    }

    fn new(reply: Reply) -> Self {
        Self {
            reply,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().expect("lock poisoned").clone()
    }

    pub fn last(&self) -> Recorded {
        self.requests()
            .pop()
            .expect("at least one request must be sent")
    }

    pub fn context(&self) -> Context {
        let _ = env_logger::builder().is_test(true).try_init();

        Context::new()
            .with_http_send(self.clone())
            .with_clock(FixedClock::from_timestamp(TIMESTAMP))
    }

    pub fn client(&self) -> Client {
        Client::new(
            self.context(),
            StaticCredentialProvider::new("app-key", "app-secret"),
        )
        .with_base_url(BASE_URL)
    }
}

#[async_trait]
impl HttpSend for MockHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let (parts, body) = req.into_parts();
        self.requests
            .lock()
            .expect("lock poisoned")
            .push(Recorded {
                method: parts.method,
                uri: parts.uri,
                headers: parts.headers,
                body,
                agent: parts.extensions.get::<ProxyAgent>().cloned(),
                timeout: parts.extensions.get::<RequestTimeout>().map(|v| v.0),
            });

        match &self.reply {
            Reply::Transport(message) => Err(Error::transport(message.clone())),
            Reply::Response {
                status,
                content_type,
                body,
            } => {
                let mut builder = http::Response::builder().status(*status);
                if let Some(v) = content_type {
                    builder = builder.header(CONTENT_TYPE, v.as_str());
                }
                Ok(builder.body(body.clone())?)
            }
        }
    }
}
