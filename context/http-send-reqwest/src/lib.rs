//! Reqwest transport for ttsign.
//!
//! [`ReqwestHttpSend`] sends requests through a shared [`reqwest::Client`]. A request
//! that carries a [`ProxyAgent`] extension is sent through a client built for that
//! agent alone, and a [`RequestTimeout`] extension bounds the whole exchange.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::BodyExt;
use log::debug;
use reqwest::{Client, Proxy, Request};
use ttsign_core::{Error, HttpSend, ProxyAgent, RequestTimeout, Result};

/// HttpSend implementation backed by reqwest.
#[derive(Debug, Default)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    ///
    /// The client is used for every request without a proxy agent.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

/// Build a client routing all traffic through `agent`.
///
/// Both http and https requests go through the agent, for http(s) proxies and
/// socks5 alike.
pub fn build_client(agent: Option<&ProxyAgent>, timeout: Option<Duration>) -> Result<Client> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }

    if let Some(agent) = agent {
        let proxy = Proxy::all(agent.url()).map_err(|e| {
            Error::proxy(format!("Failed to build proxy agent: {e}")).with_source(e)
        })?;
        builder = builder.proxy(proxy);
        debug!("building http client with proxy agent: {agent:?}");
    }

    builder
        .build()
        .map_err(|e| Error::unexpected(format!("Failed to build http client: {e}")).with_source(e))
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let agent = req.extensions().get::<ProxyAgent>().cloned();
        let timeout = req.extensions().get::<RequestTimeout>().map(|v| v.0);

        let client = match &agent {
            Some(agent) => build_client(Some(agent), timeout)?,
            None => self.client.clone(),
        };

        let mut req = Request::try_from(req)
            .map_err(|e| Error::config_invalid(format!("Invalid request: {e}")).with_source(e))?;
        if timeout.is_some() {
            *req.timeout_mut() = timeout;
        }

        let resp: http::Response<_> = client
            .execute(req)
            .await
            .map_err(|e| Error::transport(e.to_string()).with_source(e))?
            .into();

        let (parts, body) = resp.into_parts();
        let bs = BodyExt::collect(body)
            .await
            .map(|buf| buf.to_bytes())
            .map_err(|e| Error::transport(e.to_string()).with_source(e))?;
        Ok(http::Response::from_parts(parts, bs))
    }
}
