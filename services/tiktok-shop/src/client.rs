use std::fmt::{Debug, Formatter};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use log::debug;
use serde::de::DeserializeOwned;
use serde_json::Value;
use ttsign_core::{
    Context, Error, ErrorKind, ProvideCredential, ProxyAgent, RequestTimeout, Result,
    SigningCredential,
};

use crate::constants::*;
use crate::provide_credential::ConfigCredentialProvider;
use crate::request::ApiRequest;
use crate::sign_request::{RequestSigner, SignedRequest};
use crate::{
    Config, Credential, FinancesService, FulfillmentsService, LogisticsService, OrdersService,
    ProductService, SellerService,
};

const REQUEST_FAILED: &str = "TikTok Shop request failed";

/// Client signs and dispatches TikTok Shop API requests.
///
/// Every call is a single attempt: no retries, no backoff. The credential is loaded
/// lazily and cached while it stays valid.
#[derive(Clone)]
pub struct Client {
    ctx: Context,
    loader: Arc<dyn ProvideCredential<Credential = Credential>>,
    credential: Arc<Mutex<Option<Credential>>>,
    signer: RequestSigner,
    base_url: String,
    access_token: Option<String>,
    proxy: Option<String>,
    timeout: Duration,
}

impl Debug for Client {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("loader", &self.loader)
            .field("base_url", &self.base_url)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("proxy", &self.proxy.as_ref().map(|_| "<configured>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Client {
    /// Create a new client loading its credential from `loader`.
    pub fn new(ctx: Context, loader: impl ProvideCredential<Credential = Credential>) -> Self {
        Self {
            ctx,
            loader: Arc::new(loader),
            credential: Arc::new(Mutex::new(None)),
            signer: RequestSigner::new(),
            base_url: OPEN_API_BASE_URL.to_string(),
            access_token: None,
            proxy: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create a new client from config.
    ///
    /// The config is merged with the environment of `ctx`.
    pub fn from_config(ctx: Context, config: Config) -> Self {
        let config = config.from_env(&ctx);
        let mut client = Self::new(ctx, ConfigCredentialProvider::new(config.clone()))
            .with_base_url(config.base_url())
            .with_timeout(config.timeout());
        client.access_token = config.access_token;
        client.proxy = config.proxy;
        client
    }

    /// Set the base url, [`OPEN_API_BASE_URL`] by default.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Set the default access token.
    pub fn with_access_token(mut self, access_token: &str) -> Self {
        self.access_token = Some(access_token.to_string());
        self
    }

    /// Set the default proxy.
    pub fn with_proxy(mut self, proxy: &str) -> Self {
        self.proxy = Some(proxy.to_string());
        self
    }

    /// Set the request timeout, 10 seconds by default.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The context used by this client.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Seller operations.
    pub fn seller(&self) -> SellerService {
        SellerService::new(self.clone())
    }

    /// Product operations.
    pub fn product(&self) -> ProductService {
        ProductService::new(self.clone())
    }

    /// Order operations.
    pub fn orders(&self) -> OrdersService {
        OrdersService::new(self.clone())
    }

    /// Finance operations.
    pub fn finances(&self) -> FinancesService {
        FinancesService::new(self.clone())
    }

    /// Logistics operations.
    pub fn logistics(&self) -> LogisticsService {
        LogisticsService::new(self.clone())
    }

    /// Fulfillment operations.
    pub fn fulfillments(&self) -> FulfillmentsService {
        FulfillmentsService::new(self.clone())
    }

    /// Load the credential, reusing the cached one while valid.
    pub async fn credential(&self) -> Result<Credential> {
        let cached = self.credential.lock().expect("lock poisoned").clone();
        if let Some(cred) = cached.filter(|v| v.is_valid()) {
            return Ok(cred);
        }

        let cred = self
            .loader
            .provide_credential(&self.ctx)
            .await?
            .filter(|v| v.is_valid())
            .ok_or_else(|| {
                Error::config_invalid(
                    "TikTok Shop credential is missing: app key and app secret must be non-empty",
                )
            })?;
        *self.credential.lock().expect("lock poisoned") = Some(cred.clone());
        Ok(cred)
    }

    /// Sign `req` at the current time of the context clock.
    pub async fn sign(&self, req: &ApiRequest) -> Result<SignedRequest> {
        let cred = self.credential().await?;
        self.signer.sign(req, &cred, self.ctx.now().timestamp())
    }

    /// Sign and send `req`, decoding the response into `T`.
    pub async fn request<T: DeserializeOwned>(&self, req: ApiRequest) -> Result<T> {
        // Proxy errors are raised before anything touches the network.
        let agent = ProxyAgent::resolve(req.proxy_ref().or(self.proxy.as_deref()))?;
        let signed = self.sign(&req).await?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON));
        headers.extend(req.header_map().clone());
        if let Some(token) = req
            .access_token_ref()
            .or(self.access_token.as_deref())
            .filter(|v| !v.is_empty())
        {
            let mut value = HeaderValue::from_str(token)?;
            value.set_sensitive(true);
            headers.insert(HeaderName::from_static(X_TTS_ACCESS_TOKEN), value);
        }

        let value = execute(
            &self.ctx,
            Outgoing {
                base_url: &self.base_url,
                method: req.method().clone(),
                path: req.path(),
                params: &signed.params,
                headers,
                body: req.body_ref().to_bytes()?,
                agent,
                timeout: self.timeout,
                error_prefix: REQUEST_FAILED,
            },
        )
        .await?;

        decode(value)
    }

    /// Send a request to a legacy endpoint.
    ///
    /// Legacy endpoints take `shop_id`, `version` (default `202212`) and the access
    /// token as query parameters. The access token is still left out of the signature.
    pub async fn request_legacy<T: DeserializeOwned>(
        &self,
        req: ApiRequest,
        shop_id: &str,
        version: Option<&str>,
    ) -> Result<T> {
        if shop_id.trim().is_empty() {
            return Err(Error::validation(
                "Legacy requests require a non-empty shop_id value.",
            ));
        }

        let token = req
            .access_token_ref()
            .or(self.access_token.as_deref())
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        let mut req = req
            .query("shop_id", shop_id)
            .query("version", version.unwrap_or(LEGACY_VERSION));
        if let Some(token) = token {
            req = req
                .query(ACCESS_TOKEN, token.as_str())
                .access_token(Some(token));
        }

        self.request(req).await
    }
}

/// A fully prepared request.
pub(crate) struct Outgoing<'a> {
    pub base_url: &'a str,
    pub method: Method,
    pub path: &'a str,
    pub params: &'a [(String, String)],
    pub headers: HeaderMap,
    pub body: Bytes,
    pub agent: Option<ProxyAgent>,
    pub timeout: Duration,
    pub error_prefix: &'a str,
}

/// Send `out` once and normalize the outcome.
///
/// - transport failures become [`ErrorKind::Transport`] without status.
/// - non-2xx responses become [`ErrorKind::Remote`] with the status and decoded body.
pub(crate) async fn execute(ctx: &Context, out: Outgoing<'_>) -> Result<Value> {
    let mut url = format!("{}{}", out.base_url, out.path);
    if !out.params.is_empty() {
        url.push('?');
        url.push_str(
            &form_urlencoded::Serializer::new(String::new())
                .extend_pairs(out.params)
                .finish(),
        );
    }

    let mut req = http::Request::builder()
        .method(out.method.clone())
        .uri(url)
        .body(out.body)?;
    *req.headers_mut() = out.headers;
    req.extensions_mut().insert(RequestTimeout(out.timeout));
    if let Some(agent) = out.agent {
        debug!("routing {} {} through {agent:?}", out.method, out.path);
        req.extensions_mut().insert(agent);
    }

    debug!("sending {} {}", out.method, out.path);
    let resp = ctx.http_send(req).await.map_err(|err| match err.kind() {
        ErrorKind::Transport => {
            Error::transport(format!("{}: {}", out.error_prefix, err.message())).with_source(err)
        }
        _ => err,
    })?;

    let status = resp.status();
    let data = decode_body(resp.body());
    debug!("received {} for {} {}", status.as_u16(), out.method, out.path);

    if status.is_success() {
        return Ok(data);
    }

    let message = match data.get("message") {
        Some(Value::String(v)) => v.clone(),
        Some(v) => v.to_string(),
        None => format!("Request failed with status code {}", status.as_u16()),
    };
    Err(Error::remote(
        status.as_u16(),
        format!(
            "{} with status {}: {message}",
            out.error_prefix,
            status.as_u16()
        ),
    )
    .with_data(data))
}

/// Decode a response body.
///
/// JSON when it parses, the raw text as a JSON string otherwise, `null` when empty.
pub(crate) fn decode_body(bs: &[u8]) -> Value {
    if bs.is_empty() {
        return Value::Null;
    }

    serde_json::from_slice(bs)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bs).into_owned()))
}

pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| {
        Error::unexpected(format!("Failed to decode TikTok Shop response: {e}")).with_source(e)
    })
}
