//! Request model shared by the signer and the dispatcher.

use bytes::{BufMut, Bytes, BytesMut};
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue, Method};
use percent_encoding::utf8_percent_encode;
use serde_json::Value;
use ttsign_core::{Error, Result};

use crate::constants::*;

/// Percent-encode an identifier before embedding it in a request path.
///
/// The encoded form is both sent and signed.
pub fn encode_path_segment(id: &str) -> String {
    utf8_percent_encode(id, &PATH_SEGMENT_ENCODE_SET).to_string()
}

/// A typed query parameter value.
///
/// Values are normalized to their string form once, when they are added to an
/// [`ApiRequest`], and that string is both sent and signed.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    /// A string value, used verbatim.
    String(String),
    /// An integer value.
    Integer(i64),
    /// A float value, `10.0` normalizes to `10`.
    Float(f64),
    /// A boolean value, `true` or `false`.
    Bool(bool),
}

impl QueryValue {
    /// Convert a JSON value into a query value.
    ///
    /// `null` is dropped, arrays are joined with `,` and objects keep their compact
    /// JSON form.
    pub fn from_json(value: &Value) -> Option<Self> {
        let v = match value {
            Value::Null => return None,
            Value::Bool(v) => QueryValue::Bool(*v),
            Value::Number(n) => match n.as_i64() {
                Some(i) => QueryValue::Integer(i),
                None => QueryValue::Float(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) => QueryValue::String(s.clone()),
            Value::Array(items) => QueryValue::String(
                items
                    .iter()
                    .map(|v| match v {
                        Value::Null => String::new(),
                        v => QueryValue::from_json(v)
                            .map(|v| v.to_query_string())
                            .unwrap_or_default(),
                    })
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            Value::Object(_) => QueryValue::String(value.to_string()),
        };
        Some(v)
    }

    /// The normalized string form.
    pub fn to_query_string(&self) -> String {
        match self {
            QueryValue::String(v) => v.clone(),
            QueryValue::Integer(v) => v.to_string(),
            QueryValue::Float(v) => v.to_string(),
            QueryValue::Bool(v) => v.to_string(),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(v: &str) -> Self {
        QueryValue::String(v.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(v: String) -> Self {
        QueryValue::String(v)
    }
}

impl From<&String> for QueryValue {
    fn from(v: &String) -> Self {
        QueryValue::String(v.clone())
    }
}

impl From<i64> for QueryValue {
    fn from(v: i64) -> Self {
        QueryValue::Integer(v)
    }
}

impl From<i32> for QueryValue {
    fn from(v: i32) -> Self {
        QueryValue::Integer(v.into())
    }
}

impl From<u32> for QueryValue {
    fn from(v: u32) -> Self {
        QueryValue::Integer(v.into())
    }
}

impl From<f64> for QueryValue {
    fn from(v: f64) -> Self {
        QueryValue::Float(v)
    }
}

impl From<bool> for QueryValue {
    fn from(v: bool) -> Self {
        QueryValue::Bool(v)
    }
}

/// Request body.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Body {
    /// No body.
    #[default]
    Empty,
    /// Raw bytes, sent verbatim and signed as UTF-8 text.
    Raw(Bytes),
    /// A JSON value, sent and signed as compact JSON in insertion order.
    ///
    /// A JSON string is sent and signed verbatim, without quotes.
    Json(Value),
}

impl Body {
    /// Whether this body takes part in the signature.
    ///
    /// Empty objects, arrays, strings and byte buffers are still sent but never
    /// signed. Numbers and booleans are always signed.
    pub fn is_signable(&self) -> bool {
        match self {
            Body::Empty => false,
            Body::Raw(bs) => !bs.is_empty(),
            Body::Json(Value::Null) => false,
            Body::Json(Value::Object(v)) => !v.is_empty(),
            Body::Json(Value::Array(v)) => !v.is_empty(),
            Body::Json(Value::String(v)) => !v.is_empty(),
            Body::Json(_) => true,
        }
    }

    /// The bytes sent on the wire.
    pub fn to_bytes(&self) -> Result<Bytes> {
        match self {
            Body::Empty | Body::Json(Value::Null) => Ok(Bytes::new()),
            Body::Raw(bs) => Ok(bs.clone()),
            Body::Json(Value::String(v)) => Ok(Bytes::from(v.clone())),
            Body::Json(v) => Ok(Bytes::from(serde_json::to_vec(v)?)),
        }
    }

    /// The body's contribution to the signature, ignoring content type.
    pub fn canonical(&self) -> Result<String> {
        if !self.is_signable() {
            return Ok(String::new());
        }

        match self {
            Body::Raw(bs) => Ok(String::from_utf8_lossy(bs).into_owned()),
            Body::Json(Value::String(v)) => Ok(v.clone()),
            Body::Json(v) => Ok(serde_json::to_string(v)?),
            Body::Empty => Ok(String::new()),
        }
    }
}

impl From<Value> for Body {
    fn from(v: Value) -> Self {
        Body::Json(v)
    }
}

impl From<&str> for Body {
    fn from(v: &str) -> Self {
        Body::Raw(Bytes::from(v.to_string()))
    }
}

impl From<String> for Body {
    fn from(v: String) -> Self {
        Body::Raw(Bytes::from(v))
    }
}

impl From<Bytes> for Body {
    fn from(v: Bytes) -> Self {
        Body::Raw(v)
    }
}

#[derive(Debug, Clone)]
enum Part {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        filename: String,
        content_type: Option<String>,
        data: Bytes,
    },
}

/// A `multipart/form-data` body.
#[derive(Debug, Clone)]
pub struct Form {
    boundary: String,
    parts: Vec<Part>,
}

impl Default for Form {
    fn default() -> Self {
        Self::new()
    }
}

impl Form {
    /// Create an empty form with a random boundary.
    pub fn new() -> Self {
        Self::with_boundary(format!(
            "--------------------------{:024}",
            rand::random::<u64>()
        ))
    }

    /// Create an empty form with the given boundary.
    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            parts: Vec::new(),
        }
    }

    /// Append a text field.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(Part::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Append a file part.
    pub fn file(
        mut self,
        name: impl Into<String>,
        filename: impl Into<String>,
        content_type: Option<&str>,
        data: impl Into<Bytes>,
    ) -> Self {
        self.parts.push(Part::File {
            name: name.into(),
            filename: filename.into(),
            content_type: content_type.map(str::to_string),
            data: data.into(),
        });
        self
    }

    /// The form boundary.
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// The `Content-Type` header value for this form.
    pub fn content_type(&self) -> String {
        format!("{CONTENT_TYPE_MULTIPART}; boundary={}", self.boundary)
    }

    /// Encode the form.
    pub fn into_bytes(self) -> Bytes {
        let mut buf = BytesMut::new();
        for part in self.parts {
            buf.put_slice(format!("--{}\r\n", self.boundary).as_bytes());
            match part {
                Part::Text { name, value } => {
                    buf.put_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n")
                            .as_bytes(),
                    );
                    buf.put_slice(value.as_bytes());
                }
                Part::File {
                    name,
                    filename,
                    content_type,
                    data,
                } => {
                    buf.put_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n"
                        )
                        .as_bytes(),
                    );
                    let content_type =
                        content_type.unwrap_or_else(|| "application/octet-stream".to_string());
                    buf.put_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
                    buf.put_slice(&data);
                }
            }
            buf.put_slice(b"\r\n");
        }
        buf.put_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        buf.freeze()
    }
}

/// ApiRequest describes one call to the TikTok Shop API before signing.
///
/// - `path` always begins with `/`.
/// - Query values are normalized to strings as they are added; setting a key again
///   replaces its value in place.
/// - Headers set later win over earlier ones.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Body,
    headers: HeaderMap,
    access_token: Option<String>,
    proxy: Option<String>,
}

impl ApiRequest {
    /// Create a new request.
    pub fn new(method: Method, path: &str) -> Self {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };

        Self {
            method,
            path,
            query: Vec::new(),
            body: Body::Empty,
            headers: HeaderMap::new(),
            access_token: None,
            proxy: None,
        }
    }

    /// Create a new GET request.
    pub fn get(path: &str) -> Self {
        Self::new(Method::GET, path)
    }

    /// Create a new POST request.
    pub fn post(path: &str) -> Self {
        Self::new(Method::POST, path)
    }

    /// Create a new DELETE request.
    pub fn delete(path: &str) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Set a query parameter.
    pub fn query(mut self, key: &str, value: impl Into<QueryValue>) -> Self {
        set_param(&mut self.query, key, value.into().to_query_string());
        self
    }

    /// Set a query parameter when `value` is present.
    pub fn query_opt<V: Into<QueryValue>>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.query(key, v),
            None => self,
        }
    }

    /// Set every parameter of `params`, dropping absent values.
    pub fn extend_query<I, K>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, Option<QueryValue>)>,
        K: AsRef<str>,
    {
        for (k, v) in params {
            if let Some(v) = v {
                set_param(&mut self.query, k.as_ref(), v.to_query_string());
            }
        }
        self
    }

    /// Set every entry of a JSON object as a query parameter.
    ///
    /// Non object values are ignored.
    pub fn extend_query_json(self, params: Option<&Value>) -> Self {
        let Some(Value::Object(map)) = params else {
            return self;
        };
        self.extend_query(map.iter().map(|(k, v)| (k, QueryValue::from_json(v))))
    }

    /// Set the body.
    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = body.into();
        self
    }

    /// Set a multipart body and its content type.
    ///
    /// Fails when the form boundary cannot be carried in a header, the body is
    /// left untouched in that case.
    pub fn multipart(mut self, form: Form) -> Result<Self> {
        let content_type = HeaderValue::from_str(&form.content_type()).map_err(|e| {
            Error::config_invalid(format!(
                "Multipart boundary {:?} is not a valid header value",
                form.boundary()
            ))
            .with_source(e)
        })?;
        self.headers.insert(CONTENT_TYPE, content_type);
        self.body = Body::Raw(form.into_bytes());
        Ok(self)
    }

    /// Merge headers, replacing existing values.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        let mut last = None;
        for (name, value) in headers {
            // HeaderMap::into_iter yields the name only for the first value.
            if let Some(name) = name {
                self.headers.remove(&name);
                last = Some(name);
            }
            if let Some(name) = &last {
                self.headers.append(name.clone(), value);
            }
        }
        self
    }

    /// Override the client access token.
    pub fn access_token(mut self, token: Option<String>) -> Self {
        if token.is_some() {
            self.access_token = token;
        }
        self
    }

    /// Override the client proxy.
    pub fn proxy(mut self, proxy: Option<String>) -> Self {
        if proxy.is_some() {
            self.proxy = proxy;
        }
        self
    }

    /// The HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The absolute path, identifiers already encoded.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Normalized query parameters in insertion order.
    pub fn query_params(&self) -> &[(String, String)] {
        &self.query
    }

    /// Get a query parameter.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The request body.
    pub fn body_ref(&self) -> &Body {
        &self.body
    }

    /// Request specific headers.
    pub fn header_map(&self) -> &HeaderMap {
        &self.headers
    }

    /// Access token override.
    pub fn access_token_ref(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Proxy override.
    pub fn proxy_ref(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    /// Content type used to decide whether the body is signed.
    pub fn content_type(&self) -> String {
        self.headers
            .get(CONTENT_TYPE)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .unwrap_or_else(|| CONTENT_TYPE_JSON.to_string())
    }
}

/// Per call overrides accepted by every operation.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Access token overriding the client default.
    pub access_token: Option<String>,
    /// Proxy overriding the client default, blank means a direct connection.
    pub proxy: Option<String>,
    /// Extra headers, replacing the defaults.
    pub headers: HeaderMap,
}

impl ApiRequest {
    /// Apply per call overrides.
    pub fn options(self, opts: RequestOptions) -> Self {
        self.headers(opts.headers)
            .access_token(opts.access_token)
            .proxy(opts.proxy)
    }
}

/// Trim `value`, returning an error naming `field` when it is blank.
pub(crate) fn require(value: &str, op: &str, field: &str) -> Result<String> {
    match value.trim() {
        "" => Err(Error::validation(format!(
            "{op} requires a non-empty {field}."
        ))),
        v => Ok(v.to_string()),
    }
}

/// Trim an optional value, `None` when absent or blank.
pub(crate) fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Set `key` to `value`, replacing an existing entry in place.
pub(crate) fn set_param(params: &mut Vec<(String, String)>, key: &str, value: String) {
    match params.iter_mut().find(|(k, _)| k == key) {
        Some(entry) => entry.1 = value,
        None => params.push((key.to_string(), value)),
    }
}
