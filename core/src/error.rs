use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// The error type for every ttsign operation.
///
/// Errors are tagged with an [`ErrorKind`] instead of one type per service, so callers
/// branch with `match err.kind()`. Remote failures keep the HTTP status and the decoded
/// response body, and errors raised by a resource service carry its [`Resource`].
#[derive(Error, Debug)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    status: Option<u16>,
    data: Option<Value>,
    stage: Option<DocumentStage>,
    resource: Option<Resource>,
    #[source]
    source: Option<anyhow::Error>,
}

/// The kind of error that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input rejected locally (blank identifier, batch limit, enum value, page size).
    ///
    /// Never reaches the network.
    Validation,

    /// Configuration error (missing credential, body that cannot be serialized, invalid header)
    ConfigInvalid,

    /// Network failure or timeout, no HTTP status available.
    Transport,

    /// The remote API answered with a non-2xx status.
    Remote,

    /// The proxy string could not be turned into a proxy agent.
    Proxy,

    /// Shipping document download or processing failed.
    Document,

    /// Unexpected errors (response decoding, internal invariants)
    Unexpected,
}

/// The processing stage a document error was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentStage {
    /// Fetching the document.
    Download,
    /// Checking the request or the downloaded bytes.
    Validate,
    /// Re-laying out the pages.
    Resize,
    /// Serializing the final document.
    Output,
}

/// The API resource area an error was raised by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// Token exchange and refresh.
    Token,
    /// Seller shops and permissions.
    Seller,
    /// Product catalog.
    Product,
    /// Orders.
    Orders,
    /// Finance statements, payments and withdrawals.
    Finances,
    /// Warehouses, delivery options and shipping providers.
    Logistics,
    /// Packages and shipping documents.
    Fulfillments,
    /// Shipping document download.
    Document,
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            data: None,
            stage: None,
            resource: None,
            source: None,
        }
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Attach the remote HTTP status.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Attach the decoded response body.
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Tag the error with the resource that raised it.
    ///
    /// An error that already carries a resource keeps it.
    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resource.get_or_insert(resource);
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Remote HTTP status, if the error came from a response.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Decoded remote response body, if any.
    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// Document processing stage, only set for document errors.
    pub fn stage(&self) -> Option<DocumentStage> {
        self.stage
    }

    /// The resource area that raised this error.
    pub fn resource(&self) -> Option<Resource> {
        self.resource
    }

    /// Check if this error was rejected before reaching the network.
    pub fn is_validation_error(&self) -> bool {
        self.kind == ErrorKind::Validation
    }

    /// Check if this error carries a response from the remote API.
    pub fn is_remote_error(&self) -> bool {
        self.kind == ErrorKind::Remote
    }
}

// Convenience constructors
impl Error {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a config invalid error
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    /// Create a remote error carrying the response status
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Remote, message).with_status(status)
    }

    /// Create a proxy configuration error
    pub fn proxy(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Proxy, message)
    }

    /// Create a document error raised in `stage`
    pub fn document(stage: DocumentStage, message: impl Into<String>) -> Self {
        let mut err = Self::new(ErrorKind::Document, message);
        err.stage = Some(stage);
        err
    }

    /// Create an unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Validation => write!(f, "validation"),
            ErrorKind::ConfigInvalid => write!(f, "invalid configuration"),
            ErrorKind::Transport => write!(f, "transport"),
            ErrorKind::Remote => write!(f, "remote"),
            ErrorKind::Proxy => write!(f, "proxy"),
            ErrorKind::Document => write!(f, "document"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

impl fmt::Display for DocumentStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentStage::Download => write!(f, "download"),
            DocumentStage::Validate => write!(f, "validate"),
            DocumentStage::Resize => write!(f, "resize"),
            DocumentStage::Output => write!(f, "output"),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Token => write!(f, "token"),
            Resource::Seller => write!(f, "seller"),
            Resource::Product => write!(f, "product"),
            Resource::Orders => write!(f, "orders"),
            Resource::Finances => write!(f, "finances"),
            Resource::Logistics => write!(f, "logistics"),
            Resource::Fulfillments => write!(f, "fulfillments"),
            Resource::Document => write!(f, "document"),
        }
    }
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

// Common From implementations
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(err)
    }
}

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::config_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        Self::config_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::config_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderName> for Error {
    fn from(err: http::header::InvalidHeaderName) -> Self {
        Self::config_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUri> for Error {
    fn from(err: http::uri::InvalidUri) -> Self {
        Self::config_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}
