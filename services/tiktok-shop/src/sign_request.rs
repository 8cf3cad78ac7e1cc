use log::debug;
use ttsign_core::hash::hex_hmac_sha256;
use ttsign_core::Result;

use crate::constants::*;
use crate::request::{set_param, ApiRequest};
use crate::Credential;

/// The strings a signature is computed over, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalInput {
    /// Absolute path, identifiers percent-encoded.
    pub canonical_path: String,
    /// Sorted `k1v1k2v2` concatenation of the signed parameters.
    pub canonical_query: String,
    /// Compact body, empty when the body is not signed.
    pub canonical_body: String,
}

/// The result of signing a request.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    /// Every parameter sent on the wire, `app_key`, `timestamp` and `sign` included.
    pub params: Vec<(String, String)>,
    /// Lowercase hex HMAC-SHA256 signature.
    pub signature: String,
    /// Unix seconds used in `timestamp`.
    pub timestamp: i64,
    /// Inputs of the signature.
    pub canonical: CanonicalInput,
}

impl SignedRequest {
    /// Get a parameter.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// RequestSigner computes TikTok Shop request signatures.
///
/// Signing is a pure function of the request, the credential and the timestamp.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSigner;

impl RequestSigner {
    /// Create a new signer.
    pub fn new() -> Self {
        Self
    }

    /// Sign `req` with `cred` at `timestamp` Unix seconds.
    pub fn sign(
        &self,
        req: &ApiRequest,
        cred: &Credential,
        timestamp: i64,
    ) -> Result<SignedRequest> {
        let timestamp_str = timestamp.to_string();

        let mut params: Vec<(String, String)> = req
            .query_params()
            .iter()
            .filter(|(k, _)| !k.eq_ignore_ascii_case(SIGN))
            .cloned()
            .collect();
        set_param(&mut params, APP_KEY, cred.app_key.clone());
        set_param(&mut params, TIMESTAMP, timestamp_str);

        let canonical_query = canonical_query(&params);
        let canonical_body = canonical_body(req)?;
        let canonical = CanonicalInput {
            canonical_path: req.path().to_string(),
            canonical_query,
            canonical_body,
        };
        debug!(
            "canonical path: {}, canonical query: {}",
            canonical.canonical_path, canonical.canonical_query
        );

        let signature = signature(&cred.app_secret, &canonical);
        set_param(&mut params, SIGN, signature.clone());

        Ok(SignedRequest {
            params,
            signature,
            timestamp,
            canonical,
        })
    }
}

/// Build the canonical query.
///
/// `sign` and `access_token` (any case) are skipped, the rest is sorted by byte
/// order and concatenated without separators.
pub fn canonical_query(params: &[(String, String)]) -> String {
    let mut signed: Vec<&(String, String)> = params
        .iter()
        .filter(|(k, _)| {
            !k.eq_ignore_ascii_case(SIGN) && !k.eq_ignore_ascii_case(ACCESS_TOKEN)
        })
        .collect();
    signed.sort_by(|(a, _), (b, _)| a.as_bytes().cmp(b.as_bytes()));

    let mut s = String::new();
    for (k, v) in signed {
        s.push_str(k);
        s.push_str(v);
    }
    s
}

/// Build the canonical body.
///
/// Multipart bodies are never signed.
pub fn canonical_body(req: &ApiRequest) -> Result<String> {
    if req
        .content_type()
        .to_ascii_lowercase()
        .starts_with(CONTENT_TYPE_MULTIPART)
    {
        return Ok(String::new());
    }

    req.body_ref().canonical()
}

fn signature(secret: &str, canonical: &CanonicalInput) -> String {
    let mut message = String::with_capacity(
        secret.len() * 2
            + canonical.canonical_path.len()
            + canonical.canonical_query.len()
            + canonical.canonical_body.len(),
    );
    message.push_str(secret);
    message.push_str(&canonical.canonical_path);
    message.push_str(&canonical.canonical_query);
    message.push_str(&canonical.canonical_body);
    message.push_str(secret);

    hex_hmac_sha256(secret.as_bytes(), message.as_bytes())
}
