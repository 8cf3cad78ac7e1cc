//! TikTok Shop Open API signer and client.
//!
//! Every signed call carries `app_key`, `timestamp` and `sign` query parameters. The
//! signature is a lowercase hex HMAC-SHA256, keyed by the app secret, over
//! `secret + path + canonical query + canonical body + secret`.
//!
//! ## Example
//!
//! ```
//! use ttsign_tiktok_shop::{ApiRequest, Credential, RequestSigner};
//!
//! let req = ApiRequest::get("/orders/search")
//!     .query("page_size", 10)
//!     .query("sort", "asc");
//! let cred = Credential::new("app-key", "app-secret");
//!
//! let signed = RequestSigner::new().sign(&req, &cred, 1_700_000_000)?;
//! assert_eq!(
//!     signed.signature,
//!     "7ebe799960dfb87d1d631906dc1c719708bc6766b91f330fc144b4522db6f6cb"
//! );
//! # Ok::<(), ttsign_core::Error>(())
//! ```
//!
//! Resource services hang off [`Client`]: [`Client::seller`], [`Client::product`],
//! [`Client::orders`], [`Client::finances`], [`Client::logistics`] and
//! [`Client::fulfillments`]. Token exchange goes through [`TokenService`] and
//! shipping documents through [`DocumentService`].

pub mod constants;

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod provide_credential;
pub use provide_credential::*;

mod request;
pub use request::{encode_path_segment, ApiRequest, Body, Form, QueryValue, RequestOptions};

mod sign_request;
pub use sign_request::{canonical_body, canonical_query, CanonicalInput, RequestSigner, SignedRequest};

mod client;
pub use client::Client;

mod seller;
pub use seller::{SellerRequestOptions, SellerService};

mod product;
pub use product::*;

mod orders;
pub use orders::*;

mod finances;
pub use finances::*;

mod logistics;
pub use logistics::*;

mod fulfillments;
pub use fulfillments::*;

mod token;
pub use token::{AccessTokenRequest, RefreshTokenRequest, TokenService};

mod document;
pub use document::{
    mm_to_points, points_to_mm, DocumentService, PageGeometry, PageSizeMm, ResizeRequest,
};
