//! Sign and send TikTok Shop Open API requests.
//!
//! This crate re-exports [`ttsign_core`] and, behind features, the TikTok Shop client
//! and a ready to use [`Context`] backed by reqwest.
//!
//! ## Features
//!
//! - `default-context`: [`default_context`] with the reqwest transport and OS env.
//! - `tiktok-shop`: the [`tiktok_shop`] module.
//!
//! ## Example
//!
//! ```no_run
//! # #[tokio::main]
//! # async fn main() -> ttsign::Result<()> {
//! use serde_json::Value;
//! use ttsign::tiktok_shop::{default_client, SellerRequestOptions};
//!
//! // Reads TIKTOK_SHOP_APP_KEY, TIKTOK_SHOP_APP_SECRET and TIKTOK_SHOP_ACCESS_TOKEN.
//! let client = default_client();
//! let shops: Value = client
//!     .seller()
//!     .get_active_shops(SellerRequestOptions::default())
//!     .await?;
//! println!("{shops}");
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub use ttsign_core::*;

#[cfg(feature = "default-context")]
mod context;
#[cfg(feature = "default-context")]
pub use context::default_context;

#[cfg(feature = "tiktok-shop")]
pub mod tiktok_shop;
