//! Core components for signing and dispatching TikTok Shop API requests.
//!
//! This crate provides the foundational types and traits shared by the ttsign
//! crates. It performs no network I/O itself.
//!
//! ## Overview
//!
//! - **Context**: a container holding the transport ([`HttpSend`]), environment
//!   access ([`Env`]) and the clock ([`time::Clock`]) used for signing timestamps.
//! - **Credentials**: [`ProvideCredential`] loads credentials, [`SigningCredential`]
//!   validates them, [`ProvideCredentialChain`] composes providers.
//! - **Proxy**: [`ProxyAgent`] resolves a proxy string into a per request agent.
//! - **Errors**: a single tagged [`Error`] carrying the remote status and body.
//!
//! ## Example
//!
//! ```
//! use ttsign_core::{Context, ProxyAgent, ProxyKind, StaticEnv};
//! use ttsign_core::time::FixedClock;
//!
//! let ctx = Context::new()
//!     .with_env(StaticEnv::default())
//!     .with_clock(FixedClock::from_timestamp(1_700_000_000));
//!
//! let agent = ProxyAgent::resolve(Some("socks5://proxy.internal:1080"))?.unwrap();
//! assert_eq!(agent.kind(), ProxyKind::Socks5);
//! # Ok::<(), ttsign_core::Error>(())
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: HMAC-SHA256 helpers
//! - [`time`]: clocks and datetime helpers
//! - [`utils`]: secret redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod context;
pub use context::{Context, Env, HttpSend, NoopEnv, NoopHttpSend, OsEnv, RequestTimeout, StaticEnv};

mod error;
pub use error::{DocumentStage, Error, ErrorKind, Resource, Result};

mod api;
pub use api::{ProvideCredential, SigningCredential};
mod chain;
pub use chain::ProvideCredentialChain;

mod proxy;
pub use proxy::{ProxyAgent, ProxyKind, ProxySpec};
