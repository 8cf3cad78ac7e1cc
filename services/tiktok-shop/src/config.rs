use std::fmt::{Debug, Formatter};
use std::time::Duration;

use log::warn;
use ttsign_core::utils::Redact;
use ttsign_core::Context;

use crate::constants::*;

/// Config carries all the configuration for TikTok Shop clients.
#[derive(Clone, Default)]
pub struct Config {
    /// `app_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`TIKTOK_SHOP_APP_KEY`]
    pub app_key: Option<String>,
    /// `app_secret` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`TIKTOK_SHOP_APP_SECRET`]
    pub app_secret: Option<String>,
    /// `access_token` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`TIKTOK_SHOP_ACCESS_TOKEN`]
    pub access_token: Option<String>,
    /// `proxy` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`TIKTOK_SHOP_PROXY`]
    pub proxy: Option<String>,
    /// `base_url` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`TIKTOK_SHOP_BASE_URL`]
    /// - default to [`OPEN_API_BASE_URL`]
    pub base_url: Option<String>,
    /// `timeout` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`TIKTOK_SHOP_TIMEOUT`] in seconds
    /// - default to 10 seconds
    pub timeout: Option<Duration>,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("app_key", &Redact::from(&self.app_key))
            .field("app_secret", &Redact::from(&self.app_secret))
            .field("access_token", &Redact::from(&self.access_token))
            .field("proxy", &self.proxy.as_ref().map(|_| "<configured>"))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Config {
    /// Set the app key.
    pub fn with_app_key(mut self, app_key: impl Into<String>) -> Self {
        self.app_key = Some(app_key.into());
        self
    }

    /// Set the app secret.
    pub fn with_app_secret(mut self, app_secret: impl Into<String>) -> Self {
        self.app_secret = Some(app_secret.into());
        self
    }

    /// Set the default access token.
    pub fn with_access_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = Some(access_token.into());
        self
    }

    /// Set the default proxy.
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Set the API base url.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Load config from env.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = ctx.env_var(TIKTOK_SHOP_APP_KEY) {
            self.app_key.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(TIKTOK_SHOP_APP_SECRET) {
            self.app_secret.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(TIKTOK_SHOP_ACCESS_TOKEN) {
            self.access_token.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(TIKTOK_SHOP_PROXY) {
            self.proxy.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(TIKTOK_SHOP_BASE_URL) {
            self.base_url.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(TIKTOK_SHOP_TIMEOUT) {
            match v.trim().parse::<u64>() {
                Ok(0) => {
                    warn!("ignoring invalid {TIKTOK_SHOP_TIMEOUT} value {v:?}: must be positive")
                }
                Ok(secs) => {
                    self.timeout.get_or_insert(Duration::from_secs(secs));
                }
                Err(e) => warn!("ignoring invalid {TIKTOK_SHOP_TIMEOUT} value {v:?}: {e}"),
            }
        }

        self
    }

    /// The base url requests are sent to.
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .map(|v| v.trim_end_matches('/'))
            .filter(|v| !v.is_empty())
            .unwrap_or(OPEN_API_BASE_URL)
    }

    /// The request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT)
    }
}
