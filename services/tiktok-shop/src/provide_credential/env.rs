use async_trait::async_trait;
use ttsign_core::{Context, ProvideCredential, Result};

use crate::constants::*;
use crate::Credential;

/// EnvCredentialProvider loads TikTok Shop credentials from environment variables.
///
/// This provider looks for the following environment variables:
/// - `TIKTOK_SHOP_APP_KEY`: The app key
/// - `TIKTOK_SHOP_APP_SECRET`: The app secret
#[derive(Debug, Default, Clone)]
pub struct EnvCredentialProvider;

impl EnvCredentialProvider {
    /// Create a new EnvCredentialProvider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let envs = ctx.env_vars();

        match (envs.get(TIKTOK_SHOP_APP_KEY), envs.get(TIKTOK_SHOP_APP_SECRET)) {
            (Some(key), Some(secret)) => Ok(Some(Credential::new(key, secret))),
            _ => Ok(None),
        }
    }
}
