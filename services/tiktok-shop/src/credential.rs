use std::fmt::{Debug, Formatter};

use ttsign_core::utils::Redact;
use ttsign_core::SigningCredential;

/// Credential that holds the app key and app secret of a TikTok Shop app.
#[derive(Default, Clone)]
pub struct Credential {
    /// App key, sent as the `app_key` query parameter.
    pub app_key: String,
    /// App secret, the HMAC key. Never sent on signed requests.
    pub app_secret: String,
}

impl Credential {
    /// Create a new credential.
    pub fn new(app_key: impl Into<String>, app_secret: impl Into<String>) -> Self {
        Self {
            app_key: app_key.into(),
            app_secret: app_secret.into(),
        }
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("app_key", &Redact::from(&self.app_key))
            .field("app_secret", &Redact::from(&self.app_secret))
            .finish()
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        !self.app_key.trim().is_empty() && !self.app_secret.trim().is_empty()
    }
}
