use ttsign_core::time::SystemClock;
use ttsign_core::{Context, OsEnv};
use ttsign_http_send_reqwest::ReqwestHttpSend;

/// Create a context with the reqwest transport, the OS environment and the system
/// clock.
pub fn default_context() -> Context {
    Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv)
        .with_clock(SystemClock)
}
