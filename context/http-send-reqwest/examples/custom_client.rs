use anyhow::Result;
use bytes::Bytes;
use std::time::Duration;
use ttsign_core::{Context, ProxyAgent, RequestTimeout};
use ttsign_http_send_reqwest::ReqwestHttpSend;
use reqwest::Client;

#[tokio::main]
async fn main() -> Result<()> {
    // Create a custom reqwest client with specific configuration
    let client = Client::builder()
        .timeout(Duration::from_secs(30))
        .pool_max_idle_per_host(10)
        .user_agent("ttsign-example/1.0")
        .build()?;

    let ctx = Context::new().with_http_send(ReqwestHttpSend::new(client));

    let req = http::Request::builder()
        .method("GET")
        .uri("https://open-api.tiktokglobalshop.com/seller/202309/shops")
        .header("Content-Type", "application/json")
        .body(Bytes::new())?;

    match ctx.http_send(req).await {
        Ok(resp) => {
            println!("Response status: {}", resp.status());
            if let Ok(text) = String::from_utf8(resp.body().to_vec()) {
                println!("Response body: {text}");
            }
        }
        Err(e) => eprintln!("Request failed: {e}"),
    }

    // Route a single request through a proxy, e.g. TTSIGN_PROXY=socks5://127.0.0.1:1080
    let Ok(proxy) = std::env::var("TTSIGN_PROXY") else {
        return Ok(());
    };

    let mut req = http::Request::builder()
        .method("GET")
        .uri("https://auth.tiktok-shops.com/api/v2/token/get")
        .body(Bytes::new())?;
    if let Some(agent) = ProxyAgent::resolve(Some(&proxy))? {
        println!("Using proxy agent: {agent:?}");
        req.extensions_mut().insert(agent);
    }
    req.extensions_mut()
        .insert(RequestTimeout(Duration::from_secs(10)));

    match ctx.http_send(req).await {
        Ok(resp) => println!("Proxied response status: {}", resp.status()),
        Err(e) => eprintln!("Proxied request failed: {e}"),
    }

    Ok(())
}
