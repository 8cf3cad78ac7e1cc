use anyhow::Result;
use serde_json::Value;
use ttsign::tiktok_shop::{default_client, GetOrderListOptions, SellerRequestOptions};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    // Credentials come from TIKTOK_SHOP_APP_KEY, TIKTOK_SHOP_APP_SECRET and
    // TIKTOK_SHOP_ACCESS_TOKEN.
    let client = default_client();

    let shops: Value = client
        .seller()
        .get_active_shops(SellerRequestOptions::default())
        .await?;
    println!("Active shops: {shops}");

    let Some(cipher) = shops["data"]["shops"][0]["cipher"].as_str() else {
        return Ok(());
    };

    let orders: Value = client
        .orders()
        .get_order_list(GetOrderListOptions {
            shop_cipher: cipher.to_string(),
            page_size: Some(10),
            ..Default::default()
        })
        .await?;
    println!("Orders: {orders}");

    Ok(())
}
