use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use ttsign_core::{Error, Resource, Result};

use crate::constants::SHOP_CIPHER;
use crate::request::{encode_path_segment, non_blank, require, ApiRequest, RequestOptions};
use crate::Client;

/// Maximum number of references added by one call.
pub const MAX_EXTERNAL_ORDER_REFERENCES: usize = 100;
/// Maximum number of orders read by one detail call.
pub const MAX_ORDER_DETAIL_IDS: usize = 50;

/// Options for [`OrdersService::get_order_list`].
#[derive(Debug, Clone, Default)]
pub struct GetOrderListOptions {
    /// Shop cipher, required.
    pub shop_cipher: String,
    /// Page size, only sent when greater than zero.
    pub page_size: Option<u32>,
    /// Token of the page to read.
    pub page_token: Option<String>,
    /// Search filters, `{}` when absent.
    pub body: Option<Map<String, Value>>,
    /// Per call overrides.
    pub request: RequestOptions,
}

/// Options for [`OrdersService::get_price_detail`].
#[derive(Debug, Clone, Default)]
pub struct GetPriceDetailOptions {
    /// Order id, required.
    pub order_id: String,
    /// Shop cipher.
    pub shop_cipher: Option<String>,
    /// Per call overrides.
    pub request: RequestOptions,
}

/// Options for [`OrdersService::add_external_order_references`].
#[derive(Debug, Clone, Default)]
pub struct AddExternalOrderReferencesOptions {
    /// Shop cipher, required.
    pub shop_cipher: String,
    /// Between 1 and 100 reference objects.
    pub references: Vec<Value>,
    /// External platform name.
    pub platform: Option<String>,
    /// Per call overrides.
    pub request: RequestOptions,
}

/// Options for [`OrdersService::get_external_order_references`].
#[derive(Debug, Clone, Default)]
pub struct GetExternalOrderReferencesOptions {
    /// Order id, required.
    pub order_id: String,
    /// Shop cipher.
    pub shop_cipher: Option<String>,
    /// External platform name.
    pub platform: Option<String>,
    /// Per call overrides.
    pub request: RequestOptions,
}

/// Options for [`OrdersService::search_order_by_external_reference`].
#[derive(Debug, Clone, Default)]
pub struct SearchOrderByExternalReferenceOptions {
    /// External platform name, required.
    pub platform: String,
    /// Order id on the external platform, required.
    pub external_order_id: String,
    /// Shop cipher.
    pub shop_cipher: Option<String>,
    /// Extra filters, `{}` when absent.
    pub body: Option<Map<String, Value>>,
    /// Per call overrides.
    pub request: RequestOptions,
}

/// Options for [`OrdersService::get_order_detail`].
#[derive(Debug, Clone, Default)]
pub struct GetOrderDetailOptions {
    /// Between 1 and 50 order ids, blank ids are skipped.
    pub ids: Vec<String>,
    /// Shop cipher.
    pub shop_cipher: Option<String>,
    /// Per call overrides.
    pub request: RequestOptions,
}

/// OrdersService reads orders and manages their external references.
#[derive(Debug, Clone)]
pub struct OrdersService {
    client: Client,
}

impl OrdersService {
    /// Create a new orders service.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Search orders.
    pub async fn get_order_list<T: DeserializeOwned>(
        &self,
        opts: GetOrderListOptions,
    ) -> Result<T> {
        self.run(async move {
            let shop_cipher = require(&opts.shop_cipher, "get_order_list", "shop_cipher")?;

            let req = ApiRequest::post("/order/202309/orders/search")
                .query(SHOP_CIPHER, shop_cipher)
                .query_opt("page_size", opts.page_size.filter(|v| *v > 0))
                .query_opt("page_token", non_blank(opts.page_token.as_deref()))
                .body(Value::Object(opts.body.unwrap_or_default()))
                .options(opts.request);
            self.client.request(req).await
        })
        .await
    }

    /// Get the price breakdown of an order.
    pub async fn get_price_detail<T: DeserializeOwned>(
        &self,
        opts: GetPriceDetailOptions,
    ) -> Result<T> {
        self.run(async move {
            let order_id = require(&opts.order_id, "get_price_detail", "order_id")?;

            let path = format!(
                "/order/202407/orders/{}/price_detail",
                encode_path_segment(&order_id)
            );
            let req = ApiRequest::get(&path)
                .query_opt(SHOP_CIPHER, non_blank(opts.shop_cipher.as_deref()))
                .options(opts.request);
            self.client.request(req).await
        })
        .await
    }

    /// Link up to 100 external platform orders to TikTok Shop orders.
    pub async fn add_external_order_references<T: DeserializeOwned>(
        &self,
        opts: AddExternalOrderReferencesOptions,
    ) -> Result<T> {
        self.run(async move {
            let shop_cipher = require(
                &opts.shop_cipher,
                "add_external_order_references",
                "shop_cipher",
            )?;
            if opts.references.is_empty() {
                return Err(Error::validation(
                    "add_external_order_references requires at least one external reference.",
                ));
            }
            if opts.references.len() > MAX_EXTERNAL_ORDER_REFERENCES {
                return Err(Error::validation(format!(
                    "add_external_order_references supports a maximum of {MAX_EXTERNAL_ORDER_REFERENCES} external references per request."
                )));
            }
            if let Some(idx) = opts.references.iter().position(|v| !v.is_object()) {
                return Err(Error::validation(format!(
                    "add_external_order_references requires each reference to be an object. Invalid reference at index {idx}."
                )));
            }

            let req = ApiRequest::post("/order/202406/orders/external_orders")
                .query(SHOP_CIPHER, shop_cipher)
                .query_opt("platform", non_blank(opts.platform.as_deref()))
                .body(Value::Array(opts.references))
                .options(opts.request);
            self.client.request(req).await
        })
        .await
    }

    /// Get the external references of an order.
    pub async fn get_external_order_references<T: DeserializeOwned>(
        &self,
        opts: GetExternalOrderReferencesOptions,
    ) -> Result<T> {
        self.run(async move {
            let order_id = require(&opts.order_id, "get_external_order_references", "order_id")?;

            let path = format!(
                "/order/202406/orders/{}/external_orders",
                encode_path_segment(&order_id)
            );
            let req = ApiRequest::get(&path)
                .query_opt(SHOP_CIPHER, non_blank(opts.shop_cipher.as_deref()))
                .query_opt("platform", non_blank(opts.platform.as_deref()))
                .options(opts.request);
            self.client.request(req).await
        })
        .await
    }

    /// Find the order linked to an external platform order.
    pub async fn search_order_by_external_reference<T: DeserializeOwned>(
        &self,
        opts: SearchOrderByExternalReferenceOptions,
    ) -> Result<T> {
        self.run(async move {
            let op = "search_order_by_external_reference";
            let platform = require(&opts.platform, op, "platform")?;
            let external_order_id = require(&opts.external_order_id, op, "external_order_id")?;

            let req = ApiRequest::post("/order/202406/orders/external_order_search")
                .query("platform", platform)
                .query("external_order_id", external_order_id)
                .query_opt(SHOP_CIPHER, non_blank(opts.shop_cipher.as_deref()))
                .body(Value::Object(opts.body.unwrap_or_default()))
                .options(opts.request);
            self.client.request(req).await
        })
        .await
    }

    /// Get up to 50 orders by id.
    pub async fn get_order_detail<T: DeserializeOwned>(
        &self,
        opts: GetOrderDetailOptions,
    ) -> Result<T> {
        self.run(async move {
            let ids: Vec<String> = opts
                .ids
                .iter()
                .filter_map(|v| non_blank(Some(v.as_str())))
                .collect();
            if ids.is_empty() {
                return Err(Error::validation(
                    "get_order_detail requires at least one non-empty order id.",
                ));
            }
            // Counted after blank ids are dropped.
            if ids.len() > MAX_ORDER_DETAIL_IDS {
                return Err(Error::validation(format!(
                    "get_order_detail supports a maximum of {MAX_ORDER_DETAIL_IDS} order ids per request."
                )));
            }

            let req = ApiRequest::get("/order/202507/orders")
                .query("ids", ids.join(","))
                .query_opt(SHOP_CIPHER, non_blank(opts.shop_cipher.as_deref()))
                .options(opts.request);
            self.client.request(req).await
        })
        .await
    }

    async fn run<T>(&self, fut: impl std::future::Future<Output = Result<T>>) -> Result<T> {
        fut.await.map_err(|e| e.with_resource(Resource::Orders))
    }
}
