use serde::de::DeserializeOwned;
use serde_json::Value;
use ttsign_core::{Resource, Result};

use crate::constants::SHOP_CIPHER;
use crate::request::{encode_path_segment, require, ApiRequest, RequestOptions};
use crate::Client;

/// Options for [`LogisticsService::list_warehouses`].
#[derive(Debug, Clone, Default)]
pub struct ListWarehousesOptions {
    /// Shop cipher, required.
    pub shop_cipher: String,
    /// Extra query parameters, as a JSON object.
    pub query: Option<Value>,
    /// Per call overrides.
    pub request: RequestOptions,
}

/// Options for [`LogisticsService::list_global_warehouses`].
#[derive(Debug, Clone, Default)]
pub struct ListGlobalWarehousesOptions {
    /// Extra query parameters, as a JSON object.
    pub query: Option<Value>,
    /// Per call overrides.
    pub request: RequestOptions,
}

/// Options for [`LogisticsService::list_warehouse_delivery_options`].
#[derive(Debug, Clone, Default)]
pub struct ListWarehouseDeliveryOptions {
    /// Warehouse id, required.
    pub warehouse_id: String,
    /// Shop cipher, required.
    pub shop_cipher: String,
    /// Extra query parameters, as a JSON object.
    pub query: Option<Value>,
    /// Per call overrides.
    pub request: RequestOptions,
}

/// Options for [`LogisticsService::list_shipping_providers`].
#[derive(Debug, Clone, Default)]
pub struct ListShippingProvidersOptions {
    /// Delivery option id, required.
    pub delivery_option_id: String,
    /// Shop cipher, required.
    pub shop_cipher: String,
    /// Extra query parameters, as a JSON object.
    pub query: Option<Value>,
    /// Per call overrides.
    pub request: RequestOptions,
}

/// LogisticsService reads warehouses, delivery options and shipping providers.
///
/// The shop cipher always wins over a `shop_cipher` entry of the extra query.
#[derive(Debug, Clone)]
pub struct LogisticsService {
    client: Client,
}

impl LogisticsService {
    /// Create a new logistics service.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// List the warehouses of a shop.
    pub async fn list_warehouses<T: DeserializeOwned>(
        &self,
        opts: ListWarehousesOptions,
    ) -> Result<T> {
        self.run(async move {
            let shop_cipher = require(&opts.shop_cipher, "list_warehouses", "shop_cipher")?;

            let req = ApiRequest::get("/logistics/202309/warehouses")
                .extend_query_json(opts.query.as_ref())
                .query(SHOP_CIPHER, shop_cipher)
                .options(opts.request);
            self.client.request(req).await
        })
        .await
    }

    /// List the global warehouses of the seller.
    pub async fn list_global_warehouses<T: DeserializeOwned>(
        &self,
        opts: ListGlobalWarehousesOptions,
    ) -> Result<T> {
        self.run(async move {
            let req = ApiRequest::get("/logistics/202309/global_warehouses")
                .extend_query_json(opts.query.as_ref())
                .options(opts.request);
            self.client.request(req).await
        })
        .await
    }

    /// List the delivery options of a warehouse.
    pub async fn list_warehouse_delivery_options<T: DeserializeOwned>(
        &self,
        opts: ListWarehouseDeliveryOptions,
    ) -> Result<T> {
        self.run(async move {
            let op = "list_warehouse_delivery_options";
            let warehouse_id = require(&opts.warehouse_id, op, "warehouse_id")?;
            let shop_cipher = require(&opts.shop_cipher, op, "shop_cipher")?;

            let path = format!(
                "/logistics/202309/warehouses/{}/delivery_options",
                encode_path_segment(&warehouse_id)
            );
            let req = ApiRequest::get(&path)
                .extend_query_json(opts.query.as_ref())
                .query(SHOP_CIPHER, shop_cipher)
                .options(opts.request);
            self.client.request(req).await
        })
        .await
    }

    /// List the shipping providers of a delivery option.
    pub async fn list_shipping_providers<T: DeserializeOwned>(
        &self,
        opts: ListShippingProvidersOptions,
    ) -> Result<T> {
        self.run(async move {
            let op = "list_shipping_providers";
            let delivery_option_id = require(&opts.delivery_option_id, op, "delivery_option_id")?;
            let shop_cipher = require(&opts.shop_cipher, op, "shop_cipher")?;

            let path = format!(
                "/logistics/202309/delivery_options/{}/shipping_providers",
                encode_path_segment(&delivery_option_id)
            );
            let req = ApiRequest::get(&path)
                .extend_query_json(opts.query.as_ref())
                .query(SHOP_CIPHER, shop_cipher)
                .options(opts.request);
            self.client.request(req).await
        })
        .await
    }

    async fn run<T>(&self, fut: impl std::future::Future<Output = Result<T>>) -> Result<T> {
        fut.await.map_err(|e| e.with_resource(Resource::Logistics))
    }
}
