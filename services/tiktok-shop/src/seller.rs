use serde::de::DeserializeOwned;
use serde_json::Value;
use ttsign_core::{Resource, Result};

use crate::request::{ApiRequest, RequestOptions};
use crate::Client;

/// Options for seller operations.
#[derive(Debug, Clone, Default)]
pub struct SellerRequestOptions {
    /// Extra query parameters, as a JSON object.
    pub query: Option<Value>,
    /// Per call overrides.
    pub request: RequestOptions,
}

/// SellerService reads the shops and permissions of the authorized seller.
#[derive(Debug, Clone)]
pub struct SellerService {
    client: Client,
}

impl SellerService {
    /// Create a new seller service.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// List the shops the access token is authorized for.
    pub async fn get_active_shops<T: DeserializeOwned>(
        &self,
        opts: SellerRequestOptions,
    ) -> Result<T> {
        self.get("/seller/202309/shops", opts).await
    }

    /// List the permissions granted to the app.
    pub async fn get_seller_permissions<T: DeserializeOwned>(
        &self,
        opts: SellerRequestOptions,
    ) -> Result<T> {
        self.get("/seller/202309/permissions", opts).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, opts: SellerRequestOptions) -> Result<T> {
        let req = ApiRequest::get(path)
            .extend_query_json(opts.query.as_ref())
            .options(opts.request);

        self.client
            .request(req)
            .await
            .map_err(|e| e.with_resource(Resource::Seller))
    }
}
