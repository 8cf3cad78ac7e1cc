use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use ttsign_core::{Error, Resource, Result};

use crate::constants::SHOP_CIPHER;
use crate::request::{encode_path_segment, non_blank, require, ApiRequest, Form, RequestOptions};
use crate::Client;

/// Maximum number of products removed by one delete call.
pub const MAX_DELETE_PRODUCT_IDS: usize = 20;

/// Options for [`ProductService::search_products`].
#[derive(Debug, Clone, Default)]
pub struct SearchProductsOptions {
    /// Shop cipher, required.
    pub shop_cipher: String,
    /// Page size.
    pub page_size: Option<u32>,
    /// Token of the page to read.
    pub page_token: Option<String>,
    /// Search filters, `{}` when absent.
    pub body: Option<Map<String, Value>>,
    /// Per call overrides.
    pub request: RequestOptions,
}

/// Options for [`ProductService::get_product_detail`].
#[derive(Debug, Clone, Default)]
pub struct GetProductDetailOptions {
    /// Product id, required.
    pub product_id: String,
    /// Shop cipher.
    pub shop_cipher: Option<String>,
    /// Per call overrides.
    pub request: RequestOptions,
}

/// Options for [`ProductService::create_product`].
#[derive(Debug, Clone, Default)]
pub struct CreateProductOptions {
    /// Shop cipher, required.
    pub shop_cipher: String,
    /// Product payload, must not be empty.
    pub body: Map<String, Value>,
    /// Per call overrides.
    pub request: RequestOptions,
}

/// Options for [`ProductService::upload_product_image`].
#[derive(Debug, Clone, Default)]
pub struct UploadProductImageOptions {
    /// Image content, must not be empty.
    pub data: Bytes,
    /// File name, `image` when absent or blank.
    pub file_name: Option<String>,
    /// Use case such as `MAIN_IMAGE`, required.
    pub use_case: String,
    /// Mime type of the image.
    pub mime_type: Option<String>,
    /// Per call overrides.
    pub request: RequestOptions,
}

/// Options for [`ProductService::delete_products`].
#[derive(Debug, Clone, Default)]
pub struct DeleteProductsOptions {
    /// Shop cipher, required.
    pub shop_cipher: String,
    /// Between 1 and 20 product ids.
    pub product_ids: Vec<String>,
    /// Per call overrides.
    pub request: RequestOptions,
}

/// ProductService manages the product catalog of a shop.
#[derive(Debug, Clone)]
pub struct ProductService {
    client: Client,
}

impl ProductService {
    /// Create a new product service.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Search products.
    pub async fn search_products<T: DeserializeOwned>(
        &self,
        opts: SearchProductsOptions,
    ) -> Result<T> {
        self.run(async move {
            let shop_cipher = require(&opts.shop_cipher, "search_products", "shop_cipher")?;

            let req = ApiRequest::post("/product/202502/products/search")
                .query(SHOP_CIPHER, shop_cipher)
                .query_opt("page_size", opts.page_size)
                .query_opt("page_token", non_blank(opts.page_token.as_deref()))
                .body(Value::Object(opts.body.unwrap_or_default()))
                .options(opts.request);
            self.client.request(req).await
        })
        .await
    }

    /// Get a product.
    pub async fn get_product_detail<T: DeserializeOwned>(
        &self,
        opts: GetProductDetailOptions,
    ) -> Result<T> {
        self.run(async move {
            let product_id = require(&opts.product_id, "get_product_detail", "product_id")?;

            let path = format!(
                "/product/202309/products/{}",
                encode_path_segment(&product_id)
            );
            let req = ApiRequest::get(&path)
                .query_opt(SHOP_CIPHER, non_blank(opts.shop_cipher.as_deref()))
                .options(opts.request);
            self.client.request(req).await
        })
        .await
    }

    /// Create a product.
    pub async fn create_product<T: DeserializeOwned>(
        &self,
        opts: CreateProductOptions,
    ) -> Result<T> {
        self.run(async move {
            let shop_cipher = require(&opts.shop_cipher, "create_product", "shop_cipher")?;
            if opts.body.is_empty() {
                return Err(Error::validation(
                    "create_product requires a non-empty body payload.",
                ));
            }

            let req = ApiRequest::post("/product/202309/products")
                .query(SHOP_CIPHER, shop_cipher)
                .body(Value::Object(opts.body))
                .options(opts.request);
            self.client.request(req).await
        })
        .await
    }

    /// Upload a product image.
    ///
    /// The image is sent as the `data` part of a multipart form, which is never
    /// signed.
    pub async fn upload_product_image<T: DeserializeOwned>(
        &self,
        opts: UploadProductImageOptions,
    ) -> Result<T> {
        self.run(async move {
            if opts.data.is_empty() {
                return Err(Error::validation(
                    "upload_product_image requires a non-empty image buffer.",
                ));
            }
            let use_case = require(&opts.use_case, "upload_product_image", "use_case")?;

            let file_name = opts
                .file_name
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "image".to_string());
            let form = Form::new()
                .file("data", file_name, opts.mime_type.as_deref(), opts.data)
                .text("use_case", use_case);

            let req = ApiRequest::post("/product/202309/images/upload")
                .multipart(form)?
                .options(opts.request);
            self.client.request(req).await
        })
        .await
    }

    /// Delete up to 20 products.
    pub async fn delete_products<T: DeserializeOwned>(
        &self,
        opts: DeleteProductsOptions,
    ) -> Result<T> {
        self.run(async move {
            let shop_cipher = require(&opts.shop_cipher, "delete_products", "shop_cipher")?;
            if opts.product_ids.is_empty() {
                return Err(Error::validation(
                    "delete_products requires at least one product id.",
                ));
            }
            // Blank ids still count against the limit.
            if opts.product_ids.len() > MAX_DELETE_PRODUCT_IDS {
                return Err(Error::validation(format!(
                    "delete_products supports a maximum of {MAX_DELETE_PRODUCT_IDS} product ids per request."
                )));
            }

            let product_ids: Vec<String> = opts
                .product_ids
                .iter()
                .filter_map(|v| non_blank(Some(v.as_str())))
                .collect();
            if product_ids.is_empty() {
                return Err(Error::validation(
                    "delete_products requires at least one non-empty product id.",
                ));
            }

            let req = ApiRequest::delete("/product/202309/products")
                .query(SHOP_CIPHER, shop_cipher)
                .body(json!({ "product_ids": product_ids }))
                .options(opts.request);
            self.client.request(req).await
        })
        .await
    }

    async fn run<T>(&self, fut: impl std::future::Future<Output = Result<T>>) -> Result<T> {
        fut.await.map_err(|e| e.with_resource(Resource::Product))
    }
}
