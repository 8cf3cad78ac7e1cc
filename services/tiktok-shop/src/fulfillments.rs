use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use ttsign_core::{Error, Resource, Result};

use crate::constants::SHOP_CIPHER;
use crate::request::{encode_path_segment, require, ApiRequest, RequestOptions};
use crate::Client;

/// Document types accepted by [`FulfillmentsService::get_package_shipping_document`].
pub const SHIPPING_DOCUMENT_TYPES: [&str; 6] = [
    "SHIPPING_LABEL",
    "PACKING_SLIP",
    "SHIPPING_LABEL_AND_PACKING_SLIP",
    "SHIPPING_LABEL_PICTURE",
    "HAZMAT_LABEL",
    "INVOICE_LABEL",
];

/// Options for [`FulfillmentsService::create_packages`].
#[derive(Debug, Clone, Default)]
pub struct CreatePackagesOptions {
    /// Shop cipher, required.
    pub shop_cipher: String,
    /// Package payload, must not be empty.
    pub body: Map<String, Value>,
    /// Per call overrides.
    pub request: RequestOptions,
}

/// Options for [`FulfillmentsService::ship_package`].
#[derive(Debug, Clone, Default)]
pub struct ShipPackageOptions {
    /// Package id, required.
    pub package_id: String,
    /// Shop cipher, required.
    pub shop_cipher: String,
    /// Shipping payload, must not be empty.
    pub body: Map<String, Value>,
    /// Per call overrides.
    pub request: RequestOptions,
}

/// Options for [`FulfillmentsService::get_package_shipping_document`].
#[derive(Debug, Clone, Default)]
pub struct GetPackageShippingDocumentOptions {
    /// Package id, required.
    pub package_id: String,
    /// Shop cipher, required.
    pub shop_cipher: String,
    /// One of [`SHIPPING_DOCUMENT_TYPES`], matched exactly.
    pub document_type: Option<String>,
    /// Per call overrides.
    pub request: RequestOptions,
}

/// FulfillmentsService creates and ships packages.
#[derive(Debug, Clone)]
pub struct FulfillmentsService {
    client: Client,
}

impl FulfillmentsService {
    /// Create a new fulfillments service.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create packages.
    pub async fn create_packages<T: DeserializeOwned>(
        &self,
        opts: CreatePackagesOptions,
    ) -> Result<T> {
        self.run(async move {
            let shop_cipher = require(&opts.shop_cipher, "create_packages", "shop_cipher")?;
            if opts.body.is_empty() {
                return Err(Error::validation(
                    "create_packages requires a non-empty JSON body.",
                ));
            }

            let req = ApiRequest::post("/fulfillment/202309/packages")
                .query(SHOP_CIPHER, shop_cipher)
                .body(Value::Object(opts.body))
                .options(opts.request);
            self.client.request(req).await
        })
        .await
    }

    /// Ship a package.
    pub async fn ship_package<T: DeserializeOwned>(&self, opts: ShipPackageOptions) -> Result<T> {
        self.run(async move {
            let package_id = require(&opts.package_id, "ship_package", "package_id")?;
            let shop_cipher = require(&opts.shop_cipher, "ship_package", "shop_cipher")?;
            if opts.body.is_empty() {
                return Err(Error::validation(
                    "ship_package requires a non-empty JSON body.",
                ));
            }

            let path = format!(
                "/fulfillment/202309/packages/{}/ship",
                encode_path_segment(&package_id)
            );
            let req = ApiRequest::post(&path)
                .query(SHOP_CIPHER, shop_cipher)
                .body(Value::Object(opts.body))
                .options(opts.request);
            self.client.request(req).await
        })
        .await
    }

    /// Get the shipping document of a package.
    ///
    /// The response carries a document url, use
    /// [`DocumentService::download_pdf`](crate::DocumentService::download_pdf) to fetch it.
    pub async fn get_package_shipping_document<T: DeserializeOwned>(
        &self,
        opts: GetPackageShippingDocumentOptions,
    ) -> Result<T> {
        self.run(async move {
            let op = "get_package_shipping_document";
            let package_id = require(&opts.package_id, op, "package_id")?;
            let shop_cipher = require(&opts.shop_cipher, op, "shop_cipher")?;
            let document_type = opts.document_type.filter(|v| !v.is_empty());
            if let Some(v) = &document_type {
                if !SHIPPING_DOCUMENT_TYPES.contains(&v.as_str()) {
                    return Err(Error::validation(format!(
                        "{op} received unsupported document_type '{v}'."
                    )));
                }
            }

            let path = format!(
                "/fulfillment/202309/packages/{}/shipping_documents",
                encode_path_segment(&package_id)
            );
            let req = ApiRequest::get(&path)
                .query(SHOP_CIPHER, shop_cipher)
                .query_opt("document_type", document_type)
                .options(opts.request);
            self.client.request(req).await
        })
        .await
    }

    async fn run<T>(&self, fut: impl std::future::Future<Output = Result<T>>) -> Result<T> {
        fut.await.map_err(|e| e.with_resource(Resource::Fulfillments))
    }
}
