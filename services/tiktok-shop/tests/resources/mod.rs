use anyhow::Result;
use bytes::Bytes;
use http::Method;
use pretty_assertions::assert_eq;
use serde_json::{json, Map, Value};
use test_case::test_case;
use ttsign_core::{ErrorKind, Resource};
use ttsign_tiktok_shop::*;

use crate::mock::{MockHttpSend, TIMESTAMP};

fn ok() -> MockHttpSend {
    MockHttpSend::json(200, json!({"code": 0, "data": {}}))
}

fn ids(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("id-{i}")).collect()
}

fn ids_with_blank(n: usize) -> Vec<String> {
    let mut v = ids(n);
    v.push(" ".to_string());
    v
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("value must be an object"),
    }
}

#[tokio::test]
async fn test_seller_extra_query() -> Result<()> {
    let mock = ok();

    let _: Value = mock
        .client()
        .seller()
        .get_active_shops(SellerRequestOptions {
            query: Some(json!({"region": "US", "skip": null})),
            ..Default::default()
        })
        .await?;

    let req = mock.last();
    assert_eq!(req.path(), "/seller/202309/shops");
    assert_eq!(req.param("region").as_deref(), Some("US"));
    assert_eq!(req.param("skip"), None);
    Ok(())
}

#[tokio::test]
async fn test_search_products_defaults_body() -> Result<()> {
    let mock = ok();

    let _: Value = mock
        .client()
        .product()
        .search_products(SearchProductsOptions {
            shop_cipher: " cipher ".to_string(),
            page_size: Some(50),
            page_token: Some("  ".to_string()),
            ..Default::default()
        })
        .await?;

    let req = mock.last();
    assert_eq!(req.method, Method::POST);
    assert_eq!(req.path(), "/product/202502/products/search");
    assert_eq!(req.param("shop_cipher").as_deref(), Some("cipher"));
    assert_eq!(req.param("page_size").as_deref(), Some("50"));
    assert_eq!(req.param("page_token"), None);
    assert_eq!(req.json(), json!({}));
    Ok(())
}

#[tokio::test]
async fn test_upload_product_image_is_multipart_and_unsigned_body() -> Result<()> {
    let mock = ok();

    let _: Value = mock
        .client()
        .product()
        .upload_product_image(UploadProductImageOptions {
            data: Bytes::from_static(b"\x89PNG"),
            use_case: "MAIN_IMAGE".to_string(),
            mime_type: Some("image/png".to_string()),
            ..Default::default()
        })
        .await?;

    let expected = RequestSigner::new().sign(
        &ApiRequest::post("/product/202309/images/upload"),
        &Credential::new("app-key", "app-secret"),
        TIMESTAMP,
    )?;

    let req = mock.last();
    let content_type = req.header("content-type").expect("content type must be set");
    assert!(content_type.starts_with("multipart/form-data; boundary="));
    let body = String::from_utf8_lossy(&req.body).into_owned();
    assert!(body.contains("name=\"data\"; filename=\"image\""));
    assert!(body.contains("Content-Type: image/png"));
    assert!(body.contains("MAIN_IMAGE"));
    assert_eq!(req.param("sign"), Some(expected.signature));
    Ok(())
}

#[tokio::test]
async fn test_upload_product_image_requires_data() {
    let mock = ok();

    let err = mock
        .client()
        .product()
        .upload_product_image::<Value>(UploadProductImageOptions {
            use_case: "MAIN_IMAGE".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(err.is_validation_error());
    assert_eq!(err.resource(), Some(Resource::Product));
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_delete_products_accepts_twenty_ids() -> Result<()> {
    let mock = ok();

    let _: Value = mock
        .client()
        .product()
        .delete_products(DeleteProductsOptions {
            shop_cipher: "cipher".to_string(),
            product_ids: ids(20),
            ..Default::default()
        })
        .await?;

    let req = mock.last();
    assert_eq!(req.method, Method::DELETE);
    assert_eq!(req.path(), "/product/202309/products");
    assert_eq!(req.json(), json!({"product_ids": ids(20)}));
    Ok(())
}

#[test_case(ids(21); "twenty one ids")]
#[test_case(ids_with_blank(20); "blank ids still count")]
#[test_case(Vec::new(); "no ids")]
#[test_case(vec![" ".to_string(), String::new()]; "only blank ids")]
#[tokio::test]
async fn test_delete_products_rejects(product_ids: Vec<String>) {
    let mock = ok();

    let err = mock
        .client()
        .product()
        .delete_products::<Value>(DeleteProductsOptions {
            shop_cipher: "cipher".to_string(),
            product_ids,
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(err.is_validation_error());
    assert_eq!(err.resource(), Some(Resource::Product));
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_get_order_list_skips_zero_page_size() -> Result<()> {
    let mock = ok();

    let _: Value = mock
        .client()
        .orders()
        .get_order_list(GetOrderListOptions {
            shop_cipher: "cipher".to_string(),
            page_size: Some(0),
            body: Some(object(json!({"order_status": "AWAITING_SHIPMENT"}))),
            ..Default::default()
        })
        .await?;

    let req = mock.last();
    assert_eq!(req.path(), "/order/202309/orders/search");
    assert_eq!(req.param("page_size"), None);
    assert_eq!(req.json(), json!({"order_status": "AWAITING_SHIPMENT"}));
    Ok(())
}

#[tokio::test]
async fn test_add_external_order_references_limits() -> Result<()> {
    let references: Vec<Value> = (0..100)
        .map(|i| json!({"order_id": format!("o-{i}"), "external_order": {"id": i}}))
        .collect();

    let mock = ok();
    let orders = mock.client().orders();
    let _: Value = orders
        .add_external_order_references(AddExternalOrderReferencesOptions {
            shop_cipher: "cipher".to_string(),
            references: references.clone(),
            platform: Some("SHOPIFY".to_string()),
            ..Default::default()
        })
        .await?;

    let req = mock.last();
    assert_eq!(req.path(), "/order/202406/orders/external_orders");
    assert_eq!(req.param("platform").as_deref(), Some("SHOPIFY"));
    assert_eq!(req.json(), Value::Array(references.clone()));

    let mut too_many = references;
    too_many.push(json!({"order_id": "o-100"}));
    let err = orders
        .add_external_order_references::<Value>(AddExternalOrderReferencesOptions {
            shop_cipher: "cipher".to_string(),
            references: too_many,
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(err.is_validation_error());
    assert_eq!(err.resource(), Some(Resource::Orders));
    assert_eq!(mock.requests().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_add_external_order_references_rejects_non_objects() {
    let mock = ok();

    let err = mock
        .client()
        .orders()
        .add_external_order_references::<Value>(AddExternalOrderReferencesOptions {
            shop_cipher: "cipher".to_string(),
            references: vec![json!({"order_id": "1"}), json!(["not", "an", "object"])],
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(err.is_validation_error());
    assert!(err.message().ends_with("Invalid reference at index 1."));
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_get_order_detail_limits() -> Result<()> {
    let mock = ok();
    let orders = mock.client().orders();

    let _: Value = orders
        .get_order_detail(GetOrderDetailOptions {
            ids: ids_with_blank(50),
            shop_cipher: Some("cipher".to_string()),
            ..Default::default()
        })
        .await?;

    let req = mock.last();
    assert_eq!(req.path(), "/order/202507/orders");
    assert_eq!(req.param("ids"), Some(ids(50).join(",")));
    assert_eq!(req.param("shop_cipher").as_deref(), Some("cipher"));

    let err = orders
        .get_order_detail::<Value>(GetOrderDetailOptions {
            ids: ids(51),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(err.is_validation_error());
    assert_eq!(mock.requests().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_search_order_by_external_reference() -> Result<()> {
    let mock = ok();

    let _: Value = mock
        .client()
        .orders()
        .search_order_by_external_reference(SearchOrderByExternalReferenceOptions {
            platform: "SHOPIFY".to_string(),
            external_order_id: "ext-1".to_string(),
            ..Default::default()
        })
        .await?;

    let req = mock.last();
    assert_eq!(req.method, Method::POST);
    assert_eq!(req.path(), "/order/202406/orders/external_order_search");
    assert_eq!(req.param("platform").as_deref(), Some("SHOPIFY"));
    assert_eq!(req.param("external_order_id").as_deref(), Some("ext-1"));
    assert_eq!(req.param("shop_cipher"), None);
    assert_eq!(req.json(), json!({}));
    Ok(())
}

#[tokio::test]
async fn test_remote_error_is_tagged_with_resource() {
    let mock = MockHttpSend::json(404, json!({"code": 36009003, "message": "order not found"}));

    let err = mock
        .client()
        .orders()
        .get_price_detail::<Value>(GetPriceDetailOptions {
            order_id: "57/9".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Remote);
    assert_eq!(err.resource(), Some(Resource::Orders));
    assert_eq!(err.status(), Some(404));
    assert_eq!(
        err.data(),
        Some(&json!({"code": 36009003, "message": "order not found"}))
    );
    assert_eq!(mock.last().path(), "/order/202407/orders/57%2F9/price_detail");
}

#[tokio::test]
async fn test_statements_defaults() -> Result<()> {
    let mock = ok();

    let _: Value = mock
        .client()
        .finances()
        .get_statements(GetStatementsOptions {
            shop_cipher: "cipher".to_string(),
            sort_order: Some("asc".to_string()),
            ..Default::default()
        })
        .await?;

    let req = mock.last();
    assert_eq!(req.path(), "/finance/202309/statements");
    assert_eq!(req.param("page_size").as_deref(), Some("20"));
    assert_eq!(req.param("sort_field").as_deref(), Some("statement_time"));
    assert_eq!(req.param("sort_order").as_deref(), Some("ASC"));
    Ok(())
}

#[tokio::test]
async fn test_payments_have_no_default_sort_field() -> Result<()> {
    let mock = ok();

    let _: Value = mock
        .client()
        .finances()
        .get_payments(GetPaymentsOptions {
            shop_cipher: "cipher".to_string(),
            page_size: Some(100),
            ..Default::default()
        })
        .await?;

    let req = mock.last();
    assert_eq!(req.path(), "/finance/202309/payments");
    assert_eq!(req.param("page_size").as_deref(), Some("100"));
    assert_eq!(req.param("sort_field"), None);
    Ok(())
}

#[tokio::test]
async fn test_withdrawal_types_are_normalized() -> Result<()> {
    let mock = ok();

    let _: Value = mock
        .client()
        .finances()
        .get_withdrawals(GetWithdrawalsOptions {
            shop_cipher: "cipher".to_string(),
            types: vec!["settle".to_string(), " ".to_string(), " Withdraw ".to_string()],
            ..Default::default()
        })
        .await?;

    let req = mock.last();
    assert_eq!(req.path(), "/finance/202309/withdrawals");
    assert_eq!(req.param("types").as_deref(), Some("SETTLE,WITHDRAW"));
    assert_eq!(req.param("sort_field"), None);
    Ok(())
}

#[tokio::test]
async fn test_statement_transactions_paths() -> Result<()> {
    let mock = ok();
    let finances = mock.client().finances();

    let _: Value = finances
        .get_statement_transactions_by_order(GetStatementTransactionsByOrderOptions {
            order_id: "order 1".to_string(),
            shop_cipher: "cipher".to_string(),
            ..Default::default()
        })
        .await?;
    let req = mock.last();
    assert_eq!(
        req.path(),
        "/finance/202501/orders/order%201/statement_transactions"
    );
    assert_eq!(req.param("page_size"), None);

    let _: Value = finances
        .get_statement_transactions_by_statement(GetStatementTransactionsByStatementOptions {
            statement_id: "st-1".to_string(),
            page: FinancePageOptions {
                shop_cipher: "cipher".to_string(),
                ..Default::default()
            },
        })
        .await?;
    let req = mock.last();
    assert_eq!(
        req.path(),
        "/finance/202501/statements/st-1/statement_transactions"
    );
    assert_eq!(req.param("sort_field").as_deref(), Some("order_create_time"));

    let _: Value = finances
        .get_unsettled_transactions(GetUnsettledTransactionsOptions {
            shop_cipher: "cipher".to_string(),
            ..Default::default()
        })
        .await?;
    let req = mock.last();
    assert_eq!(req.path(), "/finance/202507/orders/unsettled");
    assert_eq!(req.param("sort_field").as_deref(), Some("order_create_time"));
    Ok(())
}

#[test_case(FinancePageOptions { page_size: Some(0), ..Default::default() }; "page size zero")]
#[test_case(FinancePageOptions { page_size: Some(101), ..Default::default() }; "page size too large")]
#[test_case(FinancePageOptions { sort_order: Some("up".to_string()), ..Default::default() }; "bad sort order")]
#[tokio::test]
async fn test_finance_validation(mut opts: FinancePageOptions) {
    opts.shop_cipher = "cipher".to_string();
    let mock = ok();

    let err = mock
        .client()
        .finances()
        .get_statements::<Value>(opts)
        .await
        .unwrap_err();

    assert!(err.is_validation_error());
    assert_eq!(err.resource(), Some(Resource::Finances));
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_finance_rejects_unknown_withdrawal_type() {
    let mock = ok();

    let err = mock
        .client()
        .finances()
        .get_withdrawals::<Value>(GetWithdrawalsOptions {
            shop_cipher: "cipher".to_string(),
            types: vec!["REFUND".to_string()],
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(err.is_validation_error());
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_warehouse_delivery_options_path_is_encoded_and_signed() -> Result<()> {
    let mock = ok();

    let _: Value = mock
        .client()
        .logistics()
        .list_warehouse_delivery_options(ListWarehouseDeliveryOptions {
            warehouse_id: "WH/123 A".to_string(),
            shop_cipher: "cipher".to_string(),
            ..Default::default()
        })
        .await?;

    let req = mock.last();
    assert_eq!(
        req.path(),
        "/logistics/202309/warehouses/WH%2F123%20A/delivery_options"
    );
    assert_eq!(
        req.param("sign").as_deref(),
        Some("75aec496e5c2666daafdab5cb1d67e2b8cad5974f2a9b7608fd00930d1a61043")
    );
    Ok(())
}

#[tokio::test]
async fn test_shop_cipher_wins_over_extra_query() -> Result<()> {
    let mock = ok();

    let _: Value = mock
        .client()
        .logistics()
        .list_warehouses(ListWarehousesOptions {
            shop_cipher: "cipher".to_string(),
            query: Some(json!({"shop_cipher": "other", "type": 1})),
            ..Default::default()
        })
        .await?;

    let req = mock.last();
    assert_eq!(req.path(), "/logistics/202309/warehouses");
    assert_eq!(req.param("shop_cipher").as_deref(), Some("cipher"));
    assert_eq!(req.param("type").as_deref(), Some("1"));
    Ok(())
}

#[tokio::test]
async fn test_logistics_requires_ids() {
    let mock = ok();
    let logistics = mock.client().logistics();

    let err = logistics
        .list_shipping_providers::<Value>(ListShippingProvidersOptions {
            delivery_option_id: " ".to_string(),
            shop_cipher: "cipher".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(
        err.message(),
        "list_shipping_providers requires a non-empty delivery_option_id."
    );
    assert_eq!(err.resource(), Some(Resource::Logistics));

    let err = logistics
        .list_warehouses::<Value>(ListWarehousesOptions::default())
        .await
        .unwrap_err();
    assert!(err.is_validation_error());
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_ship_package() -> Result<()> {
    let mock = ok();

    let _: Value = mock
        .client()
        .fulfillments()
        .ship_package(ShipPackageOptions {
            package_id: "pkg-1".to_string(),
            shop_cipher: "cipher".to_string(),
            body: object(json!({"handover_method": "PICKUP"})),
            ..Default::default()
        })
        .await?;

    let req = mock.last();
    assert_eq!(req.method, Method::POST);
    assert_eq!(req.path(), "/fulfillment/202309/packages/pkg-1/ship");
    assert_eq!(req.json(), json!({"handover_method": "PICKUP"}));
    Ok(())
}

#[tokio::test]
async fn test_create_packages_requires_body() {
    let mock = ok();

    let err = mock
        .client()
        .fulfillments()
        .create_packages::<Value>(CreatePackagesOptions {
            shop_cipher: "cipher".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(err.is_validation_error());
    assert_eq!(err.resource(), Some(Resource::Fulfillments));
    assert!(mock.requests().is_empty());
}

#[test_case(Some("SHIPPING_LABEL"), true; "label")]
#[test_case(Some("INVOICE_LABEL"), true; "invoice")]
#[test_case(None, true; "absent")]
#[test_case(Some("shipping_label"), false; "case sensitive")]
#[test_case(Some("RECEIPT"), false; "unknown")]
#[tokio::test]
async fn test_shipping_document_type(document_type: Option<&str>, accepted: bool) {
    let mock = ok();

    let result = mock
        .client()
        .fulfillments()
        .get_package_shipping_document::<Value>(GetPackageShippingDocumentOptions {
            package_id: "pkg-1".to_string(),
            shop_cipher: "cipher".to_string(),
            document_type: document_type.map(str::to_string),
            ..Default::default()
        })
        .await;

    assert_eq!(result.is_ok(), accepted);
    if accepted {
        let req = mock.last();
        assert_eq!(
            req.path(),
            "/fulfillment/202309/packages/pkg-1/shipping_documents"
        );
        assert_eq!(req.param("document_type").as_deref(), document_type);
    } else {
        assert!(mock.requests().is_empty());
    }
}
