use std::time::Duration;

use anyhow::Result;
use pretty_assertions::assert_eq;
use ttsign_core::{DocumentStage, ErrorKind, Resource};
use ttsign_tiktok_shop::{DocumentService, PageSizeMm, ResizeRequest};

use crate::mock::MockHttpSend;

const URL: &str = "https://docs.test/label.pdf";

#[tokio::test]
async fn test_download_pdf() -> Result<()> {
    let mock = MockHttpSend::raw(200, Some("application/pdf"), b"%PDF-1.7\n%EOF");

    let bs = DocumentService::new(mock.context()).download_pdf(URL).await?;
    assert_eq!(bs.as_ref(), b"%PDF-1.7\n%EOF");

    let req = mock.last();
    assert_eq!(req.uri.to_string(), URL);
    assert_eq!(req.header("accept").as_deref(), Some("application/pdf"));
    assert_eq!(req.timeout, Some(Duration::from_secs(15)));
    Ok(())
}

#[tokio::test]
async fn test_download_pdf_without_content_type() -> Result<()> {
    let mock = MockHttpSend::raw(200, None, b"%PDF-1.4");

    let bs = DocumentService::new(mock.context()).download_pdf(URL).await?;
    assert_eq!(bs.len(), 8);
    Ok(())
}

#[tokio::test]
async fn test_download_pdf_rejects_plain_http() {
    let mock = MockHttpSend::raw(200, Some("application/pdf"), b"%PDF-1.7");

    let err = DocumentService::new(mock.context())
        .download_pdf("http://docs.test/label.pdf")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Document);
    assert_eq!(err.stage(), Some(DocumentStage::Validate));
    assert_eq!(err.resource(), Some(Resource::Document));
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_download_pdf_status_error() {
    let mock = MockHttpSend::raw(404, Some("text/html"), b"<html></html>");

    let err = DocumentService::new(mock.context())
        .download_pdf(URL)
        .await
        .unwrap_err();

    assert_eq!(err.stage(), Some(DocumentStage::Download));
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.message(), "PDF download failed with status 404.");
}

#[tokio::test]
async fn test_download_pdf_transport_error() {
    let mock = MockHttpSend::transport_error("timed out");

    let err = DocumentService::new(mock.context())
        .download_pdf(URL)
        .await
        .unwrap_err();

    assert_eq!(err.stage(), Some(DocumentStage::Download));
    assert_eq!(err.status(), None);
    assert_eq!(
        err.message(),
        "Failed to download PDF from https://docs.test/label.pdf."
    );
}

#[tokio::test]
async fn test_download_pdf_wrong_content_type() {
    let mock = MockHttpSend::raw(200, Some("text/html; charset=utf-8"), b"%PDF-1.7");

    let err = DocumentService::new(mock.context())
        .download_pdf(URL)
        .await
        .unwrap_err();

    assert_eq!(err.stage(), Some(DocumentStage::Validate));
    assert_eq!(
        err.message(),
        "Expected application/pdf content-type but received text/html; charset=utf-8."
    );
}

#[tokio::test]
async fn test_download_pdf_bad_signature() {
    let mock = MockHttpSend::raw(200, Some("Application/PDF"), b"<html>");

    let err = DocumentService::new(mock.context())
        .download_pdf(URL)
        .await
        .unwrap_err();

    assert_eq!(err.stage(), Some(DocumentStage::Validate));
    assert_eq!(err.message(), "Source document is not a valid PDF.");
}

#[tokio::test]
async fn test_load_source_validates_before_download() {
    let mock = MockHttpSend::raw(200, Some("application/pdf"), b"%PDF-1.7");

    let err = DocumentService::new(mock.context())
        .load_source(&ResizeRequest {
            source_url: URL.to_string(),
            target_page_size: Some(PageSizeMm {
                width_mm: 100.0,
                height_mm: 150.0,
            }),
            scale: Some(2.0),
            dpi: None,
        })
        .await
        .unwrap_err();

    assert_eq!(err.stage(), Some(DocumentStage::Validate));
    assert_eq!(err.resource(), Some(Resource::Document));
    assert!(mock.requests().is_empty());
}
