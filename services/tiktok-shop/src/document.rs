//! Shipping document download and page geometry.

use std::time::Duration;

use bytes::Bytes;
use http::header::{ACCEPT, CONTENT_TYPE};
use http::{HeaderValue, Uri};
use log::debug;
use ttsign_core::{Context, DocumentStage, Error, RequestTimeout, Resource, Result};

use crate::constants::{CONTENT_TYPE_PDF, DOCUMENT_TIMEOUT};

const MM_PER_INCH: f64 = 25.4;
const POINTS_PER_INCH: f64 = 72.0;
const PDF_MAGIC: &[u8] = b"%PDF";

/// Convert millimeters to PDF points.
pub fn mm_to_points(mm: f64) -> f64 {
    mm / MM_PER_INCH * POINTS_PER_INCH
}

/// Convert PDF points to millimeters.
pub fn points_to_mm(points: f64) -> f64 {
    points / POINTS_PER_INCH * MM_PER_INCH
}

/// A page size in millimeters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSizeMm {
    /// Page width.
    pub width_mm: f64,
    /// Page height.
    pub height_mm: f64,
}

/// A request to re-lay out a shipping document.
///
/// Exactly one of `target_page_size` and `scale` must be set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResizeRequest {
    /// HTTPS url of the source PDF.
    pub source_url: String,
    /// Page size to fit every page into.
    pub target_page_size: Option<PageSizeMm>,
    /// Factor applied to every page.
    pub scale: Option<f64>,
    /// Resolution hint, passed through untouched.
    pub dpi: Option<u32>,
}

impl ResizeRequest {
    /// Check the request before anything is downloaded.
    pub fn validate(&self) -> Result<()> {
        validate_source_url(&self.source_url)?;

        match (&self.target_page_size, self.scale) {
            (Some(_), Some(_)) => Err(invalid(
                "Provide either target_page_size or scale, not both.",
            )),
            (None, None) => Err(invalid(
                "Resizing requires either target_page_size or scale.",
            )),
            (Some(size), None) => {
                if !is_positive(size.width_mm) || !is_positive(size.height_mm) {
                    return Err(invalid(
                        "target_page_size width_mm and height_mm must be positive numbers.",
                    ));
                }
                Ok(())
            }
            (None, Some(scale)) => {
                if !is_positive(scale) {
                    return Err(invalid("scale must be a positive number."));
                }
                Ok(())
            }
        }
    }
}

/// Where and how large one source page is drawn on its output page, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// Output page width.
    pub target_width: f64,
    /// Output page height.
    pub target_height: f64,
    /// Factor applied to the source page.
    pub scale_factor: f64,
    /// Horizontal offset centering the scaled page.
    pub offset_x: f64,
    /// Vertical offset centering the scaled page.
    pub offset_y: f64,
}

impl PageGeometry {
    /// Resolve the geometry of a `width` x `height` points page.
    ///
    /// A scale multiplies the page size. A target size fits the page inside it,
    /// keeping its aspect ratio. Without either the page is kept as is.
    pub fn resolve(width: f64, height: f64, req: &ResizeRequest) -> Self {
        let (target_width, target_height, scale_factor) = match (req.scale, &req.target_page_size)
        {
            (Some(scale), _) => (width * scale, height * scale, scale),
            (None, Some(size)) => {
                let tw = mm_to_points(size.width_mm);
                let th = mm_to_points(size.height_mm);
                (tw, th, (tw / width).min(th / height))
            }
            (None, None) => (width, height, 1.0),
        };

        Self {
            target_width,
            target_height,
            scale_factor,
            offset_x: (target_width - width * scale_factor) / 2.0,
            offset_y: (target_height - height * scale_factor) / 2.0,
        }
    }

    /// The output page size in millimeters.
    pub fn page_size_mm(&self) -> PageSizeMm {
        PageSizeMm {
            width_mm: points_to_mm(self.target_width),
            height_mm: points_to_mm(self.target_height),
        }
    }
}

/// DocumentService downloads shipping documents and checks they are PDFs.
#[derive(Debug, Clone)]
pub struct DocumentService {
    ctx: Context,
    timeout: Duration,
}

impl DocumentService {
    /// Create a new document service.
    pub fn new(ctx: Context) -> Self {
        Self {
            ctx,
            timeout: DOCUMENT_TIMEOUT,
        }
    }

    /// Set the download timeout, 15 seconds by default.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Download the PDF at `url`.
    ///
    /// Fails when the url is not HTTPS, the response is not 2xx, the content type
    /// is set to something other than PDF, or the bytes do not start with `%PDF`.
    pub async fn download_pdf(&self, url: &str) -> Result<Bytes> {
        self.download(url)
            .await
            .map_err(|e| e.with_resource(Resource::Document))
    }

    /// Validate `req` and download its source document.
    pub async fn load_source(&self, req: &ResizeRequest) -> Result<Bytes> {
        req.validate()
            .map_err(|e| e.with_resource(Resource::Document))?;
        self.download_pdf(&req.source_url).await
    }

    async fn download(&self, url: &str) -> Result<Bytes> {
        let uri = validate_source_url(url)?;

        let mut req = http::Request::get(uri)
            .header(ACCEPT, HeaderValue::from_static(CONTENT_TYPE_PDF))
            .body(Bytes::new())?;
        req.extensions_mut().insert(RequestTimeout(self.timeout));

        debug!("downloading shipping document from {url}");
        let resp = self.ctx.http_send(req).await.map_err(|err| {
            Error::document(
                DocumentStage::Download,
                format!("Failed to download PDF from {url}."),
            )
            .with_source(err)
        })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::document(
                DocumentStage::Download,
                format!("PDF download failed with status {}.", status.as_u16()),
            )
            .with_status(status.as_u16()));
        }

        if let Some(content_type) = resp.headers().get(CONTENT_TYPE) {
            let content_type = String::from_utf8_lossy(content_type.as_bytes());
            if !content_type.to_ascii_lowercase().contains(CONTENT_TYPE_PDF) {
                return Err(invalid(format!(
                    "Expected application/pdf content-type but received {content_type}."
                )));
            }
        }

        let body = resp.into_body();
        if !body.starts_with(PDF_MAGIC) {
            return Err(invalid("Source document is not a valid PDF."));
        }
        Ok(body)
    }
}

fn validate_source_url(url: &str) -> Result<Uri> {
    let url = url.trim();
    if url.is_empty() {
        return Err(invalid("Shipping documents require a non-empty HTTPS url."));
    }

    let uri: Uri = url.parse().map_err(|e| {
        invalid(format!("Received an invalid document url: {url}")).with_source(e)
    })?;
    if uri.scheme_str() != Some("https") || uri.host().is_none() {
        return Err(invalid("Only HTTPS document urls are supported."));
    }
    Ok(uri)
}

fn invalid(message: impl Into<String>) -> Error {
    Error::document(DocumentStage::Validate, message)
}

fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}
