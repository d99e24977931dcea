//! PDF export: print an HTML document to single-page A4 bytes.
//!
//! ## Why spawn_blocking?
//!
//! `headless_chrome` drives Chromium over the DevTools protocol with
//! blocking socket I/O and its own background threads; it must not run on a
//! Tokio worker. `tokio::task::spawn_blocking` moves each export onto the
//! blocking pool, keeping the async runtime responsive while Chromium works.
//!
//! ## Browser lifetime
//!
//! One isolated browser process per call, torn down on every exit path:
//! dropping the [`headless_chrome::Browser`] handle kills the child process,
//! and the handle lives entirely inside the blocking closure. A failure
//! mid-print cannot leak a live Chromium. There is no retry — a failed
//! export is fatal to the request.

use crate::error::DsegenError;
use async_trait::async_trait;
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions};
use std::io::Write;
use tracing::{debug, info};

/// A4 paper, expressed in the inches the DevTools protocol wants.
const A4_WIDTH_IN: f64 = 210.0 / 25.4;
const A4_HEIGHT_IN: f64 = 297.0 / 25.4;

/// Anything that can turn a complete HTML document into PDF bytes.
#[async_trait]
pub trait PdfExporter: Send + Sync {
    async fn export(&self, html: &str) -> Result<Vec<u8>, DsegenError>;
}

/// Per-call headless Chromium exporter.
#[derive(Debug, Default)]
pub struct ChromiumExporter;

impl ChromiumExporter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PdfExporter for ChromiumExporter {
    async fn export(&self, html: &str) -> Result<Vec<u8>, DsegenError> {
        let html = html.to_string();
        tokio::task::spawn_blocking(move || export_blocking(&html))
            .await
            .map_err(|e| DsegenError::Internal(format!("PDF export task panicked: {e}")))?
    }
}

/// Blocking implementation of the export.
///
/// The document is written to a temp file and loaded via a `file://` URL —
/// the rendered HTML is self-contained, so no other fetches happen.
fn export_blocking(html: &str) -> Result<Vec<u8>, DsegenError> {
    let mut page_file = tempfile::Builder::new()
        .prefix("dsegen-")
        .suffix(".html")
        .tempfile()
        .map_err(|e| DsegenError::PdfExportFailed {
            detail: format!("temp file: {e}"),
        })?;
    page_file
        .write_all(html.as_bytes())
        .map_err(|e| DsegenError::PdfExportFailed {
            detail: format!("temp file write: {e}"),
        })?;

    let url = format!("file://{}", page_file.path().display());
    debug!("Printing {} bytes of HTML from {url}", html.len());

    let launch_options = LaunchOptions::default_builder()
        .headless(true)
        .build()
        .map_err(|e| DsegenError::PdfExportFailed {
            detail: format!("launch options: {e}"),
        })?;

    // Browser teardown is RAII: `browser` kills its Chromium child when
    // dropped, which happens on every return below, Ok or Err.
    let browser = Browser::new(launch_options).map_err(|e| DsegenError::PdfExportFailed {
        detail: format!("browser launch: {e}"),
    })?;

    let tab = browser.new_tab().map_err(|e| DsegenError::PdfExportFailed {
        detail: format!("new tab: {e}"),
    })?;

    tab.navigate_to(&url)
        .and_then(|t| t.wait_until_navigated())
        .map_err(|e| DsegenError::PdfExportFailed {
            detail: format!("navigation: {e}"),
        })?;

    let pdf = tab
        .print_to_pdf(Some(print_options()))
        .map_err(|e| DsegenError::PdfExportFailed {
            detail: format!("print: {e}"),
        })?;

    info!("Printed PDF: {} bytes", pdf.len());
    Ok(pdf)
}

/// Single A4 page with backgrounds, no browser header/footer chrome.
fn print_options() -> PrintToPdfOptions {
    PrintToPdfOptions {
        print_background: Some(true),
        paper_width: Some(A4_WIDTH_IN),
        paper_height: Some(A4_HEIGHT_IN),
        display_header_footer: Some(false),
        margin_top: Some(0.0),
        margin_bottom: Some(0.0),
        margin_left: Some(0.0),
        margin_right: Some(0.0),
        ..Default::default()
    }
}
