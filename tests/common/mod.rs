//! Shared stubs for the integration suites.
//!
//! The stubs count their calls so tests can assert the fail-fast paths —
//! a rejected request must never have reached the generator or exporter.

use async_trait::async_trait;
use dsegen::{ContentGenerator, DsegenError, PdfExporter};
use std::sync::atomic::{AtomicUsize, Ordering};

pub const STUB_PAPER: &str = "# HKDSE English Speaking Practice\n\n## Topic: Stub\n\nBody.\n";
pub const STUB_PDF: &[u8] = b"%PDF-1.7 stub";

/// Generator returning a canned paper and counting invocations.
#[derive(Default)]
pub struct StubGenerator {
    calls: AtomicUsize,
}

impl StubGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentGenerator for StubGenerator {
    async fn generate(&self, topic: &str) -> Result<String, DsegenError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("{STUB_PAPER}\nRequested topic: {topic}\n"))
    }
}

/// Generator that always fails, for the 500-path tests.
pub struct FailingGenerator;

#[async_trait]
impl ContentGenerator for FailingGenerator {
    async fn generate(&self, _topic: &str) -> Result<String, DsegenError> {
        Err(DsegenError::RateLimited)
    }
}

/// Exporter returning fixed bytes and counting invocations.
#[derive(Default)]
pub struct StubExporter {
    calls: AtomicUsize,
}

impl StubExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PdfExporter for StubExporter {
    async fn export(&self, html: &str) -> Result<Vec<u8>, DsegenError> {
        assert!(
            html.starts_with("<!DOCTYPE html>"),
            "exporter must receive a complete document"
        );
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(STUB_PDF.to_vec())
    }
}
