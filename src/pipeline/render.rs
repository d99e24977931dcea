//! Document rendering: markdown → self-contained HTML page.
//!
//! The markdown fragment is converted with `pulldown-cmark` using the
//! extension set that matches "markdown extra" (tables, footnotes,
//! strikethrough, task lists), then substituted into the embedded A4 page
//! template. The result references no external assets — styles are inline
//! and the watermark rides along as a base64 data URL — so the PDF stage can
//! print it without network access.
//!
//! Rendering is deterministic: identical markdown yields byte-identical
//! HTML. The watermark is the only part that may vary by environment, and
//! only when the `DSEGEN_WATERMARK` override points at a different file.

use base64::Engine;
use pulldown_cmark::{html, Options, Parser};
use tracing::warn;

/// Embedded page template with `{{ content }}` and `{{ watermark_data }}`
/// placeholders.
pub const PAGE_TEMPLATE: &str = include_str!("../../assets/template.html");

/// Default watermark image, embedded so the binary is self-contained.
const WATERMARK_PNG: &[u8] = include_bytes!("../../assets/watermark.png");

/// Path override for the watermark image. An unreadable override degrades
/// to no watermark; it never fails the render.
pub const ENV_WATERMARK: &str = "DSEGEN_WATERMARK";

const CONTENT_PLACEHOLDER: &str = "{{ content }}";
const WATERMARK_PLACEHOLDER: &str = "{{ watermark_data }}";

/// Convert a markdown string into a complete HTML document.
pub fn render_document(markdown: &str) -> String {
    render_with_watermark(markdown, &watermark_data_url())
}

fn render_with_watermark(markdown: &str, watermark_data: &str) -> String {
    let fragment = markdown_to_html(markdown);
    PAGE_TEMPLATE
        .replace(CONTENT_PLACEHOLDER, &fragment)
        .replace(WATERMARK_PLACEHOLDER, watermark_data)
}

/// Markdown → HTML fragment with the "extra"-equivalent extension set.
fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Base64 data URL for the watermark image.
///
/// Checks the `DSEGEN_WATERMARK` override first; an unreadable override is
/// logged and rendered as an empty URL (no watermark), never an error.
fn watermark_data_url() -> String {
    let bytes = match std::env::var(ENV_WATERMARK) {
        Ok(path) if !path.is_empty() => match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Watermark override '{path}' unreadable ({e}); rendering without watermark");
                return String::new();
            }
        },
        _ => WATERMARK_PNG.to_vec(),
    };

    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:image/png;base64,{encoded}")
}
