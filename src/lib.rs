//! # dsegen
//!
//! Generate DSE English-speaking practice papers with an LLM.
//!
//! One linear pipeline: a few-shot chat-completion call produces a markdown
//! paper, a fixed A4 page template turns it into a self-contained HTML
//! document, and (optionally) a per-call headless Chromium prints that to
//! single-page PDF bytes. The same pipeline is exposed three ways — as this
//! library, as the `dsegen` CLI binary, and as a small HTTP service.
//!
//! ## Pipeline Overview
//!
//! ```text
//! topic
//!  │
//!  ├─ 1. Prompt    fixed six-turn few-shot conversation
//!  ├─ 2. Generate  chat-completion call (OpenRouter)
//!  ├─ 3. Render    markdown → templated HTML (pulldown-cmark)
//!  ├─ 4. Export    HTML → A4 PDF bytes (headless Chromium, per call)
//!  └─ 5. Sink      atomic file write or HTTP response
//! ```
//!
//! Steps 2 and 4 are optional depending on the input and output formats;
//! [`generate::produce`] holds the exhaustive dispatch.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dsegen::{generate_to_file, ChromiumExporter, Credentials, OpenRouterClient};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let creds = Credentials::load()?.ok_or("run `dsegen config` first")?;
//!     let generator = OpenRouterClient::new(creds);
//!     let exporter = ChromiumExporter::new();
//!     generate_to_file(
//!         &generator,
//!         &exporter,
//!         "Hong Kong Tourism Industry",
//!         Path::new("paper.pdf"),
//!     )
//!     .await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `dsegen` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod credentials;
pub mod error;
pub mod generate;
pub mod pipeline;
pub mod prompt;
pub mod server;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use credentials::Credentials;
pub use error::DsegenError;
pub use generate::{generate_to_file, produce, Artifact, InputFormat, OutputKind};
pub use pipeline::llm::{ContentGenerator, OpenRouterClient};
pub use pipeline::pdf::{ChromiumExporter, PdfExporter};
pub use pipeline::render::render_document;
pub use prompt::{build_prompt, ChatMessage, Role};
pub use server::AppState;
