//! Pipeline stages for speaking-paper generation.
//!
//! Each submodule implements exactly one transformation step, kept separate
//! so every stage is independently testable and replaceable behind its seam.
//!
//! ## Data Flow
//!
//! ```text
//! topic ──▶ llm ──▶ render ──▶ pdf
//!         (chat)  (template)  (chromium)
//! ```
//!
//! 1. [`llm`]    — few-shot chat-completion call; the only stage with
//!    network I/O
//! 2. [`render`] — markdown → self-contained HTML document; pure and
//!    deterministic
//! 3. [`pdf`]    — print the HTML to single-page A4 bytes; runs in
//!    `spawn_blocking` because the CDP client is synchronous
//!
//! The dispatcher in [`crate::generate`] decides which stages a given job
//! passes through.

pub mod llm;
pub mod pdf;
pub mod render;
