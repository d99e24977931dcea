//! Request dispatch: format selection, the two-stage pipeline, and the file
//! sink.
//!
//! Formats are closed enums matched exhaustively — adding a format is a
//! compile-time-checked change, not a dictionary edit. Both entry points
//! (CLI job, HTTP handler) funnel through [`produce`], so the
//! input-format × output-kind semantics live in exactly one place:
//!
//! ```text
//! stage 1 (input)            stage 2 (output)
//! Plain    → generate        Markdown → identity
//! Markdown → identity        Html     → render
//! Html     → render          Pdf      → render + export
//! ```
//!
//! Validation is fail-fast: the output kind is resolved from the path
//! before any generator call, so a typo'd extension never costs an API
//! round-trip.

use crate::error::DsegenError;
use crate::pipeline::llm::ContentGenerator;
use crate::pipeline::pdf::PdfExporter;
use crate::pipeline::render::render_document;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

// ── Formats ──────────────────────────────────────────────────────────────

/// What the caller handed us.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// A plain topic; the content generator produces the markdown.
    Plain,
    /// Pre-generated markdown, used as-is.
    Markdown,
    /// Content to be pushed through the page template directly.
    Html,
}

impl FromStr for InputFormat {
    type Err = DsegenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" => Ok(InputFormat::Plain),
            "markdown" => Ok(InputFormat::Markdown),
            "html" => Ok(InputFormat::Html),
            other => Err(DsegenError::UnknownInputFormat {
                format: other.to_string(),
            }),
        }
    }
}

/// What the caller wants back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Markdown,
    Html,
    Pdf,
}

impl FromStr for OutputKind {
    type Err = DsegenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "markdown" => Ok(OutputKind::Markdown),
            "html" => Ok(OutputKind::Html),
            "pdf" => Ok(OutputKind::Pdf),
            other => Err(DsegenError::UnknownOutputFormat {
                format: other.to_string(),
            }),
        }
    }
}

impl OutputKind {
    /// Resolve the output kind from a sink path's extension
    /// (case-insensitive `.md`, `.html`, `.pdf`).
    pub fn from_path(path: &Path) -> Result<Self, DsegenError> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "md" => Ok(OutputKind::Markdown),
            "html" => Ok(OutputKind::Html),
            "pdf" => Ok(OutputKind::Pdf),
            _ => Err(DsegenError::UnsupportedOutput {
                extension: if extension.is_empty() {
                    "(none)".to_string()
                } else {
                    format!(".{extension}")
                },
            }),
        }
    }
}

/// The final artifact of one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    Markdown(String),
    Html(String),
    Pdf(Vec<u8>),
}

impl Artifact {
    /// The artifact's raw bytes, for file sinks and HTTP bodies alike.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Artifact::Markdown(s) | Artifact::Html(s) => s.as_bytes(),
            Artifact::Pdf(b) => b,
        }
    }
}

// ── Pipeline ─────────────────────────────────────────────────────────────

/// Run the two-stage pipeline for one request.
///
/// Stage one turns the caller's content into a document (calling the
/// generator only for [`InputFormat::Plain`]); stage two shapes the
/// document into the requested artifact. Each arm is spelled out so the
/// composition is visible at the call site.
pub async fn produce(
    generator: &dyn ContentGenerator,
    exporter: &dyn PdfExporter,
    input: InputFormat,
    content: &str,
    output: OutputKind,
) -> Result<Artifact, DsegenError> {
    let document = match input {
        InputFormat::Plain => generator.generate(content).await?,
        InputFormat::Markdown => content.to_string(),
        InputFormat::Html => render_document(content),
    };

    match output {
        OutputKind::Markdown => Ok(Artifact::Markdown(document)),
        OutputKind::Html => Ok(Artifact::Html(render_document(&document))),
        OutputKind::Pdf => {
            let html = render_document(&document);
            let pdf = exporter.export(&html).await?;
            Ok(Artifact::Pdf(pdf))
        }
    }
}

/// CLI job: resolve the input argument and sink path, run the pipeline,
/// write the artifact.
///
/// An existing path ending in `.md` is read as pre-generated markdown and
/// never touches the network; anything else is a topic. The sink extension
/// is validated before either branch does real work.
pub async fn generate_to_file(
    generator: &dyn ContentGenerator,
    exporter: &dyn PdfExporter,
    input_arg: &str,
    output_path: &Path,
) -> Result<(), DsegenError> {
    // Fail fast: a bad sink extension must be rejected before any remote
    // call is made.
    let output = OutputKind::from_path(output_path)?;

    let (input, content) = resolve_cli_input(input_arg)?;
    debug!(?input, ?output, "Dispatching CLI job");

    let artifact = produce(generator, exporter, input, &content, output).await?;
    write_artifact(output_path, &artifact)?;

    info!("Artifact written to {}", output_path.display());
    Ok(())
}

/// Decide whether the first CLI argument is a markdown file or a topic.
fn resolve_cli_input(input_arg: &str) -> Result<(InputFormat, String), DsegenError> {
    let path = Path::new(input_arg);
    let is_md = path
        .extension()
        .map(|e| e.to_string_lossy().eq_ignore_ascii_case("md"))
        .unwrap_or(false);

    if is_md {
        if !path.exists() {
            return Err(DsegenError::InputFileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|e| DsegenError::InputReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        return Ok((InputFormat::Markdown, content));
    }

    Ok((InputFormat::Plain, input_arg.to_string()))
}

/// Atomic file sink: write to a sibling temp name, then rename.
///
/// The rename is the commit point, so a failure anywhere in the pipeline or
/// mid-write never leaves a partial artifact at the destination.
fn write_artifact(path: &Path, artifact: &Artifact) -> Result<(), DsegenError> {
    let io_err = |source: std::io::Error| DsegenError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
    }

    let tmp_path = path.with_extension("dsegen.tmp");
    std::fs::write(&tmp_path, artifact.as_bytes()).map_err(io_err)?;
    std::fs::rename(&tmp_path, path).map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn output_kind_from_path_case_insensitive() {
        for (name, expect) in [
            ("paper.md", OutputKind::Markdown),
            ("paper.MD", OutputKind::Markdown),
            ("paper.html", OutputKind::Html),
            ("paper.HTML", OutputKind::Html),
            ("paper.pdf", OutputKind::Pdf),
            ("dir/paper.PdF", OutputKind::Pdf),
        ] {
            assert_eq!(OutputKind::from_path(Path::new(name)).unwrap(), expect);
        }
    }

    #[test]
    fn output_kind_rejects_unknown_extensions() {
        for name in ["paper.txt", "paper.docx", "paper", "paper."] {
            let err = OutputKind::from_path(Path::new(name)).unwrap_err();
            assert!(
                matches!(err, DsegenError::UnsupportedOutput { .. }),
                "{name}: {err}"
            );
        }
    }

    #[test]
    fn input_format_parse() {
        assert_eq!("plain".parse::<InputFormat>().unwrap(), InputFormat::Plain);
        assert_eq!(
            "markdown".parse::<InputFormat>().unwrap(),
            InputFormat::Markdown
        );
        assert_eq!("html".parse::<InputFormat>().unwrap(), InputFormat::Html);
        assert!(matches!(
            "docx".parse::<InputFormat>(),
            Err(DsegenError::UnknownInputFormat { .. })
        ));
    }

    #[test]
    fn topic_argument_resolves_to_plain() {
        let (format, content) = resolve_cli_input("Hong Kong Tourism Industry").unwrap();
        assert_eq!(format, InputFormat::Plain);
        assert_eq!(content, "Hong Kong Tourism Industry");
    }

    #[test]
    fn missing_md_file_is_reported() {
        let err = resolve_cli_input("/no/such/paper.md").unwrap_err();
        assert!(matches!(err, DsegenError::InputFileNotFound { .. }));
    }

    #[test]
    fn existing_md_file_resolves_to_markdown() {
        let dir = tempfile::tempdir().unwrap();
        let path: PathBuf = dir.path().join("paper.md");
        std::fs::write(&path, "# Existing paper\n").unwrap();

        let (format, content) = resolve_cli_input(path.to_str().unwrap()).unwrap();
        assert_eq!(format, InputFormat::Markdown);
        assert_eq!(content, "# Existing paper\n");
    }

    #[test]
    fn write_artifact_is_byte_exact_and_leaves_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.md");
        let body = "# Round trip\n\n- exact bytes\n";

        write_artifact(&path, &Artifact::Markdown(body.to_string())).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), body);
        assert!(!dir.path().join("out.dsegen.tmp").exists());
    }
}
