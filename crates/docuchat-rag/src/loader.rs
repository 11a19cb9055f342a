//! Directory document loader

use serde_json::json;
use std::fs;
use std::path::Path;

use docuchat_core::{Document, Error, Result};

/// Configuration for directory loading
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Skip files that fail to read/parse instead of aborting the load.
    pub skip_unreadable: bool,
    /// Take only the first N documents in scan order.
    pub limit: Option<usize>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            skip_unreadable: true,
            limit: None,
        }
    }
}

/// Loads documents from a directory, one `Document` per supported file.
///
/// Supported formats: `.pdf` (extracted text), `.txt` (verbatim), `.md`
/// (markdown flattened to plain text). Files are visited in sorted order so
/// repeated loads are deterministic. No partial-document recovery is
/// attempted: a file either yields its whole text or is skipped/aborts,
/// depending on `skip_unreadable`.
pub struct DirectoryLoader {
    config: LoaderConfig,
}

impl DirectoryLoader {
    pub fn new() -> Self {
        Self {
            config: LoaderConfig::default(),
        }
    }

    pub fn with_config(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Load all supported documents under `dir`.
    pub fn load(&self, dir: impl AsRef<Path>) -> Result<Vec<Document>> {
        let dir = dir.as_ref();
        let entries = fs::read_dir(dir).map_err(|e| {
            Error::Loader(format!("cannot read directory {}: {}", dir.display(), e))
        })?;

        let mut paths: Vec<_> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && Self::is_supported(path))
            .collect();
        paths.sort();

        let mut documents = Vec::new();
        for path in paths {
            if let Some(limit) = self.config.limit {
                if documents.len() >= limit {
                    break;
                }
            }

            match self.load_file(&path) {
                Ok(text) => {
                    if text.trim().is_empty() {
                        tracing::warn!(path = %path.display(), "skipping empty document");
                        continue;
                    }
                    let metadata = json!({ "source": path.display().to_string() });
                    documents.push(Document::new(text, metadata));
                }
                Err(e) if self.config.skip_unreadable => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable file");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(documents)
    }

    fn is_supported(path: &Path) -> bool {
        matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("pdf") | Some("txt") | Some("md")
        )
    }

    fn load_file(&self, path: &Path) -> Result<String> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("pdf") => pdf_extract::extract_text(path)
                .map_err(|e| Error::Loader(format!("{}: {}", path.display(), e))),
            Some("md") => {
                let raw = fs::read_to_string(path)?;
                Ok(markdown_to_text(&raw))
            }
            _ => Ok(fs::read_to_string(path)?),
        }
    }
}

impl Default for DirectoryLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Flatten markdown to plain text, keeping paragraph breaks.
fn markdown_to_text(markdown: &str) -> String {
    use pulldown_cmark::{Event, Parser, Tag, TagEnd};

    let mut text = String::new();
    for event in Parser::new(markdown) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak => text.push('\n'),
            Event::End(TagEnd::Paragraph) | Event::End(TagEnd::Heading(_)) => {
                text.push_str("\n\n")
            }
            Event::End(TagEnd::Item) => text.push('\n'),
            Event::Start(Tag::Item) => text.push_str("- "),
            _ => {}
        }
    }
    text.trim_end().to_string()
}
