//! Document-text extraction.

use ragout_core::error::{RagError, Result};

/// Converts uploaded document bytes into plain text.
///
/// Extraction is a collaborator of the pipeline, not part of it:
/// implementations for richer formats (PDF and friends) plug in here
/// without the pipeline noticing.
pub trait TextExtractor: Send + Sync {
    /// Extract plain text from `data`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::UnsupportedFormat`] when the input cannot be
    /// converted to text.
    fn extract(&self, data: &[u8], filename: &str) -> Result<String>;
}

/// Extracts plain-text uploads (`.txt`, `.md`, `.text`).
///
/// Bytes are decoded through a fixed fallback chain: UTF-8, windows-1251,
/// ISO-8859-5, latin-1, UTF-16LE. The first encoding that decodes without
/// error wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    fn decode(data: &[u8]) -> Option<String> {
        if let Ok(text) = std::str::from_utf8(data) {
            return Some(text.to_string());
        }
        for encoding in [
            encoding_rs::WINDOWS_1251,
            encoding_rs::ISO_8859_5,
            encoding_rs::WINDOWS_1252,
            encoding_rs::UTF_16LE,
        ] {
            if let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(data) {
                return Some(text.into_owned());
            }
        }
        None
    }
}

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, data: &[u8], filename: &str) -> Result<String> {
        let extension = std::path::Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match extension.as_str() {
            "txt" | "md" | "text" => {}
            "" => {
                return Err(RagError::UnsupportedFormat {
                    filename: filename.to_string(),
                    detail: "missing file extension".to_string(),
                });
            }
            other => {
                return Err(RagError::UnsupportedFormat {
                    filename: filename.to_string(),
                    detail: format!("unsupported extension '.{other}'"),
                });
            }
        }

        Self::decode(data).ok_or_else(|| RagError::UnsupportedFormat {
            filename: filename.to_string(),
            detail: "could not decode the file with any supported encoding".to_string(),
        })
    }
}
