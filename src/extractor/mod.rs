//! PDF text extraction.
//!
//! Uses lopdf to pull text out of each page. Files whose pages hold no text
//! (typically scanned, image-only documents) are reported as warnings rather
//! than failing the whole batch.

#[cfg(test)]
mod tests;

use lopdf::Document;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::{PdfChatError, Result};

/// An uploaded PDF file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl PdfDocument {
    #[inline]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Read a PDF from disk, naming it after the file
    #[inline]
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        let file_name = path.file_name().map_or_else(
            || path.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        );
        Ok(Self { file_name, bytes })
    }
}

/// Something worth telling the user about a file that did not stop processing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionWarning {
    NoText { file_name: String },
}

impl fmt::Display for ExtractionWarning {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoText { file_name } => write!(
                f,
                "No text could be extracted from {}. Consider using OCR.",
                file_name
            ),
        }
    }
}

/// Combined text of a batch of PDFs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedText {
    pub text: String,
    pub warnings: Vec<ExtractionWarning>,
}

/// Extract and concatenate the text of every page of every document, in order.
///
/// Pages and files are joined without any separator.
#[inline]
pub fn extract_text(documents: &[PdfDocument]) -> Result<ExtractedText> {
    let mut extracted = ExtractedText::default();

    for document in documents {
        let pages = extract_pages(document)?;

        if pages.iter().all(|page| page.trim().is_empty()) {
            let warning = ExtractionWarning::NoText {
                file_name: document.file_name.clone(),
            };
            warn!("{}", warning);
            extracted.warnings.push(warning);
            continue;
        }

        for page in &pages {
            extracted.text.push_str(page);
        }
    }

    info!(
        "Extracted {} characters from {} files ({} without text)",
        extracted.text.chars().count(),
        documents.len(),
        extracted.warnings.len()
    );

    Ok(extracted)
}

/// Text of each page of one document, in page order
fn extract_pages(document: &PdfDocument) -> Result<Vec<String>> {
    let pdf = Document::load_mem(&document.bytes).map_err(|e| PdfChatError::Extraction {
        file_name: document.file_name.clone(),
        message: e.to_string(),
    })?;

    let pages = pdf.get_pages();
    debug!("{} has {} pages", document.file_name, pages.len());

    let texts = pages
        .keys()
        .map(|&page_number| {
            pdf.extract_text(&[page_number]).unwrap_or_else(|e| {
                debug!(
                    "No text extracted from page {} of {}: {}",
                    page_number, document.file_name, e
                );
                String::new()
            })
        })
        .collect();

    Ok(texts)
}
