//! Uploaded documents and PDF text extraction.
//!
//! Extraction is delegated to [`pdf_extract`]. The library can panic on
//! malformed input, so calls run on the blocking pool behind `catch_unwind`
//! and panics come back as [`EduAidError::Pdf`].

use crate::error::{EduAidError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Magic bytes at the start of every PDF file.
const PDF_MAGIC: &[u8] = b"%PDF-";

/// How far into the file the PDF header may appear.
const HEADER_SEARCH_LIMIT: usize = 1024;

/// A file handed to EduAid for one session.
#[derive(Debug, Clone)]
pub struct Document {
    /// Original file name, for display.
    pub name: String,
    /// Raw file contents.
    pub bytes: Bytes,
}

impl Document {
    /// Create a document from in-memory bytes.
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a document from disk.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document.pdf")
            .to_string();
        Ok(Self::new(name, bytes))
    }

    /// Size of the document in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the document has no content at all.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Whether the content carries a PDF header.
    pub fn looks_like_pdf(&self) -> bool {
        let head = &self.bytes[..self.bytes.len().min(HEADER_SEARCH_LIMIT)];
        head.windows(PDF_MAGIC.len()).any(|w| w == PDF_MAGIC)
    }
}

/// Text pulled out of a document. Immutable once extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    /// Concatenation of all page texts, in page order.
    pub text: String,
    /// Number of pages the text came from.
    pub page_count: usize,
}

impl ExtractedText {
    /// Build from per-page texts; pages are concatenated without a separator.
    pub fn from_pages(pages: Vec<String>) -> Self {
        let page_count = pages.len();
        Self {
            text: pages.concat(),
            page_count,
        }
    }

    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Trait for document text extraction.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract all text of `document`, in reading order.
    async fn extract(&self, document: &Document) -> Result<ExtractedText>;
}

/// Extracts text from PDF documents with `pdf_extract`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractor;

#[async_trait]
impl TextExtractor for PdfExtractor {
    async fn extract(&self, document: &Document) -> Result<ExtractedText> {
        extract_text(document).await
    }
}

/// Extract the text of every page of a PDF document.
#[instrument(skip(document), fields(name = %document.name, size = document.len()))]
pub async fn extract_text(document: &Document) -> Result<ExtractedText> {
    if document.is_empty() {
        return Err(EduAidError::Pdf(format!("'{}' is empty", document.name)));
    }
    if !document.looks_like_pdf() {
        return Err(EduAidError::Pdf(format!(
            "'{}' is not a PDF file",
            document.name
        )));
    }

    let bytes = document.bytes.clone();
    let pages = tokio::task::spawn_blocking(move || extract_pages(&bytes))
        .await
        .map_err(|e| EduAidError::Pdf(format!("extraction task failed: {}", e)))??;

    let extracted = ExtractedText::from_pages(pages);
    debug!("Extracted {} pages", extracted.page_count);

    if extracted.text.trim().is_empty() {
        return Err(EduAidError::EmptyDocument(document.name.clone()));
    }

    info!(
        "Extracted {} words from {} pages",
        extracted.word_count(),
        extracted.page_count
    );
    Ok(extracted)
}

fn extract_pages(data: &[u8]) -> Result<Vec<String>> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(data)
    }));
    match result {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => Err(EduAidError::Pdf(e.to_string())),
        Err(_) => Err(EduAidError::Pdf(
            "parser panicked (malformed document)".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_concatenate_in_order() {
        let extracted = ExtractedText::from_pages(vec![
            "First page. ".to_string(),
            "Second page.".to_string(),
        ]);
        assert_eq!(extracted.text, "First page. Second page.");
        assert_eq!(extracted.page_count, 2);
        assert_eq!(extracted.word_count(), 4);
    }

    #[test]
    fn test_pdf_header_detection() {
        assert!(Document::new("a.pdf", b"%PDF-1.7\n...".to_vec()).looks_like_pdf());
        assert!(Document::new("a.pdf", b"\xef\xbb\xbf%PDF-1.4".to_vec()).looks_like_pdf());
        assert!(!Document::new("a.txt", b"hello world".to_vec()).looks_like_pdf());
    }

    #[tokio::test]
    async fn test_rejects_empty_document() {
        let doc = Document::new("empty.pdf", Vec::new());
        let err = extract_text(&doc).await.unwrap_err();
        assert!(matches!(err, EduAidError::Pdf(_)));
    }

    #[tokio::test]
    async fn test_rejects_non_pdf() {
        let doc = Document::new("notes.txt", b"Just some plain text.".to_vec());
        let err = extract_text(&doc).await.unwrap_err();
        assert!(err.to_string().contains("not a PDF"));
    }

    #[tokio::test]
    async fn test_malformed_pdf_is_an_error_not_a_panic() {
        let doc = Document::new("broken.pdf", b"%PDF-1.4\n garbage without objects".to_vec());
        assert!(extract_text(&doc).await.is_err());
    }

    #[tokio::test]
    async fn test_from_path_uses_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lecture.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let doc = Document::from_path(&path).await.unwrap();
        assert_eq!(doc.name, "lecture.pdf");
        assert_eq!(doc.len(), 8);
    }
}
