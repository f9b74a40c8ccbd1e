//! Source document conversion
//!
//! PDFs are converted to Markdown made of plain paragraphs, one block per
//! page. Layout analysis (headings from font sizes, tables, images) is out of
//! scope, so a converted PDF usually sectionizes into a single section.

use crate::error::{DocprepError, Result};
use crate::utils::get_file_extension;
use std::path::Path;
use unicode_normalization::UnicodeNormalization;

/// PDF to Markdown converter
pub struct PdfProcessor;

impl PdfProcessor {
    /// Extract the raw text of a PDF file, one string per page
    pub fn extract_pages<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
        let bytes = read_bytes(path.as_ref())?;
        Self::extract_pages_from_bytes(&bytes)
    }

    /// Extract the raw text of an in-memory PDF, one string per page
    pub fn extract_pages_from_bytes(bytes: &[u8]) -> Result<Vec<String>> {
        let page_count = Self::page_count(bytes)?;

        let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)?;
        log::debug!("Extracted text from {}/{} pages", pages.len(), page_count);
        Ok(pages)
    }

    /// Count pages, rejecting documents lopdf cannot load or that are encrypted
    pub fn page_count(bytes: &[u8]) -> Result<usize> {
        let document = lopdf::Document::load_mem(bytes)?;
        if document.is_encrypted() {
            return Err(DocprepError::Pdf("encrypted PDFs are not supported".to_string()));
        }
        Ok(document.get_pages().len())
    }

    /// Convert a PDF file to Markdown
    pub fn to_markdown<P: AsRef<Path>>(path: P) -> Result<String> {
        let path = path.as_ref();
        let pages = Self::extract_pages(path)?;
        let markdown = Self::pages_to_markdown(&pages);

        if markdown.is_empty() {
            log::warn!("No extractable text in {} (scanned PDF?)", path.display());
        } else {
            log::info!(
                "Converted {} pages of {} to {} characters of markdown",
                pages.len(),
                path.display(),
                markdown.chars().count()
            );
        }
        Ok(markdown)
    }

    /// Normalise extracted pages into Markdown paragraphs.
    ///
    /// Ligatures and compatibility characters are folded with NFKC, lines are
    /// trimmed, runs of blank lines collapse to one, and pages are separated by
    /// a blank line. Pages without text are dropped.
    pub fn pages_to_markdown<S: AsRef<str>>(pages: &[S]) -> String {
        pages
            .iter()
            .map(|page| normalize_page(page.as_ref()))
            .filter(|page| !page.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

fn normalize_page(page: &str) -> String {
    let normalized: String = page.nfkc().collect();

    let mut lines: Vec<&str> = Vec::new();
    for line in normalized.lines().map(str::trim) {
        if line.is_empty() && lines.last().is_none_or(|l| l.is_empty()) {
            continue;
        }
        lines.push(line);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| DocprepError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a source document as Markdown text.
///
/// `.pdf` files are converted; anything else must be UTF-8 Markdown.
pub fn convert_to_markdown<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();

    if get_file_extension(path).as_deref() == Some("pdf") {
        return PdfProcessor::to_markdown(path);
    }

    let bytes = read_bytes(path)?;
    String::from_utf8(bytes).map_err(|e| {
        DocprepError::Parse(format!("{} is not valid UTF-8: {}", path.display(), e))
    })
}
