//! Text processing for docprep
//!
//! This module turns source documents into Markdown, splits Markdown into
//! heading-tagged sections, and splits section bodies into bounded chunks.

pub mod chunking;
pub mod pdf;
pub mod sectionizer;

// Re-export main types and functions
pub use chunking::{RecursiveCharacterSplitter, TextSplitter};
pub use pdf::{PdfProcessor, convert_to_markdown};
pub use sectionizer::{HeadingContext, HeadingLevel, MarkdownHeaderSectionizer, Section, Sectionizer};
