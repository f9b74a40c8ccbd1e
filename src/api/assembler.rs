//! Heading-scoped chunk assembly
//!
//! Every section becomes one [`Record`]: its body split into bounded chunks,
//! labelled from its heading context. Records keep document order, and a
//! section with an empty body still yields a record with no chunks.

use crate::error::{DocprepError, Result};
use crate::text::chunking::{RecursiveCharacterSplitter, TextSplitter};
use crate::text::sectionizer::{HeadingContext, Section};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which heading(s) label a record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelPolicy {
    /// The deepest heading present, as a single string
    Deepest,

    /// Every heading present, shallowest first
    #[default]
    Path,
}

impl LabelPolicy {
    /// Compute the label of a heading context
    pub fn label(self, headings: &HeadingContext) -> HeadingLabel {
        match self {
            LabelPolicy::Deepest => HeadingLabel::Single(
                headings
                    .iter()
                    .last()
                    .map(|(_, text)| text.to_string())
                    .unwrap_or_default(),
            ),
            LabelPolicy::Path => HeadingLabel::Path(
                headings.iter().map(|(_, text)| text.to_string()).collect(),
            ),
        }
    }
}

impl fmt::Display for LabelPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelPolicy::Deepest => write!(f, "deepest"),
            LabelPolicy::Path => write!(f, "path"),
        }
    }
}

impl FromStr for LabelPolicy {
    type Err = DocprepError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "deepest" | "single" => Ok(LabelPolicy::Deepest),
            "path" => Ok(LabelPolicy::Path),
            other => Err(DocprepError::Config(format!(
                "unknown label policy {other:?} (expected \"path\" or \"deepest\")"
            ))),
        }
    }
}

/// Heading metadata of a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeadingLabel {
    /// Serialized as `"heading": "..."`
    #[serde(rename = "heading")]
    Single(String),

    /// Serialized as `"headings": [...]`
    #[serde(rename = "headings")]
    Path(Vec<String>),
}

impl HeadingLabel {
    /// Label as a heading path; a single label is a one-element path and an
    /// empty label is an empty path.
    pub fn as_path(&self) -> Vec<&str> {
        match self {
            HeadingLabel::Single(heading) if heading.is_empty() => Vec::new(),
            HeadingLabel::Single(heading) => vec![heading.as_str()],
            HeadingLabel::Path(headings) => headings.iter().map(String::as_str).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            HeadingLabel::Single(heading) => heading.is_empty(),
            HeadingLabel::Path(headings) => headings.is_empty(),
        }
    }
}

/// A heading label paired with the chunks of its section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(flatten)]
    pub label: HeadingLabel,

    pub chunks: Vec<String>,
}

/// Splits sections and labels the results
pub struct ChunkAssembler<S: TextSplitter> {
    splitter: S,
    policy: LabelPolicy,
}

impl<S: TextSplitter> ChunkAssembler<S> {
    pub fn new(splitter: S, policy: LabelPolicy) -> Self {
        Self { splitter, policy }
    }

    pub fn policy(&self) -> LabelPolicy {
        self.policy
    }

    /// Assemble one record per section, in input order
    pub fn assemble(&self, sections: &[Section]) -> Result<Vec<Record>> {
        sections
            .iter()
            .map(|section| self.assemble_section(section))
            .collect()
    }

    fn assemble_section(&self, section: &Section) -> Result<Record> {
        let chunks: Vec<String> = self
            .splitter
            .split_text(&section.body)?
            .into_iter()
            .map(str::to_string)
            .collect();
        let label = self.policy.label(&section.headings);

        log::debug!("Section {:?}: {} chunks", label.as_path(), chunks.len());
        Ok(Record { label, chunks })
    }
}

/// Assemble records with the default recursive character splitter
pub fn assemble(
    sections: &[Section],
    max_chunk_size: usize,
    overlap: usize,
    policy: LabelPolicy,
) -> Result<Vec<Record>> {
    let splitter = RecursiveCharacterSplitter::with_size(max_chunk_size, overlap)?;
    ChunkAssembler::new(splitter, policy).assemble(sections)
}
