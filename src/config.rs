//! Configuration for docprep
//!
//! Every value the pipeline needs is carried here and handed to the pipeline
//! explicitly. Defaults reproduce the reference behaviour: 300 character
//! chunks, no overlap, four ATX heading levels.

use crate::api::assembler::LabelPolicy;
use crate::error::{DocprepError, Result};
use crate::text::sectionizer::{HeadingLevel, MAX_HEADING_LEVELS};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Bounded-size splitter settings
    pub chunking: ChunkingConfig,

    /// Heading detection and labelling settings
    pub headings: HeadingsConfig,
}

/// Settings for the recursive character splitter
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Upper bound on chunk length, in characters
    pub chunk_size: usize,

    /// Characters shared between consecutive chunks of one section
    pub overlap: usize,

    /// Split points tried in order; `""` splits between characters
    pub separators: Vec<String>,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 300,
            overlap: 0,
            separators: default_separators(),
        }
    }
}

/// The separator cascade used when none is configured.
pub fn default_separators() -> Vec<String> {
    ["\n\n", "\n", " ", ""].iter().map(|s| s.to_string()).collect()
}

/// Settings for the sectionizer and the label policy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HeadingsConfig {
    /// Heading markers to split on, with the name each level is reported under
    pub levels: Vec<HeadingLevel>,

    /// Which heading(s) label a record
    pub label_policy: LabelPolicy,

    /// Keep sections that have a heading but no body text
    pub keep_empty_sections: bool,
}

impl Default for HeadingsConfig {
    fn default() -> Self {
        Self {
            levels: HeadingLevel::defaults(),
            label_policy: LabelPolicy::default(),
            keep_empty_sections: false,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file. Missing fields take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| DocprepError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| DocprepError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;

        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Reject parameter combinations the splitter or sectionizer cannot honour
    pub fn validate(&self) -> Result<()> {
        self.chunking.validate()?;

        if self.headings.levels.is_empty() {
            return Err(DocprepError::Config(
                "at least one heading level is required".to_string(),
            ));
        }
        if self.headings.levels.len() > MAX_HEADING_LEVELS {
            return Err(DocprepError::Config(format!(
                "at most {} heading levels are supported, got {}",
                MAX_HEADING_LEVELS,
                self.headings.levels.len()
            )));
        }
        Ok(())
    }
}

impl ChunkingConfig {
    /// Validate size, overlap and separator settings
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(DocprepError::Config(
                "chunk_size must be greater than zero".to_string(),
            ));
        }
        if self.overlap >= self.chunk_size {
            return Err(DocprepError::Config(format!(
                "overlap ({}) must be smaller than chunk_size ({})",
                self.overlap, self.chunk_size
            )));
        }
        if self.separators.is_empty() {
            return Err(DocprepError::Config(
                "at least one separator is required".to_string(),
            ));
        }
        Ok(())
    }
}
