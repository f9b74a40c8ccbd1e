//! # docprep
//!
//! Prepares documents for retrieval-augmented generation: converts a source
//! document to Markdown, splits it into heading-tagged sections, and splits
//! each section into bounded-size chunks labelled with their heading path.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docprep::{Config, run_pipeline};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let stats = run_pipeline("output.md", "data.json", &Config::default())?;
//!     println!("Wrote {} chunks in {} records", stats.total_chunks, stats.total_records);
//!     Ok(())
//! }
//! ```
//!
//! The pieces can also be used on their own:
//!
//! ```rust
//! use docprep::{LabelPolicy, MarkdownHeaderSectionizer, Sectionizer, assemble};
//!
//! let sectionizer = MarkdownHeaderSectionizer::with_default_levels().unwrap();
//! let sections = sectionizer.sectionize("## A\ntext\n### B\nmore text").unwrap();
//! let records = assemble(&sections, 300, 0, LabelPolicy::Deepest).unwrap();
//! assert_eq!(records.len(), 2);
//! ```

// Core modules
pub mod api;
pub mod config;
pub mod error;
pub mod storage;
pub mod text;
pub mod utils;

// Re-export main API types
pub use api::{
    ChunkAssembler, DocumentPipeline, HeadingLabel, LabelPolicy, Outline, Record, assemble,
    run_pipeline,
};
pub use config::Config;
pub use error::{DocprepError, Result};

// Re-export commonly used types
pub use storage::{ChunkingStats, read_records, write_records};
pub use text::{
    MarkdownHeaderSectionizer, RecursiveCharacterSplitter, Section, Sectionizer, TextSplitter,
};
