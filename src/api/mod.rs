//! API layer for docprep
//!
//! This module provides the chunk assembler, the end-to-end pipeline, and the
//! outline built from assembled records.

pub mod assembler;
pub mod outline;
pub mod pipeline;

// Re-export main API types
pub use assembler::{ChunkAssembler, HeadingLabel, LabelPolicy, Record, assemble};
pub use outline::{Outline, OutlineEntry, index_key};
pub use pipeline::{DocumentPipeline, run_pipeline};
