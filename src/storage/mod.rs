//! Storage functionality for docprep
//!
//! Records are persisted as a single JSON document.

pub mod json;

// Re-export main functions
pub use json::{read_records, records_to_json, write_records};

/// Chunking statistics
#[derive(Debug, Clone, Default)]
pub struct ChunkingStats {
    /// Sections produced by the sectionizer
    pub total_sections: usize,

    /// Records written to the output
    pub total_records: usize,

    /// Chunks across all records
    pub total_chunks: usize,

    /// Size of the JSON output in bytes
    pub output_file_size: u64,

    /// Total processing time in seconds
    pub processing_time: f64,
}
