//! DocumentPipeline - read, sectionize, assemble, write
//!
//! The pipeline holds no global state: input and output paths are passed to
//! [`DocumentPipeline::run`] and everything else comes from [`Config`] or the
//! components handed to [`DocumentPipeline::with_components`].

use crate::api::assembler::{ChunkAssembler, LabelPolicy, Record};
use crate::config::Config;
use crate::error::Result;
use crate::storage::{ChunkingStats, write_records};
use crate::text::{
    MarkdownHeaderSectionizer, RecursiveCharacterSplitter, Sectionizer, TextSplitter,
    convert_to_markdown,
};
use std::path::Path;
use std::time::Instant;

/// Single-document chunking pipeline
pub struct DocumentPipeline<Z: Sectionizer, S: TextSplitter> {
    sectionizer: Z,
    assembler: ChunkAssembler<S>,
}

impl DocumentPipeline<MarkdownHeaderSectionizer, RecursiveCharacterSplitter> {
    /// Create a pipeline with the default components
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        let sectionizer = MarkdownHeaderSectionizer::new(
            config.headings.levels.clone(),
            config.headings.keep_empty_sections,
        )?;
        let splitter = RecursiveCharacterSplitter::new(&config.chunking)?;

        Ok(Self::with_components(
            sectionizer,
            splitter,
            config.headings.label_policy,
        ))
    }
}

impl<Z: Sectionizer, S: TextSplitter> DocumentPipeline<Z, S> {
    /// Create a pipeline from custom components
    pub fn with_components(sectionizer: Z, splitter: S, policy: LabelPolicy) -> Self {
        Self {
            sectionizer,
            assembler: ChunkAssembler::new(splitter, policy),
        }
    }

    /// Turn Markdown text into records
    pub fn process_markdown(&self, markdown: &str) -> Result<Vec<Record>> {
        let sections = self.sectionizer.sectionize(markdown)?;
        self.assembler.assemble(&sections)
    }

    /// Process `input` and write the records to `output`
    pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(&self, input: P, output: Q) -> Result<ChunkingStats> {
        let input = input.as_ref();
        let output = output.as_ref();
        let start_time = Instant::now();

        log::info!("Processing {}", input.display());
        let markdown = convert_to_markdown(input)?;

        let sections = self.sectionizer.sectionize(&markdown)?;
        let records = self.assembler.assemble(&sections)?;
        let total_chunks = records.iter().map(|r| r.chunks.len()).sum();

        log::info!(
            "Assembled {} records ({} chunks, {} labels)",
            records.len(),
            total_chunks,
            self.assembler.policy()
        );

        let output_file_size = write_records(output, &records)?;

        Ok(ChunkingStats {
            total_sections: sections.len(),
            total_records: records.len(),
            total_chunks,
            output_file_size,
            processing_time: start_time.elapsed().as_secs_f64(),
        })
    }
}

/// Run the default pipeline once
pub fn run_pipeline<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    config: &Config,
) -> Result<ChunkingStats> {
    DocumentPipeline::new(config)?.run(input, output)
}
