//! docprep CLI application
//!
//! Command-line interface for the docprep library.

use clap::{Parser, Subcommand};
use docprep::utils::{format_file_size, is_supported_document, preview};
use docprep::{
    Config, DocprepError, DocumentPipeline, LabelPolicy, Outline, Record, read_records,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "docprep")]
#[command(about = "Heading-aware Markdown/PDF chunking for retrieval-augmented generation")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a document into heading-labelled chunks
    Chunk {
        /// Markdown or PDF document
        input: PathBuf,

        /// Output JSON file
        #[arg(short, long, default_value = "data.json")]
        output: PathBuf,

        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Chunk size in characters
        #[arg(long)]
        chunk_size: Option<usize>,

        /// Overlap between chunks
        #[arg(long)]
        overlap: Option<usize>,

        /// Record label: "path" (all headings) or "deepest" (last heading only)
        #[arg(long)]
        policy: Option<LabelPolicy>,

        /// Keep sections that have a heading but no text
        #[arg(long)]
        keep_empty_sections: bool,
    },

    /// Convert a PDF to Markdown
    Convert {
        /// PDF document
        input: PathBuf,

        /// Output Markdown file
        #[arg(short, long, default_value = "output.md")]
        output: PathBuf,
    },

    /// Print the heading outline of a chunk file
    Outline {
        /// JSON file written by `chunk`
        records: PathBuf,

        /// Also print the first chunk of every record
        #[arg(long)]
        preview: bool,
    },
}

fn main() {
    // Initialize logging
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Chunk {
            input,
            output,
            config,
            chunk_size,
            overlap,
            policy,
            keep_empty_sections,
        } => {
            let mut cfg = match config {
                Some(path) => Config::from_file(path),
                None => Ok(Config::default()),
            };
            if let Ok(cfg) = cfg.as_mut() {
                if let Some(chunk_size) = chunk_size {
                    cfg.chunking.chunk_size = chunk_size;
                }
                if let Some(overlap) = overlap {
                    cfg.chunking.overlap = overlap;
                }
                if let Some(policy) = policy {
                    cfg.headings.label_policy = policy;
                }
                cfg.headings.keep_empty_sections |= keep_empty_sections;
            }
            cfg.and_then(|cfg| chunk_command(input, output, &cfg))
        }
        Commands::Convert { input, output } => convert_command(input, output),
        Commands::Outline { records, preview } => outline_command(records, preview),
    };

    if let Err(e) = result {
        eprintln!("❌ {e}");
        std::process::exit(1);
    }
}

fn chunk_command(input: PathBuf, output: PathBuf, config: &Config) -> docprep::Result<()> {
    println!("📄 Processing: {}", input.display());

    if !is_supported_document(&input) {
        log::warn!("{} has an unrecognised extension, reading it as markdown", input.display());
    }

    let pipeline = DocumentPipeline::new(config)?;
    let stats = pipeline.run(&input, &output)?;

    println!("✅ Chunking complete!");
    println!("   📚 Sections: {}", stats.total_sections);
    println!("   🏷️  Records: {}", stats.total_records);
    println!("   📊 Chunks: {}", stats.total_chunks);
    println!("   ⏱️  Time: {:.2}s", stats.processing_time);
    println!(
        "   📋 Output: {} ({})",
        output.display(),
        format_file_size(stats.output_file_size)
    );

    Ok(())
}

fn convert_command(input: PathBuf, output: PathBuf) -> docprep::Result<()> {
    println!("📄 Converting: {}", input.display());

    let markdown = docprep::text::convert_to_markdown(&input)?;
    std::fs::write(&output, markdown.as_bytes()).map_err(|source| DocprepError::Write {
        path: output.clone(),
        source,
    })?;

    println!("✅ Conversion complete!");
    println!(
        "   📝 Markdown: {} ({})",
        output.display(),
        format_file_size(markdown.len() as u64)
    );

    Ok(())
}

fn outline_command(records_path: PathBuf, show_preview: bool) -> docprep::Result<()> {
    let records = read_records(&records_path)?;
    print!("{}", outline_report(&records, &records_path, show_preview));
    Ok(())
}

fn outline_report(records: &[Record], records_path: &Path, show_preview: bool) -> String {
    let outline = Outline::from_records(records);

    if outline.is_empty() {
        return format!("ℹ️  No headings found in {}\n", records_path.display());
    }

    let mut report = outline.render();

    if show_preview {
        report.push('\n');
        for (i, record) in records.iter().enumerate() {
            let first = record.chunks.first().map(|c| preview(c, 80)).unwrap_or_default();
            report.push_str(&format!("{}. {:?}: {}\n", i + 1, record.label.as_path(), first));
        }
    }

    report
}
