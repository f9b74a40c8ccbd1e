//! End-to-end tests for the chunking pipeline
//!
//! Every test writes its input and output under a temporary directory.

use docprep::api::index_key;
use docprep::{
    Config, DocprepError, DocumentPipeline, HeadingLabel, LabelPolicy, MarkdownHeaderSectionizer,
    Outline, Record, Sectionizer, assemble, read_records, run_pipeline,
};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

fn write_input(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn config_with_policy(policy: LabelPolicy) -> Config {
    let mut config = Config::default();
    config.headings.label_policy = policy;
    config
}

fn run_markdown(markdown: &str, policy: LabelPolicy) -> Vec<Record> {
    let dir = tempdir().unwrap();
    let input = write_input(&dir, "output.md", markdown.as_bytes());
    let output = dir.path().join("data.json");

    run_pipeline(&input, &output, &config_with_policy(policy)).unwrap();
    read_records(&output).unwrap()
}

/// PDF with one line of text per page
fn build_pdf(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let kids: Vec<Object> = pages
        .iter()
        .map(|text| {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![100.into(), 600.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            Object::Reference(doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            }))
        })
        .collect();

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

fn paper() -> String {
    let mut doc = String::from("# Paper\n\nAbstract paragraph.\n\n");
    for section in ["Introduction", "Methods", "Results"] {
        doc.push_str(&format!("## {section}\n\n"));
        for i in 0..12 {
            doc.push_str(&format!(
                "Sentence {i} of the {section} section carries a few words of content.\n"
            ));
        }
        doc.push_str(&format!("\n### {section} details\n\nA closing remark.\n\n"));
    }
    doc
}

#[test]
fn test_single_heading_document() {
    let records = run_markdown("# Title\n\nShort text under 300 chars.", LabelPolicy::Deepest);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].label, HeadingLabel::Single("Title".to_string()));
    assert_eq!(records[0].chunks, vec!["Short text under 300 chars."]);

    let records = run_markdown("# Title\n\nShort text under 300 chars.", LabelPolicy::Path);
    assert_eq!(records[0].label, HeadingLabel::Path(vec!["Title".to_string()]));
}

#[test]
fn test_document_without_headings() {
    let records = run_markdown("plain text", LabelPolicy::Deepest);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].label, HeadingLabel::Single(String::new()));
    assert_eq!(records[0].chunks, vec!["plain text"]);

    let records = run_markdown("plain text", LabelPolicy::Path);
    assert_eq!(records[0].label, HeadingLabel::Path(vec![]));
}

#[test]
fn test_nested_headings_both_policies() {
    let markdown = "## A\ntext\n### B\nmore text";

    let deepest = run_markdown(markdown, LabelPolicy::Deepest);
    assert_eq!(
        deepest
            .iter()
            .map(|r| (r.label.clone(), r.chunks.clone()))
            .collect::<Vec<_>>(),
        vec![
            (HeadingLabel::Single("A".into()), vec!["text".to_string()]),
            (HeadingLabel::Single("B".into()), vec!["more text".to_string()]),
        ]
    );

    let path = run_markdown(markdown, LabelPolicy::Path);
    assert_eq!(path[0].label, HeadingLabel::Path(vec!["A".into()]));
    assert_eq!(path[1].label, HeadingLabel::Path(vec!["A".into(), "B".into()]));
    assert_eq!(path[1].chunks, vec!["more text"]);
}

#[test]
fn test_empty_document_writes_empty_array() {
    let dir = tempdir().unwrap();
    let input = write_input(&dir, "output.md", b"");
    let output = dir.path().join("data.json");

    let stats = run_pipeline(&input, &output, &Config::default()).unwrap();
    assert_eq!(stats.total_records, 0);
    assert_eq!(stats.total_chunks, 0);
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "[]");
}

#[test]
fn test_output_is_byte_identical_across_runs() {
    let dir = tempdir().unwrap();
    let input = write_input(&dir, "output.md", paper().as_bytes());
    let first = dir.path().join("first.json");
    let second = dir.path().join("second.json");

    let pipeline = DocumentPipeline::new(&Config::default()).unwrap();
    pipeline.run(&input, &first).unwrap();
    pipeline.run(&input, &second).unwrap();

    assert_eq!(std::fs::read(&first).unwrap(), std::fs::read(&second).unwrap());
}

#[test]
fn test_one_record_per_section() {
    let sectionizer = MarkdownHeaderSectionizer::with_default_levels().unwrap();
    let sections = sectionizer.sectionize(&paper()).unwrap();
    let records = assemble(&sections, 120, 0, LabelPolicy::Path).unwrap();

    assert_eq!(records.len(), sections.len());
    assert!(records.iter().all(|r| !r.chunks.is_empty()));
}

#[test]
fn test_chunks_reassemble_section_body() {
    let sectionizer = MarkdownHeaderSectionizer::with_default_levels().unwrap();
    let sections = sectionizer.sectionize(&paper()).unwrap();
    let records = assemble(&sections, 80, 0, LabelPolicy::Deepest).unwrap();

    for (section, record) in sections.iter().zip(&records) {
        assert_eq!(record.chunks.concat(), section.body);
    }
}

#[test]
fn test_chunks_respect_size_limit() {
    let records = {
        let sectionizer = MarkdownHeaderSectionizer::with_default_levels().unwrap();
        let sections = sectionizer.sectionize(&paper()).unwrap();
        assemble(&sections, 80, 20, LabelPolicy::Path).unwrap()
    };

    let chunks: Vec<&String> = records.iter().flat_map(|r| &r.chunks).collect();
    assert!(chunks.len() > records.len());
    assert!(chunks.iter().all(|c| c.chars().count() <= 80));
}

#[test]
fn test_text_without_whitespace_is_still_chunked() {
    let body = "x".repeat(1000);
    let records = run_markdown(&format!("# Blob\n\n{body}"), LabelPolicy::Deepest);

    assert_eq!(records.len(), 1);
    let chunks = &records[0].chunks;
    assert!(chunks.iter().all(|c| c.chars().count() <= 300));
    assert_eq!(chunks.concat(), body);
}

#[test]
fn test_fenced_code_headings_ignored() {
    let markdown = "# Setup\n\n```sh\n# install\ncargo build\n```\n";
    let records = run_markdown(markdown, LabelPolicy::Path);

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].label, HeadingLabel::Path(vec!["Setup".into()]));
    assert!(records[0].chunks[0].contains("# install"));
}

#[test]
fn test_pdf_input_keeps_pages_apart() {
    let dir = tempdir().unwrap();
    let input = write_input(
        &dir,
        "paper.pdf",
        &build_pdf(&["Hello first page", "Second page text"]),
    );
    let output = dir.path().join("data.json");

    let stats = run_pipeline(&input, &output, &Config::default()).unwrap();
    assert_eq!(stats.total_records, 1);

    let records = read_records(&output).unwrap();
    assert_eq!(records[0].label, HeadingLabel::Path(vec![]));
    assert_eq!(records[0].chunks, vec!["Hello first page\n\nSecond page text"]);
}

#[test]
fn test_corrupt_pdf_is_pdf_error() {
    let dir = tempdir().unwrap();
    let input = write_input(&dir, "broken.pdf", b"%PDF-1.5 truncated");

    let err = run_pipeline(&input, dir.path().join("data.json"), &Config::default()).unwrap_err();
    assert!(matches!(err, DocprepError::Pdf(_)));
}

#[test]
fn test_missing_input_is_read_error() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("data.json");

    let err = run_pipeline(dir.path().join("absent.md"), &output, &Config::default()).unwrap_err();
    assert!(matches!(err, DocprepError::Read { .. }));
    assert!(!output.exists());
}

#[test]
fn test_invalid_utf8_is_parse_error() {
    let dir = tempdir().unwrap();
    let input = write_input(&dir, "output.md", &[b'#', b' ', 0xff, 0xfe, b'\n']);

    let err = run_pipeline(&input, dir.path().join("data.json"), &Config::default()).unwrap_err();
    assert!(matches!(err, DocprepError::Parse(_)));
}

#[test]
fn test_config_file_drives_pipeline() {
    let dir = tempdir().unwrap();
    let config_path = write_input(
        &dir,
        "docprep.json",
        br#"{"chunking": {"chunk_size": 40}, "headings": {"label_policy": "deepest"}}"#,
    );
    let config = Config::from_file(&config_path).unwrap();
    assert_eq!(config.chunking.chunk_size, 40);
    assert_eq!(config.chunking.overlap, 0);

    let input = write_input(&dir, "output.md", paper().as_bytes());
    let output = dir.path().join("data.json");
    run_pipeline(&input, &output, &config).unwrap();

    let json = std::fs::read_to_string(&output).unwrap();
    assert!(json.contains("\"heading\""));
    assert!(!json.contains("\"headings\""));
}

#[test]
fn test_outline_from_written_records() {
    let records = run_markdown(&paper(), LabelPolicy::Path);
    let outline = Outline::from_records(&records);

    let root = outline.get("# Paper").unwrap();
    assert_eq!(root.subsections, vec!["Introduction", "Methods", "Results"]);

    let methods = outline.get("## Methods").unwrap();
    assert_eq!(methods.subsections, vec!["Methods details"]);
    assert!(methods.chunk_count >= 2);

    let key = index_key(&["Paper", "Results", "Results details"]).unwrap();
    assert_eq!(outline.get(&key).unwrap().chunk_count, 1);
}

#[test]
fn test_records_written_to_requested_path() {
    let dir = tempdir().unwrap();
    let input = write_input(&dir, "notes.markdown", b"# Notes\n\nsome notes");
    let output: &Path = &dir.path().join("nested.json");

    let stats = run_pipeline(&input, output, &Config::default()).unwrap();
    assert_eq!(stats.output_file_size, std::fs::metadata(output).unwrap().len());
    assert_eq!(read_records(output).unwrap().len(), 1);
}
