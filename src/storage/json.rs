//! JSON serialization of records
//!
//! Output is a pretty-printed array with two-space indentation; non-ASCII
//! text is written literally rather than escaped.

use crate::api::assembler::Record;
use crate::error::{DocprepError, Result};
use std::path::Path;

/// Render records as the JSON document written to disk
pub fn records_to_json(records: &[Record]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Write records to `path`, replacing any existing file
pub fn write_records<P: AsRef<Path>>(path: P, records: &[Record]) -> Result<u64> {
    let path = path.as_ref();
    let json = records_to_json(records)?;

    std::fs::write(path, json.as_bytes()).map_err(|source| DocprepError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    log::info!("Wrote {} records to {}", records.len(), path.display());
    Ok(json.len() as u64)
}

/// Read records written by [`write_records`]. Either label shape is accepted.
pub fn read_records<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| DocprepError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let records: Vec<Record> = serde_json::from_str(&content)?;
    log::debug!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::assembler::HeadingLabel;
    use tempfile::tempdir;

    fn sample() -> Vec<Record> {
        vec![
            Record {
                label: HeadingLabel::Path(vec!["Einführung".to_string()]),
                chunks: vec!["Grüße aus Köln".to_string()],
            },
            Record {
                label: HeadingLabel::Path(vec![]),
                chunks: vec![],
            },
        ]
    }

    #[test]
    fn test_empty_list_is_empty_array() {
        assert_eq!(records_to_json(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_pretty_two_space_layout() {
        let records = vec![Record {
            label: HeadingLabel::Single("Title".to_string()),
            chunks: vec!["text".to_string()],
        }];
        let expected = "[\n  {\n    \"heading\": \"Title\",\n    \"chunks\": [\n      \"text\"\n    ]\n  }\n]";
        assert_eq!(records_to_json(&records).unwrap(), expected);
    }

    #[test]
    fn test_non_ascii_written_literally() {
        let json = records_to_json(&sample()).unwrap();
        assert!(json.contains("Einführung"));
        assert!(json.contains("Grüße aus Köln"));
        assert!(!json.contains("\\u"));
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");

        let written = write_records(&path, &sample()).unwrap();
        assert_eq!(written, std::fs::metadata(&path).unwrap().len());
        assert_eq!(read_records(&path).unwrap(), sample());
    }

    #[test]
    fn test_read_single_label_shape() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, r#"[{"heading": "A", "chunks": ["x", "y"]}]"#).unwrap();

        let records = read_records(&path).unwrap();
        assert_eq!(records[0].label, HeadingLabel::Single("A".to_string()));
        assert_eq!(records[0].chunks, vec!["x", "y"]);
    }

    #[test]
    fn test_unwritable_path_is_write_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("data.json");
        let err = write_records(&path, &sample()).unwrap_err();
        assert!(matches!(err, DocprepError::Write { .. }));
    }
}
