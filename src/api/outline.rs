//! Heading outline of a record list
//!
//! Rebuilds the section hierarchy from record labels. Each heading path is
//! keyed by a Markdown-style index (`## 1 Introduction`) and lists its direct
//! subsections, so a consumer can walk the document tree without the source.

use crate::api::assembler::Record;
use std::collections::HashMap;

/// One heading path of the outline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    /// Heading path, shallowest first
    pub headings: Vec<String>,

    /// Chunks recorded directly under this path
    pub chunk_count: usize,

    /// Titles of direct subsections, in first-seen order
    pub subsections: Vec<String>,
}

impl OutlineEntry {
    fn new(headings: Vec<String>) -> Self {
        Self {
            headings,
            chunk_count: 0,
            subsections: Vec::new(),
        }
    }

    pub fn depth(&self) -> usize {
        self.headings.len()
    }

    pub fn title(&self) -> &str {
        self.headings.last().map_or("", String::as_str)
    }

    fn add_subsection(&mut self, title: &str) {
        if !self.subsections.iter().any(|s| s == title) {
            self.subsections.push(title.to_string());
        }
    }
}

/// Index key of a heading path: one `#` per level, a space, the last title
pub fn index_key<S: AsRef<str>>(headings: &[S]) -> Option<String> {
    let title = headings.last()?;
    Some(format!("{} {}", "#".repeat(headings.len()), title.as_ref()))
}

/// Heading hierarchy rebuilt from records
#[derive(Debug, Clone, Default)]
pub struct Outline {
    entries: Vec<OutlineEntry>,
    index: HashMap<String, usize>,
}

impl Outline {
    /// Build the outline. Records without a heading are skipped; ancestors
    /// that never had a record of their own are created empty.
    pub fn from_records(records: &[Record]) -> Self {
        let mut outline = Outline::default();

        for record in records {
            let path = record.label.as_path();
            let Some(key) = index_key(&path) else {
                continue;
            };

            if let Some(&existing) = outline.index.get(&key) {
                if outline.entries[existing].headings != path {
                    log::warn!("Outline key {:?} already used by another heading path", key);
                }
            }
            let position = outline.entry_position(&path, key);
            outline.entries[position].chunk_count += record.chunks.len();

            for depth in 1..path.len() {
                let parent = &path[..depth];
                if let Some(parent_key) = index_key(parent) {
                    let parent_position = outline.entry_position(parent, parent_key);
                    outline.entries[parent_position].add_subsection(path[depth]);
                }
            }
        }

        outline
    }

    fn entry_position(&mut self, path: &[&str], key: String) -> usize {
        if let Some(&position) = self.index.get(&key) {
            return position;
        }
        let headings = path.iter().map(|h| h.to_string()).collect();
        self.entries.push(OutlineEntry::new(headings));
        self.index.insert(key, self.entries.len() - 1);
        self.entries.len() - 1
    }

    /// Look up an entry by index key
    pub fn get(&self, key: &str) -> Option<&OutlineEntry> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    /// Entries in first-seen order
    pub fn entries(&self) -> &[OutlineEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One line per entry, indented by depth
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|entry| {
                format!(
                    "{}{} {} ({} chunks)\n",
                    "  ".repeat(entry.depth().saturating_sub(1)),
                    "#".repeat(entry.depth()),
                    entry.title(),
                    entry.chunk_count
                )
            })
            .collect()
    }
}
