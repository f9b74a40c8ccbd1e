//! Markdown sectionizing
//!
//! Splits a Markdown document into sections at ATX headings (`#` syntax) and
//! tags every section with the headings in effect at each configured level.

use crate::error::{DocprepError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of heading levels a sectionizer can track.
pub const MAX_HEADING_LEVELS: usize = 4;

/// A heading marker to split on and the name its level is reported under
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeadingLevel {
    /// ATX marker, e.g. `"##"`
    pub marker: String,

    /// Level name, e.g. `"Header 2"`
    pub name: String,
}

impl HeadingLevel {
    pub fn new(marker: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            name: name.into(),
        }
    }

    /// `#` through `####`, named `Header 1` through `Header 4`
    pub fn defaults() -> Vec<Self> {
        (1..=MAX_HEADING_LEVELS)
            .map(|depth| Self::new("#".repeat(depth), format!("Header {depth}")))
            .collect()
    }

    /// Nesting depth, i.e. the number of `#` in the marker
    pub fn depth(&self) -> usize {
        self.marker.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ActiveHeading {
    name: String,
    text: String,
}

/// Headings in effect at one point of a document, keyed by depth.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadingContext {
    levels: BTreeMap<usize, ActiveHeading>,
}

impl HeadingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `text` the active heading at `depth`, closing every heading at
    /// the same depth or deeper.
    pub fn enter(&mut self, depth: usize, name: impl Into<String>, text: impl Into<String>) {
        self.levels.retain(|&d, _| d < depth);
        self.levels.insert(
            depth,
            ActiveHeading {
                name: name.into(),
                text: text.into(),
            },
        );
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Heading text at a depth (1 for `#`)
    pub fn get(&self, depth: usize) -> Option<&str> {
        self.levels.get(&depth).map(|h| h.text.as_str())
    }

    /// Heading text for a configured level name
    pub fn get_by_name(&self, name: &str) -> Option<&str> {
        self.levels
            .values()
            .find(|h| h.name == name)
            .map(|h| h.text.as_str())
    }

    /// `(depth, text)` pairs, shallowest first
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.levels.iter().map(|(&d, h)| (d, h.text.as_str()))
    }
}

/// An ordered unit of Markdown content sharing one heading context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Headings in effect for this section
    pub headings: HeadingContext,

    /// Section content without its heading line
    pub body: String,
}

impl Section {
    pub fn new(headings: HeadingContext, body: impl Into<String>) -> Self {
        Self {
            headings,
            body: body.into(),
        }
    }
}

/// Splits Markdown text into heading-tagged sections.
pub trait Sectionizer {
    fn sectionize(&self, markdown: &str) -> Result<Vec<Section>>;
}

/// Line-oriented ATX heading splitter.
///
/// Lines inside fenced code blocks are never treated as headings, and ATX
/// headings whose depth is not configured stay part of the body.
pub struct MarkdownHeaderSectionizer {
    /// Configured level name by depth
    levels: BTreeMap<usize, String>,
    keep_empty_sections: bool,
    heading_regex: Regex,
    fence_regex: Regex,
}

impl MarkdownHeaderSectionizer {
    /// Create a sectionizer for the given heading levels
    pub fn new(levels: Vec<HeadingLevel>, keep_empty_sections: bool) -> Result<Self> {
        if levels.len() > MAX_HEADING_LEVELS {
            return Err(DocprepError::Parse(format!(
                "at most {} heading levels can be tracked, got {}",
                MAX_HEADING_LEVELS,
                levels.len()
            )));
        }

        let mut by_depth = BTreeMap::new();
        for level in levels {
            let valid = (1..=6).contains(&level.marker.len())
                && level.marker.chars().all(|c| c == '#');
            if !valid {
                return Err(DocprepError::Parse(format!(
                    "malformed heading marker {:?} for level {:?}",
                    level.marker, level.name
                )));
            }
            let depth = level.depth();
            if by_depth.insert(depth, level.name).is_some() {
                return Err(DocprepError::Parse(format!(
                    "heading marker {:?} configured twice",
                    level.marker
                )));
            }
        }

        let heading_regex = Regex::new(r"^(#{1,6})(?:[ \t]+(.*?))?(?:[ \t]+#+)?[ \t]*$")
            .map_err(|e| DocprepError::Parse(format!("Failed to compile heading regex: {e}")))?;
        let fence_regex = Regex::new(r"^(`{3,}|~{3,})")
            .map_err(|e| DocprepError::Parse(format!("Failed to compile fence regex: {e}")))?;

        Ok(Self {
            levels: by_depth,
            keep_empty_sections,
            heading_regex,
            fence_regex,
        })
    }

    /// Sectionizer for the default four levels
    pub fn with_default_levels() -> Result<Self> {
        Self::new(HeadingLevel::defaults(), false)
    }

    /// Depth, level name and title when `line` is a configured heading
    fn match_heading<'a>(&'a self, line: &'a str) -> Option<(usize, &'a str, &'a str)> {
        let caps = self.heading_regex.captures(line)?;
        let depth = caps.get(1)?.as_str().len();
        let name = self.levels.get(&depth)?;
        let title = caps.get(2).map_or("", |m| m.as_str().trim());
        // `# #` is an empty heading followed by its closing sequence
        let title = if title.bytes().all(|b| b == b'#') { "" } else { title };
        Some((depth, name.as_str(), title))
    }

    fn flush(
        &self,
        sections: &mut Vec<Section>,
        headings: &HeadingContext,
        lines: &mut Vec<&str>,
        opened_by_heading: bool,
    ) {
        let body = lines.join("\n");
        let body = body.trim();
        lines.clear();

        if !body.is_empty() || (self.keep_empty_sections && opened_by_heading) {
            sections.push(Section::new(headings.clone(), body));
        }
    }
}

impl Sectionizer for MarkdownHeaderSectionizer {
    fn sectionize(&self, markdown: &str) -> Result<Vec<Section>> {
        let markdown = markdown.strip_prefix('\u{feff}').unwrap_or(markdown);

        let mut sections = Vec::new();
        let mut headings = HeadingContext::new();
        let mut lines: Vec<&str> = Vec::new();
        let mut open_fence: Option<String> = None;
        let mut opened_by_heading = false;

        for line in markdown.lines() {
            let trimmed = line.trim();

            if let Some(fence) = &open_fence {
                if trimmed.starts_with(fence.as_str()) {
                    open_fence = None;
                }
                lines.push(line);
                continue;
            }

            if let Some(caps) = self.fence_regex.captures(trimmed) {
                open_fence = Some(caps[1].to_string());
                lines.push(line);
                continue;
            }

            if let Some((depth, name, title)) = self.match_heading(trimmed) {
                self.flush(&mut sections, &headings, &mut lines, opened_by_heading);
                headings.enter(depth, name, title);
                opened_by_heading = true;
                continue;
            }

            lines.push(line);
        }

        if open_fence.is_some() {
            log::debug!("Document ends inside an unterminated code fence");
        }
        self.flush(&mut sections, &headings, &mut lines, opened_by_heading);

        log::debug!("Sectionized document into {} sections", sections.len());
        Ok(sections)
    }
}
