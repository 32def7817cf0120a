//! State structs for tracking context during event processing.

use std::ops::Range;

use pulldown_cmark::Alignment;

use crate::autolink::AutolinkKind;
use crate::outline::{Heading, Outline};
use crate::slug::slugify;

/// State for tracking code block rendering.
#[derive(Default)]
pub struct CodeBlockState {
    /// Whether we're inside a code block.
    active: bool,
    /// Language of current code block (e.g., "rust", "python").
    language: Option<String>,
    /// Buffer for code block content.
    buffer: String,
}

impl CodeBlockState {
    /// Start a new code block with optional language.
    pub fn start(&mut self, language: Option<String>) {
        self.active = true;
        self.language = language;
        self.buffer.clear();
    }

    /// End the current code block and return (language, content).
    pub fn end(&mut self) -> (Option<String>, String) {
        self.active = false;
        (self.language.take(), std::mem::take(&mut self.buffer))
    }

    /// Check if we're inside a code block.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Append text to the code block buffer.
    pub fn push_str(&mut self, text: &str) {
        self.buffer.push_str(text);
    }
}

/// State for tracking table rendering.
#[derive(Default)]
pub struct TableState {
    /// Whether we're inside the table header row.
    in_head: bool,
    /// Column alignments for current table.
    alignments: Vec<Alignment>,
    /// Current column index in table row.
    cell_index: usize,
}

impl TableState {
    /// Start a new table with column alignments.
    pub fn start(&mut self, alignments: Vec<Alignment>) {
        self.alignments = alignments;
        self.in_head = false;
        self.cell_index = 0;
    }

    /// Start the table header row.
    pub fn start_head(&mut self) {
        self.in_head = true;
        self.cell_index = 0;
    }

    /// End the table header row.
    pub fn end_head(&mut self) {
        self.in_head = false;
    }

    /// Start a new table row.
    pub fn start_row(&mut self) {
        self.cell_index = 0;
    }

    /// Move to the next cell.
    pub fn next_cell(&mut self) {
        self.cell_index += 1;
    }

    /// Check if we're in the table header.
    pub fn is_in_head(&self) -> bool {
        self.in_head
    }

    /// Get the alignment style for the current cell.
    pub fn current_alignment_style(&self) -> &'static str {
        match self.alignments.get(self.cell_index) {
            Some(Alignment::Left) => r#" style="text-align:left""#,
            Some(Alignment::Center) => r#" style="text-align:center""#,
            Some(Alignment::Right) => r#" style="text-align:right""#,
            Some(Alignment::None) | None => "",
        }
    }
}

/// State for tracking image alt text capture.
#[derive(Default)]
pub struct ImageState {
    /// Whether we're inside an image tag.
    active: bool,
    /// Buffer for alt text.
    alt_text: String,
}

impl ImageState {
    /// Start capturing image alt text.
    pub fn start(&mut self) {
        self.active = true;
        self.alt_text.clear();
    }

    /// End image capture and return the alt text.
    pub fn end(&mut self) -> String {
        self.active = false;
        std::mem::take(&mut self.alt_text)
    }

    /// Check if we're inside an image.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Append text to the alt text buffer.
    pub fn push_str(&mut self, text: &str) {
        self.alt_text.push_str(text);
    }
}

/// How an open link will be rendered once its content is complete.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LinkTarget {
    /// `[content](url "title")` and reference links.
    Explicit { url: String, title: String },
    /// `<url>` and `<email>` autolinks.
    Auto { url: String, kind: AutolinkKind },
}

/// An open link collecting its rendered content.
pub struct LinkState {
    /// Link destination and rendering policy.
    pub target: LinkTarget,
    /// Rendered inline content.
    pub content: String,
}

/// Heading currently being rendered.
struct OpenHeading {
    level: u8,
    /// Source span of the heading content (union of inner event ranges).
    span: Option<Range<usize>>,
    /// Rendered inline HTML.
    html: String,
}

/// State for tracking headings and collecting the document outline.
#[derive(Default)]
pub struct HeadingState {
    /// Heading being rendered (None if not in a heading).
    current: Option<OpenHeading>,
    /// Completed headings.
    outline: Outline,
}

impl HeadingState {
    /// Check if we're currently inside a heading.
    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    /// Start tracking a heading.
    pub fn start_heading(&mut self, level: u8) {
        self.current = Some(OpenHeading {
            level,
            span: None,
            html: String::new(),
        });
    }

    /// Grow the heading's source span to cover an inner event.
    pub fn extend_span(&mut self, range: &Range<usize>) {
        if let Some(heading) = self.current.as_mut() {
            heading.span = Some(match heading.span.take() {
                Some(span) => span.start.min(range.start)..span.end.max(range.end),
                None => range.clone(),
            });
        }
    }

    /// Complete the heading and record it in the outline.
    ///
    /// Returns (level, id, html) or None if not in a heading.
    pub fn complete_heading(&mut self, source: &str) -> Option<(u8, String, String)> {
        let heading = self.current.take()?;
        let text = heading
            .span
            .and_then(|span| source.get(span))
            .unwrap_or_default()
            .trim()
            .to_owned();
        let html = heading.html.trim().to_owned();
        let id = slugify(&text);

        self.outline.push(Heading {
            level: heading.level,
            text,
            html: html.clone(),
        });

        Some((heading.level, id, html))
    }

    /// Get the heading HTML buffer, if inside a heading.
    pub fn html_buffer(&mut self) -> Option<&mut String> {
        self.current.as_mut().map(|heading| &mut heading.html)
    }

    /// Take the collected outline.
    pub fn take_outline(&mut self) -> Outline {
        std::mem::take(&mut self.outline)
    }
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
