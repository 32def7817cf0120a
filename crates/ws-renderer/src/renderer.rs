//! Generic markdown renderer with pluggable backend.

use std::collections::HashMap;
use std::fmt::Write;
use std::marker::PhantomData;
use std::sync::Arc;

use pulldown_cmark::{CodeBlockKind, Event, LinkType, Options, Parser, Tag, TagEnd};

use crate::autolink::{AutolinkKind, find_bare_links, is_www};
use crate::backend::RenderBackend;
use crate::code_block::{CodeBlockProcessor, ProcessResult, parse_fence_info};
use crate::emoji::{DEFAULT_EMOJI_PATH, EmojiResolver, Gemoji, push_with_emoji};
use crate::outline::Outline;
use crate::state::{
    CodeBlockState, HeadingState, ImageState, LinkState, LinkTarget, TableState, escape_html,
};
use crate::text_run::TextRun;
use crate::util::heading_level_to_num;

/// Result of rendering markdown.
#[derive(Clone, Debug)]
pub struct RenderResult {
    /// Rendered HTML content.
    pub html: String,
    /// Every heading of the document, in order.
    pub outline: Outline,
    /// Warnings reported by code block processors.
    pub warnings: Vec<String>,
}

/// Generic markdown renderer with pluggable backend.
///
/// Uses the [`RenderBackend`] trait to delegate policy-specific rendering
/// (links, autolinks, emoji, code blocks) while handling common elements
/// (tables, lists, inline formatting) generically.
///
/// A renderer renders exactly one document: [`render`](Self::render)
/// consumes it and returns the body HTML together with the heading outline.
///
/// # Code Block Processors
///
/// Custom code block processing can be added via [`with_processor`](Self::with_processor).
/// Processors are checked in order; the first returning a non-`PassThrough` result wins.
pub struct MarkdownRenderer<B: RenderBackend> {
    output: String,
    /// Code block rendering state.
    code: CodeBlockState,
    /// Table rendering state.
    table: TableState,
    /// Image alt text capture state.
    image: ImageState,
    /// Heading tracking and outline collection.
    heading: HeadingState,
    /// Open links, innermost last.
    links: Vec<LinkState>,
    /// Pending image data (src, title) waiting for alt text.
    pending_image: Option<(String, String)>,
    /// Consecutive text events not yet written.
    pending_text: TextRun,
    /// Anchors opened by inline HTML and not yet closed.
    raw_links: usize,
    /// Registered code block processors.
    processors: Vec<Box<dyn CodeBlockProcessor>>,
    /// Current code block index for processor callbacks.
    code_block_index: usize,
    /// Pending code block attrs from fence info.
    pending_attrs: HashMap<String, String>,
    /// Shortcode lookup.
    emoji: Arc<dyn EmojiResolver>,
    /// URL directory for emoji images.
    emoji_path: String,
    smart_punctuation: bool,
    /// Link bare URLs and email addresses found in text.
    autolink: bool,
    _backend: PhantomData<B>,
}

impl<B: RenderBackend> MarkdownRenderer<B> {
    /// Create a new renderer.
    ///
    /// Smart punctuation and bare-URL autolinking are enabled; emoji resolve
    /// through [`Gemoji`] into [`DEFAULT_EMOJI_PATH`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            output: String::with_capacity(4096),
            code: CodeBlockState::default(),
            table: TableState::default(),
            image: ImageState::default(),
            heading: HeadingState::default(),
            links: Vec::new(),
            pending_image: None,
            pending_text: TextRun::default(),
            raw_links: 0,
            processors: Vec::new(),
            code_block_index: 0,
            pending_attrs: HashMap::new(),
            emoji: Arc::new(Gemoji::new()),
            emoji_path: DEFAULT_EMOJI_PATH.to_owned(),
            smart_punctuation: true,
            autolink: true,
            _backend: PhantomData,
        }
    }

    /// Add a code block processor.
    ///
    /// Processors are checked in order when a fenced code block with a
    /// language tag is encountered.
    ///
    /// # Example
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use ws_renderer::{CodeBlockProcessor, HtmlBackend, MarkdownRenderer, ProcessResult};
    ///
    /// struct TermProcessor;
    ///
    /// impl CodeBlockProcessor for TermProcessor {
    ///     fn process(
    ///         &mut self,
    ///         language: &str,
    ///         _attrs: &HashMap<String, String>,
    ///         source: &str,
    ///         _index: usize,
    ///     ) -> ProcessResult {
    ///         if language == "term" {
    ///             ProcessResult::Inline(format!("<samp>{}</samp>", source.trim()))
    ///         } else {
    ///             ProcessResult::PassThrough
    ///         }
    ///     }
    /// }
    ///
    /// let result = MarkdownRenderer::<HtmlBackend>::new()
    ///     .with_processor(TermProcessor)
    ///     .render("```term\n$ ls\n```");
    /// assert_eq!(result.html, "<samp>$ ls</samp>");
    /// ```
    #[must_use]
    pub fn with_processor<P: CodeBlockProcessor + 'static>(mut self, processor: P) -> Self {
        self.processors.push(Box::new(processor));
        self
    }

    /// Set the emoji shortcode resolver.
    #[must_use]
    pub fn with_emoji_resolver(mut self, resolver: Arc<dyn EmojiResolver>) -> Self {
        self.emoji = resolver;
        self
    }

    /// Set the URL directory emoji images are served from.
    #[must_use]
    pub fn with_emoji_path(mut self, path: impl Into<String>) -> Self {
        self.emoji_path = path.into();
        self
    }

    /// Enable or disable smart quotes, dashes and ellipses.
    #[must_use]
    pub fn with_smart_punctuation(mut self, enabled: bool) -> Self {
        self.smart_punctuation = enabled;
        self
    }

    /// Enable or disable linking of bare URLs and email addresses.
    ///
    /// `<http://…>` autolinks are always recognized.
    #[must_use]
    pub fn with_autolink(mut self, enabled: bool) -> Self {
        self.autolink = enabled;
        self
    }

    fn options(&self) -> Options {
        let mut options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
        if self.smart_punctuation {
            options |= Options::ENABLE_SMART_PUNCTUATION;
        }
        options
    }

    /// Render a markdown document.
    ///
    /// Every heading is written with `id="slugify(text)"` and recorded in the
    /// returned outline with the same raw text, so the ids in the body and
    /// any navigation built from the outline agree.
    pub fn render(mut self, source: &str) -> RenderResult {
        let parser = Parser::new_ext(source, self.options()).into_offset_iter();

        for (event, range) in parser {
            if self.heading.is_active() && !matches!(event, Event::End(TagEnd::Heading(_))) {
                self.heading.extend_span(&range);
            }
            if !matches!(event, Event::Text(_)) {
                self.flush_text();
            }
            self.process_event(event, source, source.get(range).unwrap_or_default());
        }
        self.flush_text();

        let warnings = self
            .processors
            .iter()
            .flat_map(|p| p.warnings())
            .cloned()
            .collect();

        RenderResult {
            html: self.output,
            outline: self.heading.take_outline(),
            warnings,
        }
    }

    /// Buffer that inline content currently goes to.
    fn sink(&mut self) -> &mut String {
        if let Some(link) = self.links.last_mut() {
            &mut link.content
        } else if let Some(buf) = self.heading.html_buffer() {
            buf
        } else {
            &mut self.output
        }
    }

    /// Push inline markup, skipping it inside image alt text.
    fn push_inline(&mut self, content: &str) {
        if !self.image.is_active() {
            self.sink().push_str(content);
        }
    }

    /// Handle one event; `written` is the source slice it was parsed from.
    fn process_event(&mut self, event: Event<'_>, source: &str, written: &str) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag, source),
            Event::Text(text) => self.pending_text.push(&text, written),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) => self.output.push_str(&html),
            Event::InlineHtml(html) => {
                self.track_raw_link(&html);
                self.push_inline(&html);
            }
            Event::SoftBreak => self.soft_break(),
            Event::HardBreak => {
                if !self.image.is_active() {
                    B::hard_break(self.sink());
                }
            }
            Event::Rule => B::horizontal_rule(&mut self.output),
            Event::TaskListMarker(_)
            | Event::FootnoteReference(_)
            | Event::InlineMath(_)
            | Event::DisplayMath(_) => {
                // Not supported
            }
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                if !self.code.is_active() {
                    self.output.push_str("<p>");
                }
            }
            Tag::Heading { level, .. } => {
                // Opening tag is written in end_tag once the id is known.
                self.heading.start_heading(heading_level_to_num(level));
            }
            Tag::BlockQuote(_) => {
                B::blockquote_start(&mut self.output);
            }
            Tag::CodeBlock(kind) => {
                let (lang, attrs) = match kind {
                    CodeBlockKind::Fenced(ref info) if !info.is_empty() => {
                        let (lang, attrs) = parse_fence_info(info);
                        (if lang.is_empty() { None } else { Some(lang) }, attrs)
                    }
                    _ => (None, HashMap::new()),
                };
                self.pending_attrs = attrs;
                self.code.start(lang);
            }
            Tag::List(start) => match start {
                Some(1) => self.output.push_str("<ol>"),
                Some(n) => write!(self.output, r#"<ol start="{n}">"#).unwrap(),
                None => self.output.push_str("<ul>"),
            },
            Tag::Item => {
                self.output.push_str("<li>");
            }
            Tag::FootnoteDefinition(_)
            | Tag::HtmlBlock
            | Tag::MetadataBlock(_)
            | Tag::DefinitionList
            | Tag::DefinitionListTitle
            | Tag::DefinitionListDefinition => {}
            Tag::Table(alignments) => {
                self.table.start(alignments);
                self.output.push_str("<table>");
            }
            Tag::TableHead => {
                self.table.start_head();
                self.output.push_str("<thead><tr>");
            }
            Tag::TableRow => {
                self.table.start_row();
                self.output.push_str("<tr>");
            }
            Tag::TableCell => {
                let align = self.table.current_alignment_style();
                let tag = if self.table.is_in_head() { "th" } else { "td" };
                write!(self.output, "<{tag}{align}>").unwrap();
            }
            Tag::Emphasis => self.push_inline("<em>"),
            Tag::Strong => self.push_inline("<strong>"),
            Tag::Strikethrough => self.push_inline("<del>"),
            Tag::Link {
                link_type,
                dest_url,
                title,
                ..
            } => {
                let target = match link_type {
                    LinkType::Autolink => LinkTarget::Auto {
                        url: dest_url.to_string(),
                        kind: AutolinkKind::Url,
                    },
                    LinkType::Email => LinkTarget::Auto {
                        url: dest_url.to_string(),
                        kind: AutolinkKind::Email,
                    },
                    _ => LinkTarget::Explicit {
                        url: dest_url.to_string(),
                        title: title.to_string(),
                    },
                };
                self.links.push(LinkState {
                    target,
                    content: String::new(),
                });
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                // Start collecting alt text; image will be rendered in end_tag
                self.image.start();
                self.pending_image = Some((dest_url.to_string(), title.to_string()));
            }
            Tag::Superscript => self.push_inline("<sup>"),
            Tag::Subscript => self.push_inline("<sub>"),
        }
    }

    fn end_tag(&mut self, tag: TagEnd, source: &str) {
        match tag {
            TagEnd::Paragraph => {
                if !self.code.is_active() {
                    self.output.push_str("</p>");
                }
            }
            TagEnd::Heading(_level) => {
                if let Some((level, id, html)) = self.heading.complete_heading(source) {
                    write!(self.output, r#"<h{level} id="{id}">{html}</h{level}>"#).unwrap();
                }
            }
            TagEnd::BlockQuote(_) => {
                B::blockquote_end(&mut self.output);
            }
            TagEnd::CodeBlock => self.end_code_block(),
            TagEnd::List(ordered) => {
                self.output
                    .push_str(if ordered { "</ol>" } else { "</ul>" });
            }
            TagEnd::Item => {
                self.output.push_str("</li>");
            }
            TagEnd::FootnoteDefinition
            | TagEnd::HtmlBlock
            | TagEnd::MetadataBlock(_)
            | TagEnd::DefinitionList
            | TagEnd::DefinitionListTitle
            | TagEnd::DefinitionListDefinition => {}
            TagEnd::Image => {
                // Render image with collected alt text
                let alt = self.image.end();
                if let Some((src, title)) = self.pending_image.take() {
                    B::image(&src, &alt, &title, self.sink());
                }
            }
            TagEnd::Link => {
                if let Some(LinkState { target, content }) = self.links.pop() {
                    match target {
                        LinkTarget::Explicit { url, title } => {
                            B::link(&url, &title, &content, self.sink());
                        }
                        LinkTarget::Auto { url, kind } => B::autolink(&url, kind, self.sink()),
                    }
                }
            }
            TagEnd::Table => {
                self.output.push_str("</tbody></table>");
            }
            TagEnd::TableHead => {
                self.output.push_str("</tr></thead><tbody>");
                self.table.end_head();
            }
            TagEnd::TableRow => {
                self.output.push_str("</tr>");
            }
            TagEnd::TableCell => {
                self.output.push_str(if self.table.is_in_head() {
                    "</th>"
                } else {
                    "</td>"
                });
                self.table.next_cell();
            }
            TagEnd::Emphasis => self.push_inline("</em>"),
            TagEnd::Strong => self.push_inline("</strong>"),
            TagEnd::Strikethrough => self.push_inline("</del>"),
            TagEnd::Superscript => self.push_inline("</sup>"),
            TagEnd::Subscript => self.push_inline("</sub>"),
        }
    }

    fn end_code_block(&mut self) {
        let (lang, content) = self.code.end();
        let attrs = std::mem::take(&mut self.pending_attrs);
        let index = self.code_block_index;
        self.code_block_index += 1;

        // Try processors in order, fall back to plain code block rendering
        let processed = lang.as_ref().is_some_and(|lang_str| {
            self.processors.iter_mut().any(|processor| {
                match processor.process(lang_str, &attrs, &content, index) {
                    ProcessResult::Inline(html) => {
                        self.output.push_str(&html);
                        true
                    }
                    ProcessResult::PassThrough => false,
                }
            })
        });

        if !processed {
            B::code_block(lang.as_deref(), &content, &mut self.output);
        }
    }

    /// Write buffered text to wherever it belongs.
    ///
    /// Text is buffered because the parser may split a single run (for
    /// instance around smart quotes) and shortcodes or URLs must be matched
    /// against the whole run.
    fn flush_text(&mut self) {
        if self.pending_text.is_empty() {
            return;
        }
        let run = std::mem::take(&mut self.pending_text);

        if self.code.is_active() {
            self.code.push_str(run.text());
        } else if self.image.is_active() {
            self.image.push_str(run.text());
        } else {
            let mut html = String::with_capacity(run.text().len());
            self.render_text(&run, &mut html);
            self.sink().push_str(&html);
        }
    }

    /// Render a text run: bare links (outside existing links), then emoji.
    ///
    /// Bare links are found in the run as written, so their hrefs and text
    /// keep the source punctuation.
    fn render_text(&self, run: &TextRun, out: &mut String) {
        let emoji = self.emoji.as_ref();

        if !self.autolink || !self.links.is_empty() || self.raw_links > 0 {
            push_with_emoji::<B>(run.text(), emoji, &self.emoji_path, out);
            return;
        }

        let written = run.as_written();
        let text = written.as_str();
        let mut copied = 0;
        for link in find_bare_links(text) {
            let before = written.smartened(copied..link.range.start);
            push_with_emoji::<B>(&before, emoji, &self.emoji_path, out);
            push_bare_link::<B>(&text[link.range.clone()], link.kind, out);
            copied = link.range.end;
        }
        let rest = written.smartened(copied..text.len());
        push_with_emoji::<B>(&rest, emoji, &self.emoji_path, out);
    }

    /// Follow `<a …>` and `</a>` tags in inline HTML.
    fn track_raw_link(&mut self, html: &str) {
        let tag = html.as_bytes();
        let is_anchor = |name_start: usize| {
            tag.get(name_start)
                .is_some_and(|b| b.eq_ignore_ascii_case(&b'a'))
                && tag
                    .get(name_start + 1)
                    .is_none_or(|b| b.is_ascii_whitespace() || matches!(*b, b'>' | b'/'))
        };

        if tag.starts_with(b"</") && is_anchor(2) {
            self.raw_links = self.raw_links.saturating_sub(1);
        } else if tag.starts_with(b"<") && is_anchor(1) && !html.ends_with("/>") {
            self.raw_links += 1;
        }
    }

    fn inline_code(&mut self, code: &str) {
        if self.image.is_active() {
            self.image.push_str(code);
        } else {
            let html = format!("<code>{}</code>", escape_html(code));
            self.sink().push_str(&html);
        }
    }

    fn soft_break(&mut self) {
        if self.image.is_active() {
            self.image.push_str(" ");
        } else {
            self.sink().push('\n');
        }
    }
}

impl<B: RenderBackend> Default for MarkdownRenderer<B> {
    fn default() -> Self {
        Self::new()
    }
}

/// Write a bare link found in text. `www.` addresses get an `http://` href
/// and go through the explicit link policy.
fn push_bare_link<B: RenderBackend>(text: &str, kind: AutolinkKind, out: &mut String) {
    if kind == AutolinkKind::Url && is_www(text) {
        B::link(&format!("http://{text}"), "", &escape_html(text), out);
    } else {
        B::autolink(text, kind, out);
    }
}
