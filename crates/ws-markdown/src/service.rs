//! Configured rendering of workshop pages.

use std::collections::HashSet;
use std::sync::{Arc, LazyLock, Mutex, PoisonError};

use ws_config::Config;
use ws_highlight::SyntaxHighlighter;
use ws_renderer::{
    EmojiResolver, Gemoji, HtmlBackend, MarkdownRenderer, Outline, RenderResult, sidebar_html,
};

/// Body, sidebar and outline of one workshop page.
#[derive(Clone, Debug)]
pub struct RenderedPage {
    /// Document body HTML.
    pub body: String,
    /// Scroll-spy navigation fragment.
    pub sidebar: String,
    /// Every heading of the page, in order.
    pub outline: Outline,
    /// Warnings reported while rendering code blocks.
    pub warnings: Vec<String>,
}

/// Highlight class prefixes handed out so far.
static CLASS_PREFIXES: LazyLock<Mutex<HashSet<&'static str>>> =
    LazyLock::new(|| Mutex::new(HashSet::new()));

/// `'static` copy of `prefix`, allocated once per distinct prefix.
fn intern_class_prefix(prefix: &str) -> &'static str {
    if prefix.is_empty() {
        return "";
    }
    let mut prefixes = CLASS_PREFIXES
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    if let Some(interned) = prefixes.get(prefix) {
        return *interned;
    }
    let interned: &'static str = prefix.to_owned().leak();
    prefixes.insert(interned);
    interned
}

/// Renders workshop markdown with the configured policies.
///
/// The service holds only immutable settings. Every call builds its own
/// renderer, so one service can be shared across threads and documents.
///
/// # Example
///
/// ```
/// use ws_markdown::MarkdownService;
///
/// let service = MarkdownService::default();
/// let page = service.render_page("## Setup\n\nRun `make`.");
///
/// assert_eq!(page.body, r#"<h2 id="setup">Setup</h2><p>Run <code>make</code>.</p>"#);
/// assert!(page.sidebar.contains(r##"<a href="#setup">Setup</a>"##));
/// ```
pub struct MarkdownService {
    smart_punctuation: bool,
    autolink: bool,
    emoji_path: String,
    emoji: Arc<dyn EmojiResolver>,
    /// Class prefix when highlighting is enabled.
    highlight: Option<&'static str>,
}

impl MarkdownService {
    /// Create a service from configuration.
    ///
    /// Each distinct `highlight.class_prefix` is kept for the life of the
    /// process, however many services use it.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let emoji = Gemoji::new().with_custom_table(config.emoji.custom.clone());

        let highlight = config
            .highlight
            .enabled
            .then(|| intern_class_prefix(&config.highlight.class_prefix));

        Self {
            smart_punctuation: config.markdown.smart_punctuation,
            autolink: config.markdown.autolink,
            emoji_path: config.emoji.path.clone(),
            emoji: Arc::new(emoji),
            highlight,
        }
    }

    /// Replace the emoji resolver.
    #[must_use]
    pub fn with_emoji_resolver(mut self, resolver: Arc<dyn EmojiResolver>) -> Self {
        self.emoji = resolver;
        self
    }

    /// Fresh renderer carrying the configured policies.
    fn renderer(&self) -> MarkdownRenderer<HtmlBackend> {
        let renderer = MarkdownRenderer::<HtmlBackend>::new()
            .with_smart_punctuation(self.smart_punctuation)
            .with_autolink(self.autolink)
            .with_emoji_path(self.emoji_path.as_str())
            .with_emoji_resolver(Arc::clone(&self.emoji));

        match self.highlight {
            Some(prefix) => {
                renderer.with_processor(SyntaxHighlighter::new().with_class_prefix(prefix))
            }
            None => renderer,
        }
    }

    fn render_markdown(&self, text: &str) -> RenderResult {
        let result = self.renderer().render(text);

        tracing::debug!(
            bytes = text.len(),
            headings = result.outline.len(),
            "Rendered markdown"
        );
        for warning in &result.warnings {
            tracing::warn!(%warning, "Code block rendering warning");
        }

        result
    }

    /// Render body and sidebar from a single pass.
    #[must_use]
    pub fn render_page(&self, text: &str) -> RenderedPage {
        let RenderResult {
            html,
            outline,
            warnings,
        } = self.render_markdown(text);

        RenderedPage {
            body: html,
            sidebar: sidebar_html(&outline),
            outline,
            warnings,
        }
    }

    /// Render the document body.
    #[must_use]
    pub fn render_body(&self, text: &str) -> String {
        self.render_markdown(text).html
    }

    /// Render the document body. Same as [`render_body`](Self::render_body).
    #[must_use]
    pub fn render(&self, text: &str) -> String {
        self.render_body(text)
    }

    /// Render the scroll-spy sidebar for the document's headings.
    #[must_use]
    pub fn render_sidebar(&self, text: &str) -> String {
        sidebar_html(&self.render_markdown(text).outline)
    }
}

impl Default for MarkdownService {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}
