//! Code block processor for syntax highlighting.

use std::collections::HashMap;

use syntect::html::ClassStyle;
use ws_renderer::{CodeBlockProcessor, ProcessResult, escape_html};

use crate::highlight::highlight_html;

/// Code block processor that highlights fenced code by language tag.
///
/// Each token is wrapped in `<span>`s carrying its scope names as CSS
/// classes, optionally prefixed (see [`with_class_prefix`](Self::with_class_prefix)).
/// Failures are reported through [`warnings`](CodeBlockProcessor::warnings)
/// and the block is passed on unhighlighted.
pub struct SyntaxHighlighter {
    class_style: ClassStyle,
    warnings: Vec<String>,
}

impl SyntaxHighlighter {
    /// Create a highlighter emitting unprefixed classes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            class_style: ClassStyle::Spaced,
            warnings: Vec::new(),
        }
    }

    /// Prefix every emitted class name, e.g. `hl-` gives `hl-keyword`.
    ///
    /// An empty prefix is the same as none.
    #[must_use]
    pub fn with_class_prefix(mut self, prefix: &'static str) -> Self {
        self.class_style = if prefix.is_empty() {
            ClassStyle::Spaced
        } else {
            ClassStyle::SpacedPrefixed { prefix }
        };
        self
    }
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeBlockProcessor for SyntaxHighlighter {
    fn process(
        &mut self,
        language: &str,
        _attrs: &HashMap<String, String>,
        source: &str,
        index: usize,
    ) -> ProcessResult {
        match highlight_html(language, source, self.class_style) {
            Ok(Some(html)) => ProcessResult::Inline(format!(
                r#"<pre class="highlight {}"><code>{html}</code></pre>"#,
                escape_html(language)
            )),
            Ok(None) => ProcessResult::PassThrough,
            Err(e) => {
                tracing::warn!(language, index, error = %e, "Failed to highlight code block");
                self.warnings.push(format!(
                    "code block {index}: failed to highlight {language}: {e}"
                ));
                ProcessResult::PassThrough
            }
        }
    }

    fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ws_renderer::{HtmlBackend, MarkdownRenderer};

    fn process(highlighter: &mut SyntaxHighlighter, language: &str, source: &str) -> ProcessResult {
        highlighter.process(language, &HashMap::new(), source, 0)
    }

    #[test]
    fn test_known_language_highlighted() {
        let mut highlighter = SyntaxHighlighter::new();
        let ProcessResult::Inline(html) = process(&mut highlighter, "rust", "let x = 1;\n") else {
            panic!("expected highlighted output");
        };
        assert!(html.starts_with(r#"<pre class="highlight rust"><code><span class="source rust">"#));
        assert!(html.ends_with("</code></pre>"));
        assert!(highlighter.warnings().is_empty());
    }

    #[test]
    fn test_unknown_language_passes_through() {
        let mut highlighter = SyntaxHighlighter::new();
        assert_eq!(
            process(&mut highlighter, "not-a-real-language", "x\n"),
            ProcessResult::PassThrough
        );
        assert!(highlighter.warnings().is_empty());
    }

    #[test]
    fn test_class_prefix() {
        let mut highlighter = SyntaxHighlighter::new().with_class_prefix("hl-");
        let ProcessResult::Inline(html) = process(&mut highlighter, "rust", "fn f() {}\n") else {
            panic!("expected highlighted output");
        };
        assert!(html.contains(r#"class="hl-source hl-rust""#));
    }

    #[test]
    fn test_empty_class_prefix_is_unprefixed() {
        let mut highlighter = SyntaxHighlighter::new().with_class_prefix("");
        let ProcessResult::Inline(html) = process(&mut highlighter, "rust", "fn f() {}\n") else {
            panic!("expected highlighted output");
        };
        assert!(html.contains(r#"class="source rust""#));
    }

    #[test]
    fn test_language_class_escaped() {
        // Extension lookup is exact, so a tag needing escaping never matches.
        let mut highlighter = SyntaxHighlighter::new();
        assert_eq!(
            process(&mut highlighter, r#"rust"onload"#, "x\n"),
            ProcessResult::PassThrough
        );
    }

    #[test]
    fn test_in_renderer() {
        let markdown = "```python\nprint(1)\n```\n\n```nope\nplain <b>\n```";
        let result = MarkdownRenderer::<HtmlBackend>::new()
            .with_processor(SyntaxHighlighter::new())
            .render(markdown);

        assert!(result.html.contains(r#"<pre class="highlight python"><code>"#));
        assert!(
            result
                .html
                .contains(r#"<pre><code class="language-nope">plain &lt;b&gt;"#)
        );
        assert!(result.warnings.is_empty());
    }
}
