//! Syntax highlighting for workshop code fences.
//!
//! [`SyntaxHighlighter`] implements [`ws_renderer::CodeBlockProcessor`]: fenced
//! code blocks whose language tag `syntect` recognizes are rendered as
//! `<pre class="highlight {lang}"><code>…</code></pre>` with CSS classes on
//! every token. Unknown languages are left to the renderer's plain
//! `<pre><code>` fallback.
//!
//! # Example
//!
//! ```
//! use ws_highlight::SyntaxHighlighter;
//! use ws_renderer::{HtmlBackend, MarkdownRenderer};
//!
//! let result = MarkdownRenderer::<HtmlBackend>::new()
//!     .with_processor(SyntaxHighlighter::new())
//!     .render("```rust\nfn main() {}\n```");
//!
//! assert!(result.html.starts_with(r#"<pre class="highlight rust"><code>"#));
//! ```

mod highlight;
mod processor;

pub use highlight::{highlight_html, is_supported};
pub use processor::SyntaxHighlighter;
pub use syntect::html::ClassStyle;
