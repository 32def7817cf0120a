//! Workshop markdown renderer with pluggable backends.
//!
//! This crate provides a generic [`MarkdownRenderer`] that turns workshop
//! markdown into an HTML body and, from the same pass, the heading
//! [`Outline`] that drives the scroll-spy sidebar.
//!
//! # Architecture
//!
//! The renderer uses a trait-based abstraction for the parts of the output
//! that are a matter of policy:
//! - [`HtmlBackend`]: external links open in a new tab, emoji shortcodes
//!   become images, unclaimed code blocks render as `<pre><code>`
//!
//! Shared functionality (tables, lists, inline formatting) is handled by the
//! generic renderer. Fenced code blocks can be claimed by a
//! [`CodeBlockProcessor`], e.g. a syntax highlighter.
//!
//! # Example
//!
//! ```
//! use ws_renderer::{HtmlBackend, MarkdownRenderer, sidebar_html};
//!
//! let markdown = "## Setup\n\nSee [the docs](https://hackclub.com) :smile:";
//! let result = MarkdownRenderer::<HtmlBackend>::new().render(markdown);
//!
//! assert!(result.html.starts_with(r#"<h2 id="setup">Setup</h2>"#));
//! assert!(sidebar_html(&result.outline).contains(r##"<a href="#setup">Setup</a>"##));
//! ```

mod autolink;
mod backend;
mod code_block;
mod emoji;
mod html;
mod outline;
mod renderer;
mod sidebar;
mod slug;
mod state;
mod text_run;
mod util;

pub use autolink::AutolinkKind;
pub use backend::RenderBackend;
pub use code_block::{CodeBlockProcessor, ProcessResult};
pub use emoji::{DEFAULT_EMOJI_PATH, EmojiResolver, Gemoji, emoji_src, unicode_filename};
pub use html::HtmlBackend;
pub use outline::{Heading, Outline};
pub use renderer::{MarkdownRenderer, RenderResult};
pub use sidebar::{CHILD_LEVEL, PARENT_LEVEL, build_sidebar, sidebar_html};
pub use slug::slugify;
pub use state::escape_html;
