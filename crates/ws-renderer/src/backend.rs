//! Render backend trait for format-specific rendering.
//!
//! The renderer walks markdown events generically and hands the elements
//! whose markup is a matter of policy (links, autolinks, emoji, code blocks)
//! to the backend.

use crate::autolink::AutolinkKind;

/// Backend trait for format-specific rendering operations.
///
/// Implementations provide rendering for:
/// - Explicit links and autolinks (target and referrer policy)
/// - Emoji images
/// - Code blocks that no processor claimed
/// - Blockquotes and images
pub trait RenderBackend {
    /// Render an explicit `[content](url "title")` link.
    ///
    /// # Arguments
    ///
    /// * `url` - Link destination, unescaped
    /// * `title` - Link title, unescaped (may be empty)
    /// * `content` - Rendered inline HTML of the link text
    /// * `out` - Output buffer to write to
    fn link(url: &str, title: &str, content: &str, out: &mut String);

    /// Render an autolink.
    ///
    /// `kind` distinguishes web addresses from email addresses. Backends may
    /// render both the same way, but should do so deliberately.
    fn autolink(url: &str, kind: AutolinkKind, out: &mut String);

    /// Render an emoji image for a resolved shortcode.
    ///
    /// The output is inserted into the body as trusted HTML.
    ///
    /// # Arguments
    ///
    /// * `name` - Shortcode name without colons
    /// * `src` - Image URL
    /// * `out` - Output buffer to write to
    fn emoji(name: &str, src: &str, out: &mut String);

    /// Render a code block.
    ///
    /// # Arguments
    ///
    /// * `lang` - Optional language identifier (e.g., "rust", "python")
    /// * `content` - The code content
    /// * `out` - Output buffer to write to
    fn code_block(lang: Option<&str>, content: &str, out: &mut String);

    /// Render blockquote start tag.
    fn blockquote_start(out: &mut String);

    /// Render blockquote end tag.
    fn blockquote_end(out: &mut String);

    /// Render an image.
    fn image(src: &str, alt: &str, title: &str, out: &mut String);

    /// Render a hard break.
    fn hard_break(out: &mut String) {
        out.push_str("<br>");
    }

    /// Render a horizontal rule.
    fn horizontal_rule(out: &mut String) {
        out.push_str("<hr>");
    }
}
