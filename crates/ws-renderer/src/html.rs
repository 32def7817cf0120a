//! HTML backend implementing the workshop rendering policy.

use std::fmt::Write;

use crate::autolink::AutolinkKind;
use crate::backend::RenderBackend;
use crate::state::escape_html;

/// HTML render backend.
///
/// Produces HTML5 with:
/// - External (`http…`) links opening in a new tab with the referrer
///   stripped, other links navigating in place
/// - Every autolink opening in a new tab
/// - `<img class="emoji">` for emoji shortcodes
/// - `<pre><code>` for code blocks no processor handled
pub struct HtmlBackend;

impl RenderBackend for HtmlBackend {
    fn link(url: &str, title: &str, content: &str, out: &mut String) {
        if url.starts_with("http") {
            write!(
                out,
                r#"<a href="{}" title="{}" target="_blank" rel="noreferrer">{content}</a>"#,
                escape_html(url),
                escape_html(title)
            )
            .unwrap();
        } else {
            write!(
                out,
                r#"<a href="{}" title="{}">{content}</a>"#,
                escape_html(url),
                escape_html(title)
            )
            .unwrap();
        }
    }

    /// Email autolinks are rendered exactly like URL autolinks: no `mailto:`
    /// prefix is added and they open in a new tab as well.
    fn autolink(url: &str, _kind: AutolinkKind, out: &mut String) {
        let url = escape_html(url);
        write!(
            out,
            r#"<a href="{url}" target="_blank" rel="noreferrer">{url}</a>"#
        )
        .unwrap();
    }

    /// Writes a trusted `<img>` fragment. `src` must come from configuration,
    /// never from document text.
    fn emoji(name: &str, src: &str, out: &mut String) {
        write!(
            out,
            r#"<img src="{}" alt=":{}:" class="emoji">"#,
            escape_html(src),
            escape_html(name)
        )
        .unwrap();
    }

    fn code_block(lang: Option<&str>, content: &str, out: &mut String) {
        if let Some(lang) = lang {
            write!(
                out,
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                escape_html(lang),
                escape_html(content)
            )
            .unwrap();
        } else {
            write!(out, "<pre><code>{}</code></pre>", escape_html(content)).unwrap();
        }
    }

    fn blockquote_start(out: &mut String) {
        out.push_str("<blockquote>");
    }

    fn blockquote_end(out: &mut String) {
        out.push_str("</blockquote>");
    }

    fn image(src: &str, alt: &str, title: &str, out: &mut String) {
        let title_attr = if title.is_empty() {
            String::new()
        } else {
            format!(r#" title="{}""#, escape_html(title))
        };
        write!(
            out,
            r#"<img src="{}"{title_attr} alt="{}">"#,
            escape_html(src),
            escape_html(alt)
        )
        .unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_external_link() {
        let mut out = String::new();
        HtmlBackend::link("http://x", "", "t", &mut out);
        assert_eq!(
            out,
            r#"<a href="http://x" title="" target="_blank" rel="noreferrer">t</a>"#
        );
    }

    #[test]
    fn test_https_link_is_external() {
        let mut out = String::new();
        HtmlBackend::link("https://hackclub.com", "Hack Club", "site", &mut out);
        assert!(out.contains(r#"title="Hack Club""#));
        assert!(out.contains(r#"target="_blank""#));
    }

    #[test]
    fn test_local_link() {
        let mut out = String::new();
        HtmlBackend::link("/local", "", "t", &mut out);
        assert_eq!(out, r#"<a href="/local" title="">t</a>"#);
    }

    #[test]
    fn test_prefix_check_is_literal() {
        // Anything starting with "http" counts, even without a scheme separator.
        let mut out = String::new();
        HtmlBackend::link("httpdocs/index.html", "", "t", &mut out);
        assert!(out.contains(r#"rel="noreferrer""#));

        let mut out = String::new();
        HtmlBackend::link("HTTP://SHOUT", "", "t", &mut out);
        assert!(!out.contains("target"));
    }

    #[test]
    fn test_link_attributes_escaped() {
        let mut out = String::new();
        HtmlBackend::link("/a?b=1&c=2", r#"say "hi""#, "<em>x</em>", &mut out);
        assert_eq!(
            out,
            r#"<a href="/a?b=1&amp;c=2" title="say &quot;hi&quot;"><em>x</em></a>"#
        );
    }

    #[test]
    fn test_autolink_url_and_email_identical() {
        let mut url = String::new();
        HtmlBackend::autolink("http://x.com", AutolinkKind::Url, &mut url);
        assert_eq!(
            url,
            r#"<a href="http://x.com" target="_blank" rel="noreferrer">http://x.com</a>"#
        );

        let mut email = String::new();
        HtmlBackend::autolink("a@b.com", AutolinkKind::Email, &mut email);
        assert_eq!(
            email,
            r#"<a href="a@b.com" target="_blank" rel="noreferrer">a@b.com</a>"#
        );
    }

    #[test]
    fn test_emoji() {
        let mut out = String::new();
        HtmlBackend::emoji("tada", "/images/emoji/unicode/1f389.png", &mut out);
        assert_eq!(
            out,
            r#"<img src="/images/emoji/unicode/1f389.png" alt=":tada:" class="emoji">"#
        );
    }

    #[test]
    fn test_code_block_with_language() {
        let mut out = String::new();
        HtmlBackend::code_block(Some("rust"), "fn main() {}", &mut out);
        assert_eq!(
            out,
            r#"<pre><code class="language-rust">fn main() {}</code></pre>"#
        );
    }

    #[test]
    fn test_code_block_without_language() {
        let mut out = String::new();
        HtmlBackend::code_block(None, "plain <code>", &mut out);
        assert_eq!(out, "<pre><code>plain &lt;code&gt;</code></pre>");
    }

    #[test]
    fn test_blockquote() {
        let mut out = String::new();
        HtmlBackend::blockquote_start(&mut out);
        out.push_str("content");
        HtmlBackend::blockquote_end(&mut out);
        assert_eq!(out, "<blockquote>content</blockquote>");
    }

    #[test]
    fn test_image() {
        let mut out = String::new();
        HtmlBackend::image("image.png", "Alt text", "", &mut out);
        assert_eq!(out, r#"<img src="image.png" alt="Alt text">"#);
    }

    #[test]
    fn test_image_with_title() {
        let mut out = String::new();
        HtmlBackend::image("image.png", "Alt text", "Image title", &mut out);
        assert_eq!(
            out,
            r#"<img src="image.png" title="Image title" alt="Alt text">"#
        );
    }
}
