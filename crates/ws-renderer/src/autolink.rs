//! Bare URL and email detection for text content.
//!
//! CommonMark only links `<http://…>` style autolinks. Workshop content also
//! relies on plain `https://…`, `www.…` and `someone@example.com` text being
//! linked, which is what this module finds.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

static BARE_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?P<url>\b(?:https?://|ftp://|www\.)[^\s<>]+)|(?P<email>\b[a-z0-9._%+\-]+@[a-z0-9\-]+(?:\.[a-z0-9\-]+)+)",
    )
    .unwrap()
});

/// What an autolink points at.
///
/// The workshop link policy renders both kinds identically; the kind is
/// carried so that the decision stays visible at the call site.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AutolinkKind {
    /// Web address (`http://`, `https://`, `ftp://` or `www.`).
    Url,
    /// Email address.
    Email,
}

/// A bare link found in a text run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct BareLink {
    /// Byte range of the link text within the searched string.
    pub range: Range<usize>,
    /// Link kind.
    pub kind: AutolinkKind,
}

/// Find bare URLs and email addresses in `text`, in order.
pub(crate) fn find_bare_links(text: &str) -> Vec<BareLink> {
    let mut links = Vec::new();

    for caps in BARE_LINK_RE.captures_iter(text) {
        if let Some(url) = caps.name("url") {
            let trimmed = trim_url_end(url.as_str());
            if has_target(trimmed) {
                links.push(BareLink {
                    range: url.start()..url.start() + trimmed.len(),
                    kind: AutolinkKind::Url,
                });
            }
        } else if let Some(email) = caps.name("email") {
            links.push(BareLink {
                range: email.range(),
                kind: AutolinkKind::Email,
            });
        }
    }

    links
}

/// Strip trailing punctuation that belongs to the sentence, not the URL.
///
/// A closing parenthesis is only kept while it balances an opening one
/// inside the URL, so `(see https://example.com/a_(b))` keeps `a_(b)`.
fn trim_url_end(url: &str) -> &str {
    let mut end = url.len();

    while let Some(last) = url[..end].chars().next_back() {
        let candidate = &url[..end];
        let trim = match last {
            '.' | ',' | ':' | ';' | '!' | '?' | '\'' | '"' | '*' | '_' | '~' | '\u{2019}'
            | '\u{201d}' => true,
            ')' => candidate.matches('(').count() < candidate.matches(')').count(),
            _ => false,
        };
        if !trim {
            break;
        }
        end -= last.len_utf8();
    }

    &url[..end]
}

/// Whether a bare URL lacks a scheme and starts with `www.`.
pub(crate) fn is_www(url: &str) -> bool {
    url.get(..4).is_some_and(|prefix| prefix.eq_ignore_ascii_case("www."))
}

/// Reject bare scheme or `www.` prefixes with nothing after them.
fn has_target(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    ["https://", "http://", "ftp://", "www."]
        .iter()
        .find(|prefix| lower.starts_with(*prefix))
        .is_some_and(|prefix| url.len() > prefix.len())
}
