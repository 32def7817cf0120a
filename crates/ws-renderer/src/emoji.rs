//! Emoji shortcode substitution.
//!
//! Text content containing `:name:` tokens is rewritten so that every
//! shortcode the [`EmojiResolver`] recognizes becomes an inline `<img>`
//! pointing at the emoji image directory. Unknown shortcodes are left as
//! they are.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::backend::RenderBackend;
use crate::state::escape_html;

/// URL directory emoji images are served from.
pub const DEFAULT_EMOJI_PATH: &str = "/images/emoji";

static SHORTCODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":([A-Za-z0-9_+\-]+):").unwrap());

/// Resolves emoji shortcode names to image filenames.
///
/// Filenames are relative to the emoji image directory, e.g.
/// `unicode/1f604.png` for `smile`.
pub trait EmojiResolver: Send + Sync {
    /// Image filename for `name`, or `None` if the shortcode is unknown.
    fn image_filename(&self, name: &str) -> Option<Cow<'_, str>>;
}

/// Resolver following the gemoji image layout.
///
/// Custom emoji (e.g. `shipit`) are looked up first and map to their
/// configured filename. Everything else is resolved against the Unicode
/// emoji database and named after its codepoints.
#[derive(Clone, Debug, Default)]
pub struct Gemoji {
    custom: HashMap<String, String>,
}

impl Gemoji {
    /// Create a resolver with no custom emoji.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a custom emoji image.
    #[must_use]
    pub fn with_custom(mut self, name: impl Into<String>, filename: impl Into<String>) -> Self {
        self.custom.insert(name.into(), filename.into());
        self
    }

    /// Register many custom emoji images at once.
    #[must_use]
    pub fn with_custom_table(mut self, table: HashMap<String, String>) -> Self {
        self.custom.extend(table);
        self
    }
}

impl EmojiResolver for Gemoji {
    fn image_filename(&self, name: &str) -> Option<Cow<'_, str>> {
        if let Some(filename) = self.custom.get(name) {
            return Some(Cow::Borrowed(filename));
        }
        emojis::get_by_shortcode(name).map(|emoji| Cow::Owned(unicode_filename(emoji.as_str())))
    }
}

/// Image filename for a Unicode emoji: `unicode/<codepoints>.png`.
///
/// Codepoints are lowercase hex, at least four digits, joined with `-`.
/// Variation selector 16 (`U+FE0F`) is dropped.
///
/// ```
/// use ws_renderer::unicode_filename;
///
/// assert_eq!(unicode_filename("😄"), "unicode/1f604.png");
/// assert_eq!(unicode_filename("❤️"), "unicode/2764.png");
/// ```
#[must_use]
pub fn unicode_filename(emoji: &str) -> String {
    let hex: Vec<String> = emoji
        .chars()
        .filter(|c| *c != '\u{fe0f}')
        .map(|c| format!("{:04x}", u32::from(c)))
        .collect();
    format!("unicode/{}.png", hex.join("-"))
}

/// Image URL for `filename` inside the emoji directory `path`.
#[must_use]
pub fn emoji_src(path: &str, filename: &str) -> String {
    format!("{}/{filename}", path.trim_end_matches('/'))
}

/// Write `text` to `out` as escaped HTML with known shortcodes replaced by
/// emoji images.
///
/// When a `:name:` candidate is unknown, scanning resumes at its closing
/// colon so that `:x:smile:` still yields the `smile` image.
pub(crate) fn push_with_emoji<B: RenderBackend>(
    text: &str,
    resolver: &dyn EmojiResolver,
    path: &str,
    out: &mut String,
) {
    let mut written = 0;
    let mut search = 0;

    while let Some(caps) = SHORTCODE_RE.captures_at(text, search) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            break;
        };

        match resolver.image_filename(name.as_str()) {
            Some(filename) => {
                out.push_str(&escape_html(&text[written..whole.start()]));
                B::emoji(name.as_str(), &emoji_src(path, &filename), out);
                written = whole.end();
                search = whole.end();
            }
            // Closing colon may open the next shortcode.
            None => search = whole.end() - 1,
        }
    }

    out.push_str(&escape_html(&text[written..]));
}
