//! Class-based HTML highlighting on top of the default syntect syntaxes.

use std::sync::LazyLock;

use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);

/// Whether `language` names a syntax the highlighter knows.
///
/// Matches file extensions and syntax names case-insensitively, so `rs`,
/// `rust` and `Rust` all resolve.
#[must_use]
pub fn is_supported(language: &str) -> bool {
    SYNTAX_SET.find_syntax_by_token(language).is_some()
}

/// Highlight `code` as `language`, returning the classed token spans.
///
/// Returns `Ok(None)` for unknown languages. The result is the inner HTML of
/// a `<code>` element; text is escaped.
pub fn highlight_html(
    language: &str,
    code: &str,
    style: ClassStyle,
) -> Result<Option<String>, syntect::Error> {
    let Some(syntax) = SYNTAX_SET.find_syntax_by_token(language) else {
        return Ok(None);
    };

    let mut generator = ClassedHTMLGenerator::new_with_class_style(syntax, &SYNTAX_SET, style);
    for line in LinesWithEndings::from(code) {
        generator.parse_html_for_line_which_includes_newline(line)?;
    }

    Ok(Some(generator.finalize()))
}
