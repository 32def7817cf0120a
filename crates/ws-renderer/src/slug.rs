//! Heading id derivation.

/// Convert heading text to an id usable as a URL fragment.
///
/// Drops every character that is not an ASCII letter, digit or space,
/// lowercases the rest and joins the space-separated segments with `-`.
/// The split is on the single character `' '`, so runs of spaces keep their
/// empty segments:
///
/// ```
/// use ws_renderer::slugify;
///
/// assert_eq!(slugify("Personal Website"), "personal-website");
/// assert_eq!(slugify("1) Testing McTestFace"), "1-testing-mctestface");
/// assert_eq!(slugify("Prophet   orpheus"), "prophet---orpheus");
/// ```
///
/// Ids are not deduplicated. Headings that normalize to the same string
/// share an id, and text made only of non-ASCII characters yields `""`.
#[must_use]
pub fn slugify(text: &str) -> String {
    let kept: String = text
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .map(|c| c.to_ascii_lowercase())
        .collect();

    kept.split(' ').collect::<Vec<_>>().join("-")
}
