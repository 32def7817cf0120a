//! Heading outline collected during a render pass.

use crate::slug::slugify;

/// A heading encountered in a document.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Heading {
    /// Heading level (1-6).
    pub level: u8,
    /// Raw markdown of the heading content, without the `#` markers.
    pub text: String,
    /// Heading content rendered as inline HTML.
    pub html: String,
}

impl Heading {
    /// Anchor id of this heading, as written on the `<hN>` element.
    #[must_use]
    pub fn id(&self) -> String {
        slugify(&self.text)
    }
}

/// Headings of one document in document order.
///
/// Headings of every level are kept; consumers such as the sidebar decide
/// which levels they show.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Outline {
    headings: Vec<Heading>,
}

impl Outline {
    /// Append a heading.
    pub(crate) fn push(&mut self, heading: Heading) {
        self.headings.push(heading);
    }

    /// Headings in document order.
    #[must_use]
    pub fn headings(&self) -> &[Heading] {
        &self.headings
    }

    /// Number of headings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.headings.len()
    }

    /// Whether the document had no headings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headings.is_empty()
    }

    /// Iterate over headings in document order.
    pub fn iter(&self) -> std::slice::Iter<'_, Heading> {
        self.headings.iter()
    }
}

impl FromIterator<Heading> for Outline {
    fn from_iter<I: IntoIterator<Item = Heading>>(iter: I) -> Self {
        Self {
            headings: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Outline {
    type Item = &'a Heading;
    type IntoIter = std::slice::Iter<'a, Heading>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
