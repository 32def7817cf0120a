//! Buffered text with the source of its smart punctuation.
//!
//! The parser emits every smart quote, dash and ellipsis as its own text
//! event. A [`TextRun`] joins those events back together and remembers which
//! pieces were substituted, so that the run can also be read as written.

use std::borrow::Cow;
use std::ops::Range;

/// Consecutive text events not yet written.
#[derive(Debug, Default)]
pub(crate) struct TextRun {
    text: String,
    smart: Vec<Substitution>,
}

/// Smart punctuation inside a run.
#[derive(Debug)]
struct Substitution {
    /// Byte range of the substituted characters within the run.
    range: Range<usize>,
    /// The characters as written in the source.
    written: String,
}

impl TextRun {
    /// Append a text event. `written` is the source slice it was parsed from.
    pub fn push(&mut self, text: &str, written: &str) {
        let start = self.text.len();
        self.text.push_str(text);
        if is_smart_substitution(text, written) {
            self.smart.push(Substitution {
                range: start..self.text.len(),
                written: written.to_owned(),
            });
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The run as rendered, with smart punctuation applied.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The run with every substitution reverted.
    pub fn as_written(&self) -> WrittenText<'_> {
        if self.smart.is_empty() {
            return WrittenText {
                run: self,
                text: Cow::Borrowed(&self.text),
                spans: Vec::new(),
            };
        }

        let mut text = String::with_capacity(self.text.len());
        let mut spans = Vec::with_capacity(self.smart.len());
        let mut copied = 0;

        for sub in &self.smart {
            text.push_str(&self.text[copied..sub.range.start]);
            let start = text.len();
            text.push_str(&sub.written);
            spans.push((start..text.len(), sub.range.clone()));
            copied = sub.range.end;
        }
        text.push_str(&self.text[copied..]);

        WrittenText {
            run: self,
            text: Cow::Owned(text),
            spans,
        }
    }
}

/// A [`TextRun`] as written in the source.
pub(crate) struct WrittenText<'a> {
    run: &'a TextRun,
    text: Cow<'a, str>,
    /// Substituted spans: range here, range in the run.
    spans: Vec<(Range<usize>, Range<usize>)>,
}

impl WrittenText<'_> {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The smartened form of `range`.
    ///
    /// Substitutions only partly inside `range` stay as written.
    pub fn smartened(&self, range: Range<usize>) -> Cow<'_, str> {
        let inside = |span: &&(Range<usize>, Range<usize>)| {
            span.0.start >= range.start && span.0.end <= range.end
        };
        if !self.spans.iter().any(|span| inside(&span)) {
            return Cow::Borrowed(&self.text[range.clone()]);
        }

        let mut out = String::with_capacity(range.len());
        let mut copied = range.start;
        for (written, smart) in self.spans.iter().filter(inside) {
            out.push_str(&self.text[copied..written.start]);
            out.push_str(&self.run.text[smart.clone()]);
            copied = written.end;
        }
        out.push_str(&self.text[copied..range.end]);
        Cow::Owned(out)
    }
}

fn is_smart_substitution(text: &str, written: &str) -> bool {
    text != written
        && !text.is_empty()
        && text.chars().all(|c| {
            matches!(
                c,
                '\u{2018}' | '\u{2019}' | '\u{201c}' | '\u{201d}' | '\u{2013}' | '\u{2014}' | '\u{2026}'
            )
        })
        && written.chars().all(|c| matches!(c, '\'' | '"' | '-' | '.'))
}
