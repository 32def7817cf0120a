//! Scroll-spy sidebar built from a heading outline.
//!
//! Level 2 headings become top-level entries and every run of level 3
//! headings directly below one becomes its nested list. Headings of any
//! other level are skipped without affecting the structure around them.
//!
//! ```
//! use ws_renderer::{HtmlBackend, MarkdownRenderer, sidebar_html};
//!
//! let result = MarkdownRenderer::<HtmlBackend>::new()
//!     .render("## Part I: *Setup*\n\n### 1) Signing Up\n");
//!
//! assert_eq!(
//!     sidebar_html(&result.outline),
//!     r##"<nav class="workshop-sidebar hidden-print hidden-xs hidden-sm affix">
//!   <ul id="sidebar" class="nav nav-stacked fixed">
//!     <li>
//!       <a href="#part-i-setup">Part I: <em>Setup</em></a>
//!       <ul class="nav nav-stacked">
//!         <li><a href="#1-signing-up">1) Signing Up</a></li>
//!       </ul>
//!     </li>
//!   </ul>
//! </nav>"##
//! );
//! ```

use std::fmt::Write;

use crate::outline::{Heading, Outline};
use crate::slug::slugify;

/// Heading level of top-level sidebar entries.
pub const PARENT_LEVEL: u8 = 2;

/// Heading level of nested sidebar entries.
pub const CHILD_LEVEL: u8 = 3;

const NAV_OPEN: &str = concat!(
    r#"<nav class="workshop-sidebar hidden-print hidden-xs hidden-sm affix">"#,
    "\n",
    r#"  <ul id="sidebar" class="nav nav-stacked fixed">"#,
    "\n",
);

const NAV_CLOSE: &str = "  </ul>\n</nav>";

/// Build the sidebar fragment for `headings`.
///
/// `render_label` produces the inline HTML shown for a heading; it is trimmed
/// and embedded **unescaped**, so it must be trusted markup. `slug` turns the
/// heading's raw text into the `href` fragment and must match the ids
/// written on the headings in the body.
pub fn build_sidebar<L, S>(headings: &[Heading], render_label: L, slug: S) -> String
where
    L: Fn(&Heading) -> String,
    S: Fn(&str) -> String,
{
    let nav_link = |heading: &Heading| {
        format!(
            r##"<a href="#{}">{}</a>"##,
            slug(&heading.text),
            render_label(heading).trim()
        )
    };

    let mut html = String::from(NAV_OPEN);
    let mut in_section = false;
    let mut section_has_children = false;

    for heading in headings {
        match (in_section, heading.level) {
            (false, PARENT_LEVEL) => {
                writeln!(html, "    <li>\n      {}", nav_link(heading)).unwrap();
                in_section = true;
            }
            (true, CHILD_LEVEL) => {
                if !section_has_children {
                    html.push_str("      <ul class=\"nav nav-stacked\">\n");
                    section_has_children = true;
                }
                writeln!(html, "        <li>{}</li>", nav_link(heading)).unwrap();
            }
            (true, PARENT_LEVEL) => {
                if section_has_children {
                    html.push_str("      </ul>\n");
                    section_has_children = false;
                }
                writeln!(html, "    </li>\n    <li>\n      {}", nav_link(heading)).unwrap();
            }
            _ => {}
        }
    }

    if in_section {
        if section_has_children {
            html.push_str("      </ul>\n");
        }
        html.push_str("    </li>\n");
    }

    html.push_str(NAV_CLOSE);
    html
}

/// Sidebar for a rendered outline, labelled with each heading's inline HTML.
#[must_use]
pub fn sidebar_html(outline: &Outline) -> String {
    build_sidebar(outline.headings(), |h| h.html.clone(), slugify)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn outline(entries: &[(u8, &str)]) -> Vec<Heading> {
        entries
            .iter()
            .map(|&(level, text)| Heading {
                level,
                text: text.to_owned(),
                html: text.to_owned(),
            })
            .collect()
    }

    fn build(entries: &[(u8, &str)]) -> String {
        build_sidebar(&outline(entries), |h| h.html.clone(), slugify)
    }

    #[test]
    fn test_empty_outline_is_bare_shell() {
        assert_eq!(
            build(&[]),
            concat!(
                "<nav class=\"workshop-sidebar hidden-print hidden-xs hidden-sm affix\">\n",
                "  <ul id=\"sidebar\" class=\"nav nav-stacked fixed\">\n",
                "  </ul>\n",
                "</nav>",
            )
        );
    }

    #[test]
    fn test_children_nest_under_parent() {
        assert_eq!(
            build(&[(2, "A"), (3, "B"), (3, "C"), (2, "D")]),
            concat!(
                "<nav class=\"workshop-sidebar hidden-print hidden-xs hidden-sm affix\">\n",
                "  <ul id=\"sidebar\" class=\"nav nav-stacked fixed\">\n",
                "    <li>\n",
                "      <a href=\"#a\">A</a>\n",
                "      <ul class=\"nav nav-stacked\">\n",
                "        <li><a href=\"#b\">B</a></li>\n",
                "        <li><a href=\"#c\">C</a></li>\n",
                "      </ul>\n",
                "    </li>\n",
                "    <li>\n",
                "      <a href=\"#d\">D</a>\n",
                "    </li>\n",
                "  </ul>\n",
                "</nav>",
            )
        );
    }

    #[test]
    fn test_other_levels_ignored() {
        let with_noise = build(&[(1, "X"), (2, "A"), (4, "Y"), (2, "D")]);
        assert_eq!(with_noise, build(&[(2, "A"), (2, "D")]));
        assert!(!with_noise.contains("#x"));
        assert!(!with_noise.contains("#y"));
    }

    #[test]
    fn test_child_before_any_parent_ignored() {
        assert_eq!(build(&[(3, "Orphan"), (2, "A")]), build(&[(2, "A")]));
    }

    #[test]
    fn test_deeper_level_does_not_break_child_run() {
        assert_eq!(
            build(&[(2, "A"), (3, "B"), (4, "Deep"), (3, "C")]),
            build(&[(2, "A"), (3, "B"), (3, "C")])
        );
    }

    #[test]
    fn test_trailing_children_closed() {
        let html = build(&[(2, "A"), (3, "B")]);
        assert!(html.ends_with(
            "        <li><a href=\"#b\">B</a></li>\n      </ul>\n    </li>\n  </ul>\n</nav>"
        ));
    }

    #[test]
    fn test_one_nested_list_per_child_run() {
        let html = build(&[(2, "A"), (3, "B"), (2, "C"), (3, "D"), (3, "E")]);
        assert_eq!(html.matches("<ul class=\"nav nav-stacked\">").count(), 2);
        assert_eq!(html.matches("    <li>\n").count(), 2);
    }

    #[test]
    fn test_label_trimmed_and_unescaped() {
        let headings = outline(&[(2, "Setup")]);
        let html = build_sidebar(&headings, |_| "  <em>Setup</em>\n".to_owned(), slugify);
        assert!(html.contains(r##"<a href="#setup"><em>Setup</em></a>"##));
    }

    #[test]
    fn test_custom_slug() {
        let headings = outline(&[(2, "Setup")]);
        let html = build_sidebar(&headings, |h| h.html.clone(), |text| format!("s-{text}"));
        assert!(html.contains(r##"href="#s-Setup""##));
    }

    #[test]
    fn test_sidebar_html_uses_rendered_labels() {
        let outline: Outline = vec![Heading {
            level: 2,
            text: "Install `npm`".to_owned(),
            html: "Install <code>npm</code>".to_owned(),
        }]
        .into_iter()
        .collect();

        assert!(
            sidebar_html(&outline)
                .contains(r##"<a href="#install-npm">Install <code>npm</code></a>"##)
        );
    }
}
