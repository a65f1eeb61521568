//! Parser for Nu Html Checker result pages
//!
//! Each error is an `<li class="error">` holding an untagged `<p>` with the
//! message, a `<p class="location">` and usually a `<p class="extract">`:
//!
//! ```html
//! <li class="error">
//!   <p><strong>Error</strong>: <span>Element <a><code>bogus</code></a> not allowed as child of element <a><code>body</code></a> in this context.</span></p>
//!   <p class="location"><a href="#l8c11">From line <span class="first-line">8</span>, column <span class="first-col">5</span>; to line <span class="last-line">8</span>, column <span class="last-col">11</span></a></p>
//!   <p class="extract"><code>&lt;body&gt;↩    <b>&lt;bogus&gt;</b>&lt;/bogu</code></p>
//! </li>
//! ```

use scraper::{ElementRef, Html};

use super::ResultPageParser;
use super::tree::{attr, collapse_line_breaks, find_all, find_first, has_class, parse_position, text};
use crate::domain::{Issue, Severity};

/// Text included in Nu Html Checker results pages on success
pub const HTML_SUCCESS_MARKER: &str = "The document validates according to the specified schema(s).";

#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlReportParser;

impl HtmlReportParser {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Builds an issue from an `<li class="error">` item.
    ///
    /// The checker's info/warning items use other classes and are never
    /// passed here, so everything becomes an error.
    fn make_issue(item: ElementRef<'_>) -> Issue {
        let mut issue = Issue::new(Severity::Error, "");

        for child in item.children().filter_map(ElementRef::wrap) {
            match attr(child, "class") {
                "location" => {
                    issue.line = location_field(child, "last-line");
                    issue.column = location_field(child, "last-col");
                }
                "extract" => issue.context = text(child, None).trim().to_string(),
                "" => {
                    if issue.message.is_empty() {
                        let message = text(child, Some(&is_span));
                        issue.message = collapse_line_breaks(message.trim());
                    }
                }
                _ => {}
            }
        }
        issue
    }
}

impl ResultPageParser for HtmlReportParser {
    const SUCCESS_MARKER: &'static str = HTML_SUCCESS_MARKER;
    const SERVICE: &'static str = "Nu Html Checker";

    fn extract_issues(&self, page: &Html) -> Vec<Issue> {
        find_all(page.root_element(), &is_error_item)
            .into_iter()
            .map(Self::make_issue)
            .collect()
    }
}

fn is_error_item(element: ElementRef<'_>) -> bool {
    element.value().name() == "li" && has_class(element, "error")
}

fn is_span(element: ElementRef<'_>) -> bool {
    element.value().name() == "span"
}

/// Reads the number inside `<span class="{class}">` under a location node
fn location_field(location: ElementRef<'_>, class: &str) -> u32 {
    find_first(location, &|e| is_span(e) && has_class(e, class))
        .map_or(0, |span| parse_position(&text(span, None), class))
}
