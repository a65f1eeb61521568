//! DOM query helpers shared by the result-page parsers
//!
//! The W3C services wrap the interesting fields in nested markup mixed with
//! labels and links we don't want, so text extraction can be restricted to
//! subtrees chosen by a predicate.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::ElementRef;
use tracing::debug;

/// Element predicate used to select subtrees
pub type ElementFilter<'f> = &'f dyn Fn(ElementRef<'_>) -> bool;

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t\n\r\x0C]+").expect("valid whitespace regex"));

static WHITESPACE_AROUND_NEWLINES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[ \t\n\r\x0C]*\n[ \t\n\r\x0C]*").expect("valid newline regex")
});

/// Returns the value of the first attribute called `name`, or `""`.
#[must_use]
pub fn attr<'a>(element: ElementRef<'a>, name: &str) -> &'a str {
    element
        .value()
        .attrs()
        .find(|(key, _)| *key == name)
        .map_or("", |(_, value)| value)
}

#[must_use]
pub fn has_class(element: ElementRef<'_>, class: &str) -> bool {
    attr(element, "class") == class
}

/// Concatenates the text under `element`.
///
/// Each whitespace run inside a text node becomes one space and every
/// included `<p>` starts with a newline. With a filter, a subtree contributes
/// only if the filter accepts its root or an enclosing subtree was already
/// accepted; the filter is not consulted again below an accepted element.
#[must_use]
pub fn text(element: ElementRef<'_>, filter: Option<ElementFilter<'_>>) -> String {
    let included = filter.is_none_or(|accept| accept(element));
    let mut out = String::new();
    collect_text(element, filter, included, &mut out);
    out
}

fn collect_text(
    element: ElementRef<'_>,
    filter: Option<ElementFilter<'_>>,
    included: bool,
    out: &mut String,
) {
    if included && element.value().name() == "p" {
        out.push('\n');
    }

    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            if included {
                out.push_str(&WHITESPACE.replace_all(text, " "));
            }
        } else if let Some(child) = ElementRef::wrap(child) {
            let child_included = included || filter.is_none_or(|accept| accept(child));
            collect_text(child, filter, child_included, out);
        }
    }
}

/// Collects elements accepted by `matches` in document order.
///
/// Matched elements are not searched further, so nested matches are skipped.
#[must_use]
pub fn find_all<'a>(root: ElementRef<'a>, matches: ElementFilter<'_>) -> Vec<ElementRef<'a>> {
    let mut found = Vec::new();
    visit(root, matches, &mut found);
    found
}

fn visit<'a>(element: ElementRef<'a>, matches: ElementFilter<'_>, found: &mut Vec<ElementRef<'a>>) {
    if matches(element) {
        found.push(element);
        return;
    }
    for child in element.children().filter_map(ElementRef::wrap) {
        visit(child, matches, found);
    }
}

/// First descendant (or `element` itself) accepted by `matches`
#[must_use]
pub fn find_first<'a>(element: ElementRef<'a>, matches: ElementFilter<'_>) -> Option<ElementRef<'a>> {
    if matches(element) {
        return Some(element);
    }
    element
        .children()
        .filter_map(ElementRef::wrap)
        .find_map(|child| find_first(child, matches))
}

/// Collapses whitespace surrounding each line break into a bare `\n`
#[must_use]
pub fn collapse_line_breaks(text: &str) -> String {
    WHITESPACE_AROUND_NEWLINES.replace_all(text, "\n").into_owned()
}

/// Parses a line or column number, falling back to 0 ("unknown").
///
/// Location fields are best effort: a malformed number never aborts
/// extraction of the rest of the issue.
#[must_use]
pub fn parse_position(text: &str, field: &str) -> u32 {
    let trimmed = text.trim();
    trimmed.parse().unwrap_or_else(|e| {
        debug!("Ignoring unparsable {} '{}': {}", field, trimmed, e);
        0
    })
}
