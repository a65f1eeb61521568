//! Minimal HTML results page for AMP issues
//!
//! `amphtml-validator` has no results page of its own, unlike the W3C
//! services, so one is rendered from the parsed issues.

use std::fmt::Write;

use crate::domain::Issue;

pub fn render_amp_results_page(issues: &[Issue]) -> Vec<u8> {
    let mut page = String::from(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n  \
         <head>\n    \
         <meta charset=\"utf-8\">\n    \
         <title>AMP validation results</title>\n  \
         </head>\n  \
         <body>\n",
    );

    if issues.is_empty() {
        page.push_str("    No issues found.\n");
    }
    for issue in issues {
        let code = escape(&issue.code);
        let code = if issue.url.is_empty() {
            code
        } else {
            format!("<a href=\"{}\">{code}</a>", escape(&issue.url))
        };
        // Writing to a String can't fail.
        let _ = writeln!(
            page,
            "    {}:{} {} {} {}<br>",
            issue.line,
            issue.column,
            issue.severity,
            escape(&issue.message),
            code
        );
    }

    page.push_str("  </body>\n</html>\n");
    page.into_bytes()
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
