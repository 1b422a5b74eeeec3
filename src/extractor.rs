use kuchikikiki::traits::TendrilSink;
use kuchikikiki::NodeRef;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

/// `YYYY-M-D` with `.`, `/` or `-` as separators; the two separators in one
/// date do not have to match.
static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{4}[./-]\d{1,2}[./-]\d{1,2}").unwrap());

/// Best-effort recovery of a post's title and raw date string from its HTML.
///
/// The title is the trimmed text of the first `<title>` element, if any.
/// The date cascade is first-match-wins: the trimmed text of the first
/// `<time>` element, else the first date-shaped substring of the document's
/// visible text, else the empty string. HTML5 parsing never fails, so
/// malformed markup degrades into fallbacks instead of errors.
pub(crate) fn extract(html: &str) -> (Option<String>, String) {
    let document = kuchikikiki::parse_html().one(html);

    let title = document
        .select_first("title")
        .ok()
        .map(|node| node.as_node().text_contents().trim().to_string());

    let date = match document.select_first("time") {
        Ok(node) => node.as_node().text_contents().trim().to_string(),
        Err(()) => {
            let text = collapsed_text(&document);
            match DATE_PATTERN.find(&text) {
                Some(m) => m.as_str().to_string(),
                None => {
                    debug!("no <time> element and no date-shaped text found");
                    String::new()
                }
            }
        }
    };

    (title, date)
}

/// All text content of the document with runs of whitespace collapsed to
/// single spaces, so the date pattern can match across markup boundaries.
fn collapsed_text(document: &NodeRef) -> String {
    document
        .text_contents()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
