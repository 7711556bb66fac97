// src/checker/tree.rs
// =============================================================================
// This module walks a parsed HTML document ONCE and pulls out everything the
// report needs from the page itself:
//
// - the page title (first <title> directly inside <head>)
// - the HTML version (<!DOCTYPE html> means HTML5, anything else is older)
// - how many h1..h6 headings there are
// - whether any <form> looks like a login form
// - every href attribute value, in document order
//
// We use the `scraper` crate to parse, then walk its node tree directly
// instead of running one CSS selector per concern. `descendants()` visits
// nodes depth-first in document order, so one loop covers all five jobs.
// =============================================================================

use scraper::{ElementRef, Html, Node};
use serde::Serialize;
use std::fmt;
use tracing::debug;

// Lower-case substrings that mark a form as a login form
const LOGIN_KEYWORDS: [&str; 3] = ["log in", "login", "password"];

// The only two versions we can tell apart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HtmlVersion {
    /// Saw <!DOCTYPE html>
    Html5,
    /// No doctype, or a doctype with a name other than "html"
    #[default]
    Legacy,
}

impl fmt::Display for HtmlVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HtmlVersion::Html5 => write!(f, "5"),
            HtmlVersion::Legacy => write!(f, "4 or earlier"),
        }
    }
}

impl Serialize for HtmlVersion {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// Structural facts about one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageFacts {
    pub title: String,
    pub version: HtmlVersion,
    /// headings[0] counts <h1>, headings[5] counts <h6>
    pub headings: [usize; 6],
    pub login_form: bool,
}

// Parses decoded page text and analyzes the resulting document
//
// html5ever recovers from any markup, so this step cannot fail. Decoding the
// raw bytes (and picking the charset) happens in fetch.rs.
pub fn analyze_html(text: &str) -> (PageFacts, Vec<String>) {
    let document = Html::parse_document(text);
    analyze_document(&document)
}

// Walks the whole document once
//
// Returns the page facts plus every raw href value (not deduplicated, not
// resolved) in the order they appear.
pub fn analyze_document(document: &Html) -> (PageFacts, Vec<String>) {
    let mut facts = PageFacts::default();
    let mut links = Vec::new();
    let mut title_found = false;

    for node in document.tree.root().descendants() {
        match node.value() {
            Node::Doctype(doctype) => {
                if doctype.name() == "html" {
                    facts.version = HtmlVersion::Html5;
                }
            }
            Node::Element(element) => {
                let name = element.name();

                if let Some(href) = element.attr("href") {
                    links.push(href.to_string());
                }

                if let Some(level) = heading_level(name) {
                    facts.headings[level] += 1;
                }

                if name == "title" && !title_found {
                    let in_head = node
                        .parent()
                        .and_then(|parent| parent.value().as_element())
                        .map_or(false, |parent| parent.name() == "head");

                    if in_head {
                        if let Some(title) = ElementRef::wrap(node) {
                            facts.title = title.text().collect::<String>().trim().to_string();
                            title_found = true;
                        }
                    }
                }

                // Once one login form is found the rest of the forms don't matter
                if name == "form" && !facts.login_form {
                    if let Some(form) = ElementRef::wrap(node) {
                        facts.login_form = is_login_form(form);
                    }
                }
            }
            _ => {}
        }
    }

    debug!(
        title = %facts.title,
        version = %facts.version,
        headings = ?facts.headings,
        login_form = facts.login_form,
        links = links.len(),
        "document analyzed"
    );

    (facts, links)
}

// Maps "h1".."h6" to an index 0..5
fn heading_level(name: &str) -> Option<usize> {
    match name {
        "h1" => Some(0),
        "h2" => Some(1),
        "h3" => Some(2),
        "h4" => Some(3),
        "h5" => Some(4),
        "h6" => Some(5),
        _ => None,
    }
}

// Guesses whether a form is meant for logging in
//
// There is no reliable way to know. We look at the id/name attributes of
// every element in the form and at all of its text, and say yes as soon as
// one of the keywords shows up.
pub fn is_login_form(form: ElementRef<'_>) -> bool {
    form.descendants().any(|node| match node.value() {
        Node::Element(element) => ["id", "name"]
            .iter()
            .filter_map(|attr| element.attr(attr))
            .any(contains_login_keyword),
        Node::Text(text) => contains_login_keyword(text),
        _ => false,
    })
}

fn contains_login_keyword(value: &str) -> bool {
    let value = value.to_lowercase();
    LOGIN_KEYWORDS.iter().any(|keyword| value.contains(keyword))
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is descendants()?
//    - Every scraper document is an ego_tree tree of Node values
//    - descendants() yields a node, then its children, then their children...
//      in the same order the tags appear in the source
//
// 2. Why ElementRef::wrap?
//    - NodeRef points at ANY node (text, comment, doctype...)
//    - wrap() returns Some only for elements, and gives us text() for free
// -----------------------------------------------------------------------------
