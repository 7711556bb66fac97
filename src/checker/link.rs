// src/checker/link.rs
// =============================================================================
// Turns a raw href value into an absolute URL and decides whether it points
// inside or outside the page's site.
//
// A LinkValidator is built once per audit from the page URL and never
// changes afterwards. It is shared (behind an Arc) by every probe task of
// that audit and nothing else - two audits never see each other's base URL.
//
// We use the `url` crate for parsing and for RFC 3986 relative resolution
// (`Url::join`).
// =============================================================================

use serde::Serialize;
use url::Url;

// Outcome for one link on the page
//
// Built once by the aggregator and never changed afterwards
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkRecord {
    /// The href value exactly as written in the page
    pub url: String,
    /// Absolute URL we checked; empty if the href could not be parsed at all
    pub full_path: String,
    pub is_external: bool,
    pub is_broken: bool,
}

#[derive(Debug, Clone)]
pub struct LinkValidator {
    base_url: Url,
}

impl LinkValidator {
    pub fn new(base_url: Url) -> Self {
        Self { base_url }
    }

    // Resolves a raw href to an absolute URL string
    //
    // Examples (base = "https://example.com/docs/page"):
    //   "https://other.com/x" -> "https://other.com/x" (used as-is)
    //   "/a"                  -> "https://example.com/a"
    //   "b?q=1"               -> "https://example.com/docs/b?q=1"
    //   "#top"                -> "https://example.com/docs/page#top"
    //   "//[broken"           -> "" (cannot be parsed)
    pub fn resolve(&self, link: &str) -> String {
        if is_absolute_http(link) {
            return strip_whitespace(link);
        }

        match self.base_url.join(link) {
            Ok(url) => url.to_string(),
            Err(_) => String::new(),
        }
    }

    // Compares the link's host with the page's host
    //
    // Scheme and port are ignored: http://example.com:8080/ is internal to
    // https://example.com/. A link that cannot be parsed counts as internal.
    pub fn is_external(&self, link: &str) -> bool {
        let parsed = if is_absolute_http(link) {
            Url::parse(&strip_whitespace(link))
        } else {
            self.base_url.join(link)
        };

        match parsed {
            Ok(url) => url.host_str() != self.base_url.host_str(),
            Err(_) => false,
        }
    }
}

fn is_absolute_http(link: &str) -> bool {
    link.starts_with("http://") || link.starts_with("https://")
}

// Malformed markup often carries newlines or spaces inside href values
fn strip_whitespace(link: &str) -> String {
    link.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> LinkValidator {
        LinkValidator::new(Url::parse("http://example.com/docs/page").unwrap())
    }

    #[test]
    fn test_absolute_same_host_is_internal() {
        assert!(!validator().is_external("http://example.com/a"));
    }

    #[test]
    fn test_other_host_is_external() {
        assert!(validator().is_external("https://other.com/b"));
    }

    #[test]
    fn test_scheme_and_port_are_ignored() {
        assert!(!validator().is_external("https://example.com:8443/secure"));
    }

    #[test]
    fn test_relative_link_is_internal() {
        let v = validator();
        assert_eq!(v.resolve("/a"), "http://example.com/a");
        assert!(!v.is_external("/a"));
    }

    #[test]
    fn test_relative_path_query_and_fragment() {
        let v = validator();
        assert_eq!(v.resolve("b"), "http://example.com/docs/b");
        assert_eq!(v.resolve("../up"), "http://example.com/up");
        assert_eq!(v.resolve("?q=1"), "http://example.com/docs/page?q=1");
        assert_eq!(v.resolve("#top"), "http://example.com/docs/page#top");
    }

    #[test]
    fn test_protocol_relative_link_uses_its_own_host() {
        let v = validator();
        assert_eq!(v.resolve("//cdn.other.com/lib.js"), "http://cdn.other.com/lib.js");
        assert!(v.is_external("//cdn.other.com/lib.js"));
    }

    #[test]
    fn test_absolute_link_is_used_as_is_minus_whitespace() {
        let v = validator();
        assert_eq!(v.resolve("https://other.com/x"), "https://other.com/x");
        assert_eq!(
            v.resolve("https://other.com/a\n  /b "),
            "https://other.com/a/b"
        );
        assert!(v.is_external("https://other.com/a\n  /b "));
    }

    #[test]
    fn test_unparseable_link_degrades_to_empty_internal() {
        let v = validator();
        assert_eq!(v.resolve("//[broken"), "");
        assert!(!v.is_external("//[broken"));
    }

    #[test]
    fn test_mailto_has_no_host_and_is_external() {
        // mailto: has no host at all, which differs from example.com
        let v = validator();
        assert_eq!(v.resolve("mailto:someone@example.com"), "mailto:someone@example.com");
        assert!(v.is_external("mailto:someone@example.com"));
    }
}
