//! Allow-list validation for external link targets.
//!
//! Card sources and briefing links come from upstream agents and are not
//! trusted. A target is rendered as a navigable link only when its scheme is
//! on the allow-list; everything else is shown as plain text.

use url::Url;

/// Schemes considered safe for clickable links. `tel:`, `ms-teams:` and
/// `sip:` are not yet supported.
pub const SAFE_SCHEMES: [&str; 2] = ["https", "mailto"];

/// Whether `url` may be rendered as a clickable link.
///
/// Parsing follows the WHATWG URL rules, so scheme case, surrounding
/// whitespace and embedded tab/newline characters are normalized before the
/// check. Relative URLs, unparseable input and empty input are rejected.
pub fn is_safe_url(url: &str) -> bool {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return false;
    }
    match Url::parse(trimmed) {
        Ok(parsed) => SAFE_SCHEMES.contains(&parsed.scheme()),
        Err(_) => false,
    }
}

/// A link target as it should be presented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// Safe to render as a hyperlink.
    Link { label: String, href: String },
    /// Rendered as text only; the target was rejected.
    Text { label: String },
}

impl LinkTarget {
    pub fn classify(label: &str, href: &str) -> Self {
        if is_safe_url(href) {
            LinkTarget::Link {
                label: label.to_string(),
                href: href.trim().to_string(),
            }
        } else {
            LinkTarget::Text {
                label: label.to_string(),
            }
        }
    }

    pub fn is_link(&self) -> bool {
        matches!(self, LinkTarget::Link { .. })
    }
}
