//! URL extraction and allow-list matching.

use once_cell::sync::Lazy;
use regex::Regex;

static URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\b(?:https?://|www\.)[^\s<>"']+"#).expect("valid url pattern")
});

/// URLs found in a text, split by allow-list membership.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlScan {
    pub allowed: Vec<String>,
    pub blocked: Vec<String>,
}

impl UrlScan {
    /// Returns true if any URL fell outside the allow list.
    pub fn has_blocked(&self) -> bool {
        !self.blocked.is_empty()
    }
}

/// Extracts URLs from `text` in order of appearance.
///
/// Trailing sentence punctuation is not part of the URL.
pub fn extract_urls(text: &str) -> Vec<String> {
    URL.find_iter(text)
        .map(|m| {
            m.as_str()
                .trim_end_matches(['.', ',', ';', ':', '!', '?', ')'])
                .to_string()
        })
        .collect()
}

/// Returns the lowercase host of a URL.
pub fn host_of(url: &str) -> String {
    let lower = url.to_ascii_lowercase();
    let without_scheme = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"))
        .unwrap_or(&lower);
    let authority = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    let host = authority.rsplit('@').next().unwrap_or_default();
    host.split(':').next().unwrap_or_default().to_string()
}

/// True if `host` equals an allow-list entry or is a subdomain of one.
pub fn is_allowed(host: &str, allow_list: &[String]) -> bool {
    allow_list.iter().any(|entry| {
        let entry = host_of(entry.trim());
        !entry.is_empty() && (host == entry || host.ends_with(&format!(".{}", entry)))
    })
}

/// Classifies every URL in `text` against `allow_list`.
pub fn scan(text: &str, allow_list: &[String]) -> UrlScan {
    let mut result = UrlScan::default();
    for url in extract_urls(text) {
        if is_allowed(&host_of(&url), allow_list) {
            result.allowed.push(url);
        } else {
            result.blocked.push(url);
        }
    }
    result
}
