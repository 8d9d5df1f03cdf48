//! Hostname extraction for result links.

use url::Url;

/// Extract the hostname from a result link.
///
/// Links without a `//` authority or that fail to parse yield an empty
/// string, which the aggregator treats as "no domain".
pub fn extract_domain(link: &str) -> String {
    if !link.contains("//") {
        return String::new();
    }

    Url::parse(link)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .unwrap_or_default()
}

/// Drop a leading `www.` label.
pub fn strip_www(domain: &str) -> &str {
    domain.strip_prefix("www.").unwrap_or(domain)
}

/// True when `domain` is `target` or `www.` + `target`.
pub fn matches_domain(domain: &str, target: &str) -> bool {
    !target.is_empty() && strip_www(domain).eq_ignore_ascii_case(strip_www(target))
}

/// True when `domain` contains `pattern`, ignoring `www.` and case.
pub fn contains_domain(domain: &str, pattern: &str) -> bool {
    let pattern = strip_www(pattern).to_ascii_lowercase();
    !pattern.is_empty() && strip_www(domain).to_ascii_lowercase().contains(&pattern)
}
