/// The browser identity parsed from a user-agent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BrowserInfo {
    /// The browser name (e.g., "Chrome"), or "Unknown".
    pub name: String,
    /// The dotted version (e.g., "124.0.6367.118"), or "unknown".
    pub version: String,
}

impl Default for BrowserInfo {
    fn default() -> Self {
        Self {
            name: UNKNOWN_BROWSER.into(),
            version: UNKNOWN_VERSION.into(),
        }
    }
}

/// Name used when no browser marker matches.
pub const UNKNOWN_BROWSER: &str = "Unknown";
/// Version used when no version token can be read.
pub const UNKNOWN_VERSION: &str = "unknown";

/// Ordered browser markers: (marker, name, version tokens).
///
/// Chrome must stay ahead of Safari since Chrome user-agents carry a Safari token,
/// and Edge ahead of Chrome for the same reason.
const BROWSER_MARKERS: &[(&str, &str, &[&str])] = &[
    ("Firefox", "Firefox", &["Firefox/"]),
    ("Edg", "Edge", &["Edg/", "Edge/"]),
    ("Chrome", "Chrome", &["Chrome/"]),
    ("Safari", "Safari", &["Version/"]),
];

/// Classify the browser of a user-agent, first marker wins.
pub fn detect_browser(user_agent: &str) -> BrowserInfo {
    for &(marker, name, tokens) in BROWSER_MARKERS {
        if user_agent.contains(marker) {
            let version = tokens
                .iter()
                .find_map(|t| version_after(user_agent, t))
                .unwrap_or(UNKNOWN_VERSION);

            return BrowserInfo {
                name: name.into(),
                version: version.into(),
            };
        }
    }

    BrowserInfo::default()
}

/// The first non-empty run of digits and dots following `token`.
pub fn version_after<'a>(user_agent: &'a str, token: &str) -> Option<&'a str> {
    user_agent.match_indices(token).find_map(|(pos, _)| {
        let start = pos + token.len();
        let run = version_run(&user_agent.as_bytes()[start..]);
        (run > 0).then(|| &user_agent[start..start + run])
    })
}

#[inline]
fn version_run(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .take_while(|&&b| b.is_ascii_digit() || b == b'.')
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_browser_examples() {
        let chrome = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                      AppleWebKit/537.36 (KHTML, like Gecko) \
                      Chrome/124.0.6367.118 Safari/537.36";
        let info = detect_browser(chrome);
        assert_eq!(info.name, "Chrome");
        assert_eq!(info.version, "124.0.6367.118");

        let safari = "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_5) \
                      AppleWebKit/605.1.15 (KHTML, like Gecko) \
                      Version/17.1 Safari/605.1.15";
        let info = detect_browser(safari);
        assert_eq!(info.name, "Safari");
        assert_eq!(info.version, "17.1");

        let firefox = "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:128.0) \
                       Gecko/20100101 Firefox/128.0";
        let info = detect_browser(firefox);
        assert_eq!(info.name, "Firefox");
        assert_eq!(info.version, "128.0");

        let edge = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
            AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36 Edg/114.0.1823.55";
        let info = detect_browser(edge);
        assert_eq!(info.name, "Edge");
        assert_eq!(info.version, "114.0.1823.55");
    }

    #[test]
    fn chrome_wins_over_safari() {
        for ua in [
            "Chrome/1 Safari/2",
            "Safari/537.36 Chrome/99.0",
            "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 \
             (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36",
        ] {
            assert_eq!(detect_browser(ua).name, "Chrome", "{ua}");
        }
    }

    #[test]
    fn unknown_defaults() {
        let info = detect_browser("");
        assert_eq!(info.name, "Unknown");
        assert_eq!(info.version, "unknown");

        let info = detect_browser("curl/8.4.0");
        assert_eq!(info, BrowserInfo::default());
    }

    #[test]
    fn marker_without_version() {
        let info = detect_browser("Mozilla/5.0 Safari");
        assert_eq!(info.name, "Safari");
        assert_eq!(info.version, "unknown");

        // legacy EdgeHTML token
        let info = detect_browser("Mozilla/5.0 Chrome/70.0 Safari/537.36 Edge/18.17763");
        assert_eq!(info.name, "Edge");
        assert_eq!(info.version, "18.17763");
    }

    #[test]
    fn version_skips_empty_tokens() {
        assert_eq!(version_after("Chrome/ Chrome/12.5", "Chrome/"), Some("12.5"));
        assert_eq!(version_after("Chrome/x", "Chrome/"), None);
    }
}
