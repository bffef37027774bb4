#![warn(missing_docs)]
//! Visitor environment fingerprinting with best-effort geolocation enrichment.

/// Builder types.
pub mod configs;
/// Browser detection.
pub mod detect_browser;
/// Device type detection.
pub mod detect_device;
/// Operating system detection.
pub mod detect_os;
/// Ambient visitor state.
pub mod environment;
#[cfg(feature = "geolocation")]
/// IP geolocation enrichment.
pub mod geolocation;
#[cfg(feature = "headers")]
/// Environment from HTTP request headers.
pub mod headers;
/// The technical metadata record.
pub mod metadata;
/// Session time helpers.
pub mod session;

pub use configs::DeviceType;
pub use detect_browser::{detect_browser, BrowserInfo};
pub use detect_device::detect_device;
pub use detect_os::{detect_os, OperatingSystem};
pub use environment::{read_connection_type, Environment, StaticEnvironment};
#[cfg(feature = "geolocation")]
pub use geolocation::{GeoClient, GeoError};
#[cfg(feature = "headers")]
pub use headers::HeaderEnvironment;
pub use metadata::{capture, LocationInfo, TechnicalMetadata};
pub use session::DayPart;

#[cfg(feature = "headers")]
pub use http;
pub use url;

lazy_static::lazy_static! {
    /// Tablet indicators, matched ignoring ascii case.
    pub static ref TABLET_PATTERNS: [&'static str; 4] = ["tablet", "ipad", "playbook", "silk"];

    /// Common tablet indicators for user-agent detection.
    pub static ref TABLET_MATCHER: aho_corasick::AhoCorasick = aho_corasick::AhoCorasickBuilder::new()
        .ascii_case_insensitive(true)
        .build(TABLET_PATTERNS.as_ref())
        .expect("failed to compile AhoCorasick patterns");

    /// Mobile indicators, matched case sensitively.
    pub static ref MOBILE_PATTERNS: [&'static str; 20] = [
        // Apple
        "iPhone", "iPod",
        // Generic mobile
        "Mobile", "Android",
        // Legacy handsets and readers
        "BlackBerry", "IEMobile", "Kindle", "NetFront", "Silk-Accelerated",
        "hpwOS", "webOS", "Zune",
        // Mobile browsers
        "Fennec", "Minimo", "Opera Mobi", "Opera Mini", "Blazer", "Dolfin",
        "Dolphin", "Skyfire"
    ];

    /// Common mobile indicators for user-agent detection. Case sensitive.
    pub static ref MOBILE_MATCHER: aho_corasick::AhoCorasick = aho_corasick::AhoCorasickBuilder::new()
        .build(MOBILE_PATTERNS.as_ref())
        .expect("failed to compile AhoCorasick patterns");

    /// The `android` token, ignoring ascii case.
    pub static ref ANDROID_MATCHER: aho_corasick::AhoCorasick = aho_corasick::AhoCorasickBuilder::new()
        .ascii_case_insensitive(true)
        .build(["android"])
        .expect("valid android pattern");

    /// The `mobi` token, ignoring ascii case.
    pub static ref MOBI_MATCHER: aho_corasick::AhoCorasick = aho_corasick::AhoCorasickBuilder::new()
        .ascii_case_insensitive(true)
        .build(["mobi"])
        .expect("valid mobi pattern");
}

/// Returns `true` if the user-agent is likely a mobile browser.
pub fn is_mobile_user_agent(user_agent: &str) -> bool {
    MOBILE_MATCHER.find(user_agent).is_some()
}

/// Characters that end a line for the `android` lookahead.
const LINE_TERMINATORS: [char; 4] = ['\n', '\r', '\u{2028}', '\u{2029}'];

/// Returns `true` if the user-agent is likely a tablet.
///
/// An `android` token without a later `mobi` token on the same line counts as a tablet.
pub fn is_tablet_user_agent(user_agent: &str) -> bool {
    if TABLET_MATCHER.find(user_agent).is_some() {
        return true;
    }

    ANDROID_MATCHER.find_iter(user_agent).any(|m| {
        let rest = &user_agent[m.end()..];
        let line = rest.split(&LINE_TERMINATORS[..]).next().unwrap_or_default();
        MOBI_MATCHER.find(line).is_none()
    })
}

/// Capture the environment and enrich it with the visitor location.
///
/// The lookup is best-effort: a failed lookup leaves the record without location fields.
#[cfg(feature = "geolocation")]
pub async fn capture_with_location<E: Environment + ?Sized>(
    env: &E,
    client: &GeoClient,
) -> TechnicalMetadata {
    let mut metadata = capture(env);
    metadata.merge_location(client.enrich().await);
    metadata
}
