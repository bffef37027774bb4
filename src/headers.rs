use crate::environment::{ConnectionApi, Environment, NetworkInformation, ScreenSize};
use chrono::{DateTime, FixedOffset};
use http::header::{HeaderMap, HeaderName, ACCEPT_LANGUAGE, COOKIE, HOST, REFERER, USER_AGENT};

/// `DNT` request header.
pub const DNT: HeaderName = HeaderName::from_static("dnt");
/// Effective connection type client hint.
pub const ECT: HeaderName = HeaderName::from_static("ect");
/// Device pixel ratio client hint.
pub const SEC_CH_DPR: HeaderName = HeaderName::from_static("sec-ch-dpr");
/// Viewport width client hint.
pub const SEC_CH_VIEWPORT_WIDTH: HeaderName = HeaderName::from_static("sec-ch-viewport-width");
/// Viewport height client hint.
pub const SEC_CH_VIEWPORT_HEIGHT: HeaderName = HeaderName::from_static("sec-ch-viewport-height");
/// Forwarded scheme set by proxies.
pub const X_FORWARDED_PROTO: HeaderName = HeaderName::from_static("x-forwarded-proto");

/// An environment read from the headers of an inbound request.
///
/// Screen size, color depth and timezone are not sent by browsers and stay unknown.
/// Cookies count as enabled when the request carries a `Cookie` header.
#[derive(Debug, Clone)]
pub struct HeaderEnvironment<'a> {
    headers: &'a HeaderMap,
    landing_page: Option<String>,
    now: Option<DateTime<FixedOffset>>,
}

impl<'a> HeaderEnvironment<'a> {
    /// Environment from the headers alone. The landing page is built from `Host` and `path`.
    pub fn new(headers: &'a HeaderMap, path: &str) -> Self {
        let landing_page = header_str(headers, &HOST).and_then(|host| {
            let scheme = header_str(headers, &X_FORWARDED_PROTO)
                .and_then(|p| p.split(',').next())
                .map(str::trim)
                .filter(|p| *p == "http" || *p == "https")
                .unwrap_or("https");

            let mut url = url::Url::parse(&format!("{scheme}://{host}")).ok()?;
            let (path, query) = match path.split_once('?') {
                Some((path, query)) => (path, Some(query)),
                None => (path, None),
            };
            // set the path in place so `//host` targets stay on the request host
            url.set_path(path);
            url.set_query(query);
            Some(String::from(url))
        });

        Self {
            headers,
            landing_page,
            now: None,
        }
    }

    /// Environment from a request. Absolute request targets are used as the landing page.
    pub fn from_request<B>(request: &'a http::Request<B>) -> Self {
        let uri = request.uri();
        let path = uri.path_and_query().map_or("/", |p| p.as_str());
        let mut env = Self::new(request.headers(), path);

        if uri.scheme().is_some() {
            if let Ok(url) = url::Url::parse(&uri.to_string()) {
                env.landing_page = Some(url.into());
            }
        }

        env
    }

    /// Use a fixed clock.
    pub fn with_now(mut self, now: DateTime<FixedOffset>) -> Self {
        self.now = Some(now);
        self
    }

    fn get(&self, name: &HeaderName) -> Option<&'a str> {
        header_str(self.headers, name)
    }
}

fn header_str<'h>(headers: &'h HeaderMap, name: &HeaderName) -> Option<&'h str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Language tags of an `Accept-Language` value in the order sent, without weights.
pub fn parse_accept_language(value: &str) -> impl Iterator<Item = &str> {
    value
        .split(',')
        .filter_map(|part| part.split(';').next())
        .map(str::trim)
        .filter(|tag| !tag.is_empty() && *tag != "*")
}

impl Environment for HeaderEnvironment<'_> {
    fn user_agent(&self) -> Option<&str> {
        self.get(&USER_AGENT)
    }

    fn screen_size(&self) -> Option<ScreenSize> {
        None
    }

    fn viewport_size(&self) -> Option<ScreenSize> {
        let width = self.get(&SEC_CH_VIEWPORT_WIDTH)?.parse().ok()?;
        let height = self.get(&SEC_CH_VIEWPORT_HEIGHT)?.parse().ok()?;
        Some(ScreenSize::new(width, height))
    }

    fn pixel_ratio(&self) -> Option<f64> {
        self.get(&SEC_CH_DPR)?
            .parse()
            .ok()
            .filter(|ratio: &f64| ratio.is_finite() && *ratio > 0.0)
    }

    fn language(&self) -> Option<&str> {
        parse_accept_language(self.get(&ACCEPT_LANGUAGE)?).next()
    }

    fn languages(&self) -> Vec<String> {
        self.get(&ACCEPT_LANGUAGE)
            .map(|v| parse_accept_language(v).map(String::from).collect())
            .unwrap_or_default()
    }

    fn timezone(&self) -> Option<&str> {
        None
    }

    fn referrer(&self) -> Option<&str> {
        self.get(&REFERER)
    }

    fn location(&self) -> Option<&str> {
        self.landing_page.as_deref()
    }

    fn cookies_enabled(&self) -> bool {
        self.headers.contains_key(COOKIE)
    }

    fn do_not_track(&self) -> bool {
        self.get(&DNT) == Some("1")
    }

    fn network_information(&self, api: ConnectionApi) -> Option<NetworkInformation> {
        match api {
            ConnectionApi::Standard => self.get(&ECT).map(|ect| NetworkInformation {
                effective_type: Some(ect.to_string()),
                connection_type: None,
            }),
            _ => None,
        }
    }

    fn now(&self) -> DateTime<FixedOffset> {
        match self.now {
            Some(now) => now,
            None => {
                let now = chrono::Local::now();
                now.with_timezone(now.offset())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{capture, DeviceType};
    use http::HeaderValue;

    fn request_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(
                "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36",
            ),
        );
        headers.insert(HOST, HeaderValue::from_static("example.com"));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("fr-CH, fr;q=0.9, en;q=0.8, *;q=0.5"),
        );
        headers.insert(DNT, HeaderValue::from_static("1"));
        headers.insert(ECT, HeaderValue::from_static("4g"));
        headers.insert(SEC_CH_VIEWPORT_WIDTH, HeaderValue::from_static("412"));
        headers.insert(SEC_CH_VIEWPORT_HEIGHT, HeaderValue::from_static("915"));
        headers.insert(SEC_CH_DPR, HeaderValue::from_static("2.625"));
        headers
    }

    #[test]
    fn headers_map_onto_environment() {
        let headers = request_headers();
        let env = HeaderEnvironment::new(&headers, "/waitlist?ref=hn");

        assert_eq!(env.language(), Some("fr-CH"));
        assert_eq!(env.languages(), vec!["fr-CH", "fr", "en"]);
        assert_eq!(env.location(), Some("https://example.com/waitlist?ref=hn"));
        assert_eq!(env.viewport_size(), Some(ScreenSize::new(412, 915)));
        assert_eq!(env.pixel_ratio(), Some(2.625));
        assert!(env.do_not_track());
        assert!(!env.cookies_enabled());
        assert_eq!(env.referrer(), None);

        let m = capture(&env);
        assert_eq!(m.device_type, DeviceType::Mobile);
        assert_eq!(m.browser, "Chrome");
        assert_eq!(m.referrer, "Direct");
        assert_eq!(m.connection_type.as_deref(), Some("4g"));
        assert_eq!(m.screen_resolution, "unknown");
        assert_eq!(m.timezone, "Unknown");
    }

    #[test]
    fn forwarded_scheme_and_referrer() {
        let mut headers = request_headers();
        headers.insert(X_FORWARDED_PROTO, HeaderValue::from_static("http, https"));
        headers.insert(REFERER, HeaderValue::from_static("https://twitter.com/"));
        headers.insert(COOKIE, HeaderValue::from_static("session=1"));
        let env = HeaderEnvironment::new(&headers, "/");

        assert_eq!(env.location(), Some("http://example.com/"));
        assert_eq!(env.referrer(), Some("https://twitter.com/"));
        assert!(env.cookies_enabled());
    }

    #[test]
    fn from_request_with_absolute_target() {
        let request = http::Request::builder()
            .uri("https://landing.example.org/join")
            .header(USER_AGENT, "curl/8.4.0")
            .body(())
            .unwrap();
        let env = HeaderEnvironment::from_request(&request);

        assert_eq!(env.location(), Some("https://landing.example.org/join"));
        assert_eq!(capture(&env).browser, "Unknown");
    }

    #[test]
    fn non_finite_pixel_ratio_is_dropped() {
        for dpr in ["NaN", "inf", "-inf", "0", "-2"] {
            let mut headers = request_headers();
            headers.insert(SEC_CH_DPR, HeaderValue::from_static(dpr));
            let env = HeaderEnvironment::new(&headers, "/");
            assert_eq!(env.pixel_ratio(), None, "dpr {dpr}");

            let m = capture(&env);
            assert_eq!(m, m.clone());
            #[cfg(feature = "serde")]
            assert!(m.to_json().get("pixelRatio").is_none(), "dpr {dpr}");
        }
    }

    #[test]
    fn landing_page_stays_on_the_request_host() {
        let headers = request_headers();

        for path in ["//other.host/x", "/\\other.host/x"] {
            let env = HeaderEnvironment::new(&headers, path);
            let landing = url::Url::parse(env.location().unwrap()).unwrap();
            assert_eq!(landing.host_str(), Some("example.com"), "path {path}");
        }

        let env = HeaderEnvironment::new(&headers, "//other.host/x?a=1");
        assert_eq!(env.location(), Some("https://example.com//other.host/x?a=1"));
    }

    #[test]
    fn missing_host_has_no_landing_page() {
        let headers = HeaderMap::new();
        let env = HeaderEnvironment::new(&headers, "/");
        assert_eq!(env.location(), None);
        assert_eq!(env.language(), None);
        assert!(env.languages().is_empty());
    }
}
