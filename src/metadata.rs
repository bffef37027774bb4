use crate::environment::{read_connection_type, Environment, ScreenSize};
use crate::session::{iso_timestamp, weekday_name, DayPart};
use crate::{detect_browser, detect_device, detect_os, DeviceType};

/// Referrer recorded when the visit has none.
pub const DIRECT_REFERRER: &str = "Direct";
/// Placeholder for reads the environment could not answer.
pub const UNKNOWN: &str = "unknown";

/// Location fields from the geolocation lookup. Absent fields stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct LocationInfo {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    /// Country name.
    pub country: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    /// City name.
    pub city: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    /// ISO 3166-1 alpha-2 country code.
    pub country_code: Option<String>,
}

impl LocationInfo {
    /// No location field is present.
    pub fn is_empty(&self) -> bool {
        self.country.is_none() && self.city.is_none() && self.country_code.is_none()
    }
}

/// The technical metadata captured for a single visit.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TechnicalMetadata {
    /// Browser name.
    pub browser: String,
    /// Browser version.
    pub browser_version: String,
    /// The raw user-agent.
    pub user_agent: String,
    /// Device class.
    pub device_type: DeviceType,
    /// Operating system label.
    pub operating_system: String,
    /// Screen size as `WxH`.
    pub screen_resolution: String,
    /// Viewport size as `WxH`.
    pub viewport_size: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    /// Screen color depth in bits.
    pub color_depth: Option<u32>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    /// Device pixel ratio.
    pub pixel_ratio: Option<f64>,
    /// Preferred language.
    pub language: String,
    /// All preferred languages.
    pub languages: Vec<String>,
    /// IANA timezone.
    pub timezone: String,
    /// Referring page or "Direct".
    pub referrer: String,
    /// Page the visitor landed on.
    pub landing_page: String,
    /// Capture time, ISO-8601 UTC.
    pub timestamp: String,
    /// Local weekday name.
    pub day_of_week: String,
    /// Local day-part bucket.
    pub time_of_day: DayPart,
    /// Always true, the capture only runs with scripting on.
    pub javascript_enabled: bool,
    /// Cookies are enabled.
    pub cookies_enabled: bool,
    /// Do-not-track is requested.
    pub do_not_track: bool,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    /// Effective or physical connection type.
    pub connection_type: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    /// Country name from the geolocation lookup.
    pub country: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    /// City from the geolocation lookup.
    pub city: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    /// Country code from the geolocation lookup.
    pub country_code: Option<String>,
}

/// Capture the metadata record from the environment. Never fails.
pub fn capture<E: Environment + ?Sized>(env: &E) -> TechnicalMetadata {
    let user_agent = env.user_agent().unwrap_or_default();
    let browser = detect_browser(user_agent);
    let now = env.now();

    let referrer = match env.referrer() {
        Some(referrer) if !referrer.is_empty() => referrer.to_string(),
        _ => DIRECT_REFERRER.into(),
    };

    TechnicalMetadata {
        browser: browser.name,
        browser_version: browser.version,
        user_agent: user_agent.to_string(),
        device_type: detect_device(user_agent),
        operating_system: detect_os(user_agent).label(),
        screen_resolution: size_label(env.screen_size()),
        viewport_size: size_label(env.viewport_size()),
        color_depth: env.color_depth(),
        pixel_ratio: env.pixel_ratio(),
        language: env.language().unwrap_or(UNKNOWN).to_string(),
        languages: env.languages(),
        timezone: env.timezone().unwrap_or("Unknown").to_string(),
        referrer,
        landing_page: env.location().unwrap_or(UNKNOWN).to_string(),
        timestamp: iso_timestamp(&now),
        day_of_week: weekday_name(&now),
        time_of_day: DayPart::from_time(&now),
        javascript_enabled: true,
        cookies_enabled: env.cookies_enabled(),
        do_not_track: env.do_not_track(),
        connection_type: read_connection_type(env),
        country: None,
        city: None,
        country_code: None,
    }
}

fn size_label(size: Option<ScreenSize>) -> String {
    size.map_or_else(|| UNKNOWN.to_string(), |s| s.to_string())
}

impl TechnicalMetadata {
    /// Merge the present location fields. Absent fields leave the record as is.
    pub fn merge_location(&mut self, location: LocationInfo) {
        if let Some(country) = location.country {
            self.country = Some(country);
        }
        if let Some(city) = location.city {
            self.city = Some(city);
        }
        if let Some(country_code) = location.country_code {
            self.country_code = Some(country_code);
        }
    }

    /// Builder form of [`TechnicalMetadata::merge_location`].
    pub fn with_location(mut self, location: LocationInfo) -> Self {
        self.merge_location(location);
        self
    }

    /// The location fields currently on the record.
    pub fn location(&self) -> LocationInfo {
        LocationInfo {
            country: self.country.clone(),
            city: self.city.clone(),
            country_code: self.country_code.clone(),
        }
    }

    /// The record as a JSON payload for persistence.
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|_| serde_json::Value::Object(Default::default()))
    }
}
