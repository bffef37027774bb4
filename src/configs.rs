use std::time::Duration;

/// Default IP geolocation endpoint resolving the caller's address.
pub const DEFAULT_GEO_ENDPOINT: &str = "https://ipapi.co/json/";
/// Default endpoint template for an explicit address. `{ip}` is replaced.
pub const DEFAULT_GEO_IP_ENDPOINT: &str = "https://ipapi.co/{ip}/json/";

lazy_static::lazy_static! {
    /// The geolocation endpoint, configurable via the `VISITOR_GEO_ENDPOINT` env variable.
    pub static ref GEO_ENDPOINT: String = std::env::var("VISITOR_GEO_ENDPOINT")
        .ok()
        .and_then(|v| if v.is_empty() { None } else { Some(v) })
        .unwrap_or(DEFAULT_GEO_ENDPOINT.into());
}

/// The class of device the visitor is using.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DeviceType {
    #[default]
    /// Desktop or laptop.
    Desktop,
    /// Phone.
    Mobile,
    /// Tablet.
    Tablet,
}

impl DeviceType {
    /// The lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Desktop => "desktop",
            DeviceType::Mobile => "mobile",
            DeviceType::Tablet => "tablet",
        }
    }
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for the geolocation lookup.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoConfiguration {
    /// Endpoint resolving the requester's own address.
    pub endpoint: String,
    /// Endpoint template for an explicit address, `{ip}` is substituted.
    pub ip_endpoint: String,
    /// Request timeout.
    pub timeout: Duration,
    /// User-agent sent with the lookup.
    pub user_agent: String,
}

impl Default for GeoConfiguration {
    fn default() -> Self {
        Self {
            endpoint: GEO_ENDPOINT.clone(),
            ip_endpoint: DEFAULT_GEO_IP_ENDPOINT.into(),
            timeout: Duration::from_secs(5),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl GeoConfiguration {
    /// Use a custom endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Use a custom endpoint template for explicit addresses.
    pub fn with_ip_endpoint(mut self, ip_endpoint: impl Into<String>) -> Self {
        self.ip_endpoint = ip_endpoint.into();
        self
    }

    /// Use a custom request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
