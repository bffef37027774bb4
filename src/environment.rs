use chrono::{DateTime, FixedOffset, Local};

/// Width and height in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScreenSize {
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

impl ScreenSize {
    /// New size.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl std::fmt::Display for ScreenSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// The network information capability (`navigator.connection` and friends).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetworkInformation {
    /// The effective connection type (e.g., "4g").
    pub effective_type: Option<String>,
    /// The physical connection type (e.g., "wifi").
    pub connection_type: Option<String>,
}

/// The vendor variants of the network information capability, in probe order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionApi {
    /// `navigator.connection`.
    Standard,
    /// `navigator.mozConnection`.
    Mozilla,
    /// `navigator.webkitConnection`.
    Webkit,
}

impl ConnectionApi {
    /// The order the capabilities are probed in.
    pub const PROBE_ORDER: [ConnectionApi; 3] = [
        ConnectionApi::Standard,
        ConnectionApi::Mozilla,
        ConnectionApi::Webkit,
    ];
}

/// Read access to the ambient visitor state.
///
/// Every read is optional; the capture falls back to documented defaults.
pub trait Environment {
    /// The raw user-agent string.
    fn user_agent(&self) -> Option<&str>;
    /// The full screen size.
    fn screen_size(&self) -> Option<ScreenSize>;
    /// The inner window size.
    fn viewport_size(&self) -> Option<ScreenSize>;
    /// The screen color depth in bits.
    fn color_depth(&self) -> Option<u32> {
        None
    }
    /// The device pixel ratio.
    fn pixel_ratio(&self) -> Option<f64> {
        None
    }
    /// The preferred language tag.
    fn language(&self) -> Option<&str>;
    /// All preferred language tags in order.
    fn languages(&self) -> Vec<String> {
        Vec::new()
    }
    /// The IANA timezone name.
    fn timezone(&self) -> Option<&str>;
    /// The referring page.
    fn referrer(&self) -> Option<&str>;
    /// The current page.
    fn location(&self) -> Option<&str>;
    /// Cookies are enabled.
    fn cookies_enabled(&self) -> bool;
    /// Do-not-track is requested.
    fn do_not_track(&self) -> bool;
    /// A network information capability, when exposed.
    fn network_information(&self, _api: ConnectionApi) -> Option<NetworkInformation> {
        None
    }
    /// The current local time.
    fn now(&self) -> DateTime<FixedOffset> {
        let now = Local::now();
        now.with_timezone(now.offset())
    }
}

/// Read the connection type from the first exposed network capability.
///
/// Returns the `effective_type`, else the `connection_type`, of the first capability present.
pub fn read_connection_type<E: Environment + ?Sized>(env: &E) -> Option<String> {
    ConnectionApi::PROBE_ORDER
        .iter()
        .find_map(|api| env.network_information(*api))
        .and_then(|info| info.effective_type.or(info.connection_type))
}

/// An environment backed by plain values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticEnvironment {
    /// The user-agent.
    pub user_agent: Option<String>,
    /// The screen size.
    pub screen_size: Option<ScreenSize>,
    /// The viewport size.
    pub viewport_size: Option<ScreenSize>,
    /// The color depth.
    pub color_depth: Option<u32>,
    /// The device pixel ratio.
    pub pixel_ratio: Option<f64>,
    /// The preferred language.
    pub language: Option<String>,
    /// All preferred languages.
    pub languages: Vec<String>,
    /// The timezone.
    pub timezone: Option<String>,
    /// The referrer.
    pub referrer: Option<String>,
    /// The current page.
    pub location: Option<String>,
    /// Cookies are enabled.
    pub cookies_enabled: bool,
    /// Do-not-track is requested.
    pub do_not_track: bool,
    /// `navigator.connection`.
    pub connection: Option<NetworkInformation>,
    /// `navigator.mozConnection`.
    pub moz_connection: Option<NetworkInformation>,
    /// `navigator.webkitConnection`.
    pub webkit_connection: Option<NetworkInformation>,
    /// A fixed clock, the system clock is used when unset.
    pub now: Option<DateTime<FixedOffset>>,
}

impl StaticEnvironment {
    /// An environment for a user-agent.
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: Some(user_agent.into()),
            ..Default::default()
        }
    }
}

impl Environment for StaticEnvironment {
    fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    fn screen_size(&self) -> Option<ScreenSize> {
        self.screen_size
    }

    fn viewport_size(&self) -> Option<ScreenSize> {
        self.viewport_size
    }

    fn color_depth(&self) -> Option<u32> {
        self.color_depth
    }

    fn pixel_ratio(&self) -> Option<f64> {
        self.pixel_ratio
    }

    fn language(&self) -> Option<&str> {
        self.language
            .as_deref()
            .or_else(|| self.languages.first().map(String::as_str))
    }

    fn languages(&self) -> Vec<String> {
        self.languages.clone()
    }

    fn timezone(&self) -> Option<&str> {
        self.timezone.as_deref()
    }

    fn referrer(&self) -> Option<&str> {
        self.referrer.as_deref()
    }

    fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    fn cookies_enabled(&self) -> bool {
        self.cookies_enabled
    }

    fn do_not_track(&self) -> bool {
        self.do_not_track
    }

    fn network_information(&self, api: ConnectionApi) -> Option<NetworkInformation> {
        match api {
            ConnectionApi::Standard => self.connection.clone(),
            ConnectionApi::Mozilla => self.moz_connection.clone(),
            ConnectionApi::Webkit => self.webkit_connection.clone(),
        }
    }

    fn now(&self) -> DateTime<FixedOffset> {
        match self.now {
            Some(now) => now,
            None => {
                let now = Local::now();
                now.with_timezone(now.offset())
            }
        }
    }
}
