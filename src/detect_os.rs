/// The operating system family read from a user-agent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OperatingSystem {
    /// Windows NT 10.0, shared by Windows 10 and 11.
    Windows10,
    /// Any other Windows.
    Windows,
    /// macOS with the dotted version when present (e.g., "10.15").
    MacOs(Option<String>),
    /// Linux.
    Linux,
    /// Android.
    Android,
    /// iOS and iPadOS.
    Ios,
    #[default]
    /// Unknown.
    Unknown,
}

#[derive(Clone, Copy)]
enum Family {
    Windows10,
    Windows,
    MacOs,
    Linux,
    Android,
    Ios,
}

/// Ordered markers, first match wins.
const OS_MARKERS: &[(&str, Family)] = &[
    ("Windows NT 10.0", Family::Windows10),
    ("Windows", Family::Windows),
    ("Mac OS X", Family::MacOs),
    ("Linux", Family::Linux),
    ("Android", Family::Android),
    ("iOS", Family::Ios),
    ("iPhone", Family::Ios),
    ("iPad", Family::Ios),
];

const MAC_VERSION_TOKEN: &str = "Mac OS X ";

impl OperatingSystem {
    /// The label stored on the metadata record.
    pub fn label(&self) -> String {
        match self {
            OperatingSystem::Windows10 => "Windows 10/11".into(),
            OperatingSystem::Windows => "Windows".into(),
            OperatingSystem::MacOs(Some(version)) => format!("macOS {version}"),
            OperatingSystem::MacOs(None) => "macOS".into(),
            OperatingSystem::Linux => "Linux".into(),
            OperatingSystem::Android => "Android".into(),
            OperatingSystem::Ios => "iOS".into(),
            OperatingSystem::Unknown => "Unknown".into(),
        }
    }
}

impl std::fmt::Display for OperatingSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

/// Classify the operating system of a user-agent.
///
/// Markers are checked in a fixed order, so Android user-agents (which carry `Linux`)
/// resolve to [`OperatingSystem::Linux`] and iOS user-agents (`like Mac OS X`) to macOS.
pub fn detect_os(user_agent: &str) -> OperatingSystem {
    let family = OS_MARKERS
        .iter()
        .find(|(marker, _)| user_agent.contains(marker))
        .map(|(_, family)| *family);

    match family {
        Some(Family::Windows10) => OperatingSystem::Windows10,
        Some(Family::Windows) => OperatingSystem::Windows,
        Some(Family::MacOs) => OperatingSystem::MacOs(mac_version(user_agent)),
        Some(Family::Linux) => OperatingSystem::Linux,
        Some(Family::Android) => OperatingSystem::Android,
        Some(Family::Ios) => OperatingSystem::Ios,
        None => OperatingSystem::Unknown,
    }
}

/// Read `<major>[._]<minor>` after "Mac OS X " with the separator normalized to a period.
fn mac_version(user_agent: &str) -> Option<String> {
    user_agent
        .match_indices(MAC_VERSION_TOKEN)
        .find_map(|(pos, _)| {
            let bytes = &user_agent.as_bytes()[pos + MAC_VERSION_TOKEN.len()..];
            let major = digits(bytes);
            if major == 0 {
                return None;
            }
            match bytes.get(major) {
                Some(b'.') | Some(b'_') => (),
                _ => return None,
            }
            let minor = digits(&bytes[major + 1..]);
            if minor == 0 {
                return None;
            }
            let start = pos + MAC_VERSION_TOKEN.len();
            Some(format!(
                "{}.{}",
                &user_agent[start..start + major],
                &user_agent[start + major + 1..start + major + 1 + minor]
            ))
        })
}

#[inline]
fn digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
