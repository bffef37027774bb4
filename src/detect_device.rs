use crate::{is_mobile_user_agent, is_tablet_user_agent, DeviceType};

/// Classify the device type of a user-agent.
///
/// The tablet test runs first, then the mobile test, otherwise desktop.
pub fn detect_device(user_agent: &str) -> DeviceType {
    if is_tablet_user_agent(user_agent) {
        DeviceType::Tablet
    } else if is_mobile_user_agent(user_agent) {
        DeviceType::Mobile
    } else {
        DeviceType::Desktop
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn android_without_mobi_is_a_tablet() {
        let ua = "Mozilla/5.0 (Linux; Android 13; SM-X700) AppleWebKit/537.36";
        assert_eq!(detect_device(ua), DeviceType::Tablet);
        assert_eq!(detect_device(&format!("{ua} Mobi")), DeviceType::Mobile);
    }

    #[test]
    fn phones() {
        let iphone = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) \
            AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
        let pixel = "Mozilla/5.0 (Linux; Android 14; Pixel 8) \
            AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36";
        let opera_mini = "Opera/9.80 (J2ME/MIDP; Opera Mini/9.80/37.8) Presto/2.12.423 Version/12.16";

        for ua in [iphone, pixel, opera_mini] {
            assert_eq!(detect_device(ua), DeviceType::Mobile, "{ua}");
        }
    }

    #[test]
    fn tablets_before_mobile() {
        let ipad = "Mozilla/5.0 (iPad; CPU OS 17_0 like Mac OS X) Mobile/15E148";
        assert_eq!(detect_device(ipad), DeviceType::Tablet);
        assert_eq!(detect_device("PlayBook; U; RIM Tablet OS"), DeviceType::Tablet);
    }

    #[test]
    fn desktop_default() {
        assert_eq!(detect_device(""), DeviceType::Desktop);
        let mac = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
            (KHTML, like Gecko) Chrome/139.0.0.0 Safari/537.36";
        assert_eq!(detect_device(mac), DeviceType::Desktop);
    }
}
