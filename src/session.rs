use chrono::{DateTime, SecondsFormat, TimeZone, Timelike, Utc};

/// Coarse bucket of the local time of day.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DayPart {
    /// 05:00 up to noon.
    Morning,
    /// Noon up to 17:00.
    Afternoon,
    /// 17:00 up to 21:00.
    Evening,
    /// Everything else.
    Night,
}

impl DayPart {
    /// Bucket an hour of the day. Out of range hours land in [`DayPart::Night`].
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => DayPart::Morning,
            12..=16 => DayPart::Afternoon,
            17..=20 => DayPart::Evening,
            _ => DayPart::Night,
        }
    }

    /// Bucket the local hour of a timestamp.
    pub fn from_time<Tz: TimeZone>(time: &DateTime<Tz>) -> Self {
        Self::from_hour(time.hour())
    }

    /// The label stored on the metadata record.
    pub fn as_str(&self) -> &'static str {
        match self {
            DayPart::Morning => "Morning",
            DayPart::Afternoon => "Afternoon",
            DayPart::Evening => "Evening",
            DayPart::Night => "Night",
        }
    }
}

impl std::fmt::Display for DayPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ISO-8601 in UTC with millisecond precision, e.g. `2024-03-09T14:05:00.000Z`.
pub fn iso_timestamp<Tz: TimeZone>(time: &DateTime<Tz>) -> String {
    time.with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// English weekday name of the local date.
pub fn weekday_name<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.format("%A").to_string()
}
