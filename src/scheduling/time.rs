//! Minute-resolution clock time.
//!
//! All schedule arithmetic runs on minutes since midnight rather than on
//! `HH:mm` strings; parsing and formatting happen only at the API
//! boundary. The value 1440 (`24:00`) is the exclusive end-of-day bound
//! and can only be produced by arithmetic, never by parsing.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use super::error::ScheduleError;

pub const MINUTES_PER_DAY: i16 = 1440;

/// A time of day with minute resolution, stored as minutes since
/// midnight. Maps transparently onto a `SMALLINT` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, sqlx::Type)]
#[sqlx(transparent)]
pub struct TimeOfDay(i16);

impl TimeOfDay {
    /// Builds a time from raw minutes. Accepts the full `0..=1440` range
    /// so computed interval ends may land exactly on midnight.
    pub fn from_minutes(minutes: i16) -> Result<Self, ScheduleError> {
        if (0..=MINUTES_PER_DAY).contains(&minutes) {
            Ok(Self(minutes))
        } else {
            Err(ScheduleError::InvalidFormat(format!(
                "{minutes} minutes is outside a single day"
            )))
        }
    }

    pub fn as_minutes(self) -> i16 {
        self.0
    }

    pub fn hour(self) -> i16 {
        self.0 / 60
    }

    pub fn minute(self) -> i16 {
        self.0 % 60
    }

    /// Advances by `minutes`, returning `None` when the result would pass
    /// the end of the day.
    pub fn add_minutes(self, minutes: i32) -> Option<Self> {
        let total = i32::from(self.0) + minutes;
        if (0..=i32::from(MINUTES_PER_DAY)).contains(&total) {
            Some(Self(total as i16))
        } else {
            None
        }
    }

    /// Minutes from `self` to `other` (negative when `other` is earlier).
    pub fn minutes_until(self, other: TimeOfDay) -> i32 {
        i32::from(other.0) - i32::from(self.0)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = ScheduleError;

    /// Parses strict `HH:mm` (zero-padded, 00:00 through 23:59).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ScheduleError::InvalidFormat(format!("expected HH:mm, got {s:?}"));

        let (hours, minutes) = s.split_once(':').ok_or_else(invalid)?;
        if hours.len() != 2 || minutes.len() != 2 {
            return Err(invalid());
        }
        let h: i16 = hours.parse().map_err(|_| invalid())?;
        let m: i16 = minutes.parse().map_err(|_| invalid())?;
        if !(0..24).contains(&h) || !(0..60).contains(&m) {
            return Err(invalid());
        }
        Ok(Self(h * 60 + m))
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|e: ScheduleError| de::Error::custom(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    #[test]
    fn parses_and_formats_hh_mm() {
        assert_eq!(t("07:30").as_minutes(), 450);
        assert_eq!(t("00:00").as_minutes(), 0);
        assert_eq!(t("23:59").as_minutes(), 1439);
        assert_eq!(t("07:30").to_string(), "07:30");
        assert_eq!(t("23:59").to_string(), "23:59");
    }

    #[test]
    fn rejects_malformed_input() {
        for bad in ["", "7:30", "07:3", "24:00", "12:60", "ab:cd", "12-30", "12:30:00"] {
            assert!(
                bad.parse::<TimeOfDay>().is_err(),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn ordering_follows_the_clock() {
        assert!(t("07:30") < t("08:20"));
        assert!(t("13:00") > t("12:59"));
        assert_eq!(t("10:00"), t("10:00"));
    }

    #[test]
    fn arithmetic_is_checked_at_midnight() {
        assert_eq!(t("07:30").add_minutes(50), Some(t("08:20")));
        // 23:10 + 50 lands exactly on the exclusive end-of-day bound.
        let end = t("23:10").add_minutes(50).unwrap();
        assert_eq!(end.as_minutes(), 1440);
        assert_eq!(end.to_string(), "24:00");
        // One minute further is out of range.
        assert_eq!(t("23:11").add_minutes(50), None);
        assert_eq!(t("00:10").add_minutes(-20), None);
    }

    #[test]
    fn minutes_until_is_signed() {
        assert_eq!(t("07:30").minutes_until(t("08:20")), 50);
        assert_eq!(t("08:20").minutes_until(t("07:30")), -50);
    }

    #[test]
    fn serde_round_trips_as_string() {
        let json = serde_json::to_string(&t("08:20")).unwrap();
        assert_eq!(json, "\"08:20\"");
        let back: TimeOfDay = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t("08:20"));
        assert!(serde_json::from_str::<TimeOfDay>("\"25:00\"").is_err());
    }
}
