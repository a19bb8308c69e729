//! Trading-day keys.
//!
//! The provider reports each trading day as an 8-digit `YYYYMMDD` numeral
//! (`dEven`). Keeping the numeral as the key means numeric order, string
//! order and chronological order all agree, so sorting never needs a
//! calendar.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateKeyError {
    #[error("date key must be exactly 8 digits, got '{0}'")]
    Malformed(String),

    #[error("date key {0} is not a calendar date")]
    InvalidDate(u32),
}

/// An 8-digit `YYYYMMDD` trading-day key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(u32);

impl DateKey {
    /// Build a key from its numeric form, validating the calendar date.
    pub fn new(value: u32) -> Result<Self, DateKeyError> {
        if !(10_000_101..=99_991_231).contains(&value) {
            return Err(DateKeyError::Malformed(value.to_string()));
        }
        let key = Self(value);
        if key.to_naive_date().is_none() {
            return Err(DateKeyError::InvalidDate(value));
        }
        Ok(key)
    }

    /// Build a key from calendar parts. Parts that cannot form an 8-digit
    /// key are `Malformed`, never an overflow.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateKeyError> {
        if month > 99 || day > 99 {
            return Err(DateKeyError::Malformed(format!("{year:04}{month:02}{day:02}")));
        }
        let value = u32::try_from(year)
            .ok()
            .and_then(|y| y.checked_mul(10_000))
            .and_then(|y| y.checked_add(month * 100 + day))
            .ok_or_else(|| DateKeyError::Malformed(format!("{year:04}{month:02}{day:02}")))?;
        Self::new(value)
    }

    pub fn value(self) -> u32 {
        self.0
    }

    pub fn year(self) -> i32 {
        (self.0 / 10_000) as i32
    }

    pub fn month(self) -> u32 {
        (self.0 / 100) % 100
    }

    pub fn day(self) -> u32 {
        self.0 % 100
    }

    pub fn to_naive_date(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year(), self.month(), self.day())
    }

    /// The same day on the Solar Hijri (Jalali) calendar.
    pub fn to_jalali(self) -> JalaliDate {
        gregorian_to_jalali(self.year() as i64, self.month() as i64, self.day() as i64)
    }
}

impl TryFrom<NaiveDate> for DateKey {
    type Error = DateKeyError;

    fn try_from(date: NaiveDate) -> Result<Self, Self::Error> {
        Self::from_ymd(date.year(), date.month(), date.day())
    }
}

impl std::str::FromStr for DateKey {
    type Err = DateKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DateKeyError::Malformed(s.to_string()));
        }
        let value: u32 = s
            .parse()
            .map_err(|_| DateKeyError::Malformed(s.to_string()))?;
        Self::new(value)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08}", self.0)
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.0)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Number(u64),
            Text(String),
        }

        let parsed = match Wire::deserialize(deserializer)? {
            Wire::Number(n) => u32::try_from(n)
                .map_err(|_| DateKeyError::Malformed(n.to_string()))
                .and_then(DateKey::new),
            Wire::Text(s) => s.parse(),
        };
        parsed.map_err(serde::de::Error::custom)
    }
}

/// A day on the Solar Hijri calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct JalaliDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl fmt::Display for JalaliDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

// Arithmetic conversion over the 33-year cycle; exact for the range the
// exchange has traded in.
fn gregorian_to_jalali(gy: i64, gm: i64, gd: i64) -> JalaliDate {
    const DAYS_BEFORE_MONTH: [i64; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

    let gy2 = if gm > 2 { gy + 1 } else { gy };
    let mut days = 355_666 + 365 * gy + (gy2 + 3) / 4 - (gy2 + 99) / 100 + (gy2 + 399) / 400
        + gd
        + DAYS_BEFORE_MONTH[(gm - 1) as usize];

    let mut jy = -1595 + 33 * (days / 12_053);
    days %= 12_053;
    jy += 4 * (days / 1461);
    days %= 1461;
    if days > 365 {
        jy += (days - 1) / 365;
        days = (days - 1) % 365;
    }

    let (jm, jd) = if days < 186 {
        (1 + days / 31, 1 + days % 31)
    } else {
        (7 + (days - 186) / 30, 1 + (days - 186) % 30)
    };

    JalaliDate {
        year: jy as i32,
        month: jm as u32,
        day: jd as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_eight_digit_string() {
        let key: DateKey = "20230521".parse().unwrap();
        assert_eq!(key.value(), 20_230_521);
        assert_eq!(key.year(), 2023);
        assert_eq!(key.month(), 5);
        assert_eq!(key.day(), 21);
    }

    #[test]
    fn rejects_wrong_length_and_non_digits() {
        assert!(matches!("2023052".parse::<DateKey>(), Err(DateKeyError::Malformed(_))));
        assert!(matches!("2023-05-2".parse::<DateKey>(), Err(DateKeyError::Malformed(_))));
        assert!(matches!("202305211".parse::<DateKey>(), Err(DateKeyError::Malformed(_))));
    }

    #[test]
    fn rejects_impossible_calendar_dates() {
        assert_eq!(DateKey::new(20230230), Err(DateKeyError::InvalidDate(20230230)));
        assert_eq!(DateKey::new(20231301), Err(DateKeyError::InvalidDate(20231301)));
    }

    #[test]
    fn order_is_chronological() {
        let a = DateKey::new(20221231).unwrap();
        let b = DateKey::new(20230101).unwrap();
        assert!(a < b);
        assert!(a.to_string() < b.to_string());
    }

    #[test]
    fn converts_to_naive_date_and_back() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let key = DateKey::try_from(date).unwrap();
        assert_eq!(key.value(), 20240229);
        assert_eq!(key.to_naive_date(), Some(date));
    }

    #[test]
    fn dates_outside_eight_digits_are_rejected() {
        let early = NaiveDate::from_ymd_opt(999, 12, 31).unwrap();
        assert_eq!(
            DateKey::try_from(early),
            Err(DateKeyError::Malformed("9991231".to_string()))
        );
        let negative = NaiveDate::from_ymd_opt(-5, 1, 1).unwrap();
        assert!(matches!(DateKey::try_from(negative), Err(DateKeyError::Malformed(_))));
    }

    #[test]
    fn from_ymd_rejects_out_of_range_parts() {
        assert_eq!(DateKey::from_ymd(2023, 5, 21), Ok(DateKey::new(20230521).unwrap()));
        assert!(matches!(DateKey::from_ymd(2023, 50_000_000, 1), Err(DateKeyError::Malformed(_))));
        assert!(matches!(DateKey::from_ymd(2023, 1, u32::MAX), Err(DateKeyError::Malformed(_))));
        assert!(matches!(DateKey::from_ymd(i32::MAX, 1, 1), Err(DateKeyError::Malformed(_))));
        assert_eq!(DateKey::from_ymd(2023, 2, 30), Err(DateKeyError::InvalidDate(20230230)));
    }

    #[test]
    fn nowruz_maps_to_first_of_farvardin() {
        assert_eq!(
            DateKey::new(20230321).unwrap().to_jalali(),
            JalaliDate { year: 1402, month: 1, day: 1 }
        );
        assert_eq!(
            DateKey::new(20200320).unwrap().to_jalali(),
            JalaliDate { year: 1399, month: 1, day: 1 }
        );
    }

    #[test]
    fn jalali_display_is_zero_padded() {
        let j = DateKey::new(20230321).unwrap().to_jalali();
        assert_eq!(j.to_string(), "1402-01-01");
    }

    #[test]
    fn deserializes_from_number_or_string() {
        let a: DateKey = serde_json::from_str("20230521").unwrap();
        let b: DateKey = serde_json::from_str("\"20230521\"").unwrap();
        assert_eq!(a, b);
        assert!(serde_json::from_str::<DateKey>("\"yesterday\"").is_err());
    }

    #[test]
    fn serializes_as_number() {
        let key = DateKey::new(20230521).unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), "20230521");
    }
}
