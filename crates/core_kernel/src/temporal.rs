//! Calendar date handling
//!
//! This module provides:
//! - The business timezone used to decide what "today" is for an invoice
//! - Locale-aware rendering of calendar dates
//! - Lenient parsing of the date strings the backend sends

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use thiserror::Error;
use unic_langid::LanguageIdentifier;

/// Timezone wrapper for the institute's business day
///
/// Wraps chrono_tz::Tz with custom serialization support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timezone(pub Tz);

impl Serialize for Timezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0.name())
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Timezone::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl FromStr for Timezone {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tz::from_str(s.trim())
            .map(Timezone)
            .map_err(|_| TemporalError::InvalidTimezone(s.to_string()))
    }
}

impl Timezone {
    pub fn new(tz: Tz) -> Self {
        Self(tz)
    }

    /// Returns the calendar date in this timezone at the given instant
    pub fn date_at(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.0).date_naive()
    }

    /// Returns today's calendar date in this timezone
    pub fn today(&self) -> NaiveDate {
        self.date_at(Utc::now())
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self(chrono_tz::Asia::Kolkata)
    }
}

/// Errors related to dates, timezones and locales
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid locale: {0}")]
    InvalidLocale(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

/// Locale used to render calendar dates for display
///
/// The pattern follows the short numeric date style of the locale's region:
/// month-first for the US, year-first for East Asian languages, dotted for
/// most continental European languages, and day-first otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateLocale {
    langid: LanguageIdentifier,
}

impl DateLocale {
    /// Parses a BCP-47 tag such as `en-IN`
    pub fn parse(tag: &str) -> Result<Self, TemporalError> {
        let langid: LanguageIdentifier = tag
            .trim()
            .parse()
            .map_err(|_| TemporalError::InvalidLocale(tag.to_string()))?;
        Ok(Self { langid })
    }

    /// Returns the locale tag, e.g. `en-IN`
    pub fn tag(&self) -> String {
        self.langid.to_string()
    }

    /// Returns the chrono format pattern for this locale
    pub fn pattern(&self) -> &'static str {
        let language = self.langid.language.as_str();
        let region = self.langid.region.as_ref().map(|r| r.as_str());

        match (language, region) {
            ("en", None) | ("en", Some("US")) | (_, Some("US")) => "%-m/%-d/%Y",
            ("en", Some("IN")) | ("hi", _) => "%-d/%-m/%Y",
            ("ja", _) | ("zh", _) | ("ko", _) => "%Y/%m/%d",
            ("de", _) | ("ru", _) | ("pl", _) | ("tr", _) | ("fi", _) | ("nb", _) | ("cs", _) => {
                "%d.%m.%Y"
            }
            ("sv", _) | ("lt", _) => "%Y-%m-%d",
            _ => "%d/%m/%Y",
        }
    }

    /// Renders a calendar date for display
    pub fn format(&self, date: NaiveDate) -> String {
        date.format(self.pattern()).to_string()
    }
}

impl Default for DateLocale {
    fn default() -> Self {
        Self {
            langid: unic_langid::langid!("en-IN"),
        }
    }
}

impl FromStr for DateLocale {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateLocale::parse(s)
    }
}

/// Parses a calendar date from either `YYYY-MM-DD` or an RFC 3339 timestamp
///
/// Timestamps keep the date portion as written, matching how a date picker
/// value round-trips through the backend.
pub fn parse_calendar_date(input: &str) -> Result<NaiveDate, TemporalError> {
    let trimmed = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(instant.date_naive());
    }
    match trimmed.get(..10) {
        Some(prefix) if trimmed.len() > 10 => NaiveDate::parse_from_str(prefix, "%Y-%m-%d")
            .map_err(|_| TemporalError::InvalidDate(input.to_string())),
        _ => Err(TemporalError::InvalidDate(input.to_string())),
    }
}

/// Serde adapter for optional calendar dates sent as strings
///
/// Empty strings and `null` both deserialize to `None`.
pub mod optional_calendar_date {
    use super::parse_calendar_date;
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => parse_calendar_date(text)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}
