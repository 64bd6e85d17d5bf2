//! Tests for business dates, locales and date parsing

use chrono::{NaiveDate, TimeZone, Utc};
use core_kernel::{DateLocale, Timezone};
use core_kernel::temporal::{parse_calendar_date, TemporalError};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

mod timezone {
    use super::*;

    #[test]
    fn test_default_is_kolkata() {
        assert_eq!(Timezone::default().0.name(), "Asia/Kolkata");
    }

    #[test]
    fn test_parse_iana_name() {
        let tz: Timezone = "Europe/London".parse().unwrap();
        assert_eq!(tz.0.name(), "Europe/London");
    }

    #[test]
    fn test_parse_invalid_name() {
        let result = "Nowhere/Special".parse::<Timezone>();
        assert!(matches!(result, Err(TemporalError::InvalidTimezone(_))));
    }

    #[test]
    fn test_date_at_uses_local_calendar() {
        let tz: Timezone = "America/New_York".parse().unwrap();
        let instant = Utc.with_ymd_and_hms(2024, 1, 1, 2, 0, 0).unwrap();
        assert_eq!(tz.date_at(instant), date(2023, 12, 31));
    }

    #[test]
    fn test_serde_uses_iana_name() {
        let tz = Timezone::default();
        let json = serde_json::to_string(&tz).unwrap();
        assert_eq!(json, "\"Asia/Kolkata\"");
        let back: Timezone = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tz);
    }
}

mod locale {
    use super::*;

    #[test]
    fn test_default_locale_is_en_in() {
        let locale = DateLocale::default();
        assert_eq!(locale.tag(), "en-IN");
        assert_eq!(locale.format(date(2024, 12, 25)), "25/12/2024");
    }

    #[test]
    fn test_plain_english_is_month_first() {
        let locale = DateLocale::parse("en").unwrap();
        assert_eq!(locale.format(date(2024, 12, 25)), "12/25/2024");
    }

    #[test]
    fn test_japanese_is_year_first() {
        let locale = DateLocale::parse("ja-JP").unwrap();
        assert_eq!(locale.format(date(2024, 2, 3)), "2024/02/03");
    }

    #[test]
    fn test_unknown_language_falls_back_to_day_first() {
        let locale = DateLocale::parse("fr-FR").unwrap();
        assert_eq!(locale.format(date(2024, 2, 3)), "03/02/2024");
    }

    #[test]
    fn test_invalid_tag() {
        assert!(matches!(
            DateLocale::parse("not a locale!"),
            Err(TemporalError::InvalidLocale(_))
        ));
    }
}

mod parsing {
    use super::*;

    #[test]
    fn test_plain_date() {
        assert_eq!(parse_calendar_date("2024-05-01").unwrap(), date(2024, 5, 1));
    }

    #[test]
    fn test_rfc3339_timestamp() {
        assert_eq!(parse_calendar_date("2024-05-01T18:30:00.000Z").unwrap(), date(2024, 5, 1));
    }

    #[test]
    fn test_date_prefix_with_unusual_suffix() {
        assert_eq!(parse_calendar_date("2024-05-01 10:00").unwrap(), date(2024, 5, 1));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            parse_calendar_date("yesterday"),
            Err(TemporalError::InvalidDate(_))
        ));
    }
}
