use chrono::{TimeZone, Utc};
use mail_digest::*;

#[test]
fn test_parse_standard_date() {
    let parsed = parse_received_at("Mon, 02 Jan 2023 10:00:00 +0000").unwrap();

    assert_eq!(
        parsed.with_timezone(&Utc),
        Utc.with_ymd_and_hms(2023, 1, 2, 10, 0, 0).unwrap()
    );
}

#[test]
fn test_parse_keeps_offset() {
    let parsed = parse_received_at("Tue, 03 Jan 2023 08:30:00 -0700").unwrap();

    assert_eq!(parsed.offset().local_minus_utc(), -7 * 3600);
    assert_eq!(
        parsed.with_timezone(&Utc),
        Utc.with_ymd_and_hms(2023, 1, 3, 15, 30, 0).unwrap()
    );
}

#[test]
fn test_parse_trims_whitespace() {
    assert!(parse_received_at("  Mon, 02 Jan 2023 10:00:00 +0000 ").is_some());
}

#[test]
fn test_parse_without_weekday() {
    let parsed = parse_received_at("2 Jan 2023 10:00:00 +0000").unwrap();

    assert_eq!(
        parsed.with_timezone(&Utc),
        Utc.with_ymd_and_hms(2023, 1, 2, 10, 0, 0).unwrap()
    );
}

#[test]
fn test_parse_invalid_is_absent() {
    assert!(parse_received_at("not-a-date").is_none());
    assert!(parse_received_at("").is_none());
    assert!(parse_received_at("   ").is_none());
    assert!(parse_received_at("2023-01-02").is_none());
}

#[test]
fn test_mismatched_weekday_rejected() {
    // 2 Jan 2023 was a Monday
    assert!(parse_received_at("Tue, 02 Jan 2023 10:00:00 +0000").is_none());
}

#[test]
fn test_strict_parse_reports_error() {
    assert!(matches!(
        parse_date_strict("not-a-date"),
        Err(Error::InvalidDate(_))
    ));
    assert!(matches!(parse_date_strict(""), Err(Error::InvalidDate(_))));
}
