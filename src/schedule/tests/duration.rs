use crate::duration::FlightDuration;
use crate::offset::UtcOffset;
use crate::schedule::calculator::{ScheduleCalculator, format_duration};
use crate::schedule::tests::utils::{t, utc};

#[test]
fn test_same_zone_same_day() {
    let calc = ScheduleCalculator::default();
    let d = calc.compute_duration(t("08:00"), t("10:00"), Some(utc(8.0)), Some(utc(8.0)));
    assert_eq!(FlightDuration(120), d);
}

#[test]
fn test_cross_midnight_wrap() {
    let calc = ScheduleCalculator::default();
    let d = calc.compute_duration(t("23:00"), t("01:00"), Some(utc(8.0)), Some(utc(8.0)));
    assert_eq!(FlightDuration(120), d);
}

#[test]
fn test_westbound_correction_after_wrap() {
    // 10:00 in UTC+9 is 01:00Z; 08:00 next day in UTC-5 is 13:00Z next day.
    let calc = ScheduleCalculator::default();
    let d = calc.compute_duration(t("10:00"), t("08:00"), Some(utc(9.0)), Some(utc(-5.0)));
    assert_eq!(FlightDuration(36 * 60), d);
}

#[test]
fn test_inverted_wall_clock_always_reads_as_next_day() {
    // Tokyo 17:00 -> Honolulu 06:00 on the same calendar day is 8h in the
    // air, but an earlier arrival reading is always taken as the next day.
    let calc = ScheduleCalculator::default();
    let d = calc.compute_duration(t("17:00"), t("06:00"), Some(utc(9.0)), Some(utc(-10.0)));
    assert_eq!(FlightDuration(32 * 60), d);
}

#[test]
fn test_eastbound_correction_shrinks_wall_clock() {
    // 22:00 in UTC-5 is 03:00Z; 06:00 next day in UTC+1 is 05:00Z: 2h.
    // The wall-clock reading looks like 8h, the offset delta removes 6h.
    let calc = ScheduleCalculator::default();
    let d = calc.compute_duration(t("22:00"), t("06:00"), Some(utc(-5.0)), Some(utc(1.0)));
    assert_eq!(FlightDuration(120), d);
}

#[test]
fn test_negative_correction_wraps_forward() {
    // 08:00 in UTC-10 -> 09:00 in UTC+14: the 24h offset delta exceeds the
    // 1h wall-clock difference.
    let calc = ScheduleCalculator::default();
    let d = calc.compute_duration(t("08:00"), t("09:00"), Some(utc(-10.0)), Some(utc(14.0)));
    assert_eq!(FlightDuration(60), d);
}

#[test]
fn test_correction_below_minus_one_day_still_non_negative() {
    // 60 - 26h = -1500 minutes; two wraps bring it back to 1380.
    let calc = ScheduleCalculator::default();
    let d = calc.compute_duration(t("08:00"), t("09:00"), Some(utc(-12.0)), Some(utc(14.0)));
    assert_eq!(FlightDuration(1380), d);
}

#[test]
fn test_half_hour_offset_contributes_330_minutes() {
    let calc = ScheduleCalculator::default();
    let d = calc.compute_duration(t("10:00"), t("20:00"), Some(utc(0.0)), Some(utc(5.5)));
    assert_eq!(FlightDuration(600 - 330), d);

    // Taipei -> Delhi: 2.5h of zone difference.
    let d = calc.compute_duration(t("09:00"), t("12:30"), Some(utc(8.0)), Some(utc(5.5)));
    assert_eq!(FlightDuration(210 + 150), d);
}

#[test]
fn test_missing_offsets_use_configured_default() {
    let calc = ScheduleCalculator::default();
    let d = calc.compute_duration(t("08:00"), t("10:00"), None, Some(utc(9.0)));
    assert_eq!(FlightDuration(60), d);

    let calc = ScheduleCalculator::new(utc(9.0));
    let d = calc.compute_duration(t("08:00"), t("10:00"), None, Some(utc(9.0)));
    assert_eq!(FlightDuration(120), d);
    assert_eq!(utc(9.0), calc.default_offset());

    let d = calc.compute_duration(t("08:00"), t("10:00"), None, None);
    assert_eq!(FlightDuration(120), d);
}

#[test]
fn test_default_calculator_assumes_utc_plus_8() {
    assert_eq!(UtcOffset::UTC_PLUS_8, ScheduleCalculator::default().default_offset());
}

#[test]
fn test_equal_times_mean_zero_not_a_day() {
    let calc = ScheduleCalculator::default();
    let d = calc.compute_duration(t("12:00"), t("12:00"), None, None);
    assert_eq!(FlightDuration(0), d);
}

#[test]
fn test_format_duration() {
    assert_eq!("2小時5分", format_duration(125));
    assert_eq!("0小時45分", format_duration(45));
    let calc = ScheduleCalculator::default();
    let d = calc.compute_duration(t("08:00"), t("10:05"), None, None);
    assert_eq!("2小時5分", d.to_string());
}
