//! Age and next-birthday computation.

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};

use crate::dates::{DateError, DateTriple};

/// Average month length used to convert the birthday distance into months.
pub const DAYS_PER_MONTH: f64 = 30.44;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Age in whole years and rounded distance to the next birthday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeResult {
    pub age: u32,
    pub months_until_birthday: i64,
}

impl AgeResult {
    /// Human readable distance, e.g. `in 1 month` or `in 12 months`.
    pub fn next_birthday_description(&self) -> String {
        let unit = if self.months_until_birthday == 1 { "month" } else { "months" };
        format!("in {} {}", self.months_until_birthday, unit)
    }
}

/// Compute against the local wall clock.
pub fn age_now(triple: &DateTriple) -> Result<AgeResult, DateError> {
    age_at(triple, Local::now().naive_local())
}

/// Compute age and next birthday as seen at `now`.
///
/// Fails with [`DateError::InvalidDate`] only when the triple is not a real
/// calendar date. A birth date after `now` yields age 0.
pub fn age_at(triple: &DateTriple, now: NaiveDateTime) -> Result<AgeResult, DateError> {
    let birth = NaiveDate::from_ymd_opt(triple.birth_year(), triple.month, triple.day)
        .ok_or(DateError::InvalidDate)?;

    let this_year = occurrence(now.year(), birth)?;

    let mut age = now.year() - birth.year();
    if now < this_year {
        age -= 1;
    }

    let next = if now >= this_year {
        occurrence(now.year() + 1, birth)?
    } else {
        this_year
    };

    let millis = (next - now).num_milliseconds() as f64;
    let months = (millis / (MILLIS_PER_DAY * DAYS_PER_MONTH)).round() as i64;

    Ok(AgeResult {
        age: u32::try_from(age.max(0)).unwrap_or(0),
        months_until_birthday: months,
    })
}

/// Midnight of the birthday in `year`. Feb 29 falls on Mar 1 outside leap years.
fn occurrence(year: i32, birth: NaiveDate) -> Result<NaiveDateTime, DateError> {
    NaiveDate::from_ymd_opt(year, birth.month(), birth.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or(DateError::InvalidDate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn triple(m: &str, d: &str, y: &str) -> DateTriple {
        DateTriple::parse(m, d, y).unwrap()
    }

    #[test]
    fn test_birthday_passed_rolls_to_next_year() {
        let result = age_at(&triple("06", "14", "00"), at(2024, 6, 15, 12)).unwrap();
        assert_eq!(result.age, 24);
        assert_eq!(result.months_until_birthday, 12);
        assert_eq!(result.next_birthday_description(), "in 12 months");
    }

    #[test]
    fn test_birthday_tomorrow() {
        let result = age_at(&triple("06", "16", "00"), at(2024, 6, 15, 12)).unwrap();
        assert_eq!(result.age, 23);
        assert_eq!(result.months_until_birthday, 0);
        assert_eq!(result.next_birthday_description(), "in 0 months");
    }

    #[test]
    fn test_birthday_today_counts_as_reached() {
        let result = age_at(&triple("06", "15", "04"), at(2024, 6, 15, 0)).unwrap();
        assert_eq!(result.age, 20);
        assert_eq!(result.months_until_birthday, 12);
    }

    #[test]
    fn test_singular_month() {
        let result = age_at(&triple("07", "15", "10"), at(2024, 6, 15, 0)).unwrap();
        assert_eq!(result.age, 13);
        assert_eq!(result.next_birthday_description(), "in 1 month");
    }

    #[test]
    fn test_impossible_dates_are_rejected() {
        let now = at(2024, 6, 15, 12);
        for (m, d, y) in [("02", "30", "24"), ("13", "01", "24"), ("00", "10", "10"), ("04", "31", "10"), ("02", "29", "23")] {
            assert_eq!(age_at(&triple(m, d, y), now), Err(DateError::InvalidDate), "{m}/{d}/{y}");
        }
    }

    #[test]
    fn test_future_birth_date_has_age_zero() {
        let now = at(2024, 6, 15, 12);

        let result = age_at(&triple("01", "01", "99"), now).unwrap();
        assert_eq!(result.age, 0);
        assert_eq!(result.next_birthday_description(), "in 7 months");

        let result = age_at(&triple("06", "16", "24"), now).unwrap();
        assert_eq!(result.age, 0);
        assert_eq!(result.next_birthday_description(), "in 0 months");

        let now = at(2026, 10, 19, 12);
        for (m, d, y) in [("01", "01", "27"), ("01", "01", "50"), ("01", "01", "99"), ("12", "01", "26")] {
            let result = age_at(&triple(m, d, y), now).unwrap();
            assert_eq!(result.age, 0, "{m}/{d}/{y}");
        }
    }

    #[test]
    fn test_leap_day_birthday_outside_leap_year() {
        let result = age_at(&triple("02", "29", "04"), at(2025, 2, 28, 12)).unwrap();
        assert_eq!(result.age, 20);
        assert_eq!(result.months_until_birthday, 0);

        let result = age_at(&triple("02", "29", "04"), at(2025, 3, 1, 12)).unwrap();
        assert_eq!(result.age, 21);
    }

    #[test]
    fn test_every_valid_date_yields_well_formed_result() {
        let now = at(2024, 6, 15, 12);
        for year in 0..=99u32 {
            for month in 1..=12u32 {
                for day in 1..=31u32 {
                    let candidate = DateTriple { month, day, year };
                    let is_calendar_date =
                        NaiveDate::from_ymd_opt(candidate.birth_year(), month, day).is_some();
                    let Ok(result) = age_at(&candidate, now) else {
                        assert!(!is_calendar_date, "{month}/{day}/{year} rejected");
                        continue;
                    };
                    assert!(is_calendar_date);
                    assert!(result.age <= 24);
                    assert!((0..=12).contains(&result.months_until_birthday));
                    let expected_unit = if result.months_until_birthday == 1 { "month" } else { "months" };
                    assert_eq!(
                        result.next_birthday_description(),
                        format!("in {} {}", result.months_until_birthday, expected_unit)
                    );
                }
            }
        }
    }
}
