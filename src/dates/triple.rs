//! MM/DD/YY parsing.

use crate::dates::DateError;

/// A month/day/year triple as written in the request path.
///
/// Only the format is checked here; calendar validity is the engine's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTriple {
    pub month: u32,
    pub day: u32,
    /// Two-digit offset from 2000.
    pub year: u32,
}

impl DateTriple {
    /// Parse three path segments, each of which must be exactly two ASCII digits.
    pub fn parse(month: &str, day: &str, year: &str) -> Result<Self, DateError> {
        Ok(Self {
            month: two_digits(month)?,
            day: two_digits(day)?,
            year: two_digits(year)?,
        })
    }

    /// Full birth year after expansion.
    pub fn birth_year(&self) -> i32 {
        2000 + self.year as i32
    }
}

fn two_digits(segment: &str) -> Result<u32, DateError> {
    match segment.as_bytes() {
        [tens @ b'0'..=b'9', ones @ b'0'..=b'9'] => {
            Ok(u32::from(tens - b'0') * 10 + u32::from(ones - b'0'))
        }
        _ => Err(DateError::Format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let triple = DateTriple::parse("06", "14", "00").unwrap();
        assert_eq!(triple, DateTriple { month: 6, day: 14, year: 0 });
        assert_eq!(triple.birth_year(), 2000);
    }

    #[test]
    fn test_parse_keeps_out_of_range_values() {
        // 13/45 is well formed; the engine rejects it later.
        let triple = DateTriple::parse("13", "45", "99").unwrap();
        assert_eq!(triple.month, 13);
        assert_eq!(triple.birth_year(), 2099);
    }

    #[test]
    fn test_parse_rejects_bad_format() {
        for (m, d, y) in [
            ("1", "01", "00"),
            ("abc", "01", "00"),
            ("01", "001", "00"),
            ("01", "01", ""),
            ("0a", "01", "00"),
            ("+1", "01", "00"),
            ("٠١", "01", "00"),
        ] {
            assert_eq!(DateTriple::parse(m, d, y), Err(DateError::Format), "{m}/{d}/{y}");
        }
    }
}
