use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// First full year of the Gregorian calendar; Easter is not computed before it.
pub const EASTER_FIRST_YEAR: i32 = 1583;

#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash, Serialize, Deserialize)]
pub enum EasterType {
    Western,
    Orthodox
}

/// Easter Sunday for `year` in the Gregorian calendar, or `None` before
/// [`EASTER_FIRST_YEAR`].
///
/// The Orthodox date drifts later as the Julian calendar falls behind, and
/// eventually leaves the year it belongs to.
pub fn easter_sunday(year: i32, easter_type: EasterType) -> Option<NaiveDate> {
    if year < EASTER_FIRST_YEAR {
        return None;
    }

    let g = year % 19;

    let p = match easter_type {
        EasterType::Orthodox => {
            let i = (19 * g + 15) % 30;
            let j = (year + year / 4 + i) % 7;
            // Julian to Gregorian correction
            let e = if year <= 1600 {
                10
            } else {
                10 + year / 100 - 16 - (year / 100 - 16) / 4
            };
            i - j + e
        },
        EasterType::Western => {
            let c = year / 100;
            let c_div_4 = c / 4;
            let h = (c - c_div_4 - (8 * c + 13) / 25 + 19 * g + 15) % 30;
            let h_div_28 = h / 28;
            let i = h - h_div_28 * (1 - h_div_28 * (29 / (h + 1)) * ((21 - g) / 11));
            let j = (year + year / 4 + i + 2 - c + c_div_4) % 7;
            i - j
        }
    };

    // p counts days from March 28
    NaiveDate::from_ymd_opt(year, 3, 28)?.checked_add_signed(Duration::try_days(p as i64)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Weekday};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_western_easter() {
        assert_eq!(easter_sunday(2021, EasterType::Western), Some(ymd(2021, 4, 4)));
        assert_eq!(easter_sunday(2024, EasterType::Western), Some(ymd(2024, 3, 31)));
        assert_eq!(easter_sunday(2019, EasterType::Western), Some(ymd(2019, 4, 21)));
    }

    #[test]
    fn test_orthodox_easter() {
        assert_eq!(easter_sunday(2021, EasterType::Orthodox), Some(ymd(2021, 5, 2)));
        assert_eq!(easter_sunday(2024, EasterType::Orthodox), Some(ymd(2024, 5, 5)));
    }

    #[test]
    fn test_years_before_gregorian_calendar() {
        assert_eq!(easter_sunday(1582, EasterType::Western), None);
        assert_eq!(easter_sunday(1, EasterType::Orthodox), None);
        assert!(easter_sunday(EASTER_FIRST_YEAR, EasterType::Western).is_some());
    }

    #[test]
    fn test_far_future_years() {
        assert_eq!(easter_sunday(4100, EasterType::Western), Some(ymd(4100, 4, 11)));
        for year in [4100, 5000, 9999, 20000] {
            for easter_type in [EasterType::Western, EasterType::Orthodox] {
                let date = easter_sunday(year, easter_type).unwrap();
                assert_eq!(date.weekday(), Weekday::Sun, "{:?} {}", easter_type, year);
                assert_eq!(date.year(), year);
            }
        }
    }

    #[test]
    fn test_always_a_sunday_between_march_22_and_may_31() {
        for year in EASTER_FIRST_YEAR..3000 {
            let western = easter_sunday(year, EasterType::Western).unwrap();
            assert_eq!(western.weekday(), Weekday::Sun);
            assert!(western >= ymd(year, 3, 22) && western <= ymd(year, 4, 25), "{}", western);

            let orthodox = easter_sunday(year, EasterType::Orthodox).unwrap();
            assert_eq!(orthodox.weekday(), Weekday::Sun);
            assert!(orthodox >= western, "{}", year);
        }
    }
}
