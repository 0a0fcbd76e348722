use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;

use crate::time::holiday::holiday::Holiday;
use crate::time::holiday::holidaycollection::HolidayCollection;
use crate::time::holiday::holidayerror::{HolidayError, HolidayResult};
use crate::time::weekdaymask::WeekdayMask;

/// Computes the holidays of one jurisdiction for any year.
///
/// Implementations hold no year-scoped state: every `compute` call is
/// independent, so a provider can be shared across threads.
pub trait HolidayProvider: Send + Sync {
    fn id(&self) -> &str;

    fn timezone(&self) -> Tz;

    fn weekend_days(&self) -> WeekdayMask;

    fn compute(&self, year: i32) -> HolidayResult<HolidayCollection>;

    fn is_holiday(&self, d: NaiveDate) -> HolidayResult<bool> {
        Ok(self.compute(d.year())?.contains_date(d))
    }

    fn is_working_day(&self, d: NaiveDate) -> HolidayResult<bool> {
        if self.weekend_days().contains(d.weekday()) {
            return Ok(false);
        }
        Ok(!self.is_holiday(d)?)
    }

    /// The holiday `key` in the year after `year`, if it exists there.
    fn next(&self, key: &str, year: i32) -> HolidayResult<Option<Holiday>> {
        let next_year = year.checked_add(1).ok_or(HolidayError::InvalidYear { year })?;
        Ok(self.compute(next_year)?.get(key).cloned())
    }

    /// The holiday `key` in the year before `year`, if it exists there.
    fn previous(&self, key: &str, year: i32) -> HolidayResult<Option<Holiday>> {
        let previous_year = year.checked_sub(1).ok_or(HolidayError::InvalidYear { year })?;
        Ok(self.compute(previous_year)?.get(key).cloned())
    }
}
