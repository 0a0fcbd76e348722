use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::time::daterule::daterule::DateRuleError;
use crate::time::utility::is_valid_month;

#[derive(Deserialize)]
struct LastWeekdayOnOrBeforeRuleJsonProp {
    weekday: Weekday,
    month: u32,
    day: u32
}

/// The closest `weekday` on or before a fixed month/day of the same year.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "LastWeekdayOnOrBeforeRuleJsonProp")]
pub struct LastWeekdayOnOrBeforeRule {
    weekday: Weekday,
    month: u32,
    day: u32
}

impl LastWeekdayOnOrBeforeRule {
    pub fn new(weekday: Weekday, month: u32, day: u32) -> Result<LastWeekdayOnOrBeforeRule, DateRuleError> {
        if !is_valid_month(month) {
            return Err(DateRuleError::invalid_rule(format!("month {} is out of range", month)));
        }
        if !(1..=31).contains(&day) {
            return Err(DateRuleError::invalid_rule(format!("day {} is out of range", day)));
        }
        Ok(LastWeekdayOnOrBeforeRule { weekday, month, day })
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn evaluate(&self, year: i32) -> Result<NaiveDate, DateRuleError> {
        let no_such_date = || DateRuleError::NoSuchDate {
            year,
            reason: format!("anchor {:02}-{:02} does not exist", self.month, self.day)
        };

        let anchor = NaiveDate::from_ymd_opt(year, self.month, self.day).ok_or_else(no_such_date)?;
        let days_back = (anchor.weekday().num_days_from_monday() + 7
                         - self.weekday.num_days_from_monday()) % 7;
        anchor.checked_sub_days(Days::new(days_back as u64)).ok_or_else(no_such_date)
    }
}

impl TryFrom<LastWeekdayOnOrBeforeRuleJsonProp> for LastWeekdayOnOrBeforeRule {
    type Error = DateRuleError;

    fn try_from(json_prop: LastWeekdayOnOrBeforeRuleJsonProp) -> Result<Self, Self::Error> {
        LastWeekdayOnOrBeforeRule::new(json_prop.weekday, json_prop.month, json_prop.day)
    }
}
