use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::time::daterule::daterule::DateRuleError;
use crate::time::utility::{days_of_month, is_valid_month};

#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash, Serialize, Deserialize)]
pub enum WeekdayOrdinal {
    First,
    Second,
    Third,
    Fourth,
    Fifth,
    Last
}

impl WeekdayOrdinal {
    /// 1-based position within the month, `None` for `Last`.
    pub fn position(&self) -> Option<u8> {
        match self {
            WeekdayOrdinal::First => Some(1),
            WeekdayOrdinal::Second => Some(2),
            WeekdayOrdinal::Third => Some(3),
            WeekdayOrdinal::Fourth => Some(4),
            WeekdayOrdinal::Fifth => Some(5),
            WeekdayOrdinal::Last => None
        }
    }
}

impl std::fmt::Display for WeekdayOrdinal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            WeekdayOrdinal::First => "first",
            WeekdayOrdinal::Second => "second",
            WeekdayOrdinal::Third => "third",
            WeekdayOrdinal::Fourth => "fourth",
            WeekdayOrdinal::Fifth => "fifth",
            WeekdayOrdinal::Last => "last"
        };
        write!(f, "{}", s)
    }
}

#[derive(Deserialize)]
struct NthWeekdayRuleJsonProp {
    month: u32,
    weekday: Weekday,
    ordinal: WeekdayOrdinal
}

/// "Third Monday of February", "last Monday of May".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "NthWeekdayRuleJsonProp")]
pub struct NthWeekdayRule {
    month: u32,
    weekday: Weekday,
    ordinal: WeekdayOrdinal
}

impl NthWeekdayRule {
    pub fn new(month: u32, weekday: Weekday, ordinal: WeekdayOrdinal) -> Result<NthWeekdayRule, DateRuleError> {
        if !is_valid_month(month) {
            return Err(DateRuleError::invalid_rule(format!("month {} is out of range", month)));
        }
        Ok(NthWeekdayRule { month, weekday, ordinal })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    pub fn ordinal(&self) -> WeekdayOrdinal {
        self.ordinal
    }

    pub fn evaluate(&self, year: i32) -> Result<NaiveDate, DateRuleError> {
        let date = match self.ordinal.position() {
            Some(n) => NaiveDate::from_weekday_of_month_opt(year, self.month, self.weekday, n),
            None => self.last_of_month(year)
        };

        date.ok_or_else(|| DateRuleError::NoSuchDate {
            year,
            reason: format!("month {} has no {} {}", self.month, self.ordinal, self.weekday)
        })
    }

    fn last_of_month(&self, year: i32) -> Option<NaiveDate> {
        let end_of_month = NaiveDate::from_ymd_opt(year, self.month, days_of_month(year, self.month))?;
        let days_back = (end_of_month.weekday().num_days_from_monday() + 7
                         - self.weekday.num_days_from_monday()) % 7;
        end_of_month.checked_sub_days(Days::new(days_back as u64))
    }
}

impl TryFrom<NthWeekdayRuleJsonProp> for NthWeekdayRule {
    type Error = DateRuleError;

    fn try_from(json_prop: NthWeekdayRuleJsonProp) -> Result<Self, Self::Error> {
        NthWeekdayRule::new(json_prop.month, json_prop.weekday, json_prop.ordinal)
    }
}
