use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::time::daterule::daterule::DateRuleError;
use crate::time::utility::is_valid_month;

#[derive(Deserialize)]
struct FixedDateRuleJsonProp {
    month: u32,
    day: u32
}

/// The same month and day every year.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "FixedDateRuleJsonProp")]
pub struct FixedDateRule {
    month: u32,
    day: u32
}

impl FixedDateRule {
    /// Rejects months outside 1..=12 and days outside 1..=31. Whether the day
    /// exists in a given year (Feb 29, Apr 31) is only known at evaluation.
    pub fn new(month: u32, day: u32) -> Result<FixedDateRule, DateRuleError> {
        if !is_valid_month(month) {
            return Err(DateRuleError::invalid_rule(format!("month {} is out of range", month)));
        }
        if !(1..=31).contains(&day) {
            return Err(DateRuleError::invalid_rule(format!("day {} is out of range", day)));
        }
        Ok(FixedDateRule { month, day })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn evaluate(&self, year: i32) -> Result<NaiveDate, DateRuleError> {
        NaiveDate::from_ymd_opt(year, self.month, self.day).ok_or_else(|| DateRuleError::NoSuchDate {
            year,
            reason: format!("{:02}-{:02} does not exist", self.month, self.day)
        })
    }
}

impl TryFrom<FixedDateRuleJsonProp> for FixedDateRule {
    type Error = DateRuleError;

    fn try_from(json_prop: FixedDateRuleJsonProp) -> Result<Self, Self::Error> {
        FixedDateRule::new(json_prop.month, json_prop.day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_returns_month_and_day_of_year() {
        let rule = FixedDateRule::new(6, 21).unwrap();
        assert_eq!(rule.evaluate(1996).unwrap(), NaiveDate::from_ymd_opt(1996, 6, 21).unwrap());
    }

    #[test]
    fn test_february_30_fails_with_no_such_date() {
        let rule = FixedDateRule::new(2, 30).unwrap();
        match rule.evaluate(2021) {
            Err(DateRuleError::NoSuchDate { year, .. }) => assert_eq!(year, 2021),
            other => panic!("Expected NoSuchDate, got {:?}", other),
        }
    }

    #[test]
    fn test_february_29_only_in_leap_years() {
        let rule = FixedDateRule::new(2, 29).unwrap();
        assert!(rule.evaluate(2024).is_ok());
        assert!(rule.evaluate(2023).is_err());
    }

    #[test]
    fn test_construction_rejects_impossible_fields() {
        assert!(FixedDateRule::new(13, 1).is_err());
        assert!(FixedDateRule::new(0, 1).is_err());
        assert!(FixedDateRule::new(1, 0).is_err());
        assert!(FixedDateRule::new(1, 32).is_err());
    }

    #[test]
    fn test_deserialization_validates_fields() {
        let rule: Result<FixedDateRule, _> = serde_json::from_str(r#"{"month": 14, "day": 1}"#);
        assert!(rule.is_err());
        let rule: FixedDateRule = serde_json::from_str(r#"{"month": 7, "day": 1}"#).unwrap();
        assert_eq!(rule.month(), 7);
    }
}
