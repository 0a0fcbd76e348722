use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::time::daterule::anchoroffsetrule::{Anchor, AnchorOffsetRule};
use crate::time::daterule::fixeddaterule::FixedDateRule;
use crate::time::daterule::lastweekdayonorbeforerule::LastWeekdayOnOrBeforeRule;
use crate::time::daterule::nthweekdayrule::{NthWeekdayRule, WeekdayOrdinal};

const MONTH_NAMES: [&str; 13] = [
    "", "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December"
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateRuleError {
    /// The rule has no date in the requested year.
    #[error("no such date in {year}: {reason}")]
    NoSuchDate {
        year: i32,
        reason: String
    },

    /// The rule itself is malformed.
    #[error("invalid date rule: {reason}")]
    InvalidRule {
        reason: String
    }
}

impl DateRuleError {
    pub fn invalid_rule(reason: impl Into<String>) -> DateRuleError {
        DateRuleError::InvalidRule { reason: reason.into() }
    }
}

/// Closed set of ways to derive a holiday's date from a year.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "rule_type")]
pub enum DateRule {
    FixedDate(FixedDateRule),
    NthWeekday(NthWeekdayRule),
    LastWeekdayOnOrBefore(LastWeekdayOnOrBeforeRule),
    AnchorOffset(AnchorOffsetRule)
}

impl DateRule {
    pub fn fixed(month: u32, day: u32) -> Result<DateRule, DateRuleError> {
        FixedDateRule::new(month, day).map(DateRule::FixedDate)
    }

    pub fn nth_weekday(month: u32, weekday: Weekday, ordinal: WeekdayOrdinal) -> Result<DateRule, DateRuleError> {
        NthWeekdayRule::new(month, weekday, ordinal).map(DateRule::NthWeekday)
    }

    pub fn last_weekday_on_or_before(weekday: Weekday, month: u32, day: u32) -> Result<DateRule, DateRuleError> {
        LastWeekdayOnOrBeforeRule::new(weekday, month, day).map(DateRule::LastWeekdayOnOrBefore)
    }

    pub fn anchor_offset(anchor: Anchor, offset_days: i64) -> DateRule {
        DateRule::AnchorOffset(AnchorOffsetRule::new(anchor, offset_days))
    }

    /// Concrete date of the rule in `year`. Pure: the same rule and year
    /// always give the same result.
    pub fn evaluate(&self, year: i32) -> Result<NaiveDate, DateRuleError> {
        match self {
            DateRule::FixedDate(rule) => rule.evaluate(year),
            DateRule::NthWeekday(rule) => rule.evaluate(year),
            DateRule::LastWeekdayOnOrBefore(rule) => rule.evaluate(year),
            DateRule::AnchorOffset(rule) => rule.evaluate(year)
        }
    }
}

fn month_name(month: u32) -> &'static str {
    MONTH_NAMES.get(month as usize).copied().unwrap_or("?")
}

impl std::fmt::Display for DateRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateRule::FixedDate(rule) => {
                write!(f, "{} {}", month_name(rule.month()), rule.day())
            },
            DateRule::NthWeekday(rule) => {
                write!(f, "{} {} of {}", rule.ordinal(), rule.weekday(), month_name(rule.month()))
            },
            DateRule::LastWeekdayOnOrBefore(rule) => {
                write!(f, "last {} on or before {} {}", rule.weekday(), month_name(rule.month()), rule.day())
            },
            DateRule::AnchorOffset(rule) => {
                write!(f, "{:+} days from {}", rule.offset_days(), rule.anchor())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_dispatch_evaluates_each_variant() {
        let rules = [
            (DateRule::fixed(7, 1).unwrap(), ymd(2021, 7, 1)),
            (DateRule::nth_weekday(8, Weekday::Mon, WeekdayOrdinal::First).unwrap(), ymd(2021, 8, 2)),
            (DateRule::last_weekday_on_or_before(Weekday::Mon, 5, 25).unwrap(), ymd(2021, 5, 24)),
            (DateRule::anchor_offset(Anchor::western_easter(), 1), ymd(2021, 4, 5)),
        ];
        for (rule, expected) in rules.iter() {
            assert_eq!(rule.evaluate(2021).unwrap(), *expected, "rule {}", rule);
        }
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let rule = DateRule::anchor_offset(Anchor::orthodox_easter(), -2);
        let first = rule.evaluate(2030);
        for _ in 0..10 {
            assert_eq!(rule.evaluate(2030), first);
        }
    }

    #[test]
    fn test_deserializes_tagged_rules() {
        let rule: DateRule = serde_json::from_value(json!({
            "rule_type": "NthWeekday",
            "month": 10,
            "weekday": "Mon",
            "ordinal": "Second"
        })).unwrap();
        assert_eq!(rule.evaluate(2021).unwrap(), ymd(2021, 10, 11));

        let rule: DateRule = serde_json::from_value(json!({
            "rule_type": "AnchorOffset",
            "anchor": { "anchor_type": "Easter", "easter_type": "Western" },
            "offset_days": -2
        })).unwrap();
        assert_eq!(rule.evaluate(2021).unwrap(), ymd(2021, 4, 2));

        let rule: DateRule = serde_json::from_value(json!({
            "rule_type": "AnchorOffset",
            "anchor": {
                "anchor_type": "Rule",
                "rule": { "rule_type": "FixedDate", "month": 12, "day": 25 }
            },
            "offset_days": 1
        })).unwrap();
        assert_eq!(rule.evaluate(2021).unwrap(), ymd(2021, 12, 26));
    }

    #[test]
    fn test_deserialization_rejects_invalid_month() {
        let rule: Result<DateRule, _> = serde_json::from_value(json!({
            "rule_type": "FixedDate",
            "month": 13,
            "day": 1
        }));
        assert!(rule.is_err());
    }

    #[test]
    fn test_display() {
        let rule = DateRule::nth_weekday(8, Weekday::Mon, WeekdayOrdinal::First).unwrap();
        assert_eq!(rule.to_string(), "first Mon of August");
        let rule = DateRule::anchor_offset(Anchor::western_easter(), -2);
        assert_eq!(rule.to_string(), "-2 days from Easter");
    }

    #[test]
    fn test_no_such_date_message() {
        let error = DateRuleError::NoSuchDate { year: 2021, reason: "02-30 does not exist".to_string() };
        assert_eq!(error.to_string(), "no such date in 2021: 02-30 does not exist");
    }
}
