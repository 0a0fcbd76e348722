use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::time::daterule::daterule::DateRule;
use crate::time::holiday::holiday::{Holiday, HolidayType};
use crate::time::holiday::holidayerror::{HolidayError, HolidayResult};
use crate::time::locale::localized_names;

#[derive(Deserialize)]
struct RuleDescriptorJsonProp {
    key: String,
    names: BTreeMap<String, String>,
    date_rule: DateRule,
    #[serde(default)]
    valid_from: Option<i32>,
    #[serde(default)]
    valid_until: Option<i32>,
    #[serde(default)]
    observed: bool,
    #[serde(default)]
    holiday_type: HolidayType
}

/// Declarative description of one holiday of a jurisdiction.
///
/// `valid_from` is inclusive and `valid_until` exclusive; either may be
/// unbounded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RuleDescriptorJsonProp")]
pub struct RuleDescriptor {
    key: String,
    names: BTreeMap<String, String>,
    date_rule: DateRule,
    valid_from: Option<i32>,
    valid_until: Option<i32>,
    observed: bool,
    holiday_type: HolidayType
}

impl RuleDescriptor {
    pub fn new(
        key: impl Into<String>,
        names: BTreeMap<String, String>,
        date_rule: DateRule,
        holiday_type: HolidayType
    ) -> HolidayResult<RuleDescriptor> {
        let key = key.into();
        if names.is_empty() {
            return Err(HolidayError::MissingNames { key });
        }
        if holiday_type == HolidayType::Substitute {
            return Err(HolidayError::InvalidRule {
                key,
                reason: "substitute holidays are produced by substitution only".to_owned()
            });
        }
        Ok(RuleDescriptor {
            key,
            names,
            date_rule,
            valid_from: None,
            valid_until: None,
            observed: false,
            holiday_type
        })
    }

    pub fn official(key: impl Into<String>, names: BTreeMap<String, String>, date_rule: DateRule) -> HolidayResult<RuleDescriptor> {
        RuleDescriptor::new(key, names, date_rule, HolidayType::Official)
    }

    pub fn with_valid_from(mut self, year: i32) -> RuleDescriptor {
        self.valid_from = Some(year);
        self
    }

    pub fn with_valid_until(mut self, year: i32) -> RuleDescriptor {
        self.valid_until = Some(year);
        self
    }

    /// Marks the holiday as eligible for substitution.
    pub fn observed(mut self) -> RuleDescriptor {
        self.observed = true;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn names(&self) -> &BTreeMap<String, String> {
        &self.names
    }

    pub fn date_rule(&self) -> &DateRule {
        &self.date_rule
    }

    pub fn valid_from(&self) -> Option<i32> {
        self.valid_from
    }

    pub fn valid_until(&self) -> Option<i32> {
        self.valid_until
    }

    pub fn is_observed(&self) -> bool {
        self.observed
    }

    pub fn holiday_type(&self) -> HolidayType {
        self.holiday_type
    }

    /// Validity gate: whether the rule contributes a holiday in `year`.
    pub fn is_applicable(&self, year: i32) -> bool {
        let started = self.valid_from.is_none_or(|from| year >= from);
        let repealed = self.valid_until.is_some_and(|until| year >= until);
        started && !repealed
    }

    /// Date of the holiday in `year`. Callers check [`Self::is_applicable`]
    /// first.
    pub fn evaluate(&self, year: i32) -> HolidayResult<NaiveDate> {
        self.date_rule
            .evaluate(year)
            .map_err(|error| HolidayError::from_date_rule(&self.key, error))
    }

    /// Record for `date`, which must already lie in the computed year.
    pub fn to_holiday(&self, date: NaiveDate, timezone: Tz) -> HolidayResult<Holiday> {
        debug_assert!(self.is_applicable(date.year()));
        Holiday::new(
            self.key.clone(),
            self.names.clone(),
            date,
            timezone,
            self.holiday_type,
            self.observed
        )
    }
}

impl TryFrom<RuleDescriptorJsonProp> for RuleDescriptor {
    type Error = HolidayError;

    fn try_from(json_prop: RuleDescriptorJsonProp) -> Result<Self, Self::Error> {
        if let (Some(from), Some(until)) = (json_prop.valid_from, json_prop.valid_until) {
            if until <= from {
                return Err(HolidayError::InvalidRule {
                    key: json_prop.key,
                    reason: format!("valid_until {} is not after valid_from {}", until, from)
                });
            }
        }

        let mut descriptor = RuleDescriptor::new(
            json_prop.key,
            localized_names(json_prop.names),
            json_prop.date_rule,
            json_prop.holiday_type
        )?;
        descriptor.valid_from = json_prop.valid_from;
        descriptor.valid_until = json_prop.valid_until;
        descriptor.observed = json_prop.observed;
        Ok(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use serde_json::json;

    use crate::time::daterule::nthweekdayrule::WeekdayOrdinal;

    fn indigenous_peoples_day() -> RuleDescriptor {
        RuleDescriptor::official(
            "nationalIndigenousPeoplesDay",
            localized_names([("en", "National Indigenous Peoples Day")]),
            DateRule::fixed(6, 21).unwrap()
        ).unwrap().with_valid_from(1996)
    }

    #[test]
    fn test_valid_from_is_inclusive() {
        let descriptor = indigenous_peoples_day();
        assert!(!descriptor.is_applicable(1995));
        assert!(descriptor.is_applicable(1996));
        assert!(descriptor.is_applicable(2021));
    }

    #[test]
    fn test_valid_until_is_exclusive() {
        let descriptor = indigenous_peoples_day().with_valid_until(2000);
        assert!(descriptor.is_applicable(1999));
        assert!(!descriptor.is_applicable(2000));
    }

    #[test]
    fn test_unbounded_rule_always_applies() {
        let descriptor = RuleDescriptor::official(
            "labourDay",
            localized_names([("en", "Labour Day")]),
            DateRule::nth_weekday(9, Weekday::Mon, WeekdayOrdinal::First).unwrap()
        ).unwrap();
        assert!(descriptor.is_applicable(1));
        assert!(descriptor.is_applicable(9999));
    }

    #[test]
    fn test_substitute_type_is_rejected() {
        let result = RuleDescriptor::new(
            "x",
            localized_names([("en", "X")]),
            DateRule::fixed(1, 1).unwrap(),
            HolidayType::Substitute
        );
        assert!(matches!(result, Err(HolidayError::InvalidRule { .. })));
    }

    #[test]
    fn test_evaluate_attaches_key_to_failures() {
        let descriptor = RuleDescriptor::official(
            "broken",
            localized_names([("en", "Broken")]),
            DateRule::fixed(2, 30).unwrap()
        ).unwrap();
        match descriptor.evaluate(2021) {
            Err(HolidayError::NoSuchDate { key, year, .. }) => {
                assert_eq!(key, "broken");
                assert_eq!(year, 2021);
            }
            other => panic!("Expected NoSuchDate, got {:?}", other),
        }
    }

    #[test]
    fn test_deserializes_with_defaults() {
        let descriptor: RuleDescriptor = serde_json::from_value(json!({
            "key": "canadaDay",
            "names": { "en": "Canada Day", "fr-CA": "Fête du Canada" },
            "date_rule": { "rule_type": "FixedDate", "month": 7, "day": 1 },
            "valid_from": 1879,
            "observed": true
        })).unwrap();
        assert_eq!(descriptor.holiday_type(), HolidayType::Official);
        assert!(descriptor.is_observed());
        assert_eq!(descriptor.valid_until(), None);
        assert!(descriptor.names().contains_key("fr_CA"));
    }

    #[test]
    fn test_deserialization_rejects_empty_validity_window() {
        let result: Result<RuleDescriptor, _> = serde_json::from_value(json!({
            "key": "x",
            "names": { "en": "X" },
            "date_rule": { "rule_type": "FixedDate", "month": 7, "day": 1 },
            "valid_from": 2000,
            "valid_until": 1990
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialization_rejects_missing_names() {
        let result: Result<RuleDescriptor, _> = serde_json::from_value(json!({
            "key": "x",
            "names": {},
            "date_rule": { "rule_type": "FixedDate", "month": 7, "day": 1 }
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_to_holiday_copies_descriptor_fields() {
        let descriptor = indigenous_peoples_day().observed();
        let date = descriptor.evaluate(2021).unwrap();
        let holiday = descriptor.to_holiday(date, chrono_tz::America::Yellowknife).unwrap();
        assert_eq!(holiday.key(), "nationalIndigenousPeoplesDay");
        assert_eq!(holiday.date(), NaiveDate::from_ymd_opt(2021, 6, 21).unwrap());
        assert!(holiday.is_observed());
    }
}
