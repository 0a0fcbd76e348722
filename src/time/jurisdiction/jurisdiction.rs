use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;
use tracing::{debug, trace};

use crate::time::holiday::holidaycollection::HolidayCollection;
use crate::time::holiday::holidayerror::{HolidayError, HolidayResult};
use crate::time::holiday::ruledescriptor::RuleDescriptor;
use crate::time::holiday::substitution::{SubstitutionPolicy, SubstitutionRule};
use crate::time::jurisdiction::holidayprovider::HolidayProvider;
use crate::time::weekdaymask::WeekdayMask;

/// Earliest year a jurisdiction can be computed for.
pub const MIN_SUPPORTED_YEAR: i32 = 1;

/// A country or subdivision with its own holiday rules.
///
/// A provider may reference a parent. Computing a year first collects the
/// parent's holidays, then applies the local rules in declaration order; a
/// local rule whose key is already present replaces the inherited record.
/// Substitution runs once, at the end, with the provider's effective policy.
#[derive(Clone, Debug)]
pub struct JurisdictionProvider {
    id: String,
    parent: Option<Arc<JurisdictionProvider>>,
    timezone: Tz,
    weekend_days: WeekdayMask,
    rules: Vec<RuleDescriptor>,
    substitution: SubstitutionPolicy
}

impl JurisdictionProvider {
    /// Root jurisdiction with a Saturday/Sunday weekend and no substitution.
    pub fn new(id: impl Into<String>, timezone: Tz) -> JurisdictionProvider {
        JurisdictionProvider {
            id: id.into(),
            parent: None,
            timezone,
            weekend_days: WeekdayMask::weekend(),
            rules: Vec::new(),
            substitution: SubstitutionPolicy::Inherit
        }
    }

    /// Subdivision of `parent`, inheriting its time zone, weekend and
    /// substitution policy until overridden.
    pub fn with_parent(id: impl Into<String>, parent: Arc<JurisdictionProvider>) -> JurisdictionProvider {
        JurisdictionProvider {
            id: id.into(),
            timezone: parent.timezone,
            weekend_days: parent.weekend_days,
            parent: Some(parent),
            rules: Vec::new(),
            substitution: SubstitutionPolicy::Inherit
        }
    }

    pub fn with_timezone(mut self, timezone: Tz) -> JurisdictionProvider {
        self.timezone = timezone;
        self
    }

    pub fn with_weekend_days(mut self, weekend_days: WeekdayMask) -> JurisdictionProvider {
        self.weekend_days = weekend_days;
        self
    }

    pub fn with_rule(mut self, rule: RuleDescriptor) -> JurisdictionProvider {
        self.rules.push(rule);
        self
    }

    pub fn with_rules(mut self, rules: impl IntoIterator<Item = RuleDescriptor>) -> JurisdictionProvider {
        self.rules.extend(rules);
        self
    }

    pub fn with_substitution(mut self, substitution: SubstitutionPolicy) -> JurisdictionProvider {
        self.substitution = substitution;
        self
    }

    pub fn parent(&self) -> Option<&Arc<JurisdictionProvider>> {
        self.parent.as_ref()
    }

    /// Local rules only, in declaration order.
    pub fn rules(&self) -> &[RuleDescriptor] {
        &self.rules
    }

    pub fn substitution_policy(&self) -> &SubstitutionPolicy {
        &self.substitution
    }

    /// The rule substitution runs with: the provider's own, or the nearest
    /// ancestor's when inheriting.
    pub fn effective_substitution(&self) -> Option<&SubstitutionRule> {
        match &self.substitution {
            SubstitutionPolicy::Rule(rule) => Some(rule),
            SubstitutionPolicy::Disabled => None,
            SubstitutionPolicy::Inherit => self.parent.as_ref().and_then(|p| p.effective_substitution())
        }
    }

    /// Ids from the root jurisdiction down to this one.
    pub fn lineage(&self) -> Vec<&str> {
        let mut lineage = match &self.parent {
            Some(parent) => parent.lineage(),
            None => Vec::new()
        };
        lineage.push(&self.id);
        lineage
    }

    /// Holidays of `year` before substitution, anchored to `timezone`.
    fn populate(&self, year: i32, timezone: Tz) -> HolidayResult<HolidayCollection> {
        let mut collection = match &self.parent {
            Some(parent) => parent.populate(year, timezone)?,
            None => HolidayCollection::new()
        };

        for rule in self.rules.iter() {
            if !rule.is_applicable(year) {
                debug!(jurisdiction = %self.id, key = %rule.key(), year, "rule not in force");
                continue;
            }

            let date = rule.evaluate(year)?;
            trace!(jurisdiction = %self.id, key = %rule.key(), date = %date, "evaluated rule");
            if date.year() != year {
                debug!(
                    jurisdiction = %self.id,
                    key = %rule.key(),
                    date = %date,
                    year,
                    "rule evaluates outside the year, skipped"
                );
                continue;
            }

            if let Some(replaced) = collection.insert(rule.to_holiday(date, timezone)?) {
                debug!(
                    jurisdiction = %self.id,
                    key = %replaced.key(),
                    "overriding inherited holiday"
                );
            }
        }

        Ok(collection)
    }
}

impl HolidayProvider for JurisdictionProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn timezone(&self) -> Tz {
        self.timezone
    }

    fn weekend_days(&self) -> WeekdayMask {
        self.weekend_days
    }

    fn compute(&self, year: i32) -> HolidayResult<HolidayCollection> {
        if !(MIN_SUPPORTED_YEAR..=NaiveDate::MAX.year()).contains(&year) {
            return Err(HolidayError::InvalidYear { year });
        }

        let collection = self.populate(year, self.timezone)?;
        let collection = match self.effective_substitution() {
            Some(rule) => rule.apply(collection),
            None => collection
        };

        debug!(jurisdiction = %self.id, year, holidays = collection.len(), "computed holidays");
        Ok(collection)
    }
}
