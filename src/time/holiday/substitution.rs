//! Substitution of observed holidays that fall on a non-working day.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{de, Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use crate::time::holiday::holiday::Holiday;
use crate::time::holiday::holidaycollection::HolidayCollection;
use crate::time::holiday::holidayerror::{HolidayError, HolidayResult};
use crate::time::locale::{language_of, normalize_locale};
use crate::time::weekdaymask::WeekdayMask;

pub const DEFAULT_KEY_SUFFIX: &str = "Observed";
pub const NAME_PLACEHOLDER: &str = "{name}";
const FALLBACK_NAME_TEMPLATE: &str = "{name} (observed)";

#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash, Serialize, Deserialize)]
pub enum ShiftDirection {
    Following,
    Preceding
}

impl ShiftDirection {
    fn step(&self, d: NaiveDate) -> Option<NaiveDate> {
        match self {
            ShiftDirection::Following => d.checked_add_days(Days::new(1)),
            ShiftDirection::Preceding => d.checked_sub_days(Days::new(1))
        }
    }
}

/// What to do when a substitute date is already taken by another holiday.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash, Default, Serialize, Deserialize)]
pub enum CollisionPolicy {
    /// Place the substitute on the computed date anyway.
    Ignore,
    /// Keep moving one day at a time, skipping trigger days, until free.
    #[default]
    AdvanceUntilFree
}

#[derive(Deserialize)]
struct SubstitutionRuleJsonProp {
    triggers: HashMap<Weekday, ShiftDirection>,
    #[serde(default)]
    collision_policy: CollisionPolicy,
    #[serde(default = "default_key_suffix")]
    key_suffix: String,
    #[serde(default)]
    name_templates: BTreeMap<String, String>
}

fn default_key_suffix() -> String {
    DEFAULT_KEY_SUFFIX.to_owned()
}

fn default_name_templates() -> BTreeMap<String, String> {
    [
        ("en".to_owned(), "{name} (observed)".to_owned()),
        ("fr".to_owned(), "{name} (observé)".to_owned()),
    ].into_iter().collect()
}

/// Jurisdiction rule deciding which weekdays trigger a substitute and
/// where the substitute lands.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "SubstitutionRuleJsonProp")]
pub struct SubstitutionRule {
    // Indexed by Weekday::num_days_from_monday(); None means not a trigger.
    shifts: [Option<ShiftDirection>; 7],
    triggers: WeekdayMask,
    collision_policy: CollisionPolicy,
    key_suffix: String,
    name_templates: BTreeMap<String, String>
}

impl SubstitutionRule {
    /// Fails when every weekday is a trigger, since no substitute date could
    /// ever be found.
    pub fn new(triggers: &HashMap<Weekday, ShiftDirection>) -> HolidayResult<SubstitutionRule> {
        let mut shifts: [Option<ShiftDirection>; 7] = [None; 7];
        let mut mask = WeekdayMask::EMPTY;

        for (&weekday, &direction) in triggers {
            shifts[weekday.num_days_from_monday() as usize] = Some(direction);
            mask.insert(weekday);
        }

        if mask.is_full() {
            return Err(HolidayError::InvalidSubstitution {
                reason: "every weekday is a trigger".to_owned()
            });
        }

        Ok(SubstitutionRule {
            shifts,
            triggers: mask,
            collision_policy: CollisionPolicy::default(),
            key_suffix: default_key_suffix(),
            name_templates: default_name_templates()
        })
    }

    /// Sunday holidays move to the following Monday.
    pub fn sunday_to_monday() -> SubstitutionRule {
        SubstitutionRule {
            shifts: [None, None, None, None, None, None, Some(ShiftDirection::Following)],
            triggers: WeekdayMask::new(&[Weekday::Sun]),
            collision_policy: CollisionPolicy::default(),
            key_suffix: default_key_suffix(),
            name_templates: default_name_templates()
        }
    }

    /// Saturday and Sunday holidays move to the next working weekday.
    pub fn weekend_to_monday() -> SubstitutionRule {
        SubstitutionRule {
            shifts: [
                None, None, None, None, None,
                Some(ShiftDirection::Following),
                Some(ShiftDirection::Following)
            ],
            triggers: WeekdayMask::weekend(),
            collision_policy: CollisionPolicy::default(),
            key_suffix: default_key_suffix(),
            name_templates: default_name_templates()
        }
    }

    pub fn with_collision_policy(mut self, collision_policy: CollisionPolicy) -> SubstitutionRule {
        self.collision_policy = collision_policy;
        self
    }

    pub fn with_key_suffix(mut self, key_suffix: impl Into<String>) -> SubstitutionRule {
        self.key_suffix = key_suffix.into();
        self
    }

    /// `template` must contain `{name}`, which is replaced by the original
    /// holiday's name in the same locale.
    pub fn with_name_template(mut self, locale: &str, template: impl Into<String>) -> HolidayResult<SubstitutionRule> {
        let template = template.into();
        if !template.contains(NAME_PLACEHOLDER) {
            return Err(HolidayError::InvalidSubstitution {
                reason: format!("name template '{}' for locale '{}' lacks {}", template, locale, NAME_PLACEHOLDER)
            });
        }
        self.name_templates.insert(normalize_locale(locale), template);
        Ok(self)
    }

    pub fn triggers(&self) -> WeekdayMask {
        self.triggers
    }

    pub fn collision_policy(&self) -> CollisionPolicy {
        self.collision_policy
    }

    pub fn key_suffix(&self) -> &str {
        &self.key_suffix
    }

    #[inline]
    pub fn is_trigger(&self, weekday: Weekday) -> bool {
        self.triggers.contains(weekday)
    }

    /// Collision avoidance is always on when both weekend days trigger.
    pub fn avoids_collisions(&self) -> bool {
        self.collision_policy == CollisionPolicy::AdvanceUntilFree
            || (self.triggers.contains(Weekday::Sat) && self.triggers.contains(Weekday::Sun))
    }

    /// Date a holiday on `date` is observed on, or `None` when `date` is not
    /// a trigger day. `occupied` holds dates already taken by holidays.
    pub fn substitute_date(&self, date: NaiveDate, occupied: &HashSet<NaiveDate>) -> Option<NaiveDate> {
        let direction = self.shifts[date.weekday().num_days_from_monday() as usize]?;
        let avoid_collisions = self.avoids_collisions();

        let mut candidate = date;
        loop {
            candidate = direction.step(candidate)?;
            if self.is_trigger(candidate.weekday()) {
                continue;
            }
            if avoid_collisions && occupied.contains(&candidate) {
                continue;
            }
            return Some(candidate);
        }
    }

    fn substitute_names(&self, original: &Holiday) -> BTreeMap<String, String> {
        original
            .names()
            .iter()
            .map(|(locale, name)| {
                let template = self.name_templates
                    .get(locale)
                    .or_else(|| self.name_templates.get(language_of(locale)))
                    .map(String::as_str)
                    .unwrap_or(FALLBACK_NAME_TEMPLATE);
                (locale.clone(), template.replace(NAME_PLACEHOLDER, name))
            })
            .collect()
    }

    /// Adds a substitute for every observed, non-substitute holiday that
    /// falls on a trigger day. Existing records are never altered.
    pub fn apply(&self, mut collection: HolidayCollection) -> HolidayCollection {
        let mut occupied: HashSet<NaiveDate> = collection.dates().collect();
        let candidates: Vec<Holiday> = collection
            .iter()
            .filter(|h| h.is_observed() && !h.is_substitute() && self.is_trigger(h.date().weekday()))
            .cloned()
            .collect();

        for original in candidates {
            let key = format!("{}{}", original.key(), self.key_suffix);
            if collection.contains(&key) {
                warn!(key = %key, "substitute key already present, skipping");
                continue;
            }

            let Some(date) = self.substitute_date(original.date(), &occupied) else {
                continue;
            };

            if date.year() != original.year() {
                debug!(
                    key = %original.key(),
                    date = %date,
                    "substitute falls outside the holiday's year, dropped"
                );
                continue;
            }

            debug!(key = %key, date = %date, substitutes = %original.key(), "adding substitute holiday");
            let substitute = Holiday::substitute_for(&original, key, date, self.substitute_names(&original));
            occupied.insert(date);
            collection.insert(substitute);
        }

        collection
    }
}

impl TryFrom<SubstitutionRuleJsonProp> for SubstitutionRule {
    type Error = HolidayError;

    fn try_from(json_prop: SubstitutionRuleJsonProp) -> Result<Self, Self::Error> {
        let mut rule = SubstitutionRule::new(&json_prop.triggers)?
            .with_collision_policy(json_prop.collision_policy)
            .with_key_suffix(json_prop.key_suffix);
        for (locale, template) in json_prop.name_templates {
            rule = rule.with_name_template(&locale, template)?;
        }
        Ok(rule)
    }
}

/// How a jurisdiction substitutes: its own rule, its parent's, or not at all.
///
/// In a catalog the policy is either the string `"Inherit"` / `"Disabled"` or
/// a substitution rule object.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SubstitutionPolicy {
    #[default]
    Inherit,
    /// No substitutes at all. Parents contribute their holidays
    /// unsubstituted, so this also suppresses inherited substitutes.
    Disabled,
    Rule(SubstitutionRule)
}

const POLICY_NAMES: &[&str] = &["Inherit", "Disabled"];

impl<'de> Deserialize<'de> for SubstitutionPolicy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(name) => match name.as_str() {
                "Inherit" => Ok(SubstitutionPolicy::Inherit),
                "Disabled" => Ok(SubstitutionPolicy::Disabled),
                other => Err(de::Error::unknown_variant(other, POLICY_NAMES))
            },
            json_value @ serde_json::Value::Object(_) => serde_json::from_value(json_value)
                .map(SubstitutionPolicy::Rule)
                .map_err(de::Error::custom),
            other => Err(de::Error::custom(format!(
                "expected \"Inherit\", \"Disabled\" or a substitution rule object, found {}",
                other
            )))
        }
    }
}
