use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::time::daterule::daterule::{DateRule, DateRuleError};
use crate::time::daterule::easter::{EASTER_FIRST_YEAR, EasterType, easter_sunday};

/// Reference date an [`AnchorOffsetRule`] counts from.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "anchor_type")]
pub enum Anchor {
    Easter { easter_type: EasterType },
    /// Any other rule, e.g. "the Tuesday after the first Monday of November".
    Rule { rule: Box<DateRule> }
}

impl Anchor {
    pub fn western_easter() -> Anchor {
        Anchor::Easter { easter_type: EasterType::Western }
    }

    pub fn orthodox_easter() -> Anchor {
        Anchor::Easter { easter_type: EasterType::Orthodox }
    }

    pub fn rule(rule: DateRule) -> Anchor {
        Anchor::Rule { rule: Box::new(rule) }
    }

    pub fn evaluate(&self, year: i32) -> Result<NaiveDate, DateRuleError> {
        match self {
            Anchor::Easter { easter_type } => {
                easter_sunday(year, *easter_type).ok_or_else(|| DateRuleError::NoSuchDate {
                    year,
                    reason: format!("easter is only computed from {} on", EASTER_FIRST_YEAR)
                })
            },
            Anchor::Rule { rule } => rule.evaluate(year)
        }
    }
}

impl std::fmt::Display for Anchor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Anchor::Easter { easter_type: EasterType::Western } => write!(f, "Easter"),
            Anchor::Easter { easter_type: EasterType::Orthodox } => write!(f, "Orthodox Easter"),
            Anchor::Rule { rule } => write!(f, "{}", rule)
        }
    }
}

/// A signed number of days from a computed anchor. The result may fall in a
/// different month or year than the anchor.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnchorOffsetRule {
    anchor: Anchor,
    offset_days: i64
}

impl AnchorOffsetRule {
    pub fn new(anchor: Anchor, offset_days: i64) -> AnchorOffsetRule {
        AnchorOffsetRule { anchor, offset_days }
    }

    pub fn anchor(&self) -> &Anchor {
        &self.anchor
    }

    pub fn offset_days(&self) -> i64 {
        self.offset_days
    }

    pub fn evaluate(&self, year: i32) -> Result<NaiveDate, DateRuleError> {
        let anchor = self.anchor.evaluate(year)?;
        Duration::try_days(self.offset_days)
            .and_then(|offset| anchor.checked_add_signed(offset))
            .ok_or_else(|| DateRuleError::NoSuchDate {
                year,
                reason: format!("{} days from {} is not representable", self.offset_days, anchor)
            })
    }
}
