use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::time::holiday::holidayerror::{HolidayError, HolidayResult};
use crate::time::locale::LocaleResolver;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HolidayType {
    #[default]
    Official,
    Observance,
    Substitute,
    Other
}

impl std::fmt::Display for HolidayType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HolidayType::Official => write!(f, "official"),
            HolidayType::Observance => write!(f, "observance"),
            HolidayType::Substitute => write!(f, "substitute"),
            HolidayType::Other => write!(f, "other")
        }
    }
}

/// One computed holiday occurrence.
///
/// Immutable once built. The year is always the year of `date`, and `names`
/// always holds at least one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Holiday {
    key: String,
    date: NaiveDate,
    timezone: Tz,
    names: BTreeMap<String, String>,
    holiday_type: HolidayType,
    observed: bool,
    substitutes: Option<String>
}

impl Holiday {
    pub fn new(
        key: impl Into<String>,
        names: BTreeMap<String, String>,
        date: NaiveDate,
        timezone: Tz,
        holiday_type: HolidayType,
        observed: bool
    ) -> HolidayResult<Holiday> {
        let key = key.into();
        if names.is_empty() {
            return Err(HolidayError::MissingNames { key });
        }
        Ok(Holiday {
            key,
            date,
            timezone,
            names,
            holiday_type,
            observed,
            substitutes: None
        })
    }

    /// Substitute record standing in for `original` on `date`.
    pub(crate) fn substitute_for(
        original: &Holiday,
        key: String,
        date: NaiveDate,
        names: BTreeMap<String, String>
    ) -> Holiday {
        Holiday {
            key,
            date,
            timezone: original.timezone,
            names,
            holiday_type: HolidayType::Substitute,
            observed: false,
            substitutes: Some(original.key.clone())
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn names(&self) -> &BTreeMap<String, String> {
        &self.names
    }

    pub fn holiday_type(&self) -> HolidayType {
        self.holiday_type
    }

    pub fn is_observed(&self) -> bool {
        self.observed
    }

    /// Key of the holiday this record substitutes for.
    pub fn substitutes(&self) -> Option<&str> {
        self.substitutes.as_deref()
    }

    pub fn is_substitute(&self) -> bool {
        self.holiday_type == HolidayType::Substitute
    }

    pub fn name(&self, resolver: &LocaleResolver, locale: &str) -> HolidayResult<&str> {
        resolver.resolve(&self.names, locale)
    }

    /// Canonical instant of the holiday: the start of its day in the
    /// jurisdiction's time zone.
    pub fn instant(&self) -> DateTime<Tz> {
        // Zones that skip midnight on a DST change start the day later.
        for hour in 0..=3 {
            if let Some(naive) = self.date.and_hms_opt(hour, 0, 0) {
                if let Some(instant) = self.timezone.from_local_datetime(&naive).earliest() {
                    return instant;
                }
            }
        }
        self.timezone.from_utc_datetime(&self.date.and_time(chrono::NaiveTime::MIN))
    }
}

/// Holiday as presented to a caller for one locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedHoliday {
    pub key: String,
    pub date: NaiveDate,
    pub name: String,
    pub holiday_type: HolidayType,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub substitutes: Option<String>
}

impl ResolvedHoliday {
    pub fn from_holiday(holiday: &Holiday, resolver: &LocaleResolver, locale: &str) -> HolidayResult<ResolvedHoliday> {
        Ok(ResolvedHoliday {
            key: holiday.key.clone(),
            date: holiday.date,
            name: holiday.name(resolver, locale)?.to_owned(),
            holiday_type: holiday.holiday_type,
            substitutes: holiday.substitutes.clone()
        })
    }
}
