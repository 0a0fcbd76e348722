use chrono::NaiveDate;

use crate::time::holiday::holiday::{Holiday, HolidayType, ResolvedHoliday};
use crate::time::holiday::holidayerror::{HolidayError, HolidayResult};
use crate::time::locale::LocaleResolver;
use crate::time::rangeofdates::RangeOfDates;

/// Holidays of one jurisdiction-year, unique by key and kept in date order.
///
/// Records with the same date keep their insertion order. Inserting a key
/// that is already present replaces the earlier record, which then counts
/// as a fresh insertion for ordering purposes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidayCollection {
    holidays: Vec<Holiday>
}

impl HolidayCollection {
    pub fn new() -> HolidayCollection {
        HolidayCollection { holidays: Vec::new() }
    }

    /// Inserts `holiday`, returning the record it replaced, if any.
    pub fn insert(&mut self, holiday: Holiday) -> Option<Holiday> {
        let replaced = self.remove(holiday.key());
        let position = self.holidays.partition_point(|h| h.date() <= holiday.date());
        self.holidays.insert(position, holiday);
        replaced
    }

    /// Inserts `holiday` unless its key is already present.
    pub fn try_insert(&mut self, holiday: Holiday) -> HolidayResult<()> {
        if self.contains(holiday.key()) {
            return Err(HolidayError::DuplicateKey { key: holiday.key().to_owned() });
        }
        self.insert(holiday);
        Ok(())
    }

    pub fn remove(&mut self, key: &str) -> Option<Holiday> {
        self.holidays
            .iter()
            .position(|h| h.key() == key)
            .map(|index| self.holidays.remove(index))
    }

    pub fn get(&self, key: &str) -> Option<&Holiday> {
        self.holidays.iter().find(|h| h.key() == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// All records, date ascending.
    pub fn all(&self) -> &[Holiday] {
        &self.holidays
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Holiday> {
        self.holidays.iter()
    }

    pub fn len(&self) -> usize {
        self.holidays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holidays.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.holidays.iter().map(Holiday::key)
    }

    /// Dates in ascending order; a date shared by several holidays repeats.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.holidays.iter().map(Holiday::date)
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.on(date).next().is_some()
    }

    pub fn on(&self, date: NaiveDate) -> impl Iterator<Item = &Holiday> {
        self.holidays.iter().filter(move |h| h.date() == date)
    }

    pub fn between(&self, range: RangeOfDates) -> impl Iterator<Item = &Holiday> {
        self.holidays.iter().filter(move |h| range.contains(h.date()))
    }

    pub fn by_type(&self, holiday_type: HolidayType) -> impl Iterator<Item = &Holiday> {
        self.holidays.iter().filter(move |h| h.holiday_type() == holiday_type)
    }

    /// Projects every record onto `locale`, date ascending.
    pub fn resolve(&self, resolver: &LocaleResolver, locale: &str) -> HolidayResult<Vec<ResolvedHoliday>> {
        // Surface an unknown locale even for an empty collection.
        resolver.fallback_chain(locale)?;
        self.holidays
            .iter()
            .map(|h| ResolvedHoliday::from_holiday(h, resolver, locale))
            .collect()
    }
}

impl<'a> IntoIterator for &'a HolidayCollection {
    type Item = &'a Holiday;
    type IntoIter = std::slice::Iter<'a, Holiday>;

    fn into_iter(self) -> Self::IntoIter {
        self.holidays.iter()
    }
}

impl IntoIterator for HolidayCollection {
    type Item = Holiday;
    type IntoIter = std::vec::IntoIter<Holiday>;

    fn into_iter(self) -> Self::IntoIter {
        self.holidays.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn holiday(key: &str, month: u32, day: u32, holiday_type: HolidayType) -> Holiday {
        let names: BTreeMap<String, String> =
            [("en".to_string(), key.to_string())].into_iter().collect();
        Holiday::new(
            key,
            names,
            NaiveDate::from_ymd_opt(2021, month, day).unwrap(),
            chrono_tz::America::Toronto,
            holiday_type,
            false
        ).unwrap()
    }

    fn keys(collection: &HolidayCollection) -> Vec<&str> {
        collection.keys().collect()
    }

    #[test]
    fn test_all_is_sorted_regardless_of_insertion_order() {
        let mut collection = HolidayCollection::new();
        collection.insert(holiday("christmasDay", 12, 25, HolidayType::Official));
        collection.insert(holiday("newYearsDay", 1, 1, HolidayType::Official));
        collection.insert(holiday("canadaDay", 7, 1, HolidayType::Official));
        assert_eq!(keys(&collection), vec!["newYearsDay", "canadaDay", "christmasDay"]);
    }

    #[test]
    fn test_same_date_keeps_insertion_order() {
        let mut collection = HolidayCollection::new();
        collection.insert(holiday("b", 7, 1, HolidayType::Official));
        collection.insert(holiday("a", 7, 1, HolidayType::Observance));
        assert_eq!(keys(&collection), vec!["b", "a"]);
    }

    #[test]
    fn test_insert_replaces_colliding_key() {
        let mut collection = HolidayCollection::new();
        collection.insert(holiday("civicHoliday", 8, 2, HolidayType::Official));
        collection.insert(holiday("other", 9, 6, HolidayType::Official));
        let replaced = collection.insert(holiday("civicHoliday", 8, 3, HolidayType::Observance));

        assert_eq!(replaced.map(|h| h.date().to_string()), Some("2021-08-02".to_string()));
        assert_eq!(collection.len(), 2);
        let civic = collection.get("civicHoliday").unwrap();
        assert_eq!(civic.holiday_type(), HolidayType::Observance);
        assert_eq!(civic.date(), NaiveDate::from_ymd_opt(2021, 8, 3).unwrap());
    }

    #[test]
    fn test_replacement_is_resorted_by_date() {
        let mut collection = HolidayCollection::new();
        collection.insert(holiday("a", 1, 1, HolidayType::Official));
        collection.insert(holiday("b", 6, 1, HolidayType::Official));
        collection.insert(holiday("a", 12, 1, HolidayType::Official));
        assert_eq!(keys(&collection), vec!["b", "a"]);
    }

    #[test]
    fn test_try_insert_rejects_duplicates() {
        let mut collection = HolidayCollection::new();
        collection.try_insert(holiday("canadaDay", 7, 1, HolidayType::Official)).unwrap();
        let result = collection.try_insert(holiday("canadaDay", 7, 2, HolidayType::Official));
        assert_eq!(result, Err(HolidayError::DuplicateKey { key: "canadaDay".to_string() }));
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_lookup_and_contains() {
        let mut collection = HolidayCollection::new();
        assert!(collection.is_empty());
        collection.insert(holiday("canadaDay", 7, 1, HolidayType::Official));
        assert!(collection.contains("canadaDay"));
        assert!(!collection.contains("victoriaDay"));
        assert!(collection.get("victoriaDay").is_none());
        assert!(collection.contains_date(NaiveDate::from_ymd_opt(2021, 7, 1).unwrap()));
    }

    #[test]
    fn test_filters() {
        let mut collection = HolidayCollection::new();
        collection.insert(holiday("newYearsDay", 1, 1, HolidayType::Official));
        collection.insert(holiday("easterMonday", 4, 5, HolidayType::Observance));
        collection.insert(holiday("canadaDay", 7, 1, HolidayType::Official));

        let official: Vec<&str> = collection.by_type(HolidayType::Official).map(Holiday::key).collect();
        assert_eq!(official, vec!["newYearsDay", "canadaDay"]);

        let spring = RangeOfDates::new(
            NaiveDate::from_ymd_opt(2021, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2021, 7, 1).unwrap()
        );
        let in_range: Vec<&str> = collection.between(spring).map(Holiday::key).collect();
        assert_eq!(in_range, vec!["easterMonday", "canadaDay"]);

        let on: Vec<&str> = collection
            .on(NaiveDate::from_ymd_opt(2021, 1, 1).unwrap())
            .map(Holiday::key)
            .collect();
        assert_eq!(on, vec!["newYearsDay"]);
    }

    #[test]
    fn test_resolve_projects_in_date_order() {
        let mut collection = HolidayCollection::new();
        collection.insert(holiday("canadaDay", 7, 1, HolidayType::Official));
        collection.insert(holiday("newYearsDay", 1, 1, HolidayType::Official));
        let resolved = collection.resolve(&LocaleResolver::default(), "en_CA").unwrap();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].key, "newYearsDay");
        assert_eq!(resolved[1].name, "canadaDay");
    }

    #[test]
    fn test_resolve_unknown_locale_fails_even_when_empty() {
        let collection = HolidayCollection::new();
        let resolver = LocaleResolver::new("en_US", ["en"]);
        assert!(matches!(
            collection.resolve(&resolver, "zz"),
            Err(HolidayError::UnknownLocale { .. })
        ));
    }
}
