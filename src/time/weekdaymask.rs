use chrono::Weekday;
use serde::{
    Deserialize,
    Serialize
};

/// Set of weekdays stored as a bitmask.
/// Each bit represents a day: Mon(0), Tue(1), ..., Sun(6)
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Weekday>", into = "Vec<Weekday>")]
pub struct WeekdayMask(u8);

impl WeekdayMask {
    pub const EMPTY: WeekdayMask = WeekdayMask(0);

    pub fn new(weekdays: &[Weekday]) -> WeekdayMask {
        let mut mask = 0u8;
        for &weekday in weekdays {
            mask |= 1u8 << weekday.num_days_from_monday();
        }
        WeekdayMask(mask)
    }

    /// Saturday and Sunday.
    pub fn weekend() -> WeekdayMask {
        WeekdayMask::new(&[Weekday::Sat, Weekday::Sun])
    }

    #[inline]
    pub fn contains(&self, weekday: Weekday) -> bool {
        let bit = 1u8 << weekday.num_days_from_monday();
        (self.0 & bit) != 0
    }

    pub fn insert(&mut self, weekday: Weekday) {
        self.0 |= 1u8 << weekday.num_days_from_monday();
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn is_full(&self) -> bool {
        self.0 == 0b111_1111
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Weekdays in the set, Monday first.
    pub fn weekdays(&self) -> Vec<Weekday> {
        let mut weekdays = Vec::with_capacity(7);
        for day in 0..7u8 {
            if (self.0 & (1u8 << day)) != 0 {
                if let Ok(weekday) = Weekday::try_from(day) {
                    weekdays.push(weekday);
                }
            }
        }
        weekdays
    }
}

impl From<Vec<Weekday>> for WeekdayMask {
    fn from(weekdays: Vec<Weekday>) -> Self {
        WeekdayMask::new(&weekdays)
    }
}

impl From<WeekdayMask> for Vec<Weekday> {
    fn from(mask: WeekdayMask) -> Self {
        mask.weekdays()
    }
}

impl std::fmt::Debug for WeekdayMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.weekdays()).finish()
    }
}
