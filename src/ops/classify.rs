use chrono::Datelike;
use indexmap::IndexMap;
use serde::Serialize;

use crate::model::record::{EmergencyContact, Frequency, Medication, MedicationStatus, Record};

/// Default chrono format for calendar month labels ("March 2025")
pub const MONTH_LABEL_FORMAT: &str = "%B %Y";

/// Month label → day of month → records, both levels in first-seen order
pub type CalendarBuckets<'a, R> = IndexMap<String, IndexMap<u32, Vec<&'a R>>>;

/// Sort records by primary date, oldest first. Stable, so same-day records
/// keep their relative order. Use before `group_by_month` for a
/// chronological calendar.
pub fn sort_by_date<R: Record>(records: &mut [R]) {
    records.sort_by_key(|r| r.date());
}

// ---------------------------------------------------------------------------
// Calendar and year grouping
// ---------------------------------------------------------------------------

/// Group records by month, then by day of month.
///
/// Months and days appear in the order they are first seen in the input;
/// nothing is sorted here.
pub fn group_by_month<'a, R: Record>(
    records: &'a [R],
    label_format: &str,
) -> CalendarBuckets<'a, R> {
    let mut months: CalendarBuckets<'a, R> = IndexMap::new();
    for record in records {
        let date = record.date();
        let label = date.format(label_format).to_string();
        months
            .entry(label)
            .or_default()
            .entry(date.day())
            .or_default()
            .push(record);
    }
    months
}

/// Group records by calendar year, newest year first.
pub fn group_by_year<R: Record>(records: &[R]) -> IndexMap<i32, Vec<&R>> {
    let mut years: IndexMap<i32, Vec<&R>> = IndexMap::new();
    for record in records {
        years.entry(record.date().year()).or_default().push(record);
    }
    years.sort_by(|a, _, b, _| b.cmp(a));
    years
}

// ---------------------------------------------------------------------------
// Medication time of day
// ---------------------------------------------------------------------------

/// A dosing slot in the day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
}

impl TimeOfDay {
    pub const ALL: [TimeOfDay; 3] = [TimeOfDay::Morning, TimeOfDay::Afternoon, TimeOfDay::Evening];

    /// Whether a medication taken at `frequency` is due in this slot.
    ///
    /// Slots overlap: once-daily is both a morning and an evening dose, and
    /// every multi-dose frequency is due in all three slots.
    pub fn includes(self, frequency: Frequency) -> bool {
        use Frequency::*;
        match self {
            TimeOfDay::Morning | TimeOfDay::Evening => matches!(
                frequency,
                OnceDaily | TwiceDaily | ThreeTimesDaily | FourTimesDaily
            ),
            TimeOfDay::Afternoon => {
                matches!(frequency, TwiceDaily | ThreeTimesDaily | FourTimesDaily)
            }
        }
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeOfDay::Morning => write!(f, "Morning"),
            TimeOfDay::Afternoon => write!(f, "Afternoon"),
            TimeOfDay::Evening => write!(f, "Evening"),
        }
    }
}

/// Bucket active medications into Morning/Afternoon/Evening.
///
/// A medication may appear in several buckets. Inactive medications and
/// non-daily frequencies appear in none. Empty buckets are left out.
pub fn group_by_time_of_day(
    medications: &[Medication],
) -> IndexMap<TimeOfDay, Vec<&Medication>> {
    let mut slots = IndexMap::new();
    for slot in TimeOfDay::ALL {
        let due: Vec<&Medication> = medications
            .iter()
            .filter(|m| m.status == MedicationStatus::Active && slot.includes(m.frequency))
            .collect();
        if !due.is_empty() {
            slots.insert(slot, due);
        }
    }
    slots
}

// ---------------------------------------------------------------------------
// Emergency contact tiers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityTier {
    Primary,
    Secondary,
    Other,
}

impl PriorityTier {
    pub const ALL: [PriorityTier; 3] = [
        PriorityTier::Primary,
        PriorityTier::Secondary,
        PriorityTier::Other,
    ];

    pub fn from_priority(priority: u32) -> PriorityTier {
        match priority {
            0 => PriorityTier::Primary,
            1 => PriorityTier::Secondary,
            _ => PriorityTier::Other,
        }
    }
}

impl std::fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriorityTier::Primary => write!(f, "Primary"),
            PriorityTier::Secondary => write!(f, "Secondary"),
            PriorityTier::Other => write!(f, "Other"),
        }
    }
}

/// Partition contacts into priority tiers, in tier order. Every contact
/// lands in exactly one tier; empty tiers are left out.
pub fn group_by_priority(
    contacts: &[EmergencyContact],
) -> IndexMap<PriorityTier, Vec<&EmergencyContact>> {
    let mut tiers: IndexMap<PriorityTier, Vec<&EmergencyContact>> =
        PriorityTier::ALL.into_iter().map(|t| (t, Vec::new())).collect();
    for contact in contacts {
        if let Some(bucket) = tiers.get_mut(&PriorityTier::from_priority(contact.priority)) {
            bucket.push(contact);
        }
    }
    tiers.retain(|_, bucket| !bucket.is_empty());
    tiers
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
