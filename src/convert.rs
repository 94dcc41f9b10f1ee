//! Converter, deduplicator and reconciler.
//!
//! Assigns deterministic identifiers, aggregates monthly summaries and
//! computes the balance-gap diagnostic against the header totals.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use sha2::{Digest, Sha256};

use crate::dates::month_key;
use crate::models::{
    ActivityEntry, FlightSegment, MonthlySummary, ParsedHeader, ReconciliationReport, StatusEvent,
    TransactionCategory,
};

/// Balance gaps at or below this many miles are noise, not history.
pub const MATERIALITY_THRESHOLD_MILES: i64 = 100;

const ID_HEX_LEN: usize = 16;

/// Identifier as a pure function of the entry's content. Two identical lines
/// hash identically; [`assign_ids`] disambiguates them with an index suffix.
fn base_id(entry: &ActivityEntry) -> String {
    let mut hasher = Sha256::new();
    hasher.update(entry.date.to_string().as_bytes());
    hasher.update(b"|");
    hasher.update(entry.category.as_str().as_bytes());
    hasher.update(b"|");
    hasher.update(entry.miles.to_string().as_bytes());
    hasher.update(b"|");
    hasher.update(entry.xp.to_string().as_bytes());
    hasher.update(b"|");
    hasher.update(entry.description.as_bytes());
    let digest = hasher.finalize();
    let hex = format!("{digest:x}");
    hex[..ID_HEX_LEN].to_string()
}

/// Fill in every entry's identifier. Genuine duplicates (same description on
/// the same date, which does happen) keep their multiplicity: the second and
/// later occurrences get `-2`, `-3`, … appended instead of collapsing.
pub fn assign_ids(activities: &mut [ActivityEntry]) {
    let mut seen: HashMap<String, u32> = HashMap::new();
    for entry in activities.iter_mut() {
        let base = base_id(entry);
        let count = seen.entry(base.clone()).or_insert(0);
        *count += 1;
        entry.id = if *count == 1 {
            base
        } else {
            format!("{base}-{count}")
        };
    }
}

/// Monthly aggregates for legacy consumers, in chronological order.
pub fn monthly_summaries(
    flights: &[FlightSegment],
    activities: &[ActivityEntry],
) -> Vec<MonthlySummary> {
    let mut months: BTreeMap<String, MonthlySummary> = BTreeMap::new();

    for flight in flights {
        let summary = month_entry(&mut months, month_key(flight.date));
        let miles = flight.miles + flight.saf_miles;
        if miles >= 0 {
            summary.miles_earned += miles;
        } else {
            summary.miles_spent += -miles;
        }
        summary.xp += flight.xp + flight.saf_xp;
        summary.flight_count += 1;
    }
    for activity in activities {
        let summary = month_entry(&mut months, month_key(activity.date));
        if activity.miles >= 0 {
            summary.miles_earned += activity.miles;
        } else {
            summary.miles_spent += -activity.miles;
        }
        summary.xp += activity.xp;
        summary.activity_count += 1;
    }

    months.into_values().collect()
}

fn month_entry(
    months: &mut BTreeMap<String, MonthlySummary>,
    key: String,
) -> &mut MonthlySummary {
    months.entry(key.clone()).or_insert_with(|| MonthlySummary {
        month: key,
        miles_earned: 0,
        miles_spent: 0,
        xp: 0,
        flight_count: 0,
        activity_count: 0,
    })
}

/// XP earned outside of flights, per month.
pub fn bonus_xp_by_month(activities: &[ActivityEntry]) -> BTreeMap<String, i64> {
    let mut map = BTreeMap::new();
    for activity in activities {
        if activity.xp != 0 {
            *map.entry(month_key(activity.date)).or_insert(0) += activity.xp;
        }
    }
    map
}

/// Compare the header balance against everything the parse recovered. A
/// material gap suggests miles earned before the statement excerpt begins,
/// modeled as one correction entry dated to the earliest parsed month.
pub fn reconcile(
    header: &ParsedHeader,
    flights: &[FlightSegment],
    activities: &[ActivityEntry],
    status_events: &[StatusEvent],
) -> ReconciliationReport {
    let flight_miles: i64 = flights.iter().map(|f| f.miles + f.saf_miles).sum();
    let activity_miles: i64 = activities.iter().map(|a| a.miles).sum();
    let parsed_total = flight_miles + activity_miles;
    let difference = header.total_miles - parsed_total;

    let oldest = flights
        .iter()
        .map(|f| f.date)
        .chain(activities.iter().map(|a| a.date))
        .chain(status_events.iter().map(|e| e.date))
        .min();

    let suggested_correction = if difference.abs() > MATERIALITY_THRESHOLD_MILES {
        oldest.map(|date| {
            let first_of_month =
                NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date);
            let mut correction = ActivityEntry {
                id: String::new(),
                date: first_of_month,
                category: TransactionCategory::Adjustment,
                description: "Historical balance adjustment".to_string(),
                miles: difference,
                xp: 0,
            };
            correction.id = base_id(&correction);
            correction
        })
    } else {
        None
    };

    ReconciliationReport {
        header_balance: header.total_miles,
        parsed_total,
        difference,
        oldest_month: oldest.map(month_key),
        suggested_correction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Language, StatusTier};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn activity(date: NaiveDate, miles: i64, xp: i64, description: &str) -> ActivityEntry {
        ActivityEntry {
            id: String::new(),
            date,
            category: TransactionCategory::Adjustment,
            description: description.to_string(),
            miles,
            xp,
        }
    }

    fn flight(date: NaiveDate, miles: i64) -> FlightSegment {
        FlightSegment {
            origin: "AMS".into(),
            destination: "JFK".into(),
            flight_number: "KL641".into(),
            carrier: "KL".into(),
            date,
            miles,
            xp: 10,
            uxp: 0,
            saf_miles: 0,
            saf_xp: 0,
            saf_uxp: 0,
            cabin: None,
            revenue: true,
        }
    }

    fn header(total_miles: i64) -> ParsedHeader {
        ParsedHeader {
            member_name: None,
            member_number: None,
            tier: StatusTier::Explorer,
            total_miles,
            total_xp: 0,
            total_uxp: 0,
            export_date: d(2025, 6, 1),
            language: Language::En,
        }
    }

    #[test]
    fn test_identical_entries_get_distinct_suffixed_ids() {
        let mut entries = vec![
            activity(d(2025, 3, 12), 0, 20, "Adjustment"),
            activity(d(2025, 3, 12), 0, 20, "Adjustment"),
            activity(d(2025, 3, 12), 0, 20, "Adjustment"),
        ];
        assign_ids(&mut entries);
        assert_eq!(entries[1].id, format!("{}-2", entries[0].id));
        assert_eq!(entries[2].id, format!("{}-3", entries[0].id));
        let ids: std::collections::HashSet<_> = entries.iter().map(|e| &e.id).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_distinct_entry_keeps_unsuffixed_base_id() {
        let mut entries = vec![
            activity(d(2025, 3, 12), 0, 20, "Adjustment"),
            activity(d(2025, 3, 13), 0, 20, "Adjustment"),
        ];
        assign_ids(&mut entries);
        assert!(!entries[0].id.contains('-'));
        assert!(!entries[1].id.contains('-'));
        assert_ne!(entries[0].id, entries[1].id);
    }

    #[test]
    fn test_ids_are_deterministic_across_runs() {
        let mut a = vec![activity(d(2025, 3, 12), 500, 5, "Hotel stay")];
        let mut b = vec![activity(d(2025, 3, 12), 500, 5, "Hotel stay")];
        assign_ids(&mut a);
        assign_ids(&mut b);
        assert_eq!(a[0].id, b[0].id);
        assert_eq!(a[0].id.len(), ID_HEX_LEN);
    }

    #[test]
    fn test_reconciliation_with_material_gap() {
        // Header says 50,000; flights sum to 30,000 and activities to
        // 15,000, so 5,000 miles predate the excerpt.
        let flights = vec![flight(d(2025, 2, 10), 30_000)];
        let activities = vec![activity(d(2025, 1, 20), 15_000, 0, "Card purchase")];
        let report = reconcile(&header(50_000), &flights, &activities, &[]);
        assert_eq!(report.parsed_total, 45_000);
        assert_eq!(report.difference, 5_000);
        assert_eq!(report.oldest_month.as_deref(), Some("2025-01"));
        let correction = report.suggested_correction.unwrap();
        assert_eq!(correction.miles, 5_000);
        assert_eq!(correction.date, d(2025, 1, 1));
        assert_eq!(correction.category, TransactionCategory::Adjustment);
    }

    #[test]
    fn test_no_correction_below_threshold() {
        let flights = vec![flight(d(2025, 2, 10), 950)];
        let report = reconcile(&header(1_000), &flights, &[], &[]);
        assert_eq!(report.difference, 50);
        assert!(report.suggested_correction.is_none());
    }

    #[test]
    fn test_saf_miles_count_toward_parsed_total() {
        let mut f = flight(d(2025, 2, 10), 1_000);
        f.saf_miles = 500;
        let report = reconcile(&header(1_500), &[f], &[], &[]);
        assert_eq!(report.parsed_total, 1_500);
        assert_eq!(report.difference, 0);
    }

    #[test]
    fn test_monthly_summaries() {
        let flights = vec![flight(d(2025, 2, 10), 2_000)];
        let activities = vec![
            activity(d(2025, 2, 20), 500, 5, "Hotel stay"),
            activity(d(2025, 3, 1), -1_000, 0, "Award booking"),
        ];
        let summaries = monthly_summaries(&flights, &activities);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].month, "2025-02");
        assert_eq!(summaries[0].miles_earned, 2_500);
        assert_eq!(summaries[0].flight_count, 1);
        assert_eq!(summaries[0].activity_count, 1);
        assert_eq!(summaries[1].miles_spent, 1_000);
    }

    #[test]
    fn test_bonus_xp_map() {
        let activities = vec![
            activity(d(2025, 2, 20), 0, 20, "Welcome bonus"),
            activity(d(2025, 2, 25), 0, 10, "Subscription"),
            activity(d(2025, 3, 1), 500, 0, "Hotel stay"),
        ];
        let map = bonus_xp_by_month(&activities);
        assert_eq!(map.get("2025-02"), Some(&30));
        assert_eq!(map.get("2025-03"), None);
    }
}
