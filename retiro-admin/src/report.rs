//! Aggregation over the fetched registration snapshot
//!
//! Pure functions: the dashboard fetches the full record list from the
//! tabular store, computes everything it shows from that snapshot, and
//! recomputes from scratch on every refresh. Nothing here holds state.

use retiro_common::config::DayConfig;
use retiro_common::model::{HostingStatus, ParticipationType, RegistrationRecord};
use serde::Serialize;

/// Restrictions of this many characters or fewer are treated as
/// placeholder entries ("ok", "-", "não") and excluded from the alert
/// count. Counted in characters, not bytes, so accented placeholders
/// stay below the threshold.
const RESTRICTION_MIN_CHARS: usize = 3;

/// Per-day attendance count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCount {
    pub label: String,
    pub count: usize,
}

/// Summary counts over one snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryStats {
    /// Number of stored records
    pub total: usize,
    /// Total attendees: sum of group sizes, absent values counting as 1
    pub attendees: u64,
    /// One count per configured day, in configuration order
    pub per_day: Vec<DayCount>,
    pub hosting: usize,
    pub hosting_paid: usize,
    pub hosting_reserving: usize,
    /// Records with a non-trivial dietary restriction entry
    pub restrictions: usize,
}

/// Compute summary counts for the dashboard.
///
/// Day counting matches against the stored human-readable summary string
/// (substring containment), because that is the representation the store
/// carries for rows written by every form variant. Latent risk: a day
/// label that is a substring of another label would double-count; the
/// configured labels ("31/Dez", "01/Jan", ...) keep them disjoint.
pub fn compute_summary(records: &[RegistrationRecord], days: &[DayConfig]) -> SummaryStats {
    let per_day = days
        .iter()
        .map(|day| DayCount {
            label: day.label.clone(),
            count: records
                .iter()
                .filter(|r| r.selected_days_summary.contains(&day.label))
                .count(),
        })
        .collect();

    let hosting_records = || {
        records
            .iter()
            .filter(|r| r.participation_type == ParticipationType::Hosting)
    };

    SummaryStats {
        total: records.len(),
        attendees: records.iter().map(|r| u64::from(r.group_size.max(1))).sum(),
        per_day,
        hosting: hosting_records().count(),
        hosting_paid: hosting_records()
            .filter(|r| r.hosting_status == Some(HostingStatus::Paid))
            .count(),
        hosting_reserving: hosting_records()
            .filter(|r| r.hosting_status == Some(HostingStatus::Reserving))
            .count(),
        restrictions: records
            .iter()
            .filter(|r| r.dietary_restrictions.chars().count() > RESTRICTION_MIN_CHARS)
            .count(),
    }
}

/// Case-insensitive free-text filter over name, spiritual name, document,
/// and phone. An empty query returns the snapshot unchanged; original
/// order is always preserved.
pub fn filter<'a>(records: &'a [RegistrationRecord], query: &str) -> Vec<&'a RegistrationRecord> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return records.iter().collect();
    }

    records
        .iter()
        .filter(|r| {
            r.civil_name.to_lowercase().contains(&needle)
                || r.spiritual_name.to_lowercase().contains(&needle)
                || r.identity_document.to_lowercase().contains(&needle)
                || r.contact_phone.to_lowercase().contains(&needle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn three_days() -> Vec<DayConfig> {
        vec![
            DayConfig::new("day31", "31/Dez"),
            DayConfig::new("day01", "01/Jan"),
            DayConfig::new("day02", "02/Jan"),
        ]
    }

    fn day_use(name: &str, summary: &str) -> RegistrationRecord {
        RegistrationRecord {
            civil_name: name.to_string(),
            spiritual_name: String::new(),
            identity_document: "12345".to_string(),
            contact_phone: "5511999999999".to_string(),
            blood_type: String::new(),
            dietary_restrictions: String::new(),
            participation_type: ParticipationType::DayUse,
            hosting_status: None,
            days: HashMap::new(),
            transportation: String::new(),
            group_size: 1,
            selected_days_summary: summary.to_string(),
            submitted_at: None,
        }
    }

    fn hosting(name: &str, status: HostingStatus) -> RegistrationRecord {
        let mut r = day_use(name, retiro_common::model::HOSTING_SUMMARY);
        r.participation_type = ParticipationType::Hosting;
        r.hosting_status = Some(status);
        r
    }

    #[test]
    fn empty_snapshot_yields_all_zero_counts() {
        let stats = compute_summary(&[], &three_days());
        assert_eq!(stats.total, 0);
        assert_eq!(stats.attendees, 0);
        assert_eq!(stats.hosting, 0);
        assert_eq!(stats.restrictions, 0);
        assert!(stats.per_day.iter().all(|d| d.count == 0));
        assert_eq!(stats.per_day.len(), 3);
    }

    #[test]
    fn all_hosting_paid_counts_as_hosting_not_days() {
        let records: Vec<_> = (0..4)
            .map(|i| hosting(&format!("Pessoa {}", i), HostingStatus::Paid))
            .collect();
        let stats = compute_summary(&records, &three_days());

        assert_eq!(stats.total, 4);
        assert_eq!(stats.hosting, 4);
        assert_eq!(stats.hosting_paid, 4);
        assert_eq!(stats.hosting_reserving, 0);
        assert!(stats.per_day.iter().all(|d| d.count == 0));
    }

    #[test]
    fn day_counts_use_summary_substring_containment() {
        let records = vec![
            day_use("Ana", "31/Dez, 01/Jan"),
            day_use("Bia", "01/Jan"),
            day_use("Clara", "02/Jan"),
        ];
        let stats = compute_summary(&records, &three_days());

        let by_label: HashMap<&str, usize> = stats
            .per_day
            .iter()
            .map(|d| (d.label.as_str(), d.count))
            .collect();
        assert_eq!(by_label["31/Dez"], 1);
        assert_eq!(by_label["01/Jan"], 2);
        assert_eq!(by_label["02/Jan"], 1);
    }

    #[test]
    fn attendees_sum_group_sizes_with_floor_of_one() {
        let mut a = day_use("Ana", "01/Jan");
        a.group_size = 3;
        let mut b = day_use("Bia", "01/Jan");
        b.group_size = 0; // defensive: malformed stored row
        let stats = compute_summary(&[a, b], &three_days());
        assert_eq!(stats.attendees, 4);
    }

    #[test]
    fn short_restriction_entries_are_not_alerts() {
        let mut a = day_use("Ana", "01/Jan");
        a.dietary_restrictions = "ok".to_string();
        let mut b = day_use("Bia", "01/Jan");
        b.dietary_restrictions = "Alergia a amendoim".to_string();
        let stats = compute_summary(&[a, b], &three_days());
        assert_eq!(stats.restrictions, 1);
    }

    #[test]
    fn accented_placeholder_stays_below_threshold() {
        // "não" is 3 characters but 4 UTF-8 bytes; the threshold counts
        // characters, so it must not register as an alert
        let mut a = day_use("Ana", "01/Jan");
        a.dietary_restrictions = "não".to_string();
        let mut b = day_use("Bia", "01/Jan");
        b.dietary_restrictions = "vegana".to_string();
        let stats = compute_summary(&[a, b], &three_days());
        assert_eq!(stats.restrictions, 1);
    }

    #[test]
    fn empty_query_returns_all_records_in_order() {
        let records = vec![day_use("Ana", ""), day_use("Bia", ""), day_use("Caio", "")];
        let filtered = filter(&records, "");
        let names: Vec<_> = filtered.iter().map(|r| r.civil_name.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Bia", "Caio"]);
    }

    #[test]
    fn filter_is_case_insensitive_across_fields() {
        let mut a = day_use("Ana Silva", "");
        a.spiritual_name = "Madhavi".to_string();
        let b = day_use("Bruno", "");
        let records = vec![a, b];

        assert_eq!(filter(&records, "ana").len(), 1);
        assert_eq!(filter(&records, "MADHAVI").len(), 1);
        assert_eq!(filter(&records, "12345").len(), 2); // shared document
        assert_eq!(filter(&records, "zzz").len(), 0);
    }
}
