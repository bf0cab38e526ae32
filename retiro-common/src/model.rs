//! Registration record model
//!
//! The canonical shape of one attendee submission. Serde field names match
//! the sheet row shape used by the external tabular store, so an appended
//! record and a bulk-read row are the same JSON object.
//!
//! The day summary string is derived, never stored independently of the
//! participation fields: it is computed exactly once, when the in-progress
//! form is frozen into a `RegistrationRecord` at submission time.

use crate::config::DayConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fixed summary label used instead of a day list when the attendee books
/// the full hosting package
pub const HOSTING_SUMMARY: &str = "Hospedagem (todos os dias)";

/// Accepted blood type entries, plus the "don't know" option
pub const BLOOD_TYPES: [&str; 9] = [
    "A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-", "Não sei",
];

/// Participation mode, mutually exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipationType {
    /// Full multi-day package including lodging and meals
    Hosting,
    /// Individual selected days without overnight lodging
    #[serde(rename = "dayuse")]
    DayUse,
}

impl Default for ParticipationType {
    fn default() -> Self {
        ParticipationType::DayUse
    }
}

/// Payment state of a hosting booking; meaningful only for
/// `ParticipationType::Hosting`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostingStatus {
    Paid,
    Reserving,
}

/// One frozen attendee submission
///
/// Immutable after submission: the record is assembled by the form state
/// machine, frozen at submit time, appended to the tabular store, and
/// thereafter consumed read-only by the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationRecord {
    #[serde(rename = "civilName")]
    pub civil_name: String,

    #[serde(rename = "spiritualName", default)]
    pub spiritual_name: String,

    /// Free-form identity document (RG); lookup hint, not format-validated
    #[serde(rename = "rg")]
    pub identity_document: String,

    /// Contact channel and messaging-handoff destination
    #[serde(rename = "phone")]
    pub contact_phone: String,

    #[serde(rename = "bloodType", default)]
    pub blood_type: String,

    #[serde(rename = "restrictions", default)]
    pub dietary_restrictions: String,

    #[serde(rename = "participationType", default)]
    pub participation_type: ParticipationType,

    #[serde(rename = "hostingStatus", default, skip_serializing_if = "Option::is_none")]
    pub hosting_status: Option<HostingStatus>,

    /// Structured day-flag set, keyed by day id. Stored alongside the
    /// derived summary so readers are not forced into substring matching.
    #[serde(default)]
    pub days: HashMap<String, bool>,

    #[serde(rename = "transport", default)]
    pub transportation: String,

    /// Number of people covered by this submission, at least 1
    #[serde(rename = "groupSize", default = "default_group_size")]
    pub group_size: u32,

    /// Human-readable join of chosen day labels in configuration order,
    /// or `HOSTING_SUMMARY` for hosting records
    #[serde(rename = "selectedDays", default)]
    pub selected_days_summary: String,

    #[serde(rename = "timestamp", default)]
    pub submitted_at: Option<DateTime<Utc>>,
}

fn default_group_size() -> u32 {
    1
}

impl RegistrationRecord {
    /// Whether the given configured day is selected in this record
    pub fn day_selected(&self, day_id: &str) -> bool {
        self.days.get(day_id).copied().unwrap_or(false)
    }
}

/// Derive the day summary string from the participation fields.
///
/// Labels join in configuration order, not selection order. Hosting
/// records get the fixed `HOSTING_SUMMARY` label regardless of day flags.
pub fn selected_days_summary(
    participation: ParticipationType,
    days: &HashMap<String, bool>,
    config: &[DayConfig],
) -> String {
    match participation {
        ParticipationType::Hosting => HOSTING_SUMMARY.to_string(),
        ParticipationType::DayUse => config
            .iter()
            .filter(|d| days.get(&d.id).copied().unwrap_or(false))
            .map(|d| d.label.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    }
}
