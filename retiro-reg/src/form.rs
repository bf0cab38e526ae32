//! Registration form state machine
//!
//! Tracks one in-progress registration across steps, validates at step
//! boundaries (never per keystroke, so the user is never blocked
//! mid-entry), and freezes the draft into an immutable
//! `RegistrationRecord` at submission time.
//!
//! Step flow: Participation → Details → Submitting → Success | Failed.
//! A failed submission keeps the machine on the details data so the user
//! can retry without re-entering anything.

use retiro_common::config::DayConfig;
use retiro_common::model::{
    selected_days_summary, HostingStatus, ParticipationType, RegistrationRecord,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Step-boundary validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing_participation_type")]
    MissingParticipationType,

    #[error("missing_hosting_status")]
    MissingHostingStatus,

    #[error("no_day_selected")]
    NoDaySelected,

    /// A required details field is empty; carries the field name
    #[error("missing_required_field: {0}")]
    MissingRequiredField(&'static str),

    /// Operation invoked from a step where it is not defined
    #[error("invalid_step")]
    InvalidStep,
}

/// Current step of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormStep {
    Participation,
    Details,
    Submitting,
    Success,
    Failed,
}

/// Details field selector for free-form updates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    SpiritualName,
    CivilName,
    IdentityDocument,
    ContactPhone,
    BloodType,
    DietaryRestrictions,
    Transportation,
    GroupSize,
}

/// Result of a day toggle
///
/// `suggest_hosting` is a non-blocking advisory signal, raised exactly
/// when the toggle makes every configured day selected at once. It
/// invites a switch to the hosting package but never forces one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayToggle {
    pub selected: bool,
    pub suggest_hosting: bool,
}

/// Accumulated form fields, built up as the user advances
#[derive(Debug, Clone, Default, Serialize)]
pub struct RegistrationDraft {
    pub participation_type: Option<ParticipationType>,
    pub hosting_status: Option<HostingStatus>,
    pub days: HashMap<String, bool>,
    pub spiritual_name: String,
    pub civil_name: String,
    pub identity_document: String,
    pub contact_phone: String,
    pub blood_type: String,
    pub dietary_restrictions: String,
    pub transportation: String,
    pub group_size: u32,
}

/// One in-progress registration
#[derive(Debug, Clone)]
pub struct RegistrationForm {
    days_config: Vec<DayConfig>,
    require_transportation: bool,
    step: FormStep,
    draft: RegistrationDraft,
    frozen: Option<RegistrationRecord>,
}

impl RegistrationForm {
    /// Create a fresh form at the participation step with an empty draft
    pub fn new(days_config: Vec<DayConfig>, require_transportation: bool) -> Self {
        Self {
            days_config,
            require_transportation,
            step: FormStep::Participation,
            draft: RegistrationDraft::default(),
            frozen: None,
        }
    }

    pub fn step(&self) -> FormStep {
        self.step
    }

    pub fn draft(&self) -> &RegistrationDraft {
        &self.draft
    }

    /// The frozen record, present from submission onward
    pub fn frozen(&self) -> Option<&RegistrationRecord> {
        self.frozen.as_ref()
    }

    /// Set the participation type. Switching away from hosting clears the
    /// hosting status; day flags survive a round trip through hosting.
    /// Ignored outside the participation step.
    pub fn select_participation_type(&mut self, participation: ParticipationType) {
        if self.step != FormStep::Participation {
            return;
        }
        if participation != ParticipationType::Hosting {
            self.draft.hosting_status = None;
        }
        self.draft.participation_type = Some(participation);
    }

    /// Set the hosting status. Ignored unless the hosting branch is
    /// active on the participation step, matching the UI which only
    /// exposes it there.
    pub fn select_hosting_status(&mut self, status: HostingStatus) {
        if self.step != FormStep::Participation {
            return;
        }
        if self.draft.participation_type == Some(ParticipationType::Hosting) {
            self.draft.hosting_status = Some(status);
        }
    }

    /// Flip one day flag. Unknown day ids are ignored, and the flags are
    /// only editable on the participation step.
    pub fn toggle_day(&mut self, day_id: &str) -> DayToggle {
        if self.step != FormStep::Participation {
            return DayToggle {
                selected: self.draft.days.get(day_id).copied().unwrap_or(false),
                suggest_hosting: false,
            };
        }
        if !self.days_config.iter().any(|d| d.id == day_id) {
            tracing::debug!("Ignoring toggle for unconfigured day {}", day_id);
            return DayToggle {
                selected: false,
                suggest_hosting: false,
            };
        }

        let flag = self.draft.days.entry(day_id.to_string()).or_insert(false);
        *flag = !*flag;
        let selected = *flag;

        let all_selected = self
            .days_config
            .iter()
            .all(|d| self.draft.days.get(&d.id).copied().unwrap_or(false));

        DayToggle {
            selected,
            suggest_hosting: all_selected,
        }
    }

    /// Validate step-1 completeness and advance to the details step
    pub fn advance_from_step1(&mut self) -> Result<(), ValidationError> {
        if self.step != FormStep::Participation {
            return Err(ValidationError::InvalidStep);
        }

        match self.draft.participation_type {
            None => return Err(ValidationError::MissingParticipationType),
            Some(ParticipationType::Hosting) => {
                if self.draft.hosting_status.is_none() {
                    return Err(ValidationError::MissingHostingStatus);
                }
            }
            Some(ParticipationType::DayUse) => {
                let any_selected = self
                    .days_config
                    .iter()
                    .any(|d| self.draft.days.get(&d.id).copied().unwrap_or(false));
                if !any_selected {
                    return Err(ValidationError::NoDaySelected);
                }
            }
        }

        self.step = FormStep::Details;
        Ok(())
    }

    /// Free-form update of one details field. Numeric fields coerce to
    /// integer, defaulting to 0 on non-numeric input; the group size is
    /// floored at 1 when the record is frozen.
    pub fn update_field(&mut self, field: FormField, value: &str) {
        match field {
            FormField::SpiritualName => self.draft.spiritual_name = value.to_string(),
            FormField::CivilName => self.draft.civil_name = value.to_string(),
            FormField::IdentityDocument => self.draft.identity_document = value.to_string(),
            FormField::ContactPhone => self.draft.contact_phone = value.to_string(),
            FormField::BloodType => self.draft.blood_type = value.to_string(),
            FormField::DietaryRestrictions => self.draft.dietary_restrictions = value.to_string(),
            FormField::Transportation => self.draft.transportation = value.to_string(),
            FormField::GroupSize => {
                self.draft.group_size = value.trim().parse::<u32>().unwrap_or(0);
            }
        }
    }

    /// Return to the participation step, preserving all accumulated fields
    pub fn go_back_to_step1(&mut self) -> Result<(), ValidationError> {
        match self.step {
            FormStep::Details | FormStep::Failed => {
                self.step = FormStep::Participation;
                Ok(())
            }
            _ => Err(ValidationError::InvalidStep),
        }
    }

    /// Validate step-2 completeness, freeze the record (deriving the day
    /// summary), and transition to Submitting.
    ///
    /// The returned record is the exact payload the submission pipeline
    /// must see; the machine never mutates it afterwards. The caller
    /// reports the pipeline outcome via `mark_succeeded` / `mark_failed`.
    pub fn submit(&mut self) -> Result<RegistrationRecord, ValidationError> {
        if self.step != FormStep::Details && self.step != FormStep::Failed {
            return Err(ValidationError::InvalidStep);
        }

        if self.draft.civil_name.trim().is_empty() {
            return Err(ValidationError::MissingRequiredField("civil_name"));
        }
        if self.draft.identity_document.trim().is_empty() {
            return Err(ValidationError::MissingRequiredField("identity_document"));
        }
        if self.draft.contact_phone.trim().is_empty() {
            return Err(ValidationError::MissingRequiredField("contact_phone"));
        }
        if self.require_transportation && self.draft.transportation.trim().is_empty() {
            return Err(ValidationError::MissingRequiredField("transportation"));
        }

        let participation = self
            .draft
            .participation_type
            .ok_or(ValidationError::MissingParticipationType)?;

        let record = RegistrationRecord {
            civil_name: self.draft.civil_name.clone(),
            spiritual_name: self.draft.spiritual_name.clone(),
            identity_document: self.draft.identity_document.clone(),
            contact_phone: self.draft.contact_phone.clone(),
            blood_type: self.draft.blood_type.clone(),
            dietary_restrictions: self.draft.dietary_restrictions.clone(),
            participation_type: participation,
            hosting_status: self.draft.hosting_status,
            days: self.draft.days.clone(),
            transportation: self.draft.transportation.clone(),
            group_size: self.draft.group_size.max(1),
            selected_days_summary: selected_days_summary(
                participation,
                &self.draft.days,
                &self.days_config,
            ),
            submitted_at: Some(chrono::Utc::now()),
        };

        self.frozen = Some(record.clone());
        self.step = FormStep::Submitting;
        Ok(record)
    }

    /// Report pipeline success
    pub fn mark_succeeded(&mut self) {
        if self.step == FormStep::Submitting {
            self.step = FormStep::Success;
        }
    }

    /// Report pipeline failure. The draft is kept intact so the user can
    /// retry without re-entering data.
    pub fn mark_failed(&mut self) {
        if self.step == FormStep::Submitting {
            self.step = FormStep::Failed;
        }
    }
}
