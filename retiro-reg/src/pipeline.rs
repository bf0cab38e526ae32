//! Submission pipeline
//!
//! Given a frozen registration record, performs the three submission
//! effects and aggregates their outcomes:
//!
//! 1. Guidance request — best-effort personalized blessing, fixed
//!    fallback on any failure.
//! 2. Sheet append — convenience mirror of the record; failure is logged
//!    and only fails the submission under the `await_store_append` policy.
//! 3. Messaging handoff — deterministic confirmation text wrapped in a
//!    `wa.me` deep link. This is the canonical confirmation channel.
//!
//! The guidance request and the sheet append run concurrently; neither
//! waits on the other.

use crate::services::{whatsapp, GuidanceClient};
use retiro_common::config::EventConfig;
use retiro_common::model::{ParticipationType, RegistrationRecord};
use retiro_common::sheet::SheetClient;
use retiro_common::{Error, Result};
use serde::Serialize;
use tracing::warn;

/// Aggregated result of one submission
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionOutcome {
    /// Personalized blessing, or the fixed fallback
    pub guidance_message: String,
    /// Pre-filled chat deep link to the organizer
    pub messaging_link: String,
    /// Seconds until the success view auto-redirects; 0 means never
    pub redirect_countdown_secs: u64,
}

/// Submission effect dispatcher
#[derive(Debug, Clone)]
pub struct SubmissionPipeline {
    guidance: GuidanceClient,
    sheet: SheetClient,
    organizer_phone: String,
    event: retiro_common::config::EventInfo,
    await_store_append: bool,
    redirect_countdown_secs: u64,
}

impl SubmissionPipeline {
    pub fn new(config: &EventConfig) -> Self {
        Self {
            guidance: GuidanceClient::new(
                config.guidance.clone(),
                &config.event.title,
                &config.event.guest,
            ),
            sheet: SheetClient::new(&config.sheet_url),
            organizer_phone: config.organizer_phone.clone(),
            event: config.event.clone(),
            await_store_append: config.await_store_append,
            redirect_countdown_secs: config.redirect_countdown_secs,
        }
    }

    /// Run the submission effects for one frozen record.
    ///
    /// Fails only when the store-append policy is strict and the append
    /// rejected; every other failure path degrades internally.
    pub async fn submit(&self, record: &RegistrationRecord) -> Result<SubmissionOutcome> {
        let context = match record.participation_type {
            ParticipationType::Hosting => {
                "Escolheu o pacote completo de hospedagem para o evento.".to_string()
            }
            ParticipationType::DayUse => format!(
                "Desejo vir no evento nos dias {}",
                record.selected_days_summary
            ),
        };

        // Guidance and sheet append are independent; fire them together
        let (guidance_message, append_result) = tokio::join!(
            self.guidance.blessing(&record.civil_name, &context),
            self.sheet.append(record),
        );

        if let Err(e) = append_result {
            warn!("Sheet append failed for {}: {}", record.civil_name, e);
            if self.await_store_append {
                return Err(Error::Internal(format!("Sheet append failed: {}", e)));
            }
        }

        let messaging_link =
            whatsapp::handoff_link(&self.organizer_phone, record, &self.event);

        Ok(SubmissionOutcome {
            guidance_message,
            messaging_link,
            redirect_countdown_secs: self.redirect_countdown_secs,
        })
    }
}
