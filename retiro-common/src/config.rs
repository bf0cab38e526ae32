//! Event configuration loading
//!
//! All event-specific values (dates, day enumeration, organizer contact,
//! collaborator endpoints, policies) live in one immutable `EventConfig`
//! injected into the services at startup. Nothing reads ambient globals,
//! so tests can run against synthetic configurations.
//!
//! Config file resolution priority order:
//! 1. Command-line argument (highest priority)
//! 2. `RETIRO_CONFIG` environment variable
//! 3. Platform config file (`~/.config/retiro/config.toml`)
//! 4. Compiled defaults (fallback; missing file is a warning, not an error)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "RETIRO_CONFIG";

/// One attendance-day toggle: stable id plus display label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayConfig {
    /// Stable identifier, used as the selection key (e.g. "day31")
    pub id: String,
    /// Display label, also the unit of the stored day summary (e.g. "31/Dez")
    pub label: String,
}

impl DayConfig {
    pub fn new(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
        }
    }
}

/// Static event presentation data shown to attendees and embedded in the
/// messaging handoff
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EventInfo {
    pub title: String,
    pub guest: String,
    pub location: String,
    pub venue: String,
    pub dates: String,
    pub description: String,
}

impl Default for EventInfo {
    fn default() -> Self {
        Self {
            title: "Réveillon Transcendental".to_string(),
            guest: "Srila Gurudeva".to_string(),
            location: "Palhoça, SC".to_string(),
            venue: "Rancho Serra Mar".to_string(),
            dates: "31/12 (18:00) - 02/01".to_string(),
            description: "Celebração espiritual de ano novo com mantras, \
                          ensinamentos védicos e prasadam sagrado."
                .to_string(),
        }
    }
}

/// Generative-text collaborator settings
///
/// An empty `api_key` disables the collaborator entirely; the pipeline
/// falls back to the fixed blessing without attempting a network call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GuidanceConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
    pub temperature: f64,
    pub top_p: f64,
}

impl Default for GuidanceConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-3-flash-preview".to_string(),
            api_key: String::new(),
            temperature: 0.8,
            top_p: 0.9,
        }
    }
}

/// Immutable event configuration shared by both services
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    pub event: EventInfo,

    /// Ordered attendance-day enumeration; order here defines summary and
    /// per-day report order
    pub days: Vec<DayConfig>,

    /// Messaging-handoff destination (digits only, country code included)
    pub organizer_phone: String,

    /// Tabular store endpoint; empty string disables the sheet mirror
    pub sheet_url: String,

    pub guidance: GuidanceConfig,

    /// Dashboard access gate; empty string disables the gate.
    /// Navigation convenience only, not a security boundary.
    pub admin_passphrase: String,

    /// When true, a failed sheet append fails the whole submission.
    /// When false (default) the append is best-effort and the messaging
    /// handoff remains the canonical confirmation channel.
    pub await_store_append: bool,

    /// Require the transportation field at submit (logistics variant)
    pub require_transportation: bool,

    /// Seconds before the success view auto-redirects back to the form;
    /// 0 disables the countdown
    pub redirect_countdown_secs: u64,

    pub reg_port: u16,
    pub admin_port: u16,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            event: EventInfo::default(),
            days: vec![
                DayConfig::new("day30", "30/Dez"),
                DayConfig::new("day31", "31/Dez"),
                DayConfig::new("day01", "01/Jan"),
                DayConfig::new("day02", "02/Jan"),
                DayConfig::new("day03", "03/Jan"),
            ],
            organizer_phone: "554896597389".to_string(),
            sheet_url: String::new(),
            guidance: GuidanceConfig::default(),
            admin_passphrase: String::new(),
            await_store_append: false,
            require_transportation: false,
            redirect_countdown_secs: 15,
            reg_port: 5750,
            admin_port: 5751,
        }
    }
}

impl EventConfig {
    /// Load configuration following the priority order in the module docs.
    ///
    /// A missing config file falls back to compiled defaults with a
    /// warning; a file that exists but fails to parse is an error.
    pub fn load(cli_arg: Option<&str>) -> Result<Self> {
        let path = resolve_config_path(cli_arg);

        let Some(path) = path else {
            warn!("No config file found, using compiled defaults");
            return Ok(Self::default());
        };

        if !path.exists() {
            warn!("Config file {} does not exist, using compiled defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config: EventConfig = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string (test hook)
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: EventConfig =
            toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.days.is_empty() {
            return Err(Error::Config("days enumeration must not be empty".to_string()));
        }
        if self.organizer_phone.is_empty() {
            return Err(Error::Config("organizer_phone must not be empty".to_string()));
        }
        Ok(())
    }

    /// Display label for a day id, if configured
    pub fn day_label(&self, id: &str) -> Option<&str> {
        self.days.iter().find(|d| d.id == id).map(|d| d.label.as_str())
    }
}

/// Resolve the config file path without touching the filesystem beyond
/// an existence check on the platform default.
fn resolve_config_path(cli_arg: Option<&str>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(PathBuf::from(path));
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        return Some(PathBuf::from(path));
    }

    // Priority 3: Platform config file
    dirs::config_dir().map(|d| d.join("retiro").join("config.toml"))
}
