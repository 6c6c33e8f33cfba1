//! Player settings and preferences
//!
//! Persisted separately from sessions (LocalStorage on web, a JSON file
//! natively).

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;

/// Assistance presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AssistLevel {
    /// Direct control, no guide line
    Off,
    /// Looser smoothing for experienced players
    Light,
    #[default]
    Full,
}

impl AssistLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssistLevel::Off => "Off",
            AssistLevel::Light => "Light",
            AssistLevel::Full => "Full",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "off" | "none" => Some(AssistLevel::Off),
            "light" => Some(AssistLevel::Light),
            "full" | "on" => Some(AssistLevel::Full),
            _ => None,
        }
    }

    /// Whether sessions start with assistance on
    pub fn enabled(&self) -> bool {
        *self != AssistLevel::Off
    }

    /// Smoothing factor used while assistance is on
    pub fn smoothing(&self) -> f32 {
        match self {
            AssistLevel::Off | AssistLevel::Full => ASSIST_SMOOTHING,
            AssistLevel::Light => 0.3,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub assist: AssistLevel,
    /// Override for the preset smoothing factor (0 < s <= 1)
    pub smoothing_override: Option<f32>,
    /// Instrument tip radius (pixels)
    pub instrument_radius: f32,
    /// Speed contribution to the risk meter
    pub risk_speed_weight: f32,
    /// Seed for random target placement (None = caller picks)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            assist: AssistLevel::Full,
            smoothing_override: None,
            instrument_radius: INSTRUMENT_RADIUS,
            risk_speed_weight: RISK_SPEED_WEIGHT,
            seed: None,
        }
    }
}

impl Settings {
    /// Effective smoothing factor, clamped to (0, 1]
    pub fn smoothing(&self) -> f32 {
        self.smoothing_override
            .unwrap_or_else(|| self.assist.smoothing())
            .clamp(0.01, 1.0)
    }

    /// Parse settings JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "scalpel_rush_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let loaded = crate::platform::web::read_storage(Self::STORAGE_KEY)
            .and_then(|json| Self::from_json(&json));
        match loaded {
            Ok(settings) => {
                log::info!("Loaded settings from LocalStorage");
                settings
            }
            Err(e) => {
                log::info!("{e}, using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let saved = self
            .to_json()
            .and_then(|json| crate::platform::web::write_storage(Self::STORAGE_KEY, &json));
        match saved {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("{e}"),
        }
    }

    /// Load settings from a JSON file, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: &std::path::Path) -> Self {
        let loaded = std::fs::read_to_string(path)
            .map_err(|e| SimError::unavailable(path.display().to_string(), e))
            .and_then(|json| Self::from_json(&json));

        match loaded {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("{e}, using default settings");
                Self::default()
            }
        }
    }
}
