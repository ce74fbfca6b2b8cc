//! User preferences persisted as independent scalar keys.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::{Field, StorageError, ValidationError};
use crate::storage::{Committed, KeyValueStore, BUDGET_KEY, CURRENCY_KEY, DARK_MODE_KEY};

pub const DEFAULT_CURRENCY: &str = "₹";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn is_dark(&self) -> bool {
        matches!(self, Theme::Dark)
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    pub currency: String,
    pub budget_limit: f64,
    pub theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY.into(),
            budget_limit: 0.0,
            theme: Theme::Light,
        }
    }
}

/// Owns the live [`Settings`] and writes each change through to storage.
///
/// Setters update memory first; a failed write is returned to the caller but
/// the new value stays in effect for the session.
pub struct SettingsManager {
    settings: Settings,
    storage: Arc<dyn KeyValueStore>,
    load_errors: Vec<StorageError>,
}

impl SettingsManager {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            settings: Settings::default(),
            storage,
            load_errors: Vec::new(),
        }
    }

    /// Reads every key, falling back to defaults for missing or unreadable values.
    /// Read failures from this pass are kept in [`Self::load_errors`].
    pub fn load(&mut self) -> &Settings {
        self.load_errors.clear();
        let defaults = Settings::default();
        let currency = self
            .read(CURRENCY_KEY)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or(defaults.currency);
        let budget_limit = self
            .read(BUDGET_KEY)
            .and_then(|value| value.trim().parse::<f64>().ok())
            .filter(|value| value.is_finite() && *value >= 0.0)
            .unwrap_or(defaults.budget_limit);
        let theme = match self.read(DARK_MODE_KEY).as_deref().map(str::trim) {
            Some("true") => Theme::Dark,
            _ => Theme::Light,
        };
        self.settings = Settings {
            currency,
            budget_limit,
            theme,
        };
        &self.settings
    }

    /// Storage errors hit by the last [`Self::load`]; their keys fell back to defaults.
    pub fn load_errors(&self) -> &[StorageError] {
        &self.load_errors
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Parses and stores a new budget limit. Zero means "no budget".
    pub fn set_budget(&mut self, raw: &str) -> Result<Committed<f64>, ValidationError> {
        let value = raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite() && *value >= 0.0)
            .ok_or_else(|| {
                ValidationError::new(
                    Field::Budget,
                    "Please enter a valid budget amount (0 or greater)",
                )
            })?;
        self.settings.budget_limit = value;
        info!(budget = value, "budget limit updated");
        Ok(Committed::new(value, self.write(BUDGET_KEY, &value.to_string())))
    }

    pub fn set_currency(&mut self, symbol: &str) -> Result<Committed<()>, ValidationError> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(ValidationError::new(
                Field::Currency,
                "Please select a currency",
            ));
        }
        self.settings.currency = symbol.to_string();
        info!(currency = symbol, "currency updated");
        Ok(Committed::new((), self.write(CURRENCY_KEY, symbol)))
    }

    pub fn toggle_theme(&mut self) -> Committed<Theme> {
        let theme = self.settings.theme.toggled();
        self.settings.theme = theme;
        let flag = if theme.is_dark() { "true" } else { "false" };
        Committed::new(theme, self.write(DARK_MODE_KEY, flag))
    }

    fn read(&mut self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(err) => {
                warn!(key, error = %err, "failed to read setting, using default");
                self.load_errors.push(err);
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage.set(key, value).map_err(|err| {
            warn!(key, error = %err, "failed to persist setting");
            err
        })
    }
}
