//! Typed access to user preferences on top of a raw [`StorageBackend`].

use std::{fmt, sync::Arc, time::Duration};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, warn};
use validator::Validate;

use crate::{dao::storage::StorageBackend, view::DocumentAttributes};

/// Keys under which preferences are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceKey {
    Theme,
    TextScale,
    TimerSeconds,
}

impl PreferenceKey {
    pub fn as_str(self) -> &'static str {
        match self {
            PreferenceKey::Theme => "theme",
            PreferenceKey::TextScale => "text-scale",
            PreferenceKey::TimerSeconds => "timer-seconds",
        }
    }
}

impl fmt::Display for PreferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Color scheme selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    /// Follow the operating system.
    #[default]
    System,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }
}

/// Every preference, each already within its allowed range.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct Preferences {
    pub theme: Theme,
    #[validate(range(min = 0.75, max = 1.5))]
    pub text_scale: f64,
    #[validate(range(min = 5, max = 300))]
    pub timer_seconds: u32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            text_scale: 1.0,
            timer_seconds: 60,
        }
    }
}

impl Preferences {
    /// Duration used for timed game phases.
    pub fn timer_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.timer_seconds))
    }
}

/// Reads and writes preferences; never fails towards its caller.
#[derive(Clone)]
pub struct PreferenceStore {
    backend: Arc<dyn StorageBackend>,
}

impl PreferenceStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Stored value for `key`, or `fallback` when missing, unreadable or corrupted.
    pub fn get<T: DeserializeOwned>(&self, key: PreferenceKey, fallback: T) -> T {
        let raw = match self.backend.read(key.as_str()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return fallback,
            Err(err) => {
                debug!(%key, error = %err, "preference storage unreadable; using fallback");
                return fallback;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                debug!(%key, error = %err, "stored preference is corrupted; using fallback");
                fallback
            }
        }
    }

    /// Persist `value` under `key`. Failures are logged, never returned.
    pub fn set<T: Serialize>(&self, key: PreferenceKey, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(%key, error = %err, "failed to encode preference");
                return;
            }
        };
        if let Err(err) = self.backend.write(key.as_str(), &raw) {
            warn!(%key, error = %err, "failed to persist preference");
        }
    }

    /// Load every preference; out-of-range values fall back to their default one by one.
    pub fn load(&self) -> Preferences {
        let defaults = Preferences::default();
        let candidate = Preferences {
            theme: self.get(PreferenceKey::Theme, defaults.theme),
            text_scale: self.get(PreferenceKey::TextScale, defaults.text_scale),
            timer_seconds: self.get(PreferenceKey::TimerSeconds, defaults.timer_seconds),
        };

        let Err(errors) = candidate.validate() else {
            return candidate;
        };
        let invalid = errors.field_errors();
        debug!(fields = ?invalid.keys().collect::<Vec<_>>(), "ignoring out-of-range preferences");
        Preferences {
            theme: candidate.theme,
            text_scale: if invalid.contains_key("text_scale") {
                defaults.text_scale
            } else {
                candidate.text_scale
            },
            timer_seconds: if invalid.contains_key("timer_seconds") {
                defaults.timer_seconds
            } else {
                candidate.timer_seconds
            },
        }
    }

    /// Persist every preference and apply it to the document.
    ///
    /// Values outside their range are rejected as a whole and nothing is written.
    pub fn save(
        &self,
        preferences: &Preferences,
        document: &dyn DocumentAttributes,
    ) -> Result<(), validator::ValidationErrors> {
        preferences.validate()?;
        self.set(PreferenceKey::Theme, &preferences.theme);
        self.set(PreferenceKey::TextScale, &preferences.text_scale);
        self.set(PreferenceKey::TimerSeconds, &preferences.timer_seconds);
        apply(preferences, document);
        Ok(())
    }

    /// Load the stored preferences and apply them to the document.
    pub fn load_and_apply(&self, document: &dyn DocumentAttributes) -> Preferences {
        let preferences = self.load();
        apply(&preferences, document);
        preferences
    }
}

/// Mirror preferences onto document-level attributes.
pub fn apply(preferences: &Preferences, document: &dyn DocumentAttributes) {
    document.set_attribute("data-theme", preferences.theme.as_str());
    document.set_attribute("data-text-scale", &preferences.text_scale.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dao::memory_store::MemoryStorage, view::recording::RecordingView};

    fn store(backend: MemoryStorage) -> PreferenceStore {
        PreferenceStore::new(Arc::new(backend))
    }

    #[test]
    fn missing_values_use_fallback() {
        let prefs = store(MemoryStorage::new());
        assert_eq!(prefs.get(PreferenceKey::TimerSeconds, 45u32), 45);
    }

    #[test]
    fn corrupted_value_returns_fallback() {
        let prefs = store(MemoryStorage::new().with_raw("theme", "{definitely not json"));
        assert_eq!(prefs.get(PreferenceKey::Theme, Theme::Light), Theme::Light);
    }

    #[test]
    fn wrong_type_returns_fallback() {
        let prefs = store(MemoryStorage::new().with_raw("text-scale", "\"huge\""));
        assert_eq!(prefs.get(PreferenceKey::TextScale, 1.0f64), 1.0);
    }

    #[test]
    fn disabled_storage_never_fails() {
        let prefs = store(MemoryStorage::disabled());
        prefs.set(PreferenceKey::Theme, &Theme::Dark);
        assert_eq!(prefs.get(PreferenceKey::Theme, Theme::System), Theme::System);
        assert_eq!(prefs.load(), Preferences::default());
    }

    #[test]
    fn set_then_get_round_trips_through_json() {
        let prefs = store(MemoryStorage::new());
        prefs.set(PreferenceKey::Theme, &Theme::Dark);
        prefs.set(PreferenceKey::TimerSeconds, &90u32);
        assert_eq!(prefs.get(PreferenceKey::Theme, Theme::System), Theme::Dark);
        assert_eq!(prefs.get(PreferenceKey::TimerSeconds, 60u32), 90);
    }

    #[test]
    fn out_of_range_fields_fall_back_individually() {
        let prefs = store(
            MemoryStorage::new()
                .with_raw("theme", "\"light\"")
                .with_raw("text-scale", "9.0")
                .with_raw("timer-seconds", "120"),
        );
        let loaded = prefs.load();
        assert_eq!(loaded.theme, Theme::Light);
        assert_eq!(loaded.text_scale, 1.0);
        assert_eq!(loaded.timer_seconds, 120);
    }

    #[test]
    fn save_applies_document_attributes() {
        let prefs = store(MemoryStorage::new());
        let document = RecordingView::<()>::new();
        let wanted = Preferences {
            theme: Theme::Dark,
            text_scale: 1.25,
            timer_seconds: 30,
        };

        prefs.save(&wanted, &document).unwrap();

        assert_eq!(document.attribute("data-theme").as_deref(), Some("dark"));
        assert_eq!(document.attribute("data-text-scale").as_deref(), Some("1.25"));
        assert_eq!(prefs.load(), wanted);
    }

    #[test]
    fn invalid_save_writes_nothing() {
        let prefs = store(MemoryStorage::new());
        let document = RecordingView::<()>::new();
        let invalid = Preferences {
            timer_seconds: 1,
            ..Preferences::default()
        };
        assert!(prefs.save(&invalid, &document).is_err());
        assert_eq!(prefs.get(PreferenceKey::TimerSeconds, 0u32), 0);
        assert_eq!(document.attribute("data-theme"), None);
    }
}
