use super::error::SettingsError;
use model::time::VisibilityBuffer;
use tracing::info;

/// Environment variable holding the visibility buffer in whole seconds.
pub const WINDOW_BUFFER_ENV: &str = "RECORD_CHANGE_WINDOW_BUFFER";

/// Settings shared by every window a runner opens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowSettings {
    pub buffer: VisibilityBuffer,
}

impl WindowSettings {
    pub fn new(buffer: VisibilityBuffer) -> Self {
        Self { buffer }
    }

    /// Load from the process environment.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary lookup, e.g. a map in tests.
    ///
    /// An unset or blank variable keeps the floor. Values below the floor are
    /// raised to it; values that are not integers are rejected.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = match lookup(WINDOW_BUFFER_ENV) {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => return Ok(Self::default()),
        };

        let secs: i64 = raw.trim().parse().map_err(|_| {
            SettingsError::invalid(WINDOW_BUFFER_ENV, &raw, "expected whole seconds")
        })?;

        let buffer = VisibilityBuffer::from_secs(secs);
        if secs < VisibilityBuffer::FLOOR_SECS {
            info!(
                configured = secs,
                effective = %buffer,
                "Window buffer below the minimum, using the minimum"
            );
        }

        Ok(Self { buffer })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_to_floor_when_unset() {
        let settings = WindowSettings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings.buffer, VisibilityBuffer::floor());

        let settings = WindowSettings::from_lookup(lookup(&[(WINDOW_BUFFER_ENV, " ")])).unwrap();
        assert_eq!(settings.buffer, VisibilityBuffer::floor());
    }

    #[test]
    fn raises_buffer_above_floor() {
        let settings =
            WindowSettings::from_lookup(lookup(&[(WINDOW_BUFFER_ENV, "300")])).unwrap();
        assert_eq!(settings.buffer.as_delta(), TimeDelta::seconds(300));
    }

    #[test]
    fn small_values_keep_floor() {
        let settings = WindowSettings::from_lookup(lookup(&[(WINDOW_BUFFER_ENV, "10")])).unwrap();
        assert_eq!(settings.buffer, VisibilityBuffer::floor());
    }

    #[test]
    fn rejects_non_integer() {
        let err = WindowSettings::from_lookup(lookup(&[(WINDOW_BUFFER_ENV, "1m")])).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidValue { ref key, .. } if key == WINDOW_BUFFER_ENV));
    }
}
