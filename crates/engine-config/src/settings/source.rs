use super::error::SettingsError;
use model::{pass::BatchLimit, time::Lookback};
use serde::Deserialize;

/// Per-source scheduling constants, supplied when the source is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceSettings {
    pub limit: BatchLimit,
    pub stale_age: Lookback,
}

impl SourceSettings {
    pub fn new(limit: BatchLimit, stale_age: Lookback) -> Result<Self, SettingsError> {
        if !stale_age.is_valid() {
            return Err(SettingsError::invalid(
                "stale_age",
                stale_age,
                "must be strictly positive",
            ));
        }
        Ok(Self { limit, stale_age })
    }

    /// Parse settings from JSON.
    ///
    /// ```json
    /// { "limit": 500, "stale_age_secs": 3600 }
    /// { "limit": "disabled" }
    /// ```
    ///
    /// A missing or null `stale_age_secs` means the source never skips work.
    /// `limit` must be a positive count or the literal `"disabled"`.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let raw: RawSourceSettings = serde_json::from_str(json)?;

        let limit = match raw.limit {
            RawLimit::Disabled(_) => BatchLimit::Disabled,
            RawLimit::Max(count) => BatchLimit::max(count).ok_or_else(|| {
                SettingsError::invalid(
                    "limit",
                    count,
                    "zero is ambiguous, use \"disabled\" to turn the source off",
                )
            })?,
        };

        let stale_age = match raw.stale_age_secs {
            Some(secs) => Lookback::from_secs(secs),
            None => Lookback::Unbounded,
        };

        Self::new(limit, stale_age)
    }
}

#[derive(Deserialize)]
struct RawSourceSettings {
    limit: RawLimit,
    #[serde(default)]
    stale_age_secs: Option<i64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLimit {
    Disabled(DisabledTag),
    Max(usize),
}

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum DisabledTag {
    Disabled,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[test]
    fn parses_bounded_source() {
        let settings = SourceSettings::from_json(r#"{"limit": 500, "stale_age_secs": 3600}"#).unwrap();
        assert_eq!(settings.limit, BatchLimit::max(500).unwrap());
        assert_eq!(settings.stale_age, Lookback::Bounded(TimeDelta::hours(1)));
    }

    #[test]
    fn missing_stale_age_is_unbounded() {
        let settings = SourceSettings::from_json(r#"{"limit": 10}"#).unwrap();
        assert_eq!(settings.stale_age, Lookback::Unbounded);

        let settings = SourceSettings::from_json(r#"{"limit": 10, "stale_age_secs": null}"#).unwrap();
        assert_eq!(settings.stale_age, Lookback::Unbounded);
    }

    #[test]
    fn disabled_must_be_explicit() {
        let settings = SourceSettings::from_json(r#"{"limit": "disabled"}"#).unwrap();
        assert_eq!(settings.limit, BatchLimit::Disabled);

        let err = SourceSettings::from_json(r#"{"limit": 0}"#).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidValue { ref key, .. } if key == "limit"));
    }

    #[test]
    fn rejects_non_positive_stale_age() {
        let err = SourceSettings::from_json(r#"{"limit": 10, "stale_age_secs": 0}"#).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidValue { ref key, .. } if key == "stale_age"));
    }

    #[test]
    fn rejects_unknown_limit_text() {
        assert!(matches!(
            SourceSettings::from_json(r#"{"limit": "unlimited"}"#),
            Err(SettingsError::Parse(_))
        ));
    }
}
