//! Numeric settings used by the transform machine.
//!
//! Defaults match what a fresh session uses. An embedder can override them from
//! the environment (`.env` is honoured) or from a JSON fragment of its own
//! session file.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const ENV_EPSILON: &str = "CURVEKIT_EPSILON";
pub const ENV_BG_MAX_ITER: &str = "CURVEKIT_BG_MAX_ITER";
pub const ENV_BG_MAX_RDIFF: &str = "CURVEKIT_BG_MAX_RDIFF";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Two x-values closer than this are treated as equal.
    pub epsilon: f64,
    /// Upper bound on background-estimation iterations.
    pub background_max_iter: usize,
    /// Relative change of the total integral below which the background has converged.
    pub background_max_rdiff: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            epsilon: 1e-12,
            background_max_iter: 50,
            background_max_rdiff: 1e-6,
        }
    }
}

impl Settings {
    /// Defaults overridden by `CURVEKIT_*` environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let mut settings = Self::default();
        if let Some(v) = read_env(ENV_EPSILON)? {
            settings.epsilon = v;
        }
        if let Some(v) = read_env(ENV_BG_MAX_ITER)? {
            settings.background_max_iter = v;
        }
        if let Some(v) = read_env(ENV_BG_MAX_RDIFF)? {
            settings.background_max_rdiff = v;
        }
        settings.validate()?;
        Ok(settings)
    }

    /// Parse a JSON object; missing fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        let settings: Settings =
            serde_json::from_str(text).map_err(|e| Error::Config(format!("invalid settings JSON: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.epsilon.is_finite() && self.epsilon >= 0.0) {
            return Err(Error::Config(format!(
                "epsilon must be finite and >= 0, got {}",
                self.epsilon
            )));
        }
        if self.background_max_iter == 0 {
            return Err(Error::Config("background_max_iter must be >= 1".to_string()));
        }
        if !(self.background_max_rdiff.is_finite() && self.background_max_rdiff > 0.0) {
            return Err(Error::Config(format!(
                "background_max_rdiff must be finite and > 0, got {}",
                self.background_max_rdiff
            )));
        }
        Ok(())
    }

    /// Equality of two abscissas under this tolerance.
    pub fn is_eq(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.epsilon
    }
}

fn read_env<T: std::str::FromStr>(key: &str) -> Result<Option<T>> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::Config(format!("cannot parse {key}={raw}"))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let s = Settings::from_json(r#"{"background_max_iter": 10}"#).unwrap();
        assert_eq!(s.background_max_iter, 10);
        assert_eq!(s.epsilon, 1e-12);
        assert_eq!(s.background_max_rdiff, 1e-6);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = Settings::from_json(r#"{"background_max_rdiff": 0.0}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)), "got {err:?}");
        assert!(Settings::from_json("not json").is_err());
        let s = Settings {
            epsilon: f64::NAN,
            ..Settings::default()
        };
        assert!(s.validate().is_err());
    }

    #[test]
    fn is_eq_uses_epsilon() {
        let s = Settings {
            epsilon: 0.01,
            ..Settings::default()
        };
        assert!(s.is_eq(1.0, 1.005));
        assert!(!s.is_eq(1.0, 1.02));
    }
}
