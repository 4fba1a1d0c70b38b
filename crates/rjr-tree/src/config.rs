use rjr_core::errors::{ErrorInfo, RjrError};
use serde::{Deserialize, Serialize};

/// Numerical settings shared by the per-event solver and the boost transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Mass squared at or below which a frame has no rest frame.
    pub timelike_epsilon: f64,
    /// Relative size below which the contraboost split line or its
    /// equal-mass condition counts as degenerate; also the slack allowed on
    /// the timelike test of the invisible momenta.
    pub degenerate_tolerance: f64,
    /// Largest number of visible objects the hemisphere search will partition.
    pub max_objects: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            timelike_epsilon: 1e-12,
            degenerate_tolerance: 1e-12,
            max_objects: 12,
        }
    }
}

impl SolverConfig {
    /// Returns a copy with non-negative finite tolerances and a usable object cap.
    pub fn sanitised(&self) -> Self {
        let defaults = Self::default();
        let timelike_epsilon = if self.timelike_epsilon.is_finite() {
            self.timelike_epsilon.max(0.0)
        } else {
            defaults.timelike_epsilon
        };
        let degenerate_tolerance = if self.degenerate_tolerance.is_finite() {
            self.degenerate_tolerance.max(0.0)
        } else {
            defaults.degenerate_tolerance
        };
        Self {
            timelike_epsilon,
            degenerate_tolerance,
            max_objects: self.max_objects.clamp(1, 20),
        }
    }

    /// Parses a YAML document; missing keys take their default values.
    pub fn from_yaml_str(contents: &str) -> Result<Self, RjrError> {
        let config: SolverConfig = serde_yaml::from_str(contents).map_err(|err| {
            RjrError::Config(
                ErrorInfo::new("yaml_deserialize", err.to_string())
                    .with_hint("expected keys: timelike_epsilon, degenerate_tolerance, max_objects"),
            )
        })?;
        Ok(config.sanitised())
    }

    /// Serializes the configuration to YAML.
    pub fn to_yaml_string(&self) -> Result<String, RjrError> {
        serde_yaml::to_string(self)
            .map_err(|err| RjrError::Serde(ErrorInfo::new("yaml_serialize", err.to_string())))
    }
}
