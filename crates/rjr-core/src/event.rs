//! Per-event input supplied by the surrounding event loop.

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, RjrError};
use crate::vector::{FourVector, ThreeVector};

/// Visible objects and missing transverse momentum for one event.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventInput {
    /// Lab-frame visible four-vectors in collaborator order.
    pub visible: Vec<FourVector>,
    /// Missing transverse momentum `(x, y)`.
    pub met: [f64; 2],
}

impl EventInput {
    /// Creates an event input from its parts.
    pub fn new(visible: Vec<FourVector>, met: [f64; 2]) -> Self {
        Self { visible, met }
    }

    /// Missing transverse momentum lifted to a three-vector with `z = 0`.
    pub fn met_vector(&self) -> ThreeVector {
        ThreeVector::new(self.met[0], self.met[1], 0.0)
    }

    /// Missing transverse momentum as a massless, purely transverse four-vector.
    pub fn met_four_vector(&self) -> FourVector {
        FourVector::from_vect_m(self.met_vector(), 0.0)
    }

    /// Rejects non-finite components.
    pub fn validate(&self) -> Result<(), RjrError> {
        if !self.met.iter().all(|v| v.is_finite()) {
            let info = ErrorInfo::new("non-finite-met", "missing momentum must be finite")
                .with_context("met_x", self.met[0].to_string())
                .with_context("met_y", self.met[1].to_string());
            return Err(RjrError::Input(info));
        }
        if let Some(index) = self.visible.iter().position(|v| !v.is_finite()) {
            let info = ErrorInfo::new("non-finite-visible", "visible four-vector must be finite")
                .with_context("index", index.to_string());
            return Err(RjrError::Input(info));
        }
        Ok(())
    }
}
