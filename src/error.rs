use thiserror::Error;

use crate::machine::ComponentId;

/// Setup-time failures of the machine core.
///
/// Asset problems never show up here: a missing image is recovered by the
/// polygon that wanted it and only logged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MachineError {
    #[error("invalid {what}: {reason}")]
    InvalidConfiguration { what: &'static str, reason: String },

    #[error("connecting {source_id} -> {sink} would create a rotation cycle")]
    GraphCycle {
        source_id: ComponentId,
        sink: ComponentId,
    },

    #[error("{sink} is already driven by {driver}")]
    AlreadyDriven {
        sink: ComponentId,
        driver: ComponentId,
    },

    #[error("{0} is not a component of this machine")]
    UnknownComponent(ComponentId),

    #[error("{0} is not a pulley")]
    NotAPulley(ComponentId),

    #[error("{0} cannot drive other components")]
    NotADriver(ComponentId),

    #[error("unknown machine variant {0}")]
    UnknownVariant(u32),
}

impl MachineError {
    pub fn invalid(what: &'static str, reason: impl Into<String>) -> Self {
        MachineError::InvalidConfiguration {
            what,
            reason: reason.into(),
        }
    }
}

/// Reject values that are NaN or infinite.
pub(crate) fn require_finite(what: &'static str, value: f64) -> Result<f64, MachineError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(MachineError::invalid(what, format!("{value} is not a finite number")))
    }
}

/// Reject values that are not strictly positive (or not finite).
pub(crate) fn require_positive(what: &'static str, value: f64) -> Result<f64, MachineError> {
    let value = require_finite(what, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(MachineError::invalid(what, format!("{value} must be greater than zero")))
    }
}
