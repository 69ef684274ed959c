//! Outcome of a forecast run.

use serde::Serialize;

/// Why a run produced actual data only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Start or target weight missing, non-finite or non-positive.
    InvalidGoal,
    /// Target equals start weight; nothing to project.
    NoChange,
    /// Measured data already reached the target.
    AlreadyReached,
    /// Fewer than two measured samples in the goal window.
    InsufficientData,
    /// The observed trend moves away from the target.
    NonConvergent,
    /// The resolved horizon is not after the last actual sample.
    HorizonElapsed,
}

/// How the point generator stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Running weight reached the target.
    Converged,
    /// Horizon date reached first.
    Horizon,
    /// Hard step cap hit.
    IterationCap,
}

/// Public status of a whole forecast run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ForecastStatus {
    /// A forecast was appended to the actual data.
    Projected { termination: Termination },
    /// Only actual data is returned.
    ActualOnly { reason: SkipReason },
}

impl ForecastStatus {
    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            Self::ActualOnly { reason } => Some(*reason),
            Self::Projected { .. } => None,
        }
    }

    pub fn termination(&self) -> Option<Termination> {
        match self {
            Self::Projected { termination } => Some(*termination),
            Self::ActualOnly { .. } => None,
        }
    }
}
