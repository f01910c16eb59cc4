//!
//! # Pin-Pitch & Channel-Spacing Linear Program
//!
//! Builds the linear program that checks and optimizes multi-layer pin pitch
//! and routing-channel spacing: per-layer minimum-pitch constraints, bounded
//! stagger (and optionally fanout) capacity variables, a total-channel-length
//! envelope `d_min..d_max` held within a budget, and a configurable objective.
//!
//! Solving is delegated across a strict collaborator boundary: this crate
//! assembles variables, constraints, and the objective, hands them to an
//! external LP solver, and interprets the returned status. Infeasible and
//! unbounded outcomes surface as distinct errors, never as fabricated values.
//!

pub mod csv;
pub mod data;
pub mod model;
#[cfg(test)]
mod tests;

pub use data::*;
pub use model::solve;

/// SpacingError-Specific Result Type
pub type SpacingResult<T> = Result<T, SpacingError>;

///
/// # Spacing Error Enumeration
///
#[derive(Debug)]
pub enum SpacingError {
    /// No assignment satisfies the pitch/budget constraints
    Infeasible,
    /// The objective can improve without limit
    Unbounded,
    /// Solver-reported failures other than the two definitive statuses
    Solver(String),
    /// Config/measurement dimension disagreement
    Shape(String),
    /// Configuration-builder validation errors
    Builder(String),
    /// Output-stream errors
    Io(std::io::Error),
}
impl SpacingError {
    /// Create a [SpacingError::Shape] from anything String-convertible
    pub(crate) fn shape(s: impl Into<String>) -> Self {
        Self::Shape(s.into())
    }
}
impl From<std::io::Error> for SpacingError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
impl From<data::SpacingConfigBuilderError> for SpacingError {
    fn from(e: data::SpacingConfigBuilderError) -> Self {
        Self::Builder(e.to_string())
    }
}
impl std::fmt::Display for SpacingError {
    /// Delegates to the [Debug] implementation
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        std::fmt::Debug::fmt(self, f)
    }
}
impl std::error::Error for SpacingError {}
