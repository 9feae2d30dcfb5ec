//! Pipeline phases and phase-change reporting.
//!
//! The phase sequence is advisory: operations record the phase they move
//! the table into, but nothing stops a caller from running them in another
//! order. Only year/month derivation checks its precondition (a `Date`
//! column).
//!
//! # Example
//!
//! ```rust,ignore
//! use weather_cleaning::Pipeline;
//!
//! Pipeline::builder()
//!     .on_phase(|update| println!("[{}] {}", update.phase.display_name(), update.message))
//!     .build()?
//!     .run()?;
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stages a weather table moves through during one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Loaded as-is from the CSV
    Raw,
    /// Narrowed to the configured columns
    Selected,
    /// Columns carry their short names
    Renamed,
    /// Physically impossible values flushed to null
    Cleaned,
    /// Missing values filled
    Imputed,
    /// Date parsed and split into year/month
    DateDecomposed,
    /// Written to the output CSV
    Exported,
}

impl Phase {
    /// Returns a human-readable name for the phase.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Raw => "Raw",
            Self::Selected => "Columns Selected",
            Self::Renamed => "Columns Renamed",
            Self::Cleaned => "Thresholds Applied",
            Self::Imputed => "Missing Values Filled",
            Self::DateDecomposed => "Dates Decomposed",
            Self::Exported => "Exported",
        }
    }

    /// The phase that normally follows this one.
    pub fn next(&self) -> Option<Phase> {
        match self {
            Self::Raw => Some(Self::Selected),
            Self::Selected => Some(Self::Renamed),
            Self::Renamed => Some(Self::Cleaned),
            Self::Cleaned => Some(Self::Imputed),
            Self::Imputed => Some(Self::DateDecomposed),
            Self::DateDecomposed => Some(Self::Exported),
            Self::Exported => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Notification that the table entered a phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseUpdate {
    /// Phase the table is now in
    pub phase: Phase,
    /// Phase the table left
    pub previous: Phase,
    /// Human-readable message describing what happened
    pub message: String,
}

impl PhaseUpdate {
    pub fn new(previous: Phase, phase: Phase, message: impl Into<String>) -> Self {
        Self {
            phase,
            previous,
            message: message.into(),
        }
    }

    /// Whether the transition skipped or went back against the usual order.
    pub fn is_out_of_order(&self) -> bool {
        self.previous != self.phase && self.previous.next() != Some(self.phase)
    }
}

/// Receives phase changes from an [`Analyzer`](crate::pipeline::Analyzer).
pub trait PhaseReporter: Send + Sync {
    fn report(&self, update: PhaseUpdate);
}

/// Wrapper that implements [`PhaseReporter`] using a closure.
pub struct ClosurePhaseReporter<F>
where
    F: Fn(PhaseUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosurePhaseReporter<F>
where
    F: Fn(PhaseUpdate) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> PhaseReporter for ClosurePhaseReporter<F>
where
    F: Fn(PhaseUpdate) + Send + Sync,
{
    fn report(&self, update: PhaseUpdate) {
        (self.callback)(update);
    }
}

static_assertions::assert_impl_all!(PhaseUpdate: Send, Sync);
