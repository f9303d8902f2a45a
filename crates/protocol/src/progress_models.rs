//! Progress state models.
//!
//! This module defines what the page renders for a tracked test: a
//! percentage and a label, and the fixed stage waypoints that produce them.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The percentage and label currently shown by a progress indicator.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default, TS)]
pub struct ProgressState {
    /// Completion percentage in `[0, 100]`.
    pub percent: u8,

    /// Human-readable description of the current stage.
    pub label: String,
}

impl ProgressState {
    /// Create a progress state, clamping `percent` to 100.
    pub fn new(percent: u8, label: impl Into<String>) -> Self {
        Self {
            percent: percent.min(100),
            label: label.into(),
        }
    }

    /// Whether the indicator is full.
    pub fn is_complete(&self) -> bool {
        self.percent >= 100
    }
}

/// A waypoint in the test pipeline.
///
/// Each stage renders at a fixed percentage. Stages are not derived from
/// elapsed time since the duration of every stage is controlled by the
/// server.
///
/// Normal progression:
/// Submitting -> Validating -> Compiling -> RunningAgainstBaseline ->
/// RunningAgainstVariants -> Done
///
/// Failure stages end the pipeline at 100%:
/// - NotValid
/// - DidNotCompile
/// - FailedAgainstBaseline
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    /// The test is being sent to the server.
    Submitting,
    Validating,
    Compiling,
    RunningAgainstBaseline,
    RunningAgainstVariants,
    Done,

    /// The test broke the validation rules.
    NotValid,
    DidNotCompile,
    FailedAgainstBaseline,
}

impl Stage {
    /// Percentage rendered for this stage.
    pub fn percent(self) -> u8 {
        match self {
            Stage::Submitting => 16,
            Stage::Validating => 33,
            Stage::Compiling => 50,
            Stage::RunningAgainstBaseline => 66,
            Stage::RunningAgainstVariants => 83,
            Stage::Done | Stage::NotValid | Stage::DidNotCompile | Stage::FailedAgainstBaseline => {
                100
            }
        }
    }

    /// Label rendered for this stage.
    pub fn label(self) -> &'static str {
        match self {
            Stage::Submitting => "Submitting Test",
            Stage::Validating => "Validating Test",
            Stage::Compiling => "Compiling Test",
            Stage::RunningAgainstBaseline => "Running Test Against Original",
            Stage::RunningAgainstVariants => "Running Test Against Mutants",
            Stage::Done => "Done",
            Stage::NotValid => "Test Is Not Valid",
            Stage::DidNotCompile => "Test Did Not Compile",
            Stage::FailedAgainstBaseline => "Test Failed Against Original",
        }
    }

    /// Whether no further stage follows this one.
    pub fn is_terminal(self) -> bool {
        self.percent() == 100
    }

    /// Whether this stage reports a failed pipeline.
    pub fn is_failure(self) -> bool {
        matches!(
            self,
            Stage::NotValid | Stage::DidNotCompile | Stage::FailedAgainstBaseline
        )
    }

    /// The progress state rendered for this stage.
    pub fn progress(self) -> ProgressState {
        ProgressState::new(self.percent(), self.label())
    }
}
