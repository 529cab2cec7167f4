//! Form-state reducer.
//!
//! [`apply`] is a pure function from a state and an action to the next state.
//! All I/O (task creation, photo attachment, previews) happens in the
//! orchestrator; this module never touches a port.

use std::fmt;

use super::form::{FormData, FormPatch};

/// The wizard steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    /// Title, description, category, urgency, volunteer count.
    GeneralInfo,
    /// Optional photos.
    Photos,
    /// Optional deadline date and time.
    Deadline,
    /// Location of the request.
    Address,
}

/// Number of wizard steps.
pub const STEP_COUNT: usize = 4;

impl StepKind {
    /// All steps in wizard order.
    pub const ALL: [StepKind; STEP_COUNT] =
        [StepKind::GeneralInfo, StepKind::Photos, StepKind::Deadline, StepKind::Address];

    /// Position of this step in the wizard.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            StepKind::GeneralInfo => 0,
            StepKind::Photos => 1,
            StepKind::Deadline => 2,
            StepKind::Address => 3,
        }
    }

    /// Step at the given position, clamped to the last step.
    #[must_use]
    pub fn at(index: usize) -> Self {
        Self::ALL[index.min(STEP_COUNT - 1)]
    }

    /// Whether this is the final step before submission.
    #[must_use]
    pub fn is_last(self) -> bool {
        self.index() == STEP_COUNT - 1
    }

    /// Heading shown by the stepper.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            StepKind::GeneralInfo => "General information",
            StepKind::Photos => "Photos",
            StepKind::Deadline => "Deadline",
            StepKind::Address => "Address",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} {}", self.index() + 1, STEP_COUNT, self.title())
    }
}

/// Submission status. `success` and `error` are never both set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionStatus {
    /// A submission is in flight.
    pub loading: bool,
    /// The last submission created a task.
    pub success: bool,
    /// Why the last submission failed.
    pub error: Option<String>,
}

/// Everything the wizard tracks apart from staged photos.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    /// Index of the active step, always in `0..STEP_COUNT`.
    pub current_step: usize,
    /// The in-progress request.
    pub form_data: FormData,
    /// Submission status.
    pub status: SubmissionStatus,
}

/// State transitions understood by [`apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Shallow-merge field changes. No validation.
    UpdateFormData(FormPatch),
    /// One more volunteer.
    IncrementRequiredPeople,
    /// One fewer volunteer, never below 1.
    DecrementRequiredPeople,
    /// Advance one step (clamped to the last step).
    NextStep,
    /// Go back one step (clamped to the first step).
    PrevStep,
    /// Jump to a step without validating anything in between.
    SetStep(usize),
    /// A submission attempt begins.
    SubmitStarted,
    /// The task was created.
    SubmitSucceeded,
    /// Task creation failed.
    SubmitFailed(String),
    /// Back to a blank form on the first step.
    ResetForm,
}

/// Apply one action to a state, returning the next state.
#[must_use]
pub fn apply(mut state: FormState, action: Action) -> FormState {
    match action {
        Action::UpdateFormData(patch) => state.form_data.merge(patch),
        Action::IncrementRequiredPeople => {
            state.form_data.required_people = state.form_data.required_people.saturating_add(1);
        }
        Action::DecrementRequiredPeople => {
            state.form_data.required_people =
                state.form_data.required_people.saturating_sub(1).max(1);
        }
        Action::NextStep => state.current_step = (state.current_step + 1).min(STEP_COUNT - 1),
        Action::PrevStep => state.current_step = state.current_step.saturating_sub(1),
        Action::SetStep(index) => state.current_step = index.min(STEP_COUNT - 1),
        Action::SubmitStarted => {
            state.status = SubmissionStatus { loading: true, success: false, error: None };
        }
        Action::SubmitSucceeded => {
            state.status = SubmissionStatus { loading: false, success: true, error: None };
        }
        Action::SubmitFailed(error) => {
            state.status = SubmissionStatus { loading: false, success: false, error: Some(error) };
        }
        Action::ResetForm => state = FormState::default(),
    }
    state
}
