//! The request-creation wizard.
//!
//! - [`form`]: the request record and its partial updates
//! - [`state`]: the pure form-state reducer
//! - [`steps`]: per-step validators
//! - [`photos`]: photo staging and preview lifetimes
//! - [`orchestrator`]: step sequencing and the submission protocol

pub mod form;
pub mod orchestrator;
pub mod photos;
pub mod state;
pub mod steps;

pub use form::{Category, FormData, FormPatch, Urgency};
pub use orchestrator::{MountOutcome, SubmitReport, Transition, Wizard, WizardOptions};
pub use photos::{PhotoPolicy, SelectedFile, StageMessage, StageReport};
pub use state::{Action, FormState, StepKind};
