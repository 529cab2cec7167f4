//! Per-step validators.
//!
//! Each step hands the orchestrator a [`StepValidator`]. Validation is a pure
//! read of the form: a validator records the messages from its latest run
//! and never mutates [`FormData`], so it can be invoked any number of times
//! as the user moves back and forth.

use std::fmt;

use super::form::{Address, FormData};
use super::state::StepKind;

/// Minimum title length, in characters.
pub const MIN_TITLE_CHARS: usize = 3;

/// Minimum description length, in characters.
pub const MIN_DESCRIPTION_CHARS: usize = 10;

/// A failed field-level rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    /// Title is blank.
    TitleRequired,
    /// Title is shorter than [`MIN_TITLE_CHARS`].
    TitleTooShort,
    /// Description is blank.
    DescriptionRequired,
    /// Description is shorter than [`MIN_DESCRIPTION_CHARS`].
    DescriptionTooShort,
}

impl FieldError {
    /// The form field the rule applies to.
    #[must_use]
    pub fn field(self) -> &'static str {
        match self {
            FieldError::TitleRequired | FieldError::TitleTooShort => "title",
            FieldError::DescriptionRequired | FieldError::DescriptionTooShort => "description",
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::TitleRequired => f.write_str("Title is required"),
            FieldError::TitleTooShort => {
                write!(f, "Title must be at least {MIN_TITLE_CHARS} characters")
            }
            FieldError::DescriptionRequired => f.write_str("Description is required"),
            FieldError::DescriptionTooShort => {
                write!(f, "Description must be at least {MIN_DESCRIPTION_CHARS} characters")
            }
        }
    }
}

/// Capability a wizard step exposes to the orchestrator.
pub trait StepValidator: Send {
    /// Which step this validator guards.
    fn kind(&self) -> StepKind;

    /// Check the form. Returns `false` without panicking when a rule fails.
    fn validate(&mut self, form: &FormData) -> bool;

    /// Field-level messages from the latest run.
    fn field_errors(&self) -> &[FieldError] {
        &[]
    }

    /// Step-level message from the latest run, shown above the step content.
    fn step_error(&self) -> Option<&str> {
        None
    }
}

/// Field rules for the general-information step.
#[must_use]
pub fn check_general_info(form: &FormData) -> Vec<FieldError> {
    let mut errors = Vec::new();

    let title = form.title.trim();
    if title.is_empty() {
        errors.push(FieldError::TitleRequired);
    } else if title.chars().count() < MIN_TITLE_CHARS {
        errors.push(FieldError::TitleTooShort);
    }

    let description = form.description.trim();
    if description.is_empty() {
        errors.push(FieldError::DescriptionRequired);
    } else if description.chars().count() < MIN_DESCRIPTION_CHARS {
        errors.push(FieldError::DescriptionTooShort);
    }

    errors
}

/// Names of the minimum location fields that are still blank.
#[must_use]
pub fn missing_address_fields(address: &Address) -> Vec<&'static str> {
    [
        ("country", &address.country),
        ("city", &address.city),
        ("neighborhood", &address.neighborhood),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(name, _)| name)
    .collect()
}

/// Message shown when the address step is incomplete.
#[must_use]
pub fn address_error_message(missing: &[&str]) -> String {
    format!("Please fill in the required location fields: {}", missing.join(", "))
}

/// Validator for title and description.
#[derive(Debug, Default)]
pub struct GeneralInfoStep {
    errors: Vec<FieldError>,
}

impl StepValidator for GeneralInfoStep {
    fn kind(&self) -> StepKind {
        StepKind::GeneralInfo
    }

    fn validate(&mut self, form: &FormData) -> bool {
        self.errors = check_general_info(form);
        self.errors.is_empty()
    }

    fn field_errors(&self) -> &[FieldError] {
        &self.errors
    }
}

/// Validator for the location fields. Failures are cross-field, so they are
/// reported as a single step-level message.
#[derive(Debug, Default)]
pub struct AddressStep {
    message: Option<String>,
}

impl StepValidator for AddressStep {
    fn kind(&self) -> StepKind {
        StepKind::Address
    }

    fn validate(&mut self, form: &FormData) -> bool {
        let missing = missing_address_fields(&form.address);
        self.message = (!missing.is_empty()).then(|| address_error_message(&missing));
        self.message.is_none()
    }

    fn step_error(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// A step with nothing to check (photos, deadline).
#[derive(Debug)]
pub struct OptionalStep(pub StepKind);

impl StepValidator for OptionalStep {
    fn kind(&self) -> StepKind {
        self.0
    }

    fn validate(&mut self, _form: &FormData) -> bool {
        true
    }
}

/// One validator per step, in wizard order.
#[must_use]
pub fn default_steps() -> Vec<Box<dyn StepValidator>> {
    vec![
        Box::new(GeneralInfoStep::default()),
        Box::new(OptionalStep(StepKind::Photos)),
        Box::new(OptionalStep(StepKind::Deadline)),
        Box::new(AddressStep::default()),
    ]
}
