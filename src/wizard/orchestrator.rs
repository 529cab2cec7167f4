//! Wizard orchestrator.
//!
//! Owns the form state, the step validators and the staged photos for one
//! wizard session, and runs the submission protocol:
//!
//! ```text
//! GeneralInfo -> Photos -> Deadline -> Address -> Submitting -> Succeeded
//!                                                          \-> Failed (retry with Next)
//! ```
//!
//! Photo attachment is best effort. Photos are uploaded one at a time, in
//! staging order, after the task exists; a failed upload is logged and
//! skipped, never retried, and never fails the submission.

use std::time::Duration;

use serde_json::json;

use super::form::{category_options, resolve_category, Category, FormData, FormPatch};
use super::photos::{FilePicker, PhotoPolicy, PhotoStaging, SelectedFile, StageReport};
use super::state::{apply, Action, FormState, StepKind, SubmissionStatus};
use super::steps::{default_steps, AddressStep, StepValidator};
use crate::config::Config;
use crate::context::ServiceContext;
use crate::ports::{NavigateOptions, NewTask};

/// Step error shown when `next` is pressed without a signed-in session.
pub const SIGN_IN_REQUIRED: &str = "You need to sign in to create a request.";

/// Session-level settings for a wizard.
#[derive(Debug, Clone)]
pub struct WizardOptions {
    /// Pause between a successful submission and the redirect home.
    pub redirect_delay: Duration,
    /// Photo staging limits.
    pub photo_policy: PhotoPolicy,
    /// Where the wizard lives; handed to the login page for the return trip.
    pub location: String,
    /// Login destination for anonymous sessions.
    pub login_path: String,
    /// Destination after a successful submission.
    pub home_path: String,
}

impl Default for WizardOptions {
    fn default() -> Self {
        Self {
            redirect_delay: Duration::from_secs(2),
            photo_policy: PhotoPolicy::default(),
            location: "/requests/new".to_string(),
            login_path: "/login".to_string(),
            home_path: "/".to_string(),
        }
    }
}

impl WizardOptions {
    /// Options taken from configuration, other values at their defaults.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            redirect_delay: config.redirect_delay,
            photo_policy: config.photo_policy,
            ..Self::default()
        }
    }
}

/// Result of mounting the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountOutcome {
    /// The session is authenticated and categories are loaded.
    Ready,
    /// The session is anonymous; the user was sent to the login page.
    Redirected,
}

/// What a submission achieved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReport {
    /// Identifier of the created task.
    pub task_id: String,
    /// Photos attached successfully.
    pub attached: usize,
    /// Names of photos whose upload failed.
    pub failed: Vec<String>,
}

/// Outcome of a `Next` press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Moved to the given step.
    Advanced(StepKind),
    /// Stayed on the given step; its validator (or the address re-check) failed.
    Blocked(StepKind),
    /// The task was created.
    Submitted(SubmitReport),
    /// Task creation failed; still on the last step.
    Failed(String),
}

/// One request-creation session.
pub struct Wizard<'a> {
    ctx: &'a ServiceContext,
    options: WizardOptions,
    state: FormState,
    steps: Vec<Box<dyn StepValidator>>,
    photos: PhotoStaging,
    picker: FilePicker,
    categories: Vec<Category>,
    step_error: Option<String>,
}

impl<'a> Wizard<'a> {
    /// Creates a wizard on the first step with a blank form.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, options: WizardOptions) -> Self {
        let photos = PhotoStaging::new(options.photo_policy, ctx.previews.clone());
        Self {
            ctx,
            options,
            state: FormState::default(),
            steps: default_steps(),
            photos,
            picker: FilePicker::default(),
            categories: category_options(&[]),
            step_error: None,
        }
    }

    /// Runs the mount-time checks.
    ///
    /// Anonymous sessions are redirected to the login page with the wizard's
    /// location preserved. Otherwise categories are fetched once; if that
    /// fails, only the `OTHER` option is offered.
    pub async fn mount(&mut self) -> MountOutcome {
        if !self.ctx.session.is_authenticated() {
            tracing::info!(to = %self.options.login_path, "session not authenticated");
            self.ctx.navigator.navigate(
                &self.options.login_path,
                NavigateOptions {
                    state: Some(json!({ "from": self.options.location })),
                    replace: true,
                },
            );
            return MountOutcome::Redirected;
        }

        match self.ctx.categories.fetch_categories().await {
            Ok(fetched) => self.categories = category_options(&fetched),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load categories");
                self.categories = category_options(&[]);
            }
        }
        MountOutcome::Ready
    }

    /// Current state (step, form, submission status).
    #[must_use]
    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// Current form contents.
    #[must_use]
    pub fn form(&self) -> &FormData {
        &self.state.form_data
    }

    /// Submission status.
    #[must_use]
    pub fn status(&self) -> &SubmissionStatus {
        &self.state.status
    }

    /// The active step.
    #[must_use]
    pub fn current_step(&self) -> StepKind {
        StepKind::at(self.state.current_step)
    }

    /// Validator for the active step, for reading its messages.
    #[must_use]
    pub fn active_validator(&self) -> &dyn StepValidator {
        self.steps[self.current_step().index()].as_ref()
    }

    /// Step-level message shown above the step content, if any.
    #[must_use]
    pub fn step_error(&self) -> Option<&str> {
        self.step_error.as_deref()
    }

    /// Category options offered to the user.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Staged photos.
    #[must_use]
    pub fn photos(&self) -> &PhotoStaging {
        &self.photos
    }

    fn dispatch(&mut self, action: Action) {
        self.state = apply(std::mem::take(&mut self.state), action);
    }

    /// Applies field changes immediately. Category codes are mapped onto the
    /// loaded options, unknown ones becoming `OTHER`. Deadline fields are
    /// stored in canonical form when they can be read.
    pub fn update(&mut self, mut patch: FormPatch) {
        if let Err(problem) = patch.normalize_deadline() {
            tracing::warn!(%problem, "deadline kept as entered");
        }
        if let Some(code) = patch.category.take() {
            patch.category = Some(resolve_category(&self.categories, &code));
        }
        self.dispatch(Action::UpdateFormData(patch));
    }

    /// One more volunteer.
    pub fn increment_required_people(&mut self) {
        self.dispatch(Action::IncrementRequiredPeople);
    }

    /// One fewer volunteer, never below 1.
    pub fn decrement_required_people(&mut self) {
        self.dispatch(Action::DecrementRequiredPeople);
    }

    /// Stages dropped files.
    pub fn drop_photos(&mut self, files: Vec<SelectedFile>) -> StageReport {
        self.photos.stage(files, self.ctx.id_gen.as_ref())
    }

    /// Stages files chosen through the picker, then resets the picker.
    pub fn pick_photos(&mut self, files: Vec<SelectedFile>) -> StageReport {
        self.picker.select(files);
        let files = self.picker.take();
        self.photos.stage(files, self.ctx.id_gen.as_ref())
    }

    /// Removes a staged photo. Returns `false` if the ID is unknown.
    pub fn remove_photo(&mut self, id: &str) -> bool {
        self.photos.unstage(id)
    }

    /// Jumps to a step without validation.
    pub fn set_step(&mut self, index: usize) {
        self.step_error = None;
        self.dispatch(Action::SetStep(index));
    }

    /// Goes back one step without validation.
    pub fn back(&mut self) {
        self.step_error = None;
        self.dispatch(Action::PrevStep);
    }

    /// Validates the active step and advances, or submits from the last step.
    pub async fn next(&mut self) -> Transition {
        let step = self.current_step();
        if self.state.status.success || self.state.status.loading {
            return Transition::Blocked(step);
        }
        if !self.ctx.session.is_authenticated() {
            tracing::warn!(%step, "next pressed without a signed-in session");
            self.step_error = Some(SIGN_IN_REQUIRED.to_string());
            return Transition::Blocked(step);
        }
        self.step_error = None;

        let validator = &mut self.steps[step.index()];
        if !validator.validate(&self.state.form_data) {
            self.step_error = validator.step_error().map(str::to_string);
            tracing::debug!(%step, "step validation failed");
            return Transition::Blocked(step);
        }

        if !step.is_last() {
            self.dispatch(Action::NextStep);
            return Transition::Advanced(self.current_step());
        }

        let mut address = AddressStep::default();
        if !address.validate(&self.state.form_data) {
            self.step_error = address.step_error().map(str::to_string);
            return Transition::Blocked(step);
        }

        self.submit().await
    }

    async fn submit(&mut self) -> Transition {
        self.dispatch(Action::SubmitStarted);
        let task = NewTask::from_form(&self.state.form_data);

        let task_id = match self.ctx.tasks.create_task(&task).await {
            Ok(id) => id,
            Err(e) => {
                let message = if e.is_retryable() {
                    format!("Could not create the request: {e}. Press Next to try again.")
                } else {
                    format!("Could not create the request: {e}")
                };
                tracing::error!(error = %e, "task creation failed");
                self.dispatch(Action::SubmitFailed(message.clone()));
                return Transition::Failed(message);
            }
        };
        tracing::info!(%task_id, photos = self.photos.len(), "task created");

        let mut report = SubmitReport { task_id, attached: 0, failed: Vec::new() };
        for photo in self.photos.photos() {
            let result = self.ctx.tasks.attach_photo(&photo.file, &report.task_id).await;
            match result {
                Ok(()) => {
                    tracing::debug!(
                        photo = photo.name(),
                        task_id = %report.task_id,
                        "photo attached"
                    );
                    report.attached += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        photo = photo.name(),
                        task_id = %report.task_id,
                        error = %e,
                        "photo attachment failed"
                    );
                    report.failed.push(photo.name().to_string());
                }
            }
        }

        self.photos.clear();
        self.dispatch(Action::SubmitSucceeded);
        Transition::Submitted(report)
    }

    /// After a successful submission: waits the redirect delay, resets the
    /// form and navigates home. Returns `false` (doing nothing) otherwise.
    pub async fn complete(&mut self) -> bool {
        if !self.state.status.success {
            return false;
        }
        tokio::time::sleep(self.options.redirect_delay).await;

        self.dispatch(Action::ResetForm);
        self.steps = default_steps();
        self.photos.clear();
        self.step_error = None;
        self.ctx.navigator.navigate(&self.options.home_path, NavigateOptions::replace());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        FixedSession, MemoryTaskApi, RecordingNavigator, StaticCategoryApi,
    };
    use crate::error::ApiError;
    use crate::ports::{ApiFuture, TaskApi};

    fn options() -> WizardOptions {
        WizardOptions { redirect_delay: Duration::ZERO, ..WizardOptions::default() }
    }

    fn filled() -> FormPatch {
        FormPatch {
            title: Some("Fix my sink".into()),
            description: Some("Leaky pipe under the sink".into()),
            country: Some("TR".into()),
            city: Some("Istanbul".into()),
            neighborhood: Some("Moda".into()),
            ..FormPatch::default()
        }
    }

    #[tokio::test]
    async fn anonymous_mount_redirects_to_login_with_return_location() {
        let nav = RecordingNavigator::new();
        let ctx = ServiceContext {
            session: Box::new(FixedSession(false)),
            navigator: Box::new(nav.clone()),
            ..ServiceContext::in_memory()
        };
        let mut wizard = Wizard::new(&ctx, options());

        assert_eq!(wizard.mount().await, MountOutcome::Redirected);

        let navs = nav.navigations();
        assert_eq!(navs.len(), 1);
        assert_eq!(navs[0].path, "/login");
        assert!(navs[0].options.replace);
        assert_eq!(navs[0].options.state, Some(json!({ "from": "/requests/new" })));
    }

    #[tokio::test]
    async fn category_fetch_failure_leaves_other_option() {
        let ctx = ServiceContext {
            categories: Box::new(StaticCategoryApi::unavailable()),
            ..ServiceContext::in_memory()
        };
        let mut wizard = Wizard::new(&ctx, options());

        assert_eq!(wizard.mount().await, MountOutcome::Ready);
        assert_eq!(wizard.categories(), &[Category::other()]);
    }

    #[tokio::test]
    async fn unknown_category_is_stored_as_other() {
        let ctx = ServiceContext {
            categories: Box::new(StaticCategoryApi::new(vec![Category {
                value: "HOME_REPAIR".into(),
                name: "Home repair".into(),
                task_count: 3,
            }])),
            ..ServiceContext::in_memory()
        };
        let mut wizard = Wizard::new(&ctx, options());
        wizard.mount().await;

        wizard.update(FormPatch { category: Some("home_repair".into()), ..FormPatch::default() });
        assert_eq!(wizard.form().category, "HOME_REPAIR");

        wizard.update(FormPatch { category: Some("PET_CARE".into()), ..FormPatch::default() });
        assert_eq!(wizard.form().category, "OTHER");
    }

    #[tokio::test]
    async fn invalid_general_info_blocks_next() {
        let ctx = ServiceContext::in_memory();
        let mut wizard = Wizard::new(&ctx, options());

        assert_eq!(wizard.next().await, Transition::Blocked(StepKind::GeneralInfo));
        assert_eq!(wizard.active_validator().field_errors().len(), 2);
        assert!(wizard.step_error().is_none());
    }

    #[tokio::test]
    async fn back_is_unconditional() {
        let ctx = ServiceContext::in_memory();
        let mut wizard = Wizard::new(&ctx, options());
        wizard.set_step(2);
        wizard.back();
        assert_eq!(wizard.current_step(), StepKind::Photos);
        wizard.back();
        wizard.back();
        assert_eq!(wizard.current_step(), StepKind::GeneralInfo);
    }

    #[tokio::test]
    async fn create_failure_stays_on_last_step_and_retry_succeeds() {
        let api = MemoryTaskApi::new().fail_next_create("database unavailable");
        let ctx = ServiceContext { tasks: Box::new(api.clone()), ..ServiceContext::in_memory() };
        let mut wizard = Wizard::new(&ctx, options());
        wizard.update(filled());
        wizard.set_step(3);

        let failed = wizard.next().await;
        let Transition::Failed(message) = failed else { panic!("expected failure") };
        assert!(message.contains("database unavailable"));
        assert!(message.ends_with("Press Next to try again."));
        assert_eq!(wizard.current_step(), StepKind::Address);
        assert!(wizard.status().error.is_some());
        assert!(!wizard.status().success);

        let retried = wizard.next().await;
        assert!(matches!(retried, Transition::Submitted(_)));
        assert!(wizard.status().error.is_none());
        assert!(wizard.status().success);
        assert_eq!(api.calls().len(), 2);
    }

    #[tokio::test]
    async fn rejected_request_has_no_retry_hint() {
        struct Rejecting;
        impl TaskApi for Rejecting {
            fn create_task<'a>(&'a self, _task: &'a NewTask) -> ApiFuture<'a, String> {
                let rejected = ApiError::Status { status: 422, message: "bad city".into() };
                Box::pin(async move { Err::<String, _>(rejected) })
            }
            fn attach_photo<'a>(&'a self, _: &'a SelectedFile, _: &'a str) -> ApiFuture<'a, ()> {
                Box::pin(async { Ok::<(), ApiError>(()) })
            }
        }
        let ctx = ServiceContext { tasks: Box::new(Rejecting), ..ServiceContext::in_memory() };
        let mut wizard = Wizard::new(&ctx, options());
        wizard.update(filled());
        wizard.set_step(3);

        let Transition::Failed(message) = wizard.next().await else { panic!("expected failure") };
        assert!(message.ends_with("bad city"), "got: {message}");
    }

    #[tokio::test]
    async fn signed_out_session_cannot_submit_without_mount() {
        let api = MemoryTaskApi::new();
        let ctx = ServiceContext {
            tasks: Box::new(api.clone()),
            session: Box::new(FixedSession(false)),
            ..ServiceContext::in_memory()
        };
        let mut wizard = Wizard::new(&ctx, options());
        wizard.update(filled());
        wizard.set_step(3);

        assert_eq!(wizard.next().await, Transition::Blocked(StepKind::Address));
        assert_eq!(wizard.step_error(), Some(SIGN_IN_REQUIRED));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn next_after_success_does_not_resubmit() {
        let api = MemoryTaskApi::new();
        let ctx = ServiceContext { tasks: Box::new(api.clone()), ..ServiceContext::in_memory() };
        let mut wizard = Wizard::new(&ctx, options());
        wizard.update(filled());
        wizard.set_step(3);

        assert!(matches!(wizard.next().await, Transition::Submitted(_)));
        assert_eq!(wizard.next().await, Transition::Blocked(StepKind::Address));
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test]
    async fn complete_resets_and_navigates_home() {
        let nav = RecordingNavigator::new();
        let ctx =
            ServiceContext { navigator: Box::new(nav.clone()), ..ServiceContext::in_memory() };
        let mut wizard = Wizard::new(&ctx, options());

        assert!(!wizard.complete().await);
        assert!(nav.navigations().is_empty());

        wizard.update(filled());
        wizard.set_step(3);
        wizard.next().await;
        assert!(wizard.complete().await);

        assert_eq!(wizard.state(), &FormState::default());
        assert_eq!(nav.navigations()[0].path, "/");
    }
}
