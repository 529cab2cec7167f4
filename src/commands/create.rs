//! `neighborly create` command.
//!
//! Without `--draft` the wizard runs interactively on the terminal. With a
//! draft file the form is filled from YAML and each step is pressed through
//! in order, stopping at the first step that does not validate.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::console::{blocked_message, ConsoleOutcome, WizardConsole};
use crate::context::ServiceContext;
use crate::ports::FileSystem;
use crate::wizard::state::STEP_COUNT;
use crate::wizard::{FormPatch, MountOutcome, SelectedFile, Transition, Wizard, WizardOptions};

/// Execute the `create` command against a service context.
///
/// # Errors
///
/// Returns an error string if the draft or a photo cannot be read, the user
/// is not signed in, the draft does not validate, or submission fails.
pub async fn run_with_context<R: BufRead, W: Write>(
    ctx: &ServiceContext,
    options: WizardOptions,
    draft: Option<&Path>,
    photos: &[PathBuf],
    input: R,
    mut out: W,
) -> Result<(), String> {
    let draft = draft.map(|path| load_draft(ctx.fs.as_ref(), path)).transpose()?;
    let files = photos
        .iter()
        .map(|path| SelectedFile::load(ctx.fs.as_ref(), path))
        .collect::<Result<Vec<_>, _>>()?;

    let mut wizard = Wizard::new(ctx, options);
    if wizard.mount().await == MountOutcome::Redirected {
        return Err("You need to sign in first. Set NEIGHBORLY_API_TOKEN and try again.".into());
    }

    if !files.is_empty() {
        let report = wizard.pick_photos(files);
        if let Some(message) = report.message {
            say(&mut out, &message.to_string())?;
        }
    }

    match draft {
        Some(patch) => submit_draft(&mut wizard, patch, &mut out).await,
        None => match WizardConsole::new(ctx, input, out).run(&mut wizard).await? {
            ConsoleOutcome::Submitted(report) => {
                tracing::info!(task_id = %report.task_id, "request created");
                Ok(())
            }
            ConsoleOutcome::Abandoned => Ok(()),
        },
    }
}

/// Reads a YAML draft into a form patch.
///
/// # Errors
///
/// Returns an error string if the file cannot be read, is not a valid
/// draft, or has a deadline date or time that cannot be read.
pub fn load_draft(fs: &dyn FileSystem, path: &Path) -> Result<FormPatch, String> {
    let bytes = fs
        .read_file(path)
        .map_err(|e| format!("Failed to read draft {}: {e}", path.display()))?;
    let text = String::from_utf8(bytes)
        .map_err(|e| format!("Draft {} is not UTF-8: {e}", path.display()))?;
    let mut patch: FormPatch = serde_yaml::from_str(&text)
        .map_err(|e| format!("Invalid draft {}: {e}", path.display()))?;
    patch.normalize_deadline().map_err(|e| format!("Invalid draft {}: {e}", path.display()))?;
    Ok(patch)
}

/// Applies the draft and presses `Next` until the request is created.
async fn submit_draft<W: Write>(
    wizard: &mut Wizard<'_>,
    patch: FormPatch,
    out: &mut W,
) -> Result<(), String> {
    wizard.update(patch);
    for _ in 0..STEP_COUNT {
        match wizard.next().await {
            Transition::Advanced(step) => say(out, &format!("Step {step}"))?,
            Transition::Blocked(step) => {
                return Err(format!("Draft stopped at step {step}:\n{}", blocked_message(wizard)));
            }
            Transition::Failed(message) => return Err(message),
            Transition::Submitted(report) => {
                say(out, &format!("Your request was created (id {}).", report.task_id))?;
                wizard.complete().await;
                return Ok(());
            }
        }
    }
    Err("The wizard never reached its final step.".into())
}

fn say<W: Write>(out: &mut W, message: &str) -> Result<(), String> {
    writeln!(out, "{message}").map_err(|e| format!("write error: {e}"))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::time::Duration;

    use super::*;
    use crate::adapters::memory::{
        FixedSession, MemoryFileSystem, MemoryTaskApi, RecordingNavigator, TaskCall,
    };
    use crate::wizard::Urgency;

    const DRAFT: &str = "\
title: Fix my sink
description: Leaky pipe under the sink
urgency: 4
required_people: 2
deadline_date: 2025-01-05
country: TR
city: Istanbul
neighborhood: Moda
";

    fn draft_with(line: &str) -> Vec<u8> {
        format!("{DRAFT}{line}\n").into_bytes()
    }

    fn options() -> WizardOptions {
        WizardOptions { redirect_delay: Duration::ZERO, ..WizardOptions::default() }
    }

    fn context(api: &MemoryTaskApi, navigator: &RecordingNavigator) -> ServiceContext {
        ServiceContext {
            tasks: Box::new(api.clone()),
            navigator: Box::new(navigator.clone()),
            fs: Box::new(
                MemoryFileSystem::new()
                    .with_file("sink.yaml", DRAFT.as_bytes().to_vec())
                    .with_file("short.yaml", b"title: Hi\n".to_vec())
                    .with_file("typo.yaml", b"titel: Fix\n".to_vec())
                    .with_file("evening.yaml", draft_with("deadline_time: \"18:00\""))
                    .with_file("vague.yaml", draft_with("deadline_time: soon"))
                    .with_file("a.jpg", vec![1])
                    .with_file("b.png", vec![2]),
            ),
            ..ServiceContext::in_memory()
        }
    }

    async fn run_draft(
        ctx: &ServiceContext,
        draft: &str,
        photos: &[&str],
    ) -> Result<String, String> {
        let photos: Vec<PathBuf> = photos.iter().map(PathBuf::from).collect();
        let draft = Some(Path::new(draft));
        let mut out = Vec::new();
        run_with_context(ctx, options(), draft, &photos, Cursor::new(""), &mut out).await?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn draft_parses_into_patch() {
        let fs = MemoryFileSystem::new().with_file("d.yaml", DRAFT.as_bytes().to_vec());
        let patch = load_draft(&fs, Path::new("d.yaml")).unwrap();
        assert_eq!(patch.title.as_deref(), Some("Fix my sink"));
        assert_eq!(patch.urgency, Some(Urgency::High));
        assert_eq!(patch.required_people, Some(2));
        assert_eq!(patch.deadline_date.as_deref(), Some("2025-01-05"));
    }

    #[tokio::test]
    async fn draft_with_photos_is_submitted() {
        let api = MemoryTaskApi::new();
        let navigator = RecordingNavigator::new();
        let ctx = context(&api, &navigator);

        let out = run_draft(&ctx, "sink.yaml", &["a.jpg", "b.png"]).await.unwrap();

        assert!(out.contains("Step 4/4 Address"));
        assert!(out.contains("created (id task-1)"));
        let calls = api.calls();
        assert_eq!(calls.len(), 3);
        let TaskCall::Create(task) = &calls[0] else { panic!("expected create first") };
        assert_eq!(task.title, "Fix my sink");
        assert_eq!(task.required_people, 2);
        assert_eq!(task.deadline.unwrap().to_string(), "2025-01-05 23:59:00");
        assert_eq!(calls[1], TaskCall::Attach { photo: "a.jpg".into(), task_id: "task-1".into() });
        assert_eq!(calls[2], TaskCall::Attach { photo: "b.png".into(), task_id: "task-1".into() });
        assert_eq!(navigator.navigations().last().unwrap().path, "/");
    }

    #[tokio::test]
    async fn incomplete_draft_stops_at_first_invalid_step() {
        let api = MemoryTaskApi::new();
        let ctx = context(&api, &RecordingNavigator::new());

        let err = run_draft(&ctx, "short.yaml", &[]).await.unwrap_err();

        assert!(err.contains("step 1/4"), "got: {err}");
        assert!(err.contains("title: Title must be at least 3 characters"));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn draft_deadline_time_reaches_the_task() {
        let api = MemoryTaskApi::new();
        let ctx = context(&api, &RecordingNavigator::new());

        run_draft(&ctx, "evening.yaml", &[]).await.unwrap();

        let TaskCall::Create(task) = &api.calls()[0] else { panic!("expected create first") };
        assert_eq!(task.deadline.unwrap().to_string(), "2025-01-05 18:00:00");
    }

    #[tokio::test]
    async fn unreadable_draft_deadline_is_rejected() {
        let api = MemoryTaskApi::new();
        let ctx = context(&api, &RecordingNavigator::new());

        let err = run_draft(&ctx, "vague.yaml", &[]).await.unwrap_err();

        assert!(err.starts_with("Invalid draft vague.yaml: deadline_time"), "got: {err}");
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn unknown_draft_field_is_rejected() {
        let ctx = context(&MemoryTaskApi::new(), &RecordingNavigator::new());
        let err = run_draft(&ctx, "typo.yaml", &[]).await.unwrap_err();
        assert!(err.starts_with("Invalid draft typo.yaml"), "got: {err}");
    }

    #[tokio::test]
    async fn anonymous_user_is_sent_to_login() {
        let api = MemoryTaskApi::new();
        let navigator = RecordingNavigator::new();
        let ctx = ServiceContext {
            session: Box::new(FixedSession(false)),
            ..context(&api, &navigator)
        };

        let err = run_draft(&ctx, "sink.yaml", &[]).await.unwrap_err();

        assert!(err.contains("sign in"));
        assert_eq!(navigator.navigations()[0].path, "/login");
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn missing_photo_fails_before_mount() {
        let navigator = RecordingNavigator::new();
        let ctx = context(&MemoryTaskApi::new(), &navigator);
        let err = run_draft(&ctx, "sink.yaml", &["gone.jpg"]).await.unwrap_err();
        assert!(err.starts_with("Failed to read gone.jpg"));
        assert!(navigator.navigations().is_empty());
    }
}
