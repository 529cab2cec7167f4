//! Line-oriented console for driving the wizard from a terminal.
//!
//! Each input line is one command: a field edit, a photo operation, or a
//! navigation (`next`, `back`, `step N`). Field edits are applied to the
//! wizard immediately. The loop ends on submission, `quit`, or end of input.

use std::fmt::Write as _;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use chrono::Duration;

use crate::context::ServiceContext;
use crate::wizard::form::{parse_deadline_date, parse_deadline_time, DEADLINE_DATE_FORMAT};
use crate::wizard::photos::SelectedFile;
use crate::wizard::state::STEP_COUNT;
use crate::wizard::{FormPatch, StageReport, SubmitReport, Transition, Urgency, Wizard};

/// How photos entered the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoSource {
    /// Chosen through the file picker.
    Picker,
    /// Dropped onto the photo area.
    DragDrop,
}

/// A parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Apply field changes.
    Set(FormPatch),
    /// Adjust the volunteer count by one.
    People {
        /// `true` for one more, `false` for one fewer.
        more: bool,
    },
    /// Set the deadline date (`today`, `tomorrow` or `YYYY-MM-DD`) and
    /// optionally the time.
    Deadline {
        /// Date argument as typed.
        date: String,
        /// Time argument as typed.
        time: Option<String>,
    },
    /// Stage photos from disk.
    Photos {
        /// Files to read.
        paths: Vec<PathBuf>,
        /// Input path they came through.
        source: PhotoSource,
    },
    /// Remove a staged photo.
    RemovePhoto(String),
    /// Validate and advance (or submit on the last step).
    Next,
    /// Go back one step.
    Back,
    /// Jump to a step (1-based).
    Step(usize),
    /// Print the current form.
    Show,
    /// List category options.
    Categories,
    /// Print the command list.
    Help,
    /// Leave without submitting.
    Quit,
}

/// How a console session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleOutcome {
    /// The request was created.
    Submitted(SubmitReport),
    /// The user quit or input ended.
    Abandoned,
}

const HELP: &str = "\
Fields:     title|description|category <text>
            country|state|city|neighborhood|street|building|door|directions <text>
            urgency <1-5>   people +|-   time <hh:mm AM>
            deadline <today|tomorrow|YYYY-MM-DD> [hh:mm AM]
Photos:     photo <path>...   drop <path>...   rm <id>
Navigation: next   back   step <1-4>
Other:      show   categories   help   quit";

fn urgency_hint() -> String {
    let levels: Vec<String> =
        Urgency::ALL.iter().map(|u| format!("{} {}", u8::from(*u), u.label())).collect();
    format!("Urgency must be one of: {}.", levels.join(", "))
}

/// Parses one input line.
///
/// # Errors
///
/// Returns a message describing the problem when the line is not a command.
pub fn parse_command(input: &str) -> Result<ConsoleCommand, String> {
    let input = input.trim();
    let (head, rest) = match input.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (input, ""),
    };
    let text = || Some(rest.to_string());

    let name = head.to_lowercase();
    let patch = match name.as_str() {
        "" => return Err("Type a command, or `help`.".to_string()),
        "next" | "n" => return Ok(ConsoleCommand::Next),
        "back" | "b" => return Ok(ConsoleCommand::Back),
        "show" => return Ok(ConsoleCommand::Show),
        "categories" => return Ok(ConsoleCommand::Categories),
        "help" | "?" => return Ok(ConsoleCommand::Help),
        "quit" | "exit" => return Ok(ConsoleCommand::Quit),
        "step" => {
            return match rest.parse::<usize>() {
                Ok(n) if (1..=STEP_COUNT).contains(&n) => Ok(ConsoleCommand::Step(n)),
                _ => Err(format!("Step must be a number from 1 to {STEP_COUNT}.")),
            };
        }
        "people" => {
            return match rest {
                "+" => Ok(ConsoleCommand::People { more: true }),
                "-" => Ok(ConsoleCommand::People { more: false }),
                _ => Err("Use `people +` or `people -`.".to_string()),
            };
        }
        "deadline" => {
            let mut parts = rest.splitn(2, char::is_whitespace);
            let date = parts.next().unwrap_or_default().to_string();
            if date.is_empty() {
                return Err("Use `deadline <today|tomorrow|YYYY-MM-DD> [hh:mm AM]`.".to_string());
            }
            let time = parts.next().map(str::trim).filter(|t| !t.is_empty()).map(String::from);
            return Ok(ConsoleCommand::Deadline { date, time });
        }
        "photo" | "drop" => {
            let paths: Vec<PathBuf> = rest.split_whitespace().map(PathBuf::from).collect();
            if paths.is_empty() {
                return Err(format!("Use `{name} <path>...`."));
            }
            let source = if name == "drop" { PhotoSource::DragDrop } else { PhotoSource::Picker };
            return Ok(ConsoleCommand::Photos { paths, source });
        }
        "rm" => {
            if rest.is_empty() {
                return Err("Use `rm <photo id>`.".to_string());
            }
            return Ok(ConsoleCommand::RemovePhoto(rest.to_string()));
        }
        "urgency" => {
            let urgency = rest
                .parse::<u8>()
                .map_err(|e| e.to_string())
                .and_then(Urgency::try_from)
                .map_err(|_| urgency_hint())?;
            FormPatch { urgency: Some(urgency), ..FormPatch::default() }
        }
        "time" => {
            let time = parse_deadline_time(rest)
                .ok_or_else(|| "Time must look like `09:30 AM`.".to_string())?;
            FormPatch { deadline_time: Some(time), ..FormPatch::default() }
        }
        "title" => FormPatch { title: text(), ..FormPatch::default() },
        "description" => FormPatch { description: text(), ..FormPatch::default() },
        "category" => FormPatch { category: text(), ..FormPatch::default() },
        "country" => FormPatch { country: text(), ..FormPatch::default() },
        "state" => FormPatch { state: text(), ..FormPatch::default() },
        "city" => FormPatch { city: text(), ..FormPatch::default() },
        "neighborhood" => FormPatch { neighborhood: text(), ..FormPatch::default() },
        "street" => FormPatch { street: text(), ..FormPatch::default() },
        "building" => FormPatch { building_no: text(), ..FormPatch::default() },
        "door" => FormPatch { door_no: text(), ..FormPatch::default() },
        "directions" => FormPatch { address_description: text(), ..FormPatch::default() },
        other => return Err(format!("Unknown command `{other}`. Type `help` for the list.")),
    };
    Ok(ConsoleCommand::Set(patch))
}

/// Interactive wizard loop over a reader and a writer.
pub struct WizardConsole<'c, R: BufRead, W: Write> {
    ctx: &'c ServiceContext,
    reader: R,
    writer: W,
}

impl<'c, R: BufRead, W: Write> WizardConsole<'c, R, W> {
    /// Creates a console reading commands from `reader`.
    pub fn new(ctx: &'c ServiceContext, reader: R, writer: W) -> Self {
        Self { ctx, reader, writer }
    }

    /// Runs until the request is submitted, the user quits, or input ends.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input or writing output fails.
    pub async fn run(mut self, wizard: &mut Wizard<'_>) -> Result<ConsoleOutcome, String> {
        self.say(&format!("Step {}", wizard.current_step()))?;
        loop {
            write!(self.writer, "> ").map_err(|e| format!("write error: {e}"))?;
            self.writer.flush().map_err(|e| format!("flush error: {e}"))?;

            let mut line = String::new();
            let read = self.reader.read_line(&mut line).map_err(|e| format!("read error: {e}"))?;
            if read == 0 {
                self.say("\nInput closed. The request was not submitted.")?;
                return Ok(ConsoleOutcome::Abandoned);
            }

            let command = match parse_command(&line) {
                Ok(command) => command,
                Err(message) => {
                    self.say(&message)?;
                    continue;
                }
            };

            match command {
                ConsoleCommand::Quit => {
                    self.say("Leaving. The request was not submitted.")?;
                    return Ok(ConsoleOutcome::Abandoned);
                }
                ConsoleCommand::Next => {
                    if let Some(report) = self.next(wizard).await? {
                        return Ok(ConsoleOutcome::Submitted(report));
                    }
                }
                other => self.apply(wizard, other)?,
            }
        }
    }

    /// Presses `Next` and reports the transition. Returns the report once
    /// the request has been created and the wizard has redirected.
    async fn next(&mut self, wizard: &mut Wizard<'_>) -> Result<Option<SubmitReport>, String> {
        match wizard.next().await {
            Transition::Advanced(step) => self.say(&format!("Step {step}"))?,
            Transition::Blocked(_) => self.say(&blocked_message(wizard))?,
            Transition::Failed(message) => self.say(&message)?,
            Transition::Submitted(report) => {
                self.say(&format!("Your request was created (id {}).", report.task_id))?;
                wizard.complete().await;
                return Ok(Some(report));
            }
        }
        Ok(None)
    }

    fn apply(&mut self, wizard: &mut Wizard<'_>, command: ConsoleCommand) -> Result<(), String> {
        match command {
            ConsoleCommand::Set(patch) => wizard.update(patch),
            ConsoleCommand::People { more: true } => wizard.increment_required_people(),
            ConsoleCommand::People { more: false } => wizard.decrement_required_people(),
            ConsoleCommand::Deadline { date, time } => {
                let today = self.ctx.clock.today();
                let date = match date.to_lowercase().as_str() {
                    "today" => Some(today.format(DEADLINE_DATE_FORMAT).to_string()),
                    "tomorrow" => {
                        Some((today + Duration::days(1)).format(DEADLINE_DATE_FORMAT).to_string())
                    }
                    other => parse_deadline_date(other),
                };
                let Some(date) = date else {
                    return self.say("Date must be `today`, `tomorrow` or YYYY-MM-DD.");
                };
                let time = match time.as_deref().map(parse_deadline_time) {
                    Some(None) => return self.say("Time must look like `09:30 AM`."),
                    Some(parsed) => parsed,
                    None => None,
                };
                wizard.update(FormPatch {
                    deadline_date: Some(date),
                    deadline_time: time,
                    ..FormPatch::default()
                });
            }
            ConsoleCommand::Photos { paths, source } => {
                let mut files = Vec::with_capacity(paths.len());
                for path in &paths {
                    match SelectedFile::load(self.ctx.fs.as_ref(), path) {
                        Ok(file) => files.push(file),
                        Err(message) => self.say(&message)?,
                    }
                }
                let report = match source {
                    PhotoSource::Picker => wizard.pick_photos(files),
                    PhotoSource::DragDrop => wizard.drop_photos(files),
                };
                self.report_staging(wizard, &report)?;
            }
            ConsoleCommand::RemovePhoto(id) => {
                if wizard.remove_photo(&id) {
                    self.say(&format!("Removed {id}."))?;
                } else {
                    self.say(&format!("No staged photo with id {id}."))?;
                }
            }
            ConsoleCommand::Back => {
                wizard.back();
                self.say(&format!("Step {}", wizard.current_step()))?;
            }
            ConsoleCommand::Step(n) => {
                wizard.set_step(n - 1);
                self.say(&format!("Step {}", wizard.current_step()))?;
            }
            ConsoleCommand::Show => self.say(&summary(wizard))?,
            ConsoleCommand::Categories => {
                let mut listing = String::new();
                for category in wizard.categories() {
                    let _ = writeln!(
                        listing,
                        "  {:<16} {} ({})",
                        category.value, category.name, category.task_count
                    );
                }
                self.say(listing.trim_end())?;
            }
            ConsoleCommand::Help => self.say(HELP)?,
            ConsoleCommand::Next | ConsoleCommand::Quit => {}
        }
        Ok(())
    }

    fn report_staging(&mut self, wizard: &Wizard<'_>, report: &StageReport) -> Result<(), String> {
        for id in &report.added {
            if let Some(photo) = wizard.photos().photos().iter().find(|p| &p.id == id) {
                self.say(&format!("Added {} as {id}.", photo.name()))?;
            }
        }
        if let Some(message) = &report.message {
            self.say(&message.to_string())?;
        }
        Ok(())
    }

    fn say(&mut self, message: &str) -> Result<(), String> {
        writeln!(self.writer, "{message}").map_err(|e| format!("write error: {e}"))
    }
}

/// Why the current step refused to advance: the step-level error, then one
/// line per field error.
#[must_use]
pub fn blocked_message(wizard: &Wizard<'_>) -> String {
    let mut message = String::new();
    if let Some(error) = wizard.step_error() {
        let _ = writeln!(message, "{error}");
    }
    for error in wizard.active_validator().field_errors() {
        let _ = writeln!(message, "  {}: {error}", error.field());
    }
    message.trim_end().to_string()
}

/// Multi-line description of the wizard's current contents.
#[must_use]
pub fn summary(wizard: &Wizard<'_>) -> String {
    let form = wizard.form();
    let address = &form.address;
    let mut out = String::new();
    let _ = writeln!(out, "Step:        {}", wizard.current_step());
    let _ = writeln!(out, "Title:       {}", form.title);
    let _ = writeln!(out, "Description: {}", form.description);
    let _ = writeln!(out, "Category:    {}", form.category);
    let _ = writeln!(out, "Urgency:     {}", form.urgency);
    let _ = writeln!(out, "Volunteers:  {}", form.required_people);
    let deadline = form.deadline().map_or_else(|| "none".to_string(), |d| d.to_string());
    let _ = writeln!(out, "Deadline:    {deadline}");
    let _ = writeln!(
        out,
        "Address:     {} / {} / {} / {} / {} {} {}",
        address.country,
        address.state,
        address.city,
        address.neighborhood,
        address.street,
        address.building_no,
        address.door_no
    );
    let photos = wizard.photos();
    let _ = write!(out, "Photos:      {}", photos.len());
    if let Some(remaining) = photos.remaining() {
        let _ = write!(out, " ({remaining} more allowed)");
    }
    for photo in photos.photos() {
        let _ = write!(out, "\n  {} {} -> {}", photo.id, photo.name(), photo.url());
    }
    out
}
