//! The request record accumulated across wizard steps.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Category code used when the selected category is unknown or missing.
pub const OTHER_CATEGORY: &str = "OTHER";

/// Serialized form of a deadline date.
pub const DEADLINE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Serialized form of a deadline time of day (`hh:mm A`).
pub const DEADLINE_TIME_FORMAT: &str = "%I:%M %p";

/// Ordinal severity of a request, 1 (lowest) to 5 (highest).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Urgency {
    /// Whenever someone has time.
    VeryLow = 1,
    /// Within a week or so.
    Low = 2,
    /// Within a few days.
    #[default]
    Medium = 3,
    /// Today or tomorrow.
    High = 4,
    /// Needs help right now.
    Critical = 5,
}

impl Urgency {
    /// All levels in ascending order.
    pub const ALL: [Urgency; 5] =
        [Urgency::VeryLow, Urgency::Low, Urgency::Medium, Urgency::High, Urgency::Critical];

    /// Human-readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Urgency::VeryLow => "Very low",
            Urgency::Low => "Low",
            Urgency::Medium => "Medium",
            Urgency::High => "High",
            Urgency::Critical => "Critical",
        }
    }
}

impl TryFrom<u8> for Urgency {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Urgency::VeryLow),
            2 => Ok(Urgency::Low),
            3 => Ok(Urgency::Medium),
            4 => Ok(Urgency::High),
            5 => Ok(Urgency::Critical),
            other => Err(format!("urgency must be between 1 and 5, got {other}")),
        }
    }
}

impl From<Urgency> for u8 {
    fn from(value: Urgency) -> Self {
        value as u8
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", u8::from(*self), self.label())
    }
}

/// A category as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category code sent back when creating a task.
    pub value: String,
    /// Display name.
    pub name: String,
    /// Number of open tasks in this category.
    #[serde(default)]
    pub task_count: u32,
}

impl Category {
    /// The fallback option offered when nothing else matches.
    #[must_use]
    pub fn other() -> Self {
        Self { value: OTHER_CATEGORY.to_string(), name: "Other".to_string(), task_count: 0 }
    }
}

/// Selector options: the fetched list with an `OTHER` entry appended if missing.
#[must_use]
pub fn category_options(fetched: &[Category]) -> Vec<Category> {
    let mut options = fetched.to_vec();
    if !options.iter().any(|c| c.value == OTHER_CATEGORY) {
        options.push(Category::other());
    }
    options
}

/// Map a category code onto the available options, falling back to `OTHER`.
#[must_use]
pub fn resolve_category(options: &[Category], code: &str) -> String {
    let code = code.trim();
    options
        .iter()
        .find(|c| c.value.eq_ignore_ascii_case(code))
        .map_or_else(|| OTHER_CATEGORY.to_string(), |c| c.value.clone())
}

/// Where help is needed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Country.
    pub country: String,
    /// State or province.
    pub state: String,
    /// City.
    pub city: String,
    /// Neighborhood or district.
    pub neighborhood: String,
    /// Street name.
    pub street: String,
    /// Building number.
    pub building_no: String,
    /// Door or apartment number.
    pub door_no: String,
    /// Free-text directions.
    pub description: String,
}

/// The in-progress request record threaded through the wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormData {
    /// Short summary of the request.
    pub title: String,
    /// What the helper needs to know.
    pub description: String,
    /// Category code.
    pub category: String,
    /// Severity.
    pub urgency: Urgency,
    /// How many volunteers are needed. Never below 1.
    pub required_people: u32,
    /// Deadline date, serialized as `YYYY-MM-DD`.
    pub deadline_date: Option<String>,
    /// Deadline time of day, serialized as `hh:mm A`.
    pub deadline_time: Option<String>,
    /// Location fields.
    pub address: Address,
}

impl Default for FormData {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            category: OTHER_CATEGORY.to_string(),
            urgency: Urgency::default(),
            required_people: 1,
            deadline_date: None,
            deadline_time: None,
            address: Address::default(),
        }
    }
}

impl FormData {
    /// Shallow-merge a partial update.
    ///
    /// A changed `country` clears `state` and `city`; a changed `state` clears
    /// `city`. Fields present in the same patch are applied after the reset.
    pub fn merge(&mut self, patch: FormPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(urgency) = patch.urgency {
            self.urgency = urgency;
        }
        if let Some(required_people) = patch.required_people {
            self.required_people = required_people.max(1);
        }
        if let Some(date) = patch.deadline_date {
            self.deadline_date = Some(date).filter(|d| !d.is_empty());
        }
        if let Some(time) = patch.deadline_time {
            self.deadline_time = Some(time).filter(|t| !t.is_empty());
        }

        let address = &mut self.address;
        if let Some(country) = patch.country {
            if country != address.country {
                address.state.clear();
                address.city.clear();
            }
            address.country = country;
        }
        if let Some(state) = patch.state {
            if state != address.state {
                address.city.clear();
            }
            address.state = state;
        }
        if let Some(city) = patch.city {
            address.city = city;
        }
        if let Some(neighborhood) = patch.neighborhood {
            address.neighborhood = neighborhood;
        }
        if let Some(street) = patch.street {
            address.street = street;
        }
        if let Some(building_no) = patch.building_no {
            address.building_no = building_no;
        }
        if let Some(door_no) = patch.door_no {
            address.door_no = door_no;
        }
        if let Some(description) = patch.address_description {
            address.description = description;
        }
    }

    /// Combined deadline, when a valid date is set.
    ///
    /// A date without a time means the end of that day (23:59), and so does
    /// a time that cannot be read; the date is never dropped because of it.
    #[must_use]
    pub fn deadline(&self) -> Option<NaiveDateTime> {
        let date = calendar_date(self.deadline_date.as_deref()?)?;
        let time = self
            .deadline_time
            .as_deref()
            .and_then(time_of_day)
            .or_else(|| NaiveTime::from_hms_opt(23, 59, 0))?;
        Some(date.and_time(time))
    }
}

/// A partial update to [`FormData`]. `None` leaves a field untouched.
///
/// Also the shape of YAML drafts loaded by `neighborly create --draft`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormPatch {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New category code.
    pub category: Option<String>,
    /// New urgency.
    pub urgency: Option<Urgency>,
    /// New volunteer count (clamped to at least 1).
    pub required_people: Option<u32>,
    /// New deadline date (`YYYY-MM-DD`, empty clears).
    pub deadline_date: Option<String>,
    /// New deadline time (`hh:mm A`, empty clears).
    pub deadline_time: Option<String>,
    /// New country.
    pub country: Option<String>,
    /// New state or province.
    pub state: Option<String>,
    /// New city.
    pub city: Option<String>,
    /// New neighborhood.
    pub neighborhood: Option<String>,
    /// New street.
    pub street: Option<String>,
    /// New building number.
    pub building_no: Option<String>,
    /// New door number.
    pub door_no: Option<String>,
    /// New address directions.
    pub address_description: Option<String>,
}

impl FormPatch {
    /// Rewrites the deadline fields into their canonical forms.
    ///
    /// Empty values are kept (they clear the field). A value that cannot be
    /// read is left as entered and reported; the first problem is returned.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first unreadable deadline field.
    pub fn normalize_deadline(&mut self) -> Result<(), String> {
        let mut problem = None;
        if let Some(raw) = self.deadline_date.as_mut().filter(|d| !d.trim().is_empty()) {
            match parse_deadline_date(raw) {
                Some(date) => *raw = date,
                None => problem = Some(format!("deadline_date {raw:?} is not a YYYY-MM-DD date")),
            }
        }
        if let Some(raw) = self.deadline_time.as_mut().filter(|t| !t.trim().is_empty()) {
            match parse_deadline_time(raw) {
                Some(time) => *raw = time,
                None => {
                    problem.get_or_insert(format!(
                        "deadline_time {raw:?} is not a time like 09:30 AM or 21:30"
                    ));
                }
            }
        }
        problem.map_or(Ok(()), Err)
    }
}

fn calendar_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DEADLINE_DATE_FORMAT).ok()
}

/// Reads `9:05 pm`-style and 24-hour `21:05` times.
fn time_of_day(input: &str) -> Option<NaiveTime> {
    let upper = input.trim().to_ascii_uppercase();
    NaiveTime::parse_from_str(&upper, DEADLINE_TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(&upper, "%H:%M"))
        .ok()
}

/// Normalize a `YYYY-MM-DD` date string.
#[must_use]
pub fn parse_deadline_date(input: &str) -> Option<String> {
    calendar_date(input).map(|d| d.format(DEADLINE_DATE_FORMAT).to_string())
}

/// Normalize a time of day such as `9:05 am` or `21:05` into `hh:mm A` form.
#[must_use]
pub fn parse_deadline_time(input: &str) -> Option<String> {
    time_of_day(input).map(|t| t.format(DEADLINE_TIME_FORMAT).to_string())
}
