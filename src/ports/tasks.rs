//! Task creation and photo attachment port.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::ApiFuture;
use crate::wizard::form::FormData;
use crate::wizard::photos::SelectedFile;

/// Payload sent to create a task. Photos are attached separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    /// Short summary.
    pub title: String,
    /// Full description.
    pub description: String,
    /// Category code.
    pub category: String,
    /// Urgency ordinal, 1 to 5.
    pub urgency: u8,
    /// Volunteers needed.
    pub required_people: u32,
    /// Combined deadline, when a date was chosen.
    pub deadline: Option<NaiveDateTime>,
    /// Country.
    pub country: String,
    /// State or province.
    pub state: String,
    /// City.
    pub city: String,
    /// Neighborhood.
    pub neighborhood: String,
    /// Street.
    pub street: String,
    /// Building number.
    pub building_no: String,
    /// Door number.
    pub door_no: String,
    /// Free-text directions.
    pub address_description: String,
}

impl NewTask {
    /// Builds the transport payload from the wizard's form.
    #[must_use]
    pub fn from_form(form: &FormData) -> Self {
        let address = &form.address;
        Self {
            title: form.title.trim().to_string(),
            description: form.description.trim().to_string(),
            category: form.category.clone(),
            urgency: form.urgency.into(),
            required_people: form.required_people,
            deadline: form.deadline(),
            country: address.country.clone(),
            state: address.state.clone(),
            city: address.city.clone(),
            neighborhood: address.neighborhood.clone(),
            street: address.street.clone(),
            building_no: address.building_no.clone(),
            door_no: address.door_no.clone(),
            address_description: address.description.clone(),
        }
    }
}

/// Response body of a task creation call.
///
/// The backend answers either `{"task": {"id": ...}}` or `{"requestId": ...}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CreatedTask {
    /// Nested task object.
    Task {
        /// The created task.
        task: TaskRef,
    },
    /// Flat request identifier.
    Request {
        /// Identifier of the created request.
        #[serde(rename = "requestId")]
        request_id: IdValue,
    },
}

/// `{"id": ...}` inside a [`CreatedTask::Task`].
#[derive(Debug, Clone, Deserialize)]
pub struct TaskRef {
    /// Task identifier.
    pub id: IdValue,
}

/// Identifier that may arrive as a JSON number or string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IdValue {
    /// Numeric identifier.
    Number(u64),
    /// String identifier.
    Text(String),
}

impl CreatedTask {
    /// The task identifier as a string.
    #[must_use]
    pub fn id(&self) -> String {
        let id = match self {
            CreatedTask::Task { task } => &task.id,
            CreatedTask::Request { request_id } => request_id,
        };
        match id {
            IdValue::Number(n) => n.to_string(),
            IdValue::Text(s) => s.clone(),
        }
    }
}

/// Creates tasks and attaches photos to them.
pub trait TaskApi: Send + Sync {
    /// Creates a task and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the task or cannot be reached.
    fn create_task<'a>(&'a self, task: &'a NewTask) -> ApiFuture<'a, String>;

    /// Uploads one photo and ties it to `task_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload fails. Callers treat this as non-fatal.
    fn attach_photo<'a>(&'a self, file: &'a SelectedFile, task_id: &'a str) -> ApiFuture<'a, ()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::form::{FormPatch, Urgency};

    #[test]
    fn created_task_accepts_both_shapes() {
        let nested: CreatedTask = serde_json::from_str(r#"{"task": {"id": 42}}"#).unwrap();
        assert_eq!(nested.id(), "42");

        let flat: CreatedTask = serde_json::from_str(r#"{"requestId": "req-7"}"#).unwrap();
        assert_eq!(flat.id(), "req-7");

        assert!(serde_json::from_str::<CreatedTask>(r#"{"ok": true}"#).is_err());
    }

    #[test]
    fn new_task_carries_form_fields() {
        let mut form = FormData::default();
        form.merge(FormPatch {
            title: Some("  Fix my sink ".into()),
            description: Some("Leaky pipe under the sink".into()),
            category: Some("HOME_REPAIR".into()),
            urgency: Some(Urgency::Medium),
            deadline_date: Some("2025-06-01".into()),
            deadline_time: Some("10:30 AM".into()),
            city: Some("Istanbul".into()),
            ..FormPatch::default()
        });

        let task = NewTask::from_form(&form);
        assert_eq!(task.title, "Fix my sink");
        assert_eq!(task.urgency, 3);
        assert_eq!(task.required_people, 1);
        assert_eq!(task.city, "Istanbul");

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["deadline"], "2025-06-01T10:30:00");
        assert_eq!(json["category"], "HOME_REPAIR");
    }
}
