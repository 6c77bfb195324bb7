use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Filter value meaning "do not constrain on this field".
pub const FILTER_ALL: &str = "all";

/// Represents the status of a task.
/// Corresponds to the `task_status` SQL enum.
///
/// The stored and serialized values are the Spanish labels used by existing
/// clients; English spellings are accepted on input.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_status")]
pub enum TaskStatus {
    /// Not started yet.
    #[default]
    #[serde(rename = "pendiente", alias = "pending")]
    #[sqlx(rename = "pendiente")]
    Pending,
    /// Being worked on.
    #[serde(rename = "en progreso", alias = "in-progress", alias = "in_progress")]
    #[sqlx(rename = "en progreso")]
    InProgress,
    /// Done.
    #[serde(rename = "completada", alias = "completed")]
    #[sqlx(rename = "completada")]
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pendiente",
            TaskStatus::InProgress => "en progreso",
            TaskStatus::Completed => "completada",
        }
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "pendiente" | "pending" => Ok(TaskStatus::Pending),
            "en progreso" | "in-progress" | "in_progress" => Ok(TaskStatus::InProgress),
            "completada" | "completed" => Ok(TaskStatus::Completed),
            other => Err(format!("unknown task status {:?}", other)),
        }
    }
}

/// Represents a task entity as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub due_date: Option<DateTime<Utc>>,
    /// Owner at creation time. Only `GET /task/{id}` consults it.
    pub user_id: Uuid,
    /// Category reference. Not checked for existence.
    pub category_id: Uuid,
}

/// Body of `POST /task` and `PUT /task/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct TaskInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 1000))]
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub status: TaskStatus,

    #[serde(default, deserialize_with = "deserialize_due_date")]
    pub due_date: Option<DateTime<Utc>>,

    pub category_id: Uuid,
}

impl Task {
    /// Creates a new task owned by `user_id`.
    pub fn new(input: TaskInput, user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            status: input.status,
            due_date: input.due_date,
            user_id,
            category_id: input.category_id,
        }
    }

    /// Overwrites every editable field, including the category reference.
    /// The owner is never reassigned.
    pub fn replace(&mut self, input: TaskInput) {
        self.title = input.title;
        self.description = input.description;
        self.status = input.status;
        self.due_date = input.due_date;
        self.category_id = input.category_id;
    }
}

/// Ordering applied by the filter endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueDateOrder {
    /// Ascending by due date; tasks without one come first.
    Nearest,
    /// Descending by due date; tasks without one come last.
    Farthest,
}

/// Body of `POST /task/filters`. Absent or null fields behave like `"all"`.
///
/// Fields are kept as raw JSON so that a value of the wrong type narrows the
/// result instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct TaskQuery {
    #[serde(rename = "categoryId", default)]
    pub category_id: Option<Value>,
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(rename = "sortBy", default)]
    pub sort_by: Option<Value>,
}

/// A resolved task query, always scoped to one owner.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskFilter {
    pub user_id: Uuid,
    pub category_id: Option<Uuid>,
    pub status: Option<TaskStatus>,
    pub order: Option<DueDateOrder>,
}

impl TaskFilter {
    /// All tasks of `user_id`, unordered.
    pub fn owned_by(user_id: Uuid) -> Self {
        Self {
            user_id,
            category_id: None,
            status: None,
            order: None,
        }
    }

    pub fn ordered(mut self, order: DueDateOrder) -> Self {
        self.order = Some(order);
        self
    }

    /// Resolves the wire query for `user_id`.
    ///
    /// Returns `None` when a criterion can never match (a category id that is
    /// not a UUID, an unknown status, or a non-string value); the caller
    /// answers with an empty list. A `sortBy` other than `"nearest"` or
    /// `"farthest"` leaves the result unordered.
    pub fn from_query(user_id: Uuid, query: &TaskQuery) -> Option<Self> {
        let category_id = match constrained(&query.category_id)? {
            Some(raw) => Some(Uuid::parse_str(raw).ok()?),
            None => None,
        };
        let status = match constrained(&query.status)? {
            Some(raw) => Some(raw.parse().ok()?),
            None => None,
        };
        let order = match query.sort_by.as_ref().and_then(Value::as_str) {
            Some("nearest") => Some(DueDateOrder::Nearest),
            Some("farthest") => Some(DueDateOrder::Farthest),
            _ => None,
        };

        Some(Self {
            user_id,
            category_id,
            status,
            order,
        })
    }

    pub fn matches(&self, task: &Task) -> bool {
        task.user_id == self.user_id
            && self.category_id.map_or(true, |id| task.category_id == id)
            && self.status.map_or(true, |status| task.status == status)
    }

    /// Applies the requested ordering in place; a no-op when unordered.
    pub fn sort(&self, tasks: &mut [Task]) {
        match self.order {
            Some(DueDateOrder::Nearest) => tasks.sort_by(|a, b| a.due_date.cmp(&b.due_date)),
            Some(DueDateOrder::Farthest) => tasks.sort_by(|a, b| b.due_date.cmp(&a.due_date)),
            None => {}
        }
    }
}

/// `Some(None)` for an unconstrained field, `Some(Some(raw))` for a string
/// criterion, `None` for a value that no task can match.
fn constrained(value: &Option<Value>) -> Option<Option<&str>> {
    match value {
        None => Some(None),
        Some(Value::String(raw)) if raw.as_str() == FILTER_ALL => Some(None),
        Some(Value::String(raw)) => Some(Some(raw.as_str())),
        Some(_) => None,
    }
}

/// Parses a due date given either as an RFC 3339 timestamp or as a bare
/// `YYYY-MM-DD` date (midnight UTC).
pub fn parse_due_date(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| Utc.from_utc_datetime(&midnight))
        .ok_or_else(|| format!("invalid due_date {:?}", raw))
}

fn deserialize_due_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.is_empty() => parse_due_date(&raw).map(Some).map_err(de::Error::custom),
        _ => Ok(None),
    }
}
