use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_EVENT_COLOR: &str = "#3b82f6";
pub const DEFAULT_REMINDER_MINUTES: i64 = 15;

/// A calendar entry. Soft-deleted via `active` so past events keep their
/// history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgendaEvent {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub starts_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<DateTime<Utc>>,
    pub all_day: bool,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Minutes before `starts_at` to fire a reminder; `0` disables it.
    pub reminder_minutes: i64,
    pub user_id: Uuid,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AgendaEvent {
    pub fn new(title: impl Into<String>, starts_at: DateTime<Utc>, user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: None,
            starts_at,
            ends_at: None,
            all_day: false,
            color: DEFAULT_EVENT_COLOR.to_string(),
            category: None,
            location: None,
            reminder_minutes: DEFAULT_REMINDER_MINUTES,
            user_id,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_reminder(mut self, minutes: i64) -> Self {
        self.reminder_minutes = minutes;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgendaCategory {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub user_id: Uuid,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl AgendaCategory {
    pub fn new(name: impl Into<String>, color: impl Into<String>, user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            color: color.into(),
            description: None,
            user_id,
            active: true,
            created_at: Utc::now(),
        }
    }
}
