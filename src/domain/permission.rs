use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A navigable application module that permissions are granted against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    pub order: u32,
    pub active: bool,
}

impl Module {
    pub fn new(name: impl Into<String>, order: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: None,
            route: None,
            order,
            active: true,
        }
    }
}

/// Row-level visibility grant for one (user, module) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModulePermission {
    pub id: Uuid,
    pub user_id: Uuid,
    pub module_id: Uuid,
    pub can_view: bool,
    pub updated_at: DateTime<Utc>,
}

impl ModulePermission {
    pub fn new(user_id: Uuid, module_id: Uuid, can_view: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            module_id,
            can_view,
            updated_at: Utc::now(),
        }
    }
}
