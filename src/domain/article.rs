use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: Uuid,
    pub description: String,
    pub unit_price: f64,
    #[serde(default)]
    pub cost_price: f64,
    pub group_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_id: Option<Uuid>,
    /// Articles that do not require size/color detail get a default variant
    /// created alongside them.
    #[serde(default)]
    pub requires_detail: bool,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Article {
    pub fn new(description: impl Into<String>, unit_price: f64, group_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            unit_price,
            cost_price: 0.0,
            group_id,
            brand_id: None,
            requires_detail: true,
            active: true,
            created_at: Utc::now(),
        }
    }
}

/// A stocked size/color combination of an article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variant {
    pub id: Uuid,
    pub article_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub stock: i64,
    pub stock_min: i64,
    pub stock_max: i64,
}

impl Variant {
    pub fn new(article_id: Uuid, size: Option<String>, color: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            article_id,
            size,
            color,
            stock: 0,
            stock_min: 0,
            stock_max: 0,
        }
    }

    /// The placeholder variant created for articles without size/color
    /// detail.
    pub fn default_for(article_id: Uuid) -> Self {
        Self {
            stock: 1,
            stock_min: 1,
            stock_max: 1,
            ..Self::new(article_id, None, None)
        }
    }
}
