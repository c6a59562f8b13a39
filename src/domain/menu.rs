use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A menu entry the biller can add to a bill. Bills copy the name and
/// price at the time of sale, so menu edits never rewrite history.
#[derive(Debug, Clone, PartialEq)]
pub struct FoodItem {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub price: BigDecimal,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct FoodItemInput {
    pub name: String,
    pub category: String,
    pub price: BigDecimal,
    pub is_available: bool,
}
