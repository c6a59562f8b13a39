use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a bill. Cancellation deletes the row instead of
/// recording a state, so it never appears here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillStatus {
    Draft,
    Active,
    Completed,
}

impl BillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillStatus::Draft => "draft",
            BillStatus::Active => "active",
            BillStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(BillStatus::Draft),
            "active" => Some(BillStatus::Active),
            "completed" => Some(BillStatus::Completed),
            _ => None,
        }
    }
}

impl std::fmt::Display for BillStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    Cash,
    Online,
}

impl PaymentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMode::Cash => "cash",
            PaymentMode::Online => "online",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "cash" => Some(PaymentMode::Cash),
            "online" => Some(PaymentMode::Online),
            _ => None,
        }
    }
}

/// One product line within a bill. `total` is always the exact product
/// of `unit_price` and `quantity`; display rounding happens in the
/// receipt renderer only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub food_item_id: Uuid,
    pub food_item_name: String,
    pub unit_price: BigDecimal,
    pub quantity: i32,
    pub total: BigDecimal,
}

impl LineItem {
    pub fn new(
        food_item_id: Uuid,
        food_item_name: impl Into<String>,
        unit_price: BigDecimal,
        quantity: i32,
    ) -> Self {
        let total = Self::line_total(&unit_price, quantity);
        Self {
            food_item_id,
            food_item_name: food_item_name.into(),
            unit_price,
            quantity,
            total,
        }
    }

    pub fn line_total(unit_price: &BigDecimal, quantity: i32) -> BigDecimal {
        unit_price * BigDecimal::from(quantity)
    }
}

/// A bill together with its line items, as read from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Bill {
    pub id: Uuid,
    pub customer_name: Option<String>,
    /// Human-facing order number (last digits of the customer's phone).
    pub order_no: String,
    /// True for a follow-up kitchen order that carries only the items
    /// newly added to an order number that already has a draft.
    pub supplemental: bool,
    pub status: BillStatus,
    pub total: BigDecimal,
    pub payment_mode: Option<PaymentMode>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub items: Vec<LineItem>,
}

// Queue-age thresholds in minutes. Evaluated on read; nothing is stored.
const MEDIUM_AFTER_MIN: i64 = 10;
const HIGH_AFTER_MIN: i64 = 15;
const URGENT_AFTER_MIN: i64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Normal,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn classify(created_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let minutes = (now - created_at).num_minutes();
        if minutes > URGENT_AFTER_MIN {
            Priority::Urgent
        } else if minutes > HIGH_AFTER_MIN {
            Priority::High
        } else if minutes > MEDIUM_AFTER_MIN {
            Priority::Medium
        } else {
            Priority::Normal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Normal => "normal",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "normal" => Some(Priority::Normal),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            "urgent" => Some(Priority::Urgent),
            _ => None,
        }
    }
}

/// Human-readable queue age, e.g. "Just now", "12m ago", "1h 5m ago".
pub fn age_label(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - created_at).num_minutes();
    if minutes < 1 {
        return "Just now".to_string();
    }
    if minutes < 60 {
        return format!("{}m ago", minutes);
    }
    format!("{}h {}m ago", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn at(minutes_ago: i64) -> (DateTime<Utc>, DateTime<Utc>) {
        let now = Utc::now();
        (now - Duration::minutes(minutes_ago), now)
    }

    #[test]
    fn priority_thresholds() {
        let cases = [
            (0, Priority::Normal),
            (10, Priority::Normal),
            (11, Priority::Medium),
            (15, Priority::Medium),
            (16, Priority::High),
            (20, Priority::High),
            (21, Priority::Urgent),
            (90, Priority::Urgent),
        ];
        for (minutes, expected) in cases {
            let (created, now) = at(minutes);
            assert_eq!(
                Priority::classify(created, now),
                expected,
                "at {} minutes",
                minutes
            );
        }
    }

    #[test]
    fn age_label_formats() {
        let (created, now) = at(0);
        assert_eq!(age_label(created, now), "Just now");

        let (created, now) = at(12);
        assert_eq!(age_label(created, now), "12m ago");

        let (created, now) = at(65);
        assert_eq!(age_label(created, now), "1h 5m ago");
    }

    #[test]
    fn status_round_trips() {
        for status in [BillStatus::Draft, BillStatus::Active, BillStatus::Completed] {
            assert_eq!(BillStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(BillStatus::parse("cancelled"), None);
    }

    #[test]
    fn line_total_is_exact_product() {
        use std::str::FromStr;

        let item = LineItem::new(
            Uuid::new_v4(),
            "Burger",
            BigDecimal::from_str("100").unwrap(),
            3,
        );
        assert_eq!(item.total, BigDecimal::from(300));
    }
}
