use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::bill::{Bill, BillStatus, LineItem, PaymentMode};
use crate::domain::errors::DomainError;
use crate::domain::menu::FoodItem;
use crate::schema::{bill_items, bills, food_items};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = bills)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BillRow {
    pub id: Uuid,
    pub customer_name: Option<String>,
    pub order_no: String,
    pub supplemental: bool,
    pub status: String,
    pub total: BigDecimal,
    pub payment_mode: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = bills)]
pub struct NewBillRow {
    pub id: Uuid,
    pub customer_name: Option<String>,
    pub order_no: String,
    pub supplemental: bool,
    pub status: String,
    pub total: BigDecimal,
}

/// Partial bill update; `None` fields are left untouched.
#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = bills)]
pub struct BillChanges {
    pub customer_name: Option<Option<String>>,
    pub order_no: Option<String>,
    pub supplemental: Option<bool>,
    pub status: Option<String>,
    pub total: Option<BigDecimal>,
    pub payment_mode: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = bill_items)]
#[diesel(belongs_to(BillRow, foreign_key = bill_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BillItemRow {
    pub id: Uuid,
    pub bill_id: Uuid,
    pub food_item_id: Uuid,
    pub food_item_name: String,
    pub unit_price: BigDecimal,
    pub quantity: i32,
    pub total: BigDecimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = bill_items)]
pub struct NewBillItemRow {
    pub id: Uuid,
    pub bill_id: Uuid,
    pub food_item_id: Uuid,
    pub food_item_name: String,
    pub unit_price: BigDecimal,
    pub quantity: i32,
    pub total: BigDecimal,
}

impl NewBillItemRow {
    pub fn from_item(bill_id: Uuid, item: &LineItem) -> Self {
        Self {
            id: Uuid::new_v4(),
            bill_id,
            food_item_id: item.food_item_id,
            food_item_name: item.food_item_name.clone(),
            unit_price: item.unit_price.clone(),
            quantity: item.quantity,
            total: item.total.clone(),
        }
    }
}

impl From<BillItemRow> for LineItem {
    fn from(row: BillItemRow) -> Self {
        LineItem {
            food_item_id: row.food_item_id,
            food_item_name: row.food_item_name,
            unit_price: row.unit_price,
            quantity: row.quantity,
            total: row.total,
        }
    }
}

impl BillRow {
    pub fn into_domain(self, items: Vec<BillItemRow>) -> Result<Bill, DomainError> {
        let status = BillStatus::parse(&self.status).ok_or_else(|| {
            DomainError::Store(format!("unknown bill status '{}'", self.status))
        })?;
        let payment_mode = match self.payment_mode.as_deref() {
            None => None,
            Some(raw) => Some(PaymentMode::parse(raw).ok_or_else(|| {
                DomainError::Store(format!("unknown payment mode '{raw}'"))
            })?),
        };
        Ok(Bill {
            id: self.id,
            customer_name: self.customer_name,
            order_no: self.order_no,
            supplemental: self.supplemental,
            status,
            total: self.total,
            payment_mode,
            created_at: self.created_at,
            updated_at: self.updated_at,
            items: items.into_iter().map(LineItem::from).collect(),
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = food_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FoodItemRow {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub price: BigDecimal,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = food_items)]
pub struct NewFoodItemRow {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub price: BigDecimal,
    pub is_available: bool,
}

impl From<FoodItemRow> for FoodItem {
    fn from(row: FoodItemRow) -> Self {
        FoodItem {
            id: row.id,
            name: row.name,
            category: row.category,
            price: row.price,
            is_available: row.is_available,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
