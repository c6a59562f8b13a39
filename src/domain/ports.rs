use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::bill::{Bill, BillStatus, LineItem, PaymentMode};
use super::errors::DomainError;
use super::menu::{FoodItem, FoodItemInput};

#[derive(Debug, Clone)]
pub struct NewBill {
    pub customer_name: Option<String>,
    pub order_no: String,
    pub supplemental: bool,
    pub status: BillStatus,
    pub items: Vec<LineItem>,
    pub total: BigDecimal,
}

/// Persistence collaborator for bills and their line items.
///
/// Every mutation is atomic: an implementation either applies the whole
/// operation or leaves the store untouched, and announces committed
/// changes on the shared change feed.
pub trait BillStore: Send + Sync + 'static {
    fn insert_bill(&self, new: NewBill) -> Result<Bill, DomainError>;

    fn find_bill(&self, id: Uuid) -> Result<Option<Bill>, DomainError>;

    /// Earliest-created draft carrying `order_no`, if any.
    fn find_draft_by_order_no(&self, order_no: &str) -> Result<Option<Bill>, DomainError>;

    /// All bills in `status`, in the ordering each dashboard expects:
    /// active FIFO by creation, drafts most-recently-updated first,
    /// completed newest first.
    fn list_by_status(&self, status: BillStatus) -> Result<Vec<Bill>, DomainError>;

    /// Rewrite a bill's header fields and replace its entire item set.
    fn update_draft_contents(
        &self,
        id: Uuid,
        customer_name: Option<String>,
        order_no: String,
        items: &[LineItem],
        total: BigDecimal,
    ) -> Result<Bill, DomainError>;

    fn set_status(
        &self,
        id: Uuid,
        status: BillStatus,
        supplemental: Option<bool>,
    ) -> Result<Bill, DomainError>;

    /// Replace the draft's items with `merged_items`, update its total,
    /// and delete the supplemental bill along with its items. Returns the
    /// updated draft.
    fn absorb_supplemental(
        &self,
        draft_id: Uuid,
        merged_items: &[LineItem],
        new_total: BigDecimal,
        supplemental_id: Uuid,
    ) -> Result<Bill, DomainError>;

    /// Mark a bill completed, stamping the payment mode; `items` replaces
    /// the stored set when present.
    fn finalize_bill(
        &self,
        id: Uuid,
        payment_mode: PaymentMode,
        items: Option<&[LineItem]>,
        total: BigDecimal,
    ) -> Result<Bill, DomainError>;

    /// Delete the bill and all its line items.
    fn delete_bill(&self, id: Uuid) -> Result<(), DomainError>;

    /// Totals of completed bills created within `[from, to)`.
    fn completed_totals_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<BigDecimal>, DomainError>;
}

pub trait MenuStore: Send + Sync + 'static {
    fn list_items(&self, only_available: bool) -> Result<Vec<FoodItem>, DomainError>;
    fn insert_item(&self, input: FoodItemInput) -> Result<FoodItem, DomainError>;
    fn update_item(&self, id: Uuid, input: FoodItemInput) -> Result<FoodItem, DomainError>;
    fn delete_item(&self, id: Uuid) -> Result<(), DomainError>;
}
