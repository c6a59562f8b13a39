//! In-memory [`BillStore`] used by the lifecycle tests and as a
//! reference implementation of the port's atomicity contract: every
//! mutation happens under one lock, so an operation either applies
//! fully or not at all.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::bill::{Bill, BillStatus, LineItem, PaymentMode};
use crate::domain::errors::DomainError;
use crate::domain::ports::{BillStore, NewBill};
use crate::notify::{ChangeFeed, ChangeKind, Table};

#[derive(Debug, Clone, Default)]
pub struct InMemoryBillStore {
    bills: Arc<Mutex<HashMap<Uuid, Bill>>>,
    feed: ChangeFeed,
}

impl InMemoryBillStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feed(feed: ChangeFeed) -> Self {
        Self {
            bills: Arc::default(),
            feed,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Uuid, Bill>>, DomainError> {
        self.bills
            .lock()
            .map_err(|_| DomainError::Store("bill store lock poisoned".into()))
    }
}

impl BillStore for InMemoryBillStore {
    fn insert_bill(&self, new: NewBill) -> Result<Bill, DomainError> {
        let now = Utc::now();
        let bill = Bill {
            id: Uuid::new_v4(),
            customer_name: new.customer_name,
            order_no: new.order_no,
            supplemental: new.supplemental,
            status: new.status,
            total: new.total,
            payment_mode: None,
            created_at: now,
            updated_at: now,
            items: new.items,
        };
        self.lock()?.insert(bill.id, bill.clone());
        self.feed.publish(Table::Bills, ChangeKind::Insert);
        self.feed.publish(Table::BillItems, ChangeKind::Insert);
        Ok(bill)
    }

    fn find_bill(&self, id: Uuid) -> Result<Option<Bill>, DomainError> {
        Ok(self.lock()?.get(&id).cloned())
    }

    fn find_draft_by_order_no(&self, order_no: &str) -> Result<Option<Bill>, DomainError> {
        Ok(self
            .lock()?
            .values()
            .filter(|bill| bill.status == BillStatus::Draft && bill.order_no == order_no)
            .min_by_key(|bill| bill.created_at)
            .cloned())
    }

    fn list_by_status(&self, status: BillStatus) -> Result<Vec<Bill>, DomainError> {
        let mut bills: Vec<Bill> = self
            .lock()?
            .values()
            .filter(|bill| bill.status == status)
            .cloned()
            .collect();
        match status {
            BillStatus::Active => bills.sort_by_key(|b| b.created_at),
            BillStatus::Draft => bills.sort_by_key(|b| std::cmp::Reverse(b.updated_at)),
            BillStatus::Completed => bills.sort_by_key(|b| std::cmp::Reverse(b.created_at)),
        }
        Ok(bills)
    }

    fn update_draft_contents(
        &self,
        id: Uuid,
        customer_name: Option<String>,
        order_no: String,
        items: &[LineItem],
        total: BigDecimal,
    ) -> Result<Bill, DomainError> {
        let mut bills = self.lock()?;
        let bill = bills.get_mut(&id).ok_or(DomainError::NotFound)?;
        bill.customer_name = customer_name;
        bill.order_no = order_no;
        bill.items = items.to_vec();
        bill.total = total;
        bill.updated_at = Utc::now();
        let updated = bill.clone();
        drop(bills);
        self.feed.publish(Table::Bills, ChangeKind::Update);
        self.feed.publish(Table::BillItems, ChangeKind::Update);
        Ok(updated)
    }

    fn set_status(
        &self,
        id: Uuid,
        status: BillStatus,
        supplemental: Option<bool>,
    ) -> Result<Bill, DomainError> {
        let mut bills = self.lock()?;
        let bill = bills.get_mut(&id).ok_or(DomainError::NotFound)?;
        bill.status = status;
        if let Some(supplemental) = supplemental {
            bill.supplemental = supplemental;
        }
        bill.updated_at = Utc::now();
        let updated = bill.clone();
        drop(bills);
        self.feed.publish(Table::Bills, ChangeKind::Update);
        Ok(updated)
    }

    fn absorb_supplemental(
        &self,
        draft_id: Uuid,
        merged_items: &[LineItem],
        new_total: BigDecimal,
        supplemental_id: Uuid,
    ) -> Result<Bill, DomainError> {
        let mut bills = self.lock()?;
        if !bills.contains_key(&supplemental_id) {
            return Err(DomainError::NotFound);
        }
        let draft = bills.get_mut(&draft_id).ok_or(DomainError::NotFound)?;
        draft.items = merged_items.to_vec();
        draft.total = new_total;
        draft.updated_at = Utc::now();
        let updated = draft.clone();
        bills.remove(&supplemental_id);
        drop(bills);
        self.feed.publish(Table::BillItems, ChangeKind::Update);
        self.feed.publish(Table::Bills, ChangeKind::Update);
        self.feed.publish(Table::BillItems, ChangeKind::Delete);
        self.feed.publish(Table::Bills, ChangeKind::Delete);
        Ok(updated)
    }

    fn finalize_bill(
        &self,
        id: Uuid,
        payment_mode: PaymentMode,
        items: Option<&[LineItem]>,
        total: BigDecimal,
    ) -> Result<Bill, DomainError> {
        let mut bills = self.lock()?;
        let bill = bills.get_mut(&id).ok_or(DomainError::NotFound)?;
        if let Some(items) = items {
            bill.items = items.to_vec();
        }
        bill.status = BillStatus::Completed;
        bill.payment_mode = Some(payment_mode);
        bill.total = total;
        bill.updated_at = Utc::now();
        let updated = bill.clone();
        drop(bills);
        self.feed.publish(Table::Bills, ChangeKind::Update);
        self.feed.publish(Table::BillItems, ChangeKind::Update);
        Ok(updated)
    }

    fn delete_bill(&self, id: Uuid) -> Result<(), DomainError> {
        let removed = self.lock()?.remove(&id);
        if removed.is_none() {
            return Err(DomainError::NotFound);
        }
        self.feed.publish(Table::BillItems, ChangeKind::Delete);
        self.feed.publish(Table::Bills, ChangeKind::Delete);
        Ok(())
    }

    fn completed_totals_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<BigDecimal>, DomainError> {
        Ok(self
            .lock()?
            .values()
            .filter(|bill| {
                bill.status == BillStatus::Completed
                    && bill.created_at >= from
                    && bill.created_at < to
            })
            .map(|bill| bill.total.clone())
            .collect())
    }
}
