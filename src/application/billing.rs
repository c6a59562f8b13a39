//! Order lifecycle orchestration.
//!
//! Drives every bill state transition (draft → active → draft/completed,
//! cancellation by deletion) against a [`BillStore`], delegating item-set
//! arithmetic to [`aggregator`].

use bigdecimal::BigDecimal;
use chrono::{DateTime, Datelike, Duration, Months, NaiveTime, Utc};
use uuid::Uuid;

use crate::domain::aggregator;
use crate::domain::bill::{age_label, Bill, BillStatus, LineItem, PaymentMode, Priority};
use crate::domain::errors::DomainError;
use crate::domain::ports::{BillStore, NewBill};

/// Caller-supplied bill contents, shared by the draft and kitchen paths.
#[derive(Debug, Clone)]
pub struct BillInput {
    pub customer_name: Option<String>,
    pub order_no: String,
    pub items: Vec<LineItem>,
}

/// What `send_to_kitchen` did with the input.
#[derive(Debug, Clone)]
pub enum KitchenDispatch {
    /// A fresh bill went straight to the kitchen queue.
    Dispatched(Bill),
    /// Only the added/increased items went to the kitchen as a new
    /// supplemental order; the draft being edited was left untouched.
    Supplemental(Bill),
    /// Nothing new to cook: the draft was updated in place.
    DraftUpdated(Bill),
}

/// How `complete_active` resolved a finished kitchen order.
#[derive(Debug, Clone)]
pub enum Completion {
    /// The order became the biller's draft in place.
    ReturnedToBiller(Bill),
    /// A supplemental order was absorbed into the existing base draft
    /// (which is returned); the supplemental bill no longer exists.
    MergedIntoDraft(Bill),
    /// A supplemental order had no base draft and became one itself.
    ConvertedToDraft(Bill),
}

/// An active order annotated for the kitchen queue display.
#[derive(Debug, Clone)]
pub struct ActiveOrder {
    pub bill: Bill,
    pub priority: Priority,
    pub age: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SalesStats {
    pub today_sales: BigDecimal,
    pub weekly_sales: BigDecimal,
    pub monthly_sales: BigDecimal,
    pub today_orders: i64,
    pub weekly_orders: i64,
    pub monthly_orders: i64,
}

#[derive(Clone)]
pub struct BillingService<S> {
    store: S,
}

impl<S: BillStore> BillingService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Validation shared by every item-carrying entry point: order number
    /// present, at least one item left after normalization.
    fn validated(input: &BillInput) -> Result<(String, Vec<LineItem>), DomainError> {
        let order_no = input.order_no.trim().to_string();
        if order_no.is_empty() {
            return Err(DomainError::Validation("order number is required".into()));
        }
        let items = aggregator::normalize(&input.items);
        if items.is_empty() {
            return Err(DomainError::Validation("at least one item is required".into()));
        }
        Ok((order_no, items))
    }

    fn load(&self, id: Uuid) -> Result<Bill, DomainError> {
        self.store.find_bill(id)?.ok_or(DomainError::NotFound)
    }

    pub fn bill(&self, id: Uuid) -> Result<Bill, DomainError> {
        self.load(id)
    }

    pub fn create_draft(&self, input: BillInput) -> Result<Bill, DomainError> {
        let (order_no, items) = Self::validated(&input)?;
        let total = aggregator::items_total(&items);
        self.store.insert_bill(NewBill {
            customer_name: input.customer_name,
            order_no,
            supplemental: false,
            status: BillStatus::Draft,
            items,
            total,
        })
    }

    /// In-place rewrite of an existing draft (the "print bill while
    /// editing" path): header fields, the full item set, and the total.
    pub fn update_draft(&self, id: Uuid, input: BillInput) -> Result<Bill, DomainError> {
        let (order_no, items) = Self::validated(&input)?;
        let existing = self.load(id)?;
        if existing.status != BillStatus::Draft {
            return Err(DomainError::InvalidTransition {
                from: existing.status,
                action: "update",
            });
        }
        let total = aggregator::items_total(&items);
        self.store
            .update_draft_contents(id, input.customer_name, order_no, &items, total)
    }

    /// Dispatch a bill to the kitchen queue.
    ///
    /// Re-sending an edited draft sends only the diff: the kitchen gets a
    /// new supplemental order carrying the added/increased items, and the
    /// draft stays as it was. An edit with nothing new to cook (pure
    /// decreases or renames) updates the draft in place instead.
    pub fn send_to_kitchen(
        &self,
        input: BillInput,
        editing_draft: Option<Uuid>,
    ) -> Result<KitchenDispatch, DomainError> {
        let (order_no, items) = Self::validated(&input)?;

        let Some(draft_id) = editing_draft else {
            let total = aggregator::items_total(&items);
            let bill = self.store.insert_bill(NewBill {
                customer_name: input.customer_name,
                order_no,
                supplemental: false,
                status: BillStatus::Active,
                items,
                total,
            })?;
            log::info!("order #{} sent to kitchen", bill.order_no);
            return Ok(KitchenDispatch::Dispatched(bill));
        };

        let draft = self.load(draft_id)?;
        if draft.status != BillStatus::Draft {
            return Err(DomainError::InvalidTransition {
                from: draft.status,
                action: "re-send",
            });
        }

        let delta = aggregator::diff(&draft.items, &items);
        if delta.is_empty() {
            let total = aggregator::items_total(&items);
            let updated = self
                .store
                .update_draft_contents(draft_id, input.customer_name, order_no, &items, total)?;
            return Ok(KitchenDispatch::DraftUpdated(updated));
        }

        let total = aggregator::items_total(&delta);
        let bill = self.store.insert_bill(NewBill {
            customer_name: input.customer_name,
            order_no,
            supplemental: true,
            status: BillStatus::Active,
            items: delta,
            total,
        })?;
        log::info!(
            "additional items for order #{} sent to kitchen",
            bill.order_no
        );
        Ok(KitchenDispatch::Supplemental(bill))
    }

    /// Kitchen marks an active order as prepared.
    pub fn complete_active(&self, id: Uuid) -> Result<Completion, DomainError> {
        let bill = self.load(id)?;
        if bill.status != BillStatus::Active {
            return Err(DomainError::InvalidTransition {
                from: bill.status,
                action: "complete",
            });
        }

        let existing_draft = self.store.find_draft_by_order_no(&bill.order_no)?;

        if !bill.supplemental {
            if existing_draft.is_some() {
                return Err(DomainError::DuplicateDraft(bill.order_no));
            }
            let updated = self.store.set_status(id, BillStatus::Draft, None)?;
            log::info!("order #{} returned to biller as draft", updated.order_no);
            return Ok(Completion::ReturnedToBiller(updated));
        }

        match existing_draft {
            Some(draft) => {
                let merged = aggregator::merge(&draft.items, &bill.items);
                let total = aggregator::items_total(&merged);
                let updated = self
                    .store
                    .absorb_supplemental(draft.id, &merged, total, bill.id)?;
                log::info!(
                    "additional items merged into draft for order #{}",
                    updated.order_no
                );
                Ok(Completion::MergedIntoDraft(updated))
            }
            None => {
                let updated = self.store.set_status(id, BillStatus::Draft, Some(false))?;
                Ok(Completion::ConvertedToDraft(updated))
            }
        }
    }

    /// Kitchen sends an order back for modification without completing it.
    pub fn send_back_to_draft(&self, id: Uuid) -> Result<Bill, DomainError> {
        let bill = self.load(id)?;
        if bill.status != BillStatus::Active {
            return Err(DomainError::InvalidTransition {
                from: bill.status,
                action: "return",
            });
        }
        self.store.set_status(id, BillStatus::Draft, None)
    }

    /// Delete the order and its items. Irreversible; the other side
    /// learns about it from the change feed.
    pub fn cancel(&self, id: Uuid) -> Result<(), DomainError> {
        let bill = self.load(id)?;
        self.store.delete_bill(bill.id)?;
        log::info!("order #{} cancelled", bill.order_no);
        Ok(())
    }

    /// Final print with payment: terminal transition into billing history.
    /// `items` replaces the stored set when the biller edited the draft
    /// while reviewing it.
    pub fn finalize(
        &self,
        id: Uuid,
        payment_mode: PaymentMode,
        items: Option<Vec<LineItem>>,
    ) -> Result<Bill, DomainError> {
        let bill = self.load(id)?;
        if bill.status != BillStatus::Draft {
            return Err(DomainError::InvalidTransition {
                from: bill.status,
                action: "finalize",
            });
        }

        let final_items = match items {
            Some(list) => {
                let normalized = aggregator::normalize(&list);
                if normalized.is_empty() {
                    return Err(DomainError::Validation("at least one item is required".into()));
                }
                Some(normalized)
            }
            None => None,
        };
        let total = aggregator::items_total(final_items.as_deref().unwrap_or(&bill.items));

        let updated =
            self.store
                .finalize_bill(id, payment_mode, final_items.as_deref(), total)?;
        log::info!(
            "order #{} completed ({})",
            updated.order_no,
            payment_mode.as_str()
        );
        Ok(updated)
    }

    pub fn active_orders(
        &self,
        search: Option<&str>,
        priority: Option<Priority>,
        now: DateTime<Utc>,
    ) -> Result<Vec<ActiveOrder>, DomainError> {
        let orders = self
            .store
            .list_by_status(BillStatus::Active)?
            .into_iter()
            .filter(|bill| matches_search(bill, search))
            .map(|bill| {
                let classified = Priority::classify(bill.created_at, now);
                ActiveOrder {
                    age: age_label(bill.created_at, now),
                    priority: classified,
                    bill,
                }
            })
            .filter(|order| priority.map_or(true, |p| order.priority == p))
            .collect();
        Ok(orders)
    }

    pub fn drafts(&self, search: Option<&str>) -> Result<Vec<Bill>, DomainError> {
        Ok(self
            .store
            .list_by_status(BillStatus::Draft)?
            .into_iter()
            .filter(|bill| matches_search(bill, search))
            .collect())
    }

    pub fn history(
        &self,
        search: Option<&str>,
        on_date: Option<chrono::NaiveDate>,
    ) -> Result<Vec<Bill>, DomainError> {
        Ok(self
            .store
            .list_by_status(BillStatus::Completed)?
            .into_iter()
            .filter(|bill| matches_search(bill, search))
            .filter(|bill| on_date.map_or(true, |d| bill.created_at.date_naive() == d))
            .collect())
    }

    /// Completed-order sums and counts for today, this week (Monday
    /// start) and this month, all in UTC.
    pub fn sales_stats(&self, now: DateTime<Utc>) -> Result<SalesStats, DomainError> {
        let day_start = now.date_naive().and_time(NaiveTime::MIN).and_utc();
        let week_start = day_start
            - Duration::days(i64::from(now.date_naive().weekday().num_days_from_monday()));
        let month_start = now
            .date_naive()
            .with_day(1)
            .unwrap_or_else(|| now.date_naive())
            .and_time(NaiveTime::MIN)
            .and_utc();

        let today = self
            .store
            .completed_totals_between(day_start, day_start + Duration::days(1))?;
        let week = self
            .store
            .completed_totals_between(week_start, week_start + Duration::days(7))?;
        let month = self
            .store
            .completed_totals_between(month_start, month_start + Months::new(1))?;

        Ok(SalesStats {
            today_orders: today.len() as i64,
            weekly_orders: week.len() as i64,
            monthly_orders: month.len() as i64,
            today_sales: sum(today),
            weekly_sales: sum(week),
            monthly_sales: sum(month),
        })
    }
}

fn sum(totals: Vec<BigDecimal>) -> BigDecimal {
    totals
        .into_iter()
        .fold(BigDecimal::from(0), |acc, total| acc + total)
}

fn matches_search(bill: &Bill, search: Option<&str>) -> bool {
    let Some(query) = search.map(str::trim).filter(|q| !q.is_empty()) else {
        return true;
    };
    let query = query.to_lowercase();
    bill.order_no.to_lowercase().contains(&query)
        || bill
            .customer_name
            .as_deref()
            .is_some_and(|name| name.to_lowercase().contains(&query))
}
