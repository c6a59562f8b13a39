//! End-to-end lifecycle scenarios driven through the billing service
//! over the in-memory store: the full draft → kitchen → supplemental →
//! merge → finalize flow a real shift goes through.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::Utc;
use pos_service::application::billing::{BillInput, BillingService, Completion, KitchenDispatch};
use pos_service::domain::bill::{BillStatus, LineItem, PaymentMode};
use pos_service::domain::errors::DomainError;
use pos_service::infrastructure::memory::InMemoryBillStore;
use pos_service::notify::{ChangeFeed, ChangeKind, Table};
use uuid::Uuid;

fn item(name: &str, price: &str, quantity: i32) -> LineItem {
    // Stable per-name id so repeated sends refer to the same product.
    let id = Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes());
    LineItem::new(id, name, BigDecimal::from_str(price).expect("price"), quantity)
}

fn input(order_no: &str, items: Vec<LineItem>) -> BillInput {
    BillInput {
        customer_name: None,
        order_no: order_no.to_string(),
        items,
    }
}

#[test]
fn a_full_shift_for_one_table() {
    let svc = BillingService::new(InMemoryBillStore::new());

    // The biller sends the first round straight to the kitchen.
    let KitchenDispatch::Dispatched(active) = svc
        .send_to_kitchen(input("1234", vec![item("Burger", "100", 2)]), None)
        .unwrap()
    else {
        panic!("expected a direct dispatch");
    };
    assert_eq!(active.status, BillStatus::Active);

    // Kitchen finishes; the order lands on the biller's desk as a draft.
    let Completion::ReturnedToBiller(draft) = svc.complete_active(active.id).unwrap() else {
        panic!("expected return to biller");
    };
    assert_eq!(draft.status, BillStatus::Draft);
    assert_eq!(draft.total, BigDecimal::from(200));

    // The customer orders more: the biller re-sends the edited draft and
    // only the delta reaches the kitchen.
    let KitchenDispatch::Supplemental(extra) = svc
        .send_to_kitchen(
            input("1234", vec![item("Burger", "100", 3), item("Fries", "50", 1)]),
            Some(draft.id),
        )
        .unwrap()
    else {
        panic!("expected a supplemental order");
    };
    assert!(extra.supplemental);
    assert_eq!(extra.total, BigDecimal::from(150));
    assert_eq!(extra.items[0].quantity, 1);
    assert_eq!(extra.items[1].quantity, 1);

    // The draft holds its original two burgers until the kitchen is done.
    assert_eq!(svc.bill(draft.id).unwrap().total, BigDecimal::from(200));

    // Kitchen completes the supplemental order: it is absorbed into the
    // base draft and disappears.
    let Completion::MergedIntoDraft(merged) = svc.complete_active(extra.id).unwrap() else {
        panic!("expected merge into draft");
    };
    assert_eq!(merged.id, draft.id);
    assert_eq!(merged.items.len(), 2);
    assert_eq!(merged.items[0].quantity, 3);
    assert_eq!(merged.items[0].total, BigDecimal::from(300));
    assert_eq!(merged.items[1].quantity, 1);
    assert_eq!(merged.items[1].total, BigDecimal::from(50));
    assert_eq!(merged.total, BigDecimal::from(350));
    assert!(matches!(svc.bill(extra.id), Err(DomainError::NotFound)));

    // Exactly one draft exists for the order number.
    assert_eq!(svc.drafts(None).unwrap().len(), 1);

    // Final print: the bill moves to history with its payment mode.
    let done = svc.finalize(merged.id, PaymentMode::Cash, None).unwrap();
    assert_eq!(done.status, BillStatus::Completed);
    assert_eq!(done.payment_mode, Some(PaymentMode::Cash));
    assert_eq!(done.total, BigDecimal::from(350));

    assert!(svc.drafts(None).unwrap().is_empty());
    assert!(svc.active_orders(None, None, Utc::now()).unwrap().is_empty());
    let history = svc.history(None, None).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, done.id);
}

#[test]
fn duplicate_order_numbers_never_produce_two_drafts() {
    let svc = BillingService::new(InMemoryBillStore::new());

    // A draft already sits on the biller's desk for #1234.
    svc.create_draft(input("1234", vec![item("Burger", "100", 1)]))
        .unwrap();

    // A plain (non-supplemental) kitchen order for the same number cannot
    // become a second draft.
    let KitchenDispatch::Dispatched(active) = svc
        .send_to_kitchen(input("1234", vec![item("Fries", "50", 2)]), None)
        .unwrap()
    else {
        panic!("expected dispatch");
    };
    let err = svc.complete_active(active.id).unwrap_err();
    assert!(matches!(err, DomainError::DuplicateDraft(_)));

    // The rejection left everything as it was.
    assert_eq!(svc.drafts(None).unwrap().len(), 1);
    let still_active = svc.bill(active.id).unwrap();
    assert_eq!(still_active.status, BillStatus::Active);

    // A supplemental completion for the same number is fine: it merges.
    let draft_id = svc.drafts(None).unwrap()[0].id;
    let KitchenDispatch::Supplemental(extra) = svc
        .send_to_kitchen(
            input("1234", vec![item("Burger", "100", 2)]),
            Some(draft_id),
        )
        .unwrap()
    else {
        panic!("expected supplemental");
    };
    let Completion::MergedIntoDraft(merged) = svc.complete_active(extra.id).unwrap() else {
        panic!("expected merge");
    };
    assert_eq!(merged.items[0].quantity, 2);
    assert_eq!(svc.drafts(None).unwrap().len(), 1);
}

#[test]
fn cancellation_reaches_subscribers_through_the_change_feed() {
    let feed = ChangeFeed::new();
    let mut rx = feed.subscribe();
    let svc = BillingService::new(InMemoryBillStore::with_feed(feed));

    let KitchenDispatch::Dispatched(active) = svc
        .send_to_kitchen(input("1234", vec![item("Burger", "100", 1)]), None)
        .unwrap()
    else {
        panic!("expected dispatch");
    };

    // Drain the insert tokens from dispatch.
    while let Ok(change) = rx.try_recv() {
        assert_eq!(change.kind, ChangeKind::Insert);
    }

    svc.cancel(active.id).unwrap();

    // The kitchen's delete shows up as coarse tokens; a biller view
    // re-queries and finds the order gone.
    let mut saw_bills_delete = false;
    while let Ok(change) = rx.try_recv() {
        assert_eq!(change.kind, ChangeKind::Delete);
        if change.table == Table::Bills {
            saw_bills_delete = true;
        }
    }
    assert!(saw_bills_delete);
    assert!(svc.active_orders(None, None, Utc::now()).unwrap().is_empty());
    assert!(matches!(svc.bill(active.id), Err(DomainError::NotFound)));
}

#[test]
fn an_orphaned_supplemental_becomes_the_base_draft() {
    let svc = BillingService::new(InMemoryBillStore::new());

    let draft = svc
        .create_draft(input("1234", vec![item("Burger", "100", 2)]))
        .unwrap();
    let KitchenDispatch::Supplemental(extra) = svc
        .send_to_kitchen(
            input("1234", vec![item("Burger", "100", 4)]),
            Some(draft.id),
        )
        .unwrap()
    else {
        panic!("expected supplemental");
    };

    // The base draft is deleted while the kitchen is still cooking.
    svc.cancel(draft.id).unwrap();

    let Completion::ConvertedToDraft(converted) = svc.complete_active(extra.id).unwrap() else {
        panic!("expected conversion");
    };
    assert_eq!(converted.id, extra.id);
    assert_eq!(converted.status, BillStatus::Draft);
    assert!(!converted.supplemental);
    assert_eq!(converted.order_no, "1234");
    assert_eq!(svc.drafts(None).unwrap().len(), 1);
}
