//! Line-item set arithmetic.
//!
//! Two collections meet in two places: when a kitchen order is absorbed
//! back into a draft (`merge`) and when a biller re-sends an edited draft
//! and only the newly added portion should reach the kitchen (`diff`).

use bigdecimal::BigDecimal;

use super::bill::LineItem;

/// Merge `incoming` into `base`, summing quantities for items that share
/// a `(food_item_id, unit_price)` key. Output order is insertion order of
/// first occurrence: base items first, then genuinely new incoming items.
/// The result never contains two entries with the same key.
pub fn merge(base: &[LineItem], incoming: &[LineItem]) -> Vec<LineItem> {
    let mut merged: Vec<LineItem> = Vec::with_capacity(base.len() + incoming.len());
    for item in base.iter().chain(incoming.iter()) {
        match merged
            .iter_mut()
            .find(|m| m.food_item_id == item.food_item_id && m.unit_price == item.unit_price)
        {
            Some(existing) => {
                existing.quantity += item.quantity;
                existing.total = LineItem::line_total(&existing.unit_price, existing.quantity);
            }
            None => merged.push(item.clone()),
        }
    }
    merged
}

/// Items in `current` that are new or increased relative to `previous`,
/// matched by `food_item_id`. An increase emits only the quantity delta;
/// a decrease emits nothing (the kitchen is never told to un-cook).
/// Output preserves the order of `current`.
pub fn diff(previous: &[LineItem], current: &[LineItem]) -> Vec<LineItem> {
    let mut delta = Vec::new();
    for item in current {
        match previous.iter().find(|p| p.food_item_id == item.food_item_id) {
            None => delta.push(item.clone()),
            Some(prev) if item.quantity > prev.quantity => {
                delta.push(LineItem::new(
                    item.food_item_id,
                    item.food_item_name.clone(),
                    item.unit_price.clone(),
                    item.quantity - prev.quantity,
                ));
            }
            Some(_) => {}
        }
    }
    delta
}

/// Put a caller-supplied item list into canonical form: drop non-positive
/// quantities, consolidate duplicate keys, recompute every total.
pub fn normalize(items: &[LineItem]) -> Vec<LineItem> {
    let kept: Vec<LineItem> = items
        .iter()
        .filter(|i| i.quantity > 0)
        .map(|i| {
            LineItem::new(
                i.food_item_id,
                i.food_item_name.clone(),
                i.unit_price.clone(),
                i.quantity,
            )
        })
        .collect();
    merge(&[], &kept)
}

pub fn items_total(items: &[LineItem]) -> BigDecimal {
    items
        .iter()
        .fold(BigDecimal::from(0), |acc, item| acc + &item.total)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use uuid::Uuid;

    use super::*;

    fn item(id: Uuid, name: &str, price: &str, quantity: i32) -> LineItem {
        LineItem::new(id, name, BigDecimal::from_str(price).expect("price"), quantity)
    }

    #[test]
    fn merge_sums_quantities_for_matching_key() {
        let burger = Uuid::new_v4();
        let base = vec![item(burger, "Burger", "100", 2)];
        let incoming = vec![item(burger, "Burger", "100", 1)];

        let merged = merge(&base, &incoming);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].quantity, 3);
        assert_eq!(merged[0].total, BigDecimal::from(300));
    }

    #[test]
    fn merge_keeps_distinct_prices_apart() {
        let burger = Uuid::new_v4();
        let base = vec![item(burger, "Burger", "100", 2)];
        let incoming = vec![item(burger, "Burger", "120", 1)];

        let merged = merge(&base, &incoming);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].quantity, 2);
        assert_eq!(merged[1].quantity, 1);
    }

    #[test]
    fn merge_appends_new_items_after_base() {
        let burger = Uuid::new_v4();
        let fries = Uuid::new_v4();
        let base = vec![item(burger, "Burger", "100", 2)];
        let incoming = vec![item(fries, "Fries", "50", 1)];

        let merged = merge(&base, &incoming);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].food_item_id, burger);
        assert_eq!(merged[1].food_item_id, fries);
    }

    #[test]
    fn merge_never_duplicates_a_key() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let base = vec![item(a, "A", "10", 1), item(b, "B", "20", 2)];
        let incoming = vec![
            item(a, "A", "10", 3),
            item(b, "B", "20", 1),
            item(a, "A", "10", 1),
        ];

        let merged = merge(&base, &incoming);

        for (idx, entry) in merged.iter().enumerate() {
            let dup = merged.iter().skip(idx + 1).any(|other| {
                other.food_item_id == entry.food_item_id && other.unit_price == entry.unit_price
            });
            assert!(!dup, "duplicate key in merge output");
        }
        // Per-key quantities are conserved across both inputs.
        assert_eq!(merged.iter().map(|i| i.quantity).sum::<i32>(), 8);
    }

    #[test]
    fn merge_of_empty_inputs_is_empty() {
        assert!(merge(&[], &[]).is_empty());
    }

    #[test]
    fn diff_emits_whole_item_when_new() {
        let burger = Uuid::new_v4();
        let fries = Uuid::new_v4();
        let previous = vec![item(burger, "Burger", "100", 2)];
        let current = vec![item(burger, "Burger", "100", 2), item(fries, "Fries", "50", 1)];

        let delta = diff(&previous, &current);

        assert_eq!(delta.len(), 1);
        assert_eq!(delta[0].food_item_id, fries);
        assert_eq!(delta[0].quantity, 1);
    }

    #[test]
    fn diff_emits_only_the_increase() {
        let burger = Uuid::new_v4();
        let previous = vec![item(burger, "Burger", "100", 2)];
        let current = vec![item(burger, "Burger", "100", 5)];

        let delta = diff(&previous, &current);

        assert_eq!(delta.len(), 1);
        assert_eq!(delta[0].quantity, 3);
        assert_eq!(delta[0].total, BigDecimal::from(300));
    }

    #[test]
    fn diff_suppresses_decreases() {
        let burger = Uuid::new_v4();
        let previous = vec![item(burger, "Burger", "100", 3)];
        let current = vec![item(burger, "Burger", "100", 1)];

        assert!(diff(&previous, &current).is_empty());
    }

    #[test]
    fn diff_of_empty_inputs_is_empty() {
        assert!(diff(&[], &[]).is_empty());
    }

    // 2 Burgers on the draft, re-sent as 3 Burgers + 1 Fries: the
    // kitchen should see 1 Burger and 1 Fries.
    #[test]
    fn diff_resend_scenario() {
        let burger = Uuid::new_v4();
        let fries = Uuid::new_v4();
        let previous = vec![item(burger, "Burger", "100", 2)];
        let current = vec![item(burger, "Burger", "100", 3), item(fries, "Fries", "50", 1)];

        let delta = diff(&previous, &current);

        assert_eq!(delta.len(), 2);
        assert_eq!(delta[0].quantity, 1);
        assert_eq!(delta[0].total, BigDecimal::from(100));
        assert_eq!(delta[1].quantity, 1);
        assert_eq!(delta[1].total, BigDecimal::from(50));
        assert_eq!(items_total(&delta), BigDecimal::from(150));
    }

    #[test]
    fn merging_diff_back_restores_current_quantities() {
        let burger = Uuid::new_v4();
        let fries = Uuid::new_v4();
        let previous = vec![item(burger, "Burger", "100", 2)];
        let current = vec![item(burger, "Burger", "100", 3), item(fries, "Fries", "50", 1)];

        let restored = merge(&previous, &diff(&previous, &current));

        for want in &current {
            let got = restored
                .iter()
                .find(|i| i.food_item_id == want.food_item_id)
                .expect("item survives round trip");
            assert_eq!(got.quantity, want.quantity);
            assert_eq!(got.total, want.total);
        }
    }

    #[test]
    fn normalize_drops_non_positive_and_consolidates() {
        let burger = Uuid::new_v4();
        let fries = Uuid::new_v4();
        let items = vec![
            item(burger, "Burger", "100", 1),
            item(fries, "Fries", "50", 0),
            item(burger, "Burger", "100", 2),
        ];

        let normalized = normalize(&items);

        assert_eq!(normalized.len(), 1);
        assert_eq!(normalized[0].quantity, 3);
        assert_eq!(normalized[0].total, BigDecimal::from(300));
    }

    #[test]
    fn items_total_sums_exactly() {
        let items = vec![
            item(Uuid::new_v4(), "Burger", "99.50", 2),
            item(Uuid::new_v4(), "Fries", "50", 1),
        ];
        assert_eq!(items_total(&items), BigDecimal::from_str("249.00").unwrap());
    }
}
