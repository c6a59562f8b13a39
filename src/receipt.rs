//! Printable receipt rendering.
//!
//! Produces a self-contained HTML document sized for a 58 mm thermal
//! printer. The same renderer serves both the customer bill
//! (`show_amounts = true`, from the finalize path) and the kitchen ticket
//! (`show_amounts = false`), which lists items and quantities only.

use bigdecimal::{BigDecimal, RoundingMode};

use crate::domain::bill::Bill;

const RESTAURANT_NAME: &str = "JAF HOT CHICKEN";
const RESTAURANT_ADDRESS_1: &str = "57K, SENTHIL COMPLEX, TENKASI";
const RESTAURANT_ADDRESS_2: &str = "TAMIL NADU 627811";
const RESTAURANT_PHONE: &str = "+91 88385 14326";

/// Two-decimal monetary rounding happens here and only here; stored
/// totals stay exact.
fn format_money(value: &BigDecimal) -> String {
    value.with_scale_round(2, RoundingMode::HalfUp).to_string()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

pub fn render(bill: &Bill, show_amounts: bool) -> String {
    let invoice_no = bill.id.as_simple().to_string();
    let invoice_no = &invoice_no[..8];
    let date = bill.created_at.format("%d/%m/%Y");
    let customer = bill
        .customer_name
        .as_deref()
        .filter(|name| !name.is_empty())
        .unwrap_or("Walk-in Customer");

    let mut rows = String::new();
    for (index, item) in bill.items.iter().enumerate() {
        rows.push_str("<tr>");
        rows.push_str(&format!("<td>{}</td>", index + 1));
        rows.push_str(&format!("<td>{}</td>", escape(&item.food_item_name)));
        if show_amounts {
            rows.push_str(&format!("<td>{}</td>", format_money(&item.unit_price)));
        }
        rows.push_str(&format!("<td>{}</td>", item.quantity));
        if show_amounts {
            rows.push_str(&format!("<td>{}</td>", format_money(&item.total)));
        }
        rows.push_str("</tr>\n");
    }

    let amount_headers = if show_amounts {
        "<th>Sl</th><th>Product</th><th>Price</th><th>Qty</th><th>Amt</th>"
    } else {
        "<th>Sl</th><th>Product</th><th>Qty</th>"
    };

    let totals = if show_amounts {
        let payment = bill
            .payment_mode
            .map(|mode| format!("<p>Payment Mode: {}</p>", mode.as_str().to_uppercase()))
            .unwrap_or_default();
        format!(
            r#"<div class="total"><p>Net Payable: ₹{}</p>{}</div><div class="separator"></div>"#,
            format_money(&bill.total),
            payment
        )
    } else {
        String::new()
    };

    format!(
        r#"<html>
<head>
<title>Bill - {order_no}</title>
<style>
body {{ font-family: monospace; font-size: 10px; margin: 5px; width: 58mm; line-height: 1.2; }}
.header {{ text-align: center; margin-bottom: 8px; }}
.header h2 {{ margin: 2px 0; font-size: 14px; font-weight: bold; }}
.header p {{ margin: 1px 0; font-size: 9px; }}
.bill-details {{ margin: 5px 0; font-size: 9px; }}
.bill-details p {{ margin: 1px 0; }}
.items-table {{ width: 100%; border-collapse: collapse; font-size: 9px; margin: 5px 0; }}
.items-table th {{ text-align: left; padding: 1px 2px; border-bottom: 1px solid #000; font-weight: bold; }}
.items-table td {{ text-align: left; padding: 1px 2px; }}
.total {{ font-weight: bold; font-size: 10px; text-align: right; margin: 5px 0; }}
.separator {{ border-top: 1px dashed #000; margin: 5px 0; }}
.thank-you {{ text-align: center; margin-top: 8px; font-size: 9px; font-weight: bold; }}
</style>
</head>
<body>
<div class="header">
<h2>{name}</h2>
<p>{addr1}</p>
<p>{addr2}</p>
<p>Phone: {phone}</p>
</div>
<div class="separator"></div>
<div class="bill-details">
<p>Invoice No/Date: {invoice_no} / {date}</p>
<p>Customer Name: {customer}</p>
<p>Cust Mobile No: ***{order_no}</p>
</div>
<div class="separator"></div>
<table class="items-table">
<thead><tr>{amount_headers}</tr></thead>
<tbody>
{rows}</tbody>
</table>
<div class="separator"></div>
{totals}<div class="thank-you"><p>THANK YOU, VISIT US AGAIN!</p></div>
</body>
</html>
"#,
        order_no = escape(&bill.order_no),
        name = RESTAURANT_NAME,
        addr1 = RESTAURANT_ADDRESS_1,
        addr2 = RESTAURANT_ADDRESS_2,
        phone = RESTAURANT_PHONE,
        invoice_no = invoice_no,
        date = date,
        customer = escape(customer),
        amount_headers = amount_headers,
        rows = rows,
        totals = totals,
    )
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::domain::bill::{BillStatus, LineItem, PaymentMode};

    fn sample_bill() -> Bill {
        let now = Utc::now();
        Bill {
            id: Uuid::new_v4(),
            customer_name: Some("Asha".to_string()),
            order_no: "1234".to_string(),
            supplemental: false,
            status: BillStatus::Completed,
            total: BigDecimal::from(350),
            payment_mode: Some(PaymentMode::Cash),
            created_at: now,
            updated_at: now,
            items: vec![
                LineItem::new(
                    Uuid::new_v4(),
                    "Burger",
                    BigDecimal::from_str("100").unwrap(),
                    3,
                ),
                LineItem::new(Uuid::new_v4(), "Fries", BigDecimal::from_str("50").unwrap(), 1),
            ],
        }
    }

    #[test]
    fn full_receipt_shows_amounts_and_payment_mode() {
        let doc = render(&sample_bill(), true);
        assert!(doc.contains("Net Payable: ₹350.00"));
        assert!(doc.contains("Payment Mode: CASH"));
        assert!(doc.contains("<th>Price</th>"));
        assert!(doc.contains("Burger"));
        assert!(doc.contains("***1234"));
    }

    #[test]
    fn kitchen_ticket_hides_amounts() {
        let doc = render(&sample_bill(), false);
        assert!(!doc.contains("Net Payable"));
        assert!(!doc.contains("Payment Mode"));
        assert!(!doc.contains("<th>Price</th>"));
        assert!(doc.contains("Burger"));
        assert!(doc.contains("<th>Qty</th>"));
    }

    #[test]
    fn rounds_money_to_two_decimals() {
        let mut bill = sample_bill();
        bill.total = BigDecimal::from_str("350.005").unwrap();
        let doc = render(&bill, true);
        assert!(doc.contains("Net Payable: ₹350.01"));
    }

    #[test]
    fn escapes_markup_in_names() {
        let mut bill = sample_bill();
        bill.customer_name = Some("<script>".to_string());
        let doc = render(&bill, true);
        assert!(doc.contains("&lt;script&gt;"));
        assert!(!doc.contains("<script>"));
    }

    #[test]
    fn anonymous_customer_falls_back_to_walk_in() {
        let mut bill = sample_bill();
        bill.customer_name = None;
        let doc = render(&bill, true);
        assert!(doc.contains("Walk-in Customer"));
    }
}
