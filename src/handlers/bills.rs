use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::application::billing::{ActiveOrder, BillInput, Completion, KitchenDispatch};
use crate::domain::bill::{Bill, BillStatus, LineItem, PaymentMode, Priority};
use crate::domain::errors::DomainError;
use crate::errors::AppError;
use crate::receipt;
use crate::session::{SessionContext, UserRole};
use crate::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct LineItemRequest {
    pub food_item_id: Uuid,
    pub food_item_name: String,
    /// Decimal price as a string to avoid floating-point issues, e.g. "99.50"
    pub unit_price: String,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BillRequest {
    pub customer_name: Option<String>,
    /// Human-facing order number (last digits of the customer's phone).
    pub order_no: String,
    pub items: Vec<LineItemRequest>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SendToKitchenRequest {
    pub customer_name: Option<String>,
    pub order_no: String,
    pub items: Vec<LineItemRequest>,
    /// Present when the biller re-sends an existing draft after edits.
    pub editing_draft_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FinalizeRequest {
    /// "cash" or "online"
    pub payment_mode: String,
    /// Replacement item set when the draft was edited while reviewing.
    pub items: Option<Vec<LineItemRequest>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LineItemResponse {
    pub food_item_id: Uuid,
    pub food_item_name: String,
    pub unit_price: String,
    pub quantity: i32,
    pub total: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BillResponse {
    pub id: Uuid,
    pub customer_name: Option<String>,
    pub order_no: String,
    pub supplemental: bool,
    pub status: String,
    pub total: String,
    pub payment_mode: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub items: Vec<LineItemResponse>,
}

impl From<Bill> for BillResponse {
    fn from(bill: Bill) -> Self {
        Self {
            id: bill.id,
            customer_name: bill.customer_name,
            order_no: bill.order_no,
            supplemental: bill.supplemental,
            status: bill.status.as_str().to_string(),
            total: bill.total.to_string(),
            payment_mode: bill.payment_mode.map(|m| m.as_str().to_string()),
            created_at: bill.created_at.to_rfc3339(),
            updated_at: bill.updated_at.to_rfc3339(),
            items: bill
                .items
                .into_iter()
                .map(|item| LineItemResponse {
                    food_item_id: item.food_item_id,
                    food_item_name: item.food_item_name,
                    unit_price: item.unit_price.to_string(),
                    quantity: item.quantity,
                    total: item.total.to_string(),
                })
                .collect(),
        }
    }
}

/// A draft plus its kitchen ticket (items and quantities, no amounts).
#[derive(Debug, Serialize, ToSchema)]
pub struct DraftResponse {
    pub bill: BillResponse,
    pub kitchen_ticket: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DispatchResponse {
    /// "dispatched", "supplemental" or "draft_updated"
    pub outcome: String,
    pub bill: BillResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CompletionResponse {
    /// "returned_to_biller", "merged_into_draft" or "converted_to_draft"
    pub outcome: String,
    pub bill: BillResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FinalizeResponse {
    pub bill: BillResponse,
    /// Printable receipt with amounts and payment mode.
    pub receipt: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ActiveOrderResponse {
    pub bill: BillResponse,
    pub priority: String,
    pub age: String,
}

impl From<ActiveOrder> for ActiveOrderResponse {
    fn from(order: ActiveOrder) -> Self {
        Self {
            bill: order.bill.into(),
            priority: order.priority.as_str().to_string(),
            age: order.age,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ActiveOrdersQuery {
    /// Matches the order number or customer name, case-insensitively.
    pub search: Option<String>,
    /// "normal", "medium", "high" or "urgent".
    pub priority: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct HistoryQuery {
    pub search: Option<String>,
    /// Restrict to bills created on this date (UTC), e.g. "2025-11-20".
    pub on_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ReceiptQuery {
    /// Render price and amount columns. Defaults to true.
    pub amounts: Option<bool>,
}

fn parse_items(items: Vec<LineItemRequest>) -> Result<Vec<LineItem>, DomainError> {
    items
        .into_iter()
        .map(|item| {
            let price = BigDecimal::from_str(&item.unit_price).map_err(|e| {
                DomainError::Validation(format!(
                    "invalid unit_price '{}': {}",
                    item.unit_price, e
                ))
            })?;
            Ok(LineItem::new(
                item.food_item_id,
                item.food_item_name,
                price,
                item.quantity,
            ))
        })
        .collect()
}

fn bill_input(
    customer_name: Option<String>,
    order_no: String,
    items: Vec<LineItemRequest>,
) -> Result<BillInput, DomainError> {
    Ok(BillInput {
        customer_name: customer_name.filter(|name| !name.trim().is_empty()),
        order_no,
        items: parse_items(items)?,
    })
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /bills/drafts
///
/// Save a new draft bill and hand back the kitchen ticket for printing.
#[utoipa::path(
    post,
    path = "/bills/drafts",
    request_body = BillRequest,
    responses(
        (status = 201, description = "Draft created", body = DraftResponse),
        (status = 400, description = "Missing order number or empty item list"),
    ),
    tag = "bills"
)]
pub async fn create_draft(
    state: web::Data<AppState>,
    session: SessionContext,
    body: web::Json<BillRequest>,
) -> Result<HttpResponse, AppError> {
    session.require(UserRole::Biller)?;
    let body = body.into_inner();
    let billing = state.billing.clone();

    let bill = web::block(move || {
        let input = bill_input(body.customer_name, body.order_no, body.items)?;
        billing.create_draft(input)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    let kitchen_ticket = receipt::render(&bill, false);
    Ok(HttpResponse::Created().json(DraftResponse {
        bill: bill.into(),
        kitchen_ticket,
    }))
}

/// PUT /bills/drafts/{id}
///
/// Rewrite an existing draft in place (fields, items and total).
#[utoipa::path(
    put,
    path = "/bills/drafts/{id}",
    params(("id" = Uuid, Path, description = "Draft bill UUID")),
    request_body = BillRequest,
    responses(
        (status = 200, description = "Draft updated", body = DraftResponse),
        (status = 404, description = "No such bill"),
        (status = 409, description = "Bill is not a draft"),
    ),
    tag = "bills"
)]
pub async fn update_draft(
    state: web::Data<AppState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    body: web::Json<BillRequest>,
) -> Result<HttpResponse, AppError> {
    session.require(UserRole::Biller)?;
    let id = path.into_inner();
    let body = body.into_inner();
    let billing = state.billing.clone();

    let bill = web::block(move || {
        let input = bill_input(body.customer_name, body.order_no, body.items)?;
        billing.update_draft(id, input)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    let kitchen_ticket = receipt::render(&bill, false);
    Ok(HttpResponse::Ok().json(DraftResponse {
        bill: bill.into(),
        kitchen_ticket,
    }))
}

/// POST /bills/kitchen
///
/// Send a bill to the kitchen queue. When re-sending an edited draft only
/// the added/increased items are dispatched, as a supplemental order.
#[utoipa::path(
    post,
    path = "/bills/kitchen",
    request_body = SendToKitchenRequest,
    responses(
        (status = 201, description = "Dispatch outcome", body = DispatchResponse),
        (status = 400, description = "Missing order number or empty item list"),
        (status = 404, description = "Editing draft no longer exists"),
    ),
    tag = "bills"
)]
pub async fn send_to_kitchen(
    state: web::Data<AppState>,
    session: SessionContext,
    body: web::Json<SendToKitchenRequest>,
) -> Result<HttpResponse, AppError> {
    session.require(UserRole::Biller)?;
    let body = body.into_inner();
    let billing = state.billing.clone();

    let dispatch = web::block(move || {
        let input = bill_input(body.customer_name, body.order_no, body.items)?;
        billing.send_to_kitchen(input, body.editing_draft_id)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    let (outcome, bill) = match dispatch {
        KitchenDispatch::Dispatched(bill) => ("dispatched", bill),
        KitchenDispatch::Supplemental(bill) => ("supplemental", bill),
        KitchenDispatch::DraftUpdated(bill) => ("draft_updated", bill),
    };
    Ok(HttpResponse::Created().json(DispatchResponse {
        outcome: outcome.to_string(),
        bill: bill.into(),
    }))
}

/// GET /bills/active
///
/// The kitchen queue, FIFO by creation time, annotated with priority and
/// age. Priority is recomputed on every read.
#[utoipa::path(
    get,
    path = "/bills/active",
    params(ActiveOrdersQuery),
    responses(
        (status = 200, description = "Active orders", body = [ActiveOrderResponse]),
        (status = 400, description = "Unknown priority filter"),
    ),
    tag = "bills"
)]
pub async fn list_active(
    state: web::Data<AppState>,
    _session: SessionContext,
    query: web::Query<ActiveOrdersQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let priority = match query.priority.as_deref() {
        None | Some("all") => None,
        Some(raw) => Some(Priority::parse(raw).ok_or_else(|| {
            AppError::BadRequest(format!("unknown priority '{raw}'"))
        })?),
    };
    let billing = state.billing.clone();

    let orders = web::block(move || {
        billing.active_orders(query.search.as_deref(), priority, Utc::now())
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    let response: Vec<ActiveOrderResponse> =
        orders.into_iter().map(ActiveOrderResponse::from).collect();
    Ok(HttpResponse::Ok().json(response))
}

/// GET /bills/drafts
#[utoipa::path(
    get,
    path = "/bills/drafts",
    params(SearchQuery),
    responses((status = 200, description = "Draft bills", body = [BillResponse])),
    tag = "bills"
)]
pub async fn list_drafts(
    state: web::Data<AppState>,
    session: SessionContext,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, AppError> {
    session.require(UserRole::Biller)?;
    let query = query.into_inner();
    let billing = state.billing.clone();

    let drafts = web::block(move || billing.drafts(query.search.as_deref()))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let response: Vec<BillResponse> = drafts.into_iter().map(BillResponse::from).collect();
    Ok(HttpResponse::Ok().json(response))
}

/// GET /bills/history
///
/// Completed bills, newest first.
#[utoipa::path(
    get,
    path = "/bills/history",
    params(HistoryQuery),
    responses((status = 200, description = "Completed bills", body = [BillResponse])),
    tag = "bills"
)]
pub async fn history(
    state: web::Data<AppState>,
    session: SessionContext,
    query: web::Query<HistoryQuery>,
) -> Result<HttpResponse, AppError> {
    session.require(UserRole::Biller)?;
    let query = query.into_inner();
    let billing = state.billing.clone();

    let bills = web::block(move || billing.history(query.search.as_deref(), query.on_date))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let response: Vec<BillResponse> = bills.into_iter().map(BillResponse::from).collect();
    Ok(HttpResponse::Ok().json(response))
}

/// POST /bills/{id}/complete
///
/// Kitchen marks an active order as prepared. A plain order becomes the
/// biller's draft; a supplemental order is absorbed into its base draft.
#[utoipa::path(
    post,
    path = "/bills/{id}/complete",
    params(("id" = Uuid, Path, description = "Active bill UUID")),
    responses(
        (status = 200, description = "Completion outcome", body = CompletionResponse),
        (status = 404, description = "No such bill"),
        (status = 409, description = "Duplicate draft for this order number, or bill not active"),
    ),
    tag = "bills"
)]
pub async fn complete(
    state: web::Data<AppState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    session.require(UserRole::KitchenManager)?;
    let id = path.into_inner();
    let billing = state.billing.clone();

    let completion = web::block(move || billing.complete_active(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let (outcome, bill) = match completion {
        Completion::ReturnedToBiller(bill) => ("returned_to_biller", bill),
        Completion::MergedIntoDraft(bill) => ("merged_into_draft", bill),
        Completion::ConvertedToDraft(bill) => ("converted_to_draft", bill),
    };
    Ok(HttpResponse::Ok().json(CompletionResponse {
        outcome: outcome.to_string(),
        bill: bill.into(),
    }))
}

/// POST /bills/{id}/return
///
/// Kitchen sends an active order back to the biller for modification.
#[utoipa::path(
    post,
    path = "/bills/{id}/return",
    params(("id" = Uuid, Path, description = "Active bill UUID")),
    responses(
        (status = 200, description = "Order returned to draft", body = BillResponse),
        (status = 404, description = "No such bill"),
        (status = 409, description = "Bill is not active"),
    ),
    tag = "bills"
)]
pub async fn send_back(
    state: web::Data<AppState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    session.require(UserRole::KitchenManager)?;
    let id = path.into_inner();
    let billing = state.billing.clone();

    let bill = web::block(move || billing.send_back_to_draft(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(BillResponse::from(bill)))
}

/// DELETE /bills/{id}
///
/// Cancel an order: deletes the bill and all its items. The kitchen
/// cancels active orders, the biller discards drafts; completed bills
/// are immutable history. The other side learns about the deletion from
/// the change feed.
#[utoipa::path(
    delete,
    path = "/bills/{id}",
    params(("id" = Uuid, Path, description = "Bill UUID")),
    responses(
        (status = 204, description = "Order cancelled"),
        (status = 403, description = "Wrong role for this bill's state"),
        (status = 404, description = "No such bill"),
    ),
    tag = "bills"
)]
pub async fn cancel(
    state: web::Data<AppState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let billing = state.billing.clone();
    let bill = web::block(move || billing.bill(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;
    match bill.status {
        BillStatus::Draft => session.require(UserRole::Biller)?,
        BillStatus::Active => session.require(UserRole::KitchenManager)?,
        BillStatus::Completed => return Err(AppError::Forbidden),
    }

    let billing = state.billing.clone();
    web::block(move || billing.cancel(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::NoContent().finish())
}

/// POST /bills/{id}/finalize
///
/// Final print with payment: the draft becomes a completed bill and the
/// full receipt is returned for printing.
#[utoipa::path(
    post,
    path = "/bills/{id}/finalize",
    params(("id" = Uuid, Path, description = "Draft bill UUID")),
    request_body = FinalizeRequest,
    responses(
        (status = 200, description = "Bill completed", body = FinalizeResponse),
        (status = 400, description = "Unknown payment mode or empty item list"),
        (status = 404, description = "No such bill"),
        (status = 409, description = "Bill is not a draft"),
    ),
    tag = "bills"
)]
pub async fn finalize(
    state: web::Data<AppState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    body: web::Json<FinalizeRequest>,
) -> Result<HttpResponse, AppError> {
    session.require(UserRole::Biller)?;
    let id = path.into_inner();
    let body = body.into_inner();

    let payment_mode = PaymentMode::parse(&body.payment_mode).ok_or_else(|| {
        AppError::BadRequest(format!("unknown payment mode '{}'", body.payment_mode))
    })?;

    let billing = state.billing.clone();
    let bill = web::block(move || {
        let items = body.items.map(parse_items).transpose()?;
        billing.finalize(id, payment_mode, items)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    let rendered = receipt::render(&bill, true);
    Ok(HttpResponse::Ok().json(FinalizeResponse {
        bill: bill.into(),
        receipt: rendered,
    }))
}

/// GET /bills/{id}/receipt
///
/// Printable document for any bill; `amounts=false` yields the kitchen
/// ticket variant.
#[utoipa::path(
    get,
    path = "/bills/{id}/receipt",
    params(("id" = Uuid, Path, description = "Bill UUID"), ReceiptQuery),
    responses(
        (status = 200, description = "Printable HTML document"),
        (status = 404, description = "No such bill"),
    ),
    tag = "bills"
)]
pub async fn render_receipt(
    state: web::Data<AppState>,
    _session: SessionContext,
    path: web::Path<Uuid>,
    query: web::Query<ReceiptQuery>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let show_amounts = query.into_inner().amounts.unwrap_or(true);
    let billing = state.billing.clone();

    let bill = web::block(move || billing.bill(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(receipt::render(&bill, show_amounts)))
}
