use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::menu::{FoodItem, FoodItemInput};
use crate::domain::ports::MenuStore;
use crate::errors::AppError;
use crate::session::{SessionContext, UserRole};
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct FoodItemRequest {
    pub name: String,
    pub category: String,
    /// Decimal price as a string, e.g. "99.50"
    pub price: String,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FoodItemResponse {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub price: String,
    pub is_available: bool,
}

impl From<FoodItem> for FoodItemResponse {
    fn from(item: FoodItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            category: item.category,
            price: item.price.to_string(),
            is_available: item.is_available,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct MenuQuery {
    /// Only items currently available for ordering. Defaults to false.
    pub available: Option<bool>,
}

fn parse_input(request: FoodItemRequest) -> Result<FoodItemInput, DomainError> {
    let name = request.name.trim().to_string();
    if name.is_empty() {
        return Err(DomainError::Validation("item name is required".into()));
    }
    let price = BigDecimal::from_str(&request.price)
        .map_err(|e| DomainError::Validation(format!("invalid price '{}': {}", request.price, e)))?;
    Ok(FoodItemInput {
        name,
        category: request.category.trim().to_string(),
        price,
        is_available: request.is_available,
    })
}

/// GET /menu
#[utoipa::path(
    get,
    path = "/menu",
    params(MenuQuery),
    responses((status = 200, description = "Menu items", body = [FoodItemResponse])),
    tag = "menu"
)]
pub async fn list(
    state: web::Data<AppState>,
    _session: SessionContext,
    query: web::Query<MenuQuery>,
) -> Result<HttpResponse, AppError> {
    let only_available = query.into_inner().available.unwrap_or(false);
    let menu = state.menu.clone();

    let items = web::block(move || menu.list_items(only_available))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let response: Vec<FoodItemResponse> =
        items.into_iter().map(FoodItemResponse::from).collect();
    Ok(HttpResponse::Ok().json(response))
}

/// POST /menu
#[utoipa::path(
    post,
    path = "/menu",
    request_body = FoodItemRequest,
    responses(
        (status = 201, description = "Item created", body = FoodItemResponse),
        (status = 400, description = "Missing name or invalid price"),
    ),
    tag = "menu"
)]
pub async fn create(
    state: web::Data<AppState>,
    session: SessionContext,
    body: web::Json<FoodItemRequest>,
) -> Result<HttpResponse, AppError> {
    session.require(UserRole::Biller)?;
    let body = body.into_inner();
    let menu = state.menu.clone();

    let item = web::block(move || menu.insert_item(parse_input(body)?))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(FoodItemResponse::from(item)))
}

/// PUT /menu/{id}
#[utoipa::path(
    put,
    path = "/menu/{id}",
    params(("id" = Uuid, Path, description = "Food item UUID")),
    request_body = FoodItemRequest,
    responses(
        (status = 200, description = "Item updated", body = FoodItemResponse),
        (status = 404, description = "No such item"),
    ),
    tag = "menu"
)]
pub async fn update(
    state: web::Data<AppState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    body: web::Json<FoodItemRequest>,
) -> Result<HttpResponse, AppError> {
    session.require(UserRole::Biller)?;
    let id = path.into_inner();
    let body = body.into_inner();
    let menu = state.menu.clone();

    let item = web::block(move || menu.update_item(id, parse_input(body)?))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(FoodItemResponse::from(item)))
}

/// DELETE /menu/{id}
#[utoipa::path(
    delete,
    path = "/menu/{id}",
    params(("id" = Uuid, Path, description = "Food item UUID")),
    responses(
        (status = 204, description = "Item removed"),
        (status = 404, description = "No such item"),
    ),
    tag = "menu"
)]
pub async fn delete(
    state: web::Data<AppState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    session.require(UserRole::Biller)?;
    let id = path.into_inner();
    let menu = state.menu.clone();

    web::block(move || menu.delete_item(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::NoContent().finish())
}
