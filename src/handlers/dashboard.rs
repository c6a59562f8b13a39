use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::billing::SalesStats;
use crate::errors::AppError;
use crate::session::{SessionContext, UserRole};
use crate::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct SalesStatsResponse {
    pub today_sales: String,
    pub weekly_sales: String,
    pub monthly_sales: String,
    pub today_orders: i64,
    pub weekly_orders: i64,
    pub monthly_orders: i64,
}

impl From<SalesStats> for SalesStatsResponse {
    fn from(stats: SalesStats) -> Self {
        Self {
            today_sales: stats.today_sales.to_string(),
            weekly_sales: stats.weekly_sales.to_string(),
            monthly_sales: stats.monthly_sales.to_string(),
            today_orders: stats.today_orders,
            weekly_orders: stats.weekly_orders,
            monthly_orders: stats.monthly_orders,
        }
    }
}

/// GET /dashboard/stats
///
/// Completed-order sums and counts for today, this week (Monday start)
/// and this month, in UTC.
#[utoipa::path(
    get,
    path = "/dashboard/stats",
    responses((status = 200, description = "Sales statistics", body = SalesStatsResponse)),
    tag = "dashboard"
)]
pub async fn stats(
    state: web::Data<AppState>,
    session: SessionContext,
) -> Result<HttpResponse, AppError> {
    session.require(UserRole::Biller)?;
    let billing = state.billing.clone();

    let stats = web::block(move || billing.sales_stats(Utc::now()))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(SalesStatsResponse::from(stats)))
}
