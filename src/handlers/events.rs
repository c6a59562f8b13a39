use actix_web::{web, HttpResponse};
use futures::stream::unfold;
use tokio::sync::broadcast::error::RecvError;

use crate::AppState;

/// GET /events
///
/// Server-sent stream of coarse change tokens. Each event is a JSON
/// `{table, kind}` pair with no payload; clients re-run their own
/// queries in response. Subscribers that fall behind skip the missed
/// tokens and keep going.
#[utoipa::path(
    get,
    path = "/events",
    responses(
        (status = 200, description = "text/event-stream of change tokens"),
    ),
    tag = "events"
)]
pub async fn stream(state: web::Data<AppState>) -> HttpResponse {
    let rx = state.feed.subscribe();
    let events = unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(change) => {
                    let payload = serde_json::json!({
                        "table": change.table,
                        "kind": change.kind,
                    });
                    let frame = web::Bytes::from(format!("data: {payload}\n\n"));
                    return Some((Ok::<_, actix_web::Error>(frame), rx));
                }
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => return None,
            }
        }
    });

    HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header(("cache-control", "no-cache"))
        .streaming(events)
}
