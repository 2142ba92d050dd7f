use actix_web::web::{Data, Query};
use actix_web::{HttpResponse, Responder};
use request_processors::SearchAggregator;
use serde::Deserialize;
use std::sync::Arc;
use tracing::error;

#[derive(Deserialize)]
pub(crate) struct SearchQuery {
    q: Option<String>,
}

pub(crate) async fn search(
    search_aggregator: Data<Arc<SearchAggregator>>,
    query: Query<SearchQuery>,
) -> impl Responder {
    let query = match query.q.as_deref().map(str::trim) {
        Some(query) if !query.is_empty() => query,
        _ => return HttpResponse::BadRequest().body("Missing search query"),
    };

    let (result, error) = search_aggregator.search(query).await;

    if let Some(error) = error {
        error!(query, %error, "Search returned partial results");
    }

    HttpResponse::Ok().json(result)
}
