use crate::services::AudioDownloadService;
use actix_web::web::{Data, Query};
use actix_web::{HttpResponse, Responder};
use serde::Deserialize;
use std::sync::Arc;
use tracing::error;

#[derive(Deserialize)]
pub(crate) struct MetadataQuery {
    url: Option<String>,
}

pub(crate) async fn get_metadata(
    audio_download_service: Data<Arc<AudioDownloadService>>,
    query: Query<MetadataQuery>,
) -> impl Responder {
    let source = match query.url.as_deref().map(str::trim) {
        Some(source) if !source.is_empty() => source,
        _ => return HttpResponse::BadRequest().body("Missing url"),
    };

    match audio_download_service.fetch_metadata(source).await {
        Ok(metadata) => HttpResponse::Ok().json(metadata.summarize()),
        Err(error) => {
            error!(source, ?error, "Unable to fetch source metadata");
            HttpResponse::InternalServerError().body(error.to_string())
        }
    }
}
