use actix_web::web::{Bytes, Data, Json, Path};
use actix_web::{HttpResponse, Responder};
use request_processors::{
    DownloadConvertPipeline, DownloadRequest, SongId, SongStorage, Step, StoredSong,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, warn};
use uuid::Uuid;

const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

#[derive(Serialize)]
struct StepsHeader {
    steps: [Step; 2],
}

#[derive(Serialize)]
struct ErrorLine {
    error: String,
}

fn ndjson_line<T: Serialize>(value: &T) -> Result<Bytes, serde_json::Error> {
    let mut line = serde_json::to_vec(value)?;
    line.push(b'\n');

    Ok(Bytes::from(line))
}

fn final_line(result: Result<StoredSong, String>) -> Result<Bytes, serde_json::Error> {
    match result {
        Ok(stored) => ndjson_line(&stored),
        Err(error) => ndjson_line(&ErrorLine { error }),
    }
}

pub(crate) async fn download_song(
    pipeline: Data<Arc<DownloadConvertPipeline>>,
    request: Json<DownloadRequest>,
) -> HttpResponse {
    let request = request.into_inner();

    if let Err(error) = request.validate() {
        return HttpResponse::BadRequest().body(error.to_string());
    }

    let (sender, mut receiver) = mpsc::unbounded_channel();
    let pipeline = Arc::clone(&pipeline);
    let source_id = request.source_id.clone();

    // The pipeline owns the only sender, so the channel closes once it returns.
    let task = actix_rt::spawn(async move {
        pipeline
            .run(&request, &sender)
            .await
            .map_err(|error| error.to_string())
    });

    let first_event = match receiver.recv().await {
        Some(event) => event,
        None => {
            return match task.await {
                Ok(Ok(stored)) => HttpResponse::Ok().json(stored),
                Ok(Err(error)) => {
                    error!(
                        source_id = %source_id,
                        %error,
                        "Download failed before reporting progress"
                    );
                    HttpResponse::InternalServerError().body(error)
                }
                Err(error) => {
                    error!(source_id = %source_id, %error, "Download task failed");
                    HttpResponse::InternalServerError().finish()
                }
            };
        }
    };

    let body = async_stream::stream! {
        yield ndjson_line(&StepsHeader { steps: Step::ALL });
        yield ndjson_line(&first_event);

        while let Some(event) = receiver.recv().await {
            yield ndjson_line(&event);
        }

        let result = match task.await {
            Ok(result) => result,
            Err(error) => Err(error.to_string()),
        };

        if let Err(error) = &result {
            warn!(
                source_id = %source_id,
                %error,
                "Download failed after reporting progress"
            );
        }

        yield final_line(result);
    };

    HttpResponse::Ok()
        .content_type(NDJSON_CONTENT_TYPE)
        .streaming(body)
}

pub(crate) async fn download_songs(
    pipeline: Data<Arc<DownloadConvertPipeline>>,
    requests: Json<Vec<DownloadRequest>>,
) -> impl Responder {
    let report = pipeline.run_batch(&requests).await;

    if report.is_complete() {
        HttpResponse::Ok().json(report)
    } else {
        HttpResponse::InternalServerError().json(report)
    }
}

pub(crate) async fn get_song(
    song_storage: Data<Arc<dyn SongStorage>>,
    song_id: Path<Uuid>,
) -> impl Responder {
    let song_id = SongId::from(song_id.into_inner());

    match song_storage.load_song(&song_id).await {
        Ok(Some(song)) => HttpResponse::Ok().json(StoredSong { id: song_id, song }),
        Ok(None) => HttpResponse::NotFound().finish(),
        Err(error) => {
            error!(%song_id, %error, "Unable to load song");
            HttpResponse::InternalServerError().finish()
        }
    }
}
