use crate::config::Config;
use crate::services::{
    AudioConvertService, AudioDownloadService, SpotifyCatalog, SpotifyTokenProvider,
    YouTubeCatalog,
};
use crate::storage::on_disk::OnDiskStorage;
use crate::storage::InMemoryStorage;
use actix_rt::signal::unix;
use actix_web::web::Data;
use actix_web::{web, App, HttpServer};
use futures_lite::FutureExt;
use request_processors::{DownloadConvertPipeline, SearchAggregator, SongStorage};
use search_providers::{SpotifyClient, SpotifyCredentials, TokenCache, YouTubeClient};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

mod config;
mod http;
mod impls;
mod services;
mod storage;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[actix_rt::main]
async fn main() -> std::io::Result<()> {
    let mut terminate = unix::signal(unix::SignalKind::terminate())?;
    let mut interrupt = unix::signal(unix::SignalKind::interrupt())?;

    dotenv::dotenv().ok();
    env_logger::init();

    let config = Arc::from(Config::from_env());

    info!(version = VERSION, "Starting application...");

    std::fs::create_dir_all(&config.media.download_directory)
        .expect("Unable to create download directory");
    std::fs::create_dir_all(&config.media.song_directory)
        .expect("Unable to create song directory");

    let song_storage: Arc<dyn SongStorage> = match &config.song_storage_directory {
        Some(directory) => {
            info!(directory = %directory, "Storing songs on disk");
            Arc::new(OnDiskStorage::create(directory))
        }
        None => {
            info!("Storing songs in memory");
            Arc::new(InMemoryStorage::new())
        }
    };

    let youtube_client = YouTubeClient::create(config.credentials.youtube_api_key.clone());
    let spotify_client = Arc::new(SpotifyClient::create(SpotifyCredentials {
        client_id: config.credentials.spotify_client_id.clone(),
        client_secret: config.credentials.spotify_client_secret.clone(),
    }));
    let audio_download_service = Arc::new(AudioDownloadService::new(
        &config.media.yt_dlp_path,
        &config.media.download_directory,
    ));
    let audio_convert_service = Arc::new(AudioConvertService::new(
        &config.media.ffmpeg_path,
        &config.media.ffprobe_path,
    ));

    let search_aggregator = Arc::new(SearchAggregator::new(
        Arc::new(YouTubeCatalog {
            client: youtube_client,
        }),
        Arc::new(SpotifyTokenProvider {
            cache: TokenCache::new(Arc::clone(&spotify_client)),
        }),
        Arc::new(SpotifyCatalog {
            client: spotify_client,
        }),
        config.detail_fetch_concurrency,
    ));

    let download_pipeline = Arc::new(DownloadConvertPipeline::new(
        audio_download_service.clone(),
        audio_convert_service,
        song_storage.clone(),
        PathBuf::from(&config.media.song_directory),
        config.media.song_url_prefix.clone(),
    ));

    let shutdown_timeout = config.shutdown_timeout;
    let bind_address = config.bind_address.clone();

    let server = HttpServer::new({
        move || {
            App::new()
                .app_data(Data::new(Arc::clone(&search_aggregator)))
                .app_data(Data::new(Arc::clone(&download_pipeline)))
                .app_data(Data::new(Arc::clone(&audio_download_service)))
                .app_data(Data::new(Arc::clone(&song_storage)))
                .service(web::resource("/health").route(web::get().to(http::health_check)))
                .service(
                    web::scope("/download")
                        .service(web::resource("/search").route(web::get().to(http::search)))
                        .service(web::resource("/song").route(web::post().to(http::download_song)))
                        .service(
                            web::resource("/song/{song_id}").route(web::get().to(http::get_song)),
                        )
                        .service(
                            web::resource("/songs").route(web::post().to(http::download_songs)),
                        )
                        .service(
                            web::resource("/metadata").route(web::get().to(http::get_metadata)),
                        ),
                )
        }
    })
    .shutdown_timeout(shutdown_timeout)
    .bind(bind_address)?
    .run();

    let server_handle = server.handle();

    actix_rt::spawn({
        async move {
            if let Err(error) = server.await {
                error!(?error, "Error on http server");
            }
        }
    });

    info!("Application started");

    interrupt.recv().or(terminate.recv()).await;

    info!("Received shutdown signal. Shutting down gracefully...");

    server_handle.stop(true).await;

    Ok(())
}
