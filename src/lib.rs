pub mod config;
pub mod routes;
pub mod store;
pub mod types;

use crate::config::Args;
use crate::store::Store;
use handle_errors::return_error;
use warp::filters::cors::Builder;
use warp::{http::Method, Filter};

/// Largest accepted request body. Comfortably above a note at its length limits.
pub const MAX_BODY_BYTES: u64 = 256 * 1024;

/// CORS policy for the frontend origins named in the configuration.
pub fn cors(config: &Args) -> Result<Builder, handle_errors::Error> {
    let cors = warp::cors()
        .allow_headers(vec!["Content-Type", "Accept"])
        .allow_methods(&[Method::PUT, Method::DELETE, Method::GET, Method::POST]);

    if config.cors_allow_any_origin {
        return Ok(cors.allow_any_origin());
    }
    config.validate_origins()?;
    Ok(cors.allow_origins(config.frontend_origins.iter().map(String::as_str)))
}

/// Every endpoint of the service. Paths are matched before methods so an
/// unknown path is a 404 rather than a 405. Route errors are recovered inside
/// the CORS layer so they keep the CORS headers; CORS rejections are recovered
/// outside it.
pub fn api(
    store: Store,
    cors: Builder,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let store_filter = warp::any().map(move || store.clone());

    let health_check = warp::path::end()
        .and(warp::get())
        .and_then(routes::health::health_check);

    let get_notes = warp::path("notes")
        .and(warp::path::end())
        .and(warp::get())
        .and(store_filter.clone())
        .and_then(routes::note::get_notes);

    let add_note = warp::path("notes")
        .and(warp::path::end())
        .and(warp::post())
        .and(store_filter.clone())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and_then(routes::note::add_note);

    let get_note = warp::path("notes")
        .and(warp::path::param::<i64>())
        .and(warp::path::end())
        .and(warp::get())
        .and(store_filter.clone())
        .and_then(routes::note::get_note);

    let update_note = warp::path("notes")
        .and(warp::path::param::<i64>())
        .and(warp::path::end())
        .and(warp::put())
        .and(store_filter.clone())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and_then(routes::note::update_note);

    let delete_note = warp::path("notes")
        .and(warp::path::param::<i64>())
        .and(warp::path::end())
        .and(warp::delete())
        .and(store_filter)
        .and_then(routes::note::delete_note);

    health_check
        .or(get_notes)
        .or(add_note)
        .or(get_note)
        .or(update_note)
        .or(delete_note)
        .recover(return_error)
        .with(cors)
        .recover(return_error)
        .with(warp::trace(|info| {
            tracing::info_span!(
                "request",
                method = %info.method(),
                path = %info.path(),
                id = %uuid::Uuid::new_v4(),
            )
        }))
}
