use crate::store::Store;
use crate::types::note::{NewNote, NoteUpdate};
use tracing::{info, instrument};
use warp::http::StatusCode;

#[instrument(skip(store))]
pub async fn get_notes(store: Store) -> Result<impl warp::Reply, warp::Rejection> {
    match store.get_every_note().await {
        Ok(notes) => Ok(warp::reply::json(&notes)),
        Err(e) => Err(warp::reject::custom(e)),
    }
}

#[instrument(skip(store))]
pub async fn get_note(id: i64, store: Store) -> Result<impl warp::Reply, warp::Rejection> {
    match store.get_note(id).await {
        Ok(note) => Ok(warp::reply::json(&note)),
        Err(e) => Err(warp::reject::custom(e)),
    }
}

#[instrument(skip(store))]
pub async fn add_note(store: Store, new_note: NewNote) -> Result<impl warp::Reply, warp::Rejection> {
    new_note.validate().map_err(warp::reject::custom)?;

    match store.add_note(new_note).await {
        Ok(note) => {
            info!("created note {}", note.id);
            Ok(warp::reply::with_status(
                warp::reply::json(&note),
                StatusCode::CREATED,
            ))
        }
        Err(e) => Err(warp::reject::custom(e)),
    }
}

#[instrument(skip(store))]
pub async fn update_note(
    id: i64,
    store: Store,
    update: NoteUpdate,
) -> Result<impl warp::Reply, warp::Rejection> {
    update.validate().map_err(warp::reject::custom)?;

    match store.update_note(id, update).await {
        Ok(note) => {
            info!("updated note {}", note.id);
            Ok(warp::reply::json(&note))
        }
        Err(e) => Err(warp::reject::custom(e)),
    }
}

#[instrument(skip(store))]
pub async fn delete_note(id: i64, store: Store) -> Result<impl warp::Reply, warp::Rejection> {
    match store.delete_note(id).await {
        Ok(()) => {
            info!("deleted note {}", id);
            Ok(warp::reply::with_status(warp::reply(), StatusCode::NO_CONTENT))
        }
        Err(e) => Err(warp::reject::custom(e)),
    }
}
