use config::ConfigError;
use serde::Serialize;
use sqlx::migrate::MigrateError;
use std::io::Error as StdIoError;
use tracing::{event, instrument, Level};
use warp::{
    filters::{body::BodyDeserializeError, cors::CorsForbidden},
    http::StatusCode,
    reject::{LengthRequired, MethodNotAllowed, PayloadTooLarge, Reject},
    Rejection, Reply,
};

#[derive(Debug)]
pub enum Error {
    ValidationError(String),
    NoteNotFound(i64),
    DatabaseQueryError(sqlx::Error),
    MigrationError(MigrateError),
    ConfigError(ConfigError),
    InvalidOrigin(String),
    InvalidDatabasePath(String),
    StdFileError(StdIoError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Error::ValidationError(ref reason) => write!(f, "Invalid note: {}", reason),
            Error::NoteNotFound(id) => write!(f, "Note {} not found", id),
            Error::DatabaseQueryError(ref e) => {
                write!(f, "Query could not be executed: {}", e)
            }
            Error::MigrationError(ref e) => write!(f, "Cannot migrate database: {}", e),
            Error::ConfigError(ref e) => write!(f, "Invalid configuration: {}", e),
            Error::InvalidOrigin(ref origin) => {
                write!(f, "Invalid CORS origin `{}`, expected scheme://host[:port]", origin)
            }
            Error::InvalidDatabasePath(ref reason) => {
                write!(f, "Invalid database location: {}", reason)
            }
            Error::StdFileError(ref e) => write!(f, "File error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl Reject for Error {}

impl From<sqlx::Error> for Error {
    fn from(e: sqlx::Error) -> Self {
        Error::DatabaseQueryError(e)
    }
}

impl From<MigrateError> for Error {
    fn from(e: MigrateError) -> Self {
        Error::MigrationError(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::ConfigError(e)
    }
}

impl From<StdIoError> for Error {
    fn from(e: StdIoError) -> Self {
        Error::StdFileError(e)
    }
}

/// JSON body returned for every failed request.
#[derive(Serialize, Debug)]
pub struct ErrorMessage {
    pub code: &'static str,
    pub message: String,
}

fn error_reply(code: &'static str, message: String, status: StatusCode) -> impl Reply {
    warp::reply::with_status(warp::reply::json(&ErrorMessage { code, message }), status)
}

#[instrument]
pub async fn return_error(r: Rejection) -> Result<impl Reply, Rejection> {
    if let Some(error) = r.find::<Error>() {
        match error {
            Error::ValidationError(_) => {
                event!(Level::WARN, "{}", error);
                Ok(error_reply(
                    "validation_error",
                    error.to_string(),
                    StatusCode::UNPROCESSABLE_ENTITY,
                ))
            }
            Error::NoteNotFound(_) => {
                event!(Level::WARN, "{}", error);
                Ok(error_reply("not_found", error.to_string(), StatusCode::NOT_FOUND))
            }
            _ => {
                event!(Level::ERROR, "{}", error);
                Ok(error_reply(
                    "internal_error",
                    "Internal Server Error".to_string(),
                    StatusCode::INTERNAL_SERVER_ERROR,
                ))
            }
        }
    } else if r.is_not_found() {
        Ok(error_reply(
            "not_found",
            "Route not found".to_string(),
            StatusCode::NOT_FOUND,
        ))
    } else if let Some(error) = r.find::<BodyDeserializeError>() {
        event!(Level::WARN, "{}", error);
        Ok(error_reply(
            "invalid_body",
            error.to_string(),
            StatusCode::UNPROCESSABLE_ENTITY,
        ))
    } else if let Some(error) = r.find::<PayloadTooLarge>() {
        event!(Level::WARN, "{}", error);
        Ok(error_reply(
            "payload_too_large",
            error.to_string(),
            StatusCode::PAYLOAD_TOO_LARGE,
        ))
    } else if let Some(error) = r.find::<LengthRequired>() {
        event!(Level::WARN, "{}", error);
        Ok(error_reply(
            "length_required",
            error.to_string(),
            StatusCode::LENGTH_REQUIRED,
        ))
    } else if let Some(error) = r.find::<MethodNotAllowed>() {
        event!(Level::WARN, "{}", error);
        Ok(error_reply(
            "method_not_allowed",
            "Method not allowed".to_string(),
            StatusCode::METHOD_NOT_ALLOWED,
        ))
    } else if let Some(error) = r.find::<CorsForbidden>() {
        event!(Level::WARN, "{}", error);
        Ok(error_reply(
            "cors_forbidden",
            error.to_string(),
            StatusCode::FORBIDDEN,
        ))
    } else {
        event!(Level::ERROR, "unhandled rejection: {:?}", r);
        Ok(error_reply(
            "internal_error",
            "Internal Server Error".to_string(),
            StatusCode::INTERNAL_SERVER_ERROR,
        ))
    }
}
