use chrono::{SecondsFormat, Utc};
use handle_errors::Error;
use serde::{Deserialize, Serialize};

pub const TITLE_MAX_CHARS: usize = 200;
pub const CONTENT_MAX_CHARS: usize = 20_000;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Body of `POST /notes`.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct NewNote {
    pub title: String,
    pub content: String,
}

/// Body of `PUT /notes/{id}`. Absent fields keep their stored value.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct NoteUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl NewNote {
    pub fn validate(&self) -> Result<(), Error> {
        check_length("title", &self.title, TITLE_MAX_CHARS)?;
        check_length("content", &self.content, CONTENT_MAX_CHARS)
    }
}

impl NoteUpdate {
    pub fn validate(&self) -> Result<(), Error> {
        if let Some(title) = &self.title {
            check_length("title", title, TITLE_MAX_CHARS)?;
        }
        if let Some(content) = &self.content {
            check_length("content", content, CONTENT_MAX_CHARS)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

fn check_length(field: &str, value: &str, max: usize) -> Result<(), Error> {
    let len = value.chars().count();
    if len == 0 {
        return Err(Error::ValidationError(format!("{} must not be empty", field)));
    }
    if len > max {
        return Err(Error::ValidationError(format!(
            "{} must be at most {} characters, got {}",
            field, max, len
        )));
    }
    Ok(())
}

/// Timestamp format stored in `created_at` / `updated_at`.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
