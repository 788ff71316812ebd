use serde_json::Value;
use thiserror::Error;

use crate::models::{activity::LearnerActivitySnapshot, draft::NotificationDraft};

pub const MAX_DRAFTS: usize = 3;
pub const MAX_COMPLETION: u32 = 100;

const REQUIRED_DRAFT_FIELDS: [&str; 5] = ["id", "title", "body", "sendNow", "type"];

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("video '{key}' has completion {completion}, expected 0 to 100")]
    CompletionOutOfRange { key: String, completion: u32 },

    #[error("expected a JSON array of notifications, got {0}")]
    NotAnArray(&'static str),

    #[error("expected 1 to 3 notifications, got {0}")]
    DraftCount(usize),

    #[error("notification {index} is missing required field '{field}'")]
    MissingField { index: usize, field: &'static str },

    #[error("notification {index} is malformed: {reason}")]
    MalformedDraft { index: usize, reason: String },
}

pub fn validate_snapshot(snapshot: &LearnerActivitySnapshot) -> Result<(), ValidationError> {
    for (key, video) in &snapshot.videos {
        if video.completion > MAX_COMPLETION {
            return Err(ValidationError::CompletionOutOfRange {
                key: key.clone(),
                completion: video.completion,
            });
        }
    }

    Ok(())
}

/// Checks generated output against the structured-output contract and
/// converts it into typed drafts.
pub fn validate_drafts(value: Value) -> Result<Vec<NotificationDraft>, ValidationError> {
    let items = match value {
        Value::Array(items) => items,
        other => return Err(ValidationError::NotAnArray(json_kind(&other))),
    };

    if items.is_empty() || items.len() > MAX_DRAFTS {
        return Err(ValidationError::DraftCount(items.len()));
    }

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let Some(object) = item.as_object() else {
                return Err(ValidationError::MalformedDraft {
                    index,
                    reason: format!("expected an object, got {}", json_kind(&item)),
                });
            };

            if let Some(field) = REQUIRED_DRAFT_FIELDS
                .into_iter()
                .find(|field| !object.contains_key(*field))
            {
                return Err(ValidationError::MissingField { index, field });
            }

            serde_json::from_value::<NotificationDraft>(item).map_err(|e| {
                ValidationError::MalformedDraft {
                    index,
                    reason: e.to_string(),
                }
            })
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
