//! Shape checks for raw review API responses.
use serde_json::Value;

use crate::error::{MalformedKind, WatchError};
use crate::model::{PollResponse, Submission};

pub const SUBMISSIONS_KEY: &str = "homeworks";
pub const SERVER_TIME_KEY: &str = "current_date";

/// Validate a decoded response body. Checks run in order and the first
/// failure wins; nothing partial is ever returned.
pub fn check_response(body: &Value) -> Result<PollResponse, WatchError> {
    let malformed = |kind| Err(WatchError::MalformedResponse(kind));

    let is_empty = match body {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    };
    if is_empty {
        return malformed(MalformedKind::Empty);
    }
    let Some(map) = body.as_object() else {
        return malformed(MalformedKind::NotAnObject);
    };
    let Some(submissions) = map.get(SUBMISSIONS_KEY) else {
        return malformed(MalformedKind::MissingSubmissions);
    };
    let Some(submissions) = submissions.as_array() else {
        return malformed(MalformedKind::SubmissionsNotAList);
    };
    let server_time = match map.get(SERVER_TIME_KEY) {
        None => return malformed(MalformedKind::MissingServerTime),
        Some(v) => match v.as_i64() {
            Some(ts) if ts > 0 => ts,
            Some(ts) => return malformed(MalformedKind::ServerTimeNotPositive(ts)),
            None => return malformed(MalformedKind::ServerTimeNotInteger),
        },
    };

    Ok(PollResponse {
        submissions: submissions.iter().map(Submission::from_value).collect(),
        server_time,
    })
}
