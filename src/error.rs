use reqwest::StatusCode;
use thiserror::Error;

/// Which shape check a poll response failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedKind {
    NotJson(String),
    Empty,
    NotAnObject,
    MissingSubmissions,
    SubmissionsNotAList,
    MissingServerTime,
    ServerTimeNotInteger,
    ServerTimeNotPositive(i64),
}

impl std::fmt::Display for MalformedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MalformedKind::NotJson(err) => write!(f, "body is not JSON ({err})"),
            MalformedKind::Empty => f.write_str("body is empty"),
            MalformedKind::NotAnObject => f.write_str("body is not an object"),
            MalformedKind::MissingSubmissions => f.write_str("no `homeworks` key"),
            MalformedKind::SubmissionsNotAList => f.write_str("`homeworks` is not a list"),
            MalformedKind::MissingServerTime => f.write_str("no `current_date` key"),
            MalformedKind::ServerTimeNotInteger => f.write_str("`current_date` is not an integer"),
            MalformedKind::ServerTimeNotPositive(ts) => {
                write!(f, "`current_date` is not a valid timestamp ({ts})")
            }
        }
    }
}

/// Everything that can fail inside a poll cycle. None of these stop the loop.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("request to review API failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("review API responded with {status}")]
    RemoteUnavailable { status: StatusCode },
    #[error("malformed review API response: {0}")]
    MalformedResponse(MalformedKind),
    #[error("submission has no `{0}` field")]
    MissingField(&'static str),
    #[error("unknown review status `{0}`")]
    UnknownStatus(String),
}
