use serde_json::Value;
use std::str::FromStr;

/// Review status codes reported by the review API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewStatus {
    Reviewing,
    Approved,
    Rejected,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Reviewing => "reviewing",
            ReviewStatus::Approved => "approved",
            ReviewStatus::Rejected => "rejected",
        }
    }

    /// Human-readable verdict sent to the chat.
    pub fn verdict(&self) -> &'static str {
        match self {
            ReviewStatus::Reviewing => "Работа взята на проверку ревьюером.",
            ReviewStatus::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            ReviewStatus::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl FromStr for ReviewStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reviewing" => Ok(ReviewStatus::Reviewing),
            "approved" => Ok(ReviewStatus::Approved),
            "rejected" => Ok(ReviewStatus::Rejected),
            _ => Err(()),
        }
    }
}

/// One homework entry as returned by the API. Fields stay raw until the
/// translator checks them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    pub name: Option<String>,
    pub status: Option<String>,
}

impl Submission {
    pub fn new(name: &str, status: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            status: Some(status.to_string()),
        }
    }

    pub(crate) fn from_value(value: &Value) -> Self {
        let field = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            name: field("homework_name"),
            status: field("status"),
        }
    }
}

/// A poll response that passed the shape checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollResponse {
    pub submissions: Vec<Submission>,
    pub server_time: i64,
}

impl PollResponse {
    /// Most recent change; the API lists newest first.
    pub fn lead(&self) -> Option<&Submission> {
        self.submissions.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_codes_round_trip_through_from_str() {
        for status in [
            ReviewStatus::Reviewing,
            ReviewStatus::Approved,
            ReviewStatus::Rejected,
        ] {
            assert_eq!(status.as_str().parse::<ReviewStatus>(), Ok(status));
        }
        assert!("Approved".parse::<ReviewStatus>().is_err());
        assert!("".parse::<ReviewStatus>().is_err());
    }

    #[test]
    fn submission_from_value_ignores_non_string_fields() {
        let sub = Submission::from_value(&json!({ "homework_name": "hw1", "status": 5 }));
        assert_eq!(sub.name.as_deref(), Some("hw1"));
        assert_eq!(sub.status, None);

        let sub = Submission::from_value(&json!("hw1"));
        assert_eq!(sub, Submission::default());
    }
}
