use crate::error::WatchError;
use crate::model::{ReviewStatus, Submission};

/// Turn a submission into the chat message announcing its new status.
pub fn parse_status(submission: &Submission) -> Result<String, WatchError> {
    let name = submission
        .name
        .as_deref()
        .filter(|n| !n.is_empty())
        .ok_or(WatchError::MissingField("homework_name"))?;
    let code = submission
        .status
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or(WatchError::MissingField("status"))?;
    let status: ReviewStatus = code
        .parse()
        .map_err(|_| WatchError::UnknownStatus(code.to_string()))?;
    Ok(format!(
        "Изменился статус проверки работы \"{}\". {}",
        name,
        status.verdict()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approved_message_matches_template() {
        let msg = parse_status(&Submission::new("hw5", "approved")).unwrap();
        assert_eq!(
            msg,
            "Изменился статус проверки работы \"hw5\". Работа проверена: ревьюеру всё понравилось. Ура!"
        );
    }

    #[test]
    fn every_known_status_has_a_verdict() {
        let msg = parse_status(&Submission::new("hw1", "reviewing")).unwrap();
        assert!(msg.contains("взята на проверку"));
        let msg = parse_status(&Submission::new("hw1", "rejected")).unwrap();
        assert!(msg.ends_with("у ревьюера есть замечания."));
    }

    #[test]
    fn missing_fields_are_reported() {
        let err = parse_status(&Submission {
            name: None,
            status: Some("approved".into()),
        })
        .unwrap_err();
        assert!(matches!(err, WatchError::MissingField("homework_name")));

        let err = parse_status(&Submission::new("", "approved")).unwrap_err();
        assert!(matches!(err, WatchError::MissingField("homework_name")));

        let err = parse_status(&Submission::new("hw1", "")).unwrap_err();
        assert!(matches!(err, WatchError::MissingField("status")));
    }

    #[test]
    fn unknown_status_is_rejected() {
        match parse_status(&Submission::new("hw1", "on_hold")).unwrap_err() {
            WatchError::UnknownStatus(code) => assert_eq!(code, "on_hold"),
            other => panic!("wrong error: {other}"),
        }
    }
}
