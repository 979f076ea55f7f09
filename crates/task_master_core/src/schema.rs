//! Schema validation for incoming task payloads. Fields arrive as loosely
//! typed JSON values so a missing key and a mistyped value stay
//! distinguishable; `validate` is pure.

use crate::error::ValidationError;
use crate::model::{ETA_FORMAT, Status, Task};
use serde::Deserialize;
use serde_json::Value;
use time::PrimitiveDateTime;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskPayload {
    #[serde(default)]
    pub description: Option<Value>,
    #[serde(default)]
    pub eta: Option<Value>,
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(default)]
    pub id: Option<Value>,
}

impl TaskPayload {
    pub fn new(description: &str, eta: &str, status: &str) -> Self {
        Self {
            description: Some(Value::String(description.to_string())),
            eta: Some(Value::String(eta.to_string())),
            status: Some(Value::String(status.to_string())),
            id: None,
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(Value::String(id.to_string()));
        self
    }
}

/// A payload that passed validation; the store decides the final `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidTask {
    pub id: Option<String>,
    pub description: String,
    pub eta: PrimitiveDateTime,
    pub status: Status,
}

impl ValidTask {
    pub fn into_task(self, fallback_id: String) -> Task {
        Task {
            id: self.id.unwrap_or(fallback_id),
            description: self.description,
            eta: self.eta,
            status: self.status,
        }
    }
}

pub fn validate(payload: &TaskPayload) -> Result<ValidTask, ValidationError> {
    let description = required_text(payload.description.as_ref(), "description")?;
    if description.trim().is_empty() {
        return Err(ValidationError::EmptyField("description"));
    }

    let eta_text = required_text(payload.eta.as_ref(), "eta")?;
    let eta = PrimitiveDateTime::parse(eta_text, ETA_FORMAT).map_err(|_| {
        ValidationError::WrongType {
            field: "eta",
            expected: "a timestamp like 2023-06-20T14:00:00",
        }
    })?;

    let status_text = required_text(payload.status.as_ref(), "status")?;

    // Shape checks before value checks: a mistyped id is reported ahead of
    // an unrecognized status.
    let id = match payload.id.as_ref() {
        None | Some(Value::Null) => None,
        Some(Value::String(id)) => Some(id.clone()),
        Some(_) => {
            return Err(ValidationError::WrongType {
                field: "id",
                expected: "a string",
            });
        }
    };

    let status = Status::parse(status_text)?;

    Ok(ValidTask {
        id,
        description: description.to_string(),
        eta,
        status,
    })
}

fn required_text<'a>(
    value: Option<&'a Value>,
    field: &'static str,
) -> Result<&'a str, ValidationError> {
    match value {
        None | Some(Value::Null) => Err(ValidationError::MissingField(field)),
        Some(Value::String(text)) => Ok(text),
        Some(_) => Err(ValidationError::WrongType {
            field,
            expected: "a string",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{TaskPayload, validate};
    use crate::error::ValidationError;
    use crate::model::Status;

    #[test]
    fn valid_payload_passes() {
        let payload = TaskPayload::new("Clean House", "2023-06-20T14:00:00", "OPEN");

        let valid = validate(&payload).unwrap();
        assert_eq!(valid.description, "Clean House");
        assert_eq!(valid.status, Status::Open);
        assert_eq!(valid.id, None);
    }

    #[test]
    fn payload_id_is_carried_through() {
        let payload =
            TaskPayload::new("Clean House", "2023-06-20T14:00:00", "OPEN").with_id("task-1");

        let valid = validate(&payload).unwrap();
        assert_eq!(valid.id.as_deref(), Some("task-1"));
    }

    #[test]
    fn missing_fields_are_reported_by_name() {
        for field in ["description", "eta", "status"] {
            let mut payload = TaskPayload::new("Cooking", "2023-06-20T14:00:00", "OPEN");
            match field {
                "description" => payload.description = None,
                "eta" => payload.eta = None,
                _ => payload.status = None,
            }

            let err = validate(&payload).unwrap_err();
            assert_eq!(err, ValidationError::MissingField(field));
        }
    }

    #[test]
    fn mistyped_description_is_rejected() {
        let mut payload = TaskPayload::new("Cooking", "2023-06-20T14:00:00", "OPEN");
        payload.description = Some(serde_json::json!(42));

        let err = validate(&payload).unwrap_err();
        assert_eq!(err.code(), "schema_error");
        assert!(matches!(err, ValidationError::WrongType { field: "description", .. }));
    }

    #[test]
    fn blank_description_is_rejected() {
        let payload = TaskPayload::new("   ", "2023-06-20T14:00:00", "OPEN");

        let err = validate(&payload).unwrap_err();
        assert_eq!(err, ValidationError::EmptyField("description"));
    }

    #[test]
    fn unparseable_eta_is_rejected() {
        let payload = TaskPayload::new("Cooking", "tomorrow-ish", "OPEN");

        let err = validate(&payload).unwrap_err();
        assert!(matches!(err, ValidationError::WrongType { field: "eta", .. }));
    }

    #[test]
    fn mistyped_id_is_reported_before_status_value() {
        let mut payload = TaskPayload::new("Cooking", "2023-06-20T14:00:00", "BLUE");
        payload.id = Some(serde_json::json!(7));

        let err = validate(&payload).unwrap_err();
        assert!(matches!(err, ValidationError::WrongType { field: "id", .. }));
    }

    #[test]
    fn unknown_status_is_its_own_error_kind() {
        let payload = TaskPayload::new("Cooking", "2023-06-20T14:00:00", "BLUE");

        let err = validate(&payload).unwrap_err();
        assert_eq!(err, ValidationError::InvalidStatus("BLUE".into()));
        assert_eq!(err.code(), "invalid_status");
    }

    #[test]
    fn validation_is_deterministic() {
        let payload = TaskPayload::new("Cooking", "2023-06-20T14:00:00", "OPEN");

        assert_eq!(validate(&payload), validate(&payload));
    }
}
