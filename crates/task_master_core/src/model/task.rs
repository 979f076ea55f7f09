use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use time::PrimitiveDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

/// Wire format for `eta`: ISO-8601 date-time with no offset. Due times are
/// wall-clock values; no timezone is assumed anywhere in the system.
pub const ETA_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

/// serde adapter for `eta` so the stored file and the HTTP wire both carry
/// the `ETA_FORMAT` string and round-trip the exact instant.
pub mod eta_format {
    use super::ETA_FORMAT;
    use serde::{Deserialize, Deserializer, Serializer, de, ser};
    use time::PrimitiveDateTime;

    pub fn serialize<S: Serializer>(
        eta: &PrimitiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let text = eta.format(ETA_FORMAT).map_err(ser::Error::custom)?;
        serializer.serialize_str(&text)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<PrimitiveDateTime, D::Error> {
        let text = String::deserialize(deserializer)?;
        PrimitiveDateTime::parse(&text, ETA_FORMAT).map_err(de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Open,
    Done,
    Cancelled,
}

impl Status {
    /// Validated parse of a raw status value. Case-sensitive; anything but
    /// the three closed variants is rejected.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        match raw {
            "OPEN" => Ok(Self::Open),
            "DONE" => Ok(Self::Done),
            "CANCELLED" => Ok(Self::Cancelled),
            other => Err(ValidationError::InvalidStatus(other.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Done => "DONE",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub description: String,
    #[serde(with = "eta_format")]
    pub eta: PrimitiveDateTime,
    pub status: Status,
}
