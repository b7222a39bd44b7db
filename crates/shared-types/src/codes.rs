//! # Result Codes
//!
//! Two code schemes exist side by side:
//!
//! - [`DatabaseCode`] is what a Database Store reports.
//! - [`MessengerCode`] is what goes out on the wire in a reply envelope.
//!
//! The translation between them is a fixed table (see
//! [`From<DatabaseCode> for MessengerCode`](MessengerCode)). It is total, so no
//! storage outcome can leave a request unanswered.
//!
//! [`BusCode`] is the code carried by durable bus messages and acknowledgements.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Outcome codes reported by Database Store collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatabaseCode {
    /// The operation succeeded.
    Ok,
    /// The requested record or database does not exist.
    NotFound,
    /// The stored data could not be decoded.
    CorruptData,
    /// The underlying storage failed.
    StorageFailure,
    /// Any other failure.
    GenericError,
}

impl DatabaseCode {
    /// Every database code, in declaration order.
    pub const ALL: [DatabaseCode; 5] = [
        DatabaseCode::Ok,
        DatabaseCode::NotFound,
        DatabaseCode::CorruptData,
        DatabaseCode::StorageFailure,
        DatabaseCode::GenericError,
    ];
}

/// Result codes carried in messenger reply envelopes.
///
/// Encoded as an integer on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(into = "i32", try_from = "i32")]
pub enum MessengerCode {
    #[default]
    Ok,
    GenericError,
    MsgJSONParseError,
    NotFound,
    UserError,
}

impl MessengerCode {
    /// Integer value used on the wire.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        match self {
            MessengerCode::Ok => 1,
            MessengerCode::GenericError => -1,
            MessengerCode::MsgJSONParseError => -2,
            MessengerCode::NotFound => -3,
            MessengerCode::UserError => -4,
        }
    }

    /// Short label used for logs and metric labels.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            MessengerCode::Ok => "ok",
            MessengerCode::GenericError => "generic_error",
            MessengerCode::MsgJSONParseError => "msg_json_parse_error",
            MessengerCode::NotFound => "not_found",
            MessengerCode::UserError => "user_error",
        }
    }
}

/// Unknown integer found where a code was expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown result code: {0}")]
pub struct UnknownCode(pub i32);

impl From<MessengerCode> for i32 {
    fn from(code: MessengerCode) -> Self {
        code.as_i32()
    }
}

impl TryFrom<i32> for MessengerCode {
    type Error = UnknownCode;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(MessengerCode::Ok),
            -1 => Ok(MessengerCode::GenericError),
            -2 => Ok(MessengerCode::MsgJSONParseError),
            -3 => Ok(MessengerCode::NotFound),
            -4 => Ok(MessengerCode::UserError),
            other => Err(UnknownCode(other)),
        }
    }
}

impl fmt::Display for MessengerCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<DatabaseCode> for MessengerCode {
    /// Ok maps to Ok, NotFound maps to NotFound, everything else is a
    /// GenericError.
    fn from(code: DatabaseCode) -> Self {
        match code {
            DatabaseCode::Ok => MessengerCode::Ok,
            DatabaseCode::NotFound => MessengerCode::NotFound,
            DatabaseCode::CorruptData
            | DatabaseCode::StorageFailure
            | DatabaseCode::GenericError => MessengerCode::GenericError,
        }
    }
}

/// Result codes carried by durable bus messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(into = "i32", try_from = "i32")]
pub enum BusCode {
    #[default]
    Ok,
    GenericError,
    MsgJSONParseError,
    NotFound,
}

impl From<BusCode> for i32 {
    fn from(code: BusCode) -> Self {
        match code {
            BusCode::Ok => 1,
            BusCode::GenericError => -1,
            BusCode::MsgJSONParseError => -2,
            BusCode::NotFound => -3,
        }
    }
}

impl TryFrom<i32> for BusCode {
    type Error = UnknownCode;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(BusCode::Ok),
            -1 => Ok(BusCode::GenericError),
            -2 => Ok(BusCode::MsgJSONParseError),
            -3 => Ok(BusCode::NotFound),
            other => Err(UnknownCode(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_code_mapping_is_total() {
        for code in DatabaseCode::ALL {
            let mapped = MessengerCode::from(code);
            let expected = match code {
                DatabaseCode::Ok => MessengerCode::Ok,
                DatabaseCode::NotFound => MessengerCode::NotFound,
                _ => MessengerCode::GenericError,
            };
            assert_eq!(mapped, expected, "mapping for {:?}", code);
        }
    }

    #[test]
    fn test_database_code_mapping_is_deterministic() {
        for code in DatabaseCode::ALL {
            assert_eq!(MessengerCode::from(code), MessengerCode::from(code));
        }
    }

    #[test]
    fn test_messenger_code_wire_values() {
        assert_eq!(serde_json::to_string(&MessengerCode::Ok).unwrap(), "1");
        assert_eq!(
            serde_json::to_string(&MessengerCode::MsgJSONParseError).unwrap(),
            "-2"
        );
        let parsed: MessengerCode = serde_json::from_str("-3").unwrap();
        assert_eq!(parsed, MessengerCode::NotFound);
    }

    #[test]
    fn test_unknown_messenger_code_rejected() {
        let result: Result<MessengerCode, _> = serde_json::from_str("42");
        assert!(result.is_err());
        assert_eq!(MessengerCode::try_from(42), Err(UnknownCode(42)));
    }

    #[test]
    fn test_bus_code_default_is_ok() {
        assert_eq!(BusCode::default(), BusCode::Ok);
        assert_eq!(i32::from(BusCode::GenericError), -1);
    }
}
