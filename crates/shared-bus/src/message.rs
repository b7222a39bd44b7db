//! # Envelopes
//!
//! Every request, reply and acknowledgement is wrapped in an envelope of the
//! form `{data, error, code}`. An empty error string means success.

use serde::{Deserialize, Serialize};
use shared_types::{BusCode, MessengerCode};

/// Messenger reply envelope.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Message {
    /// Opaque encoded payload.
    #[serde(default)]
    pub data: String,
    /// Empty on success.
    #[serde(default, rename = "error")]
    pub err: String,
    pub code: MessengerCode,
}

impl Message {
    /// An empty success envelope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_data(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn failure(code: MessengerCode, err: impl Into<String>) -> Self {
        Self {
            data: String::new(),
            err: err.into(),
            code,
        }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code == MessengerCode::Ok && self.err.is_empty()
    }

    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn decode(data: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(data)
    }
}

/// Durable bus message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BusMessage {
    /// Assigned by the bus on publish.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub data: String,
    #[serde(default, rename = "error")]
    pub err: String,
    pub code: BusCode,
    /// Topic a reply or acknowledgement should be published to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

impl BusMessage {
    /// An empty success envelope, used as a plain acknowledgement.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_data(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn failure(code: BusCode, err: impl Into<String>) -> Self {
        Self {
            err: err.into(),
            code,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code == BusCode::Ok && self.err.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_message_is_success() {
        let m = Message::new();
        assert!(m.is_ok());
        assert!(m.data.is_empty());
    }

    #[test]
    fn test_message_wire_shape() {
        let m = Message::failure(MessengerCode::NotFound, "region not found");
        let json: serde_json::Value = serde_json::from_slice(&m.encode().unwrap()).unwrap();
        assert_eq!(json["code"], -3);
        assert_eq!(json["error"], "region not found");

        let back = Message::decode(&m.encode().unwrap()).unwrap();
        assert_eq!(back, m);
        assert!(!back.is_ok());
    }

    #[test]
    fn test_bus_failure_envelope() {
        let m = BusMessage::failure(BusCode::GenericError, "bad payload");
        assert!(!m.is_ok());
        assert!(m.reply_to.is_none());
    }
}
