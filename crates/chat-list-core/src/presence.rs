use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::profile::UserId;

const USER_STATUSES_FIELD: &str = "userStatuses";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStatus {
    #[serde(rename = "userId")]
    pub user_id: UserId,
    #[serde(rename = "isOnline")]
    pub is_online: bool,
}

/// Inbound frame on the presence socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenceMessage {
    /// Full replacement of every known user's state.
    Snapshot(Vec<UserStatus>),
    /// Well-formed JSON without a status collection.
    Unrecognized,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PresenceDecodeError {
    #[error("presence frame is not valid json: {0}")]
    InvalidJson(String),
    #[error("presence snapshot has an invalid status list: {0}")]
    InvalidSnapshot(String),
    #[error("presence frame is not valid utf-8: {0}")]
    InvalidEncoding(String),
}

/// Decodes a binary frame; bytes that are not UTF-8 are a parse failure.
pub fn decode_presence_frame(bytes: &[u8]) -> Result<PresenceMessage, PresenceDecodeError> {
    let raw = std::str::from_utf8(bytes)
        .map_err(|error| PresenceDecodeError::InvalidEncoding(error.to_string()))?;
    decode_presence_message(raw)
}

pub fn decode_presence_message(raw: &str) -> Result<PresenceMessage, PresenceDecodeError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|error| PresenceDecodeError::InvalidJson(error.to_string()))?;

    let Some(statuses) = value.get(USER_STATUSES_FIELD) else {
        return Ok(PresenceMessage::Unrecognized);
    };
    if !is_truthy(statuses) {
        return Ok(PresenceMessage::Unrecognized);
    }

    let statuses = Vec::<UserStatus>::deserialize(statuses)
        .map_err(|error| PresenceDecodeError::InvalidSnapshot(error.to_string()))?;
    Ok(PresenceMessage::Snapshot(statuses))
}

// Null, false, zero and empty strings carry no snapshot; an empty array does.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Online state per user, replaced wholesale by each snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresenceLookup {
    statuses: HashMap<UserId, bool>,
}

impl PresenceLookup {
    pub fn replace(&mut self, statuses: &[UserStatus]) {
        self.statuses.clear();
        for status in statuses {
            self.statuses.insert(status.user_id, status.is_online);
        }
    }

    pub fn is_online(&self, user_id: UserId) -> bool {
        self.statuses.get(&user_id).copied().unwrap_or(false)
    }

    pub fn online_ids(&self) -> Vec<UserId> {
        let mut ids = self
            .statuses
            .iter()
            .filter_map(|(id, online)| online.then_some(*id))
            .collect::<Vec<_>>();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }
}
