use chat_list_core::{ChatListSnapshot, Profile, UserId};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum FriendIdsPayload {
    Bare(Vec<UserId>),
    Wrapped { friends: Vec<UserId> },
}

/// Accepts either `[1, 2]` or `{ "friends": [1, 2] }`.
pub(crate) fn decode_friend_ids(raw: &str) -> Result<Vec<UserId>, serde_json::Error> {
    let payload: FriendIdsPayload = serde_json::from_str(raw)?;
    Ok(match payload {
        FriendIdsPayload::Bare(ids) | FriendIdsPayload::Wrapped { friends: ids } => ids,
    })
}

/// `null` decodes to no profile.
pub(crate) fn decode_profile(raw: &str) -> Result<Option<Profile>, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Diagnostics export: the view snapshot, or `null` while nothing is mounted.
pub(crate) fn state_json(snapshot: Option<&ChatListSnapshot>) -> String {
    snapshot
        .and_then(|snapshot| serde_json::to_string(snapshot).ok())
        .unwrap_or_else(|| "null".to_string())
}
