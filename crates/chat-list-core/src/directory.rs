use async_trait::async_trait;
use futures::future::try_join_all;
use thiserror::Error;

use crate::profile::{Profile, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (status {status_code})")]
pub struct DirectoryError {
    pub status_code: u16,
    pub code: Option<String>,
    pub message: String,
}

impl DirectoryError {
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            status_code: 0,
            code: Some("network_error".to_string()),
            message: message.into(),
        }
    }

    pub fn decode(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            code: Some("decode_failed".to_string()),
            message: message.into(),
        }
    }
}

/// Source of the current user's friends and their profiles.
#[async_trait(?Send)]
pub trait FriendDirectory {
    async fn friend_ids(&self) -> Result<Vec<UserId>, DirectoryError>;

    /// `Ok(None)` when the service has no profile for `user_id`.
    async fn profile(&self, user_id: UserId) -> Result<Option<Profile>, DirectoryError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FriendList {
    Empty,
    /// One slot per friend id, in friend-list order.
    Profiles(Vec<Option<Profile>>),
}

/// Fetches the friend ids, then resolves every profile concurrently.
pub async fn load_friend_list(directory: &dyn FriendDirectory) -> Result<FriendList, DirectoryError> {
    let friend_ids = directory.friend_ids().await?;
    if friend_ids.is_empty() {
        return Ok(FriendList::Empty);
    }

    let profiles = try_join_all(friend_ids.iter().map(|id| directory.profile(*id))).await?;
    Ok(FriendList::Profiles(profiles))
}
