use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONTAINER_ID: &str = "chat-list";
pub const DEFAULT_PRESENCE_PATH: &str = "/profile/statuses";
pub const DEFAULT_CHAT_ROUTE_PREFIX: &str = "/lounge";
pub const DEFAULT_FRIENDS_PATH: &str = "/profile/friends";
pub const DEFAULT_PROFILE_PATH: &str = "/profile/users/{id}";
pub const DEFAULT_EMPTY_STATE_MESSAGE: &str = "No friends found.";
pub const DEFAULT_FAILURE_MESSAGE: &str =
    "The club\u{2019}s lights are out at the moment. Try again shortly.";
pub const DEFAULT_TOAST_DURATION_MS: u32 = 4_000;
pub const PROFILE_ID_PLACEHOLDER: &str = "{id}";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("config json is invalid: {0}")]
    InvalidJson(String),
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    #[error("{field} must start with '/' (got {value:?})")]
    NotAbsolutePath { field: &'static str, value: String },
    #[error("profile_path must contain the {{id}} placeholder")]
    MissingIdPlaceholder,
    #[error("host must not be empty")]
    EmptyHost,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatListConfig {
    pub container_id: String,
    pub presence_path: String,
    pub chat_route_prefix: String,
    pub friends_path: String,
    pub profile_path: String,
    pub empty_state_message: String,
    pub failure_message: String,
    pub toast_duration_ms: u32,
}

impl Default for ChatListConfig {
    fn default() -> Self {
        Self {
            container_id: DEFAULT_CONTAINER_ID.to_string(),
            presence_path: DEFAULT_PRESENCE_PATH.to_string(),
            chat_route_prefix: DEFAULT_CHAT_ROUTE_PREFIX.to_string(),
            friends_path: DEFAULT_FRIENDS_PATH.to_string(),
            profile_path: DEFAULT_PROFILE_PATH.to_string(),
            empty_state_message: DEFAULT_EMPTY_STATE_MESSAGE.to_string(),
            failure_message: DEFAULT_FAILURE_MESSAGE.to_string(),
            toast_duration_ms: DEFAULT_TOAST_DURATION_MS,
        }
    }
}

impl ChatListConfig {
    /// Parses a partial override; missing fields keep their defaults.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|error| ConfigError::InvalidJson(error.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.container_id.trim().is_empty() {
            return Err(ConfigError::Empty {
                field: "container_id",
            });
        }
        require_absolute_path("presence_path", &self.presence_path)?;
        require_absolute_path("chat_route_prefix", &self.chat_route_prefix)?;
        require_absolute_path("friends_path", &self.friends_path)?;
        require_absolute_path("profile_path", &self.profile_path)?;
        if !self.profile_path.contains(PROFILE_ID_PLACEHOLDER) {
            return Err(ConfigError::MissingIdPlaceholder);
        }
        if self.empty_state_message.trim().is_empty() {
            return Err(ConfigError::Empty {
                field: "empty_state_message",
            });
        }
        if self.failure_message.trim().is_empty() {
            return Err(ConfigError::Empty {
                field: "failure_message",
            });
        }
        Ok(())
    }

    pub fn presence_url(&self, host: &str) -> Result<String, ConfigError> {
        let host = host.trim().trim_end_matches('/');
        if host.is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        Ok(format!("wss://{host}{}", self.presence_path))
    }

    pub fn profile_url(&self, user_id: u64) -> String {
        self.profile_path
            .replace(PROFILE_ID_PLACEHOLDER, &user_id.to_string())
    }

    pub fn chat_route(&self, chat_id: u64) -> String {
        format!(
            "{}/{chat_id}",
            self.chat_route_prefix.trim_end_matches('/')
        )
    }
}

fn require_absolute_path(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Empty { field });
    }
    if !value.starts_with('/') {
        return Err(ConfigError::NotAbsolutePath {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(ChatListConfig::default().validate(), Ok(()));
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let config = ChatListConfig::from_json(r#"{"container_id":"friends"}"#)
            .expect("valid override");
        assert_eq!(config.container_id, "friends");
        assert_eq!(config.presence_path, DEFAULT_PRESENCE_PATH);
        assert_eq!(config.chat_route_prefix, DEFAULT_CHAT_ROUTE_PREFIX);
    }

    #[test]
    fn from_json_rejects_malformed_input() {
        let error = ChatListConfig::from_json("{").expect_err("expected invalid json");
        assert!(matches!(error, ConfigError::InvalidJson(_)));
    }

    #[test]
    fn validate_requires_id_placeholder_in_profile_path() {
        let config = ChatListConfig {
            profile_path: "/profile/users".to_string(),
            ..ChatListConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::MissingIdPlaceholder));
    }

    #[test]
    fn validate_rejects_relative_paths() {
        let config = ChatListConfig {
            presence_path: "profile/statuses".to_string(),
            ..ChatListConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotAbsolutePath {
                field: "presence_path",
                ..
            })
        ));
    }

    #[test]
    fn presence_url_is_always_secure() {
        let config = ChatListConfig::default();
        let url = config.presence_url("pong.example:8443").expect("host present");
        assert_eq!(url, "wss://pong.example:8443/profile/statuses");
    }

    #[test]
    fn presence_url_requires_host() {
        let config = ChatListConfig::default();
        assert_eq!(config.presence_url("  "), Err(ConfigError::EmptyHost));
    }

    #[test]
    fn routes_and_profile_urls_interpolate_ids() {
        let config = ChatListConfig::default();
        assert_eq!(config.chat_route(42), "/lounge/42");
        assert_eq!(config.profile_url(7), "/profile/users/7");
    }
}
