use super::*;

pub(super) struct HttpFriendDirectory {
    config: ChatListConfig,
}

impl HttpFriendDirectory {
    pub(super) fn new(config: ChatListConfig) -> Self {
        Self { config }
    }
}

#[async_trait::async_trait(?Send)]
impl FriendDirectory for HttpFriendDirectory {
    async fn friend_ids(&self) -> Result<Vec<UserId>, DirectoryError> {
        let (status, raw) = get_text(&self.config.friends_path).await?;
        ensure_success(status, &raw)?;
        decode_friend_ids(&raw).map_err(|error| {
            DirectoryError::decode(status, format!("failed to decode friend list: {error}"))
        })
    }

    async fn profile(&self, user_id: UserId) -> Result<Option<Profile>, DirectoryError> {
        let (status, raw) = get_text(&self.config.profile_url(user_id)).await?;
        if status == 404 {
            debug!(user_id, "friend profile not found");
            return Ok(None);
        }
        ensure_success(status, &raw)?;
        decode_profile(&raw).map_err(|error| {
            DirectoryError::decode(status, format!("failed to decode profile {user_id}: {error}"))
        })
    }
}

async fn get_text(path: &str) -> Result<(u16, String), DirectoryError> {
    let response = Request::get(path)
        .header("accept", "application/json")
        .send()
        .await
        .map_err(map_network_error)?;
    let status = response.status();
    let raw = response.text().await.map_err(|error| DirectoryError {
        status_code: status,
        code: Some("response_read_failed".to_string()),
        message: error.to_string(),
    })?;
    Ok((status, raw))
}

#[derive(Debug, serde::Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

fn ensure_success(status: u16, raw: &str) -> Result<(), DirectoryError> {
    if (200..=299).contains(&status) {
        return Ok(());
    }
    let parsed: Option<ApiErrorBody> = serde_json::from_str(raw).ok();
    let code = parsed
        .as_ref()
        .and_then(|body| body.code.clone())
        .or_else(|| Some("request_failed".to_string()));
    let message = parsed
        .and_then(|body| body.message)
        .unwrap_or_else(|| format!("request failed with status {status}"));
    Err(DirectoryError {
        status_code: status,
        code,
        message,
    })
}

fn map_network_error(error: gloo_net::Error) -> DirectoryError {
    DirectoryError::network(error.to_string())
}
