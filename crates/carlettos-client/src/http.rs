//! HTTP client for the Carlettos API
//!
//! One typed method per route. Path parameters are percent-encoded segment by
//! segment, so titles and voter ids may contain any character.

use std::time::Duration;

use carlettos_chess::Board;
use carlettos_common::{AffectedRows, LeaderboardEntry, Task, Votes};
use reqwest::{Client, Method, Response, Url};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::error::{ClientError, Result};

/// Environment variable holding the API base URL
pub const API_IP_ENV: &str = "API_IP";

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Configuration for the API client
#[derive(Clone, Debug)]
pub struct ApiClientConfig {
    /// Base URL of the API process, e.g. `http://127.0.0.1:8000`
    pub base_url: String,
    /// Connection timeout in milliseconds
    pub connect_timeout_ms: u64,
    /// Read timeout in milliseconds
    pub read_timeout_ms: u64,
    /// Context path (e.g., "/api")
    pub context_path: String,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout_ms: 5000,
            read_timeout_ms: 30000,
            context_path: String::new(),
        }
    }
}

impl ApiClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Default::default()
        }
    }

    /// Read the base URL from `API_IP`, falling back to the local default
    pub fn from_env() -> Self {
        match std::env::var(API_IP_ENV) {
            Ok(base_url) if !base_url.is_empty() => Self::new(&base_url),
            _ => Self::default(),
        }
    }

    pub fn with_timeouts(mut self, connect_ms: u64, read_ms: u64) -> Self {
        self.connect_timeout_ms = connect_ms;
        self.read_timeout_ms = read_ms;
        self
    }

    pub fn with_context_path(mut self, path: &str) -> Self {
        self.context_path = path.to_string();
        self
    }
}

/// Error body sent by the server
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    code: i32,
    message: String,
}

pub struct CarlettosApiClient {
    client: Client,
    config: ApiClientConfig,
}

impl CarlettosApiClient {
    pub fn new(config: ApiClientConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(Duration::from_millis(config.read_timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ApiClientConfig {
        &self.config
    }

    /// Build the full URL from the base URL, the context path and the
    /// given path segments
    fn build_url(&self, segments: &[&str]) -> Result<Url> {
        let base = &self.config.base_url;
        let mut url =
            Url::parse(base).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base, e)))?;
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ClientError::InvalidUrl(base.clone()))?;
            path.pop_if_empty();
            path.extend(self.config.context_path.split('/').filter(|s| !s.is_empty()));
            path.extend(segments);
        }
        Ok(url)
    }

    async fn send<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<T> {
        let url = self.build_url(segments)?;
        debug!("{} {}", method, url);

        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let text = response.text().await.unwrap_or_default();
        let (code, message) = match serde_json::from_str::<ErrorEnvelope>(&text) {
            Ok(envelope) => (envelope.code, envelope.message),
            Err(_) => (-1, text),
        };
        warn!(status = status.as_u16(), code, "request failed: {}", message);
        Err(ClientError::ServerError {
            status: status.as_u16(),
            code,
            message,
        })
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        self.send::<T, ()>(Method::GET, segments, None).await
    }

    // ==================== Chess ====================

    pub async fn get_chess_game(&self) -> Result<Board> {
        self.get(&["chess"]).await
    }

    /// Replace the shared board, returning what the server stored
    pub async fn update_chess_game(&self, board: &Board) -> Result<Board> {
        self.send(Method::PATCH, &["chess"], Some(board)).await
    }

    // ==================== Tasks ====================

    pub async fn fetch_tasks(&self) -> Result<Vec<Task>> {
        self.get(&["tasks"]).await
    }

    pub async fn get_task(&self, id: &str) -> Result<Task> {
        self.get(&["task", id]).await
    }

    pub async fn create_task(&self, title: &str) -> Result<Task> {
        self.send::<_, ()>(Method::POST, &["task", title], None).await
    }

    pub async fn toggle_task(&self, id: &str) -> Result<AffectedRows> {
        self.send::<_, ()>(Method::PATCH, &["task", id], None).await
    }

    pub async fn delete_task(&self, id: &str) -> Result<AffectedRows> {
        self.send::<_, ()>(Method::DELETE, &["task", id], None).await
    }

    // ==================== Votes ====================

    pub async fn get_votes(&self, id: &str) -> Result<Votes> {
        self.get(&["votes", id]).await
    }

    pub async fn add_vote(&self, id: &str, vote_id: usize) -> Result<Votes> {
        let vote_id = vote_id.to_string();
        self.send::<_, ()>(Method::PATCH, &["votes", "add", id, vote_id.as_str()], None)
            .await
    }

    pub async fn remove_vote(&self, id: &str, vote_id: usize) -> Result<Votes> {
        let vote_id = vote_id.to_string();
        self.send::<_, ()>(Method::PATCH, &["votes", "remove", id, vote_id.as_str()], None)
            .await
    }

    // ==================== 2048 Leaderboard ====================

    pub async fn get_highscores(&self) -> Result<Vec<LeaderboardEntry>> {
        self.get(&["c2048", "highscores"]).await
    }

    pub async fn add_highscore(&self, entry: &LeaderboardEntry) -> Result<LeaderboardEntry> {
        let score = entry.score.to_string();
        let max_tile = entry.max_tile.to_string();
        let min_energy = entry.min_energy.to_string();
        let max_energy = entry.max_energy.to_string();
        self.send::<_, ()>(
            Method::POST,
            &[
                "c2048",
                "highscores",
                entry.name.as_str(),
                score.as_str(),
                max_tile.as_str(),
                min_energy.as_str(),
                max_energy.as_str(),
            ],
            None,
        )
        .await
    }
}
