//! Thin authenticated client for the Trello REST API.
//!
//! Trello authenticates read requests with `key` and `token` query
//! parameters; no header auth, no OAuth dance. The client is read-only.

use eyre::{Context, Result, eyre};
use serde::de::DeserializeOwned;

use crate::models::{Action, Board};
use crate::windows::Window;

const TRELLO_API_BASE: &str = "https://api.trello.com/1";

/// Maximum records one actions request may return; Trello's page cap.
const PAGE_LIMIT: &str = "1000";

#[derive(Debug, Clone)]
pub struct TrelloClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    api_token: String,
}

impl TrelloClient {
    pub fn new(api_key: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self::with_base_url(TRELLO_API_BASE, api_key, api_token)
    }

    /// Point the client at a different API root. Tests use this to target a
    /// local mock server.
    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            api_token: api_token.into(),
        }
    }

    /// All actions recorded on a board within `window`, capped at one page.
    pub async fn board_actions(&self, board_id: &str, window: &Window) -> Result<Vec<Action>> {
        use chrono::SecondsFormat;

        let before = window.before.to_rfc3339_opts(SecondsFormat::Millis, true);
        let since = window.since.to_rfc3339_opts(SecondsFormat::Millis, true);
        self.get(
            &format!("/boards/{board_id}/actions"),
            &[
                ("limit", PAGE_LIMIT),
                ("before", &before),
                ("since", &since),
            ],
        )
        .await
    }

    /// The full snapshot of a board: cards, lists, members, labels,
    /// checklists.
    pub async fn board_snapshot(&self, board_id: &str) -> Result<Board> {
        self.get(
            &format!("/boards/{board_id}"),
            &[
                ("cards", "all"),
                ("lists", "all"),
                ("members", "all"),
                ("member_fields", "all"),
                ("checklists", "all"),
                ("fields", "all"),
            ],
        )
        .await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, &str)]) -> Result<T> {
        let mut query: Vec<(&str, &str)> = vec![
            ("key", self.api_key.as_str()),
            ("token", self.api_token.as_str()),
        ];
        query.extend_from_slice(params);

        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await
            .wrap_err_with(|| format!("Request failed: GET {url}"))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .wrap_err_with(|| format!("Failed to read response body: GET {url}"))?;

        if !status.is_success() {
            return Err(eyre!("Trello API error ({status}) for GET {url}: {body}"));
        }

        serde_json::from_str(&body).wrap_err_with(|| format!("Failed to parse response: GET {url}"))
    }
}
