use std::fmt;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::config::Config;
use crate::models::{PredictionRecord, PredictionResult, StudentProfile};

const PROFILE_PATH: &str = "/api/students/profile";
const HISTORY_PATH: &str = "/api/students/history";
const PREDICT_PATH: &str = "/api/students/predict";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Profile,
    History,
    Predict,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Profile => "profile",
            Operation::History => "history",
            Operation::Predict => "predict",
        };
        f.write_str(name)
    }
}

/// Any failed remote call. Only a response body can carry a server message.
#[derive(Debug, thiserror::Error)]
pub enum FetchFailure {
    #[error("{operation} request failed: {reason}")]
    Transport { operation: Operation, reason: String },

    #[error("{operation} returned HTTP {status}")]
    Status {
        operation: Operation,
        status: u16,
        message: Option<String>,
    },

    #[error("{operation} returned an unreadable body: {reason}")]
    Decode { operation: Operation, reason: String },
}

impl FetchFailure {
    pub fn server_message(&self) -> Option<&str> {
        match self {
            FetchFailure::Status { message, .. } => message.as_deref(),
            FetchFailure::Transport { .. } | FetchFailure::Decode { .. } => None,
        }
    }
}

/// The three calls a dashboard load cycle makes.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    async fn fetch_profile(&self) -> Result<StudentProfile, FetchFailure>;

    /// Newest-first.
    async fn fetch_history(&self) -> Result<Vec<PredictionRecord>, FetchFailure>;

    async fn request_prediction(&self) -> Result<PredictionResult, FetchFailure>;
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Pulls `message` out of an error response body, if it is JSON and has one.
pub fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.message)
}

pub struct HttpClient {
    http: Client,
    base_url: String,
    token: String,
}

impl HttpClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = Client::builder().build()?;
        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request_id = Uuid::new_v4();
        debug!(method = method.as_str(), path, %request_id, "sending request");
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(&self.token)
            .header("X-Request-Id", request_id.to_string())
    }

    async fn send<T: DeserializeOwned>(
        &self,
        operation: Operation,
        request: RequestBuilder,
    ) -> Result<T, FetchFailure> {
        let response = request.send().await.map_err(|e| FetchFailure::Transport {
            operation,
            reason: e.to_string(),
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| FetchFailure::Transport {
            operation,
            reason: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(FetchFailure::Status {
                operation,
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| FetchFailure::Decode {
            operation,
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl RemoteClient for HttpClient {
    async fn fetch_profile(&self) -> Result<StudentProfile, FetchFailure> {
        self.send(Operation::Profile, self.request(Method::GET, PROFILE_PATH))
            .await
    }

    async fn fetch_history(&self) -> Result<Vec<PredictionRecord>, FetchFailure> {
        self.send(Operation::History, self.request(Method::GET, HISTORY_PATH))
            .await
    }

    async fn request_prediction(&self) -> Result<PredictionResult, FetchFailure> {
        self.send(Operation::Predict, self.request(Method::POST, PREDICT_PATH))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_reads_json_body() {
        let body = r#"{"error": "Not Found", "message": "Student profile not found"}"#;
        assert_eq!(
            error_message(body).as_deref(),
            Some("Student profile not found")
        );
    }

    #[test]
    fn error_message_absent_for_other_bodies() {
        assert_eq!(error_message(r#"{"error": "Bad Gateway"}"#), None);
        assert_eq!(error_message("<html>502</html>"), None);
        assert_eq!(error_message(""), None);
    }

    #[test]
    fn only_status_failures_carry_server_message() {
        let status = FetchFailure::Status {
            operation: Operation::Predict,
            status: 503,
            message: Some("ML service unavailable".to_string()),
        };
        let transport = FetchFailure::Transport {
            operation: Operation::Profile,
            reason: "connection refused".to_string(),
        };
        assert_eq!(status.server_message(), Some("ML service unavailable"));
        assert_eq!(transport.server_message(), None);
        assert_eq!(status.to_string(), "predict returned HTTP 503");
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let config = Config {
            api_base_url: "http://localhost:8080/".to_string(),
            token: "token".to_string(),
        };
        let client = HttpClient::new(&config).unwrap();
        assert_eq!(client.base_url, "http://localhost:8080");
    }
}
