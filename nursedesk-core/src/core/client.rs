//! Blocking HTTP client for the nursedesk REST API.

use crate::{NurseFields, NurseRecord};
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-success status; `message` is its
    /// `error` text, verbatim.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The server could not be reached or the response could not be read.
    #[error("{0}")]
    Transport(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(_) => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value.to_string())
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Thin wrapper over the five nurse endpoints. No retries are attempted.
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/nurses{}", self.base_url, path)
    }

    pub fn list(&self) -> ClientResult<Vec<NurseRecord>> {
        let response = self.http.get(self.url("")).send()?;
        read_json(response)
    }

    pub fn get(&self, id: i64) -> ClientResult<NurseRecord> {
        let response = self.http.get(self.url(&format!("/{id}"))).send()?;
        read_json(response)
    }

    pub fn create(&self, fields: &NurseFields) -> ClientResult<NurseRecord> {
        let response = self.http.post(self.url("")).json(fields).send()?;
        read_json(response)
    }

    pub fn update(&self, id: i64, fields: &NurseFields) -> ClientResult<NurseRecord> {
        let response = self
            .http
            .put(self.url(&format!("/{id}")))
            .json(fields)
            .send()?;
        read_json(response)
    }

    pub fn delete(&self, id: i64) -> ClientResult<()> {
        let response = self.http.delete(self.url(&format!("/{id}"))).send()?;
        check_status(response).map(|_| ())
    }
}

fn read_json<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    Ok(check_status(response)?.json()?)
}

fn check_status(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().unwrap_or_default();
    Err(ClientError::Api {
        status: status.as_u16(),
        message: error_message(status, &text),
    })
}

fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_server_text() {
        let msg = error_message(
            StatusCode::BAD_REQUEST,
            r#"{"error":"License number already exists"}"#,
        );
        assert_eq!(msg, "License number already exists");
    }

    #[test]
    fn test_error_message_falls_back_to_reason() {
        assert_eq!(error_message(StatusCode::NOT_FOUND, "<html>"), "Not Found");
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:3000/");
        assert_eq!(client.url("/4"), "http://localhost:3000/api/nurses/4");
    }

    #[test]
    fn test_unreachable_server_is_transport_error() {
        // Port 9 (discard) on loopback is not expected to accept HTTP.
        let client = ApiClient::new("http://127.0.0.1:9");
        let err = client.list().unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
        assert_eq!(err.status(), None);
    }
}
