use std::fmt;
use std::path::{Path, PathBuf};

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

const API_PREFIX: &str = "/api/2.0";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("api returned {status}: {message}")]
    Api {
        status: StatusCode,
        error_code: Option<ErrorCode>,
        message: String,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid base64 content: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("{} already exists. Pass --overwrite to replace it.", .0.display())]
    LocalFileExists(PathBuf),
}

/// Error codes the REST API reports in the `error_code` field of a failed response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    ResourceDoesNotExist,
    ResourceAlreadyExists,
    InvalidParameterValue,
    Other(String),
}

impl ErrorCode {
    pub fn parse(code: &str) -> Self {
        match code {
            "RESOURCE_DOES_NOT_EXIST" => ErrorCode::ResourceDoesNotExist,
            "RESOURCE_ALREADY_EXISTS" => ErrorCode::ResourceAlreadyExists,
            "INVALID_PARAMETER_VALUE" => ErrorCode::InvalidParameterValue,
            other => ErrorCode::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ErrorCode::ResourceDoesNotExist => "RESOURCE_DOES_NOT_EXIST",
            ErrorCode::ResourceAlreadyExists => "RESOURCE_ALREADY_EXISTS",
            ErrorCode::InvalidParameterValue => "INVALID_PARAMETER_VALUE",
            ErrorCode::Other(code) => code,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ApiError {
    pub fn error_code(&self) -> Option<&ErrorCode> {
        match self {
            ApiError::Api { error_code, .. } => error_code.as_ref(),
            _ => None,
        }
    }

    pub fn is_resource_does_not_exist(&self) -> bool {
        matches!(self.error_code(), Some(ErrorCode::ResourceDoesNotExist))
    }
}

/// Authenticated transport shared by the DBFS and Workspace clients.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    token: String,
}

impl ApiClient {
    pub fn new(host: &str, token: impl Into<String>) -> Result<Self, ApiError> {
        Ok(Self {
            http: Client::new(),
            base_url: Url::parse(host)?,
            token: token.into(),
        })
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let mut url = self.endpoint(path)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        tracing::debug!(%url, "GET");
        let response = self
            .http
            .get(url)
            .header("Authorization", self.auth_header_value())
            .send()
            .await?;
        Self::handle_response(response).await
    }

    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        tracing::debug!(%url, "POST");
        let response = self
            .http
            .post(url)
            .header("Authorization", self.auth_header_value())
            .json(body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    fn auth_header_value(&self) -> String {
        format!("Bearer {}", self.token)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(&format!("{API_PREFIX}{path}"))?)
    }

    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        if response.status().is_success() {
            Ok(response.json::<T>().await?)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(api_error(status, &body))
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Acknowledgement body of endpoints that answer `{}`.
#[derive(Debug, Deserialize)]
pub(crate) struct Empty {}

fn api_error(status: StatusCode, body: &str) -> ApiError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => ApiError::Api {
            status,
            error_code: parsed.error_code.as_deref().map(ErrorCode::parse),
            message: parsed.message.unwrap_or_else(|| body.to_string()),
        },
        Err(_) => ApiError::Api {
            status,
            error_code: None,
            message: body.to_string(),
        },
    }
}

pub(crate) async fn ensure_writable(target: &Path, overwrite: bool) -> Result<(), ApiError> {
    if !overwrite && tokio::fs::try_exists(target).await? {
        return Err(ApiError::LocalFileExists(target.to_path_buf()));
    }
    Ok(())
}

pub(crate) fn partial_path(target: &Path) -> PathBuf {
    target.with_extension(format!(
        "{}partial",
        target
            .extension()
            .map(|ext| format!("{}.", ext.to_string_lossy()))
            .unwrap_or_default()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_error_code_from_json_body() {
        let err = api_error(
            StatusCode::NOT_FOUND,
            r#"{"error_code":"RESOURCE_DOES_NOT_EXIST","message":"No file or directory exists on path /apple."}"#,
        );
        assert!(err.is_resource_does_not_exist());
        assert_eq!(
            err.to_string(),
            "api returned 404 Not Found: No file or directory exists on path /apple."
        );
    }

    #[test]
    fn keeps_unknown_error_codes() {
        let err = api_error(
            StatusCode::BAD_REQUEST,
            r#"{"error_code":"MAX_BLOCK_SIZE_EXCEEDED","message":"too big"}"#,
        );
        assert_eq!(
            err.error_code(),
            Some(&ErrorCode::Other("MAX_BLOCK_SIZE_EXCEEDED".to_string()))
        );
        assert!(!err.is_resource_does_not_exist());
    }

    #[test]
    fn non_json_body_has_no_error_code() {
        let err = api_error(StatusCode::BAD_GATEWAY, "upstream down");
        assert!(err.error_code().is_none());
        assert!(err.to_string().contains("upstream down"));
    }

    #[test]
    fn partial_path_keeps_original_extension() {
        assert_eq!(
            partial_path(Path::new("/tmp/a/b.scala")),
            PathBuf::from("/tmp/a/b.scala.partial")
        );
        assert_eq!(
            partial_path(Path::new("/tmp/a/data")),
            PathBuf::from("/tmp/a/data.partial")
        );
    }
}
