//! Shared HTTP plumbing: client construction and error-body decoding.

use crate::config::BackendConfig;
use crate::error::{BackendError, BackendResult};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::error;

pub(crate) const APIKEY_HEADER: &str = "apikey";

pub(crate) fn build_http_client(config: &BackendConfig) -> BackendResult<Client> {
    let builder = Client::builder();

    #[cfg(not(target_arch = "wasm32"))]
    let builder = builder.timeout(config.http_timeout);

    #[cfg(target_arch = "wasm32")]
    let _ = config;

    Ok(builder.build()?)
}

/// Error payloads of both backend services. The row API sends
/// `{code, message, details, hint}`; the auth API sends `{error, error_description}`
/// or `{code, error_code, msg}`.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<serde_json::Value>,
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

impl ErrorBody {
    fn code(&self) -> Option<String> {
        self.error_code.clone().or_else(|| {
            self.code.as_ref().map(|code| match code {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
        })
    }

    fn message(self) -> Option<String> {
        self.message
            .or(self.msg)
            .or(self.error_description)
            .or(self.error)
    }
}

pub(crate) fn parse_error_body(status: u16, text: String) -> BackendError {
    match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => {
            let code = body.code();
            let message = body.message().unwrap_or(text);
            BackendError::api(status, code, message)
        }
        Err(_) => BackendError::api(status, None, text),
    }
}

pub(crate) async fn error_from_response(response: Response) -> BackendError {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();
    error!("Backend request failed with {}: {}", status, text);
    parse_error_body(status, text)
}

/// Decode a successful JSON response, turning error statuses into [`BackendError::Api`].
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> BackendResult<T> {
    if !response.status().is_success() {
        return Err(error_from_response(response).await);
    }
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| BackendError::unexpected(format!("{e}: {text}")))
}

pub(crate) async fn expect_success(response: Response) -> BackendResult<()> {
    if !response.status().is_success() {
        return Err(error_from_response(response).await);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_api_error_body() {
        let err = parse_error_body(
            406,
            r#"{"code":"PGRST116","message":"JSON object requested, multiple (or no) rows returned","details":null,"hint":null}"#.to_string(),
        );
        match err {
            BackendError::Api {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 406);
                assert_eq!(code.as_deref(), Some("PGRST116"));
                assert!(message.starts_with("JSON object requested"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_auth_api_error_bodies() {
        let err = parse_error_body(
            400,
            r#"{"error":"invalid_grant","error_description":"Invalid Refresh Token"}"#.to_string(),
        );
        assert_eq!(err.to_string(), "Backend returned 400: Invalid Refresh Token");

        let err = parse_error_body(
            422,
            r#"{"code":422,"error_code":"validation_failed","msg":"Unsupported provider"}"#
                .to_string(),
        );
        assert!(matches!(
            err,
            BackendError::Api { ref code, ref message, .. }
                if code.as_deref() == Some("validation_failed") && message == "Unsupported provider"
        ));
    }

    #[test]
    fn test_non_json_error_body_is_kept() {
        let err = parse_error_body(502, "Bad Gateway".to_string());
        assert_eq!(err.to_string(), "Backend returned 502: Bad Gateway");
    }
}
