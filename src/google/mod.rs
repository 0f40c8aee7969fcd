mod credentials;
pub use credentials::{Credentials, FIREBASE_MESSAGING_SCOPE};
mod source;
pub use source::{CredentialProvider, LocalFileCredentials, RemoteCredentials, from_locator};
mod types;
use tracing::debug;
pub use types::*;

use crate::error::{Result, SendError};

/// Posts one message to the FCM v1 send endpoint.
///
/// Returns the status and raw body whatever the status is; FCM errors are
/// reported in the body and left for the caller to inspect.
pub async fn send_message(
    http: &reqwest::Client,
    url: &str,
    token: &str,
    msg: &FCMMessage,
) -> Result<(reqwest::StatusCode, String)> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::CONTENT_TYPE,
        reqwest::header::HeaderValue::from_static("application/json"),
    );
    headers.insert(
        reqwest::header::AUTHORIZATION,
        reqwest::header::HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| SendError::Transport(format!("invalid bearer token: {e}")))?,
    );

    debug!(device_token = msg.message.token, url, "sending fcm message");
    let body = serde_json::to_string(msg)?;
    let res = http
        .post(url)
        .headers(headers)
        .body(body)
        .send()
        .await
        .map_err(|e| SendError::Transport(e.to_string()))?;

    let status = res.status();
    let text = res
        .text()
        .await
        .map_err(|e| SendError::Transport(e.to_string()))?;

    debug!(%status, "fcm responded");
    Ok((status, text))
}
