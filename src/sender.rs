use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::SenderConfig;
use crate::error::{Result, SendError};
use crate::google::{CredentialProvider, Credentials, FCMError, send_message};
use crate::payload::{IconResolver, NotificationRequest, build_message};

/// Sends single notifications through the FCM v1 API.
///
/// The credential is resolved once at construction. Each send fetches a new
/// access token, builds the message and posts it; nothing is retried.
#[derive(Debug)]
pub struct FcmSender {
    config: SenderConfig,
    credentials: Credentials,
    icons: IconResolver,
    /// Key fetch and token exchange. Always verifies TLS.
    google_http: reqwest::Client,
    /// The `messages:send` post, honours `danger_accept_invalid_certs`.
    fcm_http: reqwest::Client,
}

/// What FCM answered. An FCM-level failure still lands here; see
/// [`SendResponse::fcm_error`].
#[derive(Debug, Clone)]
pub struct SendResponse {
    pub status: reqwest::StatusCode,
    /// Parsed response body, `Null` if it was not JSON.
    pub body: Value,
}

impl SendResponse {
    pub fn fcm_error(&self) -> Option<FCMError> {
        self.body
            .get("error")
            .and_then(|_| serde_json::from_value(self.body.clone()).ok())
    }

    /// Resource name FCM assigned, `projects/*/messages/*`.
    pub fn message_name(&self) -> Option<&str> {
        self.body.get("name").and_then(Value::as_str)
    }

    fn reply(&self) -> Reply {
        if self.status.is_success() {
            return Reply::Accepted;
        }
        match self.fcm_error() {
            Some(err) => Reply::Rejected(err),
            None => Reply::Unexpected,
        }
    }
}

#[derive(Debug)]
enum Reply {
    Accepted,
    Rejected(FCMError),
    Unexpected,
}

/// Flattened outcome: `{"success": true, "response": ..}` or
/// `{"success": false, "error": ".."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SendResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Result<SendResponse>> for SendResult {
    fn from(result: Result<SendResponse>) -> Self {
        match result {
            Ok(res) => SendResult {
                success: true,
                response: Some(res.body),
                error: None,
            },
            Err(e) => SendResult {
                success: false,
                response: None,
                error: Some(e.to_string()),
            },
        }
    }
}

impl FcmSender {
    pub async fn new(config: SenderConfig, provider: &dyn CredentialProvider) -> Result<Self> {
        let google_http = build_client(google_client_builder())?;
        let service_account = provider.service_account(&google_http).await?;
        let credentials = Credentials::from_service_account(service_account)?;
        debug!(
            project_id = config.project_id,
            client_email = credentials.client_email(),
            "fcm sender ready"
        );

        Self::from_parts(config, credentials, google_http)
    }

    /// Builds a sender around already loaded credentials.
    pub fn with_credentials(config: SenderConfig, credentials: Credentials) -> Result<Self> {
        let google_http = build_client(google_client_builder())?;
        Self::from_parts(config, credentials, google_http)
    }

    fn from_parts(
        config: SenderConfig,
        credentials: Credentials,
        google_http: reqwest::Client,
    ) -> Result<Self> {
        if let Some(key_project) = credentials.project_id() {
            if key_project != config.project_id {
                warn!(
                    key_project,
                    project_id = config.project_id,
                    "service account belongs to a different project"
                );
            }
        }

        let fcm_http = build_client(fcm_client_builder(&config))?;
        let icons = IconResolver::new(config.asset_base_url.clone());
        Ok(Self {
            config,
            credentials,
            icons,
            google_http,
            fcm_http,
        })
    }

    pub fn config(&self) -> &SenderConfig {
        &self.config
    }

    pub async fn send_fcm(&self, req: &NotificationRequest) -> Result<SendResponse> {
        let token = self.credentials.access_token(&self.google_http).await?;
        let mut msg = build_message(req, &self.icons)?;
        msg.validate_only = self.config.validate_only.then_some(true);
        let (status, text) =
            send_message(&self.fcm_http, &self.config.send_url(), &token, &msg).await?;

        let body = serde_json::from_str(&text).unwrap_or_else(|e| {
            warn!(%status, error = %e, "fcm response body is not json");
            Value::Null
        });
        let res = SendResponse { status, body };

        match res.reply() {
            Reply::Accepted => info!(%status, name = res.message_name(), "fcm accepted message"),
            Reply::Rejected(err) => info!(
                %status,
                device_token = req.device_token,
                error_code = err.error_code(),
                "fcm rejected message: {}",
                err
            ),
            Reply::Unexpected => warn!(
                %status,
                device_token = req.device_token,
                "fcm returned an unexpected reply"
            ),
        }
        Ok(res)
    }

    /// Convenience wrapper returning the flattened [`SendResult`].
    pub async fn send(
        &self,
        device_token: &str,
        title: &str,
        body: &str,
        icon: Option<&str>,
        data: Option<Value>,
    ) -> SendResult {
        let req = NotificationRequest {
            device_token: device_token.to_string(),
            title: title.to_string(),
            body: body.to_string(),
            icon: icon.map(str::to_string),
            data,
        };
        self.send_fcm(&req).await.into()
    }
}

fn google_client_builder() -> reqwest::ClientBuilder {
    reqwest::Client::builder()
}

fn fcm_client_builder(config: &SenderConfig) -> reqwest::ClientBuilder {
    if config.danger_accept_invalid_certs {
        warn!("TLS certificate verification is disabled for FCM send requests");
    }

    reqwest::Client::builder().danger_accept_invalid_certs(config.danger_accept_invalid_certs)
}

fn build_client(builder: reqwest::ClientBuilder) -> Result<reqwest::Client> {
    builder
        .build()
        .map_err(|e| SendError::Transport(e.to_string()))
}
