use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebpushNotification {
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebpushConfig {
    pub notification: WebpushNotification,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AndroidNotification {
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AndroidConfig {
    pub notification: AndroidNotification,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApnsFcmOptions {
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApnsConfig {
    pub fcm_options: ApnsFcmOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub token: String,
    pub notification: Notification,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webpush: Option<WebpushConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub android: Option<AndroidConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apns: Option<ApnsConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<BTreeMap<String, String>>,
}

/// Request envelope for `messages:send`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FCMMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validate_only: Option<bool>,
    pub message: Message,
}

/// Google service-account key as downloaded from the cloud console.
#[derive(Clone, Serialize, Deserialize)]
pub struct ServiceAccount {
    pub private_key: String,
    pub client_email: String,
    pub token_uri: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,

    #[serde(rename = "type", default)]
    pub account_type: Option<String>,
    #[serde(default)]
    client_id: Option<String>,
    #[serde(default)]
    auth_uri: Option<String>,
    #[serde(default)]
    auth_provider_x509_cert_url: Option<String>,
    #[serde(default)]
    client_x509_cert_url: Option<String>,
    #[serde(default)]
    universe_domain: Option<String>,
}

impl std::fmt::Debug for ServiceAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccount")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .field("private_key_id", &self.private_key_id)
            .field("project_id", &self.project_id)
            .field("private_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl TryFrom<&[u8]> for ServiceAccount {
    type Error = serde_json::Error;
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        serde_json::from_slice(bytes)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Claims {
    pub(crate) iat: u64,
    pub(crate) exp: u64,
    pub(crate) iss: String,
    pub(crate) aud: String,
    pub(crate) scope: String,
}

/// Token endpoint reply. Error replies deserialize too, just without a token.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct AuthToken {
    #[serde(default)]
    pub(crate) access_token: Option<String>,
    #[serde(default)]
    pub(crate) expires_in: Option<u64>,
    #[serde(default)]
    pub(crate) error: Option<String>,
    #[serde(default)]
    pub(crate) error_description: Option<String>,
}

/// Canonical gRPC status of an API error. FCM's own reason, such as
/// `UNREGISTERED`, is the `errorCode` in [`ErrorDetails`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Cancelled,
    Unknown,
    InvalidArgument,
    DeadlineExceeded,
    NotFound,
    AlreadyExists,
    PermissionDenied,
    ResourceExhausted,
    FailedPrecondition,
    Aborted,
    OutOfRange,
    Unimplemented,
    Internal,
    Unavailable,
    DataLoss,
    Unauthenticated,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldViolation {
    pub field: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetails {
    #[serde(rename = "@type")]
    pub detail_type: String,
    #[serde(default)]
    pub field_violations: Option<Vec<FieldViolation>>,
    #[serde(default)]
    pub error_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FCMInnerError {
    pub code: i32,
    pub message: String,
    pub status: Status,
    #[serde(default)]
    pub details: Vec<ErrorDetails>,
}

/// Error body FCM returns alongside a non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FCMError {
    #[serde(rename = "error")]
    pub inner: FCMInnerError,
}

impl FCMError {
    /// The `errorCode` carried in the details, e.g. `UNREGISTERED`.
    pub fn error_code(&self) -> Option<&str> {
        self.inner
            .details
            .iter()
            .find_map(|d| d.error_code.as_deref())
    }
}

impl std::error::Error for FCMError {}

impl std::fmt::Display for FCMError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.inner.message)
    }
}
