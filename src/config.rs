use clap::Args;

pub const DEFAULT_PROJECT_ID: &str = "default-project-id";
pub const DEFAULT_FCM_ENDPOINT: &str = "https://fcm.googleapis.com";

/// Everything the sender needs besides the credential itself.
#[derive(Clone, Debug, Args)]
pub struct SenderConfig {
    /// Firebase project that owns the target devices
    #[arg(long, env = "FIREBASE_PROJECT_ID", default_value = DEFAULT_PROJECT_ID)]
    pub project_id: String,

    /// Base URL that relative icon paths are resolved against
    #[arg(long, env = "FIREBASE_ASSET_BASE_URL")]
    pub asset_base_url: Option<String>,

    /// Scheme and host of the FCM API
    #[arg(long, env = "FCM_ENDPOINT", default_value = DEFAULT_FCM_ENDPOINT)]
    pub fcm_endpoint: String,

    /// Ask FCM to validate the message without delivering it
    #[arg(long, env = "FCM_VALIDATE_ONLY")]
    pub validate_only: bool,

    /// Skip TLS certificate verification. Never enable outside local testing.
    #[arg(long, env = "FCM_DANGER_ACCEPT_INVALID_CERTS")]
    pub danger_accept_invalid_certs: bool,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PROJECT_ID)
    }
}

impl SenderConfig {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            asset_base_url: None,
            fcm_endpoint: DEFAULT_FCM_ENDPOINT.into(),
            validate_only: false,
            danger_accept_invalid_certs: false,
        }
    }

    pub fn with_fcm_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.fcm_endpoint = endpoint.into();
        self
    }

    pub fn with_asset_base_url(mut self, base: impl Into<String>) -> Self {
        self.asset_base_url = Some(base.into());
        self
    }

    pub fn with_validate_only(mut self, validate_only: bool) -> Self {
        self.validate_only = validate_only;
        self
    }

    pub fn with_danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.danger_accept_invalid_certs = accept;
        self
    }

    pub fn send_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/messages:send",
            self.fcm_endpoint.trim_end_matches('/'),
            self.project_id
        )
    }
}
