#![allow(dead_code)]

use std::sync::Once;

use fcm_sender::google::ServiceAccount;
use fcm_sender::{FcmSender, SenderConfig};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const PROJECT_ID: &str = "demo-project";
pub const ACCESS_TOKEN: &str = "ya29.test-access-token";
pub const SEND_PATH: &str = "/v1/projects/demo-project/messages:send";

static INIT: Once = Once::new();

pub fn setup_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warn".into())
            .add_directive("fcm_sender=debug".parse().unwrap());

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .init();
    });
}

pub fn service_account_json(token_uri: &str) -> serde_json::Value {
    json!({
        "type": "service_account",
        "project_id": PROJECT_ID,
        "private_key_id": "0123456789abcdef",
        "private_key": include_str!("fixtures/test_key.pem"),
        "client_email": "fcm-sender@demo-project.iam.gserviceaccount.com",
        "client_id": "100000000000000000000",
        "auth_uri": "https://accounts.google.com/o/oauth2/auth",
        "token_uri": token_uri,
        "universe_domain": "googleapis.com"
    })
}

pub fn service_account(token_uri: &str) -> ServiceAccount {
    serde_json::from_value(service_account_json(token_uri)).unwrap()
}

/// One mock server playing both the OAuth token endpoint and FCM.
pub struct TestEnv {
    pub server: MockServer,
}

impl TestEnv {
    pub async fn start() -> Self {
        setup_tracing();
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn token_uri(&self) -> String {
        format!("{}/token", self.server.uri())
    }

    pub fn config(&self) -> SenderConfig {
        SenderConfig::new(PROJECT_ID).with_fcm_endpoint(self.server.uri())
    }

    pub async fn sender(&self) -> FcmSender {
        self.sender_with(self.config()).await
    }

    pub async fn sender_with(&self, config: SenderConfig) -> FcmSender {
        FcmSender::new(config, &service_account(&self.token_uri()))
            .await
            .unwrap()
    }

    pub async fn grant_tokens(&self, expected_calls: u64) {
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": ACCESS_TOKEN,
                "expires_in": 3599,
                "token_type": "Bearer"
            })))
            .expect(expected_calls)
            .mount(&self.server)
            .await;
    }

    /// FCM must not be reached at all.
    pub async fn forbid_sends(&self) {
        Mock::given(method("POST"))
            .and(path(SEND_PATH))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&self.server)
            .await;
    }
}
