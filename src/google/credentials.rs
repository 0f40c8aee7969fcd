use std::time::{self, Duration};

use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use tracing::debug;

use super::types::*;
use crate::error::{Result, SendError};

pub const FIREBASE_MESSAGING_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const DEFAULT_TOKEN_EXPIRY: Duration = Duration::from_secs(3600);

/// Signs service-account assertions and trades them for bearer tokens.
///
/// Tokens are never cached: every call to [`Credentials::access_token`] goes
/// back to the token endpoint.
#[derive(Clone)]
pub struct Credentials {
    signer: EncodingKey,
    token_header: Header,
    client_email: String,
    token_uri: String,
    project_id: Option<String>,
    token_expiry: Duration,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .field("project_id", &self.project_id)
            .finish_non_exhaustive()
    }
}

impl Credentials {
    pub fn from_service_account(service_account: ServiceAccount) -> Result<Self> {
        let signer = EncodingKey::from_rsa_pem(service_account.private_key.as_bytes())
            .map_err(|e| SendError::InvalidCredentials(format!("private key: {e}")))?;

        Ok(Credentials {
            signer,
            token_header: Header {
                typ: Some("JWT".into()),
                alg: Algorithm::RS256,
                kid: service_account.private_key_id,
                ..Header::default()
            },
            client_email: service_account.client_email,
            token_uri: service_account.token_uri,
            project_id: service_account.project_id,
            token_expiry: DEFAULT_TOKEN_EXPIRY,
        })
    }

    pub fn with_token_expiry(mut self, exp: Duration) -> Self {
        self.token_expiry = exp;
        self
    }

    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    /// Project named in the key file, if any.
    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    /// Performs a fresh JWT bearer grant against the key's token endpoint.
    pub async fn access_token(&self, http: &reqwest::Client) -> Result<String> {
        let assertion = encode(&self.token_header, &self.claims()?, &self.signer)?;

        debug!(token_uri = self.token_uri, "requesting access token");
        let res = http
            .post(&self.token_uri)
            .form(&[
                ("grant_type", JWT_BEARER_GRANT),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SendError::TokenExchange(e.to_string()))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| SendError::TokenExchange(e.to_string()))?;
        let token: AuthToken = serde_json::from_str(&body).unwrap_or_default();

        match token.access_token {
            Some(access_token) if !access_token.is_empty() => {
                debug!(expires_in = token.expires_in, "access token retrieved");
                Ok(access_token)
            }
            _ => {
                debug!(
                    %status,
                    error = token.error,
                    error_description = token.error_description,
                    "token endpoint returned no access token"
                );
                Err(SendError::MissingAccessToken)
            }
        }
    }

    fn claims(&self) -> Result<Claims> {
        let iat = time::SystemTime::now()
            .duration_since(time::UNIX_EPOCH)
            .map_err(|e| SendError::TokenExchange(format!("system clock: {e}")))?
            .as_secs();

        Ok(Claims {
            iat,
            exp: iat + self.token_expiry.as_secs(),
            iss: self.client_email.clone(),
            aud: self.token_uri.clone(),
            scope: FIREBASE_MESSAGING_SCOPE.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service_account(private_key: &str) -> ServiceAccount {
        serde_json::from_value(serde_json::json!({
            "type": "service_account",
            "project_id": "demo-project",
            "private_key_id": "abc123",
            "private_key": private_key,
            "client_email": "sender@demo-project.iam.gserviceaccount.com",
            "token_uri": "https://oauth2.googleapis.com/token",
        }))
        .unwrap()
    }

    #[test]
    fn rejects_garbage_private_key() {
        let err = Credentials::from_service_account(service_account("not a pem")).unwrap_err();
        assert!(matches!(err, SendError::InvalidCredentials(_)));
        assert_eq!(err.kind(), crate::ErrorKind::Auth);
    }

    #[test]
    fn claims_follow_the_key_and_expiry() {
        let creds = Credentials::from_service_account(service_account(include_str!(
            "../../tests/fixtures/test_key.pem"
        )))
        .unwrap()
        .with_token_expiry(Duration::from_secs(60));

        let claims = creds.claims().unwrap();
        assert_eq!(claims.iss, "sender@demo-project.iam.gserviceaccount.com");
        assert_eq!(claims.aud, "https://oauth2.googleapis.com/token");
        assert_eq!(claims.scope, FIREBASE_MESSAGING_SCOPE);
        assert_eq!(claims.exp - claims.iat, 60);
        assert_eq!(creds.token_header.kid.as_deref(), Some("abc123"));
        assert_eq!(creds.project_id(), Some("demo-project"));
    }

    #[test]
    fn service_account_needs_only_the_signing_fields() {
        let sa: ServiceAccount = serde_json::from_str(
            r#"{"private_key":"k","client_email":"a@b","token_uri":"https://t"}"#,
        )
        .unwrap();
        assert_eq!(sa.client_email, "a@b");
        assert!(sa.project_id.is_none());
        assert!(sa.private_key_id.is_none());

        let missing = serde_json::from_str::<ServiceAccount>(r#"{"client_email":"a@b"}"#);
        assert!(missing.is_err());
    }
}
