use std::path::Path;
use log::info;
use yup_oauth2::{ ServiceAccountAuthenticator, read_service_account_key };
use yup_oauth2::authenticator::DefaultAuthenticator;

use super::chat::ChatError;

pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Where Vertex AI bearer tokens come from. The service account authenticator
/// caches and refreshes tokens itself.
pub enum TokenSource {
    ServiceAccount(DefaultAuthenticator),
    Static(String),
}

impl TokenSource {
    pub async fn from_key_file(sa_key_path: &str) -> Result<Self, ChatError> {
        let key = read_service_account_key(Path::new(sa_key_path))
            .await
            .map_err(|e| ChatError::Auth(format!("Failed to load SA key from {}: {}", sa_key_path, e)))?;

        let auth = ServiceAccountAuthenticator::builder(key)
            .build()
            .await
            .map_err(|e| ChatError::Auth(e.to_string()))?;

        info!("Service account authenticator ready (key: {})", sa_key_path);
        Ok(TokenSource::ServiceAccount(auth))
    }

    pub async fn access_token(&self) -> Result<String, ChatError> {
        match self {
            TokenSource::Static(token) => Ok(token.clone()),
            TokenSource::ServiceAccount(auth) => {
                let token = auth
                    .token(&[CLOUD_PLATFORM_SCOPE])
                    .await
                    .map_err(|e| ChatError::Auth(e.to_string()))?;

                token.token()
                    .ok_or_else(|| ChatError::Auth("OAuth token was None".to_string()))
                    .map(|t| t.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_token_is_returned_verbatim() {
        let source = TokenSource::Static("ya29.token".into());
        assert_eq!(source.access_token().await.unwrap(), "ya29.token");
    }

    #[tokio::test]
    async fn missing_key_file_is_an_auth_error() {
        let err = TokenSource::from_key_file("/nonexistent/key.json").await.err().unwrap();
        assert!(matches!(err, ChatError::Auth(msg) if msg.contains("/nonexistent/key.json")));
    }
}
