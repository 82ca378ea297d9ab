use crate::domain::models::auth::Principal;
use crate::domain::ports::IdentityVerifier;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::error;

/// Verifies bearer tokens against the external identity provider. The
/// token stays opaque to this service; only the resulting principal enters
/// the core.
pub struct HttpIdentityService {
    client: Client,
    verify_url: String,
}

impl HttpIdentityService {
    pub fn new(verify_url: String) -> Self {
        Self {
            client: Client::new(),
            verify_url,
        }
    }
}

#[derive(Deserialize)]
struct VerifyResponse {
    user_id: String,
    role: String,
}

#[async_trait]
impl IdentityVerifier for HttpIdentityService {
    async fn verify(&self, token: &str) -> Result<Principal, AppError> {
        let res = self
            .client
            .post(&self.verify_url)
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Identity service connection error: {}", e);
                error!("{}", msg);
                AppError::InternalWithMsg(msg)
            })?;

        if res.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AppError::Unauthorized);
        }
        if !res.status().is_success() {
            let msg = format!("Identity service failed. Status: {}", res.status());
            error!("{}", msg);
            return Err(AppError::InternalWithMsg(msg));
        }

        let body: VerifyResponse = res
            .json()
            .await
            .map_err(|e| AppError::InternalWithMsg(format!("Identity service bad response: {}", e)))?;

        Ok(Principal {
            user_id: body.user_id,
            role: body.role,
        })
    }
}
