use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    domain::DreamId,
    error::{ApiError, ApiErrorBody},
    protocol::{AnalysisRecord, ApiEnvelope, CreateDreamRequest, DreamEntry, LoginData, LoginRequest},
};
use tracing::{debug, info, warn};

use crate::error::FlowError;

const LOGIN_PATH: &str = "/api/auth/login";
const DREAMS_PATH: &str = "/api/dreams";

const INVALID_CREDENTIALS_MESSAGE: &str = "이메일 또는 비밀번호가 일치하지 않습니다.";
const INVALID_INPUT_MESSAGE: &str = "입력 형식이 올바르지 않습니다.";

/// Remote dream service. Implementations must issue exactly one request per call.
/// Analysis records keep `null` entries in place so callers see the server's order.
#[async_trait]
pub trait DreamApi: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<String, FlowError>;
    async fn create_dream(
        &self,
        token: &str,
        request: &CreateDreamRequest,
    ) -> Result<Vec<Option<AnalysisRecord>>, FlowError>;
    async fn list_dreams(&self, token: &str) -> Result<Vec<DreamEntry>, FlowError>;
    async fn dream_detail(&self, token: &str, id: DreamId) -> Result<DreamEntry, FlowError>;
}

pub struct HttpDreamApi {
    http: Client,
    base_url: String,
}

impl HttpDreamApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl DreamApi for HttpDreamApi {
    async fn login(&self, email: &str, password: &str) -> Result<String, FlowError> {
        let response = self
            .http
            .post(self.endpoint(LOGIN_PATH))
            .json(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = error_body(response).await;
            return Err(login_failure(status, body.message));
        }

        let envelope: ApiEnvelope<LoginData> = response.json().await?;
        match envelope.data.and_then(|data| data.access_token) {
            Some(token) if !token.is_empty() => {
                info!(email, "login succeeded");
                Ok(token)
            }
            _ => {
                warn!(email, "login succeeded without an access token");
                Err(FlowError::Service {
                    status: status.as_u16(),
                    message: "login succeeded but no access token was returned".to_string(),
                })
            }
        }
    }

    async fn create_dream(
        &self,
        token: &str,
        request: &CreateDreamRequest,
    ) -> Result<Vec<Option<AnalysisRecord>>, FlowError> {
        let response = self
            .http
            .post(self.endpoint(DREAMS_PATH))
            .bearer_auth(token)
            .json(request)
            .send()
            .await?;
        let records: Vec<Option<AnalysisRecord>> =
            read_data(response).await?.unwrap_or_default();
        debug!(records = records.len(), "dream analysis received");
        Ok(records)
    }

    async fn list_dreams(&self, token: &str) -> Result<Vec<DreamEntry>, FlowError> {
        let response = self
            .http
            .get(self.endpoint(DREAMS_PATH))
            .bearer_auth(token)
            .send()
            .await?;
        let entries: Vec<DreamEntry> = read_data(response).await?.unwrap_or_default();
        debug!(entries = entries.len(), "dream history received");
        Ok(entries)
    }

    async fn dream_detail(&self, token: &str, id: DreamId) -> Result<DreamEntry, FlowError> {
        let response = self
            .http
            .get(self.endpoint(&format!("{DREAMS_PATH}/{id}")))
            .bearer_auth(token)
            .send()
            .await?;
        read_data(response).await?.ok_or_else(|| FlowError::Service {
            status: StatusCode::NOT_FOUND.as_u16(),
            message: format!("dream {id} not found"),
        })
    }
}

async fn read_data<T: DeserializeOwned>(response: Response) -> Result<Option<T>, FlowError> {
    let status = response.status();
    if !status.is_success() {
        let body = error_body(response).await;
        return Err(ApiError::from_body(status.as_u16(), body).into());
    }
    let envelope: ApiEnvelope<T> = response.json().await?;
    Ok(envelope.data)
}

async fn error_body(response: Response) -> ApiErrorBody {
    response.json().await.unwrap_or_default()
}

fn login_failure(status: StatusCode, message: Option<String>) -> FlowError {
    let message = message.filter(|message| !message.trim().is_empty());
    match status {
        StatusCode::UNAUTHORIZED => FlowError::Unauthorized(
            message.unwrap_or_else(|| INVALID_CREDENTIALS_MESSAGE.to_string()),
        ),
        StatusCode::BAD_REQUEST => FlowError::Service {
            status: status.as_u16(),
            message: format!(
                "입력 오류: {}",
                message.as_deref().unwrap_or(INVALID_INPUT_MESSAGE)
            ),
        },
        _ => FlowError::Service {
            status: status.as_u16(),
            message: message.unwrap_or_else(|| {
                format!(
                    "알 수 없는 서버 오류가 발생했습니다. 상태 코드: {}",
                    status.as_u16()
                )
            }),
        },
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
