use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Map, Value};
use url::Url;

use irmapper_api::config::HassServer;

use crate::error::{ApiError, ApiResult};
use crate::transport::{Transport, TransportError};

#[derive(Clone, Debug, Deserialize)]
pub struct HassState {
    pub entity_id: String,
    pub state: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

/// Home Assistant REST client, used to reach `remote.send_command`.
pub struct HassClient {
    base_url: Url,
    http: reqwest::Client,
    token: Option<String>,
}

impl HassClient {
    const DEFAULT_TOKEN_ENV: &'static str = "HASS_TOKEN";
    const DEFAULT_TIMEOUT_SECS: u64 = 10;

    pub fn new(server: &HassServer) -> ApiResult<Self> {
        let timeout = server.timeout_secs.unwrap_or(Self::DEFAULT_TIMEOUT_SECS);
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()?;

        Ok(Self {
            base_url: server.url.clone(),
            http,
            token: None,
        })
    }

    pub fn load_token_from_env(&mut self, server: &HassServer) -> ApiResult<()> {
        let token_env = server
            .token_env
            .as_deref()
            .unwrap_or(Self::DEFAULT_TOKEN_ENV);
        let token = std::env::var(token_env).map_err(|_| {
            ApiError::service_error(format!(
                "Missing Home Assistant token env var {token_env}"
            ))
        })?;
        self.set_token(token)
    }

    pub fn set_token(&mut self, token: String) -> ApiResult<()> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ApiError::service_error("Empty Home Assistant token"));
        }
        self.token = Some(token.to_string());
        Ok(())
    }

    fn endpoint_url(&self, endpoint: &str) -> ApiResult<Url> {
        let base = if self.base_url.path().ends_with('/') {
            self.base_url.to_string()
        } else {
            format!("{}/", self.base_url)
        };
        let base = Url::parse(&base)?;
        Ok(base.join(endpoint.trim_start_matches('/'))?)
    }

    fn token(&self) -> ApiResult<&str> {
        self.token
            .as_deref()
            .ok_or_else(|| ApiError::service_error("Home Assistant token not initialized"))
    }

    async fn check_status(
        &self,
        response: reqwest::Response,
        action: &str,
    ) -> ApiResult<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_else(|_| String::new());

        let details = if body.is_empty() {
            format!("{status}")
        } else {
            format!("{status}: {body}")
        };

        let err = if status == StatusCode::UNAUTHORIZED {
            format!("Home Assistant unauthorized during {action}. Verify HASS_TOKEN")
        } else {
            format!("Home Assistant error during {action}: {details}")
        };

        Err(ApiError::service_error(err))
    }

    pub async fn get_state(&self, entity_id: &str) -> ApiResult<HassState> {
        let url = self.endpoint_url(&format!("/api/states/{entity_id}"))?;
        let response = self.http.get(url).bearer_auth(self.token()?).send().await?;
        let response = self
            .check_status(response, &format!("GET /api/states/{entity_id}"))
            .await?;
        Ok(response.json().await?)
    }

    pub async fn call_service(
        &self,
        domain: &str,
        service: &str,
        entity_id: &str,
        mut data: Map<String, Value>,
    ) -> ApiResult<()> {
        let url = self.endpoint_url(&format!("/api/services/{domain}/{service}"))?;
        if !entity_id.trim().is_empty() {
            data.insert(
                "entity_id".to_string(),
                Value::String(entity_id.to_string()),
            );
        }
        let payload = Value::Object(data);

        let response = self
            .http
            .post(url)
            .bearer_auth(self.token()?)
            .json(&payload)
            .send()
            .await?;
        let _response = self
            .check_status(response, &format!("POST /api/services/{domain}/{service}"))
            .await?;
        Ok(())
    }
}

/// The REST service call only answers once the service has run, which gives
/// the blocking behaviour [`Transport`] asks for.
#[async_trait]
impl Transport for HassClient {
    async fn send_command(&self, remote: &str, code: &str) -> Result<(), TransportError> {
        let mut data = Map::new();
        data.insert("command".to_string(), Value::String(code.to_string()));

        self.call_service("remote", "send_command", remote, data)
            .await
            .map_err(|err| match err {
                ApiError::ReqwestError(err) => {
                    TransportError::Unreachable(remote.to_string(), err.to_string())
                }
                err => TransportError::Rejected {
                    remote: remote.to_string(),
                    details: err.to_string(),
                },
            })
    }
}
