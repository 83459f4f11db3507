//! reqwest-backed SonarQube client.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use serde_json::Value;

use sonar_exporter_core::error::{ExporterError, Result};
use sonar_exporter_core::sonar::{LICENSE_USAGE_PATH, SYSTEM_INFO_PATH};

use super::{SonarApi, SonarResponses};
use crate::config::SonarSection;

const USER_AGENT: &str = concat!("sonar-exporter/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct SonarClient {
    client: Client,
    base_url: String,
}

impl SonarClient {
    /// Build a client that sends `Authorization: Bearer {token}` on every request.
    pub fn new(sonar: &SonarSection) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", sonar.token))
            .map_err(|e| ExporterError::Config(format!("token is not a valid header value: {e}")))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| ExporterError::Internal(format!("http client build failed: {e}")))?;

        Ok(Self {
            client,
            base_url: sonar.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json(&self, path: &str) -> Result<Value> {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| ExporterError::fetch(path, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ExporterError::fetch(path, format!("unexpected status {status}")));
        }

        resp.json::<Value>()
            .await
            .map_err(|e| ExporterError::fetch(path, format!("invalid json body: {e}")))
    }
}

#[async_trait]
impl SonarApi for SonarClient {
    async fn fetch(&self) -> Result<SonarResponses> {
        let license_usage = self.get_json(LICENSE_USAGE_PATH).await?;
        let system_info = self.get_json(SYSTEM_INFO_PATH).await?;
        Ok(SonarResponses {
            license_usage,
            system_info,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(base_url: &str, token: &str) -> SonarSection {
        SonarSection {
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    #[test]
    fn trailing_slash_trimmed() {
        let c = SonarClient::new(&section("http://sonar.local:9000/", "squ_x")).unwrap();
        assert_eq!(c.url(LICENSE_USAGE_PATH), "http://sonar.local:9000/api/projects/license_usage");
    }

    #[test]
    fn token_with_newline_rejected() {
        let err = SonarClient::new(&section("http://sonar.local", "bad\ntoken")).unwrap_err();
        assert_eq!(err.code().as_str(), "CONFIG");
    }
}
