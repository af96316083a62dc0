//! Thin client for the Sanity HTTP API. Reads go through the CDN host;
//! mutations go to the live API host with the bearer token.

use std::fmt;
use std::time::Duration;

use bd_core::{Error, Result};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct SanityConfig {
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    pub token: Option<String>,
    pub studio_host: String,
}

impl Default for SanityConfig {
    fn default() -> Self {
        Self {
            project_id: "ck8ysor6".to_string(),
            dataset: "production".to_string(),
            api_version: "2025-08-10".to_string(),
            token: None,
            studio_host: "kozukai-tosan-blog.sanity.studio".to_string(),
        }
    }
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    result: serde_json::Value,
}

#[derive(Deserialize)]
struct MutateResponse {
    #[serde(default)]
    results: Vec<MutateResult>,
}

#[derive(Deserialize)]
struct MutateResult {
    id: Option<String>,
}

pub struct SanityClient {
    config: SanityConfig,
    client: reqwest::Client,
}

impl fmt::Debug for SanityClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SanityClient")
            .field("project_id", &self.config.project_id)
            .field("dataset", &self.config.dataset)
            .field("token", &self.config.token.as_deref().map(|_| "<redacted>"))
            .finish()
    }
}

impl SanityClient {
    pub fn new(config: SanityConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { config, client })
    }

    /// Write credential pre-flight. Checked before any network call.
    pub fn require_token(&self) -> Result<&str> {
        self.config
            .token
            .as_deref()
            .ok_or_else(|| Error::Configuration("SANITY_API_TOKEN is not set".to_string()))
    }

    fn query_url(&self) -> String {
        format!(
            "https://{}.apicdn.sanity.io/v{}/data/query/{}",
            self.config.project_id, self.config.api_version, self.config.dataset
        )
    }

    fn mutate_url(&self) -> String {
        format!(
            "https://{}.api.sanity.io/v{}/data/mutate/{}",
            self.config.project_id, self.config.api_version, self.config.dataset
        )
    }

    pub fn studio_url(&self, document_id: &str) -> String {
        format!("https://{}/desk/post;{}", self.config.studio_host, document_id)
    }

    /// Runs a GROQ query against the CDN read path. Params are passed as
    /// `$name` query pairs, JSON-encoded as the API expects.
    pub async fn fetch(
        &self,
        query: &str,
        params: &[(&str, serde_json::Value)],
    ) -> Result<serde_json::Value> {
        let mut pairs: Vec<(String, String)> = vec![("query".to_string(), query.to_string())];
        for (name, value) in params {
            pairs.push((format!("${}", name), value.to_string()));
        }

        debug!("🔎 GROQ query: {}", query);
        let response = self
            .client
            .get(self.query_url())
            .query(&pairs)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Persistence(format!(
                "Sanity query failed ({}): {}",
                status, body
            )));
        }

        let parsed: QueryResponse = response.json().await?;
        Ok(parsed.result)
    }

    /// Issues a create mutation and returns the new document id.
    pub async fn create(&self, document: &serde_json::Value) -> Result<String> {
        self.mutate(json!({ "mutations": [{ "create": document }] }))
            .await
    }

    /// Issues a patch mutation replacing the given fields.
    pub async fn patch_set(&self, id: &str, fields: serde_json::Value) -> Result<String> {
        self.mutate(json!({ "mutations": [{ "patch": { "id": id, "set": fields } }] }))
            .await
    }

    async fn mutate(&self, body: serde_json::Value) -> Result<String> {
        let token = self.require_token()?;

        let response = self
            .client
            .post(format!("{}?returnIds=true", self.mutate_url()))
            .header("Authorization", format!("Bearer {}", token))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::Persistence(format!(
                "Sanity mutation failed ({}): {}",
                status, text
            )));
        }

        let parsed: MutateResponse = response.json().await?;
        parsed
            .results
            .into_iter()
            .next()
            .and_then(|result| result.id)
            .ok_or_else(|| {
                Error::Persistence("mutation response contained no document id".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> SanityClient {
        SanityClient::new(SanityConfig::default()).unwrap()
    }

    #[test]
    fn test_reads_use_the_cdn_host_and_writes_bypass_it() {
        let client = client();
        assert_eq!(
            client.query_url(),
            "https://ck8ysor6.apicdn.sanity.io/v2025-08-10/data/query/production"
        );
        assert_eq!(
            client.mutate_url(),
            "https://ck8ysor6.api.sanity.io/v2025-08-10/data/mutate/production"
        );
    }

    #[test]
    fn test_studio_url_points_at_the_desk() {
        let client = client();
        assert_eq!(
            client.studio_url("drafts.t-42"),
            "https://kozukai-tosan-blog.sanity.studio/desk/post;drafts.t-42"
        );
    }

    #[test]
    fn test_require_token_without_token_is_a_configuration_error() {
        let err = client().require_token().unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = SanityConfig {
            token: Some("secret".to_string()),
            ..SanityConfig::default()
        };
        let client = SanityClient::new(config).unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("secret"));
    }
}
