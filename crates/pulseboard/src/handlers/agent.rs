use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use common::configuration::{AgentConfig, GleanConfig};
use common::consts::AGENT_RUN_API_PATH;
use common::errors::PipelineError;
use gleanapi::{AgentMessage, AgentRunInput, AgentRunRequest, AgentRunResponse};
use http_body_util::{combinators::BoxBody, BodyExt};
use hyper::{body::Incoming, Request, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::ServiceError;
use crate::handlers::json_response;

/// Client for the vendor agent-run endpoint. Deliberately decoupled
/// from the search pipeline: its failures are reported on their own
/// and never affect metric computation.
#[derive(Debug)]
pub struct AgentClient {
    http: reqwest::Client,
    run_url: String,
    token: String,
    agent_id: String,
}

impl AgentClient {
    pub fn new(config: &AgentConfig, glean: &GleanConfig) -> Result<Self, PipelineError> {
        let base_url = config.base_url.as_deref().unwrap_or(&glean.base_url);
        if base_url.trim().is_empty() {
            return Err(PipelineError::Config("agent base_url is not set".to_string()));
        }
        if glean.token.trim().is_empty() {
            return Err(PipelineError::Config(
                "bearer token is not set (GLEAN_API_TOKEN)".to_string(),
            ));
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(glean.timeout_secs))
            .build()
            .map_err(|err| PipelineError::Transport {
                url: base_url.to_string(),
                message: err.to_string(),
            })?;

        Ok(Self {
            http,
            run_url: format!("{}{}", base_url.trim_end_matches('/'), AGENT_RUN_API_PATH),
            token: glean.token.clone(),
            agent_id: config.agent_id.clone(),
        })
    }

    pub async fn run(
        &self,
        customer: &str,
        timeframe: Option<&str>,
    ) -> Result<AgentRunResponse, PipelineError> {
        let request = AgentRunRequest {
            agent_id: self.agent_id.clone(),
            input: AgentRunInput {
                customer: customer.to_string(),
                timeframe: timeframe.map(str::to_string),
            },
        };

        debug!(agent_id = %self.agent_id, customer, "requesting agent narrative");

        let response = self
            .http
            .post(&self.run_url)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await
            .map_err(|err| PipelineError::Transport {
                url: self.run_url.clone(),
                message: err.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|err| PipelineError::Transport {
            url: self.run_url.clone(),
            message: err.to_string(),
        })?;

        if !status.is_success() {
            return Err(PipelineError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: AgentRunResponse = serde_json::from_str(&body)?;
        Ok(parsed)
    }
}

#[derive(Debug, Deserialize)]
pub struct AgentSummaryRequest {
    pub customer: String,
    pub timeframe: Option<String>,
}

/// The narrative payload is forwarded as the agent produced it;
/// rendering decisions belong to the presentation layer.
#[derive(Debug, Serialize)]
pub struct AgentSummaryResponse {
    pub narrative: Option<AgentMessage>,
    pub messages: Vec<AgentMessage>,
}

pub async fn agent_summary(
    request: Request<Incoming>,
    agent_client: Arc<Option<AgentClient>>,
) -> Result<Response<BoxBody<Bytes, hyper::Error>>, hyper::Error> {
    let body_bytes = request.collect().await?.to_bytes();
    let summary_request: AgentSummaryRequest = match serde_json::from_slice(&body_bytes) {
        Ok(parsed) => parsed,
        Err(err) => {
            return Ok(ServiceError::InvalidRequest(err.to_string()).into_response());
        }
    };

    let Some(client) = agent_client.as_ref() else {
        return Ok(ServiceError::AgentNotConfigured.into_response());
    };

    match client
        .run(&summary_request.customer, summary_request.timeframe.as_deref())
        .await
    {
        Ok(agent_response) => {
            let response = AgentSummaryResponse {
                narrative: agent_response.narrative().cloned(),
                messages: agent_response.messages,
            };
            match json_response(&response) {
                Ok(response) => Ok(response),
                Err(err) => Ok(err.into_response()),
            }
        }
        Err(err) => {
            warn!(customer = %summary_request.customer, error = %err, "agent narrative failed");
            Ok(ServiceError::from(err).into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use pretty_assertions::assert_eq;

    fn glean_config(base_url: &str) -> GleanConfig {
        GleanConfig {
            base_url: base_url.to_string(),
            token: "test-token".to_string(),
            datasource: "jira".to_string(),
            page_size: 100,
            timeout_secs: 5,
            negative_label: "chat-negative".to_string(),
            positive_label: "chat-positive".to_string(),
        }
    }

    fn agent_config() -> AgentConfig {
        AgentConfig {
            agent_id: "feedback-narrator".to_string(),
            base_url: None,
        }
    }

    #[test]
    fn missing_token_is_a_config_error() {
        let mut glean = glean_config("https://acme.glean.example");
        glean.token = String::new();
        let err = AgentClient::new(&agent_config(), &glean).unwrap_err();
        assert!(err.is_config());
    }

    #[tokio::test]
    async fn run_posts_agent_request_and_parses_narrative() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/rest/api/v1/agents/run")
            .match_header("authorization", "Bearer test-token")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "agent_id": "feedback-narrator",
                "input": {"Customer": "Acme", "Timeframe": "30d"}
            })))
            .with_status(200)
            .with_body(
                r#"{"messages": [
                    {"role": "user", "content": "summarize Acme"},
                    {"role": "feedback-narrator", "content": {"sections": [{"heading": "Overview", "body": "Stable."}]}}
                ]}"#,
            )
            .create_async()
            .await;

        let glean = glean_config(&server.url());
        let client = AgentClient::new(&agent_config(), &glean).unwrap();
        let response = client.run("Acme", Some("30d")).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.messages.len(), 2);
        assert_eq!(
            response.narrative().unwrap().role.as_deref(),
            Some("feedback-narrator")
        );
    }

    #[tokio::test]
    async fn agent_failure_surfaces_as_upstream_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/rest/api/v1/agents/run")
            .with_status(429)
            .with_body("rate limited")
            .create_async()
            .await;

        let glean = glean_config(&server.url());
        let client = AgentClient::new(&agent_config(), &glean).unwrap();
        let err = client.run("Acme", None).await.unwrap_err();
        assert!(matches!(err, PipelineError::Upstream { status: 429, .. }));
    }
}
