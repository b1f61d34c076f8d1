use bytes::Bytes;
use common::errors::PipelineError;
use http_body_util::{combinators::BoxBody, BodyExt, Full};
use hyper::{Error as HyperError, Response, StatusCode};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("agent endpoint is not configured")]
    AgentNotConfigured,

    #[error("internal server error")]
    Internal(String),

    #[error("failed to create response: {0}")]
    ResponseCreationFailed(#[from] hyper::http::Error),
}

impl ServiceError {
    pub fn into_response(self) -> Response<BoxBody<Bytes, HyperError>> {
        let (status, code, details) = match &self {
            ServiceError::Pipeline(PipelineError::Config(reason)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "ConfigError",
                json!({ "reason": reason }),
            ),

            ServiceError::Pipeline(PipelineError::Upstream { status, body }) => (
                StatusCode::BAD_GATEWAY,
                "UpstreamError",
                json!({ "upstream_status": status, "upstream_body": body }),
            ),

            ServiceError::Pipeline(PipelineError::Transport { url, message }) => (
                StatusCode::BAD_GATEWAY,
                "TransportError",
                json!({ "url": url, "reason": message }),
            ),

            ServiceError::Pipeline(PipelineError::Deserialization(reason)) => (
                StatusCode::BAD_GATEWAY,
                "DeserializationError",
                json!({ "reason": reason.to_string() }),
            ),

            ServiceError::InvalidRequest(reason) => (
                StatusCode::BAD_REQUEST,
                "InvalidRequest",
                json!({ "reason": reason }),
            ),

            ServiceError::AgentNotConfigured => (
                StatusCode::NOT_FOUND,
                "AgentNotConfigured",
                json!({}),
            ),

            ServiceError::Internal(reason) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "InternalServerError",
                json!({ "reason": reason }),
            ),

            ServiceError::ResponseCreationFailed(reason) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "ResponseCreationFailed",
                json!({ "reason": reason.to_string() }),
            ),
        };

        let body_json = json!({
            "error": {
                "code": code,
                "message": self.to_string(),
                "details": details
            }
        });

        let boxed_body = Full::new(Bytes::from(body_json.to_string()))
            .map_err(|never| match never {})
            .boxed();

        Response::builder()
            .status(status)
            .header("content-type", "application/json")
            .body(boxed_body)
            .unwrap_or_else(|_| {
                Response::new(
                    Full::new(Bytes::from("Internal Error"))
                        .map_err(|never| match never {})
                        .boxed(),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn upstream_error_maps_to_bad_gateway() {
        let err = ServiceError::Pipeline(PipelineError::Upstream {
            status: 503,
            body: "overloaded".to_string(),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["error"]["code"], "UpstreamError");
        assert_eq!(body["error"]["details"]["upstream_status"], 503);
        assert_eq!(body["error"]["details"]["upstream_body"], "overloaded");
    }

    #[tokio::test]
    async fn config_error_maps_to_internal_error() {
        let err = ServiceError::Pipeline(PipelineError::Config(
            "glean.base_url is not set".to_string(),
        ));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["error"]["code"], "ConfigError");
    }

    #[tokio::test]
    async fn invalid_request_maps_to_bad_request() {
        let err = ServiceError::InvalidRequest("window_days must be 1, 7, 14, or 30".to_string());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["error"]["code"], "InvalidRequest");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("window_days"));
    }
}
