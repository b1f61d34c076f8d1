use std::sync::Arc;
use std::{env, fs};

use bytes::Bytes;
use common::configuration::Configuration;
use common::consts::{AGENT_SUMMARY_PATH, DASHBOARD_PATH, HEALTH_PATH};
use http_body_util::{combinators::BoxBody, BodyExt, Empty, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use pulseboard::handlers::agent::{agent_summary, AgentClient};
use pulseboard::handlers::dashboard::dashboard;
use pulseboard::pipeline::client::SearchClient;
use pulseboard::utils::tracing::init_logging;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

const BIND_ADDRESS: &str = "0.0.0.0:9091";
const TOKEN_ENV_VAR: &str = "GLEAN_API_TOKEN";

fn empty() -> BoxBody<Bytes, hyper::Error> {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed()
}

fn not_found(request: &Request<Incoming>) -> Response<BoxBody<Bytes, hyper::Error>> {
    debug!(method = %request.method(), path = %request.uri().path(), "no route found");
    let mut response = Response::new(empty());
    *response.status_mut() = StatusCode::NOT_FOUND;
    response
}

fn health() -> Response<BoxBody<Bytes, hyper::Error>> {
    let body = Full::new(Bytes::from(r#"{"status":"ok"}"#))
        .map_err(|never| match never {})
        .boxed();
    Response::builder()
        .status(StatusCode::OK)
        .header("content-type", "application/json")
        .body(body)
        .unwrap_or_else(|_| Response::new(empty()))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_logging();

    let config_path =
        env::var("PULSEBOARD_CONFIG_PATH").unwrap_or_else(|_| "./pulseboard.yaml".to_string());
    let config_contents =
        fs::read_to_string(&config_path).expect("Failed to read pulseboard.yaml");
    let mut config: Configuration =
        serde_yaml::from_str(&config_contents).expect("Failed to parse pulseboard.yaml");

    // Credentials come from the environment, never from the file.
    config.glean.token = env::var(TOKEN_ENV_VAR).unwrap_or_default();
    info!(path = %config_path, "loaded configuration");

    // Both clients fail fast on missing credentials, before any
    // page fetch is attempted.
    let search_client = Arc::new(SearchClient::new(&config.glean)?);
    let agent_client: Arc<Option<AgentClient>> = Arc::new(match &config.agent {
        Some(agent_config) => Some(AgentClient::new(agent_config, &config.glean)?),
        None => {
            info!("no agent configured, narrative summaries disabled");
            None
        }
    });
    let glean_config = Arc::new(config.glean.clone());

    let bind_address = match &config.listener {
        Some(listener) => format!(
            "{}:{}",
            listener.address.as_deref().unwrap_or("0.0.0.0"),
            listener.port.unwrap_or(9091)
        ),
        None => env::var("BIND_ADDRESS").unwrap_or_else(|_| BIND_ADDRESS.to_string()),
    };

    let listener = TcpListener::bind(&bind_address).await?;
    info!(address = %bind_address, "pulseboard listening");

    loop {
        let (stream, _) = listener.accept().await?;
        let peer_addr = stream.peer_addr()?;
        let io = TokioIo::new(stream);

        let search_client = Arc::clone(&search_client);
        let agent_client = Arc::clone(&agent_client);
        let glean_config = Arc::clone(&glean_config);

        let service = service_fn(move |req| {
            let search_client = Arc::clone(&search_client);
            let agent_client = Arc::clone(&agent_client);
            let glean_config = Arc::clone(&glean_config);

            async move {
                match (req.method(), req.uri().path()) {
                    (&Method::POST, DASHBOARD_PATH) => {
                        dashboard(req, search_client, glean_config).await
                    }
                    (&Method::POST, AGENT_SUMMARY_PATH) => agent_summary(req, agent_client).await,
                    (&Method::GET, HEALTH_PATH) => Ok(health()),
                    _ => Ok(not_found(&req)),
                }
            }
        });

        tokio::task::spawn(async move {
            debug!(peer = ?peer_addr, "accepted connection");
            if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                warn!(error = ?err, "error serving connection");
            }
        });
    }
}
