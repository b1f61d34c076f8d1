pub mod agent;
pub mod dashboard;

use bytes::Bytes;
use http_body_util::{combinators::BoxBody, BodyExt, Full};
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::errors::ServiceError;

pub(crate) fn full<T: Into<Bytes>>(chunk: T) -> BoxBody<Bytes, hyper::Error> {
    Full::new(chunk.into())
        .map_err(|never| match never {})
        .boxed()
}

pub(crate) fn json_response<T: Serialize>(
    value: &T,
) -> Result<Response<BoxBody<Bytes, hyper::Error>>, ServiceError> {
    let body =
        serde_json::to_string(value).map_err(|err| ServiceError::Internal(err.to_string()))?;
    Ok(Response::builder()
        .status(StatusCode::OK)
        .header("content-type", "application/json")
        .body(full(body))?)
}
