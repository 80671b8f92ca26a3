//! Network I/O behind the adapter.
//!
//! # Design
//! `Transport` executes one `HttpRequest` and hands back an `HttpResponse`.
//! `ReqwestTransport` opens a fresh `reqwest::Client` for every call and
//! drops it when the call ends, whichever way it ends (including the future
//! being dropped mid-flight), so no connection outlives its request.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::warn;

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, RequestBody};

/// Connect + response ceiling for a single call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Executes a single HTTP round-trip.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    timeout: Duration,
    http_status_as_error: bool,
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            timeout: REQUEST_TIMEOUT,
            http_status_as_error: false,
        }
    }

    /// When enabled, 4xx/5xx responses become `TransportError::Status`
    /// instead of reaching the normalizer.
    pub fn http_status_as_error(mut self, enabled: bool) -> Self {
        self.http_status_as_error = enabled;
        self
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.timeout)
            .build()
            .map_err(|e| TransportError::Other(Box::new(e)))?;

        let mut builder = client.request(to_reqwest_method(request.method), &request.url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match request.body {
            None => builder,
            Some(RequestBody::Json(value)) => builder.json(&value),
            Some(RequestBody::Form(fields)) => builder.form(&fields),
            Some(RequestBody::Multipart { fields, files }) => {
                builder.multipart(multipart_form(fields, files)?)
            }
        };

        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.text().await.map_err(classify)?;

        if self.http_status_as_error && status >= 400 {
            warn!(status, url = %request.url, "response status treated as error");
            return Err(TransportError::Status { status, body });
        }

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

fn multipart_form(
    fields: Vec<(String, String)>,
    files: Vec<crate::types::FilePart>,
) -> Result<Form, TransportError> {
    let mut form = Form::new();
    for (name, value) in fields {
        form = form.text(name, value);
    }
    for file in files {
        let mut part = Part::bytes(file.bytes).file_name(file.file_name);
        if let Some(mime) = file.content_type {
            part = part
                .mime_str(&mime)
                .map_err(|e| TransportError::Other(Box::new(e)))?;
        }
        form = form.part(file.field, part);
    }
    Ok(form)
}

/// Builder errors pass through untouched; everything else happened on the
/// wire.
fn classify(err: reqwest::Error) -> TransportError {
    if err.is_builder() {
        return TransportError::Other(Box::new(err));
    }
    if let Some(status) = err.status() {
        return TransportError::Status {
            status: status.as_u16(),
            body: err.to_string(),
        };
    }
    TransportError::Network(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timeout_is_thirty_seconds() {
        let transport = ReqwestTransport::default();
        assert_eq!(transport.timeout, Duration::from_secs(30));
        assert!(!transport.http_status_as_error);
    }

    #[test]
    fn methods_map_onto_reqwest() {
        assert_eq!(to_reqwest_method(HttpMethod::Patch), reqwest::Method::PATCH);
        assert_eq!(to_reqwest_method(HttpMethod::Delete), reqwest::Method::DELETE);
    }

    #[test]
    fn invalid_mime_is_not_a_network_error() {
        let file = crate::types::FilePart::new("file", "a.bin", vec![0]).with_content_type("not a mime");
        let err = multipart_form(Vec::new(), vec![file]).unwrap_err();
        assert!(matches!(err, TransportError::Other(_)));
    }
}
