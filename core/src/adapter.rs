//! Request adapter for the datasheet API.
//!
//! # Design
//! `RequestAdapter` holds only the token, the API base and the fixed headers
//! derived from them; nothing changes after construction. A call is split in
//! three steps: `build_request` produces an `HttpRequest` (pure), the
//! `Transport` executes it, and `parse_body` plus the `ResponseNormalizer`
//! turn the `HttpResponse` into the caller's value. The pure halves are
//! public so request shapes can be tested without a network.

use std::fmt;

use serde_json::{json, Value};
use tracing::{debug, instrument, warn};

use crate::config::AdapterConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, RequestBody};
use crate::normalize::{PassThrough, ResponseNormalizer};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{FilePart, RequestOptions};
use crate::utils::join_url;
use crate::{DEFAULT_API_BASE, FUSION_API_PREFIX, FUSION_SEGMENT, USER_AGENT};

const CONTENT_TYPE: &str = "Content-Type";

/// Async client for the datasheet REST API.
///
/// Cheap to share: every call only reads the adapter, so concurrent calls on
/// one instance are independent.
pub struct RequestAdapter<T = ReqwestTransport, N = PassThrough> {
    api_base: String,
    headers: Vec<(String, String)>,
    transport: T,
    normalizer: N,
}

impl RequestAdapter {
    /// Adapter against `DEFAULT_API_BASE`.
    pub fn new(token: &str) -> Self {
        Self::with_api_base(token, DEFAULT_API_BASE)
    }

    pub fn with_api_base(token: &str, api_base: &str) -> Self {
        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            headers: vec![
                ("Authorization".to_string(), format!("Bearer {token}")),
                (CONTENT_TYPE.to_string(), "application/json".to_string()),
                ("User-Agent".to_string(), USER_AGENT.to_string()),
            ],
            transport: ReqwestTransport::new(),
            normalizer: PassThrough,
        }
    }

    pub fn from_config(config: &AdapterConfig) -> Self {
        Self::with_api_base(&config.token, &config.api_base)
    }
}

impl<T, N> RequestAdapter<T, N> {
    pub fn with_transport<T2: Transport>(self, transport: T2) -> RequestAdapter<T2, N> {
        RequestAdapter {
            api_base: self.api_base,
            headers: self.headers,
            transport,
            normalizer: self.normalizer,
        }
    }

    pub fn with_normalizer<N2: ResponseNormalizer>(self, normalizer: N2) -> RequestAdapter<T, N2> {
        RequestAdapter {
            api_base: self.api_base,
            headers: self.headers,
            transport: self.transport,
            normalizer,
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Headers sent with every request unless overridden.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Resolve `endpoint` to an absolute URL.
    ///
    /// Absolute endpoints (anything starting with `http`) are returned as-is.
    /// Relative endpoints get the `/fusion/v1` prefix unless they already
    /// carry `/fusion`, and are then joined onto the API base.
    pub fn build_url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http") {
            return endpoint.to_string();
        }
        if endpoint.starts_with(FUSION_SEGMENT) {
            return join_url(&self.api_base, endpoint);
        }
        let prefixed = format!("{FUSION_API_PREFIX}/{}", endpoint.trim_start_matches('/'));
        join_url(&self.api_base, &prefixed)
    }

    /// Fixed headers with `overrides` merged in. Header names compare
    /// case-insensitively; an override replaces the fixed entry in place.
    pub fn build_headers(
        &self,
        overrides: Option<&[(String, String)]>,
        has_files: bool,
    ) -> Vec<(String, String)> {
        let mut headers = self.headers.clone();
        for (name, value) in overrides.unwrap_or_default() {
            match headers
                .iter_mut()
                .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            {
                Some(entry) => *entry = (name.clone(), value.clone()),
                None => headers.push((name.clone(), value.clone())),
            }
        }
        if has_files {
            headers.retain(|(name, _)| !name.eq_ignore_ascii_case(CONTENT_TYPE));
        }
        headers
    }

    /// Assemble the full request for one call without sending it.
    ///
    /// Files or form data take precedence over `json` for the body.
    pub fn build_request(
        &self,
        method: HttpMethod,
        endpoint: &str,
        options: RequestOptions,
    ) -> HttpRequest {
        let has_files = options.has_files();
        let headers = self.build_headers(options.headers.as_deref(), has_files);
        let data = options.data.filter(|fields| !fields.is_empty());

        let body = if has_files {
            Some(RequestBody::Multipart {
                fields: data.unwrap_or_default(),
                files: options.files.unwrap_or_default(),
            })
        } else if let Some(fields) = data {
            Some(RequestBody::Form(fields))
        } else {
            options.json.map(RequestBody::Json)
        };

        HttpRequest {
            method,
            url: self.build_url(endpoint),
            query: options.params.unwrap_or_default(),
            headers,
            body,
        }
    }

    /// Parse the response body as JSON, substituting an error payload when
    /// the body is not JSON.
    pub fn parse_body(&self, response: &HttpResponse) -> Value {
        match serde_json::from_str(&response.body) {
            Ok(value) => value,
            Err(e) => {
                warn!(status = response.status, error = %e, "response body is not JSON");
                json!({
                    "message": format!("Response parsing error: {}", response.body),
                    "success": false,
                })
            }
        }
    }
}

impl<T: Transport, N: ResponseNormalizer> RequestAdapter<T, N> {
    /// Send one request and normalize its response.
    ///
    /// Exactly one transport call is made; nothing is retried.
    #[instrument(skip(self, method, options), fields(method = %method))]
    pub async fn arequest(
        &self,
        method: HttpMethod,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<Value, ApiError> {
        let request = self.build_request(method, endpoint, options);
        debug!(url = %request.url, "sending request");

        let response = self.transport.send(request).await.map_err(|e| {
            warn!(error = %e, "transport failed");
            ApiError::from(e)
        })?;
        debug!(status = response.status, "received response");

        let body = self.parse_body(&response);
        self.normalizer.normalize(body, response.status)
    }

    pub async fn aget(
        &self,
        endpoint: &str,
        params: Option<Vec<(String, String)>>,
    ) -> Result<Value, ApiError> {
        let options = RequestOptions {
            params,
            ..Default::default()
        };
        self.arequest(HttpMethod::Get, endpoint, options).await
    }

    pub async fn apost(
        &self,
        endpoint: &str,
        json: Option<Value>,
        data: Option<Vec<(String, String)>>,
        files: Option<Vec<FilePart>>,
    ) -> Result<Value, ApiError> {
        let options = RequestOptions {
            json,
            data,
            files,
            ..Default::default()
        };
        self.arequest(HttpMethod::Post, endpoint, options).await
    }

    pub async fn apatch(&self, endpoint: &str, json: Option<Value>) -> Result<Value, ApiError> {
        self.arequest(HttpMethod::Patch, endpoint, json_only(json)).await
    }

    pub async fn aput(&self, endpoint: &str, json: Option<Value>) -> Result<Value, ApiError> {
        self.arequest(HttpMethod::Put, endpoint, json_only(json)).await
    }

    pub async fn adelete(&self, endpoint: &str, json: Option<Value>) -> Result<Value, ApiError> {
        self.arequest(HttpMethod::Delete, endpoint, json_only(json)).await
    }
}

fn json_only(json: Option<Value>) -> RequestOptions {
    RequestOptions {
        json,
        ..Default::default()
    }
}

// Manual impl keeps the bearer token out of logs.
impl<T, N> fmt::Debug for RequestAdapter<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestAdapter")
            .field("api_base", &self.api_base)
            .field("user_agent", &USER_AGENT)
            .finish_non_exhaustive()
    }
}
