//! Async request adapter for the Vika datasheet API.
//!
//! # Overview
//! Builds URLs against a configurable API base, attaches bearer-token
//! headers, sends GET/POST/PATCH/PUT/DELETE calls and hands the parsed JSON
//! body to a pluggable response normalizer.
//!
//! # Design
//! - `RequestAdapter` is immutable after construction; it holds the API
//!   base and fixed headers only.
//! - Request building (`build_request`) is pure and separate from I/O
//!   (`Transport`), so the network boundary is explicit.
//! - One transport call per request. No retries, no caching.
//! - API-level success conventions live in a `ResponseNormalizer`, not here.

pub mod adapter;
pub mod config;
pub mod error;
pub mod http;
pub mod normalize;
pub mod transport;
pub mod types;
pub mod utils;

pub use adapter::RequestAdapter;
pub use config::AdapterConfig;
pub use error::{ApiError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, RequestBody};
pub use normalize::{PassThrough, ResponseNormalizer};
pub use transport::{ReqwestTransport, Transport, REQUEST_TIMEOUT};
pub use types::{FilePart, RequestOptions};
pub use utils::join_url;

/// Public Vika API host.
pub const DEFAULT_API_BASE: &str = "https://api.vika.cn";

/// Path prefix prepended to relative endpoints.
pub const FUSION_API_PREFIX: &str = "/fusion/v1";

/// Endpoints starting with this are already prefixed.
pub const FUSION_SEGMENT: &str = "/fusion";

pub const USER_AGENT: &str = concat!("vika-rs/", env!("CARGO_PKG_VERSION"));
