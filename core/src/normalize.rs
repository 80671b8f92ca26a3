//! Response normalization seam.
//!
//! The adapter only decides transport-level success. Whatever convention the
//! API uses to report its own failures is interpreted by a
//! `ResponseNormalizer` supplied by the caller.

use serde_json::Value;

use crate::error::ApiError;

/// Turns a parsed body and its status code into the caller's result.
pub trait ResponseNormalizer: Send + Sync {
    fn normalize(&self, body: Value, status: u16) -> Result<Value, ApiError>;
}

impl<F> ResponseNormalizer for F
where
    F: Fn(Value, u16) -> Result<Value, ApiError> + Send + Sync,
{
    fn normalize(&self, body: Value, status: u16) -> Result<Value, ApiError> {
        self(body, status)
    }
}

/// Returns every body unchanged, whatever the status.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl ResponseNormalizer for PassThrough {
    fn normalize(&self, body: Value, _status: u16) -> Result<Value, ApiError> {
        Ok(body)
    }
}
