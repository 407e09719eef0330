//! JSON response envelope.

use crate::error::{ModelError, ModelResult};
use crate::store::Listing;
use serde::Serialize;

/// Error body of a failed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
    pub title: String,
}

impl ErrorBody {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            title: status_text(code).to_string(),
        }
    }
}

/// `{success, count, data, error}` as returned by every API handler.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response<T> {
    pub success: bool,
    pub count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl<T: Serialize> Response<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            count: 0,
            data: Some(data),
            error: None,
        }
    }

    pub fn to_json(&self) -> ModelResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl<T: Serialize> Response<Vec<T>> {
    /// List response carrying the total row count of the unpaged query.
    pub fn list(listing: Listing<T>) -> Self {
        Self {
            success: true,
            count: listing.count,
            data: Some(listing.rows),
            error: None,
        }
    }
}

impl Response<()> {
    /// Failure response; the code comes from [`ModelError::status`].
    pub fn error(err: &ModelError) -> Self {
        Self::failure(ErrorBody::new(err.status(), err.to_string()))
    }

    pub fn failure(body: ErrorBody) -> Self {
        Self {
            success: false,
            count: 0,
            data: None,
            error: Some(body),
        }
    }
}

fn status_text(code: u16) -> &'static str {
    match code {
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        _ => "",
    }
}
