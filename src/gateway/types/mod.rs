//! Gateway boundary types
//!
//! - [`ApiResponse<T>`]: unified `{code, msg, data}` envelope
//! - [`ApiError`] / [`ApiResult`]: handler error plumbing
//! - [`ValidatedJson`]: JSON body extractor with client-safe rejections

pub mod error;
pub mod json;
pub mod response;

pub use error::{ApiError, ApiResult, created, ok};
pub use json::ValidatedJson;
pub use response::{ApiResponse, error_codes};
