/// Request extractors
///
/// `ApiJson` reads a JSON body like `axum::Json`, but a body that is not
/// JSON, has the wrong content type, or does not fit the target type is
/// answered as `400 validation_error` with an issue on the `body` field
/// instead of axum's plain-text rejection.

use crate::error::ApiError;
use axum::extract::FromRequest;

/// JSON request body with `ApiError` rejections
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
