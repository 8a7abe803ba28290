use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::models::{Page, Pagination};

/// Wrapper for API responses that automatically adds the success envelope
/// `{ success: true, message?, data, pagination? }`
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub status_code: Option<StatusCode>,
    pub message: Option<String>,
    pub pagination: Option<Pagination>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with default 200 status
    pub fn success(data: T) -> Self {
        Self {
            data,
            status_code: None,
            message: None,
            pagination: None,
        }
    }

    /// Create a 201 Created response
    pub fn created(data: T) -> Self {
        Self {
            status_code: Some(StatusCode::CREATED),
            ..Self::success(data)
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    /// List response carrying a page of items and its pagination block
    pub fn page(page: Page<T>) -> Self {
        Self::success(page.items).with_pagination(page.pagination)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code.unwrap_or(StatusCode::OK);

        // Convert data to JSON Value for consistent envelope format
        let data_value = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "message": "Failed to serialize response data"
                    })),
                )
                    .into_response();
            }
        };

        let mut envelope = Map::new();
        envelope.insert("success".into(), Value::Bool(true));
        if let Some(message) = self.message {
            envelope.insert("message".into(), Value::String(message));
        }
        // Unit payloads (e.g. deletes) carry no data field
        if !data_value.is_null() {
            envelope.insert("data".into(), data_value);
        }
        if let Some(pagination) = self.pagination {
            envelope.insert("pagination".into(), json!(pagination));
        }

        (status, Json(Value::Object(envelope))).into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PageRequest;

    async fn body_of(response: Response) -> (StatusCode, Value) {
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn envelope_includes_optional_parts() {
        let pagination = Pagination::new(PageRequest { page: 1, limit: 10 }, 3);
        let response = ApiResponse::created(vec![1, 2, 3])
            .with_message("done")
            .with_pagination(pagination)
            .into_response();
        let (status, body) = body_of(response).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "done");
        assert_eq!(body["data"], json!([1, 2, 3]));
        assert_eq!(body["pagination"]["totalPages"], 1);
    }

    #[tokio::test]
    async fn unit_payload_has_no_data_field() {
        let (status, body) = body_of(ApiResponse::success(()).with_message("gone").into_response()).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.get("data").is_none());
    }
}
