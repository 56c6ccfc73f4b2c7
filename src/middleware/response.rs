use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Map, Value};

/// Success envelope: a JSON object carrying a numeric `status` plus the
/// handler's payload keys (`task`, `tasks`, `user`, `message`, ...).
#[derive(Debug)]
pub struct ApiResponse {
    status: StatusCode,
    payload: Map<String, Value>,
}

impl ApiResponse {
    fn new(status: StatusCode, payload: Value) -> Self {
        let payload = match payload {
            Value::Object(map) => map,
            other => {
                // Non-object payloads are wrapped; handlers shouldn't do this
                let mut map = Map::new();
                map.insert("data".to_string(), other);
                map
            }
        };
        Self { status, payload }
    }

    /// 200 OK with the given payload object.
    pub fn ok(payload: Value) -> Self {
        Self::new(StatusCode::OK, payload)
    }

    /// 201 Created with the given payload object.
    pub fn created(payload: Value) -> Self {
        Self::new(StatusCode::CREATED, payload)
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let mut body = self.payload;
        body.insert("status".to_string(), json!(self.status.as_u16()));
        (self.status, Json(Value::Object(body))).into_response()
    }
}

/// Handler result: success envelope or an [`ApiError`] mapped to its code.
pub type ApiResult = Result<ApiResponse, crate::error::ApiError>;
