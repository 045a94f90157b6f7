use crate::errors::ServerError;
use crate::responses::json_response;
use crate::templates::html_error_response;
use astra::{Body, Response};
use serde_json::json;

/// Convert a ServerError into a response: JSON for API paths, an HTML page otherwise.
pub fn error_response(err: ServerError, path: &str) -> Response {
    if !path.starts_with("/api/") {
        return html_error_response(err);
    }

    let result = match &err {
        ServerError::NotFound => json_response(
            404,
            &json!({
                "error": "Not found",
                "message": "The requested resource was not found"
            }),
        ),
        ServerError::BadRequest(msg) => json_response(
            400,
            &json!({ "error": "Bad request", "message": msg }),
        ),
        ServerError::Validation(fields) => json_response(400, fields),
        ServerError::DbError(msg) => {
            tracing::error!(path, error = %msg, "database error");
            internal_error_body()
        }
        ServerError::InternalError => {
            tracing::error!(path, "internal error");
            internal_error_body()
        }
    };

    result.unwrap_or_else(|_| Response::new(Body::from("Internal Server Error")))
}

fn internal_error_body() -> crate::responses::ResultResp {
    json_response(
        500,
        &json!({
            "error": "Internal server error",
            "message": "An unexpected error occurred"
        }),
    )
}
