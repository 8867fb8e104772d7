use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use lms_core::DomainError;

use crate::app::services::ServiceError;

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::Domain(e) => domain_error_to_response(e),
        ServiceError::Store(e) => {
            tracing::error!(error = %e, "store operation failed");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                format!("Internal Server Error: {e}"),
            )
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "validation_error", msg)
        }
        DomainError::Conflict(msg) => json_error(StatusCode::BAD_REQUEST, "conflict", msg),
        e @ DomainError::NotFound(_) => json_error(StatusCode::NOT_FOUND, "not_found", e.to_string()),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use lms_infra::StoreError;

    use super::*;

    #[test]
    fn taxonomy_maps_to_status_codes() {
        let cases = [
            (ServiceError::Domain(DomainError::validation("bad")), StatusCode::UNPROCESSABLE_ENTITY),
            (ServiceError::Domain(DomainError::conflict("dup")), StatusCode::BAD_REQUEST),
            (ServiceError::Domain(DomainError::not_found("User")), StatusCode::NOT_FOUND),
            (
                ServiceError::Store(StoreError::Unavailable("pool closed".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ServiceError::Store(StoreError::ForeignKeyViolation("courses.user_id".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(service_error_to_response(err).status(), expected);
        }
    }
}
