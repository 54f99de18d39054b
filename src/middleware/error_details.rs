//! Development-only error details on 5xx responses.

use actix_web::HttpResponse;
use actix_web::dev::ServiceResponse;
use actix_web::middleware::{ErrorHandlerResponse, ErrorHandlers};

use crate::error::AppError;

/// Error handlers that rewrite server-error bodies to include `details`.
pub fn error_details<B: 'static>() -> ErrorHandlers<B> {
    ErrorHandlers::new().default_handler_server(attach_details)
}

fn attach_details<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let Some(body) = res
        .response()
        .error()
        .and_then(|e| e.as_error::<AppError>())
        .map(|e| e.to_response(true))
    else {
        return Ok(ErrorHandlerResponse::Response(res.map_into_left_body()));
    };

    let status = res.status();
    let (req, _) = res.into_parts();
    let response = HttpResponse::build(status).json(body);
    let res = ServiceResponse::new(req, response).map_into_right_body();
    Ok(ErrorHandlerResponse::Response(res))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test, web};

    async fn failing() -> Result<HttpResponse, AppError> {
        Err(AppError::Database("connection refused".to_string()))
    }

    async fn missing() -> Result<HttpResponse, AppError> {
        Err(AppError::NotFound("Todo 7".to_string()))
    }

    #[actix_rt::test]
    async fn test_server_errors_carry_details() {
        let app = test::init_service(
            App::new()
                .wrap(error_details())
                .route("/boom", web::get().to(failing))
                .route("/missing", web::get().to(missing)),
        )
        .await;

        let req = test::TestRequest::get().uri("/boom").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["error"], "DATABASE_ERROR");
        assert_eq!(body["message"], "An internal database error occurred");
        assert_eq!(body["details"], "Database error: connection refused");

        let req = test::TestRequest::get().uri("/missing").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["message"], "Todo 7 not found");
        assert!(body.get("details").is_none());
    }
}
