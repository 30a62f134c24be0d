use axum::{Json, http::StatusCode, response::IntoResponse};

use crate::db::DbUnavailable;

#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        ErrorBody {
            message: message.into(),
        }
    }
}

#[derive(utoipa::IntoResponses)]
pub enum ApiResponse<T>
where
    T: serde::Serialize + utoipa::ToSchema,
{
    #[response(status = 200, description = "Ok")]
    Ok(T),

    #[response(status = 201, description = "Created")]
    Created(T),

    #[response(status = 404, description = "Not found")]
    NotFound(ErrorBody),

    #[response(status = 401, description = "Unauthorized")]
    Unauthorized(ErrorBody),

    #[response(status = 422, description = "Unprocessable entity")]
    UnprocessableEntity(ErrorBody),

    #[response(status = 503, description = "Database unavailable")]
    ServiceUnavailable(ErrorBody),

    #[response(status = 500, description = "Internal server error")]
    InternalServerError(ErrorBody),
}

impl<T> IntoResponse for ApiResponse<T>
where
    T: serde::Serialize + utoipa::ToSchema,
{
    fn into_response(self) -> axum::response::Response {
        match self {
            Self::Ok(data) => (StatusCode::OK, Json(data)).into_response(),
            Self::Created(data) => (StatusCode::CREATED, Json(data)).into_response(),
            Self::NotFound(error) => (StatusCode::NOT_FOUND, Json(error)).into_response(),
            Self::Unauthorized(error) => (StatusCode::UNAUTHORIZED, Json(error)).into_response(),
            Self::UnprocessableEntity(error) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(error)).into_response()
            }
            Self::ServiceUnavailable(error) => {
                (StatusCode::SERVICE_UNAVAILABLE, Json(error)).into_response()
            }
            Self::InternalServerError(error) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            }
        }
    }
}

impl<T> From<DbUnavailable> for ApiResponse<T>
where
    T: serde::Serialize + utoipa::ToSchema,
{
    fn from(err: DbUnavailable) -> Self {
        ApiResponse::ServiceUnavailable(ErrorBody::new(err.to_string()))
    }
}

impl<T> From<sea_orm::DbErr> for ApiResponse<T>
where
    T: serde::Serialize + utoipa::ToSchema,
{
    fn from(err: sea_orm::DbErr) -> Self {
        tracing::error!("database error: {err}");

        ApiResponse::InternalServerError(ErrorBody::new("internal database error"))
    }
}
