use axum::{Json, response::IntoResponse};
use utoipa::OpenApi;

use crate::app::controller::{tweets, users};
use crate::app::response::{CurrentUserResponse, HealthResponse, TokenResponse, TweetResponse};
use crate::routes;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::root,
        routes::health,
        users::register,
        users::login,
        users::current,
        tweets::list,
        tweets::show,
        tweets::create,
    ),
    components(schemas(
        TokenResponse,
        CurrentUserResponse,
        TweetResponse,
        HealthResponse,
        chirp_core::response::ErrorBody,
    )),
    info(description = "chirp API docs")
)]
pub struct MainApiDoc;

pub(crate) async fn openapi_json() -> impl IntoResponse {
    Json(MainApiDoc::openapi())
}
