use axum::{
    Extension, Router,
    extract::State,
    middleware,
    routing::{get, post},
};
use chirp_core::auth::Authenticator;
use chirp_core::controller::Controller;
use chirp_core::extract::ParsedBody;
use chirp_core::response::{ApiResponse, ErrorBody};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, SqlErr};

use crate::app::entity::user;
use crate::app::middleware::auth::{AuthUser, JwtAuthenticator, auth_middleware};
use crate::app::response::{
    CurrentUserApiResponse, CurrentUserResponse, TokenApiResponse, TokenResponse,
};
use crate::app::state::AppState;

pub struct UsersController;

impl Controller for UsersController {
    type State = AppState;

    fn router() -> Router<AppState> {
        let public = Router::new()
            .route("/register", post(register))
            .route("/login", post(login));

        let protected = Router::new()
            .route("/current", get(current))
            .route_layer(middleware::from_fn(
                auth_middleware::<JwtAuthenticator, AuthUser>,
            ));

        public.merge(protected)
    }
}

#[derive(serde::Deserialize)]
struct RegisterPayload {
    username: String,
    email: String,
    password: String,
}

#[derive(serde::Deserialize)]
struct LoginPayload {
    username: String,
    password: String,
}

#[utoipa::path(
    post,
    path = "/api/users/register",
    tag = "users",
    responses(TokenApiResponse)
)]
pub(crate) async fn register(
    State(state): State<AppState>,
    ParsedBody(body): ParsedBody,
) -> TokenApiResponse {
    let RegisterPayload {
        username,
        email,
        password,
    } = match serde_json::from_value(body) {
        Ok(payload) => payload,
        Err(err) => {
            return ApiResponse::UnprocessableEntity(ErrorBody::new(format!(
                "invalid register payload: {err}"
            )));
        }
    };

    let db = match state.db.conn().await {
        Ok(db) => db,
        Err(err) => return err.into(),
    };

    match user::Entity::find()
        .filter(user::Column::Username.eq(username.as_str()))
        .one(db.as_ref())
        .await
    {
        Ok(Some(_)) => {
            return ApiResponse::UnprocessableEntity(ErrorBody::new("username already taken"));
        }
        Ok(None) => {}
        Err(err) => return err.into(),
    }

    // bcrypt is deliberately slow; keep it off the async workers.
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(&password, bcrypt::DEFAULT_COST));
    let hash = match hash.await {
        Ok(Ok(hash)) => hash,
        Ok(Err(err)) => {
            tracing::error!("password hashing failed: {err}");

            return ApiResponse::InternalServerError(ErrorBody::new("password hashing failed"));
        }
        Err(err) => {
            tracing::error!("password hashing task failed: {err}");

            return ApiResponse::InternalServerError(ErrorBody::new("password hashing failed"));
        }
    };

    let record = user::ActiveModel {
        username: Set(username),
        email: Set(email),
        password: Set(hash),
        ..Default::default()
    };

    let record = match record.insert(db.as_ref()).await {
        Ok(record) => record,
        // The username was taken between the pre-check and the insert.
        Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            return ApiResponse::UnprocessableEntity(ErrorBody::new("username already taken"));
        }
        Err(err) => return err.into(),
    };

    let user = AuthUser {
        id: record.id,
        username: record.username,
    };

    issue_token(&state, &user, true)
}

#[utoipa::path(
    post,
    path = "/api/users/login",
    tag = "users",
    responses(TokenApiResponse)
)]
pub(crate) async fn login(
    State(state): State<AppState>,
    ParsedBody(body): ParsedBody,
) -> TokenApiResponse {
    let payload: LoginPayload = match serde_json::from_value(body) {
        Ok(payload) => payload,
        Err(err) => {
            return ApiResponse::UnprocessableEntity(ErrorBody::new(format!(
                "invalid login payload: {err}"
            )));
        }
    };

    // Distinguish a missing database (503) from bad credentials (401).
    if let Err(err) = state.db.conn().await {
        return err.into();
    }

    match state
        .authenticator
        .attempt(&payload.username, &payload.password)
        .await
    {
        Ok(user) => issue_token(&state, &user, false),
        Err(err) => {
            tracing::debug!("login rejected: {err}");

            ApiResponse::Unauthorized(ErrorBody::new("invalid username or password"))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/users/current",
    tag = "users",
    responses(CurrentUserApiResponse)
)]
pub(crate) async fn current(Extension(user): Extension<AuthUser>) -> CurrentUserApiResponse {
    ApiResponse::Ok(CurrentUserResponse {
        id: user.id,
        username: user.username,
    })
}

fn issue_token(state: &AppState, user: &AuthUser, created: bool) -> TokenApiResponse {
    match state.authenticator.generate_token(user) {
        Ok(token) => {
            if created {
                ApiResponse::Created(TokenResponse { token })
            } else {
                ApiResponse::Ok(TokenResponse { token })
            }
        }
        Err(err) => {
            tracing::error!("token generation failed: {err}");

            ApiResponse::InternalServerError(ErrorBody::new("token generation failed"))
        }
    }
}
