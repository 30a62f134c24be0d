use axum::{
    Extension, Router,
    extract::{Path, State},
    middleware,
    routing::{get, post},
};
use chirp_core::controller::Controller;
use chirp_core::extract::ParsedBody;
use chirp_core::response::{ApiResponse, ErrorBody};
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};

use crate::app::entity::tweet;
use crate::app::middleware::auth::{AuthUser, JwtAuthenticator, auth_middleware};
use crate::app::response::{TweetApiResponse, TweetListApiResponse};
use crate::app::state::AppState;

pub struct TweetsController;

impl Controller for TweetsController {
    type State = AppState;

    fn router() -> Router<AppState> {
        let public = Router::new()
            .route("/", get(list))
            .route("/{id}", get(show));

        let protected = Router::new().route("/", post(create)).route_layer(
            middleware::from_fn(auth_middleware::<JwtAuthenticator, AuthUser>),
        );

        public.merge(protected)
    }
}

#[derive(serde::Deserialize)]
struct CreateTweetPayload {
    text: String,
}

#[utoipa::path(get, path = "/api/tweets", tag = "tweets", responses(TweetListApiResponse))]
pub(crate) async fn list(State(state): State<AppState>) -> TweetListApiResponse {
    let db = match state.db.conn().await {
        Ok(db) => db,
        Err(err) => return err.into(),
    };

    match tweet::Entity::find()
        .order_by_desc(tweet::Column::CreatedAt)
        .all(db.as_ref())
        .await
    {
        Ok(records) => ApiResponse::Ok(records.into_iter().map(Into::into).collect()),
        Err(err) => err.into(),
    }
}

#[utoipa::path(
    get,
    path = "/api/tweets/{id}",
    tag = "tweets",
    params(("id" = i32, Path, description = "tweet id")),
    responses(TweetApiResponse)
)]
pub(crate) async fn show(State(state): State<AppState>, Path(id): Path<i32>) -> TweetApiResponse {
    let db = match state.db.conn().await {
        Ok(db) => db,
        Err(err) => return err.into(),
    };

    match tweet::Entity::find_by_id(id).one(db.as_ref()).await {
        Ok(Some(record)) => ApiResponse::Ok(record.into()),
        Ok(None) => ApiResponse::NotFound(ErrorBody::new(format!("tweet {id} not found"))),
        Err(err) => err.into(),
    }
}

#[utoipa::path(post, path = "/api/tweets", tag = "tweets", responses(TweetApiResponse))]
pub(crate) async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ParsedBody(body): ParsedBody,
) -> TweetApiResponse {
    let payload: CreateTweetPayload = match serde_json::from_value(body) {
        Ok(payload) => payload,
        Err(err) => {
            return ApiResponse::UnprocessableEntity(ErrorBody::new(format!(
                "invalid tweet payload: {err}"
            )));
        }
    };

    if payload.text.trim().is_empty() {
        return ApiResponse::UnprocessableEntity(ErrorBody::new("tweet text must not be empty"));
    }

    let db = match state.db.conn().await {
        Ok(db) => db,
        Err(err) => return err.into(),
    };

    let record = tweet::ActiveModel {
        user_id: Set(user.id),
        text: Set(payload.text),
        ..Default::default()
    };

    match record.insert(db.as_ref()).await {
        Ok(record) => ApiResponse::Created(record.into()),
        Err(err) => err.into(),
    }
}
