use chirp_core::response::ApiResponse;
use chrono::{DateTime, Utc};

use crate::app::entity::tweet;

#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct CurrentUserResponse {
    pub id: i32,
    pub username: String,
}

#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct TweetResponse {
    pub id: i32,
    pub user_id: i32,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl From<tweet::Model> for TweetResponse {
    fn from(model: tweet::Model) -> Self {
        TweetResponse {
            id: model.id,
            user_id: model.user_id,
            text: model.text,
            created_at: model.created_at,
        }
    }
}

#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub database: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub type TokenApiResponse = ApiResponse<TokenResponse>;
pub type CurrentUserApiResponse = ApiResponse<CurrentUserResponse>;
pub type TweetApiResponse = ApiResponse<TweetResponse>;
pub type TweetListApiResponse = ApiResponse<Vec<TweetResponse>>;
