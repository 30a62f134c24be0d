use async_graphql::{Context, EmptySubscription, Object, Result, Schema, SimpleObject};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::{FromRequest, Request, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use chirp_core::db::DbHandle;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};

use crate::app::entity::{tweet, user};
use crate::app::state::AppState;

pub type ChirpSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

#[derive(SimpleObject)]
pub struct User {
    id: i32,
    username: String,
    email: String,
}

#[derive(SimpleObject)]
pub struct Tweet {
    id: i32,
    user_id: i32,
    text: String,
    created_at: DateTime<Utc>,
}

impl From<user::Model> for User {
    fn from(model: user::Model) -> Self {
        User {
            id: model.id,
            username: model.username,
            email: model.email,
        }
    }
}

impl From<tweet::Model> for Tweet {
    fn from(model: tweet::Model) -> Self {
        Tweet {
            id: model.id,
            user_id: model.user_id,
            text: model.text,
            created_at: model.created_at,
        }
    }
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn users(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        let db = ctx.data::<DbHandle>()?.conn().await?;

        let records = user::Entity::find().all(db.as_ref()).await?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    async fn tweets(&self, ctx: &Context<'_>) -> Result<Vec<Tweet>> {
        let db = ctx.data::<DbHandle>()?.conn().await?;

        let records = tweet::Entity::find().all(db.as_ref()).await?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    async fn tweet(&self, ctx: &Context<'_>, id: i32) -> Result<Option<Tweet>> {
        let db = ctx.data::<DbHandle>()?.conn().await?;

        let record = tweet::Entity::find_by_id(id).one(db.as_ref()).await?;

        Ok(record.map(Into::into))
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create_tweet(&self, ctx: &Context<'_>, user_id: i32, text: String) -> Result<Tweet> {
        let db = ctx.data::<DbHandle>()?.conn().await?;

        let record = tweet::ActiveModel {
            user_id: Set(user_id),
            text: Set(text),
            ..Default::default()
        };

        Ok(record.insert(db.as_ref()).await?.into())
    }
}

pub fn build_schema(db: DbHandle) -> ChirpSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(db)
        .finish()
}

pub(crate) async fn graphql_handler(
    State(state): State<AppState>,
    req: GraphQLRequest,
) -> GraphQLResponse {
    state.schema.execute(req.into_inner()).await.into()
}

/// GET endpoint: a request carrying a `query` parameter is executed against
/// the schema (GraphQL-over-HTTP GET); otherwise the interactive exploration
/// UI is served when enabled via configuration.
pub(crate) async fn graphql_get(State(state): State<AppState>, request: Request) -> Response {
    let has_query = request
        .uri()
        .query()
        .is_some_and(|raw| raw.split('&').any(|pair| pair.starts_with("query=")));

    if has_query {
        return match GraphQLRequest::<async_graphql_axum::rejection::GraphQLRejection>::from_request(
            request,
            &(),
        )
        .await
        {
            Ok(req) => {
                GraphQLResponse::from(state.schema.execute(req.into_inner()).await).into_response()
            }
            Err(rejection) => rejection.into_response(),
        };
    }

    if !state.graphiql {
        return StatusCode::NOT_FOUND.into_response();
    }

    Html(
        async_graphql::http::GraphiQLSource::build()
            .endpoint("/graphql")
            .finish(),
    )
    .into_response()
}
