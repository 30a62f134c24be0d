mod app;
mod bootstrap;
mod config;
mod docs;
mod routes;

use crate::app::graphql;
use crate::app::middleware::auth::JwtAuthenticator;
use crate::app::state::AppState;
use crate::config::app::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    bootstrap::init_base();

    let config = AppConfig::get().await?;

    // Fire-and-forget: serving starts whether or not the database arrives.
    let db = bootstrap::connect_database(config.database_url.clone());

    let authenticator = JwtAuthenticator::new(db.clone(), &config.jwt_secret);
    let schema = graphql::build_schema(db.clone());

    let state = AppState {
        db,
        authenticator,
        schema,
        graphiql: config.graphiql,
    };

    bootstrap::init_server(state, config.port).await
}
